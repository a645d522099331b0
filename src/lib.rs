//! Tax Engine library crate.
//!
//! This crate implements Thai personal income tax calculation as a
//! pure in-process library: per-income-type expense deductions, the
//! progressive bracket method, the flat alternative method applied as
//! a minimum-tax floor, filing penalty computation, and an advisory
//! engine that turns a calculation into ranked optimization
//! suggestions.  External applications depend on the `tax_engine`
//! crate and call into `engine::calculate`, `penalty::penalties` and
//! `advisor::analyze` directly; every model type serializes to JSON
//! for collaborators that render or relay the results.

pub mod advisor;
pub mod engine;
pub mod error;
pub mod models;
pub mod penalty;
pub mod rules;
pub mod scenarios;
pub mod tax;
