//! Typed errors for the tax engine.
//!
//! The engine favours silent numeric degradation over errors: out of
//! range inputs (negative amounts, zero income, missing optional
//! fields) contribute zero rather than failing, which matches how a
//! filing with no data should produce no tax.  The variants here
//! cover the few conditions that genuinely are caller errors.

use crate::models::IncomeType;
use thiserror::Error;

/// Errors a calculation can surface to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An entry selected actual-expense deduction for an income type
    /// whose statutory rule does not allow the override.  Rejected
    /// outright instead of being downgraded to the standard method,
    /// so the taxpayer is not misled about the deduction basis they
    /// claimed.
    #[error("income type {income_type:?} does not allow actual-expense deduction")]
    ActualExpensesNotAllowed { income_type: IncomeType },
}
