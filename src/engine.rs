//! Tax calculation engine.
//!
//! The `engine` module is responsible for turning a [`FilingInput`]
//! into a [`TaxCalculationResult`].  It composes the three leaf
//! calculators in [`crate::tax`]: per-entry expense deduction, the
//! progressive bracket method, and the flat alternative method, which
//! acts as a statutory minimum-tax floor rather than a replacement:
//! the taxpayer always owes the higher of the two.
//!
//! The computation is a fixed sequence of aggregate steps; later
//! steps depend on earlier totals, most visibly the donation cap,
//! which is a share of income measured after every other deduction
//! and therefore resolved last.

use crate::error::EngineError;
use crate::models::{FilingInput, IncomeType, TaxCalculationResult};
use crate::rules::RuleSet;
use crate::tax::{alternative_tax, expense_deduction, progressive_tax};
use std::collections::HashMap;

/// Clamp a declared amount to the non-negative range.  Out-of-range
/// declarations contribute nothing instead of failing the filing.
fn sanitized(amount: f64) -> f64 {
    amount.max(0.0)
}

/// Runs a full tax calculation for one declaration.
///
/// Negative, zero and missing amounts degrade to zero contributions
/// throughout; the only error path is an entry claiming the
/// actual-expense override for a category that forbids it, per
/// [`expense_deduction`].
pub fn calculate(
    rules: &RuleSet,
    input: &FilingInput,
) -> Result<TaxCalculationResult, EngineError> {
    // Group income by category and accumulate expense deductions per
    // entry.  Duplicate categories sum.
    let mut income_by_type: HashMap<IncomeType, f64> = HashMap::new();
    let mut total_income = 0.0;
    let mut total_expense_deduction = 0.0;
    for entry in &input.incomes {
        let amount = sanitized(entry.amount);
        *income_by_type.entry(entry.income_type).or_insert(0.0) += amount;
        total_income += amount;
        total_expense_deduction += expense_deduction(
            entry.income_type,
            entry.amount,
            entry.mode,
            entry.actual_expenses,
        )?;
    }

    let net_income = total_income - total_expense_deduction;

    // Allowance fields arrive already multiplied out per dependent,
    // so they sum without a combined cap.
    let deductions = &input.deductions;
    let total_allowances = sanitized(deductions.personal_allowance)
        + sanitized(deductions.spouse_allowance)
        + sanitized(deductions.child_allowance)
        + sanitized(deductions.parent_allowance)
        + sanitized(deductions.disability_allowance);

    // Investment deductions, each clamped to its statutory cap.  The
    // three retirement vehicles share one ceiling applied to their
    // sum, so shifting amounts between them changes nothing once the
    // total exceeds it.
    let caps = &rules.caps;
    let life = sanitized(deductions.life_insurance).min(caps.life_insurance);
    let health = sanitized(deductions.health_insurance).min(caps.health_insurance);
    let home_loan = sanitized(deductions.home_loan_interest).min(caps.home_loan_interest);
    let retirement = deductions.retirement_total().min(caps.retirement_combined);
    let social_security = sanitized(deductions.social_security).min(caps.social_security);
    let total_investment_deductions = life + health + home_loan + retirement + social_security;

    // The donation ceiling is measured against income after the
    // allowances, so it resolves after every other deduction.
    let income_after_allowances = (net_income - total_allowances).max(0.0);
    let donation_cap = income_after_allowances * caps.donation_rate;
    let donation_deduction = sanitized(deductions.donation).min(donation_cap);

    let total_deductions = total_allowances + total_investment_deductions + donation_deduction;
    let taxable_income = (net_income - total_deductions).max(0.0);

    let progressive = progressive_tax(&rules.brackets, taxable_income);
    let non_employment_gross: f64 = income_by_type
        .iter()
        .filter(|(income_type, _)| income_type.counts_toward_alternative_base())
        .map(|(_, amount)| amount)
        .sum();
    let alternative = alternative_tax(&rules.alternative, non_employment_gross);
    let final_tax_due = progressive.max(alternative);

    let effective_tax_rate = if total_income > 0.0 {
        final_tax_due / total_income
    } else {
        0.0
    };

    Ok(TaxCalculationResult {
        tax_year: input.tax_year,
        income_by_type,
        total_income,
        total_expense_deduction,
        net_income,
        total_allowances,
        total_investment_deductions,
        donation_deduction,
        taxable_income,
        progressive_tax: progressive,
        alternative_tax: alternative,
        final_tax_due,
        effective_tax_rate,
        withholding_credit: input.withholding_credit,
        tax_payable_or_refund: final_tax_due - input.withholding_credit,
    })
}
