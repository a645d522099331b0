//! The three leaf calculators.
//!
//! The `tax` module implements the per-entry expense deduction, the
//! progressive bracket method and the flat alternative method.  Each
//! is a pure function over the rule tables in [`crate::rules`]; the
//! composing engine in [`crate::engine`] wires them together into a
//! full calculation.

use crate::error::EngineError;
use crate::models::{DeductionMode, IncomeType};
use crate::rules::{AlternativeTaxParams, DeductionMethod, TaxBracket};

/// Allowed expense deduction for one income entry.
///
/// Actual-expense mode takes the documented amount verbatim: the
/// statutory cap does not apply, and receipt validation is an
/// external concern.  Selecting actual mode for a category whose rule
/// forbids the override is a caller error; an actual-mode entry with
/// no documented amount falls back to the statutory method.
pub fn expense_deduction(
    income_type: IncomeType,
    amount: f64,
    mode: DeductionMode,
    actual_expenses: Option<f64>,
) -> Result<f64, EngineError> {
    let rule = income_type.expense_rule();
    if mode == DeductionMode::Actual {
        if !rule.allows_actual {
            return Err(EngineError::ActualExpensesNotAllowed { income_type });
        }
        if let Some(actual) = actual_expenses {
            return Ok(actual);
        }
    }
    if amount <= 0.0 {
        return Ok(0.0);
    }
    let deduction = match rule.method {
        DeductionMethod::Percentage { rate, cap } => {
            let computed = amount * rate;
            match cap {
                Some(cap) => computed.min(cap),
                None => computed,
            }
        }
        DeductionMethod::Fixed { amount } => amount,
    };
    Ok(deduction)
}

/// Tax owed on `taxable_income` under the progressive bracket table.
///
/// Negative input is treated as zero.  The fallback return for an
/// exhausted scan is unreachable with a well-formed table, whose
/// final bracket is unbounded.
pub fn progressive_tax(brackets: &[TaxBracket], taxable_income: f64) -> f64 {
    let income = taxable_income.max(0.0);
    for bracket in brackets {
        let fits = match bracket.max_income {
            Some(max) => income <= max,
            None => true,
        };
        if fits {
            return bracket.base_tax + bracket.rate * (income - bracket.min_income);
        }
    }
    0.0
}

/// Tax owed on gross non-employment income under the flat alternative
/// method.
///
/// The method only engages at or above the statutory gross threshold,
/// and computed amounts at or below the exemption ceiling are waived
/// entirely rather than capped.
pub fn alternative_tax(params: &AlternativeTaxParams, non_employment_gross: f64) -> f64 {
    if non_employment_gross < params.minimum_gross {
        return 0.0;
    }
    let tax = non_employment_gross * params.flat_rate;
    if tax <= params.exemption_ceiling {
        0.0
    } else {
        tax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleSet;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn salary_deduction_is_capped() {
        let deduction =
            expense_deduction(IncomeType::Salary, 500_000.0, DeductionMode::Standard, None)
                .unwrap();
        assert_close(deduction, 100_000.0);
    }

    #[test]
    fn salary_deduction_below_cap_uses_the_rate() {
        let deduction =
            expense_deduction(IncomeType::Salary, 120_000.0, DeductionMode::Standard, None)
                .unwrap();
        assert_close(deduction, 60_000.0);
    }

    #[test]
    fn passive_income_gets_no_deduction() {
        let deduction =
            expense_deduction(IncomeType::Passive, 800_000.0, DeductionMode::Standard, None)
                .unwrap();
        assert_close(deduction, 0.0);
    }

    #[test]
    fn rental_has_no_absolute_cap() {
        let deduction =
            expense_deduction(IncomeType::Rental, 2_000_000.0, DeductionMode::Standard, None)
                .unwrap();
        assert_close(deduction, 600_000.0);
    }

    #[test]
    fn actual_expenses_are_taken_verbatim() {
        let deduction = expense_deduction(
            IncomeType::Business,
            1_000_000.0,
            DeductionMode::Actual,
            Some(850_000.0),
        )
        .unwrap();
        assert_close(deduction, 850_000.0);
    }

    #[test]
    fn actual_mode_without_amount_falls_back_to_standard() {
        let deduction =
            expense_deduction(IncomeType::Business, 1_000_000.0, DeductionMode::Actual, None)
                .unwrap();
        assert_close(deduction, 600_000.0);
    }

    #[test]
    fn actual_mode_is_rejected_where_the_rule_forbids_it() {
        let err = expense_deduction(
            IncomeType::Salary,
            500_000.0,
            DeductionMode::Actual,
            Some(200_000.0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::ActualExpensesNotAllowed {
                income_type: IncomeType::Salary
            }
        );
    }

    #[test]
    fn negative_and_zero_amounts_deduct_nothing() {
        for amount in [0.0, -25_000.0] {
            let deduction =
                expense_deduction(IncomeType::Salary, amount, DeductionMode::Standard, None)
                    .unwrap();
            assert_close(deduction, 0.0);
        }
    }

    #[test]
    fn no_progressive_tax_up_to_the_exempt_band() {
        let rules = RuleSet::for_year(2024);
        for income in [0.0, 1.0, 75_000.0, 150_000.0] {
            assert_close(progressive_tax(&rules.brackets, income), 0.0);
        }
    }

    #[test]
    fn negative_taxable_income_is_treated_as_zero() {
        let rules = RuleSet::for_year(2024);
        assert_close(progressive_tax(&rules.brackets, -40_000.0), 0.0);
    }

    #[test]
    fn progressive_tax_mid_bracket() {
        let rules = RuleSet::for_year(2024);
        // 7,500 at the floor of the 10% bracket plus the marginal part.
        assert_close(
            progressive_tax(&rules.brackets, 340_000.0),
            7_500.0 + 0.10 * (340_000.0 - 300_001.0),
        );
    }

    #[test]
    fn progressive_tax_top_bracket() {
        let rules = RuleSet::for_year(2024);
        assert_close(
            progressive_tax(&rules.brackets, 6_000_000.0),
            1_265_000.0 + 0.35 * (6_000_000.0 - 5_000_001.0),
        );
    }

    #[test]
    fn progressive_tax_is_continuous_at_bracket_boundaries() {
        let rules = RuleSet::for_year(2024);
        for pair in rules.brackets.windows(2) {
            let below = progressive_tax(&rules.brackets, pair[0].max_income.unwrap());
            let above = progressive_tax(&rules.brackets, pair[1].min_income);
            // The published floors sit one baht above the previous
            // ceiling, so continuity holds to within one marginal baht.
            assert!(
                (above - below).abs() <= pair[1].rate + 1e-6,
                "jump of {} at {}",
                above - below,
                pair[1].min_income
            );
        }
    }

    #[test]
    fn progressive_tax_is_monotonic() {
        let rules = RuleSet::for_year(2024);
        let mut previous = 0.0;
        let mut income = 0.0;
        while income <= 6_500_000.0 {
            let tax = progressive_tax(&rules.brackets, income);
            assert!(
                tax + 1e-9 >= previous,
                "tax decreased between steps near {income}"
            );
            previous = tax;
            income += 12_500.0;
        }
    }

    #[test]
    fn alternative_tax_is_zero_below_the_threshold() {
        let rules = RuleSet::for_year(2024);
        for gross in [0.0, 400_000.0, 999_999.0] {
            assert_close(alternative_tax(&rules.alternative, gross), 0.0);
        }
    }

    #[test]
    fn alternative_tax_waives_amounts_inside_the_exemption() {
        let rules = RuleSet::for_year(2024);
        // 1,000,000 * 0.005 == 5,000 sits exactly on the ceiling.
        assert_close(alternative_tax(&rules.alternative, 1_000_000.0), 0.0);
    }

    #[test]
    fn alternative_tax_applies_the_flat_rate_above_the_exemption() {
        let rules = RuleSet::for_year(2024);
        assert_close(alternative_tax(&rules.alternative, 3_000_000.0), 15_000.0);
    }
}
