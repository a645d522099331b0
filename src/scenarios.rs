//! Parallel what-if evaluation.
//!
//! Scenario comparison (the same declaration with several candidate
//! deduction sets, or a year of declarations re-run under revised
//! tables) is a batch of independent [`calculate`] calls, so this
//! module fans them out across CPU cores with the [`rayon`] crate.
//! Results come back in input order.

use crate::engine::calculate;
use crate::error::EngineError;
use crate::models::{FilingInput, TaxCalculationResult};
use crate::rules::RuleSet;
use rayon::prelude::*;

/// Evaluates each filing independently and in parallel.
///
/// Every input gets its own result slot; one filing failing (an
/// invalid actual-expense claim) does not disturb the others.
pub fn compare_scenarios(
    rules: &RuleSet,
    inputs: &[FilingInput],
) -> Vec<Result<TaxCalculationResult, EngineError>> {
    inputs
        .par_iter()
        .map(|input| calculate(rules, input))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deductions, DeductionMode, IncomeEntry, IncomeType};

    fn filing(amount: f64, rmf: f64) -> FilingInput {
        FilingInput {
            tax_year: 2024,
            incomes: vec![IncomeEntry::standard(IncomeType::Salary, amount)],
            deductions: Deductions {
                personal_allowance: 60_000.0,
                rmf,
                ..Deductions::default()
            },
            withholding_credit: 0.0,
        }
    }

    #[test]
    fn batch_results_match_sequential_calculation_in_order() {
        let rules = RuleSet::for_year(2024);
        let inputs = vec![
            filing(500_000.0, 0.0),
            filing(500_000.0, 50_000.0),
            filing(1_200_000.0, 200_000.0),
        ];
        let batch = compare_scenarios(&rules, &inputs);
        assert_eq!(batch.len(), inputs.len());
        for (input, result) in inputs.iter().zip(&batch) {
            let sequential = calculate(&rules, input).unwrap();
            assert_eq!(result.as_ref().unwrap(), &sequential);
        }
    }

    #[test]
    fn one_failing_scenario_leaves_the_rest_intact() {
        let rules = RuleSet::for_year(2024);
        let bad = FilingInput {
            tax_year: 2024,
            incomes: vec![IncomeEntry {
                income_type: IncomeType::Salary,
                amount: 400_000.0,
                mode: DeductionMode::Actual,
                actual_expenses: Some(90_000.0),
            }],
            deductions: Deductions::default(),
            withholding_credit: 0.0,
        };
        let inputs = vec![filing(500_000.0, 0.0), bad, filing(600_000.0, 0.0)];
        let batch = compare_scenarios(&rules, &inputs);
        assert!(batch[0].is_ok());
        assert!(batch[1].is_err());
        assert!(batch[2].is_ok());
    }
}
