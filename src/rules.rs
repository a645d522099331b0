//! Tax rule tables.
//!
//! The `rules` module holds the static data everything above it
//! consumes: the progressive bracket table, per-income-type expense
//! deduction rules, deduction and allowance caps, penalty rates and
//! the flat alternative-tax parameters.  A [`RuleSet`] bundles the
//! year-sensitive tables; the built-in set reflects the published
//! Revenue Department figures and can be overridden per tax year by
//! JSON files loaded from a directory, in the same way tax law
//! versions would be rolled forward without a code change.

use crate::models::IncomeType;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// How the statutory expense deduction for an income type is
/// computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMethod {
    /// A percentage of the gross amount, optionally clamped to an
    /// absolute ceiling.
    Percentage { rate: f64, cap: Option<f64> },
    /// A fixed amount regardless of the gross received.
    Fixed { amount: f64 },
}

/// The expense-deduction rule bound to one Section 40 income type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRule {
    pub method: DeductionMethod,
    /// Whether the taxpayer may substitute documented actual expenses
    /// for the statutory method.
    pub allows_actual: bool,
}

impl IncomeType {
    /// The statutory expense rule for this income category.
    ///
    /// The binding is part of the type itself rather than a lookup
    /// table, so a category without a rule cannot exist.
    pub fn expense_rule(&self) -> ExpenseRule {
        match self {
            IncomeType::Salary => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.5,
                    cap: Some(100_000.0),
                },
                allows_actual: false,
            },
            IncomeType::Service => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.5,
                    cap: Some(100_000.0),
                },
                allows_actual: false,
            },
            IncomeType::IntellectualProperty => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.5,
                    cap: Some(100_000.0),
                },
                allows_actual: true,
            },
            // Interest and dividends carry no expense deduction.
            IncomeType::Passive => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.0,
                    cap: None,
                },
                allows_actual: false,
            },
            IncomeType::Rental => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.3,
                    cap: None,
                },
                allows_actual: true,
            },
            IncomeType::Professional => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.3,
                    cap: None,
                },
                allows_actual: true,
            },
            IncomeType::Contract => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.6,
                    cap: None,
                },
                allows_actual: true,
            },
            IncomeType::Business => ExpenseRule {
                method: DeductionMethod::Percentage {
                    rate: 0.6,
                    cap: None,
                },
                allows_actual: true,
            },
        }
    }
}

/// One row of the progressive rate table.
///
/// Brackets are contiguous, non-overlapping and sorted ascending.
/// `base_tax` is the cumulative tax owed at the bracket floor, so a
/// lookup never has to walk the rows below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lowest taxable income falling into this bracket.
    pub min_income: f64,
    /// Highest taxable income falling into this bracket; `None` for
    /// the unbounded top bracket.
    pub max_income: Option<f64>,
    /// Marginal rate applied above `min_income`.
    pub rate: f64,
    /// Cumulative tax owed at `min_income`.
    pub base_tax: f64,
}

/// Parameters of the flat alternative method applied to gross
/// non-employment income.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlternativeTaxParams {
    /// Gross non-employment income below this threshold is not
    /// subject to the alternative method at all.
    pub minimum_gross: f64,
    /// Flat rate applied to the gross amount.
    pub flat_rate: f64,
    /// Computed amounts at or below this ceiling are waived entirely,
    /// not merely capped.
    pub exemption_ceiling: f64,
}

/// Statutory caps on allowances and investment deductions, plus the
/// percentage rules the advisory engine measures headroom against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeductionCaps {
    pub life_insurance: f64,
    pub health_insurance: f64,
    pub pension_insurance: f64,
    pub rmf: f64,
    pub ssf: f64,
    /// Combined ceiling on RMF + SSF + pension insurance.  Applied to
    /// the sum, so reallocating between the three does not change the
    /// deduction once the sum exceeds it.
    pub retirement_combined: f64,
    /// Share of taxable income the combined retirement contribution
    /// may not exceed.
    pub retirement_income_share: f64,
    pub social_security: f64,
    pub home_loan_interest: f64,
    /// Donation ceiling as a share of income after all other
    /// deductions.
    pub donation_rate: f64,
    /// Allowance per supported parent, used by the advisory engine to
    /// price the reminder when none is claimed.
    pub parent_allowance: f64,
}

/// Surcharge, penalty and fine rates for overdue filings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRates {
    /// Surcharge accrued per month late, on the tax due.
    pub surcharge_monthly_rate: f64,
    /// Ceiling on the accumulated surcharge, as a share of the tax
    /// due.
    pub surcharge_cap_rate: f64,
    /// Penalty share of tax due for failing to file, without
    /// voluntary disclosure.
    pub non_filing_rate: f64,
    /// Penalty share of tax due for an understated return, without
    /// voluntary disclosure.
    pub inaccurate_filing_rate: f64,
    /// Stepped penalty shares for voluntary settlement, keyed by how
    /// quickly the assessed amount is paid.
    pub voluntary_within_15_days: f64,
    pub voluntary_within_30_days: f64,
    pub voluntary_within_60_days: f64,
    pub voluntary_after_60_days: f64,
    /// Fixed criminal fine for filing up to one month late.
    pub late_fine_within_month: f64,
    /// Fixed criminal fine for filing more than one month late.
    pub late_fine_after_month: f64,
}

/// The complete set of year-sensitive tables the engine computes
/// from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Tax year these tables apply to.
    pub tax_year: i32,
    /// Progressive rate table, sorted ascending.
    pub brackets: Vec<TaxBracket>,
    pub caps: DeductionCaps,
    pub alternative: AlternativeTaxParams,
    pub penalty_rates: PenaltyRates,
}

/// Tolerance for the cumulative base-tax invariant.  The published
/// table states bracket floors as whole-baht values one above the
/// previous ceiling (150,001 after 150,000), which leaves up to one
/// baht of slack per row.
const BASE_TAX_TOLERANCE: f64 = 1.0;

impl RuleSet {
    /// The built-in rule set for the given tax year.
    ///
    /// The tables carry the currently published figures; loading a
    /// directory of overrides via [`load_rule_sets_from_dir`] is the
    /// path for year-specific revisions.
    pub fn for_year(tax_year: i32) -> RuleSet {
        RuleSet {
            tax_year,
            brackets: vec![
                TaxBracket {
                    min_income: 0.0,
                    max_income: Some(150_000.0),
                    rate: 0.0,
                    base_tax: 0.0,
                },
                TaxBracket {
                    min_income: 150_001.0,
                    max_income: Some(300_000.0),
                    rate: 0.05,
                    base_tax: 0.0,
                },
                TaxBracket {
                    min_income: 300_001.0,
                    max_income: Some(500_000.0),
                    rate: 0.10,
                    base_tax: 7_500.0,
                },
                TaxBracket {
                    min_income: 500_001.0,
                    max_income: Some(750_000.0),
                    rate: 0.15,
                    base_tax: 27_500.0,
                },
                TaxBracket {
                    min_income: 750_001.0,
                    max_income: Some(1_000_000.0),
                    rate: 0.20,
                    base_tax: 65_000.0,
                },
                TaxBracket {
                    min_income: 1_000_001.0,
                    max_income: Some(2_000_000.0),
                    rate: 0.25,
                    base_tax: 115_000.0,
                },
                TaxBracket {
                    min_income: 2_000_001.0,
                    max_income: Some(5_000_000.0),
                    rate: 0.30,
                    base_tax: 365_000.0,
                },
                TaxBracket {
                    min_income: 5_000_001.0,
                    max_income: None,
                    rate: 0.35,
                    base_tax: 1_265_000.0,
                },
            ],
            caps: DeductionCaps {
                life_insurance: 100_000.0,
                health_insurance: 25_000.0,
                pension_insurance: 200_000.0,
                rmf: 500_000.0,
                ssf: 200_000.0,
                retirement_combined: 500_000.0,
                retirement_income_share: 0.30,
                social_security: 9_000.0,
                home_loan_interest: 100_000.0,
                donation_rate: 0.10,
                parent_allowance: 30_000.0,
            },
            alternative: AlternativeTaxParams {
                minimum_gross: 1_000_000.0,
                flat_rate: 0.005,
                exemption_ceiling: 5_000.0,
            },
            penalty_rates: PenaltyRates {
                surcharge_monthly_rate: 0.015,
                surcharge_cap_rate: 1.0,
                non_filing_rate: 2.0,
                inaccurate_filing_rate: 1.0,
                voluntary_within_15_days: 0.02,
                voluntary_within_30_days: 0.05,
                voluntary_within_60_days: 0.10,
                voluntary_after_60_days: 0.20,
                late_fine_within_month: 1_000.0,
                late_fine_after_month: 2_000.0,
            },
        }
    }

    /// Checks the structural invariants of the bracket table:
    /// non-empty, sorted ascending, contiguous, unbounded final row,
    /// and the cumulative base-tax relation
    /// `base(i) == base(i-1) + rate(i-1) * (max(i-1) - min(i-1))`
    /// within tolerance.
    pub fn validate(&self) -> Result<()> {
        if self.brackets.is_empty() {
            bail!("rule set for {} has no tax brackets", self.tax_year);
        }
        let last = self.brackets.len() - 1;
        if self.brackets[last].max_income.is_some() {
            bail!("final tax bracket must be unbounded");
        }
        for (i, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < 0.0 {
                bail!("bracket {} has a negative rate", i);
            }
            if i == last {
                continue;
            }
            let max = bracket
                .max_income
                .with_context(|| format!("bracket {} below the top is unbounded", i))?;
            if max <= bracket.min_income {
                bail!("bracket {} has max_income below its min_income", i);
            }
            let next = &self.brackets[i + 1];
            if next.min_income < max {
                bail!("bracket {} overlaps its successor", i);
            }
            if next.min_income - max > BASE_TAX_TOLERANCE {
                bail!("gap between bracket {} and its successor", i);
            }
            let expected = bracket.base_tax + bracket.rate * (max - bracket.min_income);
            if (next.base_tax - expected).abs() > BASE_TAX_TOLERANCE {
                bail!(
                    "bracket {} base tax {} breaks the cumulative relation (expected ~{})",
                    i + 1,
                    next.base_tax,
                    expected
                );
            }
        }
        Ok(())
    }
}

/// Load rule-set overrides from a directory.
///
/// This helper scans a directory and attempts to parse any `.json`
/// files as [`RuleSet`] objects, validating each one.  Files that
/// fail to parse or validate are skipped with a warning rather than
/// aborting the scan, so one bad revision does not take down the
/// built-in tables.  Duplicate tax years are not checked; if you need
/// deduplication you should perform it on the caller side.
pub fn load_rule_sets_from_dir(path: &std::path::Path) -> Result<Vec<RuleSet>> {
    let mut sets = Vec::new();
    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.path().extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let data = std::fs::read_to_string(entry.path())?;
            match serde_json::from_str::<RuleSet>(&data) {
                Ok(set) => match set.validate() {
                    Ok(()) => sets.push(set),
                    Err(err) => {
                        tracing::warn!(
                            file = %entry.path().display(),
                            error = %err,
                            "skipping invalid rule set"
                        );
                    }
                },
                Err(err) => {
                    tracing::warn!(
                        file = %entry.path().display(),
                        error = %err,
                        "failed to parse rule set"
                    );
                }
            }
        }
    }
    Ok(sets)
}
