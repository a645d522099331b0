//! Data models for the Tax Engine.
//!
//! The `models` module defines a set of serialisable structs and
//! enums representing declared income, deductions, filing penalty
//! scenarios and the engine's calculation outputs.  These data types
//! derive `Serialize` and `Deserialize` so that they can be easily
//! persisted or handed to external collaborators (a UI layer, or an
//! AI assistant that calls the engine as a function tool and renders
//! its JSON output conversationally).  They form the basis of the
//! engine's input and output structures.
//!
//! All monetary amounts are `f64` values in Thai Baht.  Every value
//! here is constructed per calculation request and discarded once the
//! caller has read the result; nothing carries identity or is mutated
//! after construction.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rules::TaxBracket;

/// Classification of personal income under Section 40 of the Thai
/// Revenue Code.  Each of the eight categories carries its own
/// statutory expense-deduction rule, bound statically via
/// [`IncomeType::expense_rule`] so that an income type without a rule
/// is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    /// Section 40(1): employment income (salary, wages, bonuses).
    Salary,
    /// Section 40(2): income from services rendered, commissions,
    /// meeting fees.
    Service,
    /// Section 40(3): goodwill, copyright and other intellectual
    /// property royalties.
    IntellectualProperty,
    /// Section 40(4): passive income such as interest, dividends and
    /// capital gains.
    Passive,
    /// Section 40(5): rental of property.
    Rental,
    /// Section 40(6): liberal professions (law, medicine, engineering,
    /// accounting, fine arts).
    Professional,
    /// Section 40(7): contract work where the contractor supplies
    /// essential materials beyond tools.
    Contract,
    /// Section 40(8): business, commerce, agriculture and income not
    /// falling under the other categories.
    Business,
}

impl IncomeType {
    /// All eight Section 40 categories, in statutory order.
    pub const ALL: [IncomeType; 8] = [
        IncomeType::Salary,
        IncomeType::Service,
        IncomeType::IntellectualProperty,
        IncomeType::Passive,
        IncomeType::Rental,
        IncomeType::Professional,
        IncomeType::Contract,
        IncomeType::Business,
    ];

    /// Whether this category counts toward the gross-receipts base of
    /// the flat alternative tax method.  Everything except employment
    /// income (Section 40(1)) does.
    pub fn counts_toward_alternative_base(&self) -> bool {
        !matches!(self, IncomeType::Salary)
    }
}

/// How the expense deduction for a single income entry should be
/// determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeductionMode {
    /// Apply the statutory rule for the entry's income type.
    Standard,
    /// Deduct documented actual expenses instead of the statutory
    /// rate.  Only permitted for income types whose rule allows the
    /// override; see [`crate::tax::expense_deduction`].
    Actual,
}

impl Default for DeductionMode {
    fn default() -> Self {
        DeductionMode::Standard
    }
}

/// One item of declared income for a tax year.
///
/// A declaration is an order-irrelevant collection of entries;
/// multiple entries of the same income type are summed, not merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeEntry {
    /// Section 40 category of this income.
    pub income_type: IncomeType,
    /// Gross amount received.  Negative or zero amounts contribute
    /// nothing to the calculation.
    pub amount: f64,
    /// Expense-deduction mode selected for this entry.
    #[serde(default)]
    pub mode: DeductionMode,
    /// Documented actual expenses, required for [`DeductionMode::Actual`]
    /// to take effect.  Taken verbatim when present; receipt
    /// validation is outside the engine's scope.
    #[serde(default)]
    pub actual_expenses: Option<f64>,
}

impl IncomeEntry {
    /// Convenience constructor for a standard-mode entry.
    pub fn standard(income_type: IncomeType, amount: f64) -> Self {
        IncomeEntry {
            income_type,
            amount,
            mode: DeductionMode::Standard,
            actual_expenses: None,
        }
    }
}

/// Allowances and deductions declared alongside income.
///
/// All fields default to zero so callers only populate what applies.
/// The allowance fields (personal through disability) are supplied
/// already multiplied out per dependent by the caller (e.g. child
/// allowance times the number of children) and are summed verbatim.
/// The investment fields are clamped to their statutory caps by the
/// engine; see the calculation steps in [`crate::engine::calculate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    pub personal_allowance: f64,
    pub spouse_allowance: f64,
    pub child_allowance: f64,
    pub parent_allowance: f64,
    pub disability_allowance: f64,
    /// Life insurance premiums.
    pub life_insurance: f64,
    /// Health insurance premiums.
    pub health_insurance: f64,
    /// Pension (annuity) insurance premiums.  Shares the combined
    /// retirement cap with RMF and SSF contributions.
    pub pension_insurance: f64,
    /// Retirement Mutual Fund contributions.
    pub rmf: f64,
    /// Super Savings Fund contributions.
    pub ssf: f64,
    /// Social security contributions withheld during the year.
    pub social_security: f64,
    /// Interest paid on a home loan.
    pub home_loan_interest: f64,
    /// Qualifying donations.  Capped as a percentage of income after
    /// all other deductions, so the engine resolves it last.
    pub donation: f64,
}

impl Deductions {
    /// Total declared RMF + SSF + pension insurance, before the
    /// combined retirement cap is applied.
    pub fn retirement_total(&self) -> f64 {
        self.rmf.max(0.0) + self.ssf.max(0.0) + self.pension_insurance.max(0.0)
    }
}

/// Input to the tax calculation engine: a full income and deduction
/// declaration for one tax year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingInput {
    /// Tax year being filed.  The engine threads it through to the
    /// result; rule-set selection happens at the caller.
    pub tax_year: i32,
    /// Declared income entries.  Order is irrelevant.
    pub incomes: Vec<IncomeEntry>,
    /// Declared allowances and deductions.
    #[serde(default)]
    pub deductions: Deductions,
    /// Tax already withheld at source, credited against the final tax
    /// due.
    #[serde(default)]
    pub withholding_credit: f64,
}

/// The complete breakdown produced by one tax calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    pub tax_year: i32,
    /// Gross income summed per Section 40 category.
    pub income_by_type: HashMap<IncomeType, f64>,
    /// Total gross income across all categories.
    pub total_income: f64,
    /// Total statutory or actual expense deduction across all entries.
    pub total_expense_deduction: f64,
    /// Total income minus expense deductions.
    pub net_income: f64,
    /// Sum of personal, spouse, child, parent and disability
    /// allowances.
    pub total_allowances: f64,
    /// Sum of capped investment deductions (insurance, retirement
    /// funds, social security, home-loan interest).
    pub total_investment_deductions: f64,
    /// Donation deduction after the income-percentage cap.
    pub donation_deduction: f64,
    /// Income the progressive brackets are applied to.  Never
    /// negative.
    pub taxable_income: f64,
    /// Tax owed under the progressive bracket method.
    pub progressive_tax: f64,
    /// Tax owed under the flat alternative method on non-employment
    /// gross income.
    pub alternative_tax: f64,
    /// The binding liability: the higher of the two methods.
    pub final_tax_due: f64,
    /// Final tax due as a fraction of total gross income; zero when
    /// there is no income.
    pub effective_tax_rate: f64,
    /// Withholding credit carried over from the input.
    pub withholding_credit: f64,
    /// Final tax due minus withholding credit.  Negative means a
    /// refund.
    pub tax_payable_or_refund: f64,
}

/// The filing situation a penalty computation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    /// The return was filed after the deadline.
    LateFiling,
    /// No return was filed at all.
    NonFiling,
    /// A return was filed but understated the liability.
    InaccurateFiling,
    /// The taxpayer came forward before being audited.
    VoluntaryDisclosure,
}

/// Parameters describing how and when an overdue liability is being
/// settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyScenario {
    pub kind: PenaltyKind,
    /// Whole months elapsed since the filing deadline.  A started
    /// month counts as one.
    pub months_late: u32,
    /// Whether the taxpayer disclosed the shortfall on their own
    /// initiative.
    #[serde(default)]
    pub is_voluntary: bool,
    /// Days until the assessed amount is paid, used to pick the
    /// stepped penalty bucket for voluntary settlement.
    #[serde(default)]
    pub payment_timeline_days: u32,
}

/// Breakdown of surcharge, penalty and fine on top of an overdue tax
/// amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyResult {
    /// The overdue tax the penalties were computed on.
    pub original_tax: f64,
    /// Monthly surcharge, capped at 100% of the tax due.
    pub surcharge: f64,
    /// Administrative penalty as a percentage of the tax due.
    pub penalty: f64,
    /// Fixed criminal fine, where the scenario carries one.
    pub criminal_fine: f64,
    /// Tax due plus surcharge, penalty and fine.
    pub total_due: f64,
}

/// Thematic grouping of an optimization suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    AdditionalDeduction,
    InvestmentOpportunity,
    IncomeTiming,
    BracketOptimization,
    MissingDocument,
}

/// How much effort acting on a suggestion takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// How urgently a suggestion should be surfaced to the taxpayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One actionable tax-optimization suggestion.
///
/// Suggestions are generated fresh on every analysis call and never
/// persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Stable identifier of the rule that produced this suggestion.
    pub id: String,
    pub category: SuggestionCategory,
    pub title: String,
    pub description: String,
    /// Estimated tax saving if the suggestion is acted on.
    pub potential_saving: f64,
    pub difficulty: Difficulty,
    pub priority: Priority,
    /// Action deadline as an ISO 8601 date string, where one applies
    /// (e.g. fund purchases must settle before year end).
    #[serde(default)]
    pub deadline: Option<String>,
}

/// Input to the optimization advisory engine.  The taxable income and
/// current tax normally come straight out of a
/// [`TaxCalculationResult`]; the deductions and per-type income map
/// are the raw declaration the caller already holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub tax_year: i32,
    pub taxable_income: f64,
    /// The liability the savings estimates are measured against.
    pub current_tax: f64,
    pub deductions: Deductions,
    /// Gross income summed per Section 40 category.
    pub income_by_type: HashMap<IncomeType, f64>,
    /// Months of the tax year already elapsed, used to annualize
    /// income for the timing analysis.  Zero disables the projection.
    pub months_elapsed: u32,
}

/// Remaining headroom per deduction category, before the statutory
/// cap is reached.  All values are clamped at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnusedCapacity {
    pub rmf: f64,
    pub ssf: f64,
    pub pension_insurance: f64,
    pub life_insurance: f64,
    pub health_insurance: f64,
    pub home_loan_interest: f64,
}

/// The advisory engine's output: bracket position, remaining
/// deduction headroom and a ranked list of suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub tax_year: i32,
    pub taxable_income: f64,
    pub current_tax: f64,
    /// The bracket the taxable income currently falls into.
    pub current_bracket: TaxBracket,
    /// The next higher bracket, absent when already in the top one.
    pub next_bracket: Option<TaxBracket>,
    /// Distance from taxable income to the next bracket's floor; zero
    /// when already in the top bracket.
    pub amount_to_next_bracket: f64,
    pub unused_capacity: UnusedCapacity,
    /// Suggestions sorted descending by potential saving.
    pub suggestions: Vec<Suggestion>,
    /// Plain sum of the savings across all suggestions.  Suggestions
    /// are not deduplicated for mutual exclusivity, so this is an
    /// upper bound on what is simultaneously achievable, not a
    /// guaranteed total.
    pub total_potential_savings: f64,
}
