//! Optimization advisory engine.
//!
//! Consumes a calculation's output together with the raw declaration
//! and produces a ranked list of tax-optimization suggestions:
//! remaining deduction headroom worth using, a warning when taxable
//! income sits close under the next bracket floor, a reminder for an
//! unclaimed parent allowance, and an income-timing note for earners
//! whose annualized trajectory crosses into a higher bracket.
//!
//! Each suggestion rule is independent and composable: it inspects
//! the request and optionally emits one [`Suggestion`].  The rules do
//! not know about each other, so the summed savings assume the same
//! unspent cash is available to every rule at once; the total is an
//! upper bound, not an achievable figure.

use crate::models::{
    AnalysisRequest, Difficulty, IncomeType, OptimizationResult, Priority, Suggestion,
    SuggestionCategory, UnusedCapacity,
};
use crate::rules::{RuleSet, TaxBracket};

/// Headroom below which the combined retirement suggestion stays
/// quiet.
const RETIREMENT_MIN_ROOM: f64 = 10_000.0;
/// Per-rule minimum headroom for the insurance and home-loan
/// suggestions.
const LIFE_INSURANCE_MIN_ROOM: f64 = 10_000.0;
const HEALTH_INSURANCE_MIN_ROOM: f64 = 5_000.0;
const HOME_LOAN_MIN_ROOM: f64 = 10_000.0;
/// Width of the warning window under the next bracket floor.
const BRACKET_WARNING_WINDOW: f64 = 100_000.0;
/// Qualifying donations deduct twice their amount.
const DONATION_MULTIPLIER: f64 = 2.0;

fn sanitized(amount: f64) -> f64 {
    amount.max(0.0)
}

/// Index of the bracket `income` falls into, with the same selection
/// rule as the progressive calculator.
fn bracket_position(brackets: &[TaxBracket], income: f64) -> usize {
    brackets
        .iter()
        .position(|bracket| match bracket.max_income {
            Some(max) => income <= max,
            None => true,
        })
        .unwrap_or_else(|| brackets.len().saturating_sub(1))
}

fn priority_for(saving: f64) -> Priority {
    if saving >= 30_000.0 {
        Priority::High
    } else if saving >= 10_000.0 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Analyzes a filing position and produces ranked optimization
/// suggestions with estimated savings.
pub fn analyze(rules: &RuleSet, request: &AnalysisRequest) -> OptimizationResult {
    let taxable = sanitized(request.taxable_income);
    let brackets = &rules.brackets;

    let index = bracket_position(brackets, taxable);
    let current_bracket = brackets.get(index).copied().unwrap_or(TaxBracket {
        min_income: 0.0,
        max_income: None,
        rate: 0.0,
        base_tax: 0.0,
    });
    let next_bracket = brackets.get(index + 1).copied();
    let amount_to_next_bracket = next_bracket
        .map(|bracket| (bracket.min_income - taxable).max(0.0))
        .unwrap_or(0.0);

    let caps = &rules.caps;
    let deductions = &request.deductions;
    let unused_capacity = UnusedCapacity {
        rmf: (caps.rmf - sanitized(deductions.rmf)).max(0.0),
        ssf: (caps.ssf - sanitized(deductions.ssf)).max(0.0),
        pension_insurance: (caps.pension_insurance - sanitized(deductions.pension_insurance))
            .max(0.0),
        life_insurance: (caps.life_insurance - sanitized(deductions.life_insurance)).max(0.0),
        health_insurance: (caps.health_insurance - sanitized(deductions.health_insurance))
            .max(0.0),
        home_loan_interest: (caps.home_loan_interest - sanitized(deductions.home_loan_interest))
            .max(0.0),
    };

    let rate = current_bracket.rate;
    let mut suggestions = Vec::new();

    // Combined retirement headroom.  The three vehicles share one
    // ceiling, itself limited to a share of taxable income; at
    // moderate incomes the income share binds before the absolute
    // cap.
    let retirement_ceiling = caps
        .retirement_combined
        .min(taxable * caps.retirement_income_share);
    let retirement_room = (retirement_ceiling - deductions.retirement_total()).max(0.0);
    if retirement_room >= RETIREMENT_MIN_ROOM {
        let saving = retirement_room * rate;
        suggestions.push(Suggestion {
            id: "retirement_contribution".to_string(),
            category: SuggestionCategory::InvestmentOpportunity,
            title: "Top up retirement funds".to_string(),
            description: format!(
                "You can still put {:.0} baht into RMF, SSF or pension insurance this year, \
                 lowering your tax by about {:.0} baht at your current marginal rate.",
                retirement_room, saving
            ),
            potential_saving: saving,
            difficulty: Difficulty::Medium,
            priority: priority_for(saving),
            deadline: Some(format!("{}-12-30", request.tax_year)),
        });
    }

    if unused_capacity.life_insurance >= LIFE_INSURANCE_MIN_ROOM {
        let saving = unused_capacity.life_insurance * rate;
        suggestions.push(Suggestion {
            id: "life_insurance_premium".to_string(),
            category: SuggestionCategory::InvestmentOpportunity,
            title: "Use remaining life insurance allowance".to_string(),
            description: format!(
                "Life insurance premiums up to another {:.0} baht are deductible, \
                 saving about {:.0} baht.",
                unused_capacity.life_insurance, saving
            ),
            potential_saving: saving,
            difficulty: Difficulty::Medium,
            priority: priority_for(saving),
            deadline: None,
        });
    }

    if unused_capacity.health_insurance >= HEALTH_INSURANCE_MIN_ROOM {
        let saving = unused_capacity.health_insurance * rate;
        suggestions.push(Suggestion {
            id: "health_insurance_premium".to_string(),
            category: SuggestionCategory::InvestmentOpportunity,
            title: "Use remaining health insurance allowance".to_string(),
            description: format!(
                "Health insurance premiums up to another {:.0} baht are deductible, \
                 saving about {:.0} baht.",
                unused_capacity.health_insurance, saving
            ),
            potential_saving: saving,
            difficulty: Difficulty::Easy,
            priority: priority_for(saving),
            deadline: None,
        });
    }

    if unused_capacity.home_loan_interest >= HOME_LOAN_MIN_ROOM {
        let saving = unused_capacity.home_loan_interest * rate;
        suggestions.push(Suggestion {
            id: "home_loan_interest".to_string(),
            category: SuggestionCategory::AdditionalDeduction,
            title: "Claim remaining home-loan interest".to_string(),
            description: format!(
                "Up to {:.0} baht more of home-loan interest is deductible if you have \
                 paid it; gather the bank statement to claim about {:.0} baht in savings.",
                unused_capacity.home_loan_interest, saving
            ),
            potential_saving: saving,
            difficulty: Difficulty::Easy,
            priority: priority_for(saving),
            deadline: None,
        });
    }

    // Qualifying donations deduct double, so the saving estimate is
    // doubled too.
    let donation_room =
        (taxable * caps.donation_rate - sanitized(deductions.donation)).max(0.0);
    if donation_room > 0.0 {
        let saving = donation_room * rate * DONATION_MULTIPLIER;
        suggestions.push(Suggestion {
            id: "donation".to_string(),
            category: SuggestionCategory::AdditionalDeduction,
            title: "Donate to qualifying causes".to_string(),
            description: format!(
                "Donations of up to {:.0} baht to qualifying education or health causes \
                 deduct twice over, saving about {:.0} baht.",
                donation_room, saving
            ),
            potential_saving: saving,
            difficulty: Difficulty::Easy,
            priority: priority_for(saving),
            deadline: Some(format!("{}-12-31", request.tax_year)),
        });
    }

    if let Some(next) = next_bracket {
        if amount_to_next_bracket > 0.0 && amount_to_next_bracket < BRACKET_WARNING_WINDOW {
            let saving = (next.rate - rate) * amount_to_next_bracket;
            suggestions.push(Suggestion {
                id: "bracket_proximity".to_string(),
                category: SuggestionCategory::BracketOptimization,
                title: "Close to the next tax bracket".to_string(),
                description: format!(
                    "Your taxable income is {:.0} baht under the {:.0}% bracket; keeping \
                     additional income or realized gains below that line avoids the \
                     higher marginal rate.",
                    amount_to_next_bracket,
                    next.rate * 100.0
                ),
                potential_saving: saving,
                difficulty: Difficulty::Easy,
                priority: Priority::High,
                deadline: None,
            });
        }
    }

    if deductions.parent_allowance == 0.0 {
        let saving = caps.parent_allowance * rate;
        suggestions.push(Suggestion {
            id: "parent_allowance".to_string(),
            category: SuggestionCategory::MissingDocument,
            title: "Check the parent support allowance".to_string(),
            description: format!(
                "No parent allowance is claimed.  Supporting a parent over 60 with low \
                 income is worth {:.0} baht per parent, about {:.0} baht in tax.",
                caps.parent_allowance, saving
            ),
            potential_saving: saving,
            difficulty: Difficulty::Easy,
            priority: priority_for(saving),
            deadline: None,
        });
    }

    if let Some(suggestion) = income_timing(rules, request, index, current_bracket) {
        suggestions.push(suggestion);
    }

    suggestions.sort_by(|a, b| {
        b.potential_saving
            .partial_cmp(&a.potential_saving)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let total_potential_savings = suggestions.iter().map(|s| s.potential_saving).sum();

    OptimizationResult {
        tax_year: request.tax_year,
        taxable_income: taxable,
        current_tax: request.current_tax,
        current_bracket,
        next_bracket,
        amount_to_next_bracket,
        unused_capacity,
        suggestions,
        total_potential_savings,
    }
}

/// Income-timing rule for earners who control when income lands.
///
/// Salary-heavy filers cannot shift their pay, so the rule only
/// speaks up when less than half the declared income is employment
/// income.  The year-to-date taxable amount is annualized from
/// `months_elapsed`; if the projection lands in a higher bracket, the
/// exposure above that bracket's floor is worth deferring into next
/// year.
fn income_timing(
    rules: &RuleSet,
    request: &AnalysisRequest,
    current_index: usize,
    current_bracket: TaxBracket,
) -> Option<Suggestion> {
    if request.months_elapsed == 0 {
        return None;
    }
    let total: f64 = request.income_by_type.values().map(|v| sanitized(*v)).sum();
    if total <= 0.0 {
        return None;
    }
    let salary = request
        .income_by_type
        .get(&IncomeType::Salary)
        .map(|v| sanitized(*v))
        .unwrap_or(0.0);
    if salary / total >= 0.5 {
        return None;
    }

    let taxable = sanitized(request.taxable_income);
    let projected = taxable * 12.0 / f64::from(request.months_elapsed);
    let projected_index = bracket_position(&rules.brackets, projected);
    if projected_index <= current_index {
        return None;
    }
    let projected_bracket = rules.brackets[projected_index];
    let saving =
        (projected_bracket.rate - current_bracket.rate) * (projected - projected_bracket.min_income);
    Some(Suggestion {
        id: "income_timing".to_string(),
        category: SuggestionCategory::IncomeTiming,
        title: "Consider deferring year-end income".to_string(),
        description: format!(
            "At the current pace your full-year taxable income projects to about {:.0} \
             baht, which lands in the {:.0}% bracket.  Invoicing part of it in January \
             instead keeps this year in the {:.0}% bracket.",
            projected,
            projected_bracket.rate * 100.0,
            current_bracket.rate * 100.0
        ),
        potential_saving: saving,
        difficulty: Difficulty::Hard,
        priority: Priority::Medium,
        deadline: Some(format!("{}-12-31", request.tax_year)),
    })
}
