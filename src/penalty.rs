//! Filing penalty calculator.
//!
//! Computes the surcharge, administrative penalty and criminal fine
//! owed on top of an overdue tax amount for a given filing scenario.
//! The monthly surcharge applies to every scenario kind and is capped
//! at the tax due itself; the administrative penalty depends on the
//! kind and on whether the taxpayer came forward voluntarily, in
//! which case a stepped rate rewards faster settlement.

use crate::models::{PenaltyKind, PenaltyResult, PenaltyScenario};
use crate::rules::PenaltyRates;

/// Stepped penalty rate for voluntary settlement, keyed by how many
/// days until the assessed amount is paid.  Strictly increasing with
/// delay.
fn voluntary_rate(rates: &PenaltyRates, payment_timeline_days: u32) -> f64 {
    if payment_timeline_days <= 15 {
        rates.voluntary_within_15_days
    } else if payment_timeline_days <= 30 {
        rates.voluntary_within_30_days
    } else if payment_timeline_days <= 60 {
        rates.voluntary_within_60_days
    } else {
        rates.voluntary_after_60_days
    }
}

/// Computes the full penalty breakdown for an overdue liability.
pub fn penalties(rates: &PenaltyRates, tax_due: f64, scenario: &PenaltyScenario) -> PenaltyResult {
    let tax_due = tax_due.max(0.0);

    let surcharge = if tax_due > 0.0 {
        let accrued = tax_due * rates.surcharge_monthly_rate * f64::from(scenario.months_late);
        accrued.min(tax_due * rates.surcharge_cap_rate)
    } else {
        0.0
    };

    let mut penalty = 0.0;
    let mut criminal_fine = 0.0;
    match scenario.kind {
        // Filing late carries only the fixed fine, no percentage
        // penalty.
        PenaltyKind::LateFiling => {
            criminal_fine = if scenario.months_late <= 1 {
                rates.late_fine_within_month
            } else {
                rates.late_fine_after_month
            };
        }
        PenaltyKind::NonFiling => {
            penalty = if scenario.is_voluntary {
                tax_due * voluntary_rate(rates, scenario.payment_timeline_days)
            } else {
                tax_due * rates.non_filing_rate
            };
        }
        PenaltyKind::InaccurateFiling => {
            penalty = if scenario.is_voluntary {
                tax_due * voluntary_rate(rates, scenario.payment_timeline_days)
            } else {
                tax_due * rates.inaccurate_filing_rate
            };
        }
        // Voluntary disclosure is assumed prompt, so only the fastest
        // settlement step applies.
        PenaltyKind::VoluntaryDisclosure => {
            penalty = tax_due * rates.voluntary_within_15_days;
        }
    }

    PenaltyResult {
        original_tax: tax_due,
        surcharge,
        penalty,
        criminal_fine,
        total_due: tax_due + surcharge + penalty + criminal_fine,
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

    fn rates() -> PenaltyRates {
        RuleSet::for_year(2024).penalty_rates
    }

    #[test]
    fn voluntary_settlement_at_twenty_days_hits_the_second_step() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::InaccurateFiling,
            months_late: 1,
            is_voluntary: true,
            payment_timeline_days: 20,
        };
        let result = penalties(&rates(), 10_000.0, &scenario);
        assert_close(result.penalty, 500.0);
        assert_close(result.surcharge, 150.0);
        assert_close(result.criminal_fine, 0.0);
        assert_close(result.total_due, 10_650.0);
    }

    #[test]
    fn voluntary_steps_increase_strictly_with_delay() {
        let mut previous = -1.0;
        for days in [10, 20, 45, 90] {
            let scenario = PenaltyScenario {
                kind: PenaltyKind::NonFiling,
                months_late: 0,
                is_voluntary: true,
                payment_timeline_days: days,
            };
            let result = penalties(&rates(), 10_000.0, &scenario);
            assert!(
                result.penalty > previous,
                "penalty did not increase at {days} days"
            );
            previous = result.penalty;
        }
    }

    #[test]
    fn late_filing_carries_only_the_fixed_fine() {
        let prompt = PenaltyScenario {
            kind: PenaltyKind::LateFiling,
            months_late: 1,
            is_voluntary: false,
            payment_timeline_days: 0,
        };
        let result = penalties(&rates(), 10_000.0, &prompt);
        assert_close(result.penalty, 0.0);
        assert_close(result.criminal_fine, 1_000.0);

        let extended = PenaltyScenario {
            months_late: 4,
            ..prompt
        };
        let result = penalties(&rates(), 10_000.0, &extended);
        assert_close(result.criminal_fine, 2_000.0);
    }

    #[test]
    fn non_filing_without_disclosure_doubles_the_tax() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::NonFiling,
            months_late: 2,
            is_voluntary: false,
            payment_timeline_days: 0,
        };
        let result = penalties(&rates(), 50_000.0, &scenario);
        assert_close(result.penalty, 100_000.0);
    }

    #[test]
    fn inaccurate_filing_without_disclosure_matches_the_tax() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::InaccurateFiling,
            months_late: 0,
            is_voluntary: false,
            payment_timeline_days: 0,
        };
        let result = penalties(&rates(), 50_000.0, &scenario);
        assert_close(result.penalty, 50_000.0);
    }

    #[test]
    fn voluntary_disclosure_uses_the_prompt_rate() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::VoluntaryDisclosure,
            months_late: 3,
            is_voluntary: true,
            // Timeline is ignored for this kind; disclosure is
            // assumed prompt.
            payment_timeline_days: 90,
        };
        let result = penalties(&rates(), 10_000.0, &scenario);
        assert_close(result.penalty, 200.0);
    }

    #[test]
    fn surcharge_is_capped_at_the_tax_due() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::NonFiling,
            months_late: 96,
            is_voluntary: false,
            payment_timeline_days: 0,
        };
        let result = penalties(&rates(), 10_000.0, &scenario);
        assert_close(result.surcharge, 10_000.0);
    }

    #[test]
    fn zero_tax_due_accrues_no_surcharge_or_penalty() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::NonFiling,
            months_late: 6,
            is_voluntary: false,
            payment_timeline_days: 0,
        };
        let result = penalties(&rates(), 0.0, &scenario);
        assert_close(result.surcharge, 0.0);
        assert_close(result.penalty, 0.0);
        assert_close(result.total_due, 0.0);
    }

    #[test]
    fn late_filing_fine_applies_even_with_nothing_owed() {
        let scenario = PenaltyScenario {
            kind: PenaltyKind::LateFiling,
            months_late: 1,
            is_voluntary: false,
            payment_timeline_days: 0,
        };
        let result = penalties(&rates(), 0.0, &scenario);
        assert_close(result.criminal_fine, 1_000.0);
        assert_close(result.total_due, 1_000.0);
    }
}
