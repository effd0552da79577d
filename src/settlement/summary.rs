use crate::core::ledger::Ledger;
use crate::core::participant::ParticipantId;
use crate::core::rounding::round_money;
use crate::settlement::transfer::SettlementPlan;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What one participant paid, consumed and is owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub participant: ParticipantId,
    pub paid: Decimal,
    /// Fair share of all expenses, rounded for display.
    pub share: Decimal,
    pub balance: Decimal,
}

/// Read-only report over a ledger and, optionally, its settlement plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_spent: Decimal,
    pub expense_count: usize,
    /// One row per roster member, in roster order.
    pub participants: Vec<ParticipantSummary>,
    pub transfer_count: Option<usize>,
    pub transfer_volume: Option<Decimal>,
}

impl LedgerSummary {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let balances = ledger.balances();
        let participants = ledger
            .paid_totals()
            .into_iter()
            .zip(ledger.share_totals())
            .map(|((participant, paid), (_, share))| ParticipantSummary {
                balance: balances.get(&participant),
                share: round_money(share, ledger.scale()),
                participant,
                paid,
            })
            .collect();

        LedgerSummary {
            total_spent: ledger.total_spent(),
            expense_count: ledger.len(),
            participants,
            transfer_count: None,
            transfer_volume: None,
        }
    }

    /// Attach the size of a settlement plan to the report.
    pub fn with_plan(mut self, plan: &SettlementPlan) -> Self {
        self.transfer_count = Some(plan.len());
        self.transfer_volume = Some(plan.total_volume());
        self
    }

    /// Total spent divided evenly over the whole roster.
    pub fn average_per_participant(&self) -> Decimal {
        if self.participants.is_empty() {
            return Decimal::ZERO;
        }
        self.total_spent / Decimal::from(self.participants.len())
    }

    pub fn participant(&self, participant: &ParticipantId) -> Option<&ParticipantSummary> {
        self.participants.iter().find(|p| &p.participant == participant)
    }

    /// Fraction of the total a participant consumed, in `[0, 1]`.
    pub fn share_ratio(&self, participant: &ParticipantId) -> f64 {
        if self.total_spent == Decimal::ZERO {
            return 0.0;
        }
        self.participant(participant)
            .and_then(|p| (p.share / self.total_spent).to_f64())
            .unwrap_or(0.0)
    }
}

impl std::fmt::Display for LedgerSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Group Summary ===")?;
        writeln!(f, "Expenses:    {}", self.expense_count)?;
        writeln!(f, "Total spent: {}", self.total_spent)?;
        writeln!(f, "Average:     {}", self.average_per_participant().round_dp(2))?;

        writeln!(f, "\n{:<15} {:>12} {:>12} {:>12}", "Participant", "Paid", "Share", "Balance")?;
        for row in &self.participants {
            writeln!(
                f,
                "{:<15} {:>12} {:>12} {:>12}",
                row.participant.as_str(),
                row.paid,
                row.share,
                row.balance
            )?;
        }

        if let (Some(count), Some(volume)) = (self.transfer_count, self.transfer_volume) {
            writeln!(f, "\nTransfers needed: {} (volume {})", count, volume)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::ExpenseRecord;
    use crate::settlement::planner::plan;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn dinner() -> Ledger {
        let mut ledger = Ledger::new(["A", "B", "C"]);
        ledger
            .add(ExpenseRecord::new(dec!(300), "A", ["A", "B", "C"]))
            .unwrap();
        ledger.add(ExpenseRecord::new(dec!(60), "B", ["B", "C"])).unwrap();
        ledger
    }

    #[test]
    fn test_summary_rows() {
        let summary = LedgerSummary::from_ledger(&dinner());
        assert_eq!(summary.total_spent, dec!(360));
        assert_eq!(summary.expense_count, 2);
        assert_eq!(
            summary.participant(&ParticipantId::new("C")),
            Some(&ParticipantSummary {
                participant: ParticipantId::new("C"),
                paid: Decimal::ZERO,
                share: dec!(130),
                balance: dec!(-130),
            })
        );
        assert_eq!(summary.average_per_participant(), dec!(120));
    }

    #[test]
    fn test_share_ratios_sum_to_one() {
        let summary = LedgerSummary::from_ledger(&dinner());
        let total: f64 = ["A", "B", "C"]
            .iter()
            .map(|p| summary.share_ratio(&ParticipantId::new(*p)))
            .sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        assert_relative_eq!(summary.share_ratio(&ParticipantId::new("A")), 100.0 / 360.0, epsilon = 1e-9);
        assert_eq!(summary.share_ratio(&ParticipantId::new("Z")), 0.0);
    }

    #[test]
    fn test_with_plan() {
        let ledger = dinner();
        let plan = plan(&ledger.balances()).unwrap();
        let summary = LedgerSummary::from_ledger(&ledger).with_plan(&plan);
        assert_eq!(summary.transfer_count, Some(2));
        assert_eq!(summary.transfer_volume, Some(dec!(200)));
        assert!(summary.to_string().contains("Transfers needed: 2"));
    }

    #[test]
    fn test_empty_ledger_summary() {
        let summary = LedgerSummary::from_ledger(&Ledger::default());
        assert_eq!(summary.average_per_participant(), Decimal::ZERO);
        assert!(summary.participants.is_empty());
    }
}
