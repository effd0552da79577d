use crate::core::balance::BalanceMap;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A payment `from` a debtor `to` a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Always positive.
    pub amount: Decimal,
}

impl Transfer {
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        debug_assert!(from != to, "self-transfer from {from}");
        debug_assert!(amount > Decimal::ZERO, "transfer amount must be positive");
        Self { from, to, amount }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}: {}", self.from, self.to, self.amount)
    }
}

/// The transfers that settle a balance map, in the order they were matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    transfers: Vec<Transfer>,
    /// Value left unsettled because it was below the minimum transfer size
    /// or had no counterparty.
    unsettled_dust: Decimal,
}

impl SettlementPlan {
    pub(crate) fn new(transfers: Vec<Transfer>, unsettled_dust: Decimal) -> Self {
        Self {
            transfers,
            unsettled_dust,
        }
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn into_transfers(self) -> Vec<Transfer> {
        self.transfers
    }

    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Total money moved by the plan.
    pub fn total_volume(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    pub fn unsettled_dust(&self) -> Decimal {
        self.unsettled_dust
    }

    /// Balances after every transfer has been paid: each debtor's balance
    /// rises by what they sent, each creditor's falls by what they received.
    pub fn apply_to(&self, balances: &BalanceMap) -> BalanceMap {
        let mut after = balances.clone();
        for transfer in &self.transfers {
            let from = after.get(&transfer.from) + transfer.amount;
            after.insert(transfer.from.clone(), from);
            let to = after.get(&transfer.to) - transfer.amount;
            after.insert(transfer.to.clone(), to);
        }
        after
    }
}

impl fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement Plan ===")?;
        if self.transfers.is_empty() {
            writeln!(f, "Nothing to settle.")?;
        }
        for transfer in &self.transfers {
            writeln!(f, "  {}", transfer)?;
        }
        writeln!(f, "Transfers: {}", self.transfers.len())?;
        writeln!(f, "Volume:    {}", self.total_volume())?;
        if self.unsettled_dust > Decimal::ZERO {
            writeln!(f, "Unsettled: {}", self.unsettled_dust)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transfer_display() {
        let t = Transfer::new(ParticipantId::new("B"), ParticipantId::new("A"), dec!(15));
        assert_eq!(t.to_string(), "B → A: 15");
    }

    #[test]
    fn test_apply_to_zeroes_balances() {
        let balances: BalanceMap = [
            (ParticipantId::new("A"), dec!(200)),
            (ParticipantId::new("B"), dec!(-100)),
            (ParticipantId::new("C"), dec!(-100)),
        ]
        .into_iter()
        .collect();
        let plan = SettlementPlan::new(
            vec![
                Transfer::new(ParticipantId::new("B"), ParticipantId::new("A"), dec!(100)),
                Transfer::new(ParticipantId::new("C"), ParticipantId::new("A"), dec!(100)),
            ],
            Decimal::ZERO,
        );
        assert_eq!(plan.total_volume(), dec!(200));
        assert!(plan.apply_to(&balances).is_settled(Decimal::ZERO));
    }

    #[test]
    fn test_empty_plan_display() {
        let plan = SettlementPlan::default();
        assert!(plan.is_empty());
        assert!(plan.to_string().contains("Nothing to settle."));
    }
}
