use crate::core::balance::BalanceMap;
use crate::core::participant::ParticipantId;
use crate::core::rounding::{minor_unit, DEFAULT_SCALE};
use crate::settlement::transfer::{SettlementPlan, Transfer};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by the settlement planner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// The balances do not sum to zero, so no set of transfers can settle
    /// them. Balances derived from a ledger never trigger this.
    #[error("balances sum to {sum}, expected zero within {tolerance}")]
    UnbalancedInput { sum: Decimal, tolerance: Decimal },
}

/// Tuning knobs for [`SettlementPlanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Smallest transfer worth recording. Smaller remainders are reported as
    /// unsettled dust instead of becoming transfers.
    pub min_transfer: Decimal,
    /// How far from zero the balance total may be before the input is
    /// rejected as unbalanced.
    pub tolerance: Decimal,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            min_transfer: minor_unit(DEFAULT_SCALE),
            tolerance: dec!(0.000001),
        }
    }
}

impl PlannerConfig {
    /// Minimum transfer of one minor unit at `scale`.
    pub fn for_scale(scale: u32) -> Self {
        Self {
            min_transfer: minor_unit(scale),
            ..Self::default()
        }
    }
}

/// Turns a balance map into a list of debtor → creditor transfers.
///
/// # Algorithm
///
/// 1. Reject the input unless its balances sum to zero (within tolerance).
/// 2. Split participants into creditors (positive) and debtors (negative),
///    each in map order.
/// 3. For each creditor, take `min(creditor_remaining, debtor_remaining)`
///    from each debtor in turn until the creditor is paid.
///
/// This greedy matching settles everything but does not search for the
/// fewest possible transfers; with `n` non-zero balances it produces at most
/// `n - 1`.
///
/// # Limitations
///
/// `min_transfer` applies to each debtor/creditor pair, not to a
/// participant's whole balance. A creditor owed more than the minimum by many
/// debtors who each owe less than it (say `A: +0.03` against six debtors at
/// `-0.005`) receives no transfer at all. The whole amount is reported in
/// [`SettlementPlan::unsettled_dust`]. Ledger balances are whole minor units,
/// so this only arises for hand-built maps or a `min_transfer` above one
/// minor unit.
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: PlannerConfig,
}

impl SettlementPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plan(&self, balances: &BalanceMap) -> Result<SettlementPlan, SettlementError> {
        let sum = balances.total();
        if sum.abs() > self.config.tolerance {
            warn!(
                "settlement: refusing to plan, balances sum to {} (tolerance {})",
                sum, self.config.tolerance
            );
            return Err(SettlementError::UnbalancedInput {
                sum,
                tolerance: self.config.tolerance,
            });
        }

        let mut debtors: Vec<(&ParticipantId, Decimal)> = balances.debtors().collect();
        let mut transfers = Vec::new();
        let mut dust = Decimal::ZERO;

        for (creditor, owed) in balances.creditors() {
            let mut remaining = owed;
            for (debtor, debt) in debtors.iter_mut() {
                if remaining <= Decimal::ZERO {
                    break;
                }
                if *debt <= Decimal::ZERO {
                    continue;
                }
                let amount = remaining.min(*debt);
                if amount >= self.config.min_transfer {
                    transfers.push(Transfer::new((*debtor).clone(), creditor.clone(), amount));
                } else {
                    dust += amount;
                }
                remaining -= amount;
                *debt -= amount;
            }
            // Only reachable when the total was positive but within tolerance.
            dust += remaining.max(Decimal::ZERO);
        }
        dust += debtors.iter().map(|(_, d)| *d).sum::<Decimal>();

        if dust > Decimal::ZERO {
            debug!("settlement: {} left unsettled as dust", dust);
        }
        debug!(
            "settlement: {} transfer(s) for {} participant(s)",
            transfers.len(),
            balances.len()
        );
        Ok(SettlementPlan::new(transfers, dust))
    }
}

/// Plan with the default configuration.
pub fn plan(balances: &BalanceMap) -> Result<SettlementPlan, SettlementError> {
    SettlementPlanner::default().plan(balances)
}
