//! Random group generation for benchmarks, property checks and the CLI
//! `generate` command.

use crate::core::expense::ExpenseRecord;
use crate::core::ledger::Ledger;
use crate::core::participant::ParticipantId;
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of participants on the roster.
    pub participant_count: usize,
    /// Number of expenses to log.
    pub expense_count: usize,
    /// Minimum expense amount.
    pub min_amount: Decimal,
    /// Maximum expense amount.
    pub max_amount: Decimal,
    /// Fewest participants sharing one expense.
    pub min_beneficiaries: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 4,
            expense_count: 12,
            min_amount: Decimal::from(5),
            max_amount: Decimal::from(500),
            min_beneficiaries: 1,
        }
    }
}

/// Generate a ledger whose records are all valid for its roster.
///
/// Amounts are whole cents between `min_amount` and `max_amount`; each
/// expense is shared by a random non-empty subset of the roster.
pub fn generate_random_ledger(config: &GroupConfig) -> Ledger {
    let mut rng = rand::thread_rng();

    let participants: Vec<ParticipantId> = (0..config.participant_count)
        .map(|i| ParticipantId::new(format!("P{:03}", i + 1)))
        .collect();
    let mut ledger = Ledger::new(participants.iter().cloned());
    if participants.is_empty() {
        return ledger;
    }

    // Work in cents so every amount lands on the ledger scale.
    let min_cents = (config.min_amount * Decimal::from(100)).trunc();
    let max_cents = (config.max_amount * Decimal::from(100)).trunc();
    let min_cents = min_cents.to_i64().unwrap_or(1).max(1);
    let max_cents = max_cents.to_i64().unwrap_or(min_cents).max(min_cents);

    let min_beneficiaries = config.min_beneficiaries.clamp(1, participants.len());
    let first_day = NaiveDate::from_ymd_opt(2024, 1, 1);

    for day in 0..config.expense_count {
        let amount = Decimal::new(rng.gen_range(min_cents..=max_cents), 2);
        let payer = participants[rng.gen_range(0..participants.len())].clone();
        let count = rng.gen_range(min_beneficiaries..=participants.len());
        let beneficiaries: Vec<ParticipantId> = participants
            .choose_multiple(&mut rng, count)
            .cloned()
            .collect();

        let mut record = ExpenseRecord::new(amount, payer, beneficiaries)
            .with_description(format!("expense #{}", day + 1));
        if let Some(date) = first_day.and_then(|d| d.checked_add_signed(Duration::days(day as i64))) {
            record = record.with_date(date);
        }

        // Generated records are valid by construction.
        if let Err(e) = ledger.add(record) {
            log::warn!("generator: skipped invalid record: {}", e);
        }
    }

    ledger
}
