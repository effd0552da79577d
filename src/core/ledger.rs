use crate::core::balance::BalanceMap;
use crate::core::expense::{ExpenseRecord, RecordViolation};
use crate::core::participant::ParticipantId;
use crate::core::rounding::{clamp_scale, quantize_zero_sum, DEFAULT_SCALE};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by ledger mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A record failed validation. `index` is the position the record holds
    /// (or would have held) in the ledger.
    #[error("invalid expense record at position {index}: {reason}")]
    InvalidRecord {
        index: usize,
        reason: RecordViolation,
    },
    #[error("participant {participant} is referenced by {records} expense record(s)")]
    ParticipantInUse {
        participant: ParticipantId,
        records: usize,
    },
}

/// The authoritative collection of expense records for one group.
///
/// A ledger owns a roster of participants and an ordered list of expense
/// records that only reference roster members. Balances are always derived
/// from the current records; nothing is cached between calls.
///
/// Not internally synchronized: a host sharing a ledger between threads
/// wraps it in its own lock.
///
/// # Examples
///
/// ```
/// use expense_ledger::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = Ledger::new(["A", "B", "C"]);
/// ledger.add(ExpenseRecord::new(dec!(300), "A", ["A", "B", "C"])).unwrap();
///
/// let balances = ledger.balances();
/// assert_eq!(balances.get(&ParticipantId::new("A")), dec!(200));
/// assert_eq!(balances.get(&ParticipantId::new("B")), dec!(-100));
/// ```
///
/// Deserializing rebuilds the ledger through [`Ledger::replace_all`], so a
/// stored record that breaks the roster rules is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LedgerData")]
pub struct Ledger {
    /// Roster in order of first appearance.
    participants: Vec<ParticipantId>,
    records: Vec<ExpenseRecord>,
    /// Fractional digits balances are rounded to.
    scale: u32,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            participants: Vec::new(),
            records: Vec::new(),
            scale: DEFAULT_SCALE,
        }
    }
}

/// Unvalidated wire form of a [`Ledger`].
#[derive(Deserialize)]
struct LedgerData {
    #[serde(default)]
    participants: Vec<ParticipantId>,
    #[serde(default)]
    records: Vec<ExpenseRecord>,
    #[serde(default = "default_scale")]
    scale: u32,
}

fn default_scale() -> u32 {
    DEFAULT_SCALE
}

impl TryFrom<LedgerData> for Ledger {
    type Error = LedgerError;

    fn try_from(data: LedgerData) -> Result<Self, Self::Error> {
        let mut ledger = Ledger::new(data.participants).with_scale(data.scale);
        ledger.replace_all(data.records)?;
        Ok(ledger)
    }
}

impl Ledger {
    /// Create an empty ledger over a roster. Duplicate names are collapsed.
    pub fn new<P, I>(participants: I) -> Self
    where
        P: Into<ParticipantId>,
        I: IntoIterator<Item = P>,
    {
        let mut ledger = Self::default();
        for participant in participants {
            ledger.add_participant(participant);
        }
        ledger
    }

    /// Round balances to `scale` fractional digits instead of cents.
    ///
    /// Scales beyond what `Decimal` can represent are capped at
    /// [`MAX_SCALE`](crate::core::rounding::MAX_SCALE).
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = clamp_scale(scale);
        self
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    // --- Roster ---

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }

    /// Add a participant to the roster. Returns `false` if already present.
    pub fn add_participant(&mut self, participant: impl Into<ParticipantId>) -> bool {
        let participant = participant.into();
        if self.contains(&participant) {
            return false;
        }
        debug!("roster: adding participant {}", participant);
        self.participants.push(participant);
        true
    }

    /// Remove a participant who no expense record refers to.
    ///
    /// Returns `Ok(false)` if the participant was not on the roster.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> Result<bool, LedgerError> {
        let records = self.records.iter().filter(|r| r.involves(participant)).count();
        if records > 0 {
            warn!(
                "roster: refusing to remove {}, still used by {} record(s)",
                participant, records
            );
            return Err(LedgerError::ParticipantInUse {
                participant: participant.clone(),
                records,
            });
        }
        let before = self.participants.len();
        self.participants.retain(|p| p != participant);
        Ok(self.participants.len() != before)
    }

    fn roster(&self) -> HashSet<ParticipantId> {
        self.participants.iter().cloned().collect()
    }

    // --- Records ---

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&ExpenseRecord> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record after validating it against the roster.
    pub fn add(&mut self, record: ExpenseRecord) -> Result<Uuid, LedgerError> {
        let index = self.records.len();
        if let Err(reason) = record.validate(&self.roster()) {
            warn!("ledger: rejected expense {}: {}", record.id(), reason);
            return Err(LedgerError::InvalidRecord { index, reason });
        }
        let id = record.id();
        debug!(
            "ledger: added expense {} ({} paid by {} for {} participant(s))",
            id,
            record.amount(),
            record.payer(),
            record.participants().len()
        );
        self.records.push(record);
        Ok(id)
    }

    /// Remove the record with `id`, if any.
    pub fn remove(&mut self, id: Uuid) -> Option<ExpenseRecord> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.remove_index(index))
    }

    /// Remove the record at `index`, if in range.
    pub fn remove_at(&mut self, index: usize) -> Option<ExpenseRecord> {
        (index < self.records.len()).then(|| self.remove_index(index))
    }

    fn remove_index(&mut self, index: usize) -> ExpenseRecord {
        let record = self.records.remove(index);
        debug!("ledger: removed expense {} at position {}", record.id(), index);
        record
    }

    /// Remove every record matching `predicate`. Returns how many were removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&ExpenseRecord) -> bool,
    {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        let removed = before - self.records.len();
        if removed > 0 {
            debug!("ledger: removed {} expense(s) by predicate", removed);
        }
        removed
    }

    /// Remove every record, keeping the roster.
    pub fn clear(&mut self) {
        debug!("ledger: cleared {} expense(s)", self.records.len());
        self.records.clear();
    }

    /// Substitute the whole record collection.
    ///
    /// Every record is validated first. If any is invalid the ledger is left
    /// exactly as it was and the first offending position is reported.
    pub fn replace_all<I>(&mut self, records: I) -> Result<(), LedgerError>
    where
        I: IntoIterator<Item = ExpenseRecord>,
    {
        let records: Vec<ExpenseRecord> = records.into_iter().collect();
        let roster = self.roster();
        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = record.validate(&roster) {
                warn!(
                    "ledger: bulk replace rejected, record {} at position {}: {}",
                    record.id(),
                    index,
                    reason
                );
                return Err(LedgerError::InvalidRecord { index, reason });
            }
        }
        debug!(
            "ledger: replaced {} expense(s) with {}",
            self.records.len(),
            records.len()
        );
        self.records = records;
        Ok(())
    }

    // --- Derived totals ---

    /// Sum of every expense amount.
    pub fn total_spent(&self) -> Decimal {
        self.records.iter().map(|r| r.amount()).sum()
    }

    /// How much each roster member fronted, in roster order.
    pub fn paid_totals(&self) -> Vec<(ParticipantId, Decimal)> {
        let paid = self.accumulate_paid();
        self.in_roster_order(&paid)
    }

    /// Each roster member's unrounded fair share of all expenses, in roster order.
    pub fn share_totals(&self) -> Vec<(ParticipantId, Decimal)> {
        let share = self.accumulate_share();
        self.in_roster_order(&share)
    }

    fn accumulate_paid(&self) -> HashMap<&ParticipantId, Decimal> {
        let mut paid: HashMap<&ParticipantId, Decimal> = HashMap::new();
        for record in &self.records {
            *paid.entry(record.payer()).or_insert(Decimal::ZERO) += record.amount();
        }
        paid
    }

    fn accumulate_share(&self) -> HashMap<&ParticipantId, Decimal> {
        let mut share: HashMap<&ParticipantId, Decimal> = HashMap::new();
        for record in &self.records {
            let portion = record.fair_share();
            for participant in record.participants() {
                *share.entry(participant).or_insert(Decimal::ZERO) += portion;
            }
        }
        share
    }

    fn in_roster_order(&self, totals: &HashMap<&ParticipantId, Decimal>) -> Vec<(ParticipantId, Decimal)> {
        self.participants
            .iter()
            .map(|p| (p.clone(), totals.get(p).copied().unwrap_or(Decimal::ZERO)))
            .collect()
    }

    /// Net balance of every roster member: paid minus fair share.
    ///
    /// Shares are summed at full precision and rounded to the ledger scale
    /// once, at the end, so the balances always sum to exactly zero.
    pub fn balances(&self) -> BalanceMap {
        let paid = self.accumulate_paid();
        let share = self.accumulate_share();

        let raw: Vec<Decimal> = self
            .participants
            .iter()
            .map(|p| {
                paid.get(p).copied().unwrap_or(Decimal::ZERO)
                    - share.get(p).copied().unwrap_or(Decimal::ZERO)
            })
            .collect();

        self.participants
            .iter()
            .cloned()
            .zip(quantize_zero_sum(&raw, self.scale))
            .collect()
    }

    /// Balances of the named participants only, in the caller's order.
    ///
    /// Names missing from the roster report zero. An empty list gives an
    /// empty map.
    pub fn balances_of<'a, I>(&self, participants: I) -> BalanceMap
    where
        I: IntoIterator<Item = &'a ParticipantId>,
    {
        let all = self.balances();
        participants
            .into_iter()
            .map(|p| (p.clone(), all.get(p)))
            .collect()
    }
}
