use crate::core::participant::ParticipantId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Largest amount a single expense may have (one quadrillion).
///
/// `Decimal` tops out near 7.9e28, so a ledger would need more than 7.9e13
/// records at this cap before any paid, share or balance total overflowed.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);

/// Why an expense record cannot enter a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordViolation {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("amount {0} exceeds the maximum of {max}", max = MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("payer {0} is not a participant of this ledger")]
    UnknownPayer(ParticipantId),
    #[error("expense has no participants to split between")]
    NoBeneficiaries,
    #[error("participant {0} is not a participant of this ledger")]
    UnknownBeneficiary(ParticipantId),
}

/// One logged group expense: `payer` fronted `amount` on behalf of
/// `participants`, who split it equally.
///
/// The payer may or may not be one of the participants. Description and date
/// are carried for display only and never affect balances.
///
/// # Examples
///
/// ```
/// use expense_ledger::core::expense::ExpenseRecord;
/// use rust_decimal_macros::dec;
///
/// let pizza = ExpenseRecord::new(dec!(24.90), "alice", ["alice", "bob"])
///     .with_description("Pizza Margherita");
///
/// assert_eq!(pizza.amount(), dec!(24.90));
/// assert_eq!(pizza.fair_share(), dec!(12.45));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Stored records without an id are given a fresh one.
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    amount: Decimal,
    payer: ParticipantId,
    /// Who benefited from the expense.
    participants: BTreeSet<ParticipantId>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    date: Option<NaiveDate>,
}

impl ExpenseRecord {
    /// Create a record with a fresh id. Nothing is validated until the
    /// record is handed to a ledger.
    pub fn new<P, I>(amount: Decimal, payer: impl Into<ParticipantId>, participants: I) -> Self
    where
        P: Into<ParticipantId>,
        I: IntoIterator<Item = P>,
    {
        Self::with_id(Uuid::new_v4(), amount, payer, participants)
    }

    /// Create a record with a specific id (useful for testing / determinism).
    pub fn with_id<P, I>(
        id: Uuid,
        amount: Decimal,
        payer: impl Into<ParticipantId>,
        participants: I,
    ) -> Self
    where
        P: Into<ParticipantId>,
        I: IntoIterator<Item = P>,
    {
        Self {
            id,
            amount,
            payer: payer.into(),
            participants: participants.into_iter().map(Into::into).collect(),
            description: String::new(),
            date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn participants(&self) -> &BTreeSet<ParticipantId> {
        &self.participants
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Whether `participant` paid for or benefited from this expense.
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.payer == participant || self.participants.contains(participant)
    }

    /// Unrounded amount each participant owes for this expense.
    /// Zero when there is nobody to split between.
    pub fn fair_share(&self) -> Decimal {
        if self.participants.is_empty() {
            return Decimal::ZERO;
        }
        self.amount / Decimal::from(self.participants.len())
    }

    /// Check the record against a roster of known participants.
    pub fn validate(&self, roster: &HashSet<ParticipantId>) -> Result<(), RecordViolation> {
        if self.amount <= Decimal::ZERO {
            return Err(RecordViolation::NonPositiveAmount(self.amount));
        }
        if self.amount > MAX_AMOUNT {
            return Err(RecordViolation::AmountTooLarge(self.amount));
        }
        if !roster.contains(&self.payer) {
            return Err(RecordViolation::UnknownPayer(self.payer.clone()));
        }
        if self.participants.is_empty() {
            return Err(RecordViolation::NoBeneficiaries);
        }
        if let Some(unknown) = self.participants.iter().find(|p| !roster.contains(*p)) {
            return Err(RecordViolation::UnknownBeneficiary(unknown.clone()));
        }
        Ok(())
    }
}
