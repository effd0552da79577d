use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Net position of each participant: what they paid minus their fair share.
///
/// A positive balance means the participant is owed money (creditor).
/// A negative balance means the participant owes money (debtor).
///
/// Entries keep insertion order, which is the roster order for balances
/// derived from a ledger. The settlement planner walks creditors and debtors
/// in this order, so the same map always yields the same plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceMap {
    #[serde(with = "entries_serde")]
    entries: Vec<(ParticipantId, Decimal)>,
}

/// Serializes as a JSON object keyed by participant, preserving order.
mod entries_serde {
    use super::*;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;

    pub fn serialize<S: serde::Serializer>(
        entries: &[(ParticipantId, Decimal)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (participant, amount) in entries {
            map.serialize_entry(participant, amount)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(ParticipantId, Decimal)>, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = Vec<(ParticipantId, Decimal)>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of participant to balance")
            }
            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                let mut entries: Vec<(ParticipantId, Decimal)> = Vec::new();
                while let Some((participant, amount)) =
                    access.next_entry::<ParticipantId, Decimal>()?
                {
                    if entries.iter().any(|(p, _)| *p == participant) {
                        return Err(de::Error::custom(format!(
                            "duplicate participant: {participant}"
                        )));
                    }
                    entries.push((participant, amount));
                }
                Ok(entries)
            }
        }
        deserializer.deserialize_map(V)
    }
}

impl BalanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a participant's balance, keeping its original position if present.
    pub fn insert(&mut self, participant: ParticipantId, amount: Decimal) {
        match self.entries.iter_mut().find(|(p, _)| *p == participant) {
            Some((_, existing)) => *existing = amount,
            None => self.entries.push((participant, amount)),
        }
    }

    /// Balance of a participant; zero when absent.
    pub fn get(&self, participant: &ParticipantId) -> Decimal {
        self.entries
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, v)| *v)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.entries.iter().any(|(p, _)| p == participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> + '_ {
        self.entries.iter().map(|(p, v)| (p, *v))
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.entries.iter().map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances. Zero for any map derived from a ledger.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|(_, v)| *v).sum()
    }

    /// Whether the balances sum to zero within `tolerance`.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.total().abs() <= tolerance
    }

    /// Participants who are owed money, with the amount owed to them.
    pub fn creditors(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> + '_ {
        self.iter().filter(|(_, v)| *v > Decimal::ZERO)
    }

    /// Participants who owe money, with the (positive) amount they owe.
    pub fn debtors(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> + '_ {
        self.iter()
            .filter(|(_, v)| *v < Decimal::ZERO)
            .map(|(p, v)| (p, v.abs()))
    }

    /// Total owed to creditors (equal to the total owed by debtors when balanced).
    pub fn total_outstanding(&self) -> Decimal {
        self.creditors().map(|(_, v)| v).sum()
    }

    /// Whether every balance is within `tolerance` of zero.
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.entries.iter().all(|(_, v)| v.abs() <= tolerance)
    }
}

impl FromIterator<(ParticipantId, Decimal)> for BalanceMap {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        let mut map = BalanceMap::new();
        for (participant, amount) in iter {
            map.insert(participant, amount);
        }
        map
    }
}

impl fmt::Display for BalanceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (participant, amount) in self.iter() {
            let status = if amount > Decimal::ZERO {
                "CREDITOR"
            } else if amount < Decimal::ZERO {
                "DEBTOR"
            } else {
                "SETTLED"
            };
            writeln!(f, "  {:<15} {:>12}  [{}]", participant.as_str(), amount, status)?;
        }
        Ok(())
    }
}
