use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a group member who can pay for or benefit from an expense.
///
/// Identifiers are opaque: the ledger only compares them for equality and
/// keeps them in order of first appearance for display.
///
/// # Examples
///
/// ```
/// use expense_ledger::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new("alice");
/// let bob = ParticipantId::from("bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&ParticipantId> for ParticipantId {
    fn from(id: &ParticipantId) -> Self {
        id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_equality() {
        let a = ParticipantId::new("alice");
        let b = ParticipantId::from(String::from("alice"));
        let c = ParticipantId::new("bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_participant_display() {
        let p = ParticipantId::new("Участник 1");
        assert_eq!(p.to_string(), "Участник 1");
    }

    #[test]
    fn test_participant_serializes_as_plain_string() {
        let json = serde_json::to_string(&ParticipantId::new("alice")).unwrap();
        assert_eq!(json, "\"alice\"");
    }
}
