//! Foundational types: participants, expense records, balances and the ledger.

pub mod balance;
pub mod expense;
pub mod ledger;
pub mod participant;
pub mod rounding;
