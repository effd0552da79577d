//! Settlement planning: turning balances into debtor → creditor transfers.

pub mod planner;
pub mod summary;
pub mod transfer;
