//! Synthetic data for exercising the ledger and planner.

pub mod generator;
