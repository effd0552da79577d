//! # expense-ledger
//!
//! Shared group expense ledger with equal-split balances and settlement
//! planning.
//!
//! Record who paid for what and who shared it; the ledger derives each
//! participant's balance (paid minus fair share) and the planner turns those
//! balances into a short list of debtor → creditor transfers.
//!
//! ## Architecture
//!
//! - **core** — Participants, expense records, balance maps, the ledger and
//!   money rounding
//! - **settlement** — Greedy settlement planner, transfers and summaries
//! - **simulation** — Random group generation for testing and benchmarks
//!
//! The ledger never depends on the planner, and the planner only sees a
//! [`BalanceMap`](core::balance::BalanceMap). Neither performs I/O.
//!
//! ```
//! use expense_ledger::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let mut ledger = Ledger::new(["A", "B"]);
//! ledger.add(ExpenseRecord::new(dec!(90), "A", ["A", "B"])).unwrap();
//! ledger.add(ExpenseRecord::new(dec!(60), "B", ["A", "B"])).unwrap();
//!
//! let plan = SettlementPlanner::default().plan(&ledger.balances()).unwrap();
//! assert_eq!(plan.len(), 1);
//! assert_eq!(plan.transfers()[0].amount, dec!(15));
//! ```

pub mod core;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::BalanceMap;
    pub use crate::core::expense::{ExpenseRecord, RecordViolation};
    pub use crate::core::ledger::{Ledger, LedgerError};
    pub use crate::core::participant::ParticipantId;
    pub use crate::settlement::planner::{PlannerConfig, SettlementError, SettlementPlanner};
    pub use crate::settlement::summary::LedgerSummary;
    pub use crate::settlement::transfer::{SettlementPlan, Transfer};
}
