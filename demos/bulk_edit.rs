//! Editing logged expenses by replacing the whole record set, and the
//! all-or-nothing behaviour when an edit is invalid.
//!
//! Run with `cargo run --example bulk_edit`.

use expense_ledger::core::expense::ExpenseRecord;
use expense_ledger::core::ledger::Ledger;
use expense_ledger::settlement::planner::plan;
use rust_decimal_macros::dec;

fn main() {
    let mut ledger = Ledger::new(["A", "B", "C"]);
    let taxi = ledger
        .add(ExpenseRecord::new(dec!(30), "A", ["A", "B", "C"]).with_description("taxi"))
        .expect("valid record");
    ledger
        .add(ExpenseRecord::new(dec!(100), "B", ["A", "B", "C"]).with_description("groceries"))
        .expect("valid record");

    println!("━━━ Before edit ━━━\n{}", ledger.balances());

    // The taxi was actually 45 and C didn't ride along.
    let mut edited = ledger.records().to_vec();
    if let Some(record) = edited.iter_mut().find(|r| r.id() == taxi) {
        *record = ExpenseRecord::with_id(taxi, dec!(45), "A", ["A", "B"]).with_description("taxi");
    }
    ledger.replace_all(edited.clone()).expect("edited records are valid");
    println!("━━━ After edit ━━━\n{}", ledger.balances());

    // An edit that names someone outside the group is refused wholesale.
    edited.push(ExpenseRecord::new(dec!(12), "C", ["Stranger"]));
    match ledger.replace_all(edited) {
        Ok(()) => println!("unexpectedly accepted"),
        Err(e) => println!("edit refused: {}\n", e),
    }

    match plan(&ledger.balances()) {
        Ok(plan) => print!("{}", plan),
        Err(e) => eprintln!("cannot settle: {}", e),
    }
}
