//! A restaurant evening: who ate what, who paid, and who owes whom.
//!
//! Run with `cargo run --example dinner_split`.

use expense_ledger::core::expense::ExpenseRecord;
use expense_ledger::core::ledger::Ledger;
use expense_ledger::settlement::planner::SettlementPlanner;
use expense_ledger::settlement::summary::LedgerSummary;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  expense-ledger: Dinner Split Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut ledger = Ledger::new(["Masha", "Petya", "Olya", "Dima"]);

    let orders = [
        ExpenseRecord::new(dec!(1250), "Masha", ["Masha", "Petya", "Olya", "Dima"])
            .with_description("Pizza Margherita x2"),
        ExpenseRecord::new(dec!(640), "Petya", ["Petya", "Dima"]).with_description("Caesar salad"),
        ExpenseRecord::new(dec!(900), "Olya", ["Masha", "Olya"]).with_description("Tiramisu"),
        ExpenseRecord::new(dec!(1000), "Masha", ["Petya", "Olya", "Dima"]).with_description("Wine"),
    ];
    for order in orders {
        let description = order.description().to_string();
        match ledger.add(order) {
            Ok(_) => println!("  added: {}", description),
            Err(e) => println!("  rejected {}: {}", description, e),
        }
    }
    println!();

    // A mistyped order is rejected and the ledger is unchanged.
    if let Err(e) = ledger.add(ExpenseRecord::new(dec!(300), "Kolya", ["Masha"])) {
        println!("  rejected typo: {}\n", e);
    }

    let balances = ledger.balances();
    println!("━━━ Balances ━━━\n");
    print!("{}", balances);
    println!();

    let plan = match SettlementPlanner::default().plan(&balances) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("cannot settle: {}", e);
            return;
        }
    };

    println!("{}", LedgerSummary::from_ledger(&ledger).with_plan(&plan));
    print!("{}", plan);
}
