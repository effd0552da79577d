use expense_ledger::core::expense::ExpenseRecord;
use expense_ledger::core::ledger::Ledger;
use expense_ledger::core::participant::ParticipantId;
use expense_ledger::settlement::planner::{PlannerConfig, SettlementPlanner};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const ROSTER: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Pick a participant from the fixed roster.
fn arb_participant() -> impl Strategy<Value = ParticipantId> {
    prop::sample::select(ROSTER.to_vec()).prop_map(|name| ParticipantId::new(name))
}

/// A positive amount in cents, from 0.01 to 10,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A valid expense: known payer, non-empty subset of the roster.
fn arb_expense() -> impl Strategy<Value = ExpenseRecord> {
    (
        arb_amount(),
        arb_participant(),
        prop::sample::subsequence(ROSTER.to_vec(), 1..=ROSTER.len()),
    )
        .prop_map(|(amount, payer, beneficiaries)| {
            ExpenseRecord::new(amount, payer, beneficiaries)
        })
}

fn arb_expenses() -> impl Strategy<Value = Vec<ExpenseRecord>> {
    prop::collection::vec(arb_expense(), 0..40)
}

fn ledger_with(records: Vec<ExpenseRecord>) -> Ledger {
    let mut ledger = Ledger::new(ROSTER);
    ledger.replace_all(records).unwrap();
    ledger
}

proptest! {
    // ===================================================================
    // Balances always sum to zero.
    //
    // Whatever the split, money is only moved between participants:
    // total paid equals total shared, after rounding too.
    // ===================================================================
    #[test]
    fn balances_sum_to_zero(records in arb_expenses()) {
        let balances = ledger_with(records).balances();
        prop_assert!(
            balances.total().abs() <= dec!(0.000001),
            "balances must sum to zero, got {}",
            balances.total()
        );
    }

    // ===================================================================
    // Rounded balances stay within one cent of the exact figure.
    // ===================================================================
    #[test]
    fn rounding_moves_at_most_one_cent(records in arb_expenses()) {
        let ledger = ledger_with(records);
        let balances = ledger.balances();
        let paid = ledger.paid_totals();
        let share = ledger.share_totals();
        for ((participant, p), (_, s)) in paid.into_iter().zip(share) {
            let exact = p - s;
            let rounded = balances.get(&participant);
            prop_assert!(
                (exact - rounded).abs() <= dec!(0.01),
                "{} exact {} rounded {}",
                participant, exact, rounded
            );
        }
    }

    // ===================================================================
    // Executing the plan settles everyone.
    // ===================================================================
    #[test]
    fn plan_settles_every_balance(records in arb_expenses()) {
        let balances = ledger_with(records).balances();
        let plan = SettlementPlanner::default().plan(&balances).unwrap();
        let after = plan.apply_to(&balances);
        prop_assert!(
            after.is_settled(PlannerConfig::default().min_transfer),
            "unsettled after plan: {:?}",
            after
        );
        prop_assert_eq!(plan.unsettled_dust(), Decimal::ZERO);
    }

    // ===================================================================
    // No one pays themselves, and every transfer is positive.
    // ===================================================================
    #[test]
    fn transfers_are_between_distinct_participants(records in arb_expenses()) {
        let balances = ledger_with(records).balances();
        let plan = SettlementPlanner::default().plan(&balances).unwrap();
        for transfer in plan.transfers() {
            prop_assert_ne!(&transfer.from, &transfer.to);
            prop_assert!(transfer.amount > Decimal::ZERO);
        }
    }

    // ===================================================================
    // The plan never needs more than n - 1 transfers, and moves exactly
    // what creditors are owed.
    // ===================================================================
    #[test]
    fn plan_is_compact(records in arb_expenses()) {
        let balances = ledger_with(records).balances();
        let plan = SettlementPlanner::default().plan(&balances).unwrap();
        let non_zero = balances.iter().filter(|(_, v)| !v.is_zero()).count();
        prop_assert!(plan.len() <= non_zero.saturating_sub(1));
        prop_assert_eq!(plan.total_volume(), balances.total_outstanding());
    }

    // ===================================================================
    // Replacing the records with the same records changes nothing.
    // ===================================================================
    #[test]
    fn replace_all_is_idempotent(records in arb_expenses()) {
        let mut ledger = Ledger::new(ROSTER);
        ledger.replace_all(records.clone()).unwrap();
        let first = ledger.balances();
        ledger.replace_all(records).unwrap();
        prop_assert_eq!(ledger.balances(), first);
    }

    // ===================================================================
    // Planning is deterministic.
    // ===================================================================
    #[test]
    fn planning_is_deterministic(records in arb_expenses()) {
        let balances = ledger_with(records).balances();
        let planner = SettlementPlanner::default();
        prop_assert_eq!(planner.plan(&balances).unwrap(), planner.plan(&balances).unwrap());
    }

    // ===================================================================
    // Removing a record undoes exactly its effect.
    // ===================================================================
    #[test]
    fn add_then_remove_restores_balances(
        records in arb_expenses(),
        extra in arb_expense(),
    ) {
        let mut ledger = ledger_with(records);
        let before = ledger.balances();
        let id = ledger.add(extra).unwrap();
        ledger.remove(id);
        prop_assert_eq!(ledger.balances(), before);
    }
}
