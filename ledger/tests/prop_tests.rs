//! Property tests for ledger accounting invariants.

use agora_ledger::{BalanceEntry, VotingPowerLedger};
use agora_types::{Address, Timestamp};
use proptest::prelude::*;

const ADMIN: u8 = 1;
const REGISTRAR: u8 = 2;

fn make_ledger() -> VotingPowerLedger {
    agora_utils::init_test_tracing();
    VotingPowerLedger::new(Address::from_seed(ADMIN), Address::from_seed(REGISTRAR))
}

proptest! {
    /// An account's balance is always its most recently set absolute
    /// value, and total supply is always the sum of all balances.
    #[test]
    fn register_sequences_preserve_supply(
        ops in prop::collection::vec((0u8..8, 0u128..1_000_000), 1..50)
    ) {
        let mut ledger = make_ledger();
        let mut expected = [0u128; 8];
        for (i, (slot, balance)) in ops.iter().enumerate() {
            let account = Address::from_seed(10 + slot);
            ledger
                .register_voting_power(
                    Address::from_seed(REGISTRAR),
                    &[BalanceEntry { account, new_balance: *balance }],
                    Timestamp::new(1000 + i as u64),
                )
                .unwrap();
            expected[*slot as usize] = *balance;
        }
        for (slot, balance) in expected.iter().enumerate() {
            prop_assert_eq!(ledger.get_votes(Address::from_seed(10 + slot as u8)), *balance);
        }
        prop_assert_eq!(ledger.total_supply(), expected.iter().sum::<u128>());
    }

    /// `get_past_votes(T)` returns the balance from the latest checkpoint
    /// with timestamp ≤ T, for any query instant.
    #[test]
    fn past_votes_match_replayed_history(
        balances in prop::collection::vec(0u128..1_000_000, 1..30),
        query_offset in 0u64..40,
    ) {
        let mut ledger = make_ledger();
        let account = Address::from_seed(10);
        // One checkpoint per second starting at t=1000.
        for (i, balance) in balances.iter().enumerate() {
            ledger
                .register_voting_power(
                    Address::from_seed(REGISTRAR),
                    &[BalanceEntry { account, new_balance: *balance }],
                    Timestamp::new(1000 + i as u64),
                )
                .unwrap();
        }
        let now = Timestamp::new(1000 + balances.len() as u64 + 100);
        let query = Timestamp::new(1000 + query_offset);

        // Replay: the expected value is the last balance set at or before
        // the query instant.
        let mut expected = 0u128;
        for (i, balance) in balances.iter().enumerate() {
            if 1000 + i as u64 <= query.as_secs() {
                expected = *balance;
            }
        }
        prop_assert_eq!(ledger.get_past_votes(account, query, now).unwrap(), expected);
    }
}
