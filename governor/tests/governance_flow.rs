//! End-to-end lifecycle: governance enables the incentive hook through
//! the timelock, an epoch opens, depositors vote on a later proposal
//! during the lock phase, and bonuses pay out pro-rata among voters.

use agora_governor::{
    GovernorAction, GovernorConfig, ProposalGovernor, ProposalState, ProposerMode, VoteSupport,
};
use agora_ledger::{BalanceEntry, VotingPowerLedger};
use agora_timelock::{CallDispatcher, DispatchError, TimelockExecutor};
use agora_token::TokenLedger;
use agora_types::{hash_description, Address, Call, Timestamp};
use agora_vault::IncentiveVault;

const GOV: u8 = 1;
const TIMELOCK: u8 = 2;
const VAULT: u8 = 3;
const REG_TOKEN: u8 = 4;
const USD_TOKEN: u8 = 5;
const ADMIN: u8 = 6;
const PROPOSER: u8 = 7;
const ALICE: u8 = 10;
const BOB: u8 = 11;

fn addr(n: u8) -> Address {
    Address::from_seed(n)
}

fn ts(secs: u64) -> Timestamp {
    Timestamp::new(secs)
}

struct NullDispatcher;

impl CallDispatcher for NullDispatcher {
    fn dispatch(&mut self, _call: &Call) -> Result<(), DispatchError> {
        Ok(())
    }
}

/// Drive a proposal from creation through timelock execution. Assumes
/// voting_delay 100, voting_period 1000, min_delay 200, all relative to
/// `base`.
fn pass_proposal(
    governor: &mut ProposalGovernor,
    executor: &mut TimelockExecutor,
    ledger: &VotingPowerLedger,
    vault: Option<&mut IncentiveVault>,
    calls: &[Call],
    description: &str,
    base: u64,
) {
    let description_hash = hash_description(description);
    let id = governor
        .propose(addr(PROPOSER), calls, description, ts(base), ledger)
        .unwrap();
    governor
        .cast_vote(addr(ALICE), id, VoteSupport::For, ts(base + 500), ledger, vault)
        .unwrap();
    governor
        .queue(calls, description_hash, ts(base + 1_200), executor)
        .unwrap();
    governor
        .execute(
            calls,
            description_hash,
            ts(base + 1_500),
            executor,
            &mut NullDispatcher,
        )
        .unwrap();
    assert_eq!(
        governor.state(id, ts(base + 1_500)).unwrap(),
        ProposalState::Executed
    );
}

#[test]
fn test_full_governance_and_incentive_cycle() {
    agora_utils::init_test_tracing();
    let mut tokens = TokenLedger::new();
    let mut ledger = VotingPowerLedger::new(addr(ADMIN), addr(ADMIN));
    let mut executor = TimelockExecutor::new(
        addr(TIMELOCK),
        200,
        addr(ADMIN),
        &[addr(GOV)],
        &[addr(GOV)],
    );
    let mut governor = ProposalGovernor::new(
        addr(GOV),
        addr(TIMELOCK),
        addr(ADMIN),
        GovernorConfig {
            voting_delay: 100,
            voting_period: 1_000,
            proposal_threshold: 0,
            quorum: 0,
        },
        ProposerMode::RoleOnly,
    );
    governor
        .roles_mut()
        .grant(addr(ADMIN), agora_access::Capability::Proposer, addr(PROPOSER))
        .unwrap();
    let mut vault = IncentiveVault::new(
        addr(VAULT),
        addr(GOV),
        addr(REG_TOKEN),
        addr(ADMIN),
        addr(ADMIN),
    );

    ledger
        .register_voting_power(
            addr(ADMIN),
            &[
                BalanceEntry { account: addr(ALICE), new_balance: 1_000 },
                BalanceEntry { account: addr(BOB), new_balance: 3_000 },
            ],
            ts(1),
        )
        .unwrap();

    // Phase 1: turn the incentive hook on through governance itself.
    let enable_calls = vec![
        Call {
            target: addr(GOV),
            value: 0,
            payload: GovernorAction::SetIncentiveEnabled(true).encode(),
        },
        Call {
            target: addr(GOV),
            value: 0,
            payload: GovernorAction::SetIncentiveVault(addr(VAULT)).encode(),
        },
    ];
    pass_proposal(
        &mut governor,
        &mut executor,
        &ledger,
        None,
        &enable_calls,
        "enable vault incentives",
        10,
    );
    assert!(governor.incentive_enabled());
    assert_eq!(governor.incentive_vault(), Some(addr(VAULT)));

    // Phase 2: open an epoch, subscription [3000, 4000), locked until 8000.
    tokens.mint(addr(USD_TOKEN), addr(VAULT), 8_000).unwrap();
    vault
        .set_new_epoch(
            addr(ADMIN),
            ts(3_000),
            ts(4_000),
            ts(8_000),
            addr(USD_TOKEN),
            8_000,
            ts(2_000),
            &tokens,
        )
        .unwrap();
    tokens.mint(addr(REG_TOKEN), addr(ALICE), 1_000).unwrap();
    tokens.mint(addr(REG_TOKEN), addr(BOB), 3_000).unwrap();
    vault.deposit(addr(ALICE), 1_000, ts(3_100), &mut tokens).unwrap();
    vault.deposit(addr(BOB), 3_000, ts(3_200), &mut tokens).unwrap();
    assert_eq!(vault.current_total_deposit(), 4_000);

    // Phase 3: proposal voted during the lock phase; the governor reports
    // each effective vote to the vault.
    let grant_calls = vec![Call {
        target: addr(99),
        value: 0,
        payload: vec![0xAA],
    }];
    let description = "community grant #1";
    let description_hash = hash_description(description);
    let id = governor
        .propose(addr(PROPOSER), &grant_calls, description, ts(4_100), &ledger)
        .unwrap();
    governor
        .cast_vote(
            addr(ALICE),
            id,
            VoteSupport::For,
            ts(4_500),
            &ledger,
            Some(&mut vault),
        )
        .unwrap();
    governor
        .cast_vote(
            addr(BOB),
            id,
            VoteSupport::For,
            ts(4_600),
            &ledger,
            Some(&mut vault),
        )
        .unwrap();
    let epoch = vault.current_epoch();
    assert_eq!(vault.user_epoch_state(addr(ALICE), epoch).unwrap().vote_count, 1);
    assert_eq!(vault.user_epoch_state(addr(BOB), epoch).unwrap().vote_count, 1);

    governor
        .queue(&grant_calls, description_hash, ts(5_400), &mut executor)
        .unwrap();
    governor
        .execute(
            &grant_calls,
            description_hash,
            ts(5_700),
            &mut executor,
            &mut NullDispatcher,
        )
        .unwrap();

    // Phase 4: after the lock ends, principal and pro-rata bonus.
    assert_eq!(vault.calculate_bonus(addr(ALICE), epoch), 2_000);
    assert_eq!(vault.calculate_bonus(addr(BOB), epoch), 6_000);
    assert_eq!(
        vault.withdraw(addr(ALICE), epoch, ts(8_100), &mut tokens).unwrap(),
        1_000
    );
    assert_eq!(
        vault.claim_bonus(addr(ALICE), epoch, ts(8_100), &mut tokens).unwrap(),
        2_000
    );
    assert_eq!(
        vault.withdraw(addr(BOB), epoch, ts(8_200), &mut tokens).unwrap(),
        3_000
    );
    assert_eq!(
        vault.claim_bonus(addr(BOB), epoch, ts(8_200), &mut tokens).unwrap(),
        6_000
    );

    assert_eq!(tokens.balance_of(addr(REG_TOKEN), addr(ALICE)), 1_000);
    assert_eq!(tokens.balance_of(addr(USD_TOKEN), addr(ALICE)), 2_000);
    assert_eq!(tokens.balance_of(addr(REG_TOKEN), addr(BOB)), 3_000);
    assert_eq!(tokens.balance_of(addr(USD_TOKEN), addr(BOB)), 6_000);
    assert_eq!(tokens.balance_of(addr(USD_TOKEN), addr(VAULT)), 0);
}

#[test]
fn test_vault_refusal_does_not_block_voting() {
    // Incentive enabled but no epoch configured: the vault refuses the
    // record, the vote still counts.
    let ledger = {
        let mut l = VotingPowerLedger::new(addr(ADMIN), addr(ADMIN));
        l.register_voting_power(
            addr(ADMIN),
            &[BalanceEntry { account: addr(ALICE), new_balance: 500 }],
            ts(1),
        )
        .unwrap();
        l
    };
    let mut governor = ProposalGovernor::new(
        addr(GOV),
        addr(TIMELOCK),
        addr(ADMIN),
        GovernorConfig {
            voting_delay: 100,
            voting_period: 1_000,
            proposal_threshold: 0,
            quorum: 0,
        },
        ProposerMode::VotingPowerOnly,
    );
    governor
        .handle_executor_call(
            addr(TIMELOCK),
            &GovernorAction::SetIncentiveEnabled(true).encode(),
        )
        .unwrap();
    governor
        .handle_executor_call(
            addr(TIMELOCK),
            &GovernorAction::SetIncentiveVault(addr(VAULT)).encode(),
        )
        .unwrap();
    let mut vault = IncentiveVault::new(
        addr(VAULT),
        addr(GOV),
        addr(REG_TOKEN),
        addr(ADMIN),
        addr(ADMIN),
    );

    let calls = vec![Call { target: addr(99), value: 0, payload: vec![] }];
    let id = governor
        .propose(addr(ALICE), &calls, "d", ts(10), &ledger)
        .unwrap();
    let weight = governor
        .cast_vote(
            addr(ALICE),
            id,
            VoteSupport::For,
            ts(500),
            &ledger,
            Some(&mut vault),
        )
        .unwrap();
    assert_eq!(weight, 500);
    assert!(governor.has_voted(id, addr(ALICE)));
    assert!(vault.user_epoch_state(addr(ALICE), 0).is_none());
}
