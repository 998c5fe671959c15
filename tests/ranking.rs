//! Integration tests for promotion votes and ranks.

#![cfg(feature = "testutils")]

use soroban_reputation_ledger::{
    LedgerError, ReputationLedger, ReputationLedgerClient, CEILING_RANK, DEFAULT_RANK, UNSET_RANK,
};
use soroban_sdk::{symbol_short, testutils::Address as _, Address, Env, String};

fn setup() -> (Env, ReputationLedgerClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let contract_id = env.register(ReputationLedger, ());
    let client = ReputationLedgerClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    client.init(&admin, &symbol_short!("GFT"));

    (env, client, admin)
}

fn ranked(env: &Env, client: &ReputationLedgerClient, admin: &Address, rank: u64) -> Address {
    let account = Address::generate(env);
    client.create(&account);
    client.set_rank(admin, &account, &rank);
    account
}

#[test]
fn test_tier_support_promotes() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let b = ranked(&env, &client, &admin, 10);
    let c = ranked(&env, &client, &admin, 10);

    // One of two rank-10 profiles: lands behind the holdout.
    assert_eq!(client.vote_to_promote(&b, &candidate), 11);
    assert_eq!(client.get_rank(&candidate), 11);

    // Both rank-10 profiles: 10 + 2 - 2.
    assert_eq!(client.vote_to_promote(&c, &candidate), 10);
    assert_eq!(client.get_rank(&candidate), 10);
    assert_eq!(client.rank_occupancy(&10), 3);
    assert_eq!(client.rank_occupancy(&11), 0);
}

#[test]
fn test_vote_lists_are_symmetric() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let voter = ranked(&env, &client, &admin, 5);

    client.vote_to_promote(&voter, &candidate);

    let voter_profile = client.get_profile(&voter).unwrap();
    let candidate_profile = client.get_profile(&candidate).unwrap();
    assert!(voter_profile.voted_for.contains(&candidate));
    assert!(candidate_profile.promotion_votes.contains(&voter));
    assert_eq!(candidate_profile.rank, 5);
}

#[test]
fn test_unvote_restores_lists() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let early = ranked(&env, &client, &admin, 20);
    let voter = ranked(&env, &client, &admin, 8);

    client.vote_to_promote(&early, &candidate);
    let voter_before = client.get_profile(&voter).unwrap();
    let candidate_before = client.get_profile(&candidate).unwrap();

    client.vote_to_promote(&voter, &candidate);
    client.unvote(&voter, &candidate);

    let voter_after = client.get_profile(&voter).unwrap();
    let candidate_after = client.get_profile(&candidate).unwrap();
    assert_eq!(voter_after.voted_for, voter_before.voted_for);
    assert_eq!(candidate_after.promotion_votes, candidate_before.promotion_votes);
    // Withdrawing a vote never demotes.
    assert_eq!(candidate_after.rank, 8);
}

#[test]
fn test_unproductive_vote_is_rejected() {
    let (env, client, admin) = setup();
    let candidate = ranked(&env, &client, &admin, 10);
    let weak = ranked(&env, &client, &admin, 40);

    assert_eq!(
        client.try_vote_to_promote(&weak, &candidate),
        Err(Ok(LedgerError::InsufficientVotes))
    );
    assert!(client
        .get_profile(&candidate)
        .unwrap()
        .promotion_votes
        .is_empty());
    assert!(client.get_profile(&weak).unwrap().voted_for.is_empty());
}

#[test]
fn test_ceiling() {
    let (env, client, admin) = setup();
    let top = ranked(&env, &client, &admin, CEILING_RANK);
    let other = ranked(&env, &client, &admin, CEILING_RANK);

    assert_eq!(
        client.try_vote_to_promote(&other, &top),
        Err(Ok(LedgerError::AtCeiling))
    );

    let candidate = Address::generate(&env);
    client.create(&candidate);
    client.vote_to_promote(&top, &candidate);
    assert_eq!(client.vote_to_promote(&other, &candidate), CEILING_RANK);
}

#[test]
fn test_promote_without_votes() {
    let (env, client, _admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);

    assert_eq!(
        client.try_promote_user(&candidate),
        Err(Ok(LedgerError::NoVotes))
    );
    assert_eq!(
        client.try_promote_user(&Address::generate(&env)),
        Err(Ok(LedgerError::NotFound))
    );
}

#[test]
fn test_unset_rank_takes_any_eligible_rank() {
    let (env, client, admin) = setup();
    let candidate = ranked(&env, &client, &admin, UNSET_RANK);
    let voter = ranked(&env, &client, &admin, 70);

    assert_eq!(client.vote_to_promote(&voter, &candidate), 70);
}

#[test]
fn test_unset_voters_confer_no_rank() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let unranked = ranked(&env, &client, &admin, UNSET_RANK);

    assert_eq!(
        client.try_vote_to_promote(&unranked, &candidate),
        Err(Ok(LedgerError::InsufficientVotes))
    );
}

#[test]
fn test_duplicate_and_self_votes() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let voter = ranked(&env, &client, &admin, 3);

    client.vote_to_promote(&voter, &candidate);
    assert_eq!(
        client.try_vote_to_promote(&voter, &candidate),
        Err(Ok(LedgerError::DuplicateEdge))
    );
    assert_eq!(
        client.try_vote_to_promote(&voter, &voter),
        Err(Ok(LedgerError::SelfVote))
    );
}

#[test]
fn test_vote_requires_profiles() {
    let (env, client, _admin) = setup();
    let member = Address::generate(&env);
    client.create(&member);
    let stranger = Address::generate(&env);

    assert_eq!(
        client.try_vote_to_promote(&stranger, &member),
        Err(Ok(LedgerError::NotFound))
    );
    assert_eq!(
        client.try_vote_to_promote(&member, &stranger),
        Err(Ok(LedgerError::NotFound))
    );
}

#[test]
fn test_vote_migrates_legacy_profiles() {
    let (env, client, admin) = setup();
    let legacy = Address::generate(&env);
    let hash = String::from_str(&env, "h");
    client.import_legacy(&legacy, &hash, &hash, &0, &0, &0);
    let voter = ranked(&env, &client, &admin, 12);

    assert_eq!(client.vote_to_promote(&voter, &legacy), 12);
    assert!(!client.exists_in_v1(&legacy));
    assert!(client.exists_in_v2(&legacy));
}

#[test]
fn test_locked_voter() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let voter = ranked(&env, &client, &admin, 3);

    client.lock(&voter);
    assert_eq!(
        client.try_vote_to_promote(&voter, &candidate),
        Err(Ok(LedgerError::AccountLocked))
    );
}

#[test]
fn test_removed_voter_is_detached() {
    let (env, client, admin) = setup();
    let candidate = Address::generate(&env);
    client.create(&candidate);
    let voter = ranked(&env, &client, &admin, 4);
    let later = ranked(&env, &client, &admin, 2);

    client.vote_to_promote(&voter, &candidate);
    client.remove_profile(&voter);

    assert!(client
        .get_profile(&candidate)
        .unwrap()
        .promotion_votes
        .is_empty());
    assert_eq!(client.vote_to_promote(&later, &candidate), 2);
}

#[test]
fn test_next_strongest_rank() {
    let (env, client, admin) = setup();
    ranked(&env, &client, &admin, 3);
    ranked(&env, &client, &admin, 9);
    ranked(&env, &client, &admin, 9);
    ranked(&env, &client, &admin, UNSET_RANK);

    assert_eq!(client.next_strongest_rank(&UNSET_RANK), 3);
    assert_eq!(client.next_strongest_rank(&9), 3);
    assert_eq!(client.next_strongest_rank(&DEFAULT_RANK), 9);
    assert_eq!(client.next_strongest_rank(&4), 3);
    assert_eq!(
        client.try_next_strongest_rank(&3),
        Err(Ok(LedgerError::NotFound))
    );
}

#[test]
fn test_next_strongest_rank_without_ranked_profiles() {
    let (_env, client, admin) = setup();
    client.set_rank(&admin, &admin, &UNSET_RANK);

    assert_eq!(
        client.try_next_strongest_rank(&UNSET_RANK),
        Err(Ok(LedgerError::NotFound))
    );
}

#[test]
fn test_set_rank_authorization() {
    let (env, client, admin) = setup();
    let account = Address::generate(&env);
    client.create(&account);
    let manager = Address::generate(&env);
    let intruder = Address::generate(&env);

    assert_eq!(
        client.try_set_rank(&intruder, &account, &1),
        Err(Ok(LedgerError::Unauthorized))
    );

    client.set_rank_manager(&manager);
    client.set_rank(&manager, &account, &7);
    assert_eq!(client.get_rank(&account), 7);
    assert_eq!(client.rank_occupancy(&7), 1);

    // Overrides may also weaken a rank.
    client.set_rank(&admin, &account, &60);
    assert_eq!(client.get_rank(&account), 60);
    assert_eq!(client.rank_occupancy(&7), 0);

    assert_eq!(
        client.try_set_rank(&admin, &intruder, &1),
        Err(Ok(LedgerError::NotFound))
    );
}
