mod common;

use std::str::FromStr;

use common::voting_fixture;
use gourmand_be::{
    engine::{
        cast_named_vote, cast_vote,
        voting::{VoteAction, VoteState, VoteTransition, plan_vote, vote_state},
    },
    errors::AppError,
    models::review::VoteType,
    store::MemoryStore,
};
use uuid::Uuid;

#[test]
fn test_plan_vote_transitions() {
    let author = Uuid::new_v4();
    let voter = Uuid::new_v4();

    assert_eq!(
        plan_vote(author, voter, None, VoteType::Positive),
        VoteTransition::Cast(VoteType::Positive)
    );
    assert_eq!(
        plan_vote(author, voter, Some(VoteType::Negative), VoteType::Negative),
        VoteTransition::Repeat
    );
    assert_eq!(
        plan_vote(author, voter, Some(VoteType::Positive), VoteType::Negative),
        VoteTransition::Switch {
            from: VoteType::Positive,
            to: VoteType::Negative
        }
    );
    assert_eq!(
        plan_vote(author, author, None, VoteType::Positive),
        VoteTransition::SelfVote
    );
}

#[test]
fn test_vote_type_parse() {
    assert_eq!(VoteType::from_str("positive").unwrap(), VoteType::Positive);
    assert_eq!(VoteType::from_str("negative").unwrap(), VoteType::Negative);
    assert!(matches!(
        VoteType::from_str("meh"),
        Err(AppError::BadRequest(_))
    ));
}

#[tokio::test]
async fn test_first_vote_is_recorded_and_recomputes() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    let outcome = cast_vote(&store, f.review_id, f.voter_id, VoteType::Positive)
        .await
        .unwrap();

    assert_eq!(outcome.action, VoteAction::Cast);
    assert_eq!(outcome.state, VoteState::VotedPositive);
    assert_eq!(outcome.positive_rating, 1);
    assert_eq!(outcome.negative_rating, 0);
    // Author reputation 3.0, modifier 2, only review rated 4.
    assert_eq!(outcome.place_rating, Some(4.0));

    let data = store.snapshot().await;
    assert_eq!(
        data.votes.get(&(f.review_id, f.voter_id)),
        Some(&VoteType::Positive)
    );
    assert_eq!(data.reviews[&f.review_id].positive_rating, 1);
    assert_eq!(data.profiles[&f.author_id], 5.0);
    assert_eq!(data.places[&f.place_id].rating, 4.0);
}

#[tokio::test]
async fn test_repeated_vote_is_a_no_op() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    cast_vote(&store, f.review_id, f.voter_id, VoteType::Negative)
        .await
        .unwrap();
    let before = store.snapshot().await;

    let outcome = cast_vote(&store, f.review_id, f.voter_id, VoteType::Negative)
        .await
        .unwrap();

    assert_eq!(outcome.action, VoteAction::Unchanged);
    assert_eq!(outcome.state, VoteState::VotedNegative);
    assert_eq!(outcome.place_rating, None);

    let after = store.snapshot().await;
    assert_eq!(after.reviews[&f.review_id].negative_rating, 1);
    assert_eq!(
        after.reviews[&f.review_id].negative_rating,
        before.reviews[&f.review_id].negative_rating
    );
    assert_eq!(after.votes.len(), 1);
}

#[tokio::test]
async fn test_switching_vote_moves_the_counter() {
    let mut f = voting_fixture();
    if let Some(review) = f.data.reviews.get_mut(&f.review_id) {
        review.positive_rating = 4;
        review.negative_rating = 2;
    }
    let store = MemoryStore::new(f.data);

    cast_vote(&store, f.review_id, f.voter_id, VoteType::Positive)
        .await
        .unwrap();
    let outcome = cast_vote(&store, f.review_id, f.voter_id, VoteType::Negative)
        .await
        .unwrap();

    assert_eq!(outcome.action, VoteAction::Switched);
    assert_eq!(outcome.state, VoteState::VotedNegative);
    assert_eq!(outcome.positive_rating, 4);
    assert_eq!(outcome.negative_rating, 3);

    let data = store.snapshot().await;
    assert_eq!(data.votes.len(), 1);
    assert_eq!(
        data.votes.get(&(f.review_id, f.voter_id)),
        Some(&VoteType::Negative)
    );
    assert_eq!(data.profiles[&f.author_id], 2.9);
}

#[tokio::test]
async fn test_self_vote_is_ignored() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    let outcome = cast_vote(&store, f.review_id, f.author_id, VoteType::Positive)
        .await
        .unwrap();

    assert_eq!(outcome.action, VoteAction::Ignored);
    assert_eq!(outcome.state, VoteState::NoVote);
    assert_eq!(outcome.positive_rating, 0);

    let data = store.snapshot().await;
    assert!(data.votes.is_empty());
    assert_eq!(data.reviews[&f.review_id].positive_rating, 0);
    assert_eq!(data.profiles[&f.author_id], 3.0);
}

#[tokio::test]
async fn test_vote_on_unknown_review() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    let result = cast_vote(&store, Uuid::new_v4(), f.voter_id, VoteType::Positive).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unknown_review_is_reported_before_vote_type() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    let result = cast_named_vote(&store, Uuid::new_v4(), f.voter_id, "meh").await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result = cast_named_vote(&store, f.review_id, f.voter_id, "meh").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(store.snapshot().await.votes.is_empty());

    let outcome = cast_named_vote(&store, f.review_id, f.voter_id, "negative")
        .await
        .unwrap();
    assert_eq!(outcome.state, VoteState::VotedNegative);
}

#[tokio::test]
async fn test_vote_state_reflects_current_vote() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    assert_eq!(
        vote_state(&store, f.review_id, f.voter_id).await.unwrap(),
        VoteState::NoVote
    );

    cast_vote(&store, f.review_id, f.voter_id, VoteType::Positive)
        .await
        .unwrap();
    assert_eq!(
        vote_state(&store, f.review_id, f.voter_id).await.unwrap(),
        VoteState::VotedPositive
    );
}

#[tokio::test]
async fn test_concurrent_duplicate_votes_count_once() {
    let f = voting_fixture();
    let store = MemoryStore::new(f.data);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move {
                cast_vote(&store, f.review_id, f.voter_id, VoteType::Positive).await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let data = store.snapshot().await;
    assert_eq!(data.reviews[&f.review_id].positive_rating, 1);
    assert_eq!(data.votes.len(), 1);
}
