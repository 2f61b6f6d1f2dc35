mod common;

use common::rated;
use gourmand_be::{
    engine::{gourmand_rating, place_rating, quantize, rating::review_weight},
    models::review::VoteTally,
};

fn tally(positive: i32, negative: i32) -> VoteTally {
    VoteTally { positive, negative }
}

#[test]
fn test_gourmand_rating_without_votes_is_zero() {
    assert_eq!(gourmand_rating(Vec::new()), 0.0);
    assert_eq!(gourmand_rating(vec![tally(0, 0), tally(0, 0)]), 0.0);
}

#[test]
fn test_gourmand_rating_is_share_of_positive_votes() {
    assert_eq!(gourmand_rating(vec![tally(3, 1)]), 3.75);
    assert_eq!(gourmand_rating(vec![tally(2, 0), tally(0, 2)]), 2.5);
    assert_eq!(gourmand_rating(vec![tally(5, 0)]), 5.0);
    assert_eq!(gourmand_rating(vec![tally(0, 7)]), 0.0);
}

#[test]
fn test_gourmand_rating_stays_in_bounds() {
    for positive in 0..20 {
        for negative in 0..20 {
            let rating = gourmand_rating(vec![tally(positive, negative)]);
            assert!((0.0..=5.0).contains(&rating), "{positive}/{negative} -> {rating}");
        }
    }
}

#[test]
fn test_place_rating_weighted_example() {
    let reviews = vec![
        rated(Some(5), 2, 0, Some(4.0)),
        rated(Some(1), 0, 3, Some(2.0)),
    ];

    assert_eq!(review_weight(&reviews[0]), Some(12.0));
    let low = review_weight(&reviews[1]).unwrap();
    assert!((low - 0.2).abs() < 1e-9);

    assert_eq!(place_rating(&reviews), 4.9);
}

#[test]
fn test_place_rating_skips_unrated_and_profileless_reviews() {
    let reviews = vec![
        rated(Some(2), 0, 0, Some(4.0)),
        rated(None, 10, 0, Some(5.0)),
        rated(Some(5), 10, 0, None),
    ];

    assert_eq!(review_weight(&reviews[1]), None);
    assert_eq!(review_weight(&reviews[2]), None);
    assert_eq!(place_rating(&reviews), 2.0);
}

#[test]
fn test_place_rating_without_weight_is_zero() {
    assert_eq!(place_rating(&[]), 0.0);
    assert_eq!(place_rating(&[rated(Some(4), 0, 0, Some(0.0))]), 0.0);
    assert_eq!(place_rating(&[rated(None, 1, 0, None)]), 0.0);
}

#[test]
fn test_vote_modifier_is_floored() {
    // Net balance of -5 would give a negative weight without the floor.
    let review = rated(Some(3), 0, 6, Some(1.0));
    let weight = review_weight(&review).unwrap();
    assert!((weight - 0.1).abs() < 1e-9);
}

#[test]
fn test_place_rating_stays_in_bounds() {
    let reviews: Vec<_> = (1..=5)
        .flat_map(|score| {
            [
                rated(Some(score), score as i32, 0, Some(5.0)),
                rated(Some(score), 0, score as i32, Some(0.5)),
            ]
        })
        .collect();
    let rating = place_rating(&reviews);
    assert!((0.0..=5.0).contains(&rating));
}

#[test]
fn test_quantize_rounds_half_to_even() {
    assert_eq!(quantize(4.25), 4.2);
    assert_eq!(quantize(4.75), 4.8);
    assert_eq!(quantize(0.25), 0.2);
    assert_eq!(quantize(4.34), 4.3);
    assert_eq!(quantize(4.36), 4.4);
    assert_eq!(quantize(0.0), 0.0);
    assert_eq!(quantize(5.0), 5.0);
}

#[test]
fn test_place_rating_rounds_from_shortest_repr() {
    // The raw average is 1.6500000000000001, just above the midpoint.
    let reviews = [
        rated(Some(1), 2, 0, Some(0.7)),
        rated(Some(2), 2, 0, Some(1.3)),
    ];
    assert_eq!(place_rating(&reviews), 1.7);
    assert_eq!(quantize(1.6500000000000001), 1.7);
}
