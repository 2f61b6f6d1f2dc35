mod common;

use common::{at, default_tags, place, review};
use gourmand_be::{
    engine::reviews::create_review,
    errors::AppError,
    models::review::NewReview,
    store::{MemoryData, MemoryStore},
};
use uuid::Uuid;

struct Setup {
    store: MemoryStore,
    place_id: Uuid,
    author_id: Uuid,
}

fn setup() -> Setup {
    let author_id = Uuid::new_v4();
    let other_author = Uuid::new_v4();
    let place = place(None);
    let place_id = place.id;

    let mut data = MemoryData {
        tags: default_tags(),
        ..Default::default()
    };
    data.profiles.insert(author_id, 4.0);
    data.profiles.insert(other_author, 2.0);
    let existing = review(place_id, other_author, Some(1), 0, 3);
    data.reviews.insert(existing.id, existing);
    data.places.insert(place_id, place);

    Setup {
        store: MemoryStore::new(data),
        place_id,
        author_id,
    }
}

fn new_review(place_id: Uuid) -> NewReview {
    NewReview {
        place_id,
        name: "Great pasta night".into(),
        description: "Fresh pasta, slow service".into(),
        gourmand_rating: Some(5),
        nps_score: 9,
        nps_tags: vec!["kitchen".into(), "service".into(), "kitchen".into()],
    }
}

#[tokio::test]
async fn test_create_review_stores_nps_and_recomputes() {
    let s = setup();
    let mut payload = new_review(s.place_id);
    payload.gourmand_rating = Some(5);

    let created = create_review(&s.store, s.author_id, payload, at(2024, 3, 12))
        .await
        .unwrap();

    assert_eq!(created.review.positive_rating, 0);
    assert_eq!(created.review.negative_rating, 0);
    assert!(created.review.slug.starts_with("great-pasta-night-"));
    assert_eq!(created.nps.score, 9);
    assert_eq!(created.nps.tags.len(), 2);

    // Weights 4.0 * 1 and 2.0 * 0.1 over ratings 5 and 1.
    assert_eq!(created.ratings.place_rating, 4.8);
    assert_eq!(created.ratings.gourmand_rating, 0.0);

    let data = s.store.snapshot().await;
    assert_eq!(data.places[&s.place_id].rating, 4.8);
    assert_eq!(data.profiles[&s.author_id], 0.0);
    assert!(data.nps.contains_key(&created.review.id));
    assert_eq!(data.reviews.len(), 2);
}

#[tokio::test]
async fn test_review_slugs_stay_unique() {
    let s = setup();
    let first = create_review(&s.store, s.author_id, new_review(s.place_id), at(2024, 3, 12))
        .await
        .unwrap();
    let second = create_review(&s.store, s.author_id, new_review(s.place_id), at(2024, 3, 13))
        .await
        .unwrap();

    assert_ne!(first.review.slug, second.review.slug);
}

#[tokio::test]
async fn test_review_ids_follow_creation_order() {
    let s = setup();
    let mut ids = Vec::new();
    for day in 1..=5 {
        let created = create_review(&s.store, s.author_id, new_review(s.place_id), at(2024, 3, day))
            .await
            .unwrap();
        ids.push(created.review.id);
    }

    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(sorted, ids);
    assert!(ids.iter().all(|id| id.get_version_num() == 7));
}

#[tokio::test]
async fn test_create_review_for_unknown_place() {
    let s = setup();
    let result = create_review(&s.store, s.author_id, new_review(Uuid::new_v4()), at(2024, 3, 12)).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(s.store.snapshot().await.reviews.len(), 1);
}

#[tokio::test]
async fn test_create_review_with_unknown_tag() {
    let s = setup();
    let mut payload = new_review(s.place_id);
    payload.nps_tags.push("parking".into());

    let result = create_review(&s.store, s.author_id, payload, at(2024, 3, 12)).await;

    match result {
        Err(AppError::BadRequest(msg)) => assert!(msg.contains("parking")),
        other => panic!("expected bad request, got {:?}", other.map(|c| c.review.id)),
    }
    let data = s.store.snapshot().await;
    assert_eq!(data.reviews.len(), 1);
    assert!(data.nps.is_empty());
}

#[tokio::test]
async fn test_create_review_rejects_out_of_range_scores() {
    let s = setup();

    let mut payload = new_review(s.place_id);
    payload.nps_score = 11;
    let result = create_review(&s.store, s.author_id, payload, at(2024, 3, 12)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut payload = new_review(s.place_id);
    payload.gourmand_rating = Some(0);
    let result = create_review(&s.store, s.author_id, payload, at(2024, 3, 12)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut payload = new_review(s.place_id);
    payload.name = "   ".into();
    let result = create_review(&s.store, s.author_id, payload, at(2024, 3, 12)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}
