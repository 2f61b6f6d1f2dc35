mod common;

use chrono::Utc;
use common::{place, response, review};
use gourmand_be::{
    engine::dashboard::analytics_for_owner,
    errors::AppError,
    store::{MemoryData, MemoryStore},
};
use uuid::Uuid;

struct Setup {
    store: MemoryStore,
    place_id: Uuid,
    owner_id: Uuid,
}

fn setup() -> Setup {
    let owner_id = Uuid::new_v4();
    let author = Uuid::new_v4();
    let now = Utc::now();
    let owned = place(Some(owner_id));
    let place_id = owned.id;

    let mut data = MemoryData::default();
    for score in [10, 9] {
        let mut r = review(place_id, author, Some(5), 0, 0);
        r.review_date = now;
        data.nps
            .insert(r.id, response(r.id, score, now, &["kitchen"]));
        data.reviews.insert(r.id, r);
    }
    data.places.insert(place_id, owned);

    Setup {
        store: MemoryStore::new(data),
        place_id,
        owner_id,
    }
}

#[tokio::test]
async fn test_owner_sees_place_analytics() {
    let s = setup();

    let analytics = analytics_for_owner(&s.store, s.place_id, s.owner_id, Utc::now())
        .await
        .unwrap();

    assert_eq!(analytics.place_id, s.place_id);
    assert_eq!(analytics.total_responses, 2);
    assert_eq!(analytics.nps, 100.0);
}

#[tokio::test]
async fn test_other_user_is_forbidden_from_analytics() {
    let s = setup();

    let result = analytics_for_owner(&s.store, s.place_id, Uuid::new_v4(), Utc::now()).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_analytics_for_unknown_place() {
    let s = setup();

    let result = analytics_for_owner(&s.store, Uuid::new_v4(), s.owner_id, Utc::now()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_unowned_place_analytics_are_forbidden() {
    let s = setup();
    let mut data = s.store.snapshot().await;
    let orphan = place(None);
    let orphan_id = orphan.id;
    data.places.insert(orphan_id, orphan);
    let store = MemoryStore::new(data);

    let result = analytics_for_owner(&store, orphan_id, s.owner_id, Utc::now()).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}
