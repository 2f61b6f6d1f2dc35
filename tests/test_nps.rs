mod common;

use common::{at, place, response, review};
use gourmand_be::{
    engine::nps::{
        MonthWindows, ReportPeriod, classify, nps_stats, place_analytics, tag_dynamics, tag_stats,
    },
    models::nps::{NpsClass, TagCount, TagDynamics},
    store::{MemoryData, MemoryStore, Store},
};
use uuid::Uuid;

fn count(label: &str, count: u64) -> TagCount {
    TagCount {
        label: label.into(),
        count,
    }
}

#[test]
fn test_classify_boundaries() {
    assert_eq!(classify(10), NpsClass::Promoter);
    assert_eq!(classify(9), NpsClass::Promoter);
    assert_eq!(classify(8), NpsClass::Passive);
    assert_eq!(classify(7), NpsClass::Passive);
    assert_eq!(classify(6), NpsClass::Detractor);
    assert_eq!(classify(1), NpsClass::Detractor);
}

#[test]
fn test_nps_stats() {
    let now = at(2024, 3, 10);
    let responses: Vec<_> = [10, 9, 8, 7, 6, 1]
        .into_iter()
        .map(|score| response(Uuid::new_v4(), score, now, &[]))
        .collect();

    let stats = nps_stats(&responses);
    assert_eq!(stats.promoters, 2);
    assert_eq!(stats.detractors, 2);
    assert_eq!(stats.total, 6);
    assert_eq!(stats.nps, 0.0);

    let promoters_only: Vec<_> = responses.iter().filter(|r| r.score >= 9).cloned().collect();
    assert_eq!(nps_stats(&promoters_only).nps, 100.0);
}

#[test]
fn test_nps_stats_empty_is_zero() {
    let stats = nps_stats(std::iter::empty());
    assert_eq!(stats.total, 0);
    assert_eq!(stats.nps, 0.0);
}

#[test]
fn test_tag_stats_orders_by_count_then_label() {
    let now = at(2024, 3, 10);
    let responses = vec![
        response(Uuid::new_v4(), 9, now, &["service", "kitchen"]),
        response(Uuid::new_v4(), 5, now, &["price", "kitchen"]),
        response(Uuid::new_v4(), 7, now, &["atmosphere", "service"]),
        response(Uuid::new_v4(), 7, now, &["kitchen"]),
    ];

    let all = tag_stats(&responses, None);
    assert_eq!(
        all,
        vec![
            count("kitchen", 3),
            count("service", 2),
            count("atmosphere", 1),
            count("price", 1),
        ]
    );

    let top = tag_stats(&responses, Some(3));
    assert_eq!(top.len(), 3);
    assert_eq!(top[2], count("atmosphere", 1));
}

#[test]
fn test_tag_dynamics_includes_tags_from_either_window() {
    let current = vec![count("kitchen", 3), count("service", 1)];
    let last = vec![count("kitchen", 1), count("price", 2)];

    let dynamics = tag_dynamics(&current, &last);
    assert_eq!(dynamics.len(), 3);
    assert_eq!(
        dynamics["kitchen"],
        TagDynamics {
            current: 3,
            last: 1,
            change: 2
        }
    );
    assert_eq!(
        dynamics["service"],
        TagDynamics {
            current: 1,
            last: 0,
            change: 1
        }
    );
    assert_eq!(
        dynamics["price"],
        TagDynamics {
            current: 0,
            last: 2,
            change: -2
        }
    );
}

#[test]
fn test_month_windows() {
    let windows = MonthWindows::around(at(2024, 3, 31));
    assert_eq!(windows.current_start, at(2024, 3, 1) - chrono::TimeDelta::hours(12));
    assert_eq!(windows.current_label(), "2024-03");
    assert_eq!(windows.last_label(), "2024-02");

    let january = MonthWindows::around(at(2025, 1, 15));
    assert_eq!(january.current_label(), "2025-01");
    assert_eq!(january.last_label(), "2024-12");
}

#[test]
fn test_report_period_parse() {
    assert_eq!(ReportPeriod::parse(Some("1m")), ReportPeriod::OneMonth);
    assert_eq!(ReportPeriod::parse(Some("3m")), ReportPeriod::ThreeMonths);
    assert_eq!(ReportPeriod::parse(Some("6m")), ReportPeriod::SixMonths);
    assert_eq!(ReportPeriod::parse(Some("12m")), ReportPeriod::OneMonth);
    assert_eq!(ReportPeriod::parse(None), ReportPeriod::OneMonth);
    assert_eq!(ReportPeriod::SixMonths.days(), 180);
    assert_eq!(ReportPeriod::ThreeMonths.as_str(), "3m");
}

#[tokio::test]
async fn test_place_analytics_windows() {
    let owner = Uuid::new_v4();
    let author = Uuid::new_v4();
    let place = place(Some(owner));
    let mut data = MemoryData::default();

    let dated = [
        (at(2024, 3, 2), 10, vec!["kitchen"]),
        (at(2024, 3, 20), 3, vec!["service"]),
        (at(2024, 2, 29), 9, vec!["kitchen", "price"]),
        (at(2023, 11, 5), 2, vec!["service"]),
    ];
    for (created_at, score, tags) in dated {
        let review = review(place.id, author, Some(4), 0, 0);
        data.nps
            .insert(review.id, response(review.id, score, created_at, &tags));
        data.reviews.insert(review.id, review);
    }
    let place_id = place.id;
    data.places.insert(place.id, place);

    let store = MemoryStore::new(data);
    let mut tx = store.begin().await.unwrap();
    let analytics = place_analytics(&mut tx, place_id, at(2024, 3, 25))
        .await
        .unwrap();

    assert_eq!(analytics.total_responses, 4);
    assert_eq!(analytics.nps, 0.0);
    assert_eq!(analytics.current_nps, Some(0.0));
    assert_eq!(analytics.last_nps, Some(100.0));
    assert_eq!(analytics.current_month, "2024-03");
    assert_eq!(analytics.last_month, "2024-02");
    assert_eq!(analytics.tag_stats[0], count("kitchen", 2));
    assert_eq!(analytics.tag_dynamics["price"].change, -1);
    assert_eq!(analytics.tag_dynamics["service"].current, 1);
}

#[tokio::test]
async fn test_place_analytics_empty_months() {
    let place = place(None);
    let place_id = place.id;
    let mut data = MemoryData::default();
    data.places.insert(place.id, place);

    let store = MemoryStore::new(data);
    let mut tx = store.begin().await.unwrap();
    let analytics = place_analytics(&mut tx, place_id, at(2024, 3, 25))
        .await
        .unwrap();

    assert_eq!(analytics.nps, 0.0);
    assert_eq!(analytics.current_nps, None);
    assert_eq!(analytics.last_nps, None);
    assert!(analytics.tag_stats.is_empty());
    assert!(analytics.tag_dynamics.is_empty());
}
