use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    engine::nps::{MonthWindows, ReportPeriod, owner_nps, place_analytics, tag_stats},
    errors::AppError,
    models::nps::{OwnerDashboard, PlaceAnalytics, PlaceDashboard},
    store::{Store, StoreTx},
    summary::ReviewSummaries,
};

/// NPS analytics of one place, for its owner only.
pub async fn analytics_for_owner<S: Store>(
    store: &S,
    place_id: Uuid,
    owner_id: Uuid,
    now: DateTime<Utc>,
) -> Result<PlaceAnalytics, AppError> {
    let mut tx = store.begin().await?;
    let place = tx
        .find_place(place_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Place {place_id} not found")))?;

    if place.owner_id != Some(owner_id) {
        return Err(AppError::Forbidden(
            "Only the owner can view place analytics".into(),
        ));
    }

    place_analytics(&mut tx, place_id, now).await
}

/// Everything an owner sees on their profile: per-place NPS analytics, a
/// review summary and period tag counts, plus NPS across all their places.
///
/// The read transaction is closed before any summarizer call so a slow
/// upstream never holds database resources.
pub async fn owner_dashboard<S: Store>(
    store: &S,
    summaries: &ReviewSummaries,
    owner_id: Uuid,
    period: ReportPeriod,
    now: DateTime<Utc>,
) -> Result<OwnerDashboard, AppError> {
    let months = MonthWindows::around(now);
    let since = period.since(now);

    let mut gathered = Vec::new();
    let average = {
        let mut tx = store.begin().await?;
        for place in tx.places_for_owner(owner_id).await? {
            let analytics = place_analytics(&mut tx, place.id, now).await?;
            let recent = tx.recent_reviews_for_place(place.id, since).await?;
            gathered.push((place, analytics, recent));
        }
        owner_nps(&mut tx, owner_id).await?
    };

    let mut places = Vec::with_capacity(gathered.len());
    for (place, analytics, recent) in gathered {
        let summary = summaries.summary_for(&place, period, &recent).await;
        let period_tag_stats: BTreeMap<String, u64> =
            tag_stats(recent.iter().filter_map(|r| r.nps.as_ref()), None)
                .into_iter()
                .map(|t| (t.label, t.count))
                .collect();

        places.push(PlaceDashboard {
            place,
            analytics,
            summary,
            period_tag_stats,
        });
    }

    Ok(OwnerDashboard {
        places,
        average_nps: average.nps,
        period: period.as_str().to_string(),
        current_month: months.current_label(),
        last_month: months.last_label(),
    })
}
