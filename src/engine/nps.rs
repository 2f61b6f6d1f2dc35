use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Days, Months, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::nps::{NpsClass, NpsResponse, NpsStats, PlaceAnalytics, TagCount, TagDynamics},
    store::StoreTx,
};

/// Number of tags shown in the all-time tag ranking.
pub const TOP_TAGS: usize = 3;

pub fn classify(score: i16) -> NpsClass {
    match score {
        s if s >= 9 => NpsClass::Promoter,
        s if s <= 6 => NpsClass::Detractor,
        _ => NpsClass::Passive,
    }
}

pub fn nps_stats<'a>(responses: impl IntoIterator<Item = &'a NpsResponse>) -> NpsStats {
    let mut stats = NpsStats::default();
    for response in responses {
        stats.total += 1;
        match classify(response.score) {
            NpsClass::Promoter => stats.promoters += 1,
            NpsClass::Detractor => stats.detractors += 1,
            NpsClass::Passive => {}
        }
    }

    if stats.total > 0 {
        let total = stats.total as f64;
        stats.nps = stats.promoters as f64 / total * 100.0 - stats.detractors as f64 / total * 100.0;
    }
    stats
}

/// Counts tag labels across responses, most frequent first. Ties are ordered
/// by label.
pub fn tag_stats<'a>(
    responses: impl IntoIterator<Item = &'a NpsResponse>,
    top: Option<usize>,
) -> Vec<TagCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for response in responses {
        for tag in &response.tags {
            *counts.entry(tag.label.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(label, count)| TagCount {
            label: label.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    if let Some(n) = top {
        ranked.truncate(n);
    }
    ranked
}

/// Compares tag counts of two windows. A tag seen in only one window reports
/// zero for the other.
pub fn tag_dynamics(current: &[TagCount], last: &[TagCount]) -> BTreeMap<String, TagDynamics> {
    let lookup = |counts: &[TagCount], label: &str| {
        counts
            .iter()
            .find(|t| t.label == label)
            .map_or(0, |t| t.count)
    };

    let labels: BTreeSet<&str> = current
        .iter()
        .chain(last)
        .map(|t| t.label.as_str())
        .collect();

    labels
        .into_iter()
        .map(|label| {
            let current = lookup(current, label);
            let last = lookup(last, label);
            let dynamics = TagDynamics {
                current,
                last,
                change: current as i64 - last as i64,
            };
            (label.to_string(), dynamics)
        })
        .collect()
}

/// Calendar-month boundaries in UTC around a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindows {
    pub current_start: DateTime<Utc>,
    pub last_start: DateTime<Utc>,
}

impl MonthWindows {
    pub fn around(now: DateTime<Utc>) -> Self {
        let first_day = now.date_naive() - Days::new(u64::from(now.day0()));
        let last_first_day = first_day - Months::new(1);
        Self {
            current_start: first_day.and_time(NaiveTime::MIN).and_utc(),
            last_start: last_first_day.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    pub fn current_label(&self) -> String {
        self.current_start.format("%Y-%m").to_string()
    }

    pub fn last_label(&self) -> String {
        self.last_start.format("%Y-%m").to_string()
    }
}

/// Window of the review summary and of the period tag statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportPeriod {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl ReportPeriod {
    /// Unknown values fall back to one month.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("3m") => ReportPeriod::ThreeMonths,
            Some("6m") => ReportPeriod::SixMonths,
            _ => ReportPeriod::OneMonth,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::OneMonth => "1m",
            ReportPeriod::ThreeMonths => "3m",
            ReportPeriod::SixMonths => "6m",
        }
    }

    pub fn days(self) -> i64 {
        match self {
            ReportPeriod::OneMonth => 30,
            ReportPeriod::ThreeMonths => 90,
            ReportPeriod::SixMonths => 180,
        }
    }

    pub fn since(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - TimeDelta::days(self.days())
    }
}

fn monthly_nps(responses: &[NpsResponse]) -> Option<f64> {
    let stats = nps_stats(responses);
    (stats.total > 0).then_some(stats.nps)
}

/// All-time, current-month and previous-month NPS of a place together with
/// its tag rankings.
pub async fn place_analytics<T: StoreTx>(
    tx: &mut T,
    place_id: Uuid,
    now: DateTime<Utc>,
) -> Result<PlaceAnalytics, AppError> {
    let months = MonthWindows::around(now);

    let all_time = tx.nps_responses_for_place(place_id, None, None).await?;
    let current = tx
        .nps_responses_for_place(place_id, Some(months.current_start), None)
        .await?;
    let last = tx
        .nps_responses_for_place(
            place_id,
            Some(months.last_start),
            Some(months.current_start),
        )
        .await?;

    let overall = nps_stats(&all_time);
    let current_tags = tag_stats(&current, None);
    let last_tags = tag_stats(&last, None);

    Ok(PlaceAnalytics {
        place_id,
        nps: overall.nps,
        total_responses: overall.total,
        current_nps: monthly_nps(&current),
        last_nps: monthly_nps(&last),
        tag_stats: tag_stats(&all_time, Some(TOP_TAGS)),
        tag_dynamics: tag_dynamics(&current_tags, &last_tags),
        current_month: months.current_label(),
        last_month: months.last_label(),
    })
}

/// NPS over every response for every place of an owner.
pub async fn owner_nps<T: StoreTx>(tx: &mut T, owner_id: Uuid) -> Result<NpsStats, AppError> {
    let responses = tx.nps_responses_for_owner(owner_id).await?;
    Ok(nps_stats(&responses))
}
