//! Per-user statistics aggregation.
//!
//! [`aggregate`] turns a user's full attempt history into the summary
//! served by the stats endpoint: overall totals, per-tag and per-rating
//! breakdowns, and the most recent activity. [`chart_series`] reshapes
//! those aggregates into the flat series the charting UI consumes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// How many attempts the recent-activity list reports.
pub const RECENT_LIMIT: usize = 10;

/// One attempt as the aggregator sees it.
///
/// This is a projection of the stored attempt record; persistence ids and
/// code payloads are irrelevant to aggregation and deliberately absent.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub problem_name: String,
    pub problem_tags: Vec<String>,
    pub problem_rating: Option<i32>,
    pub solved: bool,
    pub time_taken: Option<i32>,
    pub attempt_date: DateTime<Utc>,
}

/// Headline totals across the whole attempt history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_attempts: u64,
    pub solved_problems: u64,
    /// Percentage of attempts solved, rounded to two decimals. 0 when the
    /// history is empty.
    pub success_rate: f64,
    /// Mean `time_taken` over solved attempts that recorded a time, rounded
    /// to the nearest integer. 0 when no such attempt exists.
    pub avg_time: i64,
}

/// Attempt counts for a single tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStats {
    pub attempted: u64,
    pub solved: u64,
}

/// Attempt counts and average time for a single rating value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub attempted: u64,
    pub solved: u64,
    /// Mean `time_taken` over attempts at this rating that recorded a time,
    /// solved or not. 0 when none did.
    pub avg_time: f64,
}

/// Display projection of an attempt for the recent-activity list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAttempt {
    pub problem_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_rating: Option<i32>,
    pub solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<i32>,
    pub attempt_date: DateTime<Utc>,
    pub problem_tags: Vec<String>,
}

/// The full statistics payload for one user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub stats: Summary,
    pub by_tag: BTreeMap<String, TagStats>,
    pub by_rating: BTreeMap<i32, RatingStats>,
    pub recent_attempts: Vec<RecentAttempt>,
}

/// A per-rating point in the chart series, ordered by rating ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPoint {
    pub rating: i32,
    pub attempted: u64,
    pub solved: u64,
    pub avg_time: f64,
}

/// A per-tag point in the chart series, ordered by attempt count descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPoint {
    pub tag: String,
    pub attempted: u64,
    pub solved: u64,
}

/// Flat series for the difficulty and topic charts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub rating_data: Vec<RatingPoint>,
    pub tag_data: Vec<TagPoint>,
}

/// Aggregate a user's attempt history into [`UserStatistics`].
///
/// Counting rules:
///
/// * An attempt contributes to every tag it lists, so per-tag `attempted`
///   counts sum to more than `total_attempts` when attempts carry several
///   tags.
/// * Attempts without a rating are counted in the totals but appear in no
///   per-rating bucket.
/// * The recent list holds at most [`RECENT_LIMIT`] attempts, newest first;
///   attempts sharing a date stay in input order.
pub fn aggregate(attempts: &[AttemptRecord]) -> UserStatistics {
    let total_attempts = attempts.len() as u64;
    let solved_problems = attempts.iter().filter(|a| a.solved).count() as u64;
    let success_rate = if total_attempts > 0 {
        round2(solved_problems as f64 / total_attempts as f64 * 100.0)
    } else {
        0.0
    };

    let solved_times: Vec<i64> = attempts
        .iter()
        .filter(|a| a.solved)
        .filter_map(|a| a.time_taken.map(i64::from))
        .collect();
    let avg_time = if solved_times.is_empty() {
        0
    } else {
        let mean = solved_times.iter().sum::<i64>() as f64 / solved_times.len() as f64;
        mean.round() as i64
    };

    let mut by_tag: BTreeMap<String, TagStats> = BTreeMap::new();
    for attempt in attempts {
        for tag in &attempt.problem_tags {
            let entry = by_tag.entry(tag.clone()).or_default();
            entry.attempted += 1;
            if attempt.solved {
                entry.solved += 1;
            }
        }
    }

    #[derive(Default)]
    struct RatingAcc {
        attempted: u64,
        solved: u64,
        time_sum: i64,
        timed: u64,
    }
    let mut ratings: BTreeMap<i32, RatingAcc> = BTreeMap::new();
    for attempt in attempts {
        let Some(rating) = attempt.problem_rating else {
            continue;
        };
        let acc = ratings.entry(rating).or_default();
        acc.attempted += 1;
        if attempt.solved {
            acc.solved += 1;
        }
        if let Some(time) = attempt.time_taken {
            acc.time_sum += i64::from(time);
            acc.timed += 1;
        }
    }
    let by_rating = ratings
        .into_iter()
        .map(|(rating, acc)| {
            let avg_time = if acc.timed > 0 {
                acc.time_sum as f64 / acc.timed as f64
            } else {
                0.0
            };
            (
                rating,
                RatingStats {
                    attempted: acc.attempted,
                    solved: acc.solved,
                    avg_time,
                },
            )
        })
        .collect();

    let mut ordered: Vec<&AttemptRecord> = attempts.iter().collect();
    // Stable sort keeps persistence order for attempts sharing a date.
    ordered.sort_by(|a, b| b.attempt_date.cmp(&a.attempt_date));
    let recent_attempts = ordered
        .into_iter()
        .take(RECENT_LIMIT)
        .map(|a| RecentAttempt {
            problem_name: a.problem_name.clone(),
            problem_rating: a.problem_rating,
            solved: a.solved,
            time_taken: a.time_taken,
            attempt_date: a.attempt_date,
            problem_tags: a.problem_tags.clone(),
        })
        .collect();

    UserStatistics {
        stats: Summary {
            total_attempts,
            solved_problems,
            success_rate,
            avg_time,
        },
        by_tag,
        by_rating,
        recent_attempts,
    }
}

/// Reshape aggregated statistics into chart-friendly series.
///
/// Rating points come out ascending by rating; tag points descending by
/// attempt count with ties broken alphabetically.
pub fn chart_series(statistics: &UserStatistics) -> ChartData {
    let rating_data = statistics
        .by_rating
        .iter()
        .map(|(&rating, s)| RatingPoint {
            rating,
            attempted: s.attempted,
            solved: s.solved,
            avg_time: s.avg_time,
        })
        .collect();

    let mut tag_data: Vec<TagPoint> = statistics
        .by_tag
        .iter()
        .map(|(tag, s)| TagPoint {
            tag: tag.clone(),
            attempted: s.attempted,
            solved: s.solved,
        })
        .collect();
    tag_data.sort_by(|a, b| b.attempted.cmp(&a.attempted).then_with(|| a.tag.cmp(&b.tag)));

    ChartData {
        rating_data,
        tag_data,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
