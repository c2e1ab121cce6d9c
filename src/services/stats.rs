// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard statistics derived from fetched rows.
//!
//! Everything here is a pure function over a snapshot and never fails:
//! empty input produces zero-valued output.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::{
    DashboardSummary, ExerciseProgress, MonthCount, MonthlyProgress, PersonalRecord,
    PersonalRecordWithExercise, PrInsights, PrSummary, ProgressPoint, Workout,
};
use crate::time_utils::{date_at_midnight, months_before, YearMonth};

/// Window for `PrInsights::recent_count`.
const RECENT_PR_MONTHS: u32 = 3;
/// Window for `PrInsights::trend`.
const TREND_MONTHS: u32 = 6;
/// Label for PRs whose exercise no longer exists.
const UNKNOWN_EXERCISE: &str = "Desconocido";

// ─── Monthly Progress ────────────────────────────────────────

/// Compare sessions scheduled in `reference`'s calendar month (UTC) with
/// the month before it.
///
/// Workouts without a date are ignored.
pub fn compute_monthly_progress(workouts: &[Workout], reference: DateTime<Utc>) -> MonthlyProgress {
    let this_month = YearMonth::of(&reference);
    let last_month = this_month.previous();

    let mut sessions_this_month = 0u32;
    let mut sessions_last_month = 0u32;
    let mut minutes_this_month = 0u64;

    for (date, duration) in workouts
        .iter()
        .filter_map(|w| w.date.map(|d| (d, w.duration_minutes)))
    {
        if this_month.contains(&date) {
            sessions_this_month += 1;
            minutes_this_month += u64::from(duration.unwrap_or(0));
        } else if last_month.contains(&date) {
            sessions_last_month += 1;
        }
    }

    let average_duration_minutes = if sessions_this_month == 0 {
        0
    } else {
        (minutes_this_month as f64 / f64::from(sessions_this_month)).round() as u32
    };

    MonthlyProgress {
        sessions_this_month,
        sessions_last_month,
        progress_percent: progress_percent(sessions_this_month, sessions_last_month),
        average_duration_minutes,
    }
}

/// Percent change from `last` to `this`, rounded half away from zero.
///
/// 100 when last month was empty but this one is not; 0 when both are.
fn progress_percent(this: u32, last: u32) -> i64 {
    match (last, this) {
        (0, 0) => 0,
        (0, _) => 100,
        _ => {
            let change = (f64::from(this) - f64::from(last)) / f64::from(last);
            (change * 100.0).round() as i64
        }
    }
}

// ─── PR Summary ──────────────────────────────────────────────

/// Count PRs and distinct exercises, and find the latest dated record.
///
/// On equal latest dates the earliest record in `prs` wins.
pub fn summarize_prs(prs: &[PersonalRecord]) -> PrSummary {
    let unique_exercises: HashSet<&str> = prs
        .iter()
        .filter_map(|pr| pr.exercise_id.as_deref())
        .collect();

    let mut most_recent: Option<&PersonalRecord> = None;
    for pr in prs {
        let Some(date) = pr.date_achieved else {
            continue;
        };
        match most_recent.and_then(|best| best.date_achieved) {
            Some(best) if date <= best => {}
            _ => most_recent = Some(pr),
        }
    }

    PrSummary {
        total_count: prs.len() as u32,
        unique_exercise_count: unique_exercises.len() as u32,
        most_recent: most_recent.cloned(),
    }
}

/// Summary plus the time-based counts shown on the PR overview.
pub fn pr_insights(prs: &[PersonalRecord], reference: DateTime<Utc>) -> PrInsights {
    let year = reference.year();
    let recent_cutoff = months_before(reference, RECENT_PR_MONTHS);

    let dated: Vec<NaiveDate> = prs.iter().filter_map(|pr| pr.date_achieved).collect();

    let this_year_count = dated.iter().filter(|d| d.year() == year).count() as u32;
    let recent_count = dated
        .iter()
        .filter(|d| date_at_midnight(**d) > recent_cutoff)
        .count() as u32;

    PrInsights {
        summary: summarize_prs(prs),
        this_year_count,
        recent_count,
        per_month_this_year: prs_per_month(prs, year),
        trend: monthly_pr_trend(prs, reference, TREND_MONTHS),
        available_years: available_years(prs),
    }
}

/// PR counts per calendar month for PRs achieved strictly after
/// `reference - months`, oldest month first. Empty months are omitted.
pub fn monthly_pr_trend(
    prs: &[PersonalRecord],
    reference: DateTime<Utc>,
    months: u32,
) -> Vec<MonthCount> {
    let cutoff = months_before(reference, months);

    let mut trend: BTreeMap<YearMonth, u32> = BTreeMap::new();
    for date in prs
        .iter()
        .filter_map(|pr| pr.date_achieved)
        .filter(|d| date_at_midnight(*d) > cutoff)
    {
        *trend.entry(YearMonth::of(&date)).or_insert(0) += 1;
    }

    trend
        .into_iter()
        .map(|(month, count)| MonthCount {
            month: month.key(),
            count,
        })
        .collect()
}

/// PRs achieved in each month of `year`, January first.
pub fn prs_per_month(prs: &[PersonalRecord], year: i32) -> Vec<u32> {
    let mut counts = vec![0u32; 12];
    for date in prs.iter().filter_map(|pr| pr.date_achieved) {
        if date.year() == year {
            counts[date.month0() as usize] += 1;
        }
    }
    counts
}

/// Distinct years with at least one dated PR, most recent first.
pub fn available_years(prs: &[PersonalRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = prs
        .iter()
        .filter_map(|pr| pr.date_achieved.map(|d| d.year()))
        .collect();
    years.into_iter().rev().collect()
}

// ─── PR Listing ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrSortKey {
    #[default]
    DateAchieved,
    Value,
    ExerciseName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filters for the PR table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrQuery {
    /// Case-insensitive match on exercise name or notes
    pub search: Option<String>,
    pub year: Option<i32>,
    #[serde(default)]
    pub sort_by: PrSortKey,
    #[serde(default)]
    pub order: SortOrder,
}

/// Apply search/year filters and a stable sort.
///
/// Missing dates sort as the epoch, missing values as 0 and missing
/// exercise names as "".
pub fn filter_and_sort_prs(
    prs: Vec<PersonalRecordWithExercise>,
    query: &PrQuery,
) -> Vec<PersonalRecordWithExercise> {
    let needle = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut filtered: Vec<PersonalRecordWithExercise> = prs
        .into_iter()
        .filter(|pr| match &needle {
            Some(needle) => {
                let in_name = pr
                    .exercise_name()
                    .is_some_and(|n| n.to_lowercase().contains(needle));
                let in_notes = pr
                    .record
                    .notes
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(needle));
                in_name || in_notes
            }
            None => true,
        })
        .filter(|pr| match query.year {
            Some(year) => pr.record.date_achieved.is_some_and(|d| d.year() == year),
            None => true,
        })
        .collect();

    let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
    filtered.sort_by(|a, b| {
        let ordering = match query.sort_by {
            PrSortKey::DateAchieved => a
                .record
                .date_achieved
                .unwrap_or(epoch)
                .cmp(&b.record.date_achieved.unwrap_or(epoch)),
            PrSortKey::Value => a
                .record
                .value
                .unwrap_or(0.0)
                .partial_cmp(&b.record.value.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal),
            PrSortKey::ExerciseName => a
                .exercise_name()
                .unwrap_or("")
                .cmp(b.exercise_name().unwrap_or("")),
        };
        match query.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    filtered
}

/// PR history per exercise, for exercises with more than one PR.
///
/// Exercises appear in order of first occurrence; points are oldest first.
pub fn exercise_progress(prs: &[PersonalRecordWithExercise]) -> Vec<ExerciseProgress> {
    let mut groups: Vec<(String, Vec<&PersonalRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for pr in prs {
        let name = pr.exercise_name().unwrap_or(UNKNOWN_EXERCISE);
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push((name.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(&pr.record);
    }

    let epoch = DateTime::<Utc>::UNIX_EPOCH.date_naive();
    groups
        .into_iter()
        .filter(|(_, records)| records.len() > 1)
        .map(|(exercise, mut records)| {
            records.sort_by_key(|r| r.date_achieved.unwrap_or(epoch));
            ExerciseProgress {
                exercise,
                points: records
                    .into_iter()
                    .map(|r| ProgressPoint {
                        date: r.date_achieved,
                        value: r.value,
                        unit: r.unit.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}

// ─── Dashboard ───────────────────────────────────────────────

/// Stat-card data: next/latest scheduled workout, monthly progress and PRs.
pub fn dashboard_summary(
    workouts: &[Workout],
    prs: &[PersonalRecord],
    reference: DateTime<Utc>,
) -> DashboardSummary {
    // Latest scheduled date wins; unscheduled workouts only if nothing is dated.
    let today_wod = workouts
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| a.date.cmp(&b.date).then(ib.cmp(ia)))
        .map(|(_, w)| w.clone());

    DashboardSummary {
        today_wod,
        monthly: compute_monthly_progress(workouts, reference),
        prs: summarize_prs(prs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExerciseRef;
    use chrono::TimeZone;

    fn workout(id: &str, date: Option<(i32, u32, u32)>, minutes: Option<u32>) -> Workout {
        Workout {
            id: id.to_string(),
            user_id: Some("u1".to_string()),
            name: format!("WOD {}", id),
            description: None,
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            duration_minutes: minutes,
            created_at: None,
        }
    }

    fn pr(id: &str, exercise: Option<&str>, date: Option<&str>) -> PersonalRecord {
        PersonalRecord {
            id: id.to_string(),
            user_id: Some("u1".to_string()),
            exercise_id: exercise.map(String::from),
            value: Some(100.0),
            unit: Some("kg".to_string()),
            date_achieved: date.map(|d| d.parse().unwrap()),
            notes: None,
        }
    }

    fn joined(
        id: &str,
        name: Option<&str>,
        date: Option<&str>,
        value: f64,
    ) -> PersonalRecordWithExercise {
        let mut record = pr(id, name, date);
        record.value = Some(value);
        PersonalRecordWithExercise {
            record,
            exercise: name.map(|n| ExerciseRef {
                name: n.to_string(),
                exercise_type: None,
            }),
        }
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_progress_percent_rules() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(3, 0), 100);
        assert_eq!(progress_percent(4, 2), 100);
        assert_eq!(progress_percent(3, 2), 50);
        assert_eq!(progress_percent(1, 3), -67);
        assert_eq!(progress_percent(0, 5), -100);
    }

    #[test]
    fn test_progress_percent_rounds_half_away_from_zero() {
        // (1 - 8) / 8 = -87.5%
        assert_eq!(progress_percent(1, 8), -88);
        // (9 - 8) / 8 = 12.5%
        assert_eq!(progress_percent(9, 8), 13);
    }

    #[test]
    fn test_monthly_average_duration() {
        let workouts = vec![
            workout("1", Some((2024, 5, 1)), Some(45)),
            workout("2", Some((2024, 5, 3)), None),
            workout("3", Some((2024, 5, 9)), Some(20)),
            workout("4", Some((2024, 4, 9)), Some(600)),
        ];
        let progress = compute_monthly_progress(&workouts, reference());
        assert_eq!(progress.sessions_this_month, 3);
        assert_eq!(progress.sessions_last_month, 1);
        // (45 + 0 + 20) / 3 = 21.67
        assert_eq!(progress.average_duration_minutes, 22);
    }

    #[test]
    fn test_monthly_progress_january_compares_with_december() {
        let workouts = vec![
            workout("1", Some((2024, 1, 2)), None),
            workout("2", Some((2023, 12, 30)), None),
            workout("3", Some((2023, 12, 31)), None),
            workout("4", Some((2023, 1, 15)), None),
        ];
        let reference = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let progress = compute_monthly_progress(&workouts, reference);
        assert_eq!(progress.sessions_this_month, 1);
        assert_eq!(progress.sessions_last_month, 2);
        assert_eq!(progress.progress_percent, -50);
    }

    #[test]
    fn test_monthly_progress_ignores_undated_and_same_month_other_year() {
        let workouts = vec![workout("1", None, Some(30)), workout("2", Some((2023, 5, 1)), None)];
        assert_eq!(
            compute_monthly_progress(&workouts, reference()),
            MonthlyProgress::default()
        );
    }

    #[test]
    fn test_summarize_prs_tie_keeps_first() {
        let prs = vec![
            pr("a", Some("x"), Some("2024-03-01")),
            pr("b", Some("y"), Some("2024-03-01")),
        ];
        let summary = summarize_prs(&prs);
        assert_eq!(summary.most_recent.unwrap().id, "a");
    }

    #[test]
    fn test_summarize_prs_without_dates() {
        let prs = vec![pr("a", None, None), pr("b", None, None)];
        let summary = summarize_prs(&prs);
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.unique_exercise_count, 0);
        assert!(summary.most_recent.is_none());
    }

    #[test]
    fn test_pr_insights_windows() {
        let prs = vec![
            pr("1", Some("x"), Some("2024-05-01")),
            pr("2", Some("x"), Some("2024-02-16")),
            pr("3", Some("y"), Some("2024-02-15")),
            pr("4", Some("y"), Some("2023-12-01")),
            pr("5", Some("z"), Some("2023-11-15")),
            pr("6", Some("z"), None),
        ];
        let insights = pr_insights(&prs, reference());

        assert_eq!(insights.summary.total_count, 6);
        assert_eq!(insights.this_year_count, 3);
        // Cutoff 2024-02-15T10:00Z; midnight of the 15th is before it.
        assert_eq!(insights.recent_count, 2);
        assert_eq!(
            insights.trend,
            vec![
                MonthCount {
                    month: "2023-12".to_string(),
                    count: 1
                },
                MonthCount {
                    month: "2024-02".to_string(),
                    count: 2
                },
                MonthCount {
                    month: "2024-05".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(insights.available_years, vec![2024, 2023]);
        assert_eq!(insights.per_month_this_year, vec![0, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_monthly_pr_trend_custom_window() {
        let prs = vec![
            pr("1", Some("x"), Some("2024-05-01")),
            pr("2", Some("x"), Some("2024-05-02")),
            pr("3", Some("x"), Some("2024-04-01")),
        ];
        let trend = monthly_pr_trend(&prs, reference(), 1);
        assert_eq!(
            trend,
            vec![MonthCount {
                month: "2024-05".to_string(),
                count: 2
            }]
        );
        assert!(monthly_pr_trend(&[], reference(), 6).is_empty());
    }

    #[test]
    fn test_filter_by_search_matches_name_or_notes() {
        let mut with_note = joined("2", Some("Deadlift"), Some("2024-02-01"), 180.0);
        with_note.record.notes = Some("Nuevo récord de SNATCH".to_string());
        let prs = vec![
            joined("1", Some("Snatch"), Some("2024-01-01"), 60.0),
            with_note,
            joined("3", Some("Clean"), Some("2024-03-01"), 90.0),
        ];
        let query = PrQuery {
            search: Some("snatch".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = filter_and_sort_prs(prs, &query)
            .into_iter()
            .map(|p| p.record.id)
            .collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_filter_by_year_and_sort_by_value_asc() {
        let prs = vec![
            joined("1", Some("Snatch"), Some("2024-01-01"), 60.0),
            joined("2", Some("Clean"), Some("2023-06-01"), 10.0),
            joined("3", Some("Clean"), Some("2024-03-01"), 90.0),
            joined("4", Some("Jerk"), None, 5.0),
        ];
        let query = PrQuery {
            year: Some(2024),
            sort_by: PrSortKey::Value,
            order: SortOrder::Asc,
            ..Default::default()
        };
        let ids: Vec<_> = filter_and_sort_prs(prs, &query)
            .into_iter()
            .map(|p| p.record.id)
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_sort_by_exercise_name_missing_first_ascending() {
        let prs = vec![
            joined("1", Some("Snatch"), None, 1.0),
            joined("2", None, None, 1.0),
            joined("3", Some("Clean"), None, 1.0),
        ];
        let query = PrQuery {
            sort_by: PrSortKey::ExerciseName,
            order: SortOrder::Asc,
            ..Default::default()
        };
        let ids: Vec<_> = filter_and_sort_prs(prs, &query)
            .into_iter()
            .map(|p| p.record.id)
            .collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }

    #[test]
    fn test_exercise_progress_only_repeated_exercises() {
        let prs = vec![
            joined("1", Some("Snatch"), Some("2024-03-01"), 70.0),
            joined("2", Some("Clean"), Some("2024-01-01"), 90.0),
            joined("3", Some("Snatch"), Some("2024-01-01"), 60.0),
            joined("4", None, Some("2024-01-01"), 1.0),
            joined("5", None, None, 2.0),
        ];
        let progress = exercise_progress(&prs);
        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].exercise, "Snatch");
        let values: Vec<_> = progress[0].points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(60.0), Some(70.0)]);
        assert_eq!(progress[1].exercise, UNKNOWN_EXERCISE);
        assert_eq!(progress[1].points[0].date, None);
    }

    #[test]
    fn test_dashboard_today_wod_is_latest_dated() {
        let workouts = vec![
            workout("undated", None, None),
            workout("old", Some((2024, 5, 1)), None),
            workout("new", Some((2024, 5, 14)), None),
            workout("new-dup", Some((2024, 5, 14)), None),
        ];
        let summary = dashboard_summary(&workouts, &[], reference());
        assert_eq!(summary.today_wod.unwrap().id, "new");
        assert_eq!(summary.monthly.sessions_this_month, 3);
        assert_eq!(summary.prs, PrSummary::default());
    }

    #[test]
    fn test_dashboard_empty() {
        let summary = dashboard_summary(&[], &[], reference());
        assert_eq!(summary, DashboardSummary::default());
    }
}
