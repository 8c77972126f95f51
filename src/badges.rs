//! Badge Engine
//!
//! Badges are a fixed, ordered table. Each definition carries a `BadgeRule`
//! describing its condition as data; the evaluator walks the table and
//! dispatches on the rule kind. Every rule is a pure function of the user's
//! activity history and an explicit "now".

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::hormone::{score_delta, HormoneScores};
use crate::models::{AwardedBadge, HormoneTestRecord, SleepRecord, WorkoutSession};
use crate::pyramid::MIN_PEAK;
use crate::sleep::{sleep_streak, sort_most_recent_first};

const MAX_SUGGESTIONS: usize = 3;

// ---------------------------------------------------------------------------
/// Badge Definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Sleep,
    Workout,
    Hormone,
    Streak,
    Milestone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Award condition, evaluated against the full activity history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeRule {
    /// Current good-night streak reaches `nights`
    SleepStreak { nights: u32 },
    /// Mean quality over the `window` most recent nights; unrated nights count as 0
    SleepQualityAverage { window: usize, min_average: f64 },
    /// Lifetime session count
    WorkoutCount { min: usize },
    /// Sessions dated within the trailing `days`
    WorkoutsInWindow { days: i64, min: usize },
    /// Any session reached this pyramid peak
    PyramidPeak { min_peak: u32 },
    /// Sessions whose afterburn window was at least `min_hours`
    HighAfterburnSessions { min_hours: u32, min_sessions: usize },
    HormoneTestCount { min: usize },
    /// Some category dropped by at least `min_points` between the two latest tests
    HormoneImprovement { min_points: u32 },
    /// Sleep streak and training frequency together
    SleepAndTraining { sleep_streak: u32, days: i64, min_workouts: usize },
    /// Days since sign-up
    MembershipDays { days: i64 },
    /// Sleep, workout and hormone entries combined
    TotalEntries { min: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
    pub rule: BadgeRule,
    /// Hint shown while the badge is still out of reach
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<&'static str>,
}

pub const BADGE_DEFINITIONS: [BadgeDefinition; 14] = [
    // Sleep
    BadgeDefinition {
        key: "sleep_streak_3",
        name: "Regular Sleeper",
        description: "3 nights in a row with 7h+ of sleep",
        icon: "🌙",
        category: BadgeCategory::Sleep,
        rarity: BadgeRarity::Common,
        rule: BadgeRule::SleepStreak { nights: 3 },
        tip: Some("Sleep 7h+ for 3 nights in a row"),
    },
    BadgeDefinition {
        key: "sleep_streak_7",
        name: "Perfect Week",
        description: "7 nights in a row of optimal sleep",
        icon: "✨",
        category: BadgeCategory::Sleep,
        rarity: BadgeRarity::Rare,
        rule: BadgeRule::SleepStreak { nights: 7 },
        tip: Some("Keep a regular sleep routine"),
    },
    BadgeDefinition {
        key: "sleep_streak_30",
        name: "Sleep Master",
        description: "30 nights in a row of quality sleep",
        icon: "👑",
        category: BadgeCategory::Sleep,
        rarity: BadgeRarity::Epic,
        rule: BadgeRule::SleepStreak { nights: 30 },
        tip: None,
    },
    BadgeDefinition {
        key: "sleep_quality_master",
        name: "Premium Quality",
        description: "Average quality of 4.5/5 over 2 weeks",
        icon: "⭐",
        category: BadgeCategory::Sleep,
        rarity: BadgeRarity::Rare,
        rule: BadgeRule::SleepQualityAverage { window: 14, min_average: 4.5 },
        tip: None,
    },
    // Workouts
    BadgeDefinition {
        key: "first_hirt",
        name: "First HIRT",
        description: "First HIRT session completed",
        icon: "🏋️",
        category: BadgeCategory::Workout,
        rarity: BadgeRarity::Common,
        rule: BadgeRule::WorkoutCount { min: 1 },
        tip: None,
    },
    BadgeDefinition {
        key: "hirt_week_complete",
        name: "HIRT Week",
        description: "3 HIRT sessions in one week",
        icon: "💪",
        category: BadgeCategory::Workout,
        rarity: BadgeRarity::Common,
        rule: BadgeRule::WorkoutsInWindow { days: 7, min: 3 },
        tip: Some("Complete 3 HIRT sessions this week"),
    },
    BadgeDefinition {
        key: "pyramid_master_10",
        name: "Pyramid 10",
        description: "First level 10 pyramid completed",
        icon: "🔺",
        category: BadgeCategory::Workout,
        rarity: BadgeRarity::Rare,
        rule: BadgeRule::PyramidPeak { min_peak: 10 },
        tip: Some("Work your way up to a level 10 pyramid"),
    },
    BadgeDefinition {
        key: "pyramid_master_15",
        name: "Ultimate Pyramid",
        description: "Level 15 pyramid - the summit!",
        icon: "🏔️",
        category: BadgeCategory::Workout,
        rarity: BadgeRarity::Legendary,
        rule: BadgeRule::PyramidPeak { min_peak: 15 },
        tip: None,
    },
    BadgeDefinition {
        key: "afterburn_warrior",
        name: "Afterburn Warrior",
        description: "10 sessions with a 36h+ afterburn",
        icon: "🔥",
        category: BadgeCategory::Workout,
        rarity: BadgeRarity::Epic,
        rule: BadgeRule::HighAfterburnSessions { min_hours: 36, min_sessions: 10 },
        tip: None,
    },
    // Hormones
    BadgeDefinition {
        key: "hormone_test_complete",
        name: "Hormone Profile",
        description: "First hormone test completed",
        icon: "🧬",
        category: BadgeCategory::Hormone,
        rarity: BadgeRarity::Common,
        rule: BadgeRule::HormoneTestCount { min: 1 },
        tip: None,
    },
    BadgeDefinition {
        key: "hormone_improvement",
        name: "Balance Restored",
        description: "2-point improvement on a hormonal duo",
        icon: "⚖️",
        category: BadgeCategory::Hormone,
        rarity: BadgeRarity::Rare,
        rule: BadgeRule::HormoneImprovement { min_points: 2 },
        tip: None,
    },
    // Streaks
    BadgeDefinition {
        key: "consistency_champion",
        name: "Consistency Champion",
        description: "2 weeks of regular sleep AND training",
        icon: "🎯",
        category: BadgeCategory::Streak,
        rarity: BadgeRarity::Epic,
        rule: BadgeRule::SleepAndTraining { sleep_streak: 14, days: 14, min_workouts: 6 },
        tip: None,
    },
    // Milestones
    BadgeDefinition {
        key: "alphavital_month",
        name: "One Month of AlphaVital",
        description: "30 days since you signed up",
        icon: "📅",
        category: BadgeCategory::Milestone,
        rarity: BadgeRarity::Common,
        rule: BadgeRule::MembershipDays { days: 30 },
        tip: None,
    },
    BadgeDefinition {
        key: "data_collector",
        name: "Data Collector",
        description: "50 data entries in total",
        icon: "📊",
        category: BadgeCategory::Milestone,
        rarity: BadgeRarity::Rare,
        rule: BadgeRule::TotalEntries { min: 50 },
        tip: None,
    },
];

pub fn find_badge(key: &str) -> Option<&'static BadgeDefinition> {
    BADGE_DEFINITIONS.iter().find(|b| b.key == key)
}

// ---------------------------------------------------------------------------
/// Activity History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    #[serde(default)]
    pub sleep_records: Vec<SleepRecord>,
    #[serde(default)]
    pub workout_sessions: Vec<WorkoutSession>,
    #[serde(default)]
    pub hormone_tests: Vec<HormoneTestRecord>,
    #[serde(default)]
    pub awarded: Vec<AwardedBadge>,
    pub member_since: DateTime<Utc>,
}

impl UserActivity {
    pub fn new(member_since: DateTime<Utc>) -> Self {
        Self {
            sleep_records: Vec::new(),
            workout_sessions: Vec::new(),
            hormone_tests: Vec::new(),
            awarded: Vec::new(),
            member_since,
        }
    }

    fn workouts_since(&self, cutoff: DateTime<Utc>) -> usize {
        self.workout_sessions.iter().filter(|s| s.date >= cutoff).count()
    }

    fn max_peak(&self) -> Option<u32> {
        self.workout_sessions.iter().map(|s| s.pyramid_top).max()
    }

    /// The two most recent questionnaires, newest first
    fn latest_two_tests(&self) -> Option<(&HormoneScores, &HormoneScores)> {
        let mut tests: Vec<&HormoneTestRecord> = self.hormone_tests.iter().collect();
        tests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        match tests.as_slice() {
            [latest, previous, ..] => Some((&latest.scores, &previous.scores)),
            _ => None,
        }
    }

    fn total_entries(&self) -> usize {
        self.sleep_records.len() + self.workout_sessions.len() + self.hormone_tests.len()
    }
}

/// Mean quality over the `window` most recent nights, unrated nights as 0
fn windowed_quality(records: &[SleepRecord], window: usize) -> Option<f64> {
    let sorted = sort_most_recent_first(records);
    let recent = &sorted[..sorted.len().min(window)];
    if recent.is_empty() {
        return None;
    }
    let sum: f64 = recent.iter().filter_map(|r| r.quality()).map(f64::from).sum();
    Some(sum / recent.len() as f64)
}

// ---------------------------------------------------------------------------
/// Rule Evaluation
// ---------------------------------------------------------------------------

impl BadgeRule {
    pub fn is_met(&self, activity: &UserActivity, now: DateTime<Utc>) -> bool {
        match *self {
            BadgeRule::SleepStreak { nights } => sleep_streak(&activity.sleep_records) >= nights,
            BadgeRule::SleepQualityAverage { window, min_average } => {
                windowed_quality(&activity.sleep_records, window).is_some_and(|avg| avg >= min_average)
            }
            BadgeRule::WorkoutCount { min } => activity.workout_sessions.len() >= min,
            BadgeRule::WorkoutsInWindow { days, min } => {
                activity.workouts_since(now - Duration::days(days)) >= min
            }
            BadgeRule::PyramidPeak { min_peak } => activity.max_peak().is_some_and(|p| p >= min_peak),
            BadgeRule::HighAfterburnSessions { min_hours, min_sessions } => {
                activity
                    .workout_sessions
                    .iter()
                    .filter(|s| s.afterburn_hours >= min_hours)
                    .count()
                    >= min_sessions
            }
            BadgeRule::HormoneTestCount { min } => activity.hormone_tests.len() >= min,
            BadgeRule::HormoneImprovement { min_points } => match activity.latest_two_tests() {
                Some((latest, previous)) => score_delta(previous, latest)
                    .iter()
                    .any(|(_, delta)| -delta >= min_points as i64),
                None => false,
            },
            BadgeRule::SleepAndTraining { sleep_streak: nights, days, min_workouts } => {
                sleep_streak(&activity.sleep_records) >= nights
                    && activity.workouts_since(now - Duration::days(days)) >= min_workouts
            }
            BadgeRule::MembershipDays { days } => (now - activity.member_since).num_days() >= days,
            BadgeRule::TotalEntries { min } => activity.total_entries() >= min,
        }
    }
}

/// Definitions whose rule now holds and that the user does not hold yet,
/// in table order.
pub fn check_new_badges(activity: &UserActivity, now: DateTime<Utc>) -> Vec<&'static BadgeDefinition> {
    let held: HashSet<&str> = activity.awarded.iter().map(|b| b.key.as_str()).collect();

    let earned: Vec<&'static BadgeDefinition> = BADGE_DEFINITIONS
        .iter()
        .filter(|b| !held.contains(b.key) && b.rule.is_met(activity, now))
        .collect();

    if !earned.is_empty() {
        tracing::info!(
            badges = ?earned.iter().map(|b| b.key).collect::<Vec<_>>(),
            "New badges earned"
        );
    }

    earned
}

// ---------------------------------------------------------------------------
/// Progress Score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressBreakdown {
    pub sleep: u32,
    pub workout: u32,
    pub hormone: u32,
    pub consistency: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressScore {
    pub score: u32,
    /// Starts at 1, one level per 100 points
    pub level: u32,
    pub next_level_progress: u32,
    pub breakdown: ProgressBreakdown,
}

pub fn progress_score(activity: &UserActivity, now: DateTime<Utc>) -> ProgressScore {
    let breakdown = ProgressBreakdown {
        sleep: sleep_points(activity),
        workout: workout_points(activity, now),
        hormone: hormone_points(activity),
        consistency: consistency_points(activity, now),
    };

    let score = breakdown.sleep + breakdown.workout + breakdown.hormone + breakdown.consistency;

    ProgressScore {
        score,
        level: score / 100 + 1,
        next_level_progress: score % 100,
        breakdown,
    }
}

/// Up to 30 for logging, 20 for the streak, 50 for quality (last 30 nights)
fn sleep_points(activity: &UserActivity) -> u32 {
    let records = &activity.sleep_records;
    if records.is_empty() {
        return 0;
    }

    let logged = records.len().min(30) as f64;
    let streak = sleep_streak(records).min(20) as f64;
    let quality = windowed_quality(records, 30).unwrap_or(0.0);

    (logged + streak + quality * 10.0).round() as u32
}

/// Up to 30 for volume, 20 for pyramid height, 25 for the last month
fn workout_points(activity: &UserActivity, now: DateTime<Utc>) -> u32 {
    let sessions = &activity.workout_sessions;
    if sessions.is_empty() {
        return 0;
    }

    let volume = sessions.len().min(30) as u32;
    let height = activity
        .max_peak()
        .map_or(0, |p| p.saturating_sub(MIN_PEAK).saturating_mul(2).min(20));

    let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(now);
    let recent = (activity.workouts_since(month_ago).min(25) as u32 * 2).min(25);

    volume + height + recent
}

/// 10 for a first test, 15 more for a follow-up, 5 per improved category
fn hormone_points(activity: &UserActivity) -> u32 {
    if activity.hormone_tests.is_empty() {
        return 0;
    }

    let mut points = 10;
    if let Some((latest, previous)) = activity.latest_two_tests() {
        let improved = score_delta(previous, latest)
            .iter()
            .filter(|(_, delta)| *delta < 0)
            .count() as u32;
        points += 15 + improved * 5;
    }
    points
}

/// Up to 15 for nights logged in 2 weeks, 10 for 3 sessions/week over 4 weeks
fn consistency_points(activity: &UserActivity, now: DateTime<Utc>) -> u32 {
    let two_weeks_ago = (now - Duration::days(14)).date_naive();
    let nights = activity
        .sleep_records
        .iter()
        .filter(|r| r.date >= two_weeks_ago)
        .count()
        .min(15) as f64;

    let weekly_avg = activity.workouts_since(now - Duration::days(28)) as f64 / 4.0;
    let ratio = (weekly_avg / 3.0).min(1.0);

    (nights + ratio * 10.0).round() as u32
}

// ---------------------------------------------------------------------------
/// Suggestions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeSuggestion {
    pub badge: &'static BadgeDefinition,
    pub progress: String,
    pub tip: &'static str,
}

/// Progress hints for unearned badges that carry a tip
pub fn badge_suggestions(activity: &UserActivity, now: DateTime<Utc>) -> Vec<BadgeSuggestion> {
    let held: HashSet<&str> = activity.awarded.iter().map(|b| b.key.as_str()).collect();

    BADGE_DEFINITIONS
        .iter()
        .filter(|b| !held.contains(b.key))
        .filter_map(|badge| {
            let tip = badge.tip?;
            let progress = progress_text(&badge.rule, activity, now)?;
            Some(BadgeSuggestion { badge, progress, tip })
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn progress_text(rule: &BadgeRule, activity: &UserActivity, now: DateTime<Utc>) -> Option<String> {
    match *rule {
        BadgeRule::SleepStreak { nights } => {
            Some(format!("{}/{} nights", sleep_streak(&activity.sleep_records), nights))
        }
        BadgeRule::WorkoutsInWindow { days, min } => Some(format!(
            "{}/{} sessions",
            activity.workouts_since(now - Duration::days(days)),
            min
        )),
        BadgeRule::PyramidPeak { min_peak } => {
            Some(format!("Level {}/{}", activity.max_peak().unwrap_or(0), min_peak))
        }
        _ => None,
    }
}
