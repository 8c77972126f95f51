//! Sleep log analysis
//!
//! Averages, bedtime consistency, good-night streak and short-term trends,
//! plus a fixed decision table turning them into advice. Records are always
//! analysed most recent first.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::SleepRecord;

const TREND_WINDOW: usize = 3;
const RECENT_BEDTIME_WINDOW: usize = 7;
const LONG_SLEEP_MINUTES: f64 = 9.0 * 60.0;
const IDEAL_SLEEP_MINUTES: f64 = 8.0 * 60.0;
const LATEST_REASONABLE_BEDTIME_HOUR: u32 = 2;
const MIN_RECORDS_FOR_INSIGHTS: usize = 7;
const MIN_RECORDS_FOR_CORRELATION: usize = 5;

const NO_DATA_ADVICE: &str = "Start logging your sleep";
const ALL_GOOD_ADVICE: &str = "Your sleep looks well optimized, keep it up!";

/// ---------------------------------------------------------------------------
/// Analysis Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
  Improving,
  Declining,
  #[default]
  Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SleepTrends {
  pub duration: Trend,
  pub quality: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAnalysis {
  /// Minutes, over records with a duration
  pub avg_duration: f64,
  /// 1-5, over records with a rating
  pub avg_quality: f64,
  /// Bedtime regularity, 0-100
  pub consistency: f64,
  /// Consecutive most recent nights at or above the target duration
  pub streak: u32,
  pub trends: SleepTrends,
  pub recommendations: Vec<String>,
}

/// ---------------------------------------------------------------------------
/// Core Metrics
/// ---------------------------------------------------------------------------

/// Records ordered by date, newest first. Ties keep input order.
pub fn sort_most_recent_first(records: &[SleepRecord]) -> Vec<&SleepRecord> {
  let mut sorted: Vec<&SleepRecord> = records.iter().collect();
  sorted.sort_by(|a, b| b.date.cmp(&a.date));
  sorted
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
  let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
  if count == 0 {
    None
  } else {
    Some(sum / count as f64)
  }
}

fn mean_duration(records: &[&SleepRecord]) -> Option<f64> {
  mean(records.iter().filter_map(|r| r.duration()).map(f64::from))
}

fn mean_quality(records: &[&SleepRecord]) -> Option<f64> {
  mean(records.iter().filter_map(|r| r.quality()).map(f64::from))
}

/// Population standard deviation of bedtime-of-day mapped onto 0-100.
/// Fewer than two bedtimes count as perfectly regular.
fn consistency_of(records: &[&SleepRecord], config: &EngineConfig) -> f64 {
  let bedtimes: Vec<f64> = records
    .iter()
    .filter_map(|r| r.bedtime_minutes())
    .map(f64::from)
    .collect();

  if bedtimes.len() < 2 {
    return 100.0;
  }

  let n = bedtimes.len() as f64;
  let avg = bedtimes.iter().sum::<f64>() / n;
  let variance = bedtimes.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / n;
  let std_dev = variance.sqrt();

  (100.0 - (std_dev / config.consistency_zero_stddev_minutes) * 100.0).clamp(0.0, 100.0)
}

fn streak_of(records: &[&SleepRecord], config: &EngineConfig) -> u32 {
  records
    .iter()
    .take_while(|r| r.duration().is_some_and(|d| d >= config.sleep_target_minutes))
    .count() as u32
}

fn trend_between(recent: Option<f64>, older: Option<f64>, delta: f64) -> Trend {
  match (recent, older) {
    (Some(r), Some(o)) if r > o + delta => Trend::Improving,
    (Some(r), Some(o)) if r < o - delta => Trend::Declining,
    _ => Trend::Stable,
  }
}

/// Last three nights against the three before. Needs at least four records.
fn trends_of(records: &[&SleepRecord], config: &EngineConfig) -> SleepTrends {
  if records.len() < TREND_WINDOW + 1 {
    return SleepTrends::default();
  }

  let recent = &records[..TREND_WINDOW];
  let older = &records[TREND_WINDOW..records.len().min(TREND_WINDOW * 2)];

  SleepTrends {
    duration: trend_between(
      mean_duration(recent),
      mean_duration(older),
      config.duration_trend_delta_minutes,
    ),
    quality: trend_between(mean_quality(recent), mean_quality(older), config.quality_trend_delta),
  }
}

pub fn sleep_streak(records: &[SleepRecord]) -> u32 {
  sleep_streak_with_config(records, &EngineConfig::default())
}

pub fn sleep_streak_with_config(records: &[SleepRecord], config: &EngineConfig) -> u32 {
  streak_of(&sort_most_recent_first(records), config)
}

pub fn sleep_consistency(records: &[SleepRecord]) -> f64 {
  consistency_of(&sort_most_recent_first(records), &EngineConfig::default())
}

pub fn sleep_trends(records: &[SleepRecord]) -> SleepTrends {
  trends_of(&sort_most_recent_first(records), &EngineConfig::default())
}

/// ---------------------------------------------------------------------------
/// Full Analysis
/// ---------------------------------------------------------------------------

pub fn analyze_sleep(records: &[SleepRecord]) -> SleepAnalysis {
  analyze_sleep_with_config(records, &EngineConfig::default())
}

pub fn analyze_sleep_with_config(records: &[SleepRecord], config: &EngineConfig) -> SleepAnalysis {
  if records.is_empty() {
    return SleepAnalysis {
      avg_duration: 0.0,
      avg_quality: 0.0,
      consistency: 0.0,
      streak: 0,
      trends: SleepTrends::default(),
      recommendations: vec![NO_DATA_ADVICE.to_string()],
    };
  }

  let sorted = sort_most_recent_first(records);

  let mut analysis = SleepAnalysis {
    avg_duration: mean_duration(&sorted).unwrap_or(0.0),
    avg_quality: mean_quality(&sorted).unwrap_or(0.0),
    consistency: consistency_of(&sorted, config),
    streak: streak_of(&sorted, config),
    trends: trends_of(&sorted, config),
    recommendations: Vec::new(),
  };

  let recent = &sorted[..sorted.len().min(RECENT_BEDTIME_WINDOW)];
  analysis.recommendations = recommendations_for(&analysis, recent, config);

  tracing::debug!(
    records = records.len(),
    avg_duration = analysis.avg_duration,
    consistency = analysis.consistency,
    streak = analysis.streak,
    "Analyzed sleep records"
  );

  analysis
}

/// Decision table, evaluated top to bottom and capped.
fn recommendations_for(analysis: &SleepAnalysis, recent: &[&SleepRecord], config: &EngineConfig) -> Vec<String> {
  let mut advice: Vec<String> = Vec::new();

  if analysis.avg_duration < config.sleep_target_minutes as f64 {
    advice.push("Aim for 7-9h of sleep per night to optimize your recovery".into());
  } else if analysis.avg_duration > LONG_SLEEP_MINUTES {
    advice.push("Your sleep duration is high, check the quality of your rest".into());
  }

  if analysis.avg_quality < 3.0 {
    advice.push("Improve your sleep environment: darkness, temperature, silence".into());
  } else if analysis.avg_quality >= 4.0 {
    advice.push("Excellent sleep quality! Keep up your good habits".into());
  }

  if analysis.consistency < config.consistency_alert_pct {
    advice.push("Keep regular bed and wake times, even on weekends".into());
  }

  if analysis.trends.duration == Trend::Declining {
    advice.push("Your sleep duration is dropping, identify the causes and adjust".into());
  }
  if analysis.trends.quality == Trend::Declining {
    advice.push("Your sleep quality is slipping, review your evening routine".into());
  }

  if analysis.streak == 0 {
    advice.push("Start by aiming for 7h of sleep for 3 nights in a row".into());
  } else if analysis.streak >= 7 {
    advice.push(format!(
      "Congratulations! {} consecutive nights of good sleep",
      analysis.streak
    ));
  }

  let late_bedtime = recent
    .iter()
    .filter_map(|r| r.bedtime)
    .any(|b| b.hour() <= LATEST_REASONABLE_BEDTIME_HOUR);
  if late_bedtime {
    advice.push("Avoid going to bed after midnight to respect your circadian rhythm".into());
  }

  if advice.is_empty() {
    advice.push(ALL_GOOD_ADVICE.into());
  }

  advice.truncate(config.max_sleep_recommendations);
  advice
}

/// ---------------------------------------------------------------------------
/// Scores & Insights
/// ---------------------------------------------------------------------------

/// Overall 0-100 score: 40% duration (peaks at 8h), 40% quality, 20% consistency
pub fn sleep_score(analysis: &SleepAnalysis) -> u32 {
  let duration_score =
    (100.0 - (analysis.avg_duration - IDEAL_SLEEP_MINUTES).abs() / 60.0 * 20.0).clamp(0.0, 100.0);
  let quality_score = (analysis.avg_quality / 5.0) * 100.0;

  (duration_score * 0.4 + quality_score * 0.4 + analysis.consistency * 0.2).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correlation {
  Positive,
  Negative,
  None,
}

/// Pearson correlation between quality and duration over nights that have both
pub fn quality_duration_correlation(records: &[SleepRecord]) -> Correlation {
  let pairs: Vec<(f64, f64)> = records
    .iter()
    .filter_map(|r| Some((f64::from(r.quality()?), f64::from(r.duration()?))))
    .collect();

  if pairs.len() < MIN_RECORDS_FOR_CORRELATION {
    return Correlation::None;
  }

  let n = pairs.len() as f64;
  let mean_q = pairs.iter().map(|(q, _)| q).sum::<f64>() / n;
  let mean_d = pairs.iter().map(|(_, d)| d).sum::<f64>() / n;

  let (mut num, mut den_q, mut den_d) = (0.0, 0.0, 0.0);
  for (q, d) in &pairs {
    let dq = q - mean_q;
    let dd = d - mean_d;
    num += dq * dd;
    den_q += dq * dq;
    den_d += dd * dd;
  }

  let denominator = (den_q * den_d).sqrt();
  if denominator == 0.0 {
    return Correlation::None;
  }

  let r = num / denominator;
  if r > 0.3 {
    Correlation::Positive
  } else if r < -0.3 {
    Correlation::Negative
  } else {
    Correlation::None
  }
}

/// Weekday with the lowest mean quality, if that mean is below 3.
/// On ties the weekday seen first (most recent) wins.
pub fn worst_weekday(records: &[SleepRecord]) -> Option<Weekday> {
  let mut by_day: Vec<(Weekday, f64, usize)> = Vec::new();

  for record in sort_most_recent_first(records) {
    let Some(q) = record.quality() else {
      continue;
    };
    let day = record.date.weekday();
    match by_day.iter_mut().find(|(d, _, _)| *d == day) {
      Some(entry) => {
        entry.1 += f64::from(q);
        entry.2 += 1;
      }
      None => by_day.push((day, f64::from(q), 1)),
    }
  }

  let mut worst: Option<(Weekday, f64)> = None;
  for (day, sum, count) in by_day {
    let avg = sum / count as f64;
    if worst.map_or(true, |(_, w)| avg < w) {
      worst = Some((day, avg));
    }
  }

  worst.filter(|(_, avg)| *avg < 3.0).map(|(day, _)| day)
}

fn weekday_name(day: Weekday) -> &'static str {
  match day {
    Weekday::Mon => "Monday",
    Weekday::Tue => "Tuesday",
    Weekday::Wed => "Wednesday",
    Weekday::Thu => "Thursday",
    Weekday::Fri => "Friday",
    Weekday::Sat => "Saturday",
    Weekday::Sun => "Sunday",
  }
}

pub fn sleep_insights(records: &[SleepRecord]) -> Vec<String> {
  if records.len() < MIN_RECORDS_FOR_INSIGHTS {
    return vec!["Log your sleep for a week to unlock personalized insights".into()];
  }

  let mut insights = Vec::new();

  if let Some(day) = worst_weekday(records) {
    insights.push(format!("Your {}s seem harder for sleep", weekday_name(day)));
  }

  match quality_duration_correlation(records) {
    Correlation::Negative => insights.push(
      "The longer you sleep, the worse the quality seems - check your environment".into(),
    ),
    Correlation::Positive => insights.push(
      "Your sleep quality improves with duration - keep prioritizing rest time".into(),
    ),
    Correlation::None => {}
  }

  insights
}

/// Minutes between bedtime and wake, wrapping once past midnight
pub fn sleep_duration_minutes(bedtime: NaiveDateTime, wake_time: NaiveDateTime) -> u32 {
  let mut minutes = (wake_time - bedtime).num_minutes();
  if minutes < 0 {
    minutes += 24 * 60;
  }
  minutes.max(0) as u32
}
