//! Afterburn (post-exercise recovery window) estimation
//!
//! The window length is drawn from an intensity band rather than computed,
//! so the draw goes through a caller-supplied random source.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterburnIntensity {
  High,
  Moderate,
}

/// High intensity needs a tall pyramid, done quickly, at a hard effort.
/// A missing effort rating never qualifies.
pub fn classify_intensity(
  peak: u32,
  duration_min: u32,
  effort: Option<u8>,
  config: &EngineConfig,
) -> AfterburnIntensity {
  let t = &config.high_intensity;
  let hard = effort.unwrap_or(0) >= t.min_effort;
  if peak >= t.min_peak && duration_min <= t.max_duration_min && hard {
    AfterburnIntensity::High
  } else {
    AfterburnIntensity::Moderate
  }
}

/// Draw the afterburn length in whole hours from the band matching the
/// session's intensity.
pub fn estimate_afterburn_hours_with<R: Rng + ?Sized>(
  rng: &mut R,
  peak: u32,
  duration_min: u32,
  effort: Option<u8>,
  config: &EngineConfig,
) -> u32 {
  let intensity = classify_intensity(peak, duration_min, effort, config);
  let band = match intensity {
    AfterburnIntensity::High => config.high_afterburn_hours,
    AfterburnIntensity::Moderate => config.moderate_afterburn_hours,
  };
  // Configs built without validate() may carry reversed bounds
  let (lo, hi) = (band.min.min(band.max), band.min.max(band.max));
  let hours = rng.gen_range(lo..=hi);
  tracing::debug!(peak, duration_min, ?effort, ?intensity, hours, "Estimated afterburn");
  hours
}

pub fn estimate_afterburn_hours(peak: u32, duration_min: u32, effort: Option<u8>) -> u32 {
  estimate_afterburn_hours_with(
    &mut rand::thread_rng(),
    peak,
    duration_min,
    effort,
    &EngineConfig::default(),
  )
}

/// ---------------------------------------------------------------------------
/// Window Tracking
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
  pub hours: i64,
  pub minutes: i64,
  pub seconds: i64,
}

pub fn afterburn_end(workout_at: DateTime<Utc>, afterburn_hours: u32) -> DateTime<Utc> {
  workout_at + Duration::hours(afterburn_hours as i64)
}

pub fn is_in_afterburn_window(workout_at: DateTime<Utc>, afterburn_hours: u32, now: DateTime<Utc>) -> bool {
  now < afterburn_end(workout_at, afterburn_hours)
}

/// `None` once the window has closed
pub fn afterburn_time_remaining(
  workout_at: DateTime<Utc>,
  afterburn_hours: u32,
  now: DateTime<Utc>,
) -> Option<TimeRemaining> {
  if !is_in_afterburn_window(workout_at, afterburn_hours, now) {
    return None;
  }

  let remaining = afterburn_end(workout_at, afterburn_hours) - now;
  let total_secs = remaining.num_seconds();

  Some(TimeRemaining {
    hours: total_secs / 3600,
    minutes: (total_secs % 3600) / 60,
    seconds: total_secs % 60,
  })
}

/// Elapsed share of the window as a whole percentage in 0..=100
pub fn afterburn_progress(workout_at: DateTime<Utc>, afterburn_hours: u32, now: DateTime<Utc>) -> u8 {
  let total_ms = afterburn_hours as i64 * 3_600_000;
  let elapsed_ms = (now - workout_at).num_milliseconds();

  if elapsed_ms <= 0 {
    return 0;
  }
  if elapsed_ms >= total_ms {
    return 100;
  }

  ((elapsed_ms as f64 / total_ms as f64) * 100.0).round() as u8
}

/// ---------------------------------------------------------------------------
/// Tips & Calories
/// ---------------------------------------------------------------------------

const BASE_TIPS: [&str; 5] = [
  "Hydrate regularly (2-3L of water per day)",
  "Include protein at every meal",
  "Sleep 7-9h to optimize recovery",
  "Avoid alcohol, which can blunt the afterburn effect",
  "Stay active with light walking",
];

pub fn afterburn_tips(hours_remaining: f64) -> Vec<String> {
  let mut tips: Vec<String> = BASE_TIPS.iter().map(|t| t.to_string()).collect();

  let extra: [&str; 2] = if hours_remaining > 24.0 {
    [
      "Use this window for light activities",
      "Your metabolism is still running high",
    ]
  } else if hours_remaining > 12.0 {
    [
      "The afterburn effect is still going strong",
      "Keep eating well",
    ]
  } else {
    [
      "Final hours of intense afterburn",
      "Get ready for your next HIRT session",
    ]
  };

  tips.extend(extra.iter().map(|t| t.to_string()));
  tips
}

/// Metabolic boost during the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterburnLevel {
  Low,
  #[default]
  Medium,
  High,
}

impl AfterburnLevel {
  pub fn multiplier(&self) -> f64 {
    match self {
      AfterburnLevel::Low => 0.15,
      AfterburnLevel::Medium => 0.20,
      AfterburnLevel::High => 0.25,
    }
  }
}

/// Extra calories burned over the window, from daily base metabolism
pub fn estimate_afterburn_calories(base_metabolism_kcal: f64, afterburn_hours: u32, level: AfterburnLevel) -> u32 {
  let hourly_base = base_metabolism_kcal / 24.0;
  let bonus_per_hour = hourly_base * level.multiplier();
  (bonus_per_hour * afterburn_hours as f64).round().max(0.0) as u32
}
