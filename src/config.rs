//! Engine tunables
//!
//! Defaults reproduce the app scoring rubric. Any field can be overridden from
//! an `ALPHAVITAL_*` environment variable, optionally provided by a `.env`
//! file in the working directory.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ConfigError {
  #[error("Invalid value for {key}: {value:?}")]
  InvalidValue { key: String, value: String },

  #[error("Invalid range for {key}: {min} > {max}")]
  InvalidRange { key: String, min: u32, max: u32 },
}

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

/// Inclusive range of whole hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBand {
  pub min: u32,
  pub max: u32,
}

/// A session counts as high intensity only when all three hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighIntensityThresholds {
  pub min_peak: u32,
  pub max_duration_min: u32,
  pub min_effort: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
  /// Hormone score at which a category needs attention
  pub attention_threshold: u32,

  /// Nightly duration that keeps a sleep streak alive
  pub sleep_target_minutes: u32,

  /// Bedtime standard deviation mapped to 0% consistency
  pub consistency_zero_stddev_minutes: f64,

  /// Consistency below this triggers the regularity advice
  pub consistency_alert_pct: f64,

  pub duration_trend_delta_minutes: f64,
  pub quality_trend_delta: f64,
  pub max_sleep_recommendations: usize,

  pub high_intensity: HighIntensityThresholds,
  pub high_afterburn_hours: HourBand,
  pub moderate_afterburn_hours: HourBand,

  /// Movements performed at every pyramid step
  pub exercises_per_round: u32,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      attention_threshold: 3,
      sleep_target_minutes: 7 * 60,
      consistency_zero_stddev_minutes: 120.0,
      consistency_alert_pct: 70.0,
      duration_trend_delta_minutes: 15.0,
      quality_trend_delta: 0.3,
      max_sleep_recommendations: 3,
      high_intensity: HighIntensityThresholds {
        min_peak: 10,
        max_duration_min: 30,
        min_effort: 7,
      },
      high_afterburn_hours: HourBand { min: 36, max: 48 },
      moderate_afterburn_hours: HourBand { min: 24, max: 36 },
      exercises_per_round: 4,
    }
  }
}

impl EngineConfig {
  /// Load defaults, then apply `ALPHAVITAL_*` overrides from the environment
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let mut config = Self::default();
    override_from_env("ALPHAVITAL_ATTENTION_THRESHOLD", &mut config.attention_threshold)?;
    override_from_env("ALPHAVITAL_SLEEP_TARGET_MINUTES", &mut config.sleep_target_minutes)?;
    override_from_env(
      "ALPHAVITAL_CONSISTENCY_ZERO_STDDEV_MINUTES",
      &mut config.consistency_zero_stddev_minutes,
    )?;
    override_from_env("ALPHAVITAL_CONSISTENCY_ALERT_PCT", &mut config.consistency_alert_pct)?;
    override_from_env(
      "ALPHAVITAL_DURATION_TREND_DELTA_MINUTES",
      &mut config.duration_trend_delta_minutes,
    )?;
    override_from_env("ALPHAVITAL_QUALITY_TREND_DELTA", &mut config.quality_trend_delta)?;
    override_from_env(
      "ALPHAVITAL_MAX_SLEEP_RECOMMENDATIONS",
      &mut config.max_sleep_recommendations,
    )?;
    override_from_env("ALPHAVITAL_HIGH_INTENSITY_MIN_PEAK", &mut config.high_intensity.min_peak)?;
    override_from_env(
      "ALPHAVITAL_HIGH_INTENSITY_MAX_DURATION_MIN",
      &mut config.high_intensity.max_duration_min,
    )?;
    override_from_env("ALPHAVITAL_HIGH_INTENSITY_MIN_EFFORT", &mut config.high_intensity.min_effort)?;
    override_from_env("ALPHAVITAL_HIGH_AFTERBURN_MIN_HOURS", &mut config.high_afterburn_hours.min)?;
    override_from_env("ALPHAVITAL_HIGH_AFTERBURN_MAX_HOURS", &mut config.high_afterburn_hours.max)?;
    override_from_env(
      "ALPHAVITAL_MODERATE_AFTERBURN_MIN_HOURS",
      &mut config.moderate_afterburn_hours.min,
    )?;
    override_from_env(
      "ALPHAVITAL_MODERATE_AFTERBURN_MAX_HOURS",
      &mut config.moderate_afterburn_hours.max,
    )?;
    override_from_env("ALPHAVITAL_EXERCISES_PER_ROUND", &mut config.exercises_per_round)?;

    config.validate()?;
    tracing::debug!(?config, "Loaded engine configuration");
    Ok(config)
  }

  /// Reject bands whose bounds are reversed
  pub fn validate(&self) -> Result<(), ConfigError> {
    check_band("high_afterburn_hours", self.high_afterburn_hours)?;
    check_band("moderate_afterburn_hours", self.moderate_afterburn_hours)?;
    if self.consistency_zero_stddev_minutes <= 0.0 {
      return Err(ConfigError::InvalidValue {
        key: "consistency_zero_stddev_minutes".into(),
        value: self.consistency_zero_stddev_minutes.to_string(),
      });
    }
    Ok(())
  }
}

fn check_band(key: &str, band: HourBand) -> Result<(), ConfigError> {
  if band.min > band.max {
    return Err(ConfigError::InvalidRange {
      key: key.into(),
      min: band.min,
      max: band.max,
    });
  }
  Ok(())
}

fn override_from_env<T: FromStr>(key: &str, target: &mut T) -> Result<(), ConfigError> {
  let Ok(raw) = env::var(key) else {
    return Ok(());
  };
  *target = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
    key: key.into(),
    value: raw.clone(),
  })?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn test_defaults_match_scoring_rubric() {
    let config = EngineConfig::default();
    assert_eq!(config.attention_threshold, 3);
    assert_eq!(config.sleep_target_minutes, 420);
    assert_eq!(config.high_afterburn_hours, HourBand { min: 36, max: 48 });
    assert_eq!(config.moderate_afterburn_hours, HourBand { min: 24, max: 36 });
    assert_eq!(config.exercises_per_round, 4);
    assert!(config.validate().is_ok());
  }

  #[test]
  #[serial]
  fn test_from_env_without_overrides() {
    temp_env::with_vars_unset(
      [
        "ALPHAVITAL_SLEEP_TARGET_MINUTES",
        "ALPHAVITAL_EXERCISES_PER_ROUND",
        "ALPHAVITAL_HIGH_AFTERBURN_MIN_HOURS",
      ],
      || {
        let config = EngineConfig::from_env().expect("defaults should load");
        assert_eq!(config, EngineConfig::default());
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_applies_overrides() {
    temp_env::with_vars(
      [
        ("ALPHAVITAL_SLEEP_TARGET_MINUTES", Some("450")),
        ("ALPHAVITAL_EXERCISES_PER_ROUND", Some(" 5 ")),
        ("ALPHAVITAL_QUALITY_TREND_DELTA", Some("0.5")),
      ],
      || {
        let config = EngineConfig::from_env().expect("overrides should parse");
        assert_eq!(config.sleep_target_minutes, 450);
        assert_eq!(config.exercises_per_round, 5);
        assert!((config.quality_trend_delta - 0.5).abs() < f64::EPSILON);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_garbage() {
    temp_env::with_var("ALPHAVITAL_SLEEP_TARGET_MINUTES", Some("seven hours"), || {
      let err = EngineConfig::from_env().unwrap_err();
      assert_eq!(
        err,
        ConfigError::InvalidValue {
          key: "ALPHAVITAL_SLEEP_TARGET_MINUTES".into(),
          value: "seven hours".into(),
        }
      );
    });
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_reversed_band() {
    temp_env::with_vars(
      [
        ("ALPHAVITAL_HIGH_AFTERBURN_MIN_HOURS", Some("50")),
        ("ALPHAVITAL_HIGH_AFTERBURN_MAX_HOURS", Some("40")),
      ],
      || {
        let err = EngineConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { min: 50, max: 40, .. }));
        assert_eq!(err.to_string(), "Invalid range for high_afterburn_hours: 50 > 40");
      },
    );
  }
}
