use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// One night of sleep as logged by the user.
///
/// Every measurement is optional; zero durations and zero quality ratings
/// are treated the same as missing values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
  pub date: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bedtime: Option<NaiveDateTime>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub wake_time: Option<NaiveDateTime>,
  #[serde(default, rename = "durationM", skip_serializing_if = "Option::is_none")]
  pub duration_min: Option<u32>,
  /// 1-5 self rating
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quality: Option<u8>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

impl SleepRecord {
  pub fn new(date: NaiveDate) -> Self {
    Self {
      date,
      bedtime: None,
      wake_time: None,
      duration_min: None,
      quality: None,
      notes: None,
    }
  }

  /// Recorded duration in minutes, `None` when absent or zero
  pub fn duration(&self) -> Option<u32> {
    self.duration_min.filter(|d| *d > 0)
  }

  /// Recorded quality, `None` when absent or zero
  pub fn quality(&self) -> Option<u8> {
    self.quality.filter(|q| *q > 0)
  }

  /// Bedtime as minutes since midnight
  pub fn bedtime_minutes(&self) -> Option<u32> {
    self.bedtime.map(|b| b.hour() * 60 + b.minute())
  }
}
