use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four movements of a pyramid round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Exercise {
  Swing,
  Squat,
  Press,
  Pushup,
}

impl Exercise {
  pub fn all() -> [Exercise; 4] {
    [Exercise::Swing, Exercise::Squat, Exercise::Press, Exercise::Pushup]
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Exercise::Swing => "SWING",
      Exercise::Squat => "SQUAT",
      Exercise::Press => "PRESS",
      Exercise::Pushup => "PUSHUP",
    }
  }
}

impl std::fmt::Display for Exercise {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Exercise {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_uppercase().as_str() {
      "SWING" => Ok(Exercise::Swing),
      "SQUAT" => Ok(Exercise::Squat),
      "PRESS" => Ok(Exercise::Press),
      "PUSHUP" => Ok(Exercise::Pushup),
      _ => Err(format!("Unknown exercise: {}", s)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
  pub order: u32,
  pub exercise: Exercise,
  pub reps: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight_kg: Option<f64>,
}

/// A completed pyramid session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
  pub date: DateTime<Utc>,
  pub pyramid_top: u32,
  pub duration_min: u32,
  #[serde(rename = "afterburnH")]
  pub afterburn_hours: u32,
  /// RPE 1-10
  #[serde(default, rename = "perceivedEff", skip_serializing_if = "Option::is_none")]
  pub perceived_effort: Option<u8>,
  #[serde(default)]
  pub total_reps: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default)]
  pub sets: Vec<WorkoutSet>,
}

impl WorkoutSession {
  /// Reps from the logged sets, falling back to the stored total
  pub fn logged_reps(&self) -> u32 {
    if self.sets.is_empty() {
      self.total_reps
    } else {
      self.sets.iter().fold(0u32, |acc, s| acc.saturating_add(s.reps))
    }
  }

  /// Duration estimate from what was actually logged
  pub fn estimated_minutes(&self) -> u32 {
    let set_count = u32::try_from(self.sets.len()).unwrap_or(u32::MAX);
    crate::pyramid::estimate_session_minutes(self.logged_reps(), set_count)
  }
}
