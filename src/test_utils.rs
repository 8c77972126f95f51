//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - A fixed clock so date windows are deterministic
//! - Mock data factories for nights, sessions and questionnaires

use crate::hormone::{AnswerSet, HormoneCategory, HormoneScores};
use crate::models::{HormoneTestRecord, SleepRecord, WorkoutSession};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// ---------------------------------------------------------------------------
/// Clock
/// ---------------------------------------------------------------------------

/// Monday 2025-03-10, midday UTC
pub fn fixed_now() -> DateTime<Utc> {
  Utc
    .with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
    .single()
    .expect("valid fixed timestamp")
}

pub fn fixed_today() -> NaiveDate {
  fixed_now().date_naive()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A night logged `days_ago` days before the fixed date, without a bedtime
pub fn night(days_ago: i64, duration_min: Option<u32>, quality: Option<u8>) -> SleepRecord {
  let mut record = SleepRecord::new(fixed_today() - Duration::days(days_ago));
  record.duration_min = duration_min;
  record.quality = quality;
  record
}

/// A night with a bedtime of `hour:minute` on the record's date
pub fn night_at(days_ago: i64, hour: u32, minute: u32, duration_min: Option<u32>) -> SleepRecord {
  let mut record = night(days_ago, duration_min, None);
  record.bedtime = record.date.and_hms_opt(hour, minute, 0);
  record
}

/// Answers where the first `n` questions of each category are "yes" and the
/// rest "no", in base precedence order.
pub fn answers_with_yes_counts(cm: usize, ig: usize, te: usize, gl: usize) -> AnswerSet {
  let mut answers = AnswerSet::new();
  for (category, yes) in HormoneCategory::all().into_iter().zip([cm, ig, te, gl]) {
    for (i, id) in category.question_ids().iter().enumerate() {
      answers.insert(id.to_string(), i < yes);
    }
  }
  answers
}

/// A moderate session `days_ago` days before the fixed clock
pub fn workout_session(days_ago: i64, pyramid_top: u32, afterburn_hours: u32) -> WorkoutSession {
  WorkoutSession {
    date: fixed_now() - Duration::days(days_ago),
    pyramid_top,
    duration_min: 35,
    afterburn_hours,
    perceived_effort: Some(6),
    total_reps: crate::pyramid::calculate_total_reps(pyramid_top, 4),
    notes: None,
    sets: Vec::new(),
  }
}

/// A questionnaire result, scores given in base precedence order
pub fn hormone_test(days_ago: i64, scores: [u32; 4]) -> HormoneTestRecord {
  let [cm, ig, te, gl] = scores;
  HormoneTestRecord {
    created_at: fixed_now() - Duration::days(days_ago),
    scores: HormoneScores {
      cortisol_melatonin: cm,
      insulin_glucagon: ig,
      testo_estrogen: te,
      ghrelin_leptin: gl,
    },
  }
}
