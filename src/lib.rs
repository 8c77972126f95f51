//! AlphaVital wellness scoring core.
//!
//! Pure computations behind the app: hormone questionnaire scoring and
//! advice, afterburn estimation, pyramid workout generation, sleep analysis
//! and badge evaluation. Storage and presentation live elsewhere; every
//! function here takes its inputs and the current time explicitly.

pub mod afterburn;
pub mod badges;
pub mod config;
pub mod hormone;
pub mod logging;
pub mod models;
pub mod pyramid;
pub mod sleep;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, EngineConfig};
pub use hormone::{score_hormone_test, AnswerSet, HormoneCategory, HormoneScores, HormoneTestResult};
pub use models::{AwardedBadge, HormoneTestRecord, SleepRecord, WorkoutSession};
pub use sleep::{analyze_sleep, SleepAnalysis};
