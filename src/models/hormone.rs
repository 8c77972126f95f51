use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hormone::HormoneScores;

/// A previously completed questionnaire, as handed back by the storage layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HormoneTestRecord {
  pub created_at: DateTime<Utc>,
  pub scores: HormoneScores,
}
