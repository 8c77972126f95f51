use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A badge the user already holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBadge {
  pub key: String,
  pub acquired_at: DateTime<Utc>,
}
