use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CandidatePool, CurrentPosition, Preferences};

/// Everything a single evaluation depends on.
///
/// `rebalances_today` is owned by the caller; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationInput {
    pub preferences: Preferences,
    #[serde(default)]
    pub candidates: Vec<CandidatePool>,
    #[serde(default)]
    pub current_positions: Vec<CurrentPosition>,
    pub total_capital_usd: Decimal,
    #[serde(default)]
    pub rebalances_today: u32,
    pub now: DateTime<Utc>,
}
