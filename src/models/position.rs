use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ScoredCandidate;

/// A position the user currently holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPosition {
    pub position_id: String,
    pub pool_address: String,
    pub dex_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub allocation_usd: Decimal,
    pub current_yield_pct: Decimal,
    /// Realised impermanent loss in percent, when the position source reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impermanent_loss_pct: Option<Decimal>,
}

/// A position in the target portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealPosition {
    pub pool_address: String,
    pub dex_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub allocation_usd: Decimal,
    pub effective_yield_pct: Decimal,
    pub il_risk_factor: Decimal,
}

impl IdealPosition {
    pub fn from_candidate(candidate: &ScoredCandidate, allocation_usd: Decimal) -> Self {
        Self {
            pool_address: candidate.pool.pool_address.clone(),
            dex_name: candidate.pool.dex_name.clone(),
            token0_symbol: candidate.pool.token0_symbol.clone(),
            token1_symbol: candidate.pool.token1_symbol.clone(),
            allocation_usd,
            effective_yield_pct: candidate.effective_yield_pct,
            il_risk_factor: candidate.il_risk_factor,
        }
    }
}

/// Pool addresses are compared case-insensitively (EVM checksum casing varies by source).
pub fn same_pool(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}
