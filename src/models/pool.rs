use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk bucket of a token pair, as used for impermanent-loss scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairCategory {
    /// Both sides are stablecoins.
    StableStable,
    /// Stable + bluechip, or bluechip + bluechip.
    Bluechip,
    /// Stable + anything outside the known buckets.
    StableOther,
    /// Everything else.
    Volatile,
}

impl PairCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairCategory::StableStable => "stable_stable",
            PairCategory::Bluechip => "bluechip",
            PairCategory::StableOther => "stable_other",
            PairCategory::Volatile => "volatile",
        }
    }
}

impl fmt::Display for PairCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw pool snapshot as delivered by the pool-data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePool {
    pub pool_id: String,
    pub pool_address: String,
    pub dex_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    /// Trailing 30-day yield in percent (8.5 = 8.5%).
    pub trailing_30d_yield_pct: Decimal,
    pub tvl_usd: Decimal,
    pub age_days: u32,
    /// Overrides token-based risk inference when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_hint: Option<PairCategory>,
}

impl fmt::Display for CandidatePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short_addr: String = self.pool_address.chars().take(10).collect();
        write!(
            f,
            "Pool: {}/{} on {} addr={} yield={}% tvl={}",
            self.token0_symbol,
            self.token1_symbol,
            self.dex_name,
            short_addr,
            self.trailing_30d_yield_pct,
            self.tvl_usd,
        )
    }
}

/// An eligible pool together with its risk-adjusted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub pool: CandidatePool,
    pub pair_category: PairCategory,
    /// Impermanent-loss risk factor in [0, 1].
    pub il_risk_factor: Decimal,
    pub effective_yield_pct: Decimal,
}

impl ScoredCandidate {
    pub fn pool_address(&self) -> &str {
        &self.pool.pool_address
    }

    /// Zero IL risk: the pool can absorb leftover capital.
    pub fn is_zero_il(&self) -> bool {
        self.il_risk_factor.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
