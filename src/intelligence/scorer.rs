use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::{CandidatePool, PairCategory, ScoredCandidate};

/// Risk class of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Stable,
    Bluechip,
    /// Anything not in the static lists. Treated as the riskiest bucket.
    Other,
}

const STABLE_TOKENS: &[&str] = &[
    "USDC", "USDT", "DAI", "USDC.E", "USDBC", "USDT0", "FRAX", "LUSD", "TUSD", "USDE", "SUSDE",
    "PYUSD", "GHO", "CRVUSD", "BUSD", "USDS", "FDUSD",
];

const BLUECHIP_TOKENS: &[&str] = &[
    "ETH", "WETH", "BTC", "WBTC", "CBBTC", "TBTC", "STETH", "WSTETH", "RETH", "CBETH", "WEETH",
];

/// Classify a token symbol (case-insensitive) via the static lookup.
pub fn classify_token(symbol: &str) -> TokenClass {
    let upper = symbol.trim().to_uppercase();
    if STABLE_TOKENS.contains(&upper.as_str()) {
        TokenClass::Stable
    } else if BLUECHIP_TOKENS.contains(&upper.as_str()) {
        TokenClass::Bluechip
    } else {
        TokenClass::Other
    }
}

/// Pair bucket from the two token classes. Order of the tokens does not matter.
pub fn pair_category(token0: &str, token1: &str) -> PairCategory {
    use TokenClass::*;

    match (classify_token(token0), classify_token(token1)) {
        (Stable, Stable) => PairCategory::StableStable,
        (Stable, Bluechip) | (Bluechip, Stable) | (Bluechip, Bluechip) => PairCategory::Bluechip,
        (Stable, Other) | (Other, Stable) => PairCategory::StableOther,
        _ => PairCategory::Volatile,
    }
}

impl PairCategory {
    /// Heuristic impermanent-loss risk factor for the bucket.
    pub fn il_risk_factor(&self) -> Decimal {
        match self {
            PairCategory::StableStable => Decimal::ZERO,
            PairCategory::Bluechip => Decimal::new(8, 2),     // 0.08
            PairCategory::StableOther => Decimal::new(18, 2), // 0.18
            PairCategory::Volatile => Decimal::new(30, 2),    // 0.30
        }
    }
}

/// IL risk factor of a token pair.
pub fn il_risk_factor(token0: &str, token1: &str) -> Decimal {
    pair_category(token0, token1).il_risk_factor()
}

/// `raw × (1 − il)`, rounded half-up to 4 decimal places.
pub fn effective_yield(raw_yield_pct: Decimal, il_risk_factor: Decimal) -> Decimal {
    (raw_yield_pct * (Decimal::ONE - il_risk_factor))
        .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Score a pool. An explicit category hint wins over token inference.
pub fn score_pool(pool: &CandidatePool) -> ScoredCandidate {
    let category = pool
        .category_hint
        .unwrap_or_else(|| pair_category(&pool.token0_symbol, &pool.token1_symbol));
    let il = category.il_risk_factor();

    ScoredCandidate {
        pool: pool.clone(),
        pair_category: category,
        il_risk_factor: il,
        effective_yield_pct: effective_yield(pool.trailing_30d_yield_pct, il),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
