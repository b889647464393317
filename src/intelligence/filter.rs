use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{CandidatePool, Preferences, ScoredCandidate};

use super::scorer::score_pool;

/// Why a pool was left out of the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("token {0} not in allow-list")]
    TokenNotAllowed(String),

    #[error("venue {0} not in allow-list")]
    DexNotAllowed(String),

    #[error("yield {actual}% below floor {floor}%")]
    YieldTooLow { actual: Decimal, floor: Decimal },

    #[error("TVL ${actual} below minimum ${min}")]
    TvlTooLow { actual: Decimal, min: Decimal },

    #[error("pool age {actual}d below minimum {min}d")]
    TooYoung { actual: u32, min: u32 },
}

/// Yield floor with a 5% tolerance band, so measurement noise near the
/// configured minimum does not flip pools in and out.
pub fn yield_floor(prefs: &Preferences) -> Decimal {
    prefs.min_yield_pct * Decimal::new(95, 2) // × 0.95
}

/// Check a single pool against the user's constraints.
///
/// Checks run in a fixed order and the first failure is reported.
pub fn check_eligibility(pool: &CandidatePool, prefs: &Preferences) -> Result<(), Ineligibility> {
    for symbol in [&pool.token0_symbol, &pool.token1_symbol] {
        if !prefs.allows_token(symbol) {
            return Err(Ineligibility::TokenNotAllowed(symbol.clone()));
        }
    }

    if !prefs.allows_dex(&pool.dex_name) {
        return Err(Ineligibility::DexNotAllowed(pool.dex_name.clone()));
    }

    let floor = yield_floor(prefs);
    if pool.trailing_30d_yield_pct < floor {
        return Err(Ineligibility::YieldTooLow {
            actual: pool.trailing_30d_yield_pct,
            floor,
        });
    }

    if pool.tvl_usd < prefs.min_tvl_usd {
        return Err(Ineligibility::TvlTooLow {
            actual: pool.tvl_usd,
            min: prefs.min_tvl_usd,
        });
    }

    if pool.age_days < prefs.min_age_days {
        return Err(Ineligibility::TooYoung {
            actual: pool.age_days,
            min: prefs.min_age_days,
        });
    }

    Ok(())
}

pub fn is_eligible(pool: &CandidatePool, prefs: &Preferences) -> bool {
    check_eligibility(pool, prefs).is_ok()
}

/// Keep the eligible pools and score them. Input order is preserved.
pub fn filter_eligible(pools: &[CandidatePool], prefs: &Preferences) -> Vec<ScoredCandidate> {
    pools
        .iter()
        .filter(|pool| match check_eligibility(pool, prefs) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(
                    pool = %pool.pool_address,
                    dex = %pool.dex_name,
                    reason = %reason,
                    "{} rejected",
                    pool
                );
                false
            }
        })
        .map(score_pool)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
