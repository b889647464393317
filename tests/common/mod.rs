use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use lp_rebalancer::models::{CandidatePool, CurrentPosition, EvaluationInput, Preferences};

/// Fixed evaluation timestamp so decision ids are comparable across runs.
#[allow(dead_code)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
}

#[allow(dead_code)]
pub fn prefs(max_positions: usize, max_alloc: i64) -> Preferences {
    Preferences::new(
        Decimal::from(8),
        ["USDC", "USDT", "WETH"],
        max_positions,
        Decimal::from(max_alloc),
    )
}

#[allow(dead_code)]
pub fn pool(addr: &str, t0: &str, t1: &str, yield_pct: Decimal, tvl: i64, age_days: u32) -> CandidatePool {
    CandidatePool {
        pool_id: format!("pool-{addr}"),
        pool_address: addr.into(),
        dex_name: "uniswap-v3".into(),
        token0_symbol: t0.into(),
        token1_symbol: t1.into(),
        trailing_30d_yield_pct: yield_pct,
        tvl_usd: Decimal::from(tvl),
        age_days,
        category_hint: None,
    }
}

#[allow(dead_code)]
pub fn position(addr: &str, usd: i64, yield_pct: Decimal, il_pct: Option<Decimal>) -> CurrentPosition {
    CurrentPosition {
        position_id: format!("pos-{addr}"),
        pool_address: addr.into(),
        dex_name: "uniswap-v3".into(),
        token0_symbol: "USDC".into(),
        token1_symbol: "USDT".into(),
        allocation_usd: Decimal::from(usd),
        current_yield_pct: yield_pct,
        impermanent_loss_pct: il_pct,
    }
}

#[allow(dead_code)]
pub fn input(
    preferences: Preferences,
    candidates: Vec<CandidatePool>,
    current_positions: Vec<CurrentPosition>,
    total_capital: i64,
    rebalances_today: u32,
) -> EvaluationInput {
    EvaluationInput {
        preferences,
        candidates,
        current_positions,
        total_capital_usd: Decimal::from(total_capital),
        rebalances_today,
        now: fixed_now(),
    }
}

/// Fresh capital, one stable pool and one bluechip pool, nothing held yet.
#[allow(dead_code)]
pub fn fresh_capital_input() -> EvaluationInput {
    input(
        prefs(2, 25_000),
        vec![
            pool("0xa1", "USDC", "USDT", Decimal::new(85, 1), 2_000_000, 30),
            pool("0xb2", "USDC", "WETH", Decimal::from(12), 5_000_000, 40),
        ],
        vec![],
        50_000,
        0,
    )
}
