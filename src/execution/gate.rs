use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::models::{DecisionMetrics, Preferences, RebalanceActions};

/// A withdraw candidate carrying more realised IL than this (percent) blocks execution.
pub fn max_withdraw_il_pct() -> Decimal {
    Decimal::from(6)
}

/// A failed execution guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum GateViolation {
    #[error("ideal APY {ideal:.4}% below current APY {current:.4}%: never rebalance downward")]
    DownwardRebalance { current: Decimal, ideal: Decimal },

    #[error("daily rebalance limit reached: {today}/{limit}")]
    DailyLimitReached { today: u32, limit: u32 },

    #[error("APY improvement below threshold: {improvement:.4}% < required {required:.4}%")]
    InsufficientImprovement { improvement: Decimal, required: Decimal },

    #[error("net 30d profit ${net:.2} does not cover gas ${gas:.2} x {multiplier}")]
    GasNotCovered {
        net: Decimal,
        gas: Decimal,
        multiplier: Decimal,
    },

    #[error("IL safeguard: position {position_id} in {pool_address} has impermanent loss {il_pct}% > {max}%")]
    ImpermanentLossTooHigh {
        position_id: String,
        pool_address: String,
        il_pct: Decimal,
        max: Decimal,
    },

    #[error("IL safeguard: position {position_id} in {pool_address} has no impermanent loss reading")]
    ImpermanentLossUnknown {
        position_id: String,
        pool_address: String,
    },

    #[error("no rebalance actions required")]
    NoActions,
}

/// Result of running every guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateOutcome {
    pub should_execute: bool,
    pub violations: Vec<GateViolation>,
}

impl GateOutcome {
    pub fn reasons(&self) -> Vec<String> {
        self.violations.iter().map(ToString::to_string).collect()
    }
}

/// Run all six execution guards. Every guard is evaluated, so the outcome
/// explains every reason a decision did not fire.
///
/// 1. ideal APY ≥ current APY
/// 2. rebalances today < daily limit
/// 3. ideal APY ≥ current APY + min improvement
/// 4. net 30d profit > gas × cover multiplier
/// 5. no withdrawn position above the IL limit
/// 6. at least one action
pub fn evaluate_gate(
    metrics: &DecisionMetrics,
    actions: &RebalanceActions,
    rebalances_today: u32,
    prefs: &Preferences,
) -> GateOutcome {
    let mut violations = Vec::new();
    let current = metrics.current_weighted_yield_pct;
    let ideal = metrics.ideal_weighted_yield_pct;

    // 1. Never rebalance into a lower yield
    if ideal < current {
        violations.push(GateViolation::DownwardRebalance { current, ideal });
    }

    // 2. Rate limit (counter owned by the caller)
    if rebalances_today >= prefs.daily_rebalance_limit {
        violations.push(GateViolation::DailyLimitReached {
            today: rebalances_today,
            limit: prefs.daily_rebalance_limit,
        });
    }

    // 3. Minimum APY improvement
    if ideal < current + prefs.min_yield_improvement_pct {
        violations.push(GateViolation::InsufficientImprovement {
            improvement: ideal - current,
            required: prefs.min_yield_improvement_pct,
        });
    }

    // 4. Profit must cover gas several times over
    let gas_floor = metrics.estimated_gas_usd * prefs.gas_cover_multiplier;
    if metrics.net_profit_30d_usd <= gas_floor {
        violations.push(GateViolation::GasNotCovered {
            net: metrics.net_profit_30d_usd,
            gas: metrics.estimated_gas_usd,
            multiplier: prefs.gas_cover_multiplier,
        });
    }

    // 5. IL safeguard on positions we would exit
    let max_il = max_withdraw_il_pct();
    for pos in &actions.to_withdraw {
        match pos.impermanent_loss_pct {
            Some(il) if il > max_il => {
                violations.push(GateViolation::ImpermanentLossTooHigh {
                    position_id: pos.position_id.clone(),
                    pool_address: pos.pool_address.clone(),
                    il_pct: il,
                    max: max_il,
                });
            }
            None if prefs.il_safeguard_fail_closed => {
                violations.push(GateViolation::ImpermanentLossUnknown {
                    position_id: pos.position_id.clone(),
                    pool_address: pos.pool_address.clone(),
                });
            }
            _ => {}
        }
    }

    // 6. Nothing to do
    if actions.is_empty() {
        violations.push(GateViolation::NoActions);
    }

    GateOutcome {
        should_execute: violations.is_empty(),
        violations,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
