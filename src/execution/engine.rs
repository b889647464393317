use rust_decimal::Decimal;

use crate::errors::{EngineError, EngineResult};
use crate::intelligence::filter_eligible;
use crate::models::{Decision, EvaluationInput};

use super::allocator::build_ideal_portfolio;
use super::cost_estimator;
use super::differ::diff_portfolio;
use super::gate::evaluate_gate;
use super::identity::decision_id;

/// Evaluate one user's snapshot into a rebalance decision.
///
/// Pure and synchronous: the same input always yields the same decision id,
/// actions and metrics. Pipeline:
/// 1. Validate preferences
/// 2. Filter + score candidate pools
/// 3. Build the ideal portfolio
/// 4. Diff against current positions
/// 5. Estimate cost/benefit
/// 6. Run the execution gate
/// 7. Fingerprint the inputs
pub fn evaluate(input: &EvaluationInput) -> EngineResult<Decision> {
    let prefs = &input.preferences;

    // Step 1: Reject structurally broken inputs
    prefs.validate()?;
    if input.total_capital_usd < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "totalCapitalUsd must not be negative, got {}",
            input.total_capital_usd
        )));
    }

    // Step 2: Eligibility + scoring
    let eligible = filter_eligible(&input.candidates, prefs);

    // Step 3: Target allocation
    let ideal = build_ideal_portfolio(&eligible, input.total_capital_usd, prefs);

    // Step 4: Current → ideal
    let actions = diff_portfolio(&input.current_positions, &ideal, prefs.materiality_threshold_pct);

    // Step 5: Cost / benefit
    let metrics = cost_estimator::estimate(
        &input.current_positions,
        &ideal,
        &actions,
        input.total_capital_usd,
        prefs,
    );

    // Step 6: Guards
    let gate = evaluate_gate(&metrics, &actions, input.rebalances_today, prefs);

    // Step 7: Identity
    let id = decision_id(input, &eligible)?;

    tracing::debug!(
        decision_id = %id,
        candidates = input.candidates.len(),
        eligible = eligible.len(),
        ideal = ideal.len(),
        withdraw = actions.to_withdraw.len(),
        add = actions.to_add.len(),
        adjust = actions.to_adjust.len(),
        current_apy = %metrics.current_weighted_yield_pct,
        ideal_apy = %metrics.ideal_weighted_yield_pct,
        should_execute = gate.should_execute,
        "Decision evaluated"
    );

    Ok(Decision {
        id,
        created_at: input.now,
        total_capital_usd: input.total_capital_usd,
        eligible,
        ideal_positions: ideal,
        actions,
        metrics,
        should_execute: gate.should_execute,
        reasons: gate.reasons(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidatePool, CurrentPosition, Preferences};
    use chrono::{TimeZone, Utc};

    fn pool(addr: &str, t0: &str, t1: &str, yield_pct: Decimal, tvl: i64) -> CandidatePool {
        CandidatePool {
            pool_id: addr.into(),
            pool_address: addr.into(),
            dex_name: "uniswap-v3".into(),
            token0_symbol: t0.into(),
            token1_symbol: t1.into(),
            trailing_30d_yield_pct: yield_pct,
            tvl_usd: Decimal::from(tvl),
            age_days: 30,
            category_hint: None,
        }
    }

    fn input() -> EvaluationInput {
        EvaluationInput {
            preferences: Preferences::new(Decimal::from(8), ["USDC", "USDT", "WETH"], 2, Decimal::from(25_000)),
            candidates: vec![
                pool("0x01", "USDC", "USDT", Decimal::new(85, 1), 2_000_000),
                pool("0x02", "USDC", "WETH", Decimal::from(12), 5_000_000),
            ],
            current_positions: vec![],
            total_capital_usd: Decimal::from(50_000),
            rebalances_today: 0,
            now: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_fresh_capital_is_deployed() {
        let decision = evaluate(&input()).unwrap();
        assert_eq!(decision.eligible.len(), 2);
        assert_eq!(decision.ideal_positions.len(), 2);
        assert_eq!(decision.actions.to_add.len(), 2);
        // (25k × 11.04 + 25k × 8.5) / 50k = 9.77
        assert_eq!(decision.metrics.ideal_weighted_yield_pct, Decimal::new(977, 2));
        assert!(decision.should_execute, "{:?}", decision.reasons);
    }

    #[test]
    fn test_invalid_preferences_rejected() {
        let mut input = input();
        input.preferences.max_positions = 0;
        assert!(matches!(evaluate(&input), Err(EngineError::InvalidPreferences(_))));
    }

    #[test]
    fn test_negative_capital_rejected() {
        let mut input = input();
        input.total_capital_usd = Decimal::from(-1);
        assert!(matches!(evaluate(&input), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_zero_capital_is_a_noop() {
        let mut input = input();
        input.total_capital_usd = Decimal::ZERO;
        let decision = evaluate(&input).unwrap();
        assert!(decision.ideal_positions.is_empty());
        assert_eq!(decision.metrics.ideal_weighted_yield_pct, Decimal::ZERO);
        assert!(!decision.should_execute);
    }

    #[test]
    fn test_non_positive_position_is_withdrawn() {
        let mut input = input();
        input.current_positions.push(CurrentPosition {
            position_id: "dust".into(),
            pool_address: "0xdead".into(),
            dex_name: "uniswap-v3".into(),
            token0_symbol: "USDC".into(),
            token1_symbol: "USDT".into(),
            allocation_usd: Decimal::ZERO,
            current_yield_pct: Decimal::from(3),
            impermanent_loss_pct: None,
        });
        let decision = evaluate(&input).unwrap();
        assert_eq!(decision.actions.to_withdraw.len(), 1);
    }
}
