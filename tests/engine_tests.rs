mod common;

use rust_decimal::Decimal;

use lp_rebalancer::execution::allocate_units;
use lp_rebalancer::execution::unit_allocator::WeightedItem;
use lp_rebalancer::intelligence::{effective_yield, il_risk_factor};
use lp_rebalancer::execution::cost_estimator::estimate_gas_usd;
use lp_rebalancer::models::derive_positions_from_onchain;
use lp_rebalancer::models::OnchainPosition;
use lp_rebalancer::{evaluate, plan_dispatch, EngineError};

use common::{fresh_capital_input, input, pool, position, prefs};

#[test]
fn test_fresh_capital_deploys_and_is_reproducible() {
    let input = fresh_capital_input();

    let first = evaluate(&input).expect("evaluation should succeed");
    let second = evaluate(&input).expect("evaluation should succeed");

    assert_eq!(first.eligible.len(), 2);
    assert!(!first.ideal_positions.is_empty());
    assert_eq!(first.id, second.id);
    assert_eq!(first.actions, second.actions);
    assert_eq!(first.metrics, second.metrics);
}

#[test]
fn test_id_independent_of_candidate_order() {
    let input = fresh_capital_input();
    let mut reordered = input.clone();
    reordered.candidates.reverse();

    let a = evaluate(&input).unwrap();
    let b = evaluate(&reordered).unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(a.actions, b.actions);
}

#[test]
fn test_scoring_reference_values() {
    assert_eq!(il_risk_factor("USDC", "USDT"), Decimal::ZERO);
    assert_eq!(effective_yield(Decimal::from(10), Decimal::new(18, 2)), Decimal::new(82, 1));
    assert_eq!(estimate_gas_usd(2, 3, Decimal::ONE), Decimal::new(84, 1));
}

#[test]
fn test_marginal_improvement_is_held() {
    // 8.00% held, 8.05% available: below the 0.7pp improvement bar
    let input = input(
        prefs(2, 25_000),
        vec![pool("0xnew", "USDC", "USDT", Decimal::new(805, 2), 3_000_000, 60)],
        vec![position("0xold", 50_000, Decimal::from(8), None)],
        50_000,
        0,
    );

    let decision = evaluate(&input).unwrap();

    assert!(!decision.should_execute);
    assert!(
        decision
            .reasons
            .iter()
            .any(|r| r.starts_with("APY improvement below threshold")),
        "reasons: {:?}",
        decision.reasons
    );
}

#[test]
fn test_high_il_withdrawal_is_blocked() {
    let input = input(
        prefs(2, 25_000),
        vec![pool("0xnew", "USDC", "USDT", Decimal::from(9), 3_000_000, 60)],
        vec![position("0xold", 50_000, Decimal::from(5), Some(Decimal::new(61, 1)))],
        50_000,
        0,
    );

    let decision = evaluate(&input).unwrap();

    assert!(!decision.should_execute);
    assert_eq!(decision.reasons.len(), 1, "reasons: {:?}", decision.reasons);
    assert!(decision.reasons[0].starts_with("IL safeguard"));
}

#[test]
fn test_same_setup_without_il_executes() {
    let input = input(
        prefs(2, 25_000),
        vec![pool("0xnew", "USDC", "USDT", Decimal::from(9), 3_000_000, 60)],
        vec![position("0xold", 50_000, Decimal::from(5), Some(Decimal::from(2)))],
        50_000,
        0,
    );

    let decision = evaluate(&input).unwrap();

    assert!(decision.should_execute, "reasons: {:?}", decision.reasons);
    assert_eq!(decision.actions.to_withdraw.len(), 1);
    assert_eq!(decision.actions.to_add.len(), 1);
    assert_eq!(decision.actions.to_add[0].allocation_usd, Decimal::from(50_000));
}

#[test]
fn test_never_rebalances_downward() {
    let input = input(
        prefs(2, 25_000),
        vec![pool("0xnew", "USDC", "USDT", Decimal::from(9), 3_000_000, 60)],
        vec![position("0xrich", 50_000, Decimal::from(20), None)],
        50_000,
        0,
    );

    let decision = evaluate(&input).unwrap();

    assert!(decision.metrics.ideal_weighted_yield_pct < decision.metrics.current_weighted_yield_pct);
    assert!(!decision.should_execute);
}

#[test]
fn test_rate_limit_overrides_profitability() {
    let mut input = fresh_capital_input();
    assert!(evaluate(&input).unwrap().should_execute);

    input.rebalances_today = input.preferences.daily_rebalance_limit;
    let decision = evaluate(&input).unwrap();
    assert!(!decision.should_execute);
    assert!(decision.reasons.iter().any(|r| r.starts_with("daily rebalance limit")));

    input.rebalances_today += 5;
    assert!(!evaluate(&input).unwrap().should_execute);
}

#[test]
fn test_already_balanced_is_noop() {
    let input = input(
        prefs(2, 50_000),
        vec![pool("0xnew", "USDC", "USDT", Decimal::from(9), 3_000_000, 60)],
        vec![position("0xnew", 50_000, Decimal::from(9), None)],
        50_000,
        0,
    );

    let decision = evaluate(&input).unwrap();

    assert!(decision.actions.is_empty());
    assert!(!decision.should_execute);
    assert!(decision.reasons.iter().any(|r| r == "no rebalance actions required"));
}

#[test]
fn test_capital_conservation() {
    for capital in [0i64, 2_999, 3_000, 10_000, 26_500, 27_000, 49_999, 50_000, 52_000, 123_457, 1_000_000] {
        // with a zero-IL sink every capital that can open a position is fully placed
        let with_sink = input(
            prefs(2, 25_000),
            vec![
                pool("0xa1", "USDC", "USDT", Decimal::new(85, 1), 2_000_000, 30),
                pool("0xb2", "USDC", "WETH", Decimal::from(12), 5_000_000, 40),
            ],
            vec![],
            capital,
            0,
        );
        let decision = evaluate(&with_sink).unwrap();
        let placed: Decimal = decision.ideal_positions.iter().map(|p| p.allocation_usd).sum();
        let total = Decimal::from(capital);
        assert!(placed <= total, "capital {capital}");
        if capital >= 3_000 {
            assert_eq!(placed, total, "capital {capital}");
        }

        // without a sink: never more than the capital, never over the cap
        let without_sink = input(
            prefs(2, 25_000),
            vec![pool("0xb2", "USDC", "WETH", Decimal::from(12), 5_000_000, 40)],
            vec![],
            capital,
            0,
        );
        let decision = evaluate(&without_sink).unwrap();
        let placed: Decimal = decision.ideal_positions.iter().map(|p| p.allocation_usd).sum();
        assert!(placed <= total, "capital {capital}");
        assert!(decision
            .ideal_positions
            .iter()
            .all(|p| p.allocation_usd <= Decimal::from(25_000)));
    }
}

#[test]
fn test_leftover_below_minimum_is_still_placed() {
    // 25k cap fills the bluechip pool; the 2k left cannot open a position
    let mut fresh = fresh_capital_input();
    fresh.total_capital_usd = Decimal::from(27_000);

    let decision = evaluate(&fresh).unwrap();

    assert_eq!(decision.ideal_positions.len(), 1);
    assert_eq!(decision.ideal_positions[0].pool_address, "0xb2");
    assert_eq!(decision.ideal_positions[0].allocation_usd, Decimal::from(27_000));
}

#[test]
fn test_unit_allocation_is_exact() {
    let items = vec![
        WeightedItem::new("0xa1", Decimal::new(3_333_333, 2)),
        WeightedItem::new("0xb2", Decimal::new(3_333_333, 2)),
        WeightedItem::new("0xc3", Decimal::new(3_333_334, 2)),
        WeightedItem::new("0xd4", Decimal::new(1, 2)),
    ];
    for total in [0u128, 1, 2, 3, 17, 1_000_003, 999_999_999_999_999_999, 10u128.pow(36), u128::MAX] {
        let allocs = allocate_units(&items, total).unwrap();
        let sum: u128 = allocs.iter().map(|a| a.amount).sum();
        assert_eq!(sum, total);
    }
}

#[test]
fn test_dispatch_plan_for_fresh_capital() {
    let decision = evaluate(&fresh_capital_input()).unwrap();
    // 50_000 USDC in 6-decimal native units
    let total_native: u128 = 50_000 * 1_000_000;

    let legs = plan_dispatch(&decision.actions, total_native).unwrap();

    assert_eq!(legs.len(), decision.actions.to_add.len());
    assert_eq!(legs.iter().map(|l| l.native_amount).sum::<u128>(), total_native);
    assert!(legs.windows(2).all(|w| w[0].pool_address <= w[1].pool_address));
}

#[test]
fn test_onchain_positions_feed_engine() {
    let onchain = vec![OnchainPosition {
        position_id: "nft-17".into(),
        pool_address: "0xold".into(),
        dex_name: "uniswap-v3".into(),
        token0_symbol: "USDC".into(),
        token1_symbol: "USDT".into(),
        liquidity: 987_654_321,
        current_yield_pct: Decimal::from(5),
        impermanent_loss_pct: None,
    }];
    let current = derive_positions_from_onchain(&onchain, Decimal::from(50_000)).unwrap();
    assert_eq!(current[0].allocation_usd, Decimal::from(50_000));

    let input = input(
        prefs(2, 25_000),
        vec![pool("0xnew", "USDC", "USDT", Decimal::from(9), 3_000_000, 60)],
        current,
        50_000,
        0,
    );
    let decision = evaluate(&input).unwrap();
    assert!(decision.should_execute, "reasons: {:?}", decision.reasons);
}

#[test]
fn test_invalid_preferences_are_an_error() {
    let mut input = fresh_capital_input();
    input.preferences.max_alloc_per_pos_usd = Decimal::ZERO;
    assert!(matches!(evaluate(&input), Err(EngineError::InvalidPreferences(_))));
}

#[test]
fn test_empty_allow_list_is_not_an_error() {
    let mut input = fresh_capital_input();
    input.preferences.allowed_token_symbols.clear();
    let decision = evaluate(&input).unwrap();
    assert!(decision.eligible.is_empty());
    assert!(decision.ideal_positions.is_empty());
    assert!(!decision.should_execute);
}

#[test]
fn test_decision_round_trips_through_json() {
    let decision = evaluate(&fresh_capital_input()).unwrap();
    let json = serde_json::to_string(&decision).unwrap();
    assert!(json.contains("\"shouldExecute\":true"));
    assert!(json.contains("\"toAdd\""));
    assert!(decision.summary().starts_with("EXECUTE dec_"));
}
