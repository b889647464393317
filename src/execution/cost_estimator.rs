use rust_decimal::Decimal;

use crate::models::{CurrentPosition, DecisionMetrics, IdealPosition, Preferences, RebalanceActions};

/// Gas units, relative to `expected_gas_usd`, of a full withdrawal.
/// Removal can need a swap-back, so it costs more than an add.
fn withdraw_gas_factor() -> Decimal {
    Decimal::new(18, 1) // 1.8
}

fn add_gas_factor() -> Decimal {
    Decimal::new(16, 1) // 1.6
}

/// One-off transaction cost of executing the actions.
pub fn estimate_gas_usd(withdraw_count: usize, add_count: usize, expected_gas_usd: Decimal) -> Decimal {
    Decimal::from(withdraw_count) * withdraw_gas_factor() * expected_gas_usd
        + Decimal::from(add_count) * add_gas_factor() * expected_gas_usd
}

/// Σ(allocation × yield) / total capital; zero when there is no capital.
pub fn weighted_yield_pct<I>(positions: I, total_capital_usd: Decimal) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    if total_capital_usd <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let weighted: Decimal = positions
        .into_iter()
        .map(|(allocation_usd, yield_pct)| allocation_usd * yield_pct)
        .sum();
    weighted / total_capital_usd
}

/// Yield gained over 30 days by moving from `current_pct` to `ideal_pct`.
pub fn profit_30d_usd(current_pct: Decimal, ideal_pct: Decimal, total_capital_usd: Decimal) -> Decimal {
    (ideal_pct - current_pct) / Decimal::ONE_HUNDRED * total_capital_usd * Decimal::from(30)
        / Decimal::from(365)
}

/// Cost/benefit figures for moving from `current` to `ideal` via `actions`.
pub fn estimate(
    current: &[CurrentPosition],
    ideal: &[IdealPosition],
    actions: &RebalanceActions,
    total_capital_usd: Decimal,
    prefs: &Preferences,
) -> DecisionMetrics {
    let current_weighted = weighted_yield_pct(
        current.iter().map(|p| (p.allocation_usd, p.current_yield_pct)),
        total_capital_usd,
    );
    let ideal_weighted = weighted_yield_pct(
        ideal.iter().map(|p| (p.allocation_usd, p.effective_yield_pct)),
        total_capital_usd,
    );

    let gas = estimate_gas_usd(
        actions.to_withdraw.len(),
        actions.to_add.len(),
        prefs.expected_gas_usd,
    );
    let profit = profit_30d_usd(current_weighted, ideal_weighted, total_capital_usd);

    DecisionMetrics {
        current_weighted_yield_pct: current_weighted,
        ideal_weighted_yield_pct: ideal_weighted,
        estimated_gas_usd: gas,
        profit_30d_usd: profit,
        net_profit_30d_usd: profit - gas,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
