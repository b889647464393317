use rust_decimal::Decimal;

use crate::models::{same_pool, AdjustAction, CurrentPosition, IdealPosition, RebalanceActions};

/// Relative size change, in percent, of `current` → `ideal`.
/// A non-positive current size counts as a full (100%) change.
pub fn delta_pct(current_usd: Decimal, ideal_usd: Decimal) -> Decimal {
    if current_usd <= Decimal::ZERO {
        return Decimal::ONE_HUNDRED;
    }
    (ideal_usd - current_usd).abs() / current_usd * Decimal::ONE_HUNDRED
}

/// Compare the current portfolio with the ideal one.
///
/// - current position in no ideal pool → `to_withdraw` (full exit)
/// - matched, delta above the materiality threshold, growing → `to_add`
///   carrying only the top-up amount
/// - matched, delta above the threshold, shrinking → `to_adjust`
/// - ideal position with no current counterpart → `to_add`
///
/// Several current positions in one pool are compared as their combined size.
/// Every list is sorted by pool address.
pub fn diff_portfolio(
    current: &[CurrentPosition],
    ideal: &[IdealPosition],
    materiality_threshold_pct: Decimal,
) -> RebalanceActions {
    let mut actions = RebalanceActions::default();

    for pos in current {
        let targeted = ideal
            .iter()
            .any(|i| same_pool(&i.pool_address, &pos.pool_address));
        if !targeted {
            actions.to_withdraw.push(pos.clone());
        }
    }

    for target in ideal {
        let mut holdings = current
            .iter()
            .filter(|c| same_pool(&c.pool_address, &target.pool_address))
            .peekable();
        if holdings.peek().is_none() {
            actions.to_add.push(target.clone());
            continue;
        }
        let held: Decimal = holdings.map(|c| c.allocation_usd).sum();

        let delta = delta_pct(held, target.allocation_usd);
        if delta <= materiality_threshold_pct {
            continue;
        }

        if target.allocation_usd > held {
            actions.to_add.push(IdealPosition {
                allocation_usd: target.allocation_usd - held.max(Decimal::ZERO),
                ..target.clone()
            });
        } else {
            actions.to_adjust.push(AdjustAction {
                pool_address: target.pool_address.clone(),
                from_usd: held,
                to_usd: target.allocation_usd,
            });
        }
    }

    actions.to_withdraw.sort_by(|a, b| {
        a.pool_address
            .cmp(&b.pool_address)
            .then_with(|| a.position_id.cmp(&b.position_id))
    });
    actions.to_add.sort_by(|a, b| a.pool_address.cmp(&b.pool_address));
    actions.to_adjust.sort_by(|a, b| a.pool_address.cmp(&b.pool_address));

    actions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
