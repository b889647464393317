use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// USD weights are fixed to this many decimal places (cents) before splitting.
pub const WEIGHT_PRECISION_DP: u32 = 2;

/// A keyed USD weight, e.g. a pool address and its target allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedItem {
    pub key: String,
    pub usd_weight: Decimal,
}

impl WeightedItem {
    pub fn new(key: impl Into<String>, usd_weight: Decimal) -> Self {
        Self {
            key: key.into(),
            usd_weight,
        }
    }
}

/// Integer share of the total assigned to one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAllocation {
    pub key: String,
    pub amount: u128,
}

/// Split `total` indivisible units across `items` proportionally to their USD weight.
///
/// Largest-remainder method on integers only: the result always sums to `total`
/// and ties are broken by ascending key, so the split is reproducible.
/// Output order matches input order.
///
/// Weights are fixed to cents. When every positive weight is below half a cent
/// they are fixed at their own finest scale instead, so dust weights still split.
pub fn allocate_units(items: &[WeightedItem], total: u128) -> EngineResult<Vec<UnitAllocation>> {
    let mut weights = fixed_weights(items, WEIGHT_PRECISION_DP)?;

    let collapsed = weights.iter().all(|(_, w)| *w == 0);
    if collapsed && items.iter().any(|item| item.usd_weight > Decimal::ZERO) {
        let finest = items
            .iter()
            .map(|item| item.usd_weight.scale())
            .max()
            .unwrap_or(WEIGHT_PRECISION_DP);
        weights = fixed_weights(items, finest)?;
    }

    allocate_units_by_weight(&weights, total)
}

/// Convert USD weights to integers at `dp` decimal places, half away from zero.
fn fixed_weights(items: &[WeightedItem], dp: u32) -> EngineResult<Vec<(String, u128)>> {
    let scale = Decimal::from_i128_with_scale(10i128.pow(dp), 0);

    items
        .iter()
        .map(|item| {
            if item.usd_weight < Decimal::ZERO {
                return Err(EngineError::UnitAllocation(format!(
                    "negative weight {} for {}",
                    item.usd_weight, item.key
                )));
            }
            let fixed = item
                .usd_weight
                .checked_mul(scale)
                .ok_or(EngineError::Overflow("weight conversion"))?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u128()
                .ok_or(EngineError::Overflow("weight conversion"))?;
            Ok((item.key.clone(), fixed))
        })
        .collect()
}

/// Largest-remainder split over integer weights.
///
/// `total × w / Σw` is computed as `q·w + r·w / Σw` with `total = q·Σw + r`,
/// so intermediates stay below `Σw · w` whatever the size of `total`.
pub fn allocate_units_by_weight(
    weights: &[(String, u128)],
    total: u128,
) -> EngineResult<Vec<UnitAllocation>> {
    let weight_sum = weights
        .iter()
        .try_fold(0u128, |acc, (_, w)| acc.checked_add(*w))
        .ok_or(EngineError::Overflow("weight sum"))?;

    if weight_sum == 0 {
        if total == 0 {
            return Ok(weights
                .iter()
                .map(|(key, _)| UnitAllocation {
                    key: key.clone(),
                    amount: 0,
                })
                .collect());
        }
        return Err(EngineError::UnitAllocation(format!(
            "cannot split {total} units across {} items with zero total weight",
            weights.len()
        )));
    }

    let quotient = total / weight_sum;
    let rest = total % weight_sum;

    let mut amounts = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    let mut base_sum = 0u128;

    for (idx, (_, weight)) in weights.iter().enumerate() {
        // quotient × weight ≤ total, so only the rest term can overflow
        let partial = rest
            .checked_mul(*weight)
            .ok_or(EngineError::Overflow("unit split"))?;
        let base = quotient * weight + partial / weight_sum;
        base_sum += base;
        amounts.push(base);
        remainders.push((idx, partial % weight_sum));
    }

    // Σbase ≤ total and the shortfall is strictly less than the item count.
    let leftover = total - base_sum;

    remainders.sort_by(|(a_idx, a_rem), (b_idx, b_rem)| {
        b_rem
            .cmp(a_rem)
            .then_with(|| weights[*a_idx].0.cmp(&weights[*b_idx].0))
    });

    for (idx, _) in remainders.iter().take(leftover as usize) {
        amounts[*idx] += 1;
    }

    Ok(weights
        .iter()
        .zip(amounts)
        .map(|((key, _), amount)| UnitAllocation {
            key: key.clone(),
            amount,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
