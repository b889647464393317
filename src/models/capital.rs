use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};
use crate::execution::unit_allocator::allocate_units_by_weight;

use super::CurrentPosition;

/// Largest scale a `Decimal` can carry.
const MAX_DECIMALS: u32 = 28;

/// Treat an integer on-chain balance as the USD-equivalent capital figure.
///
/// No price oracle is involved: `amount` with `decimals` places is read as-is
/// (1_500_000 with 6 decimals → 1.5).
pub fn capital_from_native_units(amount: u128, decimals: u32) -> EngineResult<Decimal> {
    if decimals > MAX_DECIMALS {
        return Err(EngineError::InvalidInput(format!(
            "token decimals {decimals} exceed supported maximum {MAX_DECIMALS}"
        )));
    }
    let signed = i128::try_from(amount).map_err(|_| EngineError::Overflow("native amount"))?;
    Decimal::try_from_i128_with_scale(signed, decimals)
        .map(|d| d.normalize())
        .map_err(|_| EngineError::Overflow("native amount"))
}

/// Position as read from the custody contract: sizes are relative liquidity,
/// not USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnchainPosition {
    pub position_id: String,
    pub pool_address: String,
    pub dex_name: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    pub liquidity: u128,
    pub current_yield_pct: Decimal,
    #[serde(default)]
    pub impermanent_loss_pct: Option<Decimal>,
}

/// Turn on-chain positions into USD-denominated current positions by weighting
/// each one's liquidity against the known total capital.
///
/// Allocations are whole cents and sum exactly to `total_capital_usd` (rounded
/// to cents). Leftover cents go to the largest fractional shares, ties by
/// position id. All-zero liquidity yields zero allocations.
pub fn derive_positions_from_onchain(
    positions: &[OnchainPosition],
    total_capital_usd: Decimal,
) -> EngineResult<Vec<CurrentPosition>> {
    if total_capital_usd < Decimal::ZERO {
        return Err(EngineError::InvalidInput(format!(
            "total capital must not be negative, got {total_capital_usd}"
        )));
    }

    let total_cents = total_capital_usd
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(EngineError::Overflow("total capital"))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u128()
        .ok_or(EngineError::Overflow("total capital"))?;

    // Keep liquidity × cents inside u128: drop low bits uniformly when the
    // largest liquidity value needs more than 64 bits.
    let max_liquidity = positions.iter().map(|p| p.liquidity).max().unwrap_or(0);
    let shift = (128 - max_liquidity.leading_zeros()).saturating_sub(64);

    let all_zero = positions.iter().all(|p| p.liquidity == 0);
    let weights: Vec<(String, u128)> = positions
        .iter()
        .map(|p| (p.position_id.clone(), p.liquidity >> shift))
        .collect();

    let cents: Vec<u128> = if all_zero {
        vec![0; positions.len()]
    } else {
        allocate_units_by_weight(&weights, total_cents)?
            .into_iter()
            .map(|a| a.amount)
            .collect()
    };

    let mut derived = Vec::with_capacity(positions.len());
    for (pos, cents) in positions.iter().zip(cents) {
        let cents = i128::try_from(cents).map_err(|_| EngineError::Overflow("position size"))?;
        let allocation_usd = Decimal::try_from_i128_with_scale(cents, 2)
            .map_err(|_| EngineError::Overflow("position size"))?;
        derived.push(CurrentPosition {
            position_id: pos.position_id.clone(),
            pool_address: pos.pool_address.clone(),
            dex_name: pos.dex_name.clone(),
            token0_symbol: pos.token0_symbol.clone(),
            token1_symbol: pos.token1_symbol.clone(),
            allocation_usd,
            current_yield_pct: pos.current_yield_pct,
            impermanent_loss_pct: pos.impermanent_loss_pct,
        });
    }

    Ok(derived)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
