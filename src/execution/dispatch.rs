use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::EngineResult;
use crate::models::RebalanceActions;

use super::unit_allocator::{allocate_units, WeightedItem};

/// One deposit the executor should submit, already in native units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchLeg {
    pub pool_address: String,
    pub dex_name: String,
    pub usd_target: Decimal,
    pub native_amount: u128,
}

/// Split `total_native_units` across the `to_add` targets by their USD weight.
///
/// The legs sum exactly to `total_native_units` and come back sorted by pool address.
pub fn plan_dispatch(actions: &RebalanceActions, total_native_units: u128) -> EngineResult<Vec<DispatchLeg>> {
    if actions.to_add.is_empty() {
        return Ok(Vec::new());
    }

    let items: Vec<WeightedItem> = actions
        .to_add
        .iter()
        .map(|target| WeightedItem::new(target.pool_address.clone(), target.allocation_usd))
        .collect();

    let allocations = allocate_units(&items, total_native_units)?;

    let mut legs: Vec<DispatchLeg> = actions
        .to_add
        .iter()
        .zip(allocations)
        .map(|(target, alloc)| DispatchLeg {
            pool_address: target.pool_address.clone(),
            dex_name: target.dex_name.clone(),
            usd_target: target.allocation_usd,
            native_amount: alloc.amount,
        })
        .collect();
    legs.sort_by(|a, b| a.pool_address.cmp(&b.pool_address));

    tracing::debug!(
        legs = legs.len(),
        total_native_units = %total_native_units,
        "Dispatch plan built"
    );

    Ok(legs)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
