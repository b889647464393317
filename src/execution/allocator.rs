use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::models::{same_pool, IdealPosition, Preferences, ScoredCandidate};

/// Highest effective yield first; equal yields fall back to ascending pool address.
fn by_yield_then_address(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.effective_yield_pct
        .cmp(&a.effective_yield_pct)
        .then_with(|| a.pool_address().cmp(b.pool_address()))
}

/// Most liquid zero-IL candidate: the place leftover capital is parked.
pub fn find_remainder_sink(candidates: &[ScoredCandidate]) -> Option<&ScoredCandidate> {
    candidates
        .iter()
        .filter(|c| c.is_zero_il())
        .min_by(|a, b| {
            b.pool
                .tvl_usd
                .cmp(&a.pool.tvl_usd)
                .then_with(|| a.pool_address().cmp(b.pool_address()))
        })
}

/// Greedily build the target portfolio from eligible, scored candidates.
///
/// Each position takes `min(maxAllocPerPos, remaining)`; slots are only
/// consumed by positions of at least `minPositionSize`. Whatever is left above
/// `minPositionSize` afterwards goes to the remainder sink. A smaller leftover
/// never opens a position of its own: it joins the sink if held, else the top
/// position. Either way the whole capital is placed whenever a zero-IL pool is
/// eligible and at least one position was built. Positions absorbing leftover
/// may exceed `maxAllocPerPos`.
pub fn build_ideal_portfolio(
    candidates: &[ScoredCandidate],
    total_capital_usd: Decimal,
    prefs: &Preferences,
) -> Vec<IdealPosition> {
    let mut ideal: Vec<IdealPosition> = Vec::new();
    if total_capital_usd <= Decimal::ZERO || candidates.is_empty() {
        return ideal;
    }

    let mut ranked: Vec<&ScoredCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| by_yield_then_address(a, b));

    let mut remaining = total_capital_usd;

    for candidate in ranked {
        if ideal.len() >= prefs.max_positions {
            break;
        }
        if ideal
            .iter()
            .any(|p| same_pool(&p.pool_address, candidate.pool_address()))
        {
            continue;
        }

        let proposed = prefs.max_alloc_per_pos_usd.min(remaining);
        if proposed < prefs.min_position_size_usd {
            continue;
        }

        ideal.push(IdealPosition::from_candidate(candidate, proposed));
        remaining -= proposed;

        if remaining < prefs.min_position_size_usd {
            break;
        }
    }

    if remaining > prefs.min_position_size_usd {
        place_remainder(&mut ideal, candidates, remaining, prefs);
    } else if remaining > Decimal::ZERO {
        absorb_dust(&mut ideal, candidates, remaining);
    }

    ideal
}

/// Leftover too small to stand as a position. Only placed when a sink exists,
/// matching the idle behaviour of larger remainders without one.
fn absorb_dust(ideal: &mut [IdealPosition], candidates: &[ScoredCandidate], remaining: Decimal) {
    let Some(sink) = find_remainder_sink(candidates) else {
        return;
    };

    let target = match ideal
        .iter()
        .position(|p| same_pool(&p.pool_address, sink.pool_address()))
    {
        Some(idx) => ideal.get_mut(idx),
        None => ideal.first_mut(),
    };

    match target {
        Some(position) => {
            position.allocation_usd += remaining;
            tracing::debug!(pool = %position.pool_address, remaining = %remaining, "Leftover below minimum absorbed");
        }
        None => {
            tracing::debug!(remaining = %remaining, "Capital below minimum position size left idle");
        }
    }
}

fn place_remainder(
    ideal: &mut Vec<IdealPosition>,
    candidates: &[ScoredCandidate],
    remaining: Decimal,
    prefs: &Preferences,
) {
    let Some(sink) = find_remainder_sink(candidates) else {
        tracing::debug!(
            remaining = %remaining,
            "No zero-IL pool eligible, leaving remainder unallocated"
        );
        return;
    };

    if let Some(existing) = ideal
        .iter_mut()
        .find(|p| same_pool(&p.pool_address, sink.pool_address()))
    {
        existing.allocation_usd += remaining;
        tracing::debug!(pool = %sink.pool_address(), remaining = %remaining, "Remainder added to sink position");
    } else if ideal.len() < prefs.max_positions {
        ideal.push(IdealPosition::from_candidate(sink, remaining));
        tracing::debug!(pool = %sink.pool_address(), remaining = %remaining, "Remainder opened as sink position");
    } else if let Some(first) = ideal.first_mut() {
        first.allocation_usd += remaining;
        tracing::debug!(pool = %first.pool_address, remaining = %remaining, "Remainder added to top position");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
