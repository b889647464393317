use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::SecondsFormat;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::errors::{EngineError, EngineResult};
use crate::models::{EvaluationInput, ScoredCandidate};

/// Prefix of every decision id.
const ID_PREFIX: &str = "dec_";

/// Bytes of the digest kept in the id.
const ID_DIGEST_BYTES: usize = 16;

/// Deterministic fingerprint of a decision's inputs.
///
/// Covers the evaluation timestamp, preferences, total capital, the eligible
/// set reduced to (address, effective yield) and the current positions reduced
/// to (address, allocation, yield). Decimals are normalised and every object is
/// serialised with sorted keys, and both reduced sets are sorted, so the id
/// does not depend on field order, decimal scale or snapshot ordering.
///
/// The id is a correlation key for idempotency, not a security boundary.
pub fn decision_id(input: &EvaluationInput, eligible: &[ScoredCandidate]) -> EngineResult<String> {
    let payload = fingerprint_payload(input, eligible)?;

    let mut canonical = String::new();
    write_canonical(&payload, &mut canonical);

    let digest = Sha256::digest(canonical.as_bytes());
    let mut id = String::with_capacity(ID_PREFIX.len() + ID_DIGEST_BYTES * 2);
    id.push_str(ID_PREFIX);
    for byte in digest.iter().take(ID_DIGEST_BYTES) {
        let _ = write!(id, "{byte:02x}");
    }
    Ok(id)
}

fn fingerprint_payload(input: &EvaluationInput, eligible: &[ScoredCandidate]) -> EngineResult<Value> {
    let mut candidates: Vec<(String, String)> = eligible
        .iter()
        .map(|c| {
            (
                c.pool_address().to_lowercase(),
                c.effective_yield_pct.normalize().to_string(),
            )
        })
        .collect();
    candidates.sort();

    let mut positions: Vec<(String, String, String)> = input
        .current_positions
        .iter()
        .map(|p| {
            (
                p.pool_address.to_lowercase(),
                p.allocation_usd.normalize().to_string(),
                p.current_yield_pct.normalize().to_string(),
            )
        })
        .collect();
    positions.sort();

    let preferences = serde_json::to_value(input.preferences.canonical())
        .map_err(|e| EngineError::InvalidInput(format!("preferences not serialisable: {e}")))?;

    Ok(json!({
        "timestamp": input.now.to_rfc3339_opts(SecondsFormat::Millis, true),
        "preferences": preferences,
        "totalCapitalUsd": input.total_capital_usd.normalize().to_string(),
        "candidates": candidates
            .into_iter()
            .map(|(pool_address, effective_yield_pct)| json!({
                "poolAddress": pool_address,
                "effectiveYieldPct": effective_yield_pct,
            }))
            .collect::<Vec<_>>(),
        "positions": positions
            .into_iter()
            .map(|(pool_address, allocation_usd, yield_pct)| json!({
                "poolAddress": pool_address,
                "allocationUsd": allocation_usd,
                "yieldPct": yield_pct,
            }))
            .collect::<Vec<_>>(),
    }))
}

/// Serialise `value` as compact JSON with object keys sorted at every level.
pub fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            out.push('{');
            for (i, (key, val)) in sorted.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
