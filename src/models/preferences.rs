use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

fn default_min_position_size_usd() -> Decimal {
    Decimal::from(3_000)
}

fn default_min_tvl_usd() -> Decimal {
    Decimal::from(1_000_000)
}

fn default_min_age_days() -> u32 {
    14
}

fn default_daily_rebalance_limit() -> u32 {
    8
}

fn default_expected_gas_usd() -> Decimal {
    Decimal::ONE
}

fn default_min_yield_improvement_pct() -> Decimal {
    Decimal::new(7, 1) // 0.7
}

fn default_gas_cover_multiplier() -> Decimal {
    Decimal::from(4)
}

fn default_materiality_threshold_pct() -> Decimal {
    Decimal::from(5)
}

/// User rebalancing preferences with every optional override resolved.
///
/// Defaults are applied once, when the value is built or deserialized;
/// nothing downstream re-checks for missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub min_yield_pct: Decimal,
    pub allowed_token_symbols: BTreeSet<String>,
    /// Empty or absent means every venue is allowed.
    #[serde(default)]
    pub allowed_dex_names: Option<BTreeSet<String>>,
    pub max_positions: usize,
    pub max_alloc_per_pos_usd: Decimal,
    #[serde(default = "default_min_position_size_usd")]
    pub min_position_size_usd: Decimal,
    #[serde(default = "default_min_tvl_usd")]
    pub min_tvl_usd: Decimal,
    #[serde(default = "default_min_age_days")]
    pub min_age_days: u32,
    #[serde(default = "default_daily_rebalance_limit")]
    pub daily_rebalance_limit: u32,
    #[serde(default = "default_expected_gas_usd")]
    pub expected_gas_usd: Decimal,
    #[serde(default = "default_min_yield_improvement_pct")]
    pub min_yield_improvement_pct: Decimal,
    #[serde(default = "default_gas_cover_multiplier")]
    pub gas_cover_multiplier: Decimal,
    #[serde(default = "default_materiality_threshold_pct")]
    pub materiality_threshold_pct: Decimal,
    /// Treat a withdraw candidate without an IL reading as failing the IL safeguard.
    #[serde(default)]
    pub il_safeguard_fail_closed: bool,
}

impl Preferences {
    /// Build preferences from the required fields, defaulting the rest.
    pub fn new<I, S>(
        min_yield_pct: Decimal,
        allowed_token_symbols: I,
        max_positions: usize,
        max_alloc_per_pos_usd: Decimal,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_yield_pct,
            allowed_token_symbols: allowed_token_symbols.into_iter().map(Into::into).collect(),
            allowed_dex_names: None,
            max_positions,
            max_alloc_per_pos_usd,
            min_position_size_usd: default_min_position_size_usd(),
            min_tvl_usd: default_min_tvl_usd(),
            min_age_days: default_min_age_days(),
            daily_rebalance_limit: default_daily_rebalance_limit(),
            expected_gas_usd: default_expected_gas_usd(),
            min_yield_improvement_pct: default_min_yield_improvement_pct(),
            gas_cover_multiplier: default_gas_cover_multiplier(),
            materiality_threshold_pct: default_materiality_threshold_pct(),
            il_safeguard_fail_closed: false,
        }
    }

    /// Reject structurally invalid preferences.
    ///
    /// An empty token allow-list is valid: it simply makes nothing eligible.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_positions == 0 {
            return Err(EngineError::InvalidPreferences(
                "maxPositions must be at least 1".into(),
            ));
        }
        if self.max_alloc_per_pos_usd <= Decimal::ZERO {
            return Err(EngineError::InvalidPreferences(format!(
                "maxAllocPerPosUsd must be positive, got {}",
                self.max_alloc_per_pos_usd
            )));
        }

        let non_negative = [
            ("minYieldPct", self.min_yield_pct),
            ("minPositionSizeUsd", self.min_position_size_usd),
            ("minTvlUsd", self.min_tvl_usd),
            ("expectedGasUsd", self.expected_gas_usd),
            ("minYieldImprovementPct", self.min_yield_improvement_pct),
            ("gasCoverMultiplier", self.gas_cover_multiplier),
            ("materialityThresholdPct", self.materiality_threshold_pct),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(EngineError::InvalidPreferences(format!(
                "{name} must not be negative, got {value}"
            )));
        }

        if self.min_position_size_usd > self.max_alloc_per_pos_usd {
            return Err(EngineError::InvalidPreferences(format!(
                "minPositionSizeUsd {} exceeds maxAllocPerPosUsd {}",
                self.min_position_size_usd, self.max_alloc_per_pos_usd
            )));
        }

        Ok(())
    }

    /// Case-insensitive token allow-list membership.
    pub fn allows_token(&self, symbol: &str) -> bool {
        self.allowed_token_symbols
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(symbol))
    }

    /// Venue allow-list membership; an empty or absent list allows every venue.
    pub fn allows_dex(&self, dex_name: &str) -> bool {
        match &self.allowed_dex_names {
            Some(names) if !names.is_empty() => names.contains(dex_name),
            _ => true,
        }
    }

    /// Copy with every decimal in canonical scale and token symbols upper-cased,
    /// so equal preferences always fingerprint identically.
    pub fn canonical(&self) -> Self {
        Self {
            min_yield_pct: self.min_yield_pct.normalize(),
            allowed_token_symbols: self
                .allowed_token_symbols
                .iter()
                .map(|s| s.to_uppercase())
                .collect(),
            allowed_dex_names: self
                .allowed_dex_names
                .clone()
                .filter(|names| !names.is_empty()),
            max_positions: self.max_positions,
            max_alloc_per_pos_usd: self.max_alloc_per_pos_usd.normalize(),
            min_position_size_usd: self.min_position_size_usd.normalize(),
            min_tvl_usd: self.min_tvl_usd.normalize(),
            min_age_days: self.min_age_days,
            daily_rebalance_limit: self.daily_rebalance_limit,
            expected_gas_usd: self.expected_gas_usd.normalize(),
            min_yield_improvement_pct: self.min_yield_improvement_pct.normalize(),
            gas_cover_multiplier: self.gas_cover_multiplier.normalize(),
            materiality_threshold_pct: self.materiality_threshold_pct.normalize(),
            il_safeguard_fail_closed: self.il_safeguard_fail_closed,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
