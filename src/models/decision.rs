use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CurrentPosition, IdealPosition, ScoredCandidate};

/// A matched position whose allocation should shrink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustAction {
    pub pool_address: String,
    pub from_usd: Decimal,
    pub to_usd: Decimal,
}

/// Changes needed to move from the current portfolio to the ideal one.
///
/// All three lists are sorted by pool address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceActions {
    pub to_withdraw: Vec<CurrentPosition>,
    pub to_add: Vec<IdealPosition>,
    pub to_adjust: Vec<AdjustAction>,
}

impl RebalanceActions {
    pub fn is_empty(&self) -> bool {
        self.to_withdraw.is_empty() && self.to_add.is_empty() && self.to_adjust.is_empty()
    }
}

/// Yield, cost and profit figures backing a decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMetrics {
    pub current_weighted_yield_pct: Decimal,
    pub ideal_weighted_yield_pct: Decimal,
    pub estimated_gas_usd: Decimal,
    pub profit_30d_usd: Decimal,
    pub net_profit_30d_usd: Decimal,
}

/// Output of one engine evaluation. Consumed once by the executor, then logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub total_capital_usd: Decimal,
    pub eligible: Vec<ScoredCandidate>,
    pub ideal_positions: Vec<IdealPosition>,
    pub actions: RebalanceActions,
    pub metrics: DecisionMetrics,
    pub should_execute: bool,
    pub reasons: Vec<String>,
}

impl Decision {
    /// One-line form for logs and notifications.
    pub fn summary(&self) -> String {
        let verdict = if self.should_execute { "EXECUTE" } else { "HOLD" };
        let mut line = format!(
            "{verdict} {}: withdraw={} add={} adjust={} apy {:.4}% -> {:.4}% gas=${:.2} net30d=${:.2}",
            self.id,
            self.actions.to_withdraw.len(),
            self.actions.to_add.len(),
            self.actions.to_adjust.len(),
            self.metrics.current_weighted_yield_pct,
            self.metrics.ideal_weighted_yield_pct,
            self.metrics.estimated_gas_usd,
            self.metrics.net_profit_30d_usd,
        );
        if !self.reasons.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.reasons.join("; "));
        }
        line
    }
}
