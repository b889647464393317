use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use futures_util::{stream, StreamExt};
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

use crate::execution::evaluate;
use crate::models::{Decision, EvaluationInput};

/// One user's snapshot inside a batch file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvaluation {
    pub user_id: String,
    #[serde(flatten)]
    pub input: EvaluationInput,
}

/// A scheduler tick's worth of snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationBatch {
    pub evaluations: Vec<UserEvaluation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDecision {
    pub user_id: String,
    pub decision: Decision,
}

/// Options applied to every evaluation in a batch.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    pub concurrency: usize,
    /// Force the IL safeguard to fail closed for every user.
    pub il_fail_closed: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            il_fail_closed: false,
        }
    }
}

/// Read and parse a batch snapshot file.
pub async fn load_batch(path: &Path) -> anyhow::Result<EvaluationBatch> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let batch: EvaluationBatch = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(batch)
}

/// Evaluate every user in the batch.
///
/// Evaluations are independent, so they run on the blocking pool with at most
/// `concurrency` in flight. A failed evaluation is logged and skipped for this
/// cycle; the rest of the batch still completes. Results are sorted by user id.
pub async fn run_batch(batch: EvaluationBatch, config: &EvaluatorConfig) -> Vec<UserDecision> {
    let total = batch.evaluations.len();
    let il_fail_closed = config.il_fail_closed;

    tracing::info!(
        users = total,
        concurrency = config.concurrency,
        "Evaluation batch started"
    );

    let mut decisions: Vec<UserDecision> = stream::iter(batch.evaluations)
        .map(|mut user| async move {
            if il_fail_closed {
                user.input.preferences.il_safeguard_fail_closed = true;
            }
            let user_id = user.user_id.clone();
            let start = Instant::now();
            let result = tokio::task::spawn_blocking(move || evaluate(&user.input)).await;
            histogram!("decision_latency_seconds").record(start.elapsed().as_secs_f64());
            (user_id, result)
        })
        .buffer_unordered(config.concurrency.max(1))
        .filter_map(|(user_id, result)| async move {
            match result {
                Ok(Ok(decision)) => {
                    counter!("decisions_total").increment(1);
                    if decision.should_execute {
                        counter!("decisions_executable").increment(1);
                        tracing::info!(
                            user_id = %user_id,
                            decision_id = %decision.id,
                            withdraw = decision.actions.to_withdraw.len(),
                            add = decision.actions.to_add.len(),
                            net_profit_30d = %decision.metrics.net_profit_30d_usd,
                            "Rebalance approved"
                        );
                    } else {
                        tracing::info!(
                            user_id = %user_id,
                            decision_id = %decision.id,
                            reasons = ?decision.reasons,
                            "Rebalance held"
                        );
                    }
                    Some(UserDecision { user_id, decision })
                }
                Ok(Err(e)) => {
                    counter!("decisions_failed").increment(1);
                    tracing::warn!(
                        user_id = %user_id,
                        error = %e,
                        "Evaluation rejected, skipping user this cycle"
                    );
                    None
                }
                Err(e) => {
                    counter!("decisions_failed").increment(1);
                    tracing::error!(
                        user_id = %user_id,
                        error = %e,
                        "Evaluation task failed"
                    );
                    None
                }
            }
        })
        .collect()
        .await;

    decisions.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    tracing::info!(
        users = total,
        decided = decisions.len(),
        executable = decisions.iter().filter(|d| d.decision.should_execute).count(),
        "Evaluation batch finished"
    );

    decisions
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
