use lp_rebalancer::config::{AppConfig, LogFormat};
use lp_rebalancer::metrics::init_metrics;
use lp_rebalancer::services::{load_batch, run_batch, EvaluatorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);
    let metrics_handle = init_metrics();

    tracing::info!(
        snapshot = %config.snapshot_path.display(),
        concurrency = config.eval_concurrency,
        il_fail_closed = config.il_fail_closed,
        "Loading evaluation snapshot"
    );

    let batch = load_batch(&config.snapshot_path).await?;

    let evaluator_config = EvaluatorConfig {
        concurrency: config.eval_concurrency,
        il_fail_closed: config.il_fail_closed,
    };
    let decisions = run_batch(batch, &evaluator_config).await;

    for entry in &decisions {
        tracing::info!(user_id = %entry.user_id, "{}", entry.decision.summary());
    }

    let payload = serde_json::to_string_pretty(&decisions)?;
    match &config.output_path {
        Some(path) => {
            tokio::fs::write(path, payload).await?;
            tracing::info!(path = %path.display(), count = decisions.len(), "Decisions written");
        }
        None => println!("{payload}"),
    }

    if config.metrics_dump {
        tracing::info!("Metrics snapshot:\n{}", metrics_handle.render());
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // Logs go to stderr; stdout carries the decisions.
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
