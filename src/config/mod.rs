use std::env;
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON batch of per-user snapshots to evaluate.
    pub snapshot_path: PathBuf,
    /// Where decisions are written; stdout when unset.
    pub output_path: Option<PathBuf>,
    pub eval_concurrency: usize,
    pub log_format: LogFormat,
    /// Make the IL safeguard fail closed for every user.
    pub il_fail_closed: bool,
    /// Log the Prometheus payload once the batch is done.
    pub metrics_dump: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            snapshot_path: env::var("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .map_err(|_| anyhow::anyhow!("SNAPSHOT_PATH must be set"))?,
            output_path: env::var("OUTPUT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            eval_concurrency: env::var("EVAL_CONCURRENCY")
                .unwrap_or_else(|_| "4".into())
                .parse()?,
            log_format: LogFormat::from_str(
                &env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".into()),
            ),
            il_fail_closed: env::var("IL_FAIL_CLOSED")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            metrics_dump: env::var("METRICS_DUMP")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
        })
    }
}
