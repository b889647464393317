pub mod config;
pub mod errors;
pub mod execution;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod services;

pub use errors::{EngineError, EngineResult};
pub use execution::{evaluate, plan_dispatch};
pub use models::{Decision, EvaluationInput};
