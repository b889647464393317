pub mod evaluator;

pub use evaluator::{load_batch, run_batch, EvaluationBatch, EvaluatorConfig, UserDecision, UserEvaluation};
