pub mod capital;
pub mod decision;
pub mod input;
pub mod pool;
pub mod position;
pub mod preferences;

pub use capital::{capital_from_native_units, derive_positions_from_onchain, OnchainPosition};
pub use decision::{AdjustAction, Decision, DecisionMetrics, RebalanceActions};
pub use input::EvaluationInput;
pub use pool::{CandidatePool, PairCategory, ScoredCandidate};
pub use position::{same_pool, CurrentPosition, IdealPosition};
pub use preferences::Preferences;
