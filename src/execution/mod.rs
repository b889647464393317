pub mod allocator;
pub mod cost_estimator;
pub mod differ;
pub mod dispatch;
pub mod engine;
pub mod gate;
pub mod identity;
pub mod unit_allocator;

pub use allocator::build_ideal_portfolio;
pub use differ::diff_portfolio;
pub use dispatch::{plan_dispatch, DispatchLeg};
pub use engine::evaluate;
pub use gate::{evaluate_gate, GateOutcome, GateViolation};
pub use identity::decision_id;
pub use unit_allocator::{allocate_units, UnitAllocation, WeightedItem};
