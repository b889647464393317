pub mod filter;
pub mod scorer;

pub use filter::{check_eligibility, filter_eligible, is_eligible, Ineligibility};
pub use scorer::{effective_yield, il_risk_factor, score_pool, TokenClass};
