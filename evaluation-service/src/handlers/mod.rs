pub mod evaluate;
pub mod health;
pub mod tweet;

pub use evaluate::evaluate;
pub use health::{health_check, metrics, readiness_check};
pub use tweet::tweet;
