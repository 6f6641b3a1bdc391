pub mod health;
pub mod load_pdf;
pub mod load_url;

pub use health::{health_check, metrics, readiness_check};
pub use load_pdf::load_pdf;
pub use load_url::load_url;
