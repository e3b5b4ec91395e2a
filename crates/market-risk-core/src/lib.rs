pub mod config;
pub mod error;
pub mod statistics;
pub mod types;

pub mod hedging;
pub mod report;
pub mod returns;
pub mod stress;
pub mod var;

pub use config::RiskConfig;
pub use error::RiskError;
pub use types::*;

/// Standard result type for all market-risk operations
pub type RiskResult<T> = Result<T, RiskError>;
