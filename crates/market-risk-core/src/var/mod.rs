pub mod historical;
pub mod metrics;
pub mod monte_carlo;
pub mod parametric;
