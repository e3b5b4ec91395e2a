pub mod generator;
pub mod series;

pub use series::ReturnSeries;
