pub mod hedge;
pub mod report;
pub mod stress;
