pub mod limits;
pub mod stress_test;
