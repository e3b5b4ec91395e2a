pub mod histogram;
pub mod summary;
