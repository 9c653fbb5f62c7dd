pub mod metrics;
pub mod summary;
