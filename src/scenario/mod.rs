pub mod file;
pub mod random;
pub mod sample;
pub mod scenario;
