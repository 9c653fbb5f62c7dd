pub mod json;
pub mod results;
