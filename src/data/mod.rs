pub mod cleaning;
pub mod dataset;
pub mod datetime;
pub mod loader;
pub mod parser;
