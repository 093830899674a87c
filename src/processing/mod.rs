pub mod advisory;
pub mod analysis;
pub mod column_results;
pub mod correlation;
pub mod describe;
pub mod method_advisor;
pub mod normality;
pub mod outliers;
pub mod reliability;
pub mod statistics;
