//! Statistical decision rules over tabular data: outliers, the 30% rule,
//! normality, correlation-method advice and data-quality advisories.

pub mod data;
pub mod error;
pub mod processing;
pub mod report;
pub mod state;
