pub mod aggregator;
pub mod assessor;
pub mod classifier;
pub mod dashboard;
pub mod diff;
pub mod migrations;
pub mod normalizer;
pub mod ports;
pub mod queries;
pub mod report;
pub mod tools;

#[cfg(test)]
pub(crate) mod fixtures;
