pub mod aws_cli;
pub mod json_store;

pub use aws_cli::AwsCliCatalog;
pub use json_store::JsonFileAssessmentStore;
