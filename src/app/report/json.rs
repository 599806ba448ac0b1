use serde::Serialize;

use super::ReportError;
use crate::app::aggregator::snapshot_summary;
use crate::domain::{
    AssessmentMetadata, AssessmentSnapshot, AssessmentSummary, DatabaseDescriptor, TableDescriptor,
};

#[derive(Serialize)]
struct JsonReport<'a> {
    assessment_metadata: &'a AssessmentMetadata,
    summary: AssessmentSummary,
    databases: &'a [DatabaseDescriptor],
    tables: &'a [TableDescriptor],
}

pub fn render(snapshot: &AssessmentSnapshot) -> Result<String, ReportError> {
    let report = JsonReport {
        assessment_metadata: snapshot.metadata(),
        summary: snapshot_summary(snapshot),
        databases: snapshot.databases(),
        tables: snapshot.tables(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| ReportError::Serialize(e.to_string()))
}
