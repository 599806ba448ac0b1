use serde::{Deserialize, Serialize};

use super::ids::{AssessmentId, DatabaseId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseDescriptor {
    pub id: DatabaseId,
    pub assessment_id: AssessmentId,
    pub database_name: String,
    pub description: Option<String>,
    pub location_uri: Option<String>,
    /// Filled in once every table of the database has been classified.
    pub table_count: usize,
}

impl DatabaseDescriptor {
    pub fn new(
        database_name: impl Into<String>,
        description: Option<String>,
        location_uri: Option<String>,
    ) -> Self {
        Self {
            id: DatabaseId::new(),
            assessment_id: AssessmentId::from_string(""),
            database_name: database_name.into(),
            description,
            location_uri,
            table_count: 0,
        }
    }
}
