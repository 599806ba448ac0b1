pub mod csv;
pub mod json;
pub mod markdown;

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::AssessmentSnapshot;

pub const JSON_REPORT: &str = "glue-catalog-assessment.json";
pub const MARKDOWN_REPORT: &str = "glue-catalog-assessment.md";
pub const CSV_REPORT: &str = "glue-catalog-assessment.csv";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Serialize(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub json: PathBuf,
    pub markdown: PathBuf,
    pub csv: PathBuf,
}

/// Renders every report format into `output_dir`, creating it if needed.
pub fn write_all(snapshot: &AssessmentSnapshot, output_dir: &Path) -> Result<ReportFiles, ReportError> {
    fs::create_dir_all(output_dir).map_err(|source| ReportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let files = ReportFiles {
        json: output_dir.join(JSON_REPORT),
        markdown: output_dir.join(MARKDOWN_REPORT),
        csv: output_dir.join(CSV_REPORT),
    };

    write_file(&files.json, &json::render(snapshot)?)?;
    write_file(&files.markdown, &markdown::render(snapshot))?;
    write_file(&files.csv, &csv::render(snapshot)?)?;

    tracing::info!(dir = %output_dir.display(), "reports written");
    Ok(files)
}

fn write_file(path: &Path, content: &str) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
