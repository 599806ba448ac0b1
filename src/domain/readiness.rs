use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a table can move as-is, needs a format rewrite, or needs a human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationReadiness {
    Ready,
    NeedsConversion,
    Unknown,
}

impl MigrationReadiness {
    pub fn all_variants() -> &'static [MigrationReadiness] {
        &[
            MigrationReadiness::Ready,
            MigrationReadiness::NeedsConversion,
            MigrationReadiness::Unknown,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::NeedsConversion => "NEEDS_CONVERSION",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MigrationReadiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MigrationReadiness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "READY" => Ok(MigrationReadiness::Ready),
            "NEEDS_CONVERSION" => Ok(MigrationReadiness::NeedsConversion),
            "UNKNOWN" => Ok(MigrationReadiness::Unknown),
            _ => Err(format!("Unknown readiness status: {}", s)),
        }
    }
}
