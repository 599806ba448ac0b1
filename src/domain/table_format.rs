use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage encoding of a catalog table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableFormat {
    Iceberg,
    Parquet,
    Orc,
    Avro,
    Unknown,
}

impl TableFormat {
    pub fn all_variants() -> &'static [TableFormat] {
        &[
            TableFormat::Iceberg,
            TableFormat::Parquet,
            TableFormat::Orc,
            TableFormat::Avro,
            TableFormat::Unknown,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Iceberg => "ICEBERG",
            Self::Parquet => "PARQUET",
            Self::Orc => "ORC",
            Self::Avro => "AVRO",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Plain file formats that have to be rewritten as Iceberg tables.
    pub fn is_file_format(self) -> bool {
        matches!(self, Self::Parquet | Self::Orc | Self::Avro)
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TableFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ICEBERG" => Ok(TableFormat::Iceberg),
            "PARQUET" => Ok(TableFormat::Parquet),
            "ORC" => Ok(TableFormat::Orc),
            "AVRO" => Ok(TableFormat::Avro),
            "UNKNOWN" => Ok(TableFormat::Unknown),
            _ => Err(format!("Unknown table format: {}", s)),
        }
    }
}
