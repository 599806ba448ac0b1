use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use super::readiness::MigrationReadiness;
use super::size::SizeGb;
use super::table_format::TableFormat;

/// Headline counters of one assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AssessmentSummary {
    pub total_databases: usize,
    pub total_tables: usize,
    pub iceberg_tables: usize,
    pub migration_ready: usize,
    pub needs_conversion: usize,
    pub unknown: usize,
    pub total_estimated_size_gb: SizeGb,
}

impl AssessmentSummary {
    pub fn readiness_total(&self) -> usize {
        self.migration_ready + self.needs_conversion + self.unknown
    }
}

/// Summary shape handed to the CLI, the dashboard and the query tools.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CatalogSummary {
    pub database_count: usize,
    pub table_count: usize,
    pub iceberg_table_count: usize,
    pub total_estimated_size_gb: SizeGb,
    pub readiness_breakdown: BTreeMap<MigrationReadiness, usize>,
    pub format_breakdown: BTreeMap<TableFormat, usize>,
}

impl CatalogSummary {
    pub fn readiness_count(&self, readiness: MigrationReadiness) -> usize {
        self.readiness_breakdown.get(&readiness).copied().unwrap_or(0)
    }
}

/// A share of a total, rounded half-up to one decimal place.
///
/// Computed on the exact ratio with integer arithmetic, so `1 / 8` is
/// 12.5 and `1 / 16` (6.25) becomes 6.3. An empty total is 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Percent {
    tenths: u64,
}

impl Percent {
    pub fn of(part: usize, total: usize) -> Self {
        if total == 0 {
            return Self::default();
        }
        let part = part as u128;
        let total = total as u128;
        let tenths = (part * 2000 + total) / (2 * total);
        Self {
            tenths: tenths as u64,
        }
    }

    pub fn tenths(self) -> u64 {
        self.tenths
    }

    pub fn as_f64(self) -> f64 {
        self.tenths as f64 / 10.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}
