use serde::Serialize;

use crate::app::aggregator::snapshot_catalog_summary;
use crate::app::diff::{AssessmentDiff, compare};
use crate::app::ports::{AssessmentFilter, AssessmentStore, StoreError};
use crate::domain::{
    AssessmentId, AssessmentMetadata, AssessmentSnapshot, CatalogSummary, MigrationReadiness,
    SizeGb, TableDescriptor, TableFormat,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Invalid {name}: {reason}")]
    InvalidArgument { name: String, reason: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Assessment header plus its aggregated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentOverview {
    #[serde(flatten)]
    pub metadata: AssessmentMetadata,
    pub summary: CatalogSummary,
}

impl AssessmentOverview {
    pub fn of(snapshot: &AssessmentSnapshot) -> Self {
        Self {
            metadata: snapshot.metadata().clone(),
            summary: snapshot_catalog_summary(snapshot),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormatMatches {
    pub tables: Vec<TableDescriptor>,
    pub total_size: SizeGb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentComparison {
    pub baseline: AssessmentOverview,
    pub target: AssessmentOverview,
    #[serde(flatten)]
    pub diff: AssessmentDiff,
}

/// Read-side queries over persisted assessments.
pub struct AssessmentQueries<'a> {
    store: &'a dyn AssessmentStore,
}

impl<'a> AssessmentQueries<'a> {
    pub fn new(store: &'a dyn AssessmentStore) -> Self {
        Self { store }
    }

    pub fn latest_assessment(
        &self,
        filter: &AssessmentFilter,
    ) -> Result<(AssessmentSnapshot, AssessmentOverview), QueryError> {
        match self.store.latest(filter)? {
            Some(snapshot) => {
                let overview = AssessmentOverview::of(&snapshot);
                Ok((snapshot, overview))
            }
            None => Err(QueryError::NotFound {
                entity: "Assessment",
                id: format!(
                    "region={}, account_id={}",
                    filter.region.as_deref().unwrap_or("any"),
                    filter.account_id.as_deref().unwrap_or("any")
                ),
            }),
        }
    }

    pub fn snapshot(&self, id: &AssessmentId) -> Result<AssessmentSnapshot, QueryError> {
        self.store
            .get(id)?
            .ok_or_else(|| QueryError::NotFound {
                entity: "Assessment",
                id: id.to_string(),
            })
    }

    pub fn database_summary(&self, id: &AssessmentId) -> Result<AssessmentOverview, QueryError> {
        Ok(AssessmentOverview::of(&self.snapshot(id)?))
    }

    pub fn tables_by_readiness(
        &self,
        id: &AssessmentId,
        readiness: MigrationReadiness,
    ) -> Result<Vec<TableDescriptor>, QueryError> {
        self.filter_tables(id, |t| t.migration_readiness == readiness)
    }

    pub fn tables_by_format(
        &self,
        id: &AssessmentId,
        format: TableFormat,
    ) -> Result<FormatMatches, QueryError> {
        let tables = self.filter_tables(id, |t| t.table_format == format)?;
        let total_size = tables.iter().map(TableDescriptor::size_or_zero).sum();
        Ok(FormatMatches { tables, total_size })
    }

    /// Matches `pattern` as SQL LIKE against table names, or exactly
    /// against database names.
    pub fn search_tables(
        &self,
        id: &AssessmentId,
        pattern: &str,
    ) -> Result<Vec<TableDescriptor>, QueryError> {
        self.filter_tables(id, |t| {
            like_match(pattern, &t.table_name) || t.database_name == pattern
        })
    }

    /// Both ids must resolve before anything is compared.
    pub fn compare_assessments(
        &self,
        baseline_id: &AssessmentId,
        target_id: &AssessmentId,
    ) -> Result<AssessmentComparison, QueryError> {
        let baseline = self.snapshot(baseline_id)?;
        let target = self.snapshot(target_id)?;

        Ok(AssessmentComparison {
            baseline: AssessmentOverview::of(&baseline),
            target: AssessmentOverview::of(&target),
            diff: compare(&baseline, &target),
        })
    }

    fn filter_tables(
        &self,
        id: &AssessmentId,
        predicate: impl Fn(&TableDescriptor) -> bool,
    ) -> Result<Vec<TableDescriptor>, QueryError> {
        let snapshot = self.snapshot(id)?;
        Ok(snapshot
            .tables()
            .iter()
            .filter(|t| predicate(t))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    AnySequence,
    AnyChar,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::AnySequence,
            '_' => LikeToken::AnyChar,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// Case-sensitive SQL `LIKE`: `%` is any run, `_` one character, and a
/// backslash escapes the next character.
pub fn like_match(pattern: &str, text: &str) -> bool {
    let tokens = like_tokens(pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Last `%` seen and the text position it is currently stretched to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(LikeToken::AnySequence) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(LikeToken::AnyChar) => {
                p += 1;
                t += 1;
            }
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    backtrack = Some((star, matched + 1));
                    p = star + 1;
                    t = matched + 1;
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|tok| *tok == LikeToken::AnySequence)
}
