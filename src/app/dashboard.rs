//! Plain-text dashboard for one assessment summary.

use crate::domain::{AssessmentMetadata, CatalogSummary, Percent};

pub const DEFAULT_BAR_WIDTH: usize = 30;

const FILLED: char = '█';
const EMPTY: char = '░';

/// `us-east-1 - 123456789012 (2024-01-15 10:30)`
pub fn assessment_label(metadata: &AssessmentMetadata) -> String {
    format!(
        "{} - {} ({})",
        metadata.region,
        metadata.account_id,
        metadata.timestamp.format("%Y-%m-%d %H:%M")
    )
}

pub fn render_dashboard(
    metadata: Option<&AssessmentMetadata>,
    summary: &CatalogSummary,
    bar_width: usize,
) -> String {
    let mut out = String::new();

    if let Some(metadata) = metadata {
        let label = assessment_label(metadata);
        out.push_str(&format!("{}\n{}\n\n", label, "=".repeat(label.chars().count())));
    }

    out.push_str(&metric("Databases", summary.database_count.to_string()));
    out.push_str(&metric("Tables", summary.table_count.to_string()));
    out.push_str(&metric(
        "Total Size",
        format!("{:.1} GB", summary.total_estimated_size_gb.as_gb()),
    ));
    out.push_str(&metric("Iceberg Tables", summary.iceberg_table_count.to_string()));
    out.push('\n');

    let readiness: Vec<_> = summary
        .readiness_breakdown
        .iter()
        .map(|(status, count)| (status.as_str(), *count))
        .collect();
    out.push_str(&bar_chart(
        "Migration Readiness Status",
        &readiness,
        "No readiness data available",
        bar_width,
    ));
    out.push('\n');

    let formats: Vec<_> = summary
        .format_breakdown
        .iter()
        .map(|(format, count)| (format.as_str(), *count))
        .collect();
    out.push_str(&bar_chart(
        "Table Format Distribution",
        &formats,
        "No format data available",
        bar_width,
    ));

    out
}

fn metric(label: &str, value: String) -> String {
    format!("{:<16}{}\n", label, value)
}

fn bar_chart(title: &str, entries: &[(&str, usize)], empty_message: &str, width: usize) -> String {
    let mut out = format!("{}\n", title);
    if entries.is_empty() {
        out.push_str(&format!("  {}\n", empty_message));
        return out;
    }

    let total: usize = entries.iter().map(|(_, count)| count).sum();
    let name_width = entries
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    for (name, count) in entries {
        let filled = scaled(*count, total, width);
        out.push_str(&format!(
            "  {:<name_width$}  {}{}  {} ({}%)\n",
            name,
            FILLED.to_string().repeat(filled),
            EMPTY.to_string().repeat(width - filled),
            count,
            Percent::of(*count, total),
            name_width = name_width
        ));
    }
    out
}

/// Rounds half-up; never exceeds `width`.
fn scaled(count: usize, total: usize, width: usize) -> usize {
    if total == 0 {
        return 0;
    }
    ((count * width * 2 + total) / (2 * total)).min(width)
}
