use std::collections::BTreeMap;

use crate::app::aggregator::{per_database, snapshot_summary};
use crate::domain::{AssessmentSnapshot, AssessmentSummary, Percent, TableDescriptor};

pub fn render(snapshot: &AssessmentSnapshot) -> String {
    let summary = snapshot_summary(snapshot);
    let sections = [
        header(snapshot),
        executive_summary(&summary),
        readiness_breakdown(&summary),
        database_overview(snapshot),
        table_details(snapshot.tables()),
        recommendations(&summary),
    ];
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

fn header(snapshot: &AssessmentSnapshot) -> String {
    let metadata = snapshot.metadata();
    format!(
        "# AWS Glue Catalog Assessment\n\n\
         **Generated:** {}\n\
         **Region:** {}\n\
         **AWS Account:** {}",
        metadata.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        metadata.region,
        metadata.account_id
    )
}

fn executive_summary(summary: &AssessmentSummary) -> String {
    format!(
        "## Executive Summary\n\n\
         - **Total Databases:** {}\n\
         - **Total Tables:** {}\n\
         - **Iceberg Tables:** {} ({}%)\n\
         - **Migration Ready:** {} tables\n\
         - **Needs Conversion:** {} tables\n\
         - **Total Estimated Storage:** {:.1} GB",
        summary.total_databases,
        summary.total_tables,
        summary.iceberg_tables,
        Percent::of(summary.iceberg_tables, summary.total_tables),
        summary.migration_ready,
        summary.needs_conversion,
        summary.total_estimated_size_gb.as_gb()
    )
}

fn readiness_breakdown(summary: &AssessmentSummary) -> String {
    let title = "## Migration Readiness Breakdown";
    let total = summary.total_tables;
    if total == 0 {
        return format!("{}\n\nNo tables found.", title);
    }

    let rows: Vec<Vec<String>> = [
        ("READY", summary.migration_ready),
        ("NEEDS_CONVERSION", summary.needs_conversion),
        ("UNKNOWN", summary.unknown),
    ]
    .into_iter()
    .map(|(status, count)| {
        vec![
            status.to_string(),
            count.to_string(),
            format!("{}%", Percent::of(count, total)),
        ]
    })
    .collect();

    format!(
        "{}\n\n{}",
        title,
        pipe_table(&["Status", "Count", "Percentage"], &rows)
    )
}

fn database_overview(snapshot: &AssessmentSnapshot) -> String {
    let title = "## Database Overview";
    if snapshot.databases().is_empty() {
        return format!("{}\n\nNo databases found.", title);
    }

    let rows: Vec<Vec<String>> = per_database(snapshot)
        .into_iter()
        .map(|rollup| {
            let storage = if rollup.total_size.is_zero() {
                "N/A".to_string()
            } else {
                format!("{:.1}", rollup.total_size.as_gb())
            };
            vec![
                rollup.database_name,
                rollup.table_count.to_string(),
                rollup.iceberg_tables.to_string(),
                storage,
            ]
        })
        .collect();

    format!(
        "{}\n\n{}",
        title,
        pipe_table(&["Database", "Tables", "Iceberg Tables", "Storage (GB)"], &rows)
    )
}

fn table_details(tables: &[TableDescriptor]) -> String {
    let title = "## Detailed Table Inventory";
    if tables.is_empty() {
        return format!("{}\n\nNo tables found.", title);
    }

    let mut by_database: BTreeMap<&str, Vec<&TableDescriptor>> = BTreeMap::new();
    for table in tables {
        by_database
            .entry(table.database_name.as_str())
            .or_default()
            .push(table);
    }

    let mut out = title.to_string();
    for (database, tables) in by_database {
        let rows: Vec<Vec<String>> = tables
            .iter()
            .map(|t| {
                vec![
                    t.table_name.clone(),
                    t.table_format.to_string(),
                    t.estimated_size_gb
                        .map_or_else(|| "N/A".to_string(), |s| format!("{:.1}", s.as_gb())),
                    if t.partition_keys.is_empty() {
                        "None".to_string()
                    } else {
                        t.partition_keys.join(", ")
                    },
                    t.migration_readiness.to_string(),
                    t.notes.join("; "),
                ]
            })
            .collect();

        out.push_str(&format!("\n\n### Database: {}\n\n", database));
        out.push_str(&pipe_table(
            &["Table", "Format", "Size (GB)", "Partitions", "Readiness", "Notes"],
            &rows,
        ));
    }
    out
}

fn recommendations(summary: &AssessmentSummary) -> String {
    let mut lines = vec![
        "## Recommendations".to_string(),
        String::new(),
        "### Migration Strategy".to_string(),
        String::new(),
    ];

    if summary.migration_ready > 0 {
        lines.push(format!(
            "- **{} Iceberg tables (READY):** Can be migrated immediately using bulk copy tools (rclone, s5cmd)",
            summary.migration_ready
        ));
        lines.push("  - No format conversion needed".to_string());
        lines.push("  - Metadata can be registered directly in Apache Polaris".to_string());
        lines.push(String::new());
    }

    if summary.needs_conversion > 0 {
        lines.push(format!(
            "- **{} Non-Iceberg tables (NEEDS_CONVERSION):** Require format conversion",
            summary.needs_conversion
        ));
        lines.push("  - Recommend in-place conversion to Iceberg on AWS first".to_string());
        lines.push("  - Then migrate as Iceberg tables".to_string());
        lines.push("  - Alternatively, use Spark jobs during migration to convert".to_string());
        lines.push(String::new());
    }

    if summary.unknown > 0 {
        lines.push(format!(
            "- **{} tables (UNKNOWN):** Need manual review",
            summary.unknown
        ));
        lines.push(String::new());
    }

    lines.extend(
        [
            "### Next Steps",
            "",
            "1. Review tables marked as NEEDS_CONVERSION",
            "2. Prioritize tables by business criticality and size",
            "3. Plan conversion strategy for non-Iceberg tables",
            "4. Proceed to ETL job analysis phase",
        ]
        .map(str::to_string),
    );

    lines.join("\n")
}

/// GitHub-flavoured pipe table with columns padded to the widest cell.
pub fn pipe_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let escape = |cell: &str| cell.replace('|', "\\|");
    let header: Vec<String> = headers.iter().map(|h| escape(h)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| escape(cell)).collect())
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .filter_map(|row| row.get(i))
                .chain(std::iter::once(&header[i]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let mut lines = vec![render_row(&header)];
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    lines.push(format!("|{}|", rule.join("|")));
    lines.extend(body.iter().map(|row| render_row(row)));
    lines.join("\n")
}
