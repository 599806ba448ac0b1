use std::io::Write;

use color_eyre::eyre::{Result, WrapErr, eyre};

use super::{
    AssessCommand, AssessmentsCommand, Cli, Commands, CompareArgs, DashboardArgs, JobsCommand,
    ListArgs, ReportFormat, ShowArgs, TablesArgs, UpdateStatusArgs,
};
use crate::app::assessor::GlueCatalogAssessor;
use crate::app::dashboard::{assessment_label, render_dashboard};
use crate::app::migrations::MigrationTracker;
use crate::app::ports::{AssessmentFilter, AssessmentStore};
use crate::app::queries::{AssessmentComparison, AssessmentQueries, QueryError};
use crate::app::report::{self, markdown::pipe_table};
use crate::domain::{
    AssessmentId, AssessmentSnapshot, JobStatus, JobStatusUpdate, MigrationJob, MigrationJobId,
    MigrationReadiness, SizeDelta, TableDescriptor, TableFormat, ValidationStatus,
};
use crate::infra::adapters::{AwsCliCatalog, JsonFileAssessmentStore};
use crate::infra::config::Settings;
use crate::infra::tool_server;

pub async fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let settings = cli.settings()?;
    let store = JsonFileAssessmentStore::new(&settings.data_dir);
    tracing::debug!(storage = %store.storage_path().display(), "using assessment store");

    match cli.command {
        Commands::Assess(AssessCommand::GlueCatalog(args)) => {
            assess_glue_catalog(&settings, args.save, &store, out).await
        }
        Commands::Assessments(command) => assessments(&store, command, out),
        Commands::Tables(args) => tables(&store, &args, out),
        Commands::Compare(args) => compare(&store, &args, out),
        Commands::Dashboard(args) => dashboard(&store, &args, out),
        Commands::Jobs(command) => jobs(&store, command, out),
        Commands::ServeTools => tool_server::run_stdio(&store)
            .await
            .wrap_err("tool server stopped"),
    }
}

fn parse_id(raw: &str) -> Result<AssessmentId> {
    AssessmentId::parse(raw).map_err(|e| eyre!("Invalid assessment id {}: {}", raw, e))
}

async fn assess_glue_catalog(
    settings: &Settings,
    save: bool,
    store: &dyn AssessmentStore,
    out: &mut dyn Write,
) -> Result<()> {
    let region = settings.region.clone().ok_or_else(|| {
        eyre!("No AWS region given; pass --region, set AWS_REGION or add [aws] region to the config file")
    })?;

    writeln!(out, "Starting Glue Catalog assessment for region: {}", region)?;
    let assessor = GlueCatalogAssessor::new(
        AwsCliCatalog::new(region.clone(), settings.profile.clone()),
        region,
    );

    writeln!(out, "Collecting databases and tables...")?;
    let snapshot = assessor.run_assessment().await?;
    writeln!(
        out,
        "Found {} databases with {} tables",
        snapshot.databases().len(),
        snapshot.tables().len()
    )?;

    writeln!(out, "Generating reports...")?;
    let files = report::write_all(&snapshot, &settings.output_dir)?;

    if save {
        store.save(&snapshot)?;
    }

    writeln!(out, "\nAssessment complete!")?;
    writeln!(out, "  - JSON report: {}", files.json.display())?;
    writeln!(out, "  - Markdown report: {}", files.markdown.display())?;
    writeln!(out, "  - CSV inventory: {}", files.csv.display())?;
    if save {
        writeln!(out, "  - Saved as assessment {}", snapshot.id())?;
    }
    Ok(())
}

fn assessments(
    store: &dyn AssessmentStore,
    command: AssessmentsCommand,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        AssessmentsCommand::List(args) => list(store, &args, out),
        AssessmentsCommand::Show(args) => show(store, &args, out),
        AssessmentsCommand::Summary { id } => {
            let overview = AssessmentQueries::new(store).database_summary(&parse_id(&id)?)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&overview)?)?;
            Ok(())
        }
        AssessmentsCommand::Delete { id } => {
            let id = parse_id(&id)?;
            if !store.delete(&id)? {
                return Err(QueryError::NotFound {
                    entity: "Assessment",
                    id: id.to_string(),
                }
                .into());
            }
            writeln!(out, "Deleted assessment {}", id)?;
            Ok(())
        }
    }
}

fn list(store: &dyn AssessmentStore, args: &ListArgs, out: &mut dyn Write) -> Result<()> {
    let filter = AssessmentFilter {
        region: args.region.clone(),
        account_id: args.account_id.clone(),
    };
    let found = store.list(&filter, args.limit, args.offset)?;
    if found.is_empty() {
        writeln!(out, "No assessments found.")?;
        return Ok(());
    }

    let rows: Vec<Vec<String>> = found
        .iter()
        .map(|m| {
            vec![
                m.id.to_string(),
                m.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                m.region.clone(),
                m.account_id.clone(),
                m.tool_version.clone(),
            ]
        })
        .collect();
    writeln!(
        out,
        "{}",
        pipe_table(&["ID", "Timestamp (UTC)", "Region", "Account", "Version"], &rows)
    )?;
    Ok(())
}

fn show(store: &dyn AssessmentStore, args: &ShowArgs, out: &mut dyn Write) -> Result<()> {
    let snapshot = AssessmentQueries::new(store).snapshot(&parse_id(&args.id)?)?;
    let rendered = match args.format {
        ReportFormat::Markdown => report::markdown::render(&snapshot),
        ReportFormat::Json => report::json::render(&snapshot)?,
        ReportFormat::Csv => report::csv::render(&snapshot)?,
    };
    write!(out, "{}", rendered)?;
    Ok(())
}

fn tables(store: &dyn AssessmentStore, args: &TablesArgs, out: &mut dyn Write) -> Result<()> {
    let queries = AssessmentQueries::new(store);
    let id = parse_id(&args.assessment)?;

    let (found, total) = if let Some(readiness) = &args.readiness {
        let readiness: MigrationReadiness = readiness.parse().map_err(|e: String| eyre!(e))?;
        (queries.tables_by_readiness(&id, readiness)?, None)
    } else if let Some(format) = &args.format {
        let format: TableFormat = format.parse().map_err(|e: String| eyre!(e))?;
        let matches = queries.tables_by_format(&id, format)?;
        (matches.tables, Some(matches.total_size))
    } else if let Some(pattern) = &args.pattern {
        (queries.search_tables(&id, pattern)?, None)
    } else {
        return Err(eyre!("one of --readiness, --format or --pattern is required"));
    };

    if found.is_empty() {
        writeln!(out, "No matching tables.")?;
        return Ok(());
    }

    writeln!(out, "{}", table_listing(&found))?;
    match total {
        Some(size) => writeln!(out, "\n{} tables, {} GB total", found.len(), size)?,
        None => writeln!(out, "\n{} tables", found.len())?,
    }
    Ok(())
}

fn table_listing(tables: &[TableDescriptor]) -> String {
    let rows: Vec<Vec<String>> = tables
        .iter()
        .map(|t| {
            vec![
                t.database_name.clone(),
                t.table_name.clone(),
                t.table_format.to_string(),
                t.migration_readiness.to_string(),
                t.estimated_size_gb
                    .map_or_else(|| "N/A".to_string(), |s| s.to_string()),
            ]
        })
        .collect();
    pipe_table(&["Database", "Table", "Format", "Readiness", "Size (GB)"], &rows)
}

fn compare(store: &dyn AssessmentStore, args: &CompareArgs, out: &mut dyn Write) -> Result<()> {
    let comparison = AssessmentQueries::new(store)
        .compare_assessments(&parse_id(&args.baseline)?, &parse_id(&args.target)?)?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&comparison)?)?;
    } else {
        write!(out, "{}", comparison_text(&comparison))?;
    }
    Ok(())
}

fn signed_size(delta: SizeDelta) -> String {
    if delta.hundredths() > 0 {
        format!("+{}", delta)
    } else {
        delta.to_string()
    }
}

fn comparison_text(comparison: &AssessmentComparison) -> String {
    let changes = &comparison.diff.changes;
    let delta = &comparison.diff.summary_changes;

    let mut out = format!(
        "Baseline: {}\nTarget:   {}\n\n",
        assessment_label(&comparison.baseline.metadata),
        assessment_label(&comparison.target.metadata)
    );
    out.push_str(&format!(
        "Databases {:+}, tables {:+}, size {} GB\n",
        delta.database_count,
        delta.table_count,
        signed_size(delta.total_size_gb)
    ));

    if changes.is_empty() {
        out.push_str("\nNo catalog changes.\n");
        return out;
    }

    let lists = [
        ("Databases added", &changes.databases_added),
        ("Databases removed", &changes.databases_removed),
        ("Tables added", &changes.tables_added),
        ("Tables removed", &changes.tables_removed),
    ];
    for (title, names) in lists {
        if names.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{} ({}):\n", title, names.len()));
        for name in names {
            out.push_str(&format!("  {}\n", name));
        }
    }

    if !changes.tables_modified.is_empty() {
        out.push_str(&format!("\nTables modified ({}):\n", changes.tables_modified.len()));
        for m in &changes.tables_modified {
            let mut parts = Vec::new();
            if m.format_changed {
                parts.push(format!("format {} -> {}", m.old_format, m.new_format));
            }
            if m.readiness_changed {
                parts.push(format!("readiness {} -> {}", m.old_readiness, m.new_readiness));
            }
            out.push_str(&format!("  {}: {}\n", m.name, parts.join(", ")));
        }
    }
    out
}

fn dashboard(store: &dyn AssessmentStore, args: &DashboardArgs, out: &mut dyn Write) -> Result<()> {
    let queries = AssessmentQueries::new(store);
    let snapshot: AssessmentSnapshot = match &args.id {
        Some(id) => queries.snapshot(&parse_id(id)?)?,
        None => {
            let filter = AssessmentFilter {
                region: args.region.clone(),
                account_id: args.account_id.clone(),
            };
            queries.latest_assessment(&filter)?.0
        }
    };

    let summary = crate::app::aggregator::snapshot_catalog_summary(&snapshot);
    write!(
        out,
        "{}",
        render_dashboard(Some(snapshot.metadata()), &summary, args.width)
    )?;
    Ok(())
}

fn jobs(store: &dyn AssessmentStore, command: JobsCommand, out: &mut dyn Write) -> Result<()> {
    let tracker = MigrationTracker::new(store);
    match command {
        JobsCommand::List { assessment, status } => {
            let status = status
                .map(|s| s.parse::<JobStatus>())
                .transpose()
                .map_err(|e| eyre!(e))?;
            let found = tracker.jobs(&parse_id(&assessment)?, status)?;
            if found.is_empty() {
                writeln!(out, "No migration jobs.")?;
                return Ok(());
            }
            writeln!(out, "{}", job_listing(&found))?;
            Ok(())
        }
        JobsCommand::Summary { assessment } => {
            let summary = tracker.migration_summary(&parse_id(&assessment)?)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
            Ok(())
        }
        JobsCommand::UpdateStatus(args) => update_status(&tracker, &args, out),
        JobsCommand::Validations { job, status } => {
            let status = status
                .map(|s| s.parse::<ValidationStatus>())
                .transpose()
                .map_err(|e| eyre!(e))?;
            let results = tracker.validation_results(&MigrationJobId::from_string(job.trim()), status)?;
            if results.is_empty() {
                writeln!(out, "No validation results.")?;
                return Ok(());
            }
            let rows: Vec<Vec<String>> = results
                .iter()
                .map(|r| {
                    vec![
                        r.validation_type.to_string(),
                        r.status.to_string(),
                        r.source_value.clone().unwrap_or_default(),
                        r.target_value.clone().unwrap_or_default(),
                        r.validated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    ]
                })
                .collect();
            writeln!(
                out,
                "{}",
                pipe_table(&["Type", "Status", "Source", "Target", "Validated (UTC)"], &rows)
            )?;
            Ok(())
        }
    }
}

fn update_status(
    tracker: &MigrationTracker<'_>,
    args: &UpdateStatusArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let job_id = MigrationJobId::from_string(args.job.trim());
    let status: JobStatus = args.status.parse().map_err(|e: String| eyre!(e))?;
    let update = JobStatusUpdate {
        status,
        error_message: args.error_message.clone(),
        completed_at: args.completed.then(chrono::Utc::now),
    };
    if !tracker.update_job_status(&job_id, update)? {
        return Err(QueryError::NotFound {
            entity: "Migration job",
            id: job_id.to_string(),
        }
        .into());
    }
    writeln!(out, "Job {} is now {}", job_id, status)?;
    Ok(())
}

fn job_listing(jobs: &[MigrationJob]) -> String {
    let rows: Vec<Vec<String>> = jobs
        .iter()
        .map(|j| {
            vec![
                j.id.to_string(),
                j.job_type.clone(),
                j.resource_id.clone(),
                j.status.to_string(),
                j.rows_copied.map_or_else(|| "-".to_string(), |r| r.to_string()),
            ]
        })
        .collect();
    pipe_table(&["Job", "Type", "Resource", "Status", "Rows"], &rows)
}
