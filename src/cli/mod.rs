//! Command line surface.
//!
//! ```text
//! aws2openstack assess glue-catalog --region us-east-1 --output-dir ./output --save
//! aws2openstack assessments list|show|summary|delete
//! aws2openstack tables --assessment <ID> --readiness needs_conversion
//! aws2openstack compare <BASELINE> <TARGET>
//! aws2openstack dashboard [ID]
//! aws2openstack jobs list|summary|update-status|validations
//! aws2openstack serve-tools
//! ```

pub mod commands;

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use crate::app::dashboard::DEFAULT_BAR_WIDTH;
use crate::infra::config::{
    CliOverrides, ConfigError, Settings, default_config_path, load,
};

#[derive(Debug, Parser)]
#[command(name = "aws2openstack", author, version, about = "AWS to OpenStack migration tools", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/aws2openstack/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding saved assessments
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run migration assessments
    #[command(subcommand)]
    Assess(AssessCommand),
    /// Inspect or remove saved assessments
    #[command(subcommand)]
    Assessments(AssessmentsCommand),
    /// Find tables in a saved assessment
    Tables(TablesArgs),
    /// Show what changed between two saved assessments
    Compare(CompareArgs),
    /// Text dashboard for a saved assessment (latest when no id is given)
    Dashboard(DashboardArgs),
    /// Track migration jobs filed under saved assessments
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Serve assessment query tools as JSON-RPC over stdin/stdout
    ServeTools,
}

#[derive(Debug, Subcommand)]
pub enum AssessCommand {
    /// Assess AWS Glue Catalog for migration readiness
    GlueCatalog(GlueCatalogArgs),
}

#[derive(Debug, Args)]
pub struct GlueCatalogArgs {
    /// AWS region to assess
    #[arg(long)]
    pub region: Option<String>,

    /// AWS profile name (uses default credential chain if not specified)
    #[arg(long)]
    pub profile: Option<String>,

    /// Directory to write report files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Also keep the assessment in the local store
    #[arg(long)]
    pub save: bool,
}

#[derive(Debug, Subcommand)]
pub enum AssessmentsCommand {
    /// List saved assessments, newest first
    List(ListArgs),
    /// Render a saved assessment as a report
    Show(ShowArgs),
    /// Print the aggregated summary of a saved assessment as JSON
    Summary {
        /// Assessment id
        id: String,
    },
    /// Delete a saved assessment
    Delete {
        /// Assessment id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub account_id: Option<String>,

    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    #[arg(long, default_value_t = 0)]
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
    Csv,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Assessment id
    pub id: String,

    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("filter")
        .required(true)
        .args(["readiness", "format", "pattern"])
))]
pub struct TablesArgs {
    /// Assessment id
    #[arg(long)]
    pub assessment: String,

    /// ready, needs_conversion or unknown
    #[arg(long)]
    pub readiness: Option<String>,

    /// iceberg, parquet, orc, avro or unknown
    #[arg(long)]
    pub format: Option<String>,

    /// SQL LIKE pattern on table names, or an exact database name
    #[arg(long)]
    pub pattern: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Baseline assessment id
    pub baseline: String,

    /// Target assessment id
    pub target: String,

    /// Print the full comparison as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Assessment id
    pub id: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub account_id: Option<String>,

    /// Bar chart width in characters
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    pub width: usize,
}

#[derive(Debug, Subcommand)]
pub enum JobsCommand {
    /// List the migration jobs of an assessment
    List {
        /// Assessment id
        assessment: String,

        /// pending, running, completed, failed or cancelled
        #[arg(long)]
        status: Option<String>,
    },
    /// Roll up job statuses, copied volume and failed validations as JSON
    Summary {
        /// Assessment id
        assessment: String,
    },
    /// Move a job to a new status
    UpdateStatus(UpdateStatusArgs),
    /// List the validation results recorded for a job
    Validations {
        /// Migration job id
        job: String,

        /// passed, failed or warning
        #[arg(long)]
        status: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct UpdateStatusArgs {
    /// Migration job id
    pub job: String,

    /// New status
    pub status: String,

    #[arg(long)]
    pub error_message: Option<String>,

    /// Stamp the job as completed now
    #[arg(long)]
    pub completed: bool,
}

impl Cli {
    /// Default tracing filter when RUST_LOG is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let file = match &self.config {
            Some(path) => load(path)?,
            None => match default_config_path() {
                Ok(path) => load(&path)?,
                Err(_) => None,
            },
        };

        let mut overrides = CliOverrides {
            data_dir: self.data_dir.clone(),
            ..Default::default()
        };
        if let Commands::Assess(AssessCommand::GlueCatalog(args)) = &self.command {
            overrides.region = args.region.clone();
            overrides.profile = args.profile.clone();
            overrides.output_dir = args.output_dir.clone();
        }

        Settings::resolve(overrides, file, |key| std::env::var(key).ok())
    }
}
