//! CLI argument definitions for the intake wizard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "intake",
    version,
    about = "Servicing intake - upload, map and submit servicer files",
    long_about = "Drive the servicing upload wizard from the command line.\n\n\
                  Accepts a CSV export, maps its columns onto a target schema\n\
                  (automatically, from a saved template, or by hand) and writes\n\
                  the finished submission package."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values from uploaded files in log output.
    ///
    /// Loan tapes and ledgers carry borrower data; values are redacted
    /// unless this flag is set.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in upload profiles and their required fields.
    Profiles,

    /// Suggest column mappings for a file without running the wizard.
    Suggest(SuggestArgs),

    /// Inspect saved mapping templates.
    #[command(subcommand)]
    Templates(TemplatesCommand),

    /// Run the upload wizard end to end.
    Run(RunArgs),
}

#[derive(Args)]
pub struct ProfileArgs {
    /// Upload profile.
    #[arg(long = "profile", value_enum, default_value = "advance-recon")]
    pub profile: ProfileArg,

    /// JSON file with a custom target schema (replaces the profile's schema).
    #[arg(long = "schema-file", value_name = "PATH")]
    pub schema_file: Option<PathBuf>,

    /// Field delimiter of the uploaded file.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Args)]
pub struct TemplateDirArg {
    /// Directory holding saved mapping templates.
    #[arg(
        long = "template-dir",
        value_name = "DIR",
        env = "INTAKE_TEMPLATE_DIR",
        default_value = "templates"
    )]
    pub template_dir: PathBuf,
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// CSV file to analyze.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Minimum confidence (0-100) for a suggestion to be kept.
    #[arg(long = "min-confidence", default_value_t = intake_map::DEFAULT_MIN_CONFIDENCE)]
    pub min_confidence: u8,
}

#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List saved templates.
    List(TemplateDirArg),

    /// Show the entries of one template.
    Show {
        /// Template identifier.
        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        dir: TemplateDirArg,
    },
}

#[derive(Parser)]
pub struct RunArgs {
    /// CSV file to upload.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(flatten)]
    pub templates: TemplateDirArg,

    /// Upload name (defaults to one derived from the file name).
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Batch identifier recorded with the upload.
    #[arg(long = "batch-id")]
    pub batch_id: Option<String>,

    /// Companion document to upload (repeatable).
    #[arg(long = "document", value_name = "PATH")]
    pub documents: Vec<PathBuf>,

    /// Use a previously processed document batch instead of uploads.
    #[arg(long = "existing-batch", value_name = "ID", conflicts_with = "documents")]
    pub existing_batch: Option<String>,

    /// Auto-suggest mappings before applying templates and manual edits.
    #[arg(long = "auto")]
    pub auto: bool,

    /// Give up on auto-suggest after this many seconds.
    #[arg(long = "suggest-timeout", value_name = "SECS", default_value_t = 30)]
    pub suggest_timeout: u64,

    /// Apply a saved template by id.
    #[arg(long = "template", value_name = "ID")]
    pub template: Option<String>,

    /// Manual mapping as COLUMN=FIELD (repeatable; FIELD may be empty to unmap).
    #[arg(long = "map", value_name = "COLUMN=FIELD")]
    pub mappings: Vec<String>,

    /// Save the final mapping as a template with this name.
    #[arg(long = "save-template", value_name = "NAME")]
    pub save_template: Option<String>,

    /// Description stored with a saved template.
    #[arg(long = "template-description", requires = "save_template")]
    pub template_description: Option<String>,

    /// Directory for submission packages (default: current directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Stop after the review; nothing is submitted or saved.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    AdvanceRecon,
    DocAudit,
}

impl ProfileArg {
    pub fn key(self) -> &'static str {
        match self {
            Self::AdvanceRecon => "advance-recon",
            Self::DocAudit => "doc-audit",
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
