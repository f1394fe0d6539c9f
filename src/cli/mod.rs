//! Command-line interface for `td`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use ticketdesk_lib::{ExportFormat, LabelKind, LabelSettings, SortKey, TicketFilters};

use crate::auth::{self, TerminalPrompt};
use crate::config::{CliOverrides, DeskContext};
use crate::logging::{self, LogFormat};
use crate::output::OutputContext;

/// `td` - Support ticket desk.
#[derive(Parser, Debug)]
#[command(name = "td")]
#[command(
    author,
    version,
    about = "Support ticket tracker (single JSON file)",
    long_about = None,
    after_help = "Tickets live in .ticketdesk/tickets.json; run `td init` to start."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Plain text output (no colors or panels)
    #[arg(long, global = true)]
    pub plain: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Shared desk password (prompted for when required and not given)
    #[arg(long, global = true, env = "TICKETDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Ticket file to use instead of the workspace default
    #[arg(long, global = true, env = "TICKETDESK_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a ticketdesk workspace
    Init(InitArgs),

    /// Create a new ticket
    Create(CreateArgs),

    /// List tickets
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show ticket details
    Show(ShowArgs),

    /// Update an existing ticket
    Update(UpdateArgs),

    /// Delete a ticket
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Add a follow-up question to a ticket
    Ask(AskArgs),

    /// Answer the latest unanswered question on a ticket
    Respond(RespondArgs),

    /// Add a comment to a ticket
    Comment(CommentArgs),

    /// Summary metrics and charts
    #[command(alias = "status")]
    Stats(StatsArgs),

    /// Export tickets as CSV or JSON
    Export(ExportArgs),

    /// Read/write configuration
    Config(ConfigCommand),

    /// Check workspace, config and ticket file health
    Doctor,

    /// Print the JSON Schema of the ticket file
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Restore workspace files even if already initialized (tickets are kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Ticket title
    pub title: String,

    /// Problem description (becomes the first question)
    #[arg(short, long)]
    pub description: String,

    /// Category (default: first configured category)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Priority (default: middle configured priority)
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Status (default: first configured status)
    #[arg(short, long)]
    pub status: Option<String>,

    /// Tag (repeatable)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
}

/// Filters shared by `list`, `stats` and `export`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Filter by status (repeatable)
    #[arg(long)]
    pub status: Vec<String>,

    /// Filter by priority (repeatable)
    #[arg(long)]
    pub priority: Vec<String>,

    /// Filter by category (repeatable)
    #[arg(long)]
    pub category: Vec<String>,

    /// Created on or after this day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Created on or before this day (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Case-insensitive text search over title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Only tickets carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
}

impl FilterArgs {
    /// Convert to library filters. Labels are matched to the configured
    /// spelling when possible and kept verbatim otherwise.
    #[must_use]
    pub fn to_filters(&self, settings: &LabelSettings) -> TicketFilters {
        let labels = |values: &[String], kind: LabelKind| -> Option<Vec<String>> {
            if values.is_empty() {
                None
            } else {
                Some(
                    values
                        .iter()
                        .map(|v| {
                            settings
                                .resolve(kind, v)
                                .map_or_else(|| v.trim().to_string(), str::to_string)
                        })
                        .collect(),
                )
            }
        };

        TicketFilters {
            statuses: labels(&self.status, LabelKind::Status),
            priorities: labels(&self.priority, LabelKind::Priority),
            categories: labels(&self.category, LabelKind::Category),
            created_from: self.from,
            created_to: self.to,
            search: self.search.clone(),
            tag: self.tag.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Sort order: newest (default), id, created, priority, status
    #[arg(long, default_value = "newest")]
    pub sort: SortKey,

    /// Reverse the sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Maximum number of tickets to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct ShowArgs {
    /// Ticket id
    pub id: u64,
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Ticket id
    pub id: u64,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// New priority
    #[arg(long)]
    pub priority: Option<String>,

    /// New status
    #[arg(long)]
    pub status: Option<String>,

    /// Add a tag (repeatable)
    #[arg(long = "add-tag")]
    pub add_tags: Vec<String>,

    /// Remove a tag (repeatable)
    #[arg(long = "remove-tag")]
    pub remove_tags: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct DeleteArgs {
    /// Ticket id
    pub id: u64,
}

#[derive(Args, Debug, Default)]
pub struct AskArgs {
    /// Ticket id
    pub id: u64,

    /// Question text
    pub question: String,
}

#[derive(Args, Debug, Default)]
pub struct RespondArgs {
    /// Ticket id
    pub id: u64,

    /// Response text
    pub response: String,
}

#[derive(Args, Debug, Default)]
pub struct CommentArgs {
    /// Ticket id
    pub id: u64,

    /// Comment text
    pub text: String,
}

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Export format: csv or json
    #[arg(long, short = 'f', default_value = "csv")]
    pub format: ExportFormat,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// List config values
    List,

    /// Get a config value
    Get {
        /// Config key (e.g. labels.categories)
        key: String,
    },

    /// Set a config value in the workspace config
    Set {
        /// Config key (e.g. labels.categories)
        key: String,

        /// New value; label lists are comma separated
        value: String,
    },
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Print only the version number
    #[arg(long)]
    pub short: bool,
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_format = cli.log_json.then_some(LogFormat::Json);
    logging::init_logging(cli.verbose, cli.quiet, log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let ctx = OutputContext::from_flags(cli.json, cli.plain);
    let overrides = CliOverrides {
        data_file: cli.data_file,
        password: cli.password,
    };

    let Some(command) = cli.command else {
        println!("td - Support ticket desk. Use --help for usage.");
        return Ok(());
    };
    tracing::debug!(command = command.name(), "dispatching");

    match command {
        Commands::Init(args) => commands::init::execute(&args, &ctx)?,
        Commands::Doctor => commands::doctor::execute(&overrides, &ctx)?,
        Commands::Schema => commands::schema::execute(&ctx),
        Commands::Completions(args) => commands::completions::execute(&args)?,
        Commands::Version(args) => commands::version::execute(&args, &ctx),
        command => {
            let desk = DeskContext::open(&overrides)?;
            auth::require_login(&desk.config, overrides.password.as_deref(), &mut TerminalPrompt)?;
            run_desk_command(command, &desk, &ctx)?;
        }
    }

    Ok(())
}

fn run_desk_command(
    command: Commands,
    desk: &DeskContext,
    ctx: &OutputContext,
) -> crate::error::Result<()> {
    match command {
        Commands::Create(args) => commands::create::execute(&args, desk, ctx),
        Commands::List(args) => commands::list::execute(&args, desk, ctx),
        Commands::Show(args) => commands::show::execute(&args, desk, ctx),
        Commands::Update(args) => commands::update::execute(&args, desk, ctx),
        Commands::Delete(args) => commands::delete::execute(&args, desk, ctx),
        Commands::Ask(args) => commands::exchange::ask(&args, desk, ctx),
        Commands::Respond(args) => commands::exchange::respond(&args, desk, ctx),
        Commands::Comment(args) => commands::exchange::comment(&args, desk, ctx),
        Commands::Stats(args) => commands::stats::execute(&args, desk, ctx),
        Commands::Export(args) => commands::export::execute(&args, desk, ctx),
        Commands::Config(cmd) => commands::config::execute(&cmd, desk, ctx),
        Commands::Init(_)
        | Commands::Doctor
        | Commands::Schema
        | Commands::Completions(_)
        | Commands::Version(_) => Ok(()),
    }
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Create(_) => "create",
            Self::List(_) => "list",
            Self::Show(_) => "show",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Ask(_) => "ask",
            Self::Respond(_) => "respond",
            Self::Comment(_) => "comment",
            Self::Stats(_) => "stats",
            Self::Export(_) => "export",
            Self::Config(config) => match config.command {
                ConfigSubcommand::List => "config list",
                ConfigSubcommand::Get { .. } => "config get",
                ConfigSubcommand::Set { .. } => "config set",
            },
            Self::Doctor => "doctor",
            Self::Schema => "schema",
            Self::Completions(_) => "completions",
            Self::Version(_) => "version",
        }
    }
}
