use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ordview::{Dimension, FilterPredicate, ReconcilePolicy};

use crate::commands;
use crate::error::Result;

#[derive(Debug, Parser)]
#[command(
    name = "ordview",
    about = "Reorder section items through filtered views",
    version
)]
pub struct Cli {
    /// Log filter directive (e.g. `ordview.session=debug`). Defaults to
    /// `RUST_LOG`, then `warn`.
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace the store contents with the demo sections.
    Seed(StoreArgs),

    /// List sections with item counts and revisions.
    Sections(StoreArgs),

    /// Print a section's (optionally filtered) view.
    Show(ShowArgs),

    /// Drag one item onto another and commit the result.
    Drag(DragArgs),

    /// Write a JSON snapshot of every section, item, and order row.
    Export(ExportArgs),
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Path of the JSON store document.
    #[arg(long, default_value = "ordview-store.json")]
    pub store: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Equality constraint `dimension=value`; repeat for several dimensions.
    #[arg(long = "filter", value_parser = parse_constraint)]
    pub constraints: Vec<(Dimension, String)>,
}

impl FilterArgs {
    #[must_use]
    pub fn predicate(&self) -> FilterPredicate {
        self.constraints
            .iter()
            .fold(FilterPredicate::ANY, |predicate, (dimension, value)| {
                predicate.with(*dimension, value.clone())
            })
    }
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long)]
    pub section: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct DragArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(long)]
    pub section: String,

    /// Item being dragged.
    #[arg(long)]
    pub item: String,

    /// Item it is dropped onto.
    #[arg(long)]
    pub target: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Reconcile policy; overrides the screen config.
    #[arg(long, value_parser = parse_policy)]
    pub policy: Option<ReconcilePolicy>,

    /// Screen config file (`.toml` or `.json`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Confirm a filtered drop without asking.
    #[arg(long)]
    pub yes: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Write to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

fn parse_constraint(raw: &str) -> std::result::Result<(Dimension, String), String> {
    let (dimension, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected dimension=value, got {raw:?}"))?;
    let dimension = dimension.parse::<Dimension>().map_err(|err| err.to_string())?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("empty value for {dimension}"));
    }
    Ok((dimension, value.to_owned()))
}

fn parse_policy(raw: &str) -> std::result::Result<ReconcilePolicy, String> {
    raw.parse::<ReconcilePolicy>().map_err(|err| err.to_string())
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    crate::logging::init(cli.log.as_deref())?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Dispatch `cli`, writing command output to `out`.
pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Seed(args) => commands::seed(&args, out),
        Commands::Sections(args) => commands::sections(&args, out),
        Commands::Show(args) => commands::show(&args, out),
        Commands::Drag(args) => commands::drag(&args, out),
        Commands::Export(args) => commands::export(&args, out),
    }
}
