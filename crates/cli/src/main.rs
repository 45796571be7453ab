mod manifest;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::path::PathBuf;
use tack_options::{Value, split_switches, to_switches};
use tack_task::{Invocation, Outcome, Task, TaskMeta, TaskSet};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, LoadedManifest, load_manifest, write_default_manifest};

#[derive(Parser)]
#[command(name = "tack", disable_help_subcommand = true)]
#[command(version, about = "Declare tasks in a manifest and parse their switches", long_about = None)]
struct Cli {
    /// Path to the task manifest (default: ./tack.json)
    #[arg(short, long, global = true, value_name = "FILE")]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample tack.json
    Init(InitArgs),

    /// List the tasks declared in the manifest
    Tasks,

    /// Show help for one task
    Help(HelpArgs),

    /// Parse tokens against a task and print the result as JSON
    Parse(ParseArgs),

    /// Render a JSON object of values as a switch string
    Serialize(SerializeArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Replace an existing manifest
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct HelpArgs {
    /// Task name or alias
    task: String,
}

#[derive(Parser)]
struct ParseArgs {
    /// Task name, alias or unique prefix
    task: String,

    /// Read the tokens from one quoted string instead of the trailing arguments
    #[arg(long, value_name = "SWITCHES", conflicts_with = "tokens")]
    line: Option<String>,

    /// Tokens handed to the task parser
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct SerializeArgs {
    /// JSON object mapping option names to values
    json: String,
}

/// A manifest task: running it prints what was parsed.
struct EchoTask {
    meta: TaskMeta,
}

impl Task for EchoTask {
    fn meta(&self) -> TaskMeta {
        self.meta.clone()
    }

    fn run(&self, invocation: &Invocation) -> Result<()> {
        let json = serde_json::to_string_pretty(&invocation.matches)
            .context("failed to serialize parse result")?;
        println!("{json}");
        Ok(())
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Tasks => {
            let tasks = task_set(cli.manifest)?;
            print!("{}", tasks.help(None)?);
            Ok(())
        }
        Commands::Help(args) => {
            let tasks = task_set(cli.manifest)?;
            print!("{}", tasks.help(Some(args.task.as_str()))?);
            Ok(())
        }
        Commands::Parse(args) => parse(cli.manifest, args),
        Commands::Serialize(args) => serialize(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let path = write_default_manifest(&dir, args.force)?;
    tracing::info!(path = %path.display(), "wrote manifest");
    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to declare your tasks");
    eprintln!("  2. Run: tack parse greet -- World --loud");
    Ok(())
}

fn task_set(manifest: Option<PathBuf>) -> Result<TaskSet> {
    let Some(LoadedManifest { path, manifest }) = load_manifest(manifest.as_deref())? else {
        bail!("no {DEFAULT_MANIFEST_NAME} found; run `tack init` or pass --manifest");
    };

    let mut tasks = TaskSet::new();
    for task in &manifest.tasks {
        let meta = task
            .to_meta()
            .with_context(|| format!("invalid manifest: {}", path.display()))?;
        tasks
            .register(EchoTask { meta })
            .with_context(|| format!("invalid manifest: {}", path.display()))?;
    }
    tracing::debug!(tasks = manifest.tasks.len(), "registered manifest tasks");
    Ok(tasks)
}

fn parse(manifest: Option<PathBuf>, args: ParseArgs) -> Result<()> {
    let tasks = task_set(manifest)?;
    let tokens = match args.line {
        Some(line) => split_switches(&line).context("failed to split --line")?,
        None => args.tokens,
    };

    let argv = std::iter::once(args.task).chain(tokens);
    match tasks.dispatch(argv)? {
        Outcome::Help(text) => print!("{text}"),
        Outcome::Ran(task) => tracing::debug!(%task, "parsed"),
    }
    Ok(())
}

fn serialize(args: SerializeArgs) -> Result<()> {
    let values: IndexMap<String, Value> =
        serde_json::from_str(&args.json).context("expected a JSON object of option values")?;
    println!("{}", to_switches(&values));
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
