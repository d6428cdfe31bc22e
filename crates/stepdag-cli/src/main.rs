mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stepdag",
    about = "Track developer progress across generated plan steps — readiness, critical path, and status",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .stepdag/ or .git/)
    #[arg(long, global = true, env = "STEPDAG_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a plan from parsed step declarations (JSON array)
    Init {
        /// Parser-output file: [{id, title, dependsOn, parallelSafe, module}, ...]
        steps: PathBuf,

        /// Project name recorded in the plan document
        #[arg(long, default_value = "project")]
        project: String,
    },

    /// Show plan progress
    Status,

    /// Show the next startable step
    Next,

    /// List every startable step
    Available,

    /// List startable steps flagged safe for parallel execution
    Parallel,

    /// Show the longest dependency chain through the plan
    Path,

    /// Explain why a step cannot start yet
    Blocking { id: u32 },

    /// Mark a step as prompted
    Prompt { id: u32 },

    /// Mark a step as completed (promotes unblocked dependents)
    Complete { id: u32 },

    /// Reset a step to its initial state
    Reset { id: u32 },

    /// Assign a step to a collaborator
    Assign { id: u32, agent: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { steps, project } => cmd::init::run(&root, &steps, &project, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Next => cmd::next::run(&root, cli.json),
        Commands::Available => cmd::next::available(&root, cli.json),
        Commands::Parallel => cmd::next::parallel(&root, cli.json),
        Commands::Path => cmd::path::run(&root, cli.json),
        Commands::Blocking { id } => cmd::path::blocking(&root, id, cli.json),
        Commands::Prompt { id } => cmd::task::prompt(&root, id, cli.json),
        Commands::Complete { id } => cmd::task::complete(&root, id, cli.json),
        Commands::Reset { id } => cmd::task::reset(&root, id, cli.json),
        Commands::Assign { id, agent } => cmd::task::assign(&root, id, &agent, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
