//! Takes snapshots of the live objects of a node script

use clap::Parser;
use eyre::Result;
use selfies::serializer::DEFAULT_MAX_DEPTH;
use selfies::{run_and_take_snapshots, BreakpointSpec, SessionOptions};
use std::ffi::OsString;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

/// Command-line interface for selfies
#[derive(Debug, Parser)]
#[command(name = "selfies")]
#[command(about = "Take snapshots of the live objects of a node script at chosen statements")]
#[command(version)]
pub struct Cli {
    /// A statement in the script to take a snapshot on, as <file>:<line>
    #[arg(short = 'B', long = "breakpoint", value_name = "FILE:LINE")]
    pub breakpoints: Vec<BreakpointSpec>,

    /// Include instances of the given class in the snapshots, e.g. `Point` or `shapes.Circle`
    #[arg(short = 'I', long = "include", value_name = "CLASS")]
    pub include: Vec<String>,

    /// The node executable to run the script with
    #[arg(long, env = "SELFIES_NODE", default_value = "node")]
    pub node: OsString,

    /// Objects nested deeper than this are not walked
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Print values as JSON, one per line
    #[arg(long)]
    pub json: bool,

    /// The script to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub script: Vec<OsString>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();

    let mut options = SessionOptions::new(cli.node)
        .args(cli.script)
        .max_depth(cli.max_depth);
    for breakpoint in cli.breakpoints {
        options = options.breakpoint(breakpoint);
    }
    for class_path in cli.include {
        options = options.include(class_path);
    }

    let snapshots = run_and_take_snapshots(options).await?;

    let mut stdout = io::stdout().lock();
    for snapshot in &snapshots {
        tracing::debug!("printing snapshot {}", snapshot.id());
        for value in snapshot.values() {
            if cli.json {
                serde_json::to_writer(&mut stdout, value)?;
                writeln!(stdout)?;
            } else {
                writeln!(stdout, "{value}")?;
            }
        }
    }
    Ok(())
}

/// Logs to stderr, filtered by `RUST_LOG`, warnings and errors only by default
fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| eyre::eyre!("could not install the logger: {e}"))
}
