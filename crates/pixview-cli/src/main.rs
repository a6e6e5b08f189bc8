//! pixview - image viewport CLI
//!
//! Opens images in the interactive viewer and inspects them from the shell.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pixview")]
#[command(author, version, about = "Pan/zoom image viewer with pixel picking")]
#[command(long_about = "
An image viewer with anchor-stable zoom, a pixel picker and a coordinate grid.

Examples:
  pixview view plate.exr                 # Open the viewer
  pixview view --config studio.ron       # Custom shortcuts and zoom range
  pixview info a.png b.tif               # Show image info
  pixview config > viewport.ron          # Dump the default configuration
  pixview config --init                  # Write it to the user config dir
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive viewer
    #[command(visible_alias = "v")]
    View(ViewArgs),

    /// Display image information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Print or write the viewport configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct ViewArgs {
    /// Image to open
    input: Option<PathBuf>,

    /// Viewport configuration file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Also report the display pixel at x,y
    #[arg(long, value_parser = parse_point)]
    pixel: Option<(u32, u32)>,
}

#[derive(Args)]
struct ConfigArgs {
    /// Configuration to print instead of the defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the defaults to the user config directory
    #[arg(long)]
    init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    force: bool,
}

fn parse_point(s: &str) -> std::result::Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok((x, y))
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::View(args) => commands::view::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Config(args) => commands::config::run(args),
    }
}
