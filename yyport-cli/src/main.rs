//! yyport CLI
//!
//! Command-line interface for converting extracted GameMaker data into a
//! GameMaker Studio 2.3 project.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use yyport_core::{convert_project, ConvertConfig, DumpSource, OutputTree, SourceData, SourceKind};

#[derive(Parser)]
#[command(name = "yyport")]
#[command(about = "Convert extracted GameMaker data into a GameMaker Studio 2.3 project")]
#[command(version)]
struct Cli {
    /// Log every resource, not just every phase
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a dump directory into a project
    Convert {
        /// Dump directory containing graph.json or graph.yaml
        dump: PathBuf,

        /// Output project directory
        #[arg(short, long)]
        output: PathBuf,

        /// Project name (default: the game name from the dump)
        #[arg(short, long)]
        name: Option<String>,

        /// Config file (default: yyport.toml in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Overwrite a non-empty output directory
        #[arg(long)]
        force: bool,

        /// Answer yes to every prompt
        #[arg(short, long)]
        yes: bool,

        /// Print the report as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show what a dump directory contains
    Inspect {
        /// Dump directory containing graph.json or graph.yaml
        dump: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "yyport=debug" } else { "yyport=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Convert {
            dump,
            output,
            name,
            config,
            force,
            yes,
            json,
        } => {
            cmd_convert(&dump, &output, name, config, force || yes, json)?;
        }
        Commands::Inspect { dump } => {
            cmd_inspect(&dump)?;
        }
    }

    Ok(())
}

/// Convert a dump into a project
fn cmd_convert(
    dump: &Path,
    output: &Path,
    name: Option<String>,
    config_path: Option<PathBuf>,
    overwrite: bool,
    json: bool,
) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let mut config =
        ConvertConfig::load(config_path.as_deref(), &cwd).context("Failed to load config")?;
    if name.is_some() {
        config.project_name = name;
    }

    let source = DumpSource::open(dump)
        .with_context(|| format!("Failed to open dump {}", dump.display()))?;

    let overwrite = if is_non_empty_dir(output) && !overwrite {
        confirm(&format!(
            "{} is not empty. Delete its contents and convert into it?",
            output.display()
        ))?
    } else {
        overwrite
    };
    if is_non_empty_dir(output) && !overwrite {
        println!("Cancelled.");
        return Ok(());
    }

    tracing::info!("Converting {} into {}", dump.display(), output.display());
    let tree = OutputTree::prepare(output, overwrite)?;
    let outcome = convert_project(&source, &config, tree)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print!("{}", outcome.report);
        println!("\nProject written to {}", outcome.manifest_path.display());
    }

    Ok(())
}

/// Print per-kind resource counts of a dump
fn cmd_inspect(dump: &Path) -> Result<()> {
    let source = DumpSource::open(dump)
        .with_context(|| format!("Failed to open dump {}", dump.display()))?;
    let graph = source.graph();

    println!("Game: {}", graph.name.as_deref().unwrap_or("(unnamed)"));
    for kind in SourceKind::ALL {
        println!("  {:<14} {}", kind.to_string(), graph.count(kind));
    }

    Ok(())
}

fn is_non_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Ask a yes/no question on stdin; anything but "y" or "yes" is no
fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
