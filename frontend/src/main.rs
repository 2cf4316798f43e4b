use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use landin_core::prelude::*;

mod config;
mod repl;
mod upload;

/// SECD machine host: run code images, poke registers interactively, or
/// accept framed hex uploads.
#[derive(Parser)]
#[command(name = "landin", version, about = "SECD abstract machine")]
struct Cli {
    /// Cell-pool capacity (overrides the config file).
    #[arg(long, global = true)]
    cells: Option<usize>,

    /// Code-image capacity in bytes (overrides the config file).
    #[arg(long, global = true)]
    code: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a raw code image and execute it from offset 0.
    Run {
        /// Path to the binary code image.
        image: PathBuf,
    },
    /// Interactive front-end with letter commands.
    Repl,
    /// Read framed hex uploads from stdin and run each image.
    Upload,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let cfg = config::load();
    let cells = cli.cells.unwrap_or(cfg.machine.cells);
    let code = cli.code.unwrap_or(cfg.machine.code);

    let result = match cli.command {
        Command::Run { image } => run_image(&image, cells, code),
        Command::Repl => repl::run(cells, code),
        Command::Upload => upload::run(cells, code),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_image(path: &Path, cells: usize, code: usize) -> Result<(), Box<dyn std::error::Error>> {
    let image = std::fs::read(path)?;
    let mut machine = Secd::with_limits(cells, code);
    machine.load_code(&image)?;
    machine.boot(0)?;
    machine.execute()?;
    println!("Final stack:");
    println!("{}", machine.display(machine.stack()));
    Ok(())
}
