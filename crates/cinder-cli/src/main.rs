//! Cinder CLI entry point.

use std::io::Read;
use std::process::ExitCode;

use cinder_core::{Compiler, Config};
use cinder_ir::{print, read_all};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cinder")]
#[command(about = "Compile Lisp forms to LLVM text")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every top-level form of a file
    Compile {
        /// Input file (or - for stdin)
        file: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        out: Option<String>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,

        /// Name of the generated entry routine
        #[arg(long)]
        entry: Option<String>,

        /// Let later forms redefine functions
        #[arg(long)]
        allow_redefine_functions: bool,
    },

    /// Read a file and print its forms
    Read {
        /// Input file (or - for stdin)
        file: String,

        /// Print as JSON instead of S-expressions
        #[arg(long)]
        json: bool,
    },
}

fn read_input(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file)
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Compile {
            file,
            out,
            config,
            entry,
            allow_redefine_functions,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path)?,
                None => Config::default(),
            };
            if let Some(entry) = entry {
                config.entry = entry;
            }
            if allow_redefine_functions {
                config.allow_redefine_functions = true;
            }
            debug!(?config, "configuration");

            let source = read_input(&file)?;
            let units = Compiler::new(config).compile_program(&source)?;
            let mut output = String::new();
            for (n, unit) in units.iter().enumerate() {
                output.push_str(&format!("; unit {}\n{}", n, unit));
            }

            match out {
                Some(path) => {
                    std::fs::write(&path, &output)?;
                    info!("Wrote {} units to {}", units.len(), path);
                }
                None => print!("{}", output),
            }
        }

        Commands::Read { file, json } => {
            let source = read_input(&file)?;
            let forms = read_all(&source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&forms)?);
            } else {
                for form in &forms {
                    println!("{}", print(form));
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "cinder=debug" } else { "cinder=info" };
    let filter = match level.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
