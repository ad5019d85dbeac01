use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::{Subcommand, ValueEnum};
use env_logger::Builder;
use log::{debug, info};
use memmap2::Mmap;

use syntax_analyser as analyser;

use analyser::error::AnalysisError;
use analyser::generate::{EventRecorder, Generate, TreeGenerate};
use analyser::parser::SyntaxAnalyser;
use analyser::scanner::Scanner;
use analyser::token::Symbol;

#[derive(ClapParser, Debug)]
#[command(version, about = "Syntax analyser for a small imperative language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to analyser.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize { filename: Option<PathBuf> },

    /// Checks input from a file against the grammar and prints the parse shape
    Parse {
        filename: Option<PathBuf>,

        /// How to print the parse events
        #[arg(long, value_enum, default_value_t = Format::Tree)]
        format: Format,

        /// Accept tokens after the closing `end`
        #[arg(long)]
        allow_trailing: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Indented enter / match / exit lines
    Tree,

    /// JSON array of events
    Json,
}

/// Memory‑maps the input file.
fn map_file(filename: &Path) -> Result<Mmap> {
    info!("Mapping file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;

    // SAFETY: the map is read‑only and lives no longer than this process run;
    // concurrent truncation of the input file is not supported.
    let map = unsafe { Mmap::map(&file) }.context(format!("Failed to map file {:?}", filename))?;

    info!("Mapped {} bytes from {:?}", map.len(), filename);

    Ok(map)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("analyser.log").context("Failed to create analyser.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("syntax_analyser::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to analyser.log");
    Ok(())
}

/// Runs the analyser over `src` with `generate` as the sink, then applies the
/// trailing‑token policy.
fn analyse<G: Generate>(
    src: &[u8],
    generate: G,
    allow_trailing: bool,
) -> std::result::Result<G, AnalysisError> {
    let mut syntax = SyntaxAnalyser::new(Scanner::new(src), generate)?;

    syntax.parse_statement_part()?;

    let rest = syntax.lookahead();
    if !allow_trailing && !rest.is(Symbol::EOF) {
        return Err(AnalysisError::parse(
            rest.line,
            format!("Unexpected {} after the final 'end'", rest.text),
        ));
    }

    Ok(syntax.into_generate())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { filename } => match filename {
            Some(filename) => {
                info!("Running Tokenize subcommand");
                let map = map_file(&filename)?;
                let mut tokenized = true;

                for token in Scanner::new(&map) {
                    match token {
                        Ok(token) => {
                            debug!("Scanned token: {}", token);

                            println!("{}", token);
                        }

                        Err(e) => {
                            tokenized = false;

                            debug!("Tokenization debug: {}", e);

                            eprintln!("{}", e);
                        }
                    }
                }

                if !tokenized {
                    debug!("Tokenization failed, exiting with code 65");

                    std::process::exit(65);
                }

                info!("Tokenization completed successfully");
            }
            None => {
                info!("No filepath provided for Tokenize");

                println!("No input filepath was provided. Exiting...");

                std::process::exit(0);
            }
        },

        Commands::Parse {
            filename,
            format,
            allow_trailing,
        } => match filename {
            Some(filename) => {
                info!("Running Parse subcommand ({:?})", format);
                let map = map_file(&filename)?;

                let rendered: std::result::Result<String, AnalysisError> = match format {
                    Format::Tree => analyse(&map, TreeGenerate::new(), allow_trailing)
                        .map(TreeGenerate::into_output),

                    Format::Json => analyse(&map, EventRecorder::new(), allow_trailing)
                        .and_then(|recorder| {
                            serde_json::to_string_pretty(recorder.events())
                                .map_err(|e| std::io::Error::other(e).into())
                        }),
                };

                match rendered {
                    Ok(output) => {
                        info!("Input is syntactically valid");
                        print!("{}", output);

                        if format == Format::Json {
                            println!();
                        }
                    }

                    Err(e) => {
                        debug!("Parse debug: {}", e);
                        eprintln!("{}", e);
                        std::process::exit(65);
                    }
                }

                info!("Parse subcommand completed");
            }
            None => {
                info!("No filepath provided for Parse");
                println!("No input filepath was provided. Exiting...");
                std::process::exit(0);
            }
        },
    }

    Ok(())
}
