use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use kaleido::scanner::Scanner;
use kaleido::source::SourceFile;
use kaleido::stack::show_backtrace;

#[derive(ClapParser, Debug)]
#[command(version, about = "Kaleidoscope front end", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file (or stdin), printing each token
    Tokenize {
        filename: Option<PathBuf>,

        /// Print one JSON object per token instead of the text form
        #[arg(long)]
        json: bool,
    },

    /// Scans only the first token and prints its numeric code
    Peek { filename: Option<PathBuf> },

    /// Prints the instruction and stack pointer of every active frame
    Backtrace {
        /// Resolve and print the function name of each frame
        #[arg(long)]
        symbols: bool,
    },
}

/// Opens `filename`, or standard input when it is absent or `-`.
fn load_source(filename: Option<PathBuf>) -> Result<SourceFile> {
    match filename {
        Some(path) if path.as_os_str() != "-" => {
            SourceFile::open(&path).context(format!("Failed to open file {:?}", path))
        }
        _ => {
            info!("Reading source from stdin");
            SourceFile::stdin().context("Failed to read standard input")
        }
    }
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'kaleido::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("kaleido::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "{} [{}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn tokenize(source: &SourceFile, json: bool) -> Result<bool> {
    let text = source
        .text()
        .context(format!("Source {} is not valid UTF-8", source.name()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut tokenized = true;

    for token in Scanner::new(text) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);

                if json {
                    serde_json::to_writer(&mut out, &token)?;
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}", token)?;
                }
            }

            Err(e) => {
                tokenized = false;

                debug!("Tokenization debug: {}", e);

                out.flush()?;
                eprintln!("{}", e);
            }
        }
    }

    out.flush()?;
    Ok(tokenized)
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
        Commands::Tokenize { filename, json } => {
            info!("Running Tokenize subcommand");

            let source = load_source(filename)?;

            if !tokenize(&source, json)? {
                debug!("Tokenization failed, exiting with code 65");

                std::process::exit(65);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Peek { filename } => {
            info!("Running Peek subcommand");

            let source = load_source(filename)?;
            println!("Going to parse source '{}'", source.name());

            let text = source
                .text()
                .context(format!("Source {} is not valid UTF-8", source.name()))?;

            match Scanner::first_token(text) {
                Ok(token) => {
                    debug!("First token: {}", token);
                    println!("got token {}", token.kind.code());
                }

                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(65);
                }
            }
        }

        Commands::Backtrace { symbols } => {
            info!("Running Backtrace subcommand");

            let stdout = io::stdout();
            let mut out = stdout.lock();
            let frames = show_backtrace(&mut out, symbols).context("Failed to unwind the stack")?;

            info!("Printed {} frames", frames);
        }
    }

    Ok(())
}
