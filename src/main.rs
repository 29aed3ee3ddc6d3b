mod parser;
mod render;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "retorno_dmc", about = "Formats loosely structured 'Retorno ao DMC' field reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render reports as plain terminal text
    Format {
        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
    },
    /// Render reports as a standalone HTML page
    Html {
        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
        /// Color palette for the page
        #[arg(short, long, value_enum, default_value = "dark")]
        theme: render::Theme,
        /// Write the page to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Emit parsed records as JSON
    Json {
        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Format { input } => {
            let records = parse_input(input.as_deref())?;
            if records.is_empty() {
                println!("Nenhum texto válido encontrado. Verifique o formato.");
                return Ok(());
            }
            print!("{}", render::render_text(&records));
            Ok(())
        }
        Commands::Html { input, theme, output } => {
            let records = parse_input(input.as_deref())?;
            if records.is_empty() {
                println!("Nenhum texto válido encontrado. Verifique o formato.");
                return Ok(());
            }
            let page = render::render_html(&records, theme);
            match output {
                Some(path) => {
                    fs::write(&path, page)
                        .with_context(|| format!("unable to write {}", path.display()))?;
                    println!("{} → {}", render::count_summary(records.len()), path.display());
                }
                None => println!("{}", page),
            }
            Ok(())
        }
        Commands::Json { input } => {
            let records = parse_input(input.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn parse_input(input: Option<&Path>) -> anyhow::Result<Vec<parser::Record>> {
    let raw = read_raw(input)?;
    if raw.trim().is_empty() {
        bail!("Por favor, cole o texto do retorno DMC primeiro!");
    }
    Ok(parser::process_text(&raw))
}

fn read_raw(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("unable to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("unable to read stdin")?;
            Ok(buf)
        }
    }
}
