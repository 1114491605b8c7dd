//! pdf-outline CLI - title and heading extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{collect_inputs, process_batch_with, BatchItem};
use pdf_outline::render::to_json;
use pdf_outline::{BatchOptions, ErrorMode, JsonFormat, ParseOptions, PdfParser};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract the title and heading outline of PDF files as JSON", long_about = None)]
struct Cli {
    /// Input PDF file or directory of PDFs
    #[arg(short, long, value_name = "PATH", env = "PDF_OUTLINE_INPUT", default_value = "/app/input")]
    input: PathBuf,

    /// Output directory, or a .json file for a single input
    #[arg(short, long, value_name = "PATH", env = "PDF_OUTLINE_OUTPUT", default_value = "/app/output")]
    output: PathBuf,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Process documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Fail a document on the first undecodable page
    #[arg(long)]
    strict: bool,

    /// Print the numbered list items kept out of each outline
    #[arg(long)]
    lists: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the decoded page model of a PDF as JSON
    Dump {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Only decode this page (1-based)
        #[arg(short, long, value_name = "N")]
        page: Option<u32>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Dump {
            ref input,
            ref output,
            page,
            compact,
        }) => cmd_dump(input, output.as_deref(), page, compact, cli.strict),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_batch(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn parse_options(strict: bool) -> ParseOptions {
    let mode = if strict {
        ErrorMode::Strict
    } else {
        ErrorMode::Lenient
    };
    ParseOptions::new().with_error_mode(mode)
}

fn cmd_batch(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let total = collect_inputs(&cli.input)?.len();
    if total == 0 {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            cli.input.display()
        );
        return Ok(());
    }

    let options = BatchOptions::new()
        .with_parallel(!cli.sequential)
        .with_json_format(json_format(cli.compact))
        .with_parse_options(parse_options(cli.strict));

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let summary = process_batch_with(&cli.input, &cli.output, &options, |item: &BatchItem| {
        pb.set_message(file_name(&item.input));
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!();
    for item in &summary.items {
        match &item.error {
            None => println!(
                "  {} {} -> {} ({} headings)",
                "✓".green(),
                file_name(&item.input),
                item.output.display(),
                item.result.outline.len()
            ),
            Some(e) => println!("  {} {}: {}", "✗".red(), file_name(&item.input), e.dimmed()),
        }

        if cli.lists && !item.lists.is_empty() {
            for list in &item.lists {
                println!(
                    "      {} p.{} {} ({} siblings)",
                    "list".dimmed(),
                    list.page,
                    list.text.trim(),
                    list.sibling_count
                );
            }
        }
    }

    println!(
        "\n{} {} succeeded, {} failed",
        "Summary:".green().bold(),
        summary.succeeded(),
        summary.failed()
    );

    Ok(())
}

fn cmd_dump(
    input: &Path,
    output: Option<&Path>,
    page: Option<u32>,
    compact: bool,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let parser = PdfParser::open_with_options(input, parse_options(strict))?;
    let json = match page {
        Some(number) => to_json(&parser.parse_page_number(number)?, json_format(compact))?,
        None => to_json(&parser.parse()?, json_format(compact))?,
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
