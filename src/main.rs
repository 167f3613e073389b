//! # mailharvest CLI
//!
//! Command-line front end for the harvesting pipeline. It collects the URL
//! list (arguments, a file, or stdin), runs the extraction with a progress
//! bar, prints per-URL warnings, and writes `emails_extracted.xlsx` when at
//! least one email was found.

mod telemetry;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mailharvest::Error;
use mailharvest::extractor::{EmailExtractor, ExtractorConfig};
use mailharvest::pipeline::{self, EmailRecord, ProgressEvent};
use mailharvest::report::REPORT_FILE_NAME;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract email addresses from websites into a spreadsheet", long_about = None)]
struct Cli {
    /// Website URLs to scan; read from --input or stdin when omitted
    urls: Vec<String>,

    /// File with one URL per line
    #[arg(short, long, conflicts_with = "urls")]
    input: Option<PathBuf>,

    /// Where to write the spreadsheet
    #[arg(short, long, default_value = REPORT_FILE_NAME)]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "10")]
    timeout: u64,

    /// User agent sent with each request
    #[arg(short = 'a', long)]
    user_agent: Option<String>,

    /// Output format for the extracted rows (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Also write a debug log to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing_subscriber(cli.log_dir.as_deref())?;

    extract_command(cli).await
}

#[instrument]
async fn extract_command(cli: Cli) -> anyhow::Result<()> {
    let input = read_url_block(&cli).await?;

    let mut config = ExtractorConfig::builder().timeout_secs(cli.timeout);
    if let Some(user_agent) = &cli.user_agent {
        config = config.user_agent(user_agent.clone());
    }
    let extractor = EmailExtractor::new(config.build())?;

    let progress_bar = ProgressBar::new(0);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );

    let harvest = pipeline::harvest(&extractor, &input, |event| {
        // Printed outside the bar so the lines survive a non-terminal stderr.
        progress_bar.suspend(|| eprintln!("{}", event));
        match event {
            ProgressEvent::Started { total, .. } => progress_bar.set_length(total as u64),
            ProgressEvent::Finished { .. } | ProgressEvent::Failed { .. } => progress_bar.inc(1),
        }
    })
    .await;
    progress_bar.finish_and_clear();

    let harvest = match harvest {
        Ok(harvest) => harvest,
        Err(Error::Input(e)) => {
            eprintln!("Warning: {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_records(&harvest.run.records, &cli.format)?;

    match harvest.report {
        Some(report) => {
            report.write_to(&cli.output)?;
            info!(
                "Wrote {} ({}) to {}",
                report.file_name(),
                report.mime_type(),
                cli.output.display()
            );
            println!(
                "Emails extracted successfully! Saved {} rows to {}",
                harvest.run.records.len(),
                cli.output.display()
            );
        }
        None => eprintln!("Warning: No emails found."),
    }

    if !harvest.run.failures.is_empty() {
        eprintln!("{} URL(s) could not be fetched", harvest.run.failures.len());
    }

    Ok(())
}

/// Collect the newline-separated URL block from arguments, a file, or stdin
async fn read_url_block(cli: &Cli) -> anyhow::Result<String> {
    if !cli.urls.is_empty() {
        return Ok(cli.urls.join("\n"));
    }

    match &cli.input {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(input)
        }
    }
}

fn print_records(records: &[EmailRecord], format: &str) -> anyhow::Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        _ => {
            for record in records {
                println!("{}\t{}", record.website, record.email);
            }
        }
    }
    Ok(())
}
