use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use rec_schedule::fetch;
use rec_schedule::schedule::{self, ActivityRecord, PageResult};
use rec_schedule::settings::Settings;

#[derive(Parser)]
#[command(name = "rec_schedule", about = "Recreation facility schedule extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch configured facility pages and extract their schedules
    Fetch {
        /// Config file (default: rec_schedule.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Extract the schedule from a saved HTML page
    Parse {
        file: PathBuf,
        /// URL to report for the page (default: the file path)
        #[arg(short, long)]
        url: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show configured facility URLs
    Urls {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Only activities containing this text (case-insensitive)
    #[arg(short, long)]
    activity: Option<String>,
    /// Only days containing this text (case-insensitive)
    #[arg(short, long)]
    day: Option<String>,
}

#[derive(Serialize)]
struct Report {
    generated_at: DateTime<Utc>,
    pages: Vec<PageResult>,
    failures: Vec<Failure>,
}

#[derive(Serialize)]
struct Failure {
    url: String,
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fetch { config, output } => {
            let settings = Settings::load(config.as_deref())?;
            info!("Fetching {} facility pages...", settings.facility_urls.len());

            let outcomes = fetch::fetch_all(&settings).await?;

            let mut failures = Vec::new();
            let mut fetched = Vec::new();
            for outcome in outcomes {
                match outcome.result {
                    Ok(page) => fetched.push(page),
                    Err(e) => {
                        warn!("Fetch failed for {}: {:#}", outcome.requested, e);
                        failures.push(Failure {
                            url: outcome.requested,
                            error: format!("{:#}", e),
                        });
                    }
                }
            }

            let parsed: Vec<_> = fetched
                .par_iter()
                .map(|page| schedule::parse_html(&page.body, &page.url))
                .collect();

            let mut pages = Vec::new();
            for (page, result) in fetched.iter().zip(parsed) {
                match result {
                    Ok(p) => pages.push(p),
                    Err(e) => {
                        warn!("{}", e);
                        failures.push(Failure {
                            url: page.url.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }

            if pages.is_empty() {
                bail!("No facility page could be extracted ({} failures)", failures.len());
            }
            emit(pages, failures, &output)
        }
        Commands::Parse { file, url, output } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let url = url.unwrap_or_else(|| file.display().to_string());
            let page = schedule::parse_html(&html, &url)?;
            emit(vec![page], Vec::new(), &output)
        }
        Commands::Urls { config } => {
            let settings = Settings::load(config.as_deref())?;
            for url in &settings.facility_urls {
                println!("{:<32} {}", fetch::slug(url), url);
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        info!("Done in {}", format_duration(elapsed));
    }

    result
}

fn emit(pages: Vec<PageResult>, failures: Vec<Failure>, output: &OutputArgs) -> Result<()> {
    let pages: Vec<PageResult> = pages
        .into_iter()
        .map(|p| retain_matching(p, output))
        .collect();

    if output.json {
        let report = Report {
            generated_at: Utc::now(),
            pages,
            failures,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{:<24} | {:<22} | {:<24} | {:<24} | {:<9} | {}",
        "Location", "Category", "Dates", "Activity", "Day", "Time slots"
    );
    println!("{}", "-".repeat(130));

    let mut count = 0usize;
    for page in &pages {
        for block in &page.time_blocks {
            let category = block.category.as_deref().unwrap_or("-");
            let dates = match (&block.time_block_start, &block.time_block_end) {
                (Some(start), Some(end)) => format!("{} to {}", start, end),
                _ => "-".to_string(),
            };
            for a in &block.activities {
                println!(
                    "{:<24} | {:<22} | {:<24} | {:<24} | {:<9} | {}",
                    truncate(&a.location, 24),
                    truncate(category, 22),
                    truncate(&dates, 24),
                    truncate(&a.activity, 24),
                    truncate(&a.day, 9),
                    a.time_slots
                );
                count += 1;
            }
        }
    }

    println!("\n{} time slots across {} pages", count, pages.len());
    for f in &failures {
        println!("  failed: {} ({})", f.url, f.error);
    }
    Ok(())
}

fn retain_matching(mut page: PageResult, output: &OutputArgs) -> PageResult {
    if output.activity.is_none() && output.day.is_none() {
        return page;
    }
    for block in &mut page.time_blocks {
        block.activities.retain(|a| matches(a, output));
    }
    page
}

fn matches(a: &ActivityRecord, output: &OutputArgs) -> bool {
    let contains = |haystack: &str, needle: &Option<String>| {
        needle
            .as_ref()
            .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
    };
    contains(&a.activity, &output.activity) && contains(&a.day, &output.day)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
