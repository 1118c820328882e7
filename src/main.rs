mod aged_image;
mod extract;
mod fetch;
mod model;
mod profile;
mod settings;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, warn};

use model::{AgedImageDescriptor, MissingPersonRecord, RawScrapedBag};
use profile::Degradation;
use settings::Settings;

#[derive(Parser)]
#[command(name = "fbi_profile", about = "Missing person profiles from FBI wanted pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a wanted page and print the raw scraped fields as JSON
    Extract {
        /// FBI wanted page URL (a /download.pdf link also works)
        url: String,
    },
    /// Fetch, scrape and normalize a wanted page into a profile
    Profile {
        url: String,
        /// Also request an age-progressed image
        #[arg(long)]
        aged: bool,
        /// Print JSON instead of the text profile
        #[arg(long)]
        json: bool,
    },
    /// Normalize a previously scraped field bag (JSON file, or - for stdin)
    Normalize {
        path: PathBuf,
    },
    /// Age at disappearance from two free-text dates
    Age {
        #[arg(long)]
        dob: String,
        #[arg(long)]
        missing: String,
    },
    /// Show the built-in sample profile
    Sample {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileOutput<'a> {
    record: &'a MissingPersonRecord,
    age_at_disappearance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aged_image: Option<&'a AgedImageDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aged_image_error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    debug!(base_url = %settings.base_url, aged_image = settings.aged_image.endpoint.is_some(), "Loaded settings");

    match cli.command {
        Commands::Extract { url } => {
            let bag = scrape(&url, &settings).await?;
            println!("{}", serde_json::to_string_pretty(&bag)?);
        }
        Commands::Profile { url, aged, json } => {
            let bag = scrape(&url, &settings).await?;
            let record = normalize_logged(&bag);

            let aged_result = if aged {
                let client = fetch::build_client(&settings)?;
                Some(aged_image::generate(&client, &settings.aged_image, &record).await)
            } else {
                None
            };
            let (aged_image, aged_error) = match &aged_result {
                Some(Ok(d)) => (Some(d), None),
                Some(Err(e)) => (None, Some(e.user_message())),
                None => (None, None),
            };

            let output = ProfileOutput {
                record: &record,
                age_at_disappearance: profile::age::age_at_disappearance(
                    &record.date_of_birth,
                    &record.missing_since,
                ),
                aged_image,
                aged_image_error: aged_error,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_profile(&output);
            }
        }
        Commands::Normalize { path } => {
            let raw = read_input(&path)?;
            let bag: RawScrapedBag =
                serde_json::from_str(&raw).context("Input is not a scraped field bag")?;
            let record = normalize_logged(&bag);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Age { dob, missing } => match profile::age::age_at_disappearance(&dob, &missing) {
            Some(age) => println!("{}", age),
            None => println!("unavailable"),
        },
        Commands::Sample { json } => {
            let record = MissingPersonRecord::sample();
            let output = ProfileOutput {
                record: &record,
                age_at_disappearance: profile::age::age_at_disappearance(
                    &record.date_of_birth,
                    &record.missing_since,
                ),
                aged_image: None,
                aged_image_error: None,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print_profile(&output);
            }
        }
    }

    debug!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

async fn scrape(input: &str, settings: &Settings) -> Result<RawScrapedBag> {
    let url = fetch::resolve_page_url(input)?;
    let client = fetch::build_client(settings)?;
    let html = fetch::fetch_page(&client, &url, settings)
        .await
        .context("Failed to scrape webpage")?;
    let bag = extract::extract_bag(&html, url.as_str(), &settings.base_url)?;
    Ok(bag)
}

fn normalize_logged(bag: &RawScrapedBag) -> MissingPersonRecord {
    for d in profile::diagnostics(bag) {
        match d {
            Degradation::MissingField(label) => debug!("No '{}' row on page, left empty", label),
            Degradation::UnparseableDateLocation(line) => {
                warn!("No leading date in '{}', using it verbatim", line)
            }
        }
    }
    profile::normalize(bag)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_profile(output: &ProfileOutput) {
    let r = output.record;
    println!("{}", r.full_name());
    println!("{}", "=".repeat(r.full_name().chars().count().max(14)));
    println!("MISSING PERSON\n");

    for (label, value) in r.details() {
        println!("{:<22} {}", format!("{}:", label), value);
    }
    if let Some(from) = &r.missing_from {
        println!("{:<22} {}", "Missing From:", from);
    }
    if let Some(age) = output.age_at_disappearance {
        println!("{:<22} {}", "Age at disappearance:", age);
    }

    println!();
    println!("{:<22} {}", "Photo:", r.image1.as_deref().unwrap_or("Not Available"));
    if let Some(second) = &r.image2 {
        println!("{:<22} {}", "Second photo:", second);
    }
    match (output.aged_image, &output.aged_image_error) {
        (Some(aged), _) => {
            println!("{:<22} {} ({})", "AI aged progression:", aged.image_url, aged.caption())
        }
        (None, Some(err)) => println!("{:<22} {}", "AI aged progression:", err),
        (None, None) => {}
    }
}
