//! Tripcraft CLI entry point

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use tripcraft::chat::{ChatRequest, ConversationClient, HttpConversationClient};
use tripcraft::cli::{load_trip, render_trip_text, write_trip, Cli, Command, OutputFormat};
use tripcraft::config::Config;
use tripcraft::domain::{Day, FlightBooking, Trip};
use tripcraft::editor::Editor;
use tripcraft::geocode::{enrich_trip, HttpGeocoder};
use tripcraft::persist::{HttpTripStore, StoreError, TripStore};

fn setup_logging(verbose: bool) -> Result<()> {
    // Write logs to a file so command output stays clean
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripcraft")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("tripcraft.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Command::New {
            destination,
            start,
            end,
            output,
        } => cmd_new(&destination, start, end, output),
        Command::Show { trip, format } => cmd_show(&trip, format),
        Command::MergeBooking { trip, booking, output } => cmd_merge_booking(&trip, &booking, output),
        Command::Chat { trip, message, output } => cmd_chat(&config, &trip, &message, output).await,
        Command::Geocode { trip, output } => cmd_geocode(&config, &trip, output).await,
        Command::Sync { trip } => cmd_sync(&config, &trip).await,
    }
}

/// Scaffold a new trip file
fn cmd_new(destination: &str, start: Option<NaiveDate>, end: Option<NaiveDate>, output: Option<PathBuf>) -> Result<()> {
    let mut trip = Trip::new(destination);

    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(eyre::eyre!("End date {} is before start date {}", end, start));
        }
        trip = trip.with_dates(start, end);
        // Pre-create one empty day per date in the range
        let mut date = start;
        while date <= end {
            trip.days.push(Day::new(date, destination));
            date = date.succ_opt().ok_or_else(|| eyre::eyre!("Date out of range"))?;
        }
    }

    let path = output.unwrap_or_else(|| {
        let slug: String = destination
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect();
        PathBuf::from(format!("{}.json", slug.trim_matches('-')))
    });

    write_trip(&path, &trip)?;
    println!("Created {} ({} days)", path.display(), trip.days.len());
    Ok(())
}

/// Print an itinerary
fn cmd_show(trip_path: &Path, format: OutputFormat) -> Result<()> {
    let trip = load_trip(trip_path)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trip)?),
        OutputFormat::Text => print!("{}", render_trip_text(&trip, &HashSet::new())),
    }
    Ok(())
}

/// Fold a flight booking into a trip
fn cmd_merge_booking(trip_path: &Path, booking_path: &Path, output: Option<PathBuf>) -> Result<()> {
    let trip = load_trip(trip_path)?;
    let content =
        fs::read_to_string(booking_path).context(format!("Failed to read booking file {}", booking_path.display()))?;
    let booking: FlightBooking = serde_json::from_str(&content).context("Failed to parse booking JSON")?;

    let mut editor = Editor::with_trip(trip);
    let day_index = editor
        .merge_booking(&booking)
        .ok_or_else(|| eyre::eyre!("No trip loaded"))?;

    let merged = editor.trip().expect("trip was just merged");
    print!("{}", render_trip_text(merged, editor.changed_items()));
    println!();
    println!("Outbound flight placed on day {}", day_index + 1);

    let target = output.unwrap_or_else(|| trip_path.to_path_buf());
    write_trip(&target, merged)?;
    Ok(())
}

/// Run one conversation turn against a trip
async fn cmd_chat(config: &Config, trip_path: &Path, message: &str, output: Option<PathBuf>) -> Result<()> {
    config.validate()?;

    let trip = load_trip(trip_path)?;
    let client = HttpConversationClient::from_config(&config.llm).context("Failed to create conversation client")?;

    let request = ChatRequest::new(message).with_trip(trip.clone());
    let reply = client.send_message(request).await.context("Conversation turn failed")?;

    let mut editor = Editor::with_trip(trip);
    if let Some(new_trip) = reply.trip {
        editor.set_trip(new_trip);
    } else if let Some(update) = reply.trip_update {
        editor.update_trip(update);
    }

    println!("{}", reply.message);
    if let Some(suggestion) = reply.suggestion {
        println!("\nSuggestion: {}", suggestion);
    }

    let updated = editor.trip().expect("editor started with a trip");
    if editor.has_unsaved_changes() {
        println!();
        print!("{}", render_trip_text(updated, editor.changed_items()));
        let target = output.unwrap_or_else(|| trip_path.to_path_buf());
        write_trip(&target, updated)?;
    }
    Ok(())
}

/// Push a trip to the persistence backend
async fn cmd_sync(config: &Config, trip_path: &Path) -> Result<()> {
    let trip = load_trip(trip_path)?;
    let store = HttpTripStore::from_config(&config.api).context("Failed to create trip store")?;

    match store.update_trip(&trip.id, &trip, &[]).await {
        Ok(()) => println!("Updated trip {}", trip.id),
        Err(StoreError::NotFound(_)) => {
            let id = store
                .create_trip(&trip, &[])
                .await
                .context("Failed to create trip on backend")?;
            println!("Created trip {}", id);
        }
        Err(e) => return Err(e).context("Failed to sync trip"),
    }
    Ok(())
}

/// Enrich items that have no geocoded location
async fn cmd_geocode(config: &Config, trip_path: &Path, output: Option<PathBuf>) -> Result<()> {
    if !config.geocode.enabled {
        println!("Geocoding is disabled in config");
        return Ok(());
    }

    let mut trip = load_trip(trip_path)?;
    let geocoder = HttpGeocoder::from_config(&config.geocode).context("Failed to create geocoder")?;

    let enriched = enrich_trip(&geocoder, &mut trip).await;
    println!("Enriched {} item(s)", enriched);

    let target = output.unwrap_or_else(|| trip_path.to_path_buf());
    write_trip(&target, &trip)?;
    Ok(())
}
