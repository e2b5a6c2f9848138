//! Command-line interface definitions

use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::Trip;

/// Tripcraft - AI-assisted travel itinerary editor
#[derive(Debug, Parser)]
#[command(name = "tc", version, about)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: .tripcraft.yml, then user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new trip file
    New {
        /// Destination, e.g. "Kyoto"
        destination: String,

        /// Trip start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<chrono::NaiveDate>,

        /// Trip end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<chrono::NaiveDate>,

        /// Where to write the trip (default: <destination-slug>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print an itinerary
    Show {
        /// Trip file to read
        trip: PathBuf,

        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Fold a flight booking into a trip
    MergeBooking {
        /// Trip file to update
        trip: PathBuf,

        /// Booking file (flight JSON)
        #[arg(short, long)]
        booking: PathBuf,

        /// Where to write the merged trip (default: in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one conversation turn against a trip
    Chat {
        /// Trip file to update
        trip: PathBuf,

        /// Your message to the planner
        #[arg(short, long)]
        message: String,

        /// Where to write the updated trip (default: in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Enrich items that have no geocoded location
    Geocode {
        /// Trip file to update
        trip: PathBuf,

        /// Where to write the enriched trip (default: in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Push a trip to the persistence backend
    Sync {
        /// Trip file to push
        trip: PathBuf,
    },
}

/// Output format for commands that print data
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Read a trip from a JSON file
pub fn load_trip(path: &Path) -> Result<Trip> {
    let content = std::fs::read_to_string(path).context(format!("Failed to read trip file {}", path.display()))?;
    let trip: Trip = serde_json::from_str(&content).context("Failed to parse trip JSON")?;
    Ok(trip)
}

/// Write a trip to a JSON file, pretty-printed
pub fn write_trip(path: &Path, trip: &Trip) -> Result<()> {
    let json = serde_json::to_string_pretty(trip)?;
    std::fs::write(path, json + "\n").context(format!("Failed to write trip file {}", path.display()))?;
    Ok(())
}

/// Render an itinerary day by day for the terminal.
///
/// Items in `highlight` (the changed-item set) are marked so a merge or
/// chat turn shows what it touched.
pub fn render_trip_text(trip: &Trip, highlight: &HashSet<String>) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", trip.destination.bold()));
    match (trip.start_date, trip.end_date) {
        (Some(start), Some(end)) => out.push_str(&format!("{} to {}\n", start, end)),
        _ => out.push_str("no dates yet\n"),
    }
    if let Some(budget) = trip.budget {
        out.push_str(&format!("budget: {:.0}\n", budget));
    }

    for (index, day) in trip.days.iter().enumerate() {
        out.push_str(&format!(
            "\n{} {} - {}\n",
            format!("Day {}", index + 1).cyan().bold(),
            day.date,
            day.location
        ));
        if day.items.is_empty() {
            out.push_str("  (empty)\n");
        }
        for item in &day.items {
            let time = match item.start_time {
                Some(t) => t.format("%H:%M").to_string(),
                None => "--:--".to_string(),
            };
            let marker = if highlight.contains(&item.id) { "*" } else { " " };
            let title = if highlight.contains(&item.id) {
                item.title.yellow().to_string()
            } else {
                item.title.to_string()
            };
            out.push_str(&format!("  {}{} [{}] {}\n", marker, time, item.kind, title));
            if let Some(cost) = item.cost {
                out.push_str(&format!("      cost: {:.0}\n", cost));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Day, ItemKind, ItineraryItem};
    use chrono::NaiveDate;

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_load_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trip.json");

        let trip = Trip::new("Lisbon");
        write_trip(&path, &trip).unwrap();
        let back = load_trip(&path).unwrap();
        assert_eq!(back, trip);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trip.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_trip(&path).is_err());
    }

    #[test]
    fn test_render_marks_highlighted_items() {
        let mut day = Day::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), "Tokyo");
        day.items.push(ItineraryItem::new("Senso-ji", ItemKind::Sight));
        day.items.push(ItineraryItem::new("Ramen", ItemKind::Food));
        let trip = Trip::new("Tokyo").with_day(day);

        let mut highlight = HashSet::new();
        highlight.insert(trip.days[0].items[1].id.clone());

        let text = render_trip_text(&trip, &highlight);
        assert!(text.contains("Day 1"));
        assert!(text.contains("*--:--"));
        assert!(text.contains("Senso-ji"));
    }
}
