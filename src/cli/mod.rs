//! CLI entry point for tripweaver.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{CabinClass, TravelerPrefs};
use crate::error::TravelError;

/// Tripweaver travel planner CLI
#[derive(Parser, Debug)]
#[command(name = "tripweaver", version, about = "Tool-calling travel planner")]
pub struct Cli {
    /// Config file (TOML). Defaults to the per-user config location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a trip and print the itinerary as JSON
    Plan(PlanArgs),
    /// Print the tool definitions declared to the model
    Tools(ToolsArgs),
}

/// Arguments for `tripweaver plan`.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Free-text travel goal
    pub goal: String,

    /// Traveler preferences as a JSON file; flags below override its fields
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    #[arg(long, required_unless_present = "prefs")]
    pub origin: Option<String>,

    #[arg(long, required_unless_present = "prefs")]
    pub destination: Option<String>,

    /// Departure date (YYYY-MM-DD)
    #[arg(long, required_unless_present = "prefs")]
    pub depart: Option<String>,

    /// Return date (YYYY-MM-DD)
    #[arg(long = "return")]
    pub return_date: Option<String>,

    #[arg(long)]
    pub travelers: Option<u32>,

    /// economy, premium_economy, business or first
    #[arg(long)]
    pub cabin: Option<CabinClass>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub max_flight_price: Option<f64>,

    #[arg(long)]
    pub max_hotel_price: Option<f64>,

    #[arg(long)]
    pub rooms: Option<u32>,

    /// Repeatable: --interest food --interest music
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Allow the planner to book the chosen flight and hotel
    #[arg(long)]
    pub auto_book: bool,

    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum model calls before giving up
    #[arg(long)]
    pub max_steps: Option<usize>,
}

/// Arguments for `tripweaver tools`.
#[derive(Args, Debug)]
pub struct ToolsArgs {
    /// Include the booking tool
    #[arg(long)]
    pub auto_book: bool,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl PlanArgs {
    /// Resolve traveler preferences from `--prefs` and the individual flags.
    pub fn traveler_prefs(&self) -> Result<TravelerPrefs, TravelError> {
        let mut prefs = match &self.prefs {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                TravelerPrefs::from_value(serde_json::from_str(&raw)?)?
            }
            None => {
                let missing = |flag: &str| {
                    TravelError::InvalidArgument(format!("--{flag} is required without --prefs"))
                };
                TravelerPrefs::new(
                    self.origin.clone().ok_or_else(|| missing("origin"))?,
                    self.destination.clone().ok_or_else(|| missing("destination"))?,
                    self.depart.clone().ok_or_else(|| missing("depart"))?,
                )
            }
        };

        if let Some(v) = &self.origin {
            prefs.origin = v.clone();
        }
        if let Some(v) = &self.destination {
            prefs.destination = v.clone();
        }
        if let Some(v) = &self.depart {
            prefs.depart_date = v.clone();
        }
        if self.return_date.is_some() {
            prefs.return_date = self.return_date.clone();
        }
        if let Some(v) = self.travelers {
            prefs.travelers = v;
        }
        if let Some(v) = self.cabin {
            prefs.cabin = v;
        }
        if let Some(v) = &self.currency {
            prefs.budget_currency = v.clone();
        }
        if self.max_flight_price.is_some() {
            prefs.max_flight_price = self.max_flight_price;
        }
        if self.max_hotel_price.is_some() {
            prefs.max_hotel_price_per_night = self.max_hotel_price;
        }
        if let Some(v) = self.rooms {
            prefs.hotel_rooms = v;
        }
        if !self.interests.is_empty() {
            prefs.interests = self.interests.clone();
        }

        prefs.validate()?;
        Ok(prefs)
    }
}
