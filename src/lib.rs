//! Tripweaver: a tool-calling travel planner.
//!
//! A chat model is given a travel goal plus traveler preferences and a set
//! of agent tools (weather, flights, hotels, events, booking). It calls the
//! tools as it sees fit and finally answers with a structured
//! [`Itinerary`](domain::Itinerary).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tripweaver::prelude::*;
//!
//! # async fn example() -> tripweaver::error::Result<()> {
//! let config = TravelConfig::load(None)?;
//! let planner = TravelOrchestrator::from_config(&config, Arc::new(StubBackend::new()))?;
//!
//! let prefs = TravelerPrefs::new("SFO", "Vancouver", "2025-10-10");
//! let outcome = planner.run("A long weekend of food and music", &prefs, false).await?;
//! println!("{}", outcome.itinerary.summary);
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
