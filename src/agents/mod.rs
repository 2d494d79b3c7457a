//! Domain agents the planner can call.
//!
//! [`TravelBackend`] is the seam where real weather, flight, hotel, event,
//! and booking providers would plug in. [`StubBackend`] returns synthetic
//! but internally consistent data.

mod stub;

pub use stub::{StubBackend, MAX_RANGE_DAYS};

use async_trait::async_trait;

use crate::domain::{
    BookingConfirmation, EventOption, FlightOption, HotelOption, TravelerPrefs, WeatherSummary,
};
use crate::error::TravelError;

/// Hotel search parameters.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct HotelQuery {
    pub destination: String,
    pub checkin: String,
    pub checkout: String,
    #[serde(deserialize_with = "crate::domain::deserialize_count")]
    pub rooms: u32,
    #[serde(default)]
    pub max_price_per_night: Option<f64>,
    pub currency: String,
}

/// Event search parameters.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct EventQuery {
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub interests: Vec<String>,
}

/// Travel data and booking operations.
#[async_trait]
pub trait TravelBackend: Send + Sync {
    /// Daily weather for `city` over `[start_date, end_date]` inclusive.
    async fn weather(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<WeatherSummary, TravelError>;

    /// Flight options matching the traveler's preferences.
    async fn flights(&self, prefs: &TravelerPrefs) -> Result<Vec<FlightOption>, TravelError>;

    /// Hotel options for a stay.
    async fn hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>, TravelError>;

    /// Local events during a stay.
    async fn events(&self, query: &EventQuery) -> Result<Vec<EventOption>, TravelError>;

    /// Book a flight and optionally a hotel.
    async fn book(
        &self,
        flight: &FlightOption,
        hotel: Option<&HotelOption>,
    ) -> Result<BookingConfirmation, TravelError>;
}
