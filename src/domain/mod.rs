//! Travel domain value objects.
//!
//! These are plain records exchanged with the model as JSON. The only
//! invariant enforced beyond field types is that traveler dates are ISO
//! `YYYY-MM-DD` calendar dates.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::TravelError;

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TravelError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| TravelError::InvalidArgument(format!("invalid date '{value}': {e}")))
}

/// Seat class for flights.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub const ALL: [&'static str; 4] = ["economy", "premium_economy", "business", "first"];
}

fn default_travelers() -> u32 {
    1
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Deserialize a count that models may send as a whole float (`2.0`).
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(value as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )))
    }
}

/// Traveler preferences supplied with the goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TravelerPrefs {
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    #[serde(default)]
    pub return_date: Option<String>,
    #[serde(default = "default_travelers", deserialize_with = "deserialize_count")]
    pub travelers: u32,
    #[serde(default)]
    pub cabin: CabinClass,
    #[serde(default = "default_currency")]
    pub budget_currency: String,
    #[serde(default)]
    pub max_flight_price: Option<f64>,
    #[serde(default)]
    pub max_hotel_price_per_night: Option<f64>,
    #[serde(default = "default_travelers", deserialize_with = "deserialize_count")]
    pub hotel_rooms: u32,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl TravelerPrefs {
    /// Preferences with defaults for everything but the route and departure.
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        depart_date: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            depart_date: depart_date.into(),
            return_date: None,
            travelers: default_travelers(),
            cabin: CabinClass::default(),
            budget_currency: default_currency(),
            max_flight_price: None,
            max_hotel_price_per_night: None,
            hotel_rooms: default_travelers(),
            interests: Vec::new(),
        }
    }

    /// Check the date fields.
    pub fn validate(&self) -> Result<(), TravelError> {
        let depart = parse_iso_date(&self.depart_date)?;
        if let Some(ref ret) = self.return_date {
            let ret = parse_iso_date(ret)?;
            if ret < depart {
                return Err(TravelError::InvalidArgument(format!(
                    "return_date {ret} is before depart_date {depart}"
                )));
            }
        }
        Ok(())
    }

    /// Parse from JSON and validate.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TravelError> {
        let prefs: Self = serde_json::from_value(value)
            .map_err(|e| TravelError::InvalidArgument(format!("invalid traveler prefs: {e}")))?;
        prefs.validate()?;
        Ok(prefs)
    }
}

/// Daily weather outlook. The vectors are parallel, one entry per date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSummary {
    pub city: String,
    pub dates: Vec<String>,
    pub highs_c: Vec<f64>,
    pub lows_c: Vec<f64>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOption {
    pub carrier: String,
    pub flight_number: String,
    pub depart_time_local: String,
    pub arrive_time_local: String,
    pub duration: String,
    pub cabin: CabinClass,
    pub price_currency: String,
    pub price_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HotelOption {
    pub name: String,
    pub address: String,
    pub checkin: String,
    pub checkout: String,
    pub rating: f64,
    pub price_currency: String,
    pub price_total: f64,
    #[serde(default)]
    pub cancellation_policy: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventOption {
    pub title: String,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub price_currency: Option<String>,
    #[serde(default)]
    pub price_total: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    PendingConfirmation,
}

/// Result of a booking attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingConfirmation {
    pub flight_booking_id: String,
    pub hotel_booking_id: Option<String>,
    pub status: BookingStatus,
}

/// One day of the plan, split into optional parts of the day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItineraryDay {
    pub date: String,
    #[serde(default)]
    pub morning: Option<String>,
    #[serde(default)]
    pub afternoon: Option<String>,
    #[serde(default)]
    pub evening: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// The final structured plan the model is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Itinerary {
    pub summary: String,
    pub flights: Vec<FlightOption>,
    pub hotel: Option<HotelOption>,
    pub weather: Option<WeatherSummary>,
    #[serde(default)]
    pub events: Vec<EventOption>,
    #[serde(default)]
    pub plan: Vec<ItineraryDay>,
    pub est_total_currency: String,
    pub est_total_amount: f64,
}

impl Itinerary {
    /// Field outline embedded in prompts so the model knows the target shape.
    pub fn schema_hint() -> serde_json::Value {
        serde_json::json!({
            "summary": "string",
            "flights": [{
                "carrier": "string", "flight_number": "string",
                "depart_time_local": "YYYY-MM-DDTHH:MM", "arrive_time_local": "YYYY-MM-DDTHH:MM",
                "duration": "string", "cabin": CabinClass::ALL.join("|"),
                "price_currency": "string", "price_total": "number"
            }],
            "hotel": {
                "name": "string", "address": "string", "checkin": "YYYY-MM-DD",
                "checkout": "YYYY-MM-DD", "rating": "number", "price_currency": "string",
                "price_total": "number", "cancellation_policy": "string|null"
            },
            "weather": {
                "city": "string", "dates": ["YYYY-MM-DD"], "highs_c": ["number"],
                "lows_c": ["number"], "conditions": ["string"]
            },
            "events": [{
                "title": "string", "start": "string", "end": "string|null", "venue": "string|null",
                "price_currency": "string|null", "price_total": "number|null",
                "category": "string|null", "url": "string|null"
            }],
            "plan": [{
                "date": "YYYY-MM-DD", "morning": "string|null", "afternoon": "string|null",
                "evening": "string|null", "notes": "string|null"
            }],
            "est_total_currency": "string",
            "est_total_amount": "number"
        })
    }
}
