//! Facts gathered by tools during one planning run.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::domain::{BookingConfirmation, EventOption, FlightOption, HotelOption, WeatherSummary};

/// Accumulator written by the travel tools. Each tool replaces the slot it
/// owns; `finalize_booking` reads flights and hotels from here by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripState {
    pub weather: Option<WeatherSummary>,
    pub flights: Vec<FlightOption>,
    pub hotels: Vec<HotelOption>,
    pub events: Vec<EventOption>,
    pub booking: Option<BookingConfirmation>,
}

/// Handle shared between the tools of a single run.
///
/// The lock is only held for short synchronous reads and writes, never
/// across an await point.
#[derive(Debug, Clone, Default)]
pub struct SharedTripState(Arc<Mutex<TripState>>);

impl SharedTripState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, TripState> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> TripState {
        self.lock().clone()
    }
}
