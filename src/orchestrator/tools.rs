//! Travel tools exposed to the model.
//!
//! Each tool wraps one [`TravelBackend`] operation, records its result in
//! the run's [`SharedTripState`], and returns the result as JSON. Tools are
//! built with [`AgentTool::new`] and returned as `Arc<dyn Tool>`.

use std::sync::Arc;

use crate::agents::{EventQuery, HotelQuery, TravelBackend};
use crate::domain::{CabinClass, TravelerPrefs};
use crate::error::TravelError;
use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolExecutionContext};

use super::state::SharedTripState;

pub const WEATHER_TOOL: &str = "call_weather_agent";
pub const FLIGHTS_TOOL: &str = "call_flights_agent";
pub const HOTELS_TOOL: &str = "call_hotels_agent";
pub const EVENTS_TOOL: &str = "call_events_agent";
pub const BOOKING_TOOL: &str = "finalize_booking";

/// All travel tools for one run. `finalize_booking` is only included when
/// booking is authorized.
pub fn travel_tools(
    backend: Arc<dyn TravelBackend>,
    state: SharedTripState,
    allow_booking: bool,
) -> Vec<Arc<dyn Tool>> {
    let mut tools = vec![
        weather_tool(backend.clone(), state.clone()),
        flights_tool(backend.clone(), state.clone()),
        hotels_tool(backend.clone(), state.clone()),
        events_tool(backend.clone(), state.clone()),
    ];
    if allow_booking {
        tools.push(booking_tool(backend, state));
    }
    tools
}

/// `call_weather_agent`: short-term weather for a city and date range.
pub fn weather_tool(backend: Arc<dyn TravelBackend>, state: SharedTripState) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        WEATHER_TOOL,
        "Get a short-term weather summary for a city and date range",
        AgentToolParameters::object()
            .string("city", "", true)
            .string("start_date", "YYYY-MM-DD", true)
            .string("end_date", "YYYY-MM-DD", true)
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let backend = backend.clone();
            let state = state.clone();
            async move {
                let summary = backend
                    .weather(
                        args.get_str("city")?,
                        args.get_str("start_date")?,
                        args.get_str("end_date")?,
                    )
                    .await?;
                let value = serde_json::to_value(&summary)?;
                state.lock().weather = Some(summary);
                Ok(value)
            }
        },
    ))
}

/// `call_flights_agent`: flight search from traveler preferences.
pub fn flights_tool(backend: Arc<dyn TravelBackend>, state: SharedTripState) -> Arc<dyn Tool> {
    let prefs = AgentToolParameters::object()
        .describe("Traveler preferences")
        .string("origin", "", true)
        .string("destination", "", true)
        .string("depart_date", "YYYY-MM-DD", true)
        .string("return_date", "YYYY-MM-DD", false)
        .integer("travelers", "", true)
        .string_enum("cabin", "", &CabinClass::ALL, true)
        .string("budget_currency", "", true)
        .number("max_flight_price", "", false);

    Arc::new(AgentTool::new(
        FLIGHTS_TOOL,
        "Search flight options based on traveler preferences",
        AgentToolParameters::object().object("prefs", prefs, true).build(),
        move |args, _ctx: ToolExecutionContext| {
            let backend = backend.clone();
            let state = state.clone();
            async move {
                let prefs = TravelerPrefs::from_value(args.get_object("prefs")?.clone())?;
                let flights = backend.flights(&prefs).await?;
                let value = serde_json::to_value(&flights)?;
                state.lock().flights = flights;
                Ok(value)
            }
        },
    ))
}

/// `call_hotels_agent`: hotel search for a stay.
pub fn hotels_tool(backend: Arc<dyn TravelBackend>, state: SharedTripState) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        HOTELS_TOOL,
        "Search hotel options",
        AgentToolParameters::object()
            .string("destination", "", true)
            .string("checkin", "YYYY-MM-DD", true)
            .string("checkout", "YYYY-MM-DD", true)
            .integer("rooms", "", true)
            .number("max_price_per_night", "", false)
            .string("currency", "", true)
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let backend = backend.clone();
            let state = state.clone();
            async move {
                let query: HotelQuery = args.deserialize()?;
                let hotels = backend.hotels(&query).await?;
                let value = serde_json::to_value(&hotels)?;
                state.lock().hotels = hotels;
                Ok(value)
            }
        },
    ))
}

/// `call_events_agent`: local events matching interests.
pub fn events_tool(backend: Arc<dyn TravelBackend>, state: SharedTripState) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        EVENTS_TOOL,
        "Search local events matching user interests",
        AgentToolParameters::object()
            .string("city", "", true)
            .string("start_date", "YYYY-MM-DD", true)
            .string("end_date", "YYYY-MM-DD", true)
            .string_array("interests", "", false)
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let backend = backend.clone();
            let state = state.clone();
            async move {
                let query: EventQuery = args.deserialize()?;
                let events = backend.events(&query).await?;
                let value = serde_json::to_value(&events)?;
                state.lock().events = events;
                Ok(value)
            }
        },
    ))
}

/// `finalize_booking`: book a previously fetched flight and hotel by index.
pub fn booking_tool(backend: Arc<dyn TravelBackend>, state: SharedTripState) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        BOOKING_TOOL,
        "Attempt to book selected flight and hotel",
        AgentToolParameters::object()
            .integer("flight_index", "Index into the most recent flight results", true)
            .integer("hotel_index", "Index into the most recent hotel results", false)
            .build(),
        move |args, _ctx: ToolExecutionContext| {
            let backend = backend.clone();
            let state = state.clone();
            async move {
                let flight_index = args.get_index("flight_index")?;
                let hotel_index = args.get_index_or("hotel_index", 0)?;

                let (flight, hotel) = {
                    let trip = state.lock();
                    let flight = trip.flights.get(flight_index).cloned().ok_or_else(|| {
                        TravelError::tool(
                            BOOKING_TOOL,
                            format!(
                                "flight_index {flight_index} out of range ({} flights fetched)",
                                trip.flights.len()
                            ),
                        )
                    })?;
                    let hotel = if trip.hotels.is_empty() {
                        None
                    } else {
                        Some(trip.hotels.get(hotel_index).cloned().ok_or_else(|| {
                            TravelError::tool(
                                BOOKING_TOOL,
                                format!(
                                    "hotel_index {hotel_index} out of range ({} hotels fetched)",
                                    trip.hotels.len()
                                ),
                            )
                        })?)
                    };
                    (flight, hotel)
                };

                let booking = backend.book(&flight, hotel.as_ref()).await?;
                let value = serde_json::to_value(&booking)?;
                state.lock().booking = Some(booking);
                Ok(value)
            }
        },
    ))
}
