use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tracing::debug;

use super::{EventQuery, HotelQuery, TravelBackend};
use crate::domain::{
    parse_iso_date, BookingConfirmation, BookingStatus, EventOption, FlightOption, HotelOption,
    TravelerPrefs, WeatherSummary,
};
use crate::error::TravelError;

const CONDITIONS: [&str; 3] = ["clear", "partly cloudy", "light rain"];
const HOTEL_BASE_PER_NIGHT: f64 = 140.0;
/// Longest inclusive date span the weather and events agents accept.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Deterministic synthetic data, no network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubBackend;

impl StubBackend {
    pub fn new() -> Self {
        Self
    }
}

fn date_range(start_date: &str, end_date: &str) -> Result<(NaiveDate, NaiveDate), TravelError> {
    let start = parse_iso_date(start_date)?;
    let end = parse_iso_date(end_date)?;
    if end < start {
        return Err(TravelError::InvalidArgument(format!(
            "end date {end} is before start date {start}"
        )));
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(TravelError::InvalidArgument(format!(
            "date range {start}..{end} spans {days} days, at most {MAX_RANGE_DAYS} are supported"
        )));
    }
    Ok((start, end))
}

/// Keep the items that satisfy `fits`; if none do, keep everything so the
/// planner still has options to reason about.
fn prefer<T>(items: Vec<T>, fits: impl Fn(&T) -> bool) -> Vec<T> {
    if items.iter().any(&fits) {
        items.into_iter().filter(|i| fits(i)).collect()
    } else {
        items
    }
}

#[async_trait]
impl TravelBackend for StubBackend {
    async fn weather(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<WeatherSummary, TravelError> {
        let (start, end) = date_range(start_date, end_date)?;
        let days = (end - start).num_days() + 1;

        let mut summary = WeatherSummary {
            city: city.to_string(),
            dates: Vec::with_capacity(days as usize),
            highs_c: Vec::with_capacity(days as usize),
            lows_c: Vec::with_capacity(days as usize),
            conditions: Vec::with_capacity(days as usize),
        };
        for i in 0..days {
            let offset = (i % 3) as f64;
            summary.dates.push((start + Duration::days(i)).to_string());
            summary.highs_c.push(26.0 + offset);
            summary.lows_c.push(18.0 + offset);
            summary.conditions.push(CONDITIONS[(i % 3) as usize].to_string());
        }

        debug!(city, days, "stub weather");
        Ok(summary)
    }

    async fn flights(&self, prefs: &TravelerPrefs) -> Result<Vec<FlightOption>, TravelError> {
        prefs.validate()?;
        let travelers = f64::from(prefs.travelers);
        let day = &prefs.depart_date;

        let options = vec![
            FlightOption {
                carrier: "Example Air".into(),
                flight_number: "EA123".into(),
                depart_time_local: format!("{day}T09:15"),
                arrive_time_local: format!("{day}T14:45"),
                duration: "5h 30m".into(),
                cabin: prefs.cabin,
                price_currency: prefs.budget_currency.clone(),
                price_total: 480.0 * travelers,
            },
            FlightOption {
                carrier: "SampleJet".into(),
                flight_number: "SJ456".into(),
                depart_time_local: format!("{day}T17:30"),
                arrive_time_local: format!("{day}T23:05"),
                duration: "5h 35m".into(),
                cabin: prefs.cabin,
                price_currency: prefs.budget_currency.clone(),
                price_total: 520.0 * travelers,
            },
        ];

        Ok(match prefs.max_flight_price {
            Some(cap) => prefer(options, |f| f.price_total <= cap),
            None => options,
        })
    }

    async fn hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOption>, TravelError> {
        let checkin = parse_iso_date(&query.checkin)?;
        let checkout = parse_iso_date(&query.checkout)?;
        let nights = (checkout - checkin).num_days().abs().max(1) as f64;
        let rooms = f64::from(query.rooms.max(1));
        let total = HOTEL_BASE_PER_NIGHT * nights * rooms;

        let options = vec![
            HotelOption {
                name: "Central Square Hotel".into(),
                address: format!("Downtown, {}", query.destination),
                checkin: query.checkin.clone(),
                checkout: query.checkout.clone(),
                rating: 4.5,
                price_currency: query.currency.clone(),
                price_total: total,
                cancellation_policy: Some("Free cancellation until 24h before check-in".into()),
            },
            HotelOption {
                name: "Riverside Boutique".into(),
                address: format!("Riverside, {}", query.destination),
                checkin: query.checkin.clone(),
                checkout: query.checkout.clone(),
                rating: 4.2,
                price_currency: query.currency.clone(),
                price_total: total * 1.1,
                cancellation_policy: Some("Partial refund".into()),
            },
        ];

        Ok(match query.max_price_per_night {
            Some(cap) => prefer(options, |h| h.price_total / (nights * rooms) <= cap),
            None => options,
        })
    }

    async fn events(&self, query: &EventQuery) -> Result<Vec<EventOption>, TravelError> {
        let (start, end) = date_range(&query.start_date, &query.end_date)?;
        let second_day = (start + Duration::days(1)).min(end);

        let events = vec![
            EventOption {
                title: "Open-Air Food Market".into(),
                start: format!("{start}T18:00"),
                end: Some(format!("{start}T21:00")),
                venue: Some("Old Town Plaza".into()),
                price_currency: Some("USD".into()),
                price_total: Some(0.0),
                category: Some("food".into()),
                url: Some("https://example.com/events/market".into()),
            },
            EventOption {
                title: "Live Jazz Night".into(),
                start: format!("{second_day}T20:00"),
                end: None,
                venue: Some("Blue Note Club".into()),
                price_currency: Some("USD".into()),
                price_total: Some(35.0),
                category: Some("music".into()),
                url: Some("https://example.com/events/jazz".into()),
            },
        ];

        if query.interests.is_empty() {
            return Ok(events);
        }
        let wanted: Vec<String> = query.interests.iter().map(|i| i.to_lowercase()).collect();
        Ok(prefer(events, |e| {
            e.category
                .as_deref()
                .is_some_and(|c| wanted.iter().any(|w| w == c))
        }))
    }

    async fn book(
        &self,
        flight: &FlightOption,
        hotel: Option<&HotelOption>,
    ) -> Result<BookingConfirmation, TravelError> {
        debug!(
            flight = flight.flight_number.as_str(),
            hotel = hotel.map(|h| h.name.as_str()),
            "stub booking"
        );
        Ok(BookingConfirmation {
            flight_booking_id: "BK-FLT-XYZ123".into(),
            hotel_booking_id: hotel.map(|_| "BK-HTL-ABC987".into()),
            status: BookingStatus::PendingConfirmation,
        })
    }
}
