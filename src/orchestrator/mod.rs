//! Travel planning orchestration (tool loop, travel tools, run events).

pub mod events;
pub mod prompt;
pub mod runner;
pub mod state;
pub mod tools;

pub use events::{RunEvent, RunEventPayload, RunEventSink, RunId};
pub use runner::{PlanOutcome, TravelOrchestrator};
pub use state::{SharedTripState, TripState};
pub use tools::travel_tools;
