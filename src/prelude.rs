//! Convenience re-exports for common use.

pub use crate::agents::{StubBackend, TravelBackend};
pub use crate::config::TravelConfig;
pub use crate::domain::{CabinClass, Itinerary, TravelerPrefs};
pub use crate::error::{Result, TravelError};
pub use crate::orchestrator::{PlanOutcome, RunEvent, RunEventPayload, TravelOrchestrator};
pub use crate::provider::ModelProvider;
pub use crate::tools::{AgentTool, AgentToolParameters, Tool, ToolArguments};
pub use crate::types::{ContentPart, GenerationSettings, ModelMessage, Role, Usage};
