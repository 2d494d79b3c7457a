//! The tool-calling planning loop.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::agents::TravelBackend;
use crate::config::{TravelConfig, DEFAULT_MAX_STEPS, DEFAULT_TEMPERATURE};
use crate::domain::{Itinerary, TravelerPrefs};
use crate::error::TravelError;
use crate::provider::{self, ModelProvider, ProviderRequest, ToolDefinition};
use crate::tools::{validate_arguments, Tool, ToolArguments, ToolExecutionContext};
use crate::types::{AgentToolCall, AgentToolResult, GenerationSettings, ModelMessage, ToolChoice, Usage};

use super::events::{RunEventEmitter, RunEventPayload, RunEventSink, RunId};
use super::prompt::{initial_messages, parse_itinerary, REPAIR_PROMPT};
use super::state::{SharedTripState, TripState};
use super::tools::travel_tools;

/// A successfully planned trip.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub run_id: RunId,
    pub itinerary: Itinerary,
    /// Everything the tools gathered, including any booking made.
    pub trip: TripState,
    /// Model calls used, including corrective turns.
    pub steps: usize,
    pub usage: Usage,
}

/// Drives a model through tool calls until it produces an [`Itinerary`].
pub struct TravelOrchestrator {
    provider: Arc<dyn ModelProvider>,
    backend: Arc<dyn TravelBackend>,
    settings: GenerationSettings,
    max_steps: usize,
    event_sink: Option<RunEventSink>,
}

impl TravelOrchestrator {
    pub fn new(provider: Arc<dyn ModelProvider>, backend: Arc<dyn TravelBackend>) -> Self {
        Self {
            provider,
            backend,
            settings: GenerationSettings::builder()
                .temperature(DEFAULT_TEMPERATURE)
                .tool_choice(ToolChoice::Auto)
                .build(),
            max_steps: DEFAULT_MAX_STEPS,
            event_sink: None,
        }
    }

    /// Build the provider from config and apply its run limits.
    pub fn from_config(
        config: &TravelConfig,
        backend: Arc<dyn TravelBackend>,
    ) -> Result<Self, TravelError> {
        let provider = provider::create_provider(config)?;
        let mut orchestrator = Self::new(provider, backend).with_max_steps(config.max_steps);
        orchestrator.settings.temperature = config.temperature;
        orchestrator.settings.max_tokens = config.max_tokens;
        Ok(orchestrator)
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_event_sink(mut self, sink: RunEventSink) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Plan a trip for `goal`, starting from `prefs`.
    ///
    /// Each step makes one model call. A reply without tool calls must parse
    /// as an [`Itinerary`]; otherwise the model gets one corrective turn and
    /// the loop continues. Tool calls within a turn run concurrently and
    /// their results are appended in the order the model issued them.
    pub async fn run(
        &self,
        goal: &str,
        prefs: &TravelerPrefs,
        auto_book: bool,
    ) -> Result<PlanOutcome, TravelError> {
        let run_id = Uuid::new_v4();
        let emitter = RunEventEmitter::new(run_id, self.event_sink.clone());
        emitter.emit(RunEventPayload::Started {
            model: self.provider.model_id().to_string(),
        });

        let result = self.run_inner(run_id, &emitter, goal, prefs, auto_book).await;
        match &result {
            Ok(outcome) => {
                info!(%run_id, steps = outcome.steps, "itinerary produced");
                emitter.emit(RunEventPayload::Completed {
                    steps: outcome.steps,
                });
            }
            Err(err) => {
                warn!(%run_id, error = %err, "planning failed");
                emitter.emit(RunEventPayload::Failed {
                    error: err.to_string(),
                });
            }
        }
        result
    }

    async fn run_inner(
        &self,
        run_id: RunId,
        emitter: &RunEventEmitter,
        goal: &str,
        prefs: &TravelerPrefs,
        auto_book: bool,
    ) -> Result<PlanOutcome, TravelError> {
        prefs.validate()?;

        let state = SharedTripState::new();
        let tools = travel_tools(self.backend.clone(), state.clone(), auto_book);
        let tool_defs: Vec<ToolDefinition> = tools.iter().map(|t| t.definition()).collect();

        let mut messages = initial_messages(goal, prefs, auto_book)?;
        let mut usage = Usage::default();

        for step in 1..=self.max_steps {
            emitter.emit(RunEventPayload::StepStarted { step });
            debug!(%run_id, step, messages = messages.len(), "calling model");

            let request = ProviderRequest {
                messages: messages.clone(),
                settings: self.settings.clone(),
                tools: Some(tool_defs.clone()),
            };
            let response = self.provider.generate_text(&request).await?;
            usage.merge(&response.usage);

            if response.tool_calls.is_empty() {
                match parse_itinerary(&response.text) {
                    Ok(itinerary) => {
                        return Ok(PlanOutcome {
                            run_id,
                            itinerary,
                            trip: state.snapshot(),
                            steps: step,
                            usage,
                        });
                    }
                    Err(err) => {
                        warn!(%run_id, step, error = %err, "final answer is not a valid itinerary");
                        emitter.emit(RunEventPayload::RepairRequested {
                            step,
                            error: err.to_string(),
                        });
                        messages.push(ModelMessage::assistant(response.text));
                        messages.push(ModelMessage::user(REPAIR_PROMPT));
                        continue;
                    }
                }
            }

            let calls = response.tool_calls;
            messages.push(ModelMessage::assistant_tool_calls(response.text, &calls));

            let resolved = calls
                .iter()
                .map(|call| {
                    tools
                        .iter()
                        .find(|t| t.name() == call.name)
                        .map(|tool| (&**tool, call))
                        .ok_or_else(|| TravelError::UnknownTool(call.name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            debug!(%run_id, step, calls = resolved.len(), "dispatching tool calls");
            let results = join_all(
                resolved
                    .into_iter()
                    .map(|(tool, call)| dispatch(tool, call, emitter)),
            )
            .await;

            for (call, result) in calls.iter().zip(results) {
                messages.push(ModelMessage::tool_result(
                    result.tool_call_id,
                    call.name.clone(),
                    result.result,
                    result.is_error,
                ));
            }
        }

        Err(TravelError::StepLimitExceeded {
            steps: self.max_steps,
        })
    }
}

/// Validate and execute one tool call. Failures become error results the
/// model can react to.
async fn dispatch(
    tool: &dyn Tool,
    call: &AgentToolCall,
    emitter: &RunEventEmitter,
) -> AgentToolResult {
    emitter.emit(RunEventPayload::ToolCallStarted { call: call.clone() });

    let args = ToolArguments::new(call.arguments.clone());
    let outcome = match validate_arguments(args.raw(), &tool.parameters().schema) {
        Err(message) => Err(TravelError::InvalidArgument(message)),
        Ok(()) => {
            let ctx = ToolExecutionContext {
                tool_call_id: Some(call.id.clone()),
                tool_name: Some(call.name.clone()),
            };
            tool.execute(&args, &ctx).await
        }
    };

    let result = match outcome {
        Ok(value) => AgentToolResult {
            tool_call_id: call.id.clone(),
            result: value,
            is_error: false,
        },
        Err(e) => {
            warn!(tool = call.name.as_str(), error = %e, "Tool execution failed");
            AgentToolResult {
                tool_call_id: call.id.clone(),
                result: serde_json::json!({ "error": e.to_string() }),
                is_error: true,
            }
        }
    };

    emitter.emit(RunEventPayload::ToolResult {
        name: call.name.clone(),
        result: result.clone(),
    });
    result
}
