//! Tripweaver CLI binary entry point.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tripweaver::agents::StubBackend;
use tripweaver::cli::{Cli, Commands, PlanArgs, ToolsArgs};
use tripweaver::config::TravelConfig;
use tripweaver::orchestrator::{
    travel_tools, RunEvent, RunEventPayload, SharedTripState, TravelOrchestrator,
};
use tripweaver::tools::Tool;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    let result = match cli.command {
        Commands::Plan(args) => handle_plan(cli.config.as_deref(), args).await,
        Commands::Tools(args) => handle_tools(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn handle_plan(
    config_path: Option<&std::path::Path>,
    args: PlanArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = TravelConfig::load(config_path)?;
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(steps) = args.max_steps {
        config.max_steps = steps;
    }
    config.validate()?;

    let prefs = args.traveler_prefs()?;

    let sink = Arc::new(|event: RunEvent| match &event.payload {
        RunEventPayload::StepStarted { step } => eprintln!("step {step}"),
        RunEventPayload::ToolCallStarted { call } => {
            eprintln!("  -> {} ({})", call.name, call.id);
        }
        RunEventPayload::ToolResult { name, result } => {
            let output = result.result.to_string();
            let truncated = if output.len() > 200 {
                let mut end = 200;
                while end > 0 && !output.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &output[..end])
            } else {
                output
            };
            let mark = if result.is_error { "error" } else { "ok" };
            eprintln!("  <- {name} [{mark}] {truncated}");
        }
        RunEventPayload::RepairRequested { error, .. } => {
            eprintln!("  final answer rejected: {error}");
        }
        _ => {}
    });

    let planner = TravelOrchestrator::from_config(&config, Arc::new(StubBackend::new()))?
        .with_event_sink(sink);
    let outcome = planner.run(&args.goal, &prefs, args.auto_book).await?;

    println!("{}", serde_json::to_string_pretty(&outcome.itinerary)?);
    if let Some(booking) = &outcome.trip.booking {
        eprintln!(
            "booking: flight {} hotel {} ({:?})",
            booking.flight_booking_id,
            booking.hotel_booking_id.as_deref().unwrap_or("-"),
            booking.status
        );
    }
    eprintln!("{} steps, {} tokens", outcome.steps, outcome.usage.total_tokens);
    Ok(())
}

fn handle_tools(args: ToolsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let definitions: Vec<_> = travel_tools(
        Arc::new(StubBackend::new()),
        SharedTripState::new(),
        args.auto_book,
    )
    .iter()
    .map(|t| t.definition())
    .collect();
    println!("{}", serde_json::to_string_pretty(&definitions)?);
    Ok(())
}
