//! Tool system for function calling.

pub mod arguments;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::{AgentToolParameters, ParameterBuilder};
pub use validation::validate_arguments;
