//! Observability setup for wachat: tracing subscriber initialization with
//! optional OpenTelemetry export, and GenAI semantic-convention attribute
//! names for completion spans.

pub mod genai_attrs;
pub mod tracing_setup;
