//! Input validation performed before anything reaches the orchestrator.

use wachat_types::error::ValidationError;

/// Rejects empty and whitespace-only input. Accepted text is returned as
/// typed; trimming only decides emptiness.
pub fn validate_input(raw: &str) -> Result<&str, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(raw)
}
