use crate::desktop::DesktopError;
use crate::template_matching::TemplateError;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for automation steps.
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Failure kinds of the automation engine. These are logged where they occur;
/// only booleans and options cross component boundaries.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Template '{template}' did not appear within {timeout:?}")]
    NotFound { template: String, timeout: Duration },

    #[error("Template resource missing: {source}")]
    ResourceMissing {
        #[from]
        source: TemplateError,
    },

    #[error("{action} failed: {source}")]
    ActionFailed {
        action: String,
        #[source]
        source: DesktopError,
    },

    #[error("Sequence aborted at step '{step}': {reason}")]
    SequenceAborted { step: String, reason: String },

    #[error("External process failure: {description}")]
    ExternalProcessFailure { description: String },
}

impl AutomationError {
    pub fn action(action: impl Into<String>, source: DesktopError) -> Self {
        AutomationError::ActionFailed {
            action: action.into(),
            source,
        }
    }
}
