use thiserror::Error;

/// A specialized `Result` type for desktop backend operations.
pub type DesktopResult<T> = Result<T, DesktopError>;

/// The error type for screen capture, synthetic input and clipboard access.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("No monitor available for screen capture")]
    NoMonitor,

    #[error("Screen capture failed: {source}")]
    CaptureFailed {
        #[from]
        source: xcap::XCapError,
    },

    #[error("Input simulation failed during {action}: {description}")]
    InputFailed { action: String, description: String },

    #[error("Clipboard access failed: {source}")]
    ClipboardFailed {
        #[from]
        source: arboard::Error,
    },

    #[error("No key mapping for character {0:?}")]
    UnmappedCharacter(char),

    #[error("Click coordinates are out of bounds: x={x}, y={y}")]
    ClickOutOfBounds { x: i32, y: i32 },
}

impl DesktopError {
    /// Build an `InputFailed` error from any debuggable simulator error
    pub fn input(action: &str, err: impl std::fmt::Debug) -> Self {
        DesktopError::InputFailed {
            action: action.to_string(),
            description: format!("{err:?}"),
        }
    }
}
