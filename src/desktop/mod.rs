// Desktop module - screen capture and synthetic input for the driven application
// This module provides the backend abstraction the automation engine talks to,
// plus the native implementation built on xcap, rdev and arboard.

pub mod error;
pub mod keymap;
pub mod native;
pub mod types;

#[cfg(test)]
pub(crate) mod synthetic;

// Re-export the main types and functions for easy access
pub use error::{DesktopError, DesktopResult};
pub use native::NativeDesktop;
pub use types::{DesktopClient, Modifier, ScreenCapture};
