//! Automation engine: locating templates, acting on them, and running the script
//!
//! Layering is strictly bottom-up:
//! - `Locator` polls the screen and clears interrupt popups
//! - `Actuator` clicks located templates and enters text
//! - `Sequencer` runs the fixed step list on top of the actuator
pub mod actuator;
pub mod config;
pub mod error;
pub mod locator;
pub mod sequencer;
pub mod types;

#[cfg(test)]
mod tests;

pub use actuator::{Actuator, offset_point, random_email};
pub use config::{AutomationConfig, JitterBounds};
pub use error::{AutomationError, AutomationResult};
pub use locator::Locator;
pub(crate) use locator::deadline_after;
pub use sequencer::Sequencer;
pub use types::{SIGNUP_SCRIPT, SequenceOutcome, SequenceState, Step};
