pub mod args;
pub mod automation;
pub mod desktop;
pub mod lifecycle;
pub mod logging;
pub mod template_matching;

pub use automation::{Actuator, AutomationConfig, Locator, Sequencer};
pub use desktop::NativeDesktop;
