//! Application lifecycle around the automation run
//!
//! Stops stale Anyi processes, clears the per-user config folder, launches the
//! executable (prompting for its path when none is saved) and retries the
//! sequence with application restarts.
pub mod cleanup;
pub mod error;
pub mod launcher;
pub mod orchestrator;
pub mod process;
pub mod settings;
pub mod types;


pub use cleanup::UserConfigCleanup;
pub use error::{LifecycleError, LifecycleResult};
pub use launcher::{CommandBuilder, ExeLauncher, validate_exe_path};
pub use orchestrator::{Orchestrator, OrchestratorConfig, TARGET_PROCESSES};
pub use process::SystemProcesses;
pub use settings::{LauncherSettings, SETTINGS_FILE, SettingsStore};
pub use types::{AppLauncher, ConfigCleanup, ProcessControl, RunOutcome};
