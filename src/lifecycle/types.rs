// Seams between the orchestrator and the operating system

/// Find and stop processes by (case-insensitive) name
pub trait ProcessControl {
    fn is_running(&mut self, name: &str) -> bool;
    /// Stop every matching process; true if at least one was stopped
    fn terminate(&mut self, name: &str) -> bool;
}

/// Remove the application's persisted state before a fresh launch
pub trait ConfigCleanup {
    /// True when the folder is gone afterwards (including when it never existed)
    fn delete_config_folder(&mut self) -> bool;
}

/// Start the target application
#[allow(async_fn_in_trait)]
pub trait AppLauncher {
    async fn launch(&mut self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The sequence completed on one of the attempts
    Completed,
    /// The application could not be (re)started
    LaunchFailed,
    /// Every attempt failed to find the window or finish the sequence
    Exhausted,
}
