// Launching Anyi.exe from a saved or user-supplied path
use super::error::{LifecycleError, LifecycleResult};
use super::settings::SettingsStore;
use super::types::AppLauncher;
use regex::Regex;
use std::io::BufRead;
use std::path::Path;
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::sleep;

/// Absolute Windows path to an `.exe` (drive letter, backslash separators)
pub const EXE_PATTERN: &str = r#"^[a-zA-Z]:\\(?:[^\\/:*?"<>|\r\n]+\\)*[^\\/:*?"<>|\r\n]*\.exe$"#;

pub fn matches_exe_pattern(path: &str) -> bool {
    Regex::new(EXE_PATTERN)
        .map(|re| re.is_match(path))
        .unwrap_or(false)
}

/// Non-empty, well-formed and pointing at an existing file
pub fn validate_exe_path(path: &str) -> bool {
    !path.is_empty() && matches_exe_pattern(path) && Path::new(path).is_file()
}

/// Builds the command that starts the executable at a path
pub type CommandBuilder = fn(&Path) -> Command;

pub struct ExeLauncher<R: BufRead> {
    settings: SettingsStore,
    input: R,
    grace_period: Duration,
    prompt_attempts: u32,
    command: CommandBuilder,
    child: Option<Child>,
}

impl<R: BufRead> ExeLauncher<R> {
    pub fn new(settings: SettingsStore, input: R) -> Self {
        Self {
            settings,
            input,
            grace_period: Duration::from_secs(2),
            prompt_attempts: 3,
            command: |path| Command::new(path),
            child: None,
        }
    }

    /// How long a started process must stay alive to count as launched
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_command(mut self, command: CommandBuilder) -> Self {
        self.command = command;
        self
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Process started by the last successful launch
    pub fn child(&self) -> Option<&Child> {
        self.child.as_ref()
    }

    /// Start `path` and save it as the executable to use next time
    pub(crate) async fn start_and_remember(&mut self, path: &str) -> bool {
        if !self.start(path).await {
            return false;
        }
        // A failed save is logged by the store; the process is already running
        self.settings.set_anyi_path(path);
        true
    }

    async fn start(&mut self, path: &str) -> bool {
        match self.spawn_checked(Path::new(path)).await {
            Ok(child) => {
                log::info!("✅ Started {} (pid {:?})", path, child.id());
                self.child = Some(child);
                true
            }
            Err(e) => {
                log::error!("❌ {}", e);
                false
            }
        }
    }

    // Spawned process must survive the grace period
    pub(crate) async fn spawn_checked(&self, path: &Path) -> LifecycleResult<Child> {
        log::info!("🚀 Starting {}", path.display());
        let mut child = (self.command)(path)
            .spawn()
            .map_err(|source| LifecycleError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;
        sleep(self.grace_period).await;
        match child.try_wait()? {
            Some(status) => Err(LifecycleError::ExitedImmediately {
                path: path.to_path_buf(),
                status,
            }),
            None => Ok(child),
        }
    }

    async fn prompt_and_launch(&mut self) -> bool {
        let attempts = self.prompt_attempts;
        for attempt in 1..=attempts {
            println!();
            println!("Enter the full path to Anyi.exe:");
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    log::error!("❌ No input available for the executable path");
                    return false;
                }
                Ok(_) => {
                    let path = line.trim();
                    if !validate_exe_path(path) {
                        println!("Invalid path: enter the full path of an existing Anyi.exe");
                    } else if self.start_and_remember(path).await {
                        return true;
                    }
                }
                Err(e) => log::error!("❌ Failed to read executable path: {}", e),
            }
            if attempt < attempts {
                println!("{} attempt(s) remaining", attempts - attempt);
            }
        }
        log::error!("❌ Could not start Anyi.exe after {} attempts", attempts);
        false
    }
}

impl<R: BufRead> AppLauncher for ExeLauncher<R> {
    async fn launch(&mut self) -> bool {
        let saved = self.settings.anyi_path().to_string();
        if validate_exe_path(&saved) {
            self.start(&saved).await
        } else {
            if !saved.is_empty() {
                log::warn!("⚠️ Saved path is no longer valid: {}", saved);
            }
            self.prompt_and_launch().await
        }
    }
}
