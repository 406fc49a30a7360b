// Top-level run: reset the application, launch it, and drive the sequence with restarts
use super::types::{AppLauncher, ConfigCleanup, ProcessControl, RunOutcome};
use crate::automation::{AutomationError, AutomationResult, Sequencer, deadline_after};
use crate::desktop::DesktopClient;
use std::time::Duration;
use tokio::time::{Instant, sleep};

pub const TARGET_PROCESSES: [&str; 2] = ["Anyi.exe", "anyi-core.exe"];

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub target_processes: Vec<String>,
    /// Template whose appearance signals the application window is up
    pub window_template: String,
    pub window_wait: Duration,
    pub window_probe: Duration,
    pub window_probe_interval: Duration,
    pub max_attempts: u32,
    pub restart_delay: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            target_processes: TARGET_PROCESSES.iter().map(|s| s.to_string()).collect(),
            window_template: "1.png".to_string(),
            window_wait: Duration::from_secs(30),
            window_probe: Duration::from_secs(1),
            window_probe_interval: Duration::from_millis(300),
            max_attempts: 3,
            restart_delay: Duration::from_secs(1),
        }
    }
}

pub struct Orchestrator<D, P, C, L>
where
    D: DesktopClient,
    P: ProcessControl,
    C: ConfigCleanup,
    L: AppLauncher,
{
    sequencer: Sequencer<D>,
    processes: P,
    cleanup: C,
    launcher: L,
    config: OrchestratorConfig,
}

impl<D, P, C, L> Orchestrator<D, P, C, L>
where
    D: DesktopClient,
    P: ProcessControl,
    C: ConfigCleanup,
    L: AppLauncher,
{
    pub fn new(sequencer: Sequencer<D>, processes: P, cleanup: C, launcher: L) -> Self {
        Self::with_config(sequencer, processes, cleanup, launcher, OrchestratorConfig::default())
    }

    pub fn with_config(
        sequencer: Sequencer<D>,
        processes: P,
        cleanup: C,
        launcher: L,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            sequencer,
            processes,
            cleanup,
            launcher,
            config,
        }
    }

    pub fn sequencer(&self) -> &Sequencer<D> {
        &self.sequencer
    }

    pub fn processes(&self) -> &P {
        &self.processes
    }

    pub fn cleanup(&self) -> &C {
        &self.cleanup
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub async fn run(&mut self) -> RunOutcome {
        log::info!("🚀 Starting Anyi automation run");
        let outcome = self.run_attempts().await;
        log::info!("🏁 Anyi automation run finished: {:?}", outcome);
        outcome
    }

    async fn run_attempts(&mut self) -> RunOutcome {
        self.stop_targets();

        if !self.cleanup.delete_config_folder() {
            log::warn!("⚠️ Config folder could not be removed, continuing");
        }

        if let Err(e) = self.launch().await {
            log::error!("❌ {}", e);
            return RunOutcome::LaunchFailed;
        }

        let max_attempts = self.config.max_attempts;
        for attempt in 1..=max_attempts {
            let error = match self.attempt().await {
                Ok(()) => {
                    log::info!("✅ Automation completed on attempt {}", attempt);
                    return RunOutcome::Completed;
                }
                Err(e) => e,
            };

            if attempt == max_attempts {
                log::error!("❌ Giving up after {} attempts: {}", max_attempts, error);
                break;
            }

            log::warn!(
                "⚠️ Attempt {}/{} failed: {}; restarting application",
                attempt,
                max_attempts,
                error
            );
            self.stop_targets();
            sleep(self.config.restart_delay).await;
            if let Err(e) = self.launch().await {
                log::error!("❌ Restart failed: {}", e);
                return RunOutcome::LaunchFailed;
            }
        }
        RunOutcome::Exhausted
    }

    fn stop_targets(&mut self) {
        for name in &self.config.target_processes {
            if !self.processes.is_running(name) {
                log::info!("💤 {} is not running", name);
            } else if self.processes.terminate(name) {
                log::info!("🛑 Stopped {}", name);
            } else {
                log::warn!("⚠️ Could not stop {}", name);
            }
        }
    }

    async fn launch(&mut self) -> AutomationResult<()> {
        if self.launcher.launch().await {
            Ok(())
        } else {
            Err(AutomationError::ExternalProcessFailure {
                description: "Anyi.exe could not be started".to_string(),
            })
        }
    }

    async fn attempt(&mut self) -> AutomationResult<()> {
        self.wait_for_window().await?;
        if self.sequencer.run_sequence().await {
            Ok(())
        } else {
            Err(AutomationError::SequenceAborted {
                step: "automation sequence".to_string(),
                reason: "a step failed after its retries".to_string(),
            })
        }
    }

    async fn wait_for_window(&mut self) -> AutomationResult<()> {
        let template = self.config.window_template.clone();
        let probe = self.config.window_probe;
        log::info!("⏳ Waiting for the application window ({})", template);

        let deadline = deadline_after(self.config.window_wait);
        while Instant::now() < deadline {
            let locator = self.sequencer.actuator_mut().locator_mut();
            if locator.locate(&template, Some(probe), None).await.is_some() {
                log::info!("🪟 Application window detected");
                return Ok(());
            }
            sleep(self.config.window_probe_interval).await;
        }

        Err(AutomationError::NotFound {
            template,
            timeout: self.config.window_wait,
        })
    }
}
