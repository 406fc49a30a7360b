// Process discovery and termination via sysinfo
use super::types::ProcessControl;
use sysinfo::{Pid, ProcessesToUpdate, Signal, System};

/// Case-insensitive substring match on the process name
pub fn name_matches(process_name: &str, wanted: &str) -> bool {
    process_name
        .to_lowercase()
        .contains(&wanted.to_lowercase())
}

pub struct SystemProcesses {
    system: System,
}

impl Default for SystemProcesses {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProcesses {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    fn matching(&mut self, wanted: &str) -> Vec<(Pid, String)> {
        self.system.refresh_processes(ProcessesToUpdate::All, true);
        self.system
            .processes()
            .iter()
            .filter_map(|(pid, process)| {
                let name = process.name().to_string_lossy().into_owned();
                name_matches(&name, wanted).then_some((*pid, name))
            })
            .collect()
    }
}

impl ProcessControl for SystemProcesses {
    fn is_running(&mut self, name: &str) -> bool {
        !self.matching(name).is_empty()
    }

    fn terminate(&mut self, name: &str) -> bool {
        let targets = self.matching(name);
        let mut terminated = false;
        for (pid, process_name) in targets {
            let Some(process) = self.system.process(pid) else {
                continue;
            };
            match process.kill_with(Signal::Term) {
                Some(true) => {
                    log::info!("🛑 Terminated {} (pid {})", process_name, pid);
                    terminated = true;
                }
                // Graceful signal refused or unsupported on this platform
                _ => {
                    if process.kill() {
                        log::info!("🛑 Force-killed {} (pid {})", process_name, pid);
                        terminated = true;
                    } else {
                        log::error!("❌ Could not terminate {} (pid {})", process_name, pid);
                    }
                }
            }
        }
        terminated
    }
}
