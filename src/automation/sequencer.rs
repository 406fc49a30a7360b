// Runs the fixed business script, aborting on the first failed step
use super::actuator::Actuator;
use super::error::{AutomationError, AutomationResult};
use super::types::{SIGNUP_SCRIPT, SequenceOutcome, SequenceState, Step};
use crate::desktop::DesktopClient;
use tokio::time::sleep;

pub struct Sequencer<D: DesktopClient> {
    actuator: Actuator<D>,
    script: Vec<Step>,
    state: SequenceState,
}

impl<D: DesktopClient> Sequencer<D> {
    pub fn new(actuator: Actuator<D>) -> Self {
        Self::with_script(actuator, SIGNUP_SCRIPT.to_vec())
    }

    pub fn with_script(actuator: Actuator<D>, script: Vec<Step>) -> Self {
        Self {
            actuator,
            script,
            state: SequenceState::Idle,
        }
    }

    pub fn state(&self) -> &SequenceState {
        &self.state
    }

    pub fn script(&self) -> &[Step] {
        &self.script
    }

    pub fn actuator(&self) -> &Actuator<D> {
        &self.actuator
    }

    pub fn actuator_mut(&mut self) -> &mut Actuator<D> {
        &mut self.actuator
    }

    /// Execute every step in order with a jittered pause after each success.
    /// The email is generated once per run and reused by every typing step.
    pub async fn run(&mut self) -> SequenceOutcome {
        log::info!("🚀 Starting automation sequence ({} steps)", self.script.len());
        let mut email: Option<String> = None;

        for index in 0..self.script.len() {
            let step = self.script[index];
            self.change_state(SequenceState::Running { step: index + 1 });

            if let Err(e) = self.execute(step, &mut email).await {
                log::error!("❌ {}", e);
                self.change_state(SequenceState::Aborted);
                return SequenceOutcome::Aborted;
            }

            let delay = self.actuator.step_delay();
            sleep(delay).await;
        }

        log::info!("✅ Automation sequence completed");
        self.change_state(SequenceState::Completed);
        SequenceOutcome::Completed { email }
    }

    /// True only if every step succeeded
    pub async fn run_sequence(&mut self) -> bool {
        self.run().await.is_completed()
    }

    async fn execute(&mut self, step: Step, email: &mut Option<String>) -> AutomationResult<()> {
        let succeeded = match step {
            Step::Click(name) => self.actuator.click_image_with_offset(name, None, None).await,
            Step::TypeEmail => {
                let text = email
                    .get_or_insert_with(|| self.actuator.generate_random_email())
                    .clone();
                self.actuator.type_text_safely(&text).await
            }
        };

        if succeeded {
            Ok(())
        } else {
            Err(AutomationError::SequenceAborted {
                step: step.to_string(),
                reason: "step did not succeed within its retries".to_string(),
            })
        }
    }

    fn change_state(&mut self, new_state: SequenceState) {
        if self.state != new_state {
            log::debug!("🔄 Sequence state: {:?} -> {:?}", self.state, new_state);
            self.state = new_state;
        }
    }
}
