// Types and enums for the automation sequence
use std::fmt;

/// One entry of the fixed business script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Locate the template and click it with a random offset
    Click(&'static str),
    /// Type the run's email address (generated on first use)
    TypeEmail,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Click(name) => write!(f, "click {name}"),
            Step::TypeEmail => write!(f, "type email"),
        }
    }
}

/// Registration email-entry flow
pub const SIGNUP_SCRIPT: [Step; 9] = [
    Step::Click("1.png"),
    Step::Click("2.png"),
    Step::Click("3.png"),
    Step::TypeEmail,
    Step::Click("4.png"),
    Step::TypeEmail,
    Step::Click("5.png"),
    Step::Click("1.png"),
    Step::Click("6.png"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    /// 1-based index of the step being executed
    Running { step: usize },
    Completed,
    Aborted,
}

/// Terminal result of one sequence run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceOutcome {
    /// Every step succeeded; carries the email typed during the run
    Completed { email: Option<String> },
    /// A step failed; which one is only reported in the logs
    Aborted,
}

impl SequenceOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SequenceOutcome::Completed { .. })
    }
}
