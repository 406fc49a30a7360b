//! Configuration for the locate/click engine

use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

/// Bounded-uniform random delay; `zero()` makes timing deterministic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterBounds {
    pub min: Duration,
    pub max: Duration,
}

impl JitterBounds {
    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn zero() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Draw a delay uniformly from `min..=max`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max <= self.min {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }
}

/// Process-wide automation constants, fixed at construction
#[derive(Debug, Clone)]
pub struct AutomationConfig {
    /// Minimum correlation score accepted as a match (0.0 to 1.0)
    pub confidence_threshold: f32,
    /// Sleep between poll cycles
    pub poll_interval: Duration,
    /// Default per-call locate timeout
    pub max_wait: Duration,
    /// Single-shot matches per poll cycle, and outer click attempts
    pub retry_count: u32,
    /// Settle delay before each match retry after the first
    pub retry_settle_delay: Duration,
    /// Stabilization delay before each click attempt after the first
    pub click_retry_delay: Duration,
    /// Maximum pixel offset applied to each axis of a click
    pub click_offset_px: i32,
    /// Delay after every sequence step
    pub step_jitter: JitterBounds,
    /// Pause between writing the clipboard and sending the paste hotkey
    pub clipboard_settle: Duration,
    /// Pause between the two input-method toggle presses
    pub ime_toggle_delay: Duration,
    /// Pause between characters on the typed-input fallback
    pub type_interval: Duration,
    /// Template of the unsolicited popup checked on every poll
    pub interrupt_template: String,
    /// Root directory of the template images
    pub templates_dir: PathBuf,
    /// Downscale factor for the coarse matching pass (1 disables it)
    pub coarse_factor: u32,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            poll_interval: Duration::from_millis(500),
            max_wait: Duration::from_secs(30),
            retry_count: 3,
            retry_settle_delay: Duration::from_millis(500),
            click_retry_delay: Duration::from_secs(1),
            click_offset_px: 5,
            step_jitter: JitterBounds::new(Duration::from_millis(300), Duration::from_millis(600)),
            clipboard_settle: Duration::from_millis(200),
            ime_toggle_delay: Duration::from_millis(200),
            type_interval: Duration::from_millis(100),
            interrupt_template: "7.png".to_string(),
            templates_dir: PathBuf::from("images"),
            coarse_factor: 4,
        }
    }
}

impl AutomationConfig {
    /// Default timings without random step delays
    pub fn deterministic() -> Self {
        Self {
            step_jitter: JitterBounds::zero(),
            ..Self::default()
        }
    }

    pub fn with_templates_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.templates_dir = dir.into();
        self
    }
}
