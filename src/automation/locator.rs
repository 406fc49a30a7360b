// Poll-until-found template locator with opportunistic interrupt dismissal
use super::actuator::offset_point;
use super::config::AutomationConfig;
use super::error::{AutomationError, AutomationResult};
use crate::desktop::DesktopClient;
use crate::template_matching::{Match, SearchRegion, Template, TemplateMatcher, TemplateStore};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};

pub struct Locator<D: DesktopClient> {
    desktop: D,
    templates: TemplateStore,
    matcher: TemplateMatcher,
    config: AutomationConfig,
    rng: StdRng,
}

impl<D: DesktopClient> Locator<D> {
    pub fn new(desktop: D, config: AutomationConfig) -> Self {
        Self::with_rng(desktop, config, StdRng::from_entropy())
    }

    /// Build with an explicit random source (seeded in tests)
    pub fn with_rng(desktop: D, config: AutomationConfig, rng: StdRng) -> Self {
        let matcher = TemplateMatcher::new(config.confidence_threshold)
            .with_coarse_factor(config.coarse_factor);
        Self {
            desktop,
            templates: TemplateStore::new(config.templates_dir.clone()),
            matcher,
            config,
            rng,
        }
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn desktop_mut(&mut self) -> &mut D {
        &mut self.desktop
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub(crate) fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Poll the screen until `name` appears or `timeout` (default `max_wait`) elapses.
    ///
    /// Each cycle runs up to `retry_count` single-shot matches, then checks for the
    /// interrupt popup and clicks it away if present. A missing template file yields
    /// `None` immediately. On a miss the call returns within one poll interval of the
    /// timeout.
    pub async fn locate(
        &mut self,
        name: &str,
        timeout: Option<Duration>,
        region: Option<SearchRegion>,
    ) -> Option<Match> {
        let timeout = timeout.unwrap_or(self.config.max_wait);
        let template = match self.templates.load(name) {
            Ok(template) => template,
            Err(e) => {
                log::error!("❌ {}", AutomationError::from(e));
                return None;
            }
        };
        let interrupt = self.interrupt_for(name);

        log::debug!("⏳ Waiting up to {:?} for {}", timeout, name);
        let deadline = deadline_after(timeout);
        let mut cycle = 0u32;
        while Instant::now() < deadline {
            cycle += 1;
            if let Some(found) = self.poll_cycle(&template, region.as_ref(), deadline).await {
                log::info!("🎯 Found {} (cycle {})", found.describe(name), cycle);
                return Some(found);
            }

            if let Some(interrupt) = &interrupt {
                self.dismiss_interrupt(interrupt).await;
            }

            sleep_within(self.config.poll_interval, deadline).await;
        }

        log::warn!(
            "⌛ {}",
            AutomationError::NotFound {
                template: name.to_string(),
                timeout,
            }
        );
        None
    }

    /// Click `target` after applying the random offset rule
    pub(crate) async fn click_with_offset(&mut self, target: &Match) -> AutomationResult<(i32, i32)> {
        let (x, y) = offset_point(&mut self.rng, target, self.config.click_offset_px);
        self.desktop
            .click(x, y)
            .await
            .map_err(|e| AutomationError::action(format!("Click at ({x}, {y})"), e))?;
        Ok((x, y))
    }

    // The interrupt template is never checked while waiting for itself; a missing file disables the check
    fn interrupt_for(&mut self, name: &str) -> Option<Arc<Template>> {
        if name == self.config.interrupt_template {
            return None;
        }
        match self.templates.load(&self.config.interrupt_template) {
            Ok(template) => Some(template),
            Err(e) => {
                log::debug!("Interrupt check disabled: {}", e);
                None
            }
        }
    }

    async fn poll_cycle(
        &mut self,
        template: &Template,
        region: Option<&SearchRegion>,
        deadline: Instant,
    ) -> Option<Match> {
        let attempts = self.config.retry_count.max(1);
        for attempt in 0..attempts {
            if attempt > 0 {
                sleep_within(self.config.retry_settle_delay, deadline).await;
                if Instant::now() >= deadline {
                    break;
                }
            }

            match self.desktop.screen_capture().await {
                Ok(capture) => {
                    log::debug!(
                        "📸 Capture {}x{} in {}ms (attempt {}/{})",
                        capture.image.width(),
                        capture.image.height(),
                        capture.duration_ms,
                        attempt + 1,
                        attempts
                    );
                    if let Some(found) = self.matcher.find(&capture.image, template, region) {
                        return Some(found);
                    }
                }
                Err(e) => {
                    if attempt + 1 == attempts {
                        log::error!("❌ Screen capture failed: {}", e);
                    } else {
                        log::warn!("⚠️ Screen capture failed, retrying: {}", e);
                    }
                }
            }
        }
        None
    }

    async fn dismiss_interrupt(&mut self, interrupt: &Template) {
        let capture = match self.desktop.screen_capture().await {
            Ok(capture) => capture,
            Err(e) => {
                log::debug!("Interrupt check skipped: {}", e);
                return;
            }
        };
        let Some(popup) = self.matcher.find(&capture.image, interrupt, None) else {
            return;
        };

        log::info!("🪟 Interrupt detected: {}", popup.describe(&interrupt.name));
        match self.click_with_offset(&popup).await {
            Ok((x, y)) => log::info!("✅ Dismissed {} at ({}, {})", interrupt.name, x, y),
            Err(e) => log::warn!("⚠️ Could not dismiss {}: {}", interrupt.name, e),
        }
    }
}

/// Far-off instant used when a timeout is too large to add to the clock
const UNBOUNDED_WAIT: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Deadline `timeout` from now; timeouts past what the clock can represent never expire in practice
pub(crate) fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(UNBOUNDED_WAIT))
        .unwrap_or(now)
}

// Sleep for `duration`, cut short at `deadline`
async fn sleep_within(duration: Duration, deadline: Instant) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    sleep(duration.min(remaining)).await;
}
