// Input primitives built on top of the locator: clicking, text entry, email generation
use super::config::AutomationConfig;
use super::error::{AutomationError, AutomationResult};
use super::locator::Locator;
use crate::desktop::{DesktopClient, Modifier};
use crate::template_matching::{Match, SearchRegion};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::time::Duration;
use tokio::time::sleep;

pub const EMAIL_LOCAL_LEN: usize = 6;
pub const EMAIL_DOMAIN: &str = "163.com";

/// Click point for `target`: each axis shifted by an independent uniform offset in `-max..=max`
pub fn offset_point<R: Rng + ?Sized>(rng: &mut R, target: &Match, max_offset: i32) -> (i32, i32) {
    let max = max_offset.abs();
    let dx = rng.gen_range(-max..=max);
    let dy = rng.gen_range(-max..=max);
    (target.x as i32 + dx, target.y as i32 + dy)
}

/// Six alphanumeric characters at the fixed mail domain
pub fn random_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let local: String = (0..EMAIL_LOCAL_LEN)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect();
    format!("{local}@{EMAIL_DOMAIN}")
}

pub struct Actuator<D: DesktopClient> {
    locator: Locator<D>,
}

impl<D: DesktopClient> Actuator<D> {
    pub fn new(locator: Locator<D>) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &Locator<D> {
        &self.locator
    }

    pub fn locator_mut(&mut self) -> &mut Locator<D> {
        &mut self.locator
    }

    pub fn config(&self) -> &AutomationConfig {
        self.locator.config()
    }

    /// Locate `name` and click near its centre, retrying the whole locate-and-click
    /// up to `retry_count` times with a stabilization delay between attempts.
    pub async fn click_image_with_offset(
        &mut self,
        name: &str,
        timeout: Option<Duration>,
        region: Option<SearchRegion>,
    ) -> bool {
        let attempts = self.config().retry_count.max(1);
        for attempt in 0..attempts {
            if attempt > 0 {
                log::warn!("🔁 Retrying click on {} ({}/{})", name, attempt + 1, attempts);
                sleep(self.config().click_retry_delay).await;
            }

            let Some(found) = self.locator.locate(name, timeout, region).await else {
                continue;
            };
            match self.locator.click_with_offset(&found).await {
                Ok((x, y)) => {
                    log::info!("🖱️ Clicked {} at ({}, {})", name, x, y);
                    return true;
                }
                Err(e) => log::error!("❌ Failed to click {}: {}", name, e),
            }
        }

        log::error!("❌ Unable to click {} after {} attempts", name, attempts);
        false
    }

    /// Press the input-method toggle twice so the next text lands as Latin characters
    pub async fn ensure_english_input(&mut self) -> bool {
        match self.toggle_input_method().await {
            Ok(()) => {
                log::debug!("🔤 Input method toggled");
                true
            }
            Err(e) => {
                log::warn!("⚠️ Could not toggle input method: {}", e);
                false
            }
        }
    }

    /// Enter `text` through the clipboard, falling back to per-character typing.
    /// Returns false only when both paths fail.
    pub async fn type_text_safely(&mut self, text: &str) -> bool {
        self.ensure_english_input().await;

        let paste_error = match self.paste_text(text).await {
            Ok(()) => {
                log::info!("⌨️ Pasted text: {}", text);
                return true;
            }
            Err(e) => e,
        };

        log::warn!("⚠️ Paste failed ({}), typing characters instead", paste_error);
        match self.type_characters(text).await {
            Ok(()) => {
                log::info!("⌨️ Typed text: {}", text);
                true
            }
            Err(e) => {
                log::error!("❌ Text entry failed: {}", e);
                false
            }
        }
    }

    pub fn generate_random_email(&mut self) -> String {
        let email = random_email(self.locator.rng_mut());
        log::info!("📧 Generated email: {}", email);
        email
    }

    /// Delay to wait after a sequence step
    pub fn step_delay(&mut self) -> Duration {
        let jitter = self.config().step_jitter;
        jitter.sample(self.locator.rng_mut())
    }

    async fn toggle_input_method(&mut self) -> AutomationResult<()> {
        let delay = self.config().ime_toggle_delay;
        let desktop = self.locator.desktop_mut();
        desktop
            .tap_modifier(Modifier::Shift)
            .await
            .map_err(|e| AutomationError::action("Input method toggle", e))?;
        sleep(delay).await;
        desktop
            .tap_modifier(Modifier::Shift)
            .await
            .map_err(|e| AutomationError::action("Input method toggle", e))
    }

    async fn paste_text(&mut self, text: &str) -> AutomationResult<()> {
        let settle = self.config().clipboard_settle;
        let desktop = self.locator.desktop_mut();
        desktop
            .set_clipboard(text)
            .await
            .map_err(|e| AutomationError::action("Clipboard write", e))?;
        sleep(settle).await;
        desktop
            .hotkey(Modifier::paste(), 'v')
            .await
            .map_err(|e| AutomationError::action("Paste hotkey", e))
    }

    async fn type_characters(&mut self, text: &str) -> AutomationResult<()> {
        let interval = self.config().type_interval;
        let desktop = self.locator.desktop_mut();
        for (i, c) in text.chars().enumerate() {
            if i > 0 {
                sleep(interval).await;
            }
            desktop
                .type_char(c)
                .await
                .map_err(|e| AutomationError::action(format!("Typing '{c}'"), e))?;
        }
        Ok(())
    }
}
