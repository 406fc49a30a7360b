// Native desktop backend: xcap for capture, rdev for synthetic input, arboard for the clipboard
use super::error::{DesktopError, DesktopResult};
use super::keymap::{KeyPlan, key_for_char};
use super::types::{DesktopClient, Modifier};
use image::{DynamicImage, GrayImage};
use rdev::{Button, EventType, Key};
use std::time::Duration;
use tokio::time::sleep;

/// Delay between consecutive synthetic events so the OS registers each one
const EVENT_DELAY: Duration = Duration::from_millis(20);

pub struct NativeDesktop {
    monitor: xcap::Monitor,
    origin_x: i32,
    origin_y: i32,
    screen_width: u32,
    screen_height: u32,
    // Kept alive for the backend's lifetime: on X11 the clipboard owner must outlive the paste
    clipboard: Option<arboard::Clipboard>,
}

impl NativeDesktop {
    /// Attach to the primary monitor (or the first one reported)
    pub fn new() -> DesktopResult<Self> {
        let monitors = xcap::Monitor::all()?;
        let mut primary = None;
        let mut first = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                primary = Some(monitor);
                break;
            }
            if first.is_none() {
                first = Some(monitor);
            }
        }
        let monitor = primary.or(first).ok_or(DesktopError::NoMonitor)?;

        let origin_x = monitor.x()?;
        let origin_y = monitor.y()?;
        let screen_width = monitor.width()?;
        let screen_height = monitor.height()?;
        log::info!(
            "🖥️ Using monitor '{}' at ({}, {}) size {}x{}",
            monitor.name().unwrap_or_default(),
            origin_x,
            origin_y,
            screen_width,
            screen_height
        );

        Ok(Self {
            monitor,
            origin_x,
            origin_y,
            screen_width,
            screen_height,
            clipboard: None,
        })
    }

    async fn send(&self, action: &str, event: EventType) -> DesktopResult<()> {
        rdev::simulate(&event).map_err(|e| DesktopError::input(action, e))?;
        sleep(EVENT_DELAY).await;
        Ok(())
    }

    async fn tap_key(&self, action: &str, key: Key) -> DesktopResult<()> {
        self.send(action, EventType::KeyPress(key)).await?;
        self.send(action, EventType::KeyRelease(key)).await
    }

    async fn type_plan(&self, plan: KeyPlan) -> DesktopResult<()> {
        if plan.shift {
            self.send("type", EventType::KeyPress(Key::ShiftLeft)).await?;
        }
        let typed = self.tap_key("type", plan.key).await;
        if plan.shift {
            // Release shift even when the key itself failed
            self.send("type", EventType::KeyRelease(Key::ShiftLeft))
                .await?;
        }
        typed
    }
}

fn modifier_key(modifier: Modifier) -> Key {
    match modifier {
        Modifier::Shift => Key::ShiftLeft,
        Modifier::Control => Key::ControlLeft,
        Modifier::Meta => Key::MetaLeft,
    }
}

impl DesktopClient for NativeDesktop {
    async fn capture_frame(&mut self) -> DesktopResult<GrayImage> {
        let rgba = self.monitor.capture_image()?;
        Ok(DynamicImage::ImageRgba8(rgba).to_luma8())
    }

    async fn click(&mut self, x: i32, y: i32) -> DesktopResult<()> {
        if x < 0 || y < 0 || x >= self.screen_width as i32 || y >= self.screen_height as i32 {
            return Err(DesktopError::ClickOutOfBounds { x, y });
        }
        let screen_x = (self.origin_x + x) as f64;
        let screen_y = (self.origin_y + y) as f64;
        self.send(
            "click",
            EventType::MouseMove {
                x: screen_x,
                y: screen_y,
            },
        )
        .await?;
        self.send("click", EventType::ButtonPress(Button::Left))
            .await?;
        self.send("click", EventType::ButtonRelease(Button::Left))
            .await
    }

    async fn tap_modifier(&mut self, modifier: Modifier) -> DesktopResult<()> {
        self.tap_key("modifier", modifier_key(modifier)).await
    }

    async fn hotkey(&mut self, modifier: Modifier, key: char) -> DesktopResult<()> {
        let plan = key_for_char(key).ok_or(DesktopError::UnmappedCharacter(key))?;
        let held = modifier_key(modifier);
        self.send("hotkey", EventType::KeyPress(held)).await?;
        let pressed = self.tap_key("hotkey", plan.key).await;
        self.send("hotkey", EventType::KeyRelease(held)).await?;
        pressed
    }

    async fn type_char(&mut self, c: char) -> DesktopResult<()> {
        let plan = key_for_char(c).ok_or(DesktopError::UnmappedCharacter(c))?;
        self.type_plan(plan).await
    }

    async fn set_clipboard(&mut self, text: &str) -> DesktopResult<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set_text(text.to_string())?;
        }
        Ok(())
    }

    fn screen_dimensions(&self) -> (u32, u32) {
        (self.screen_width, self.screen_height)
    }

    fn backend_name(&self) -> &str {
        "native"
    }
}
