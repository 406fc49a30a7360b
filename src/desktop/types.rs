// Core desktop types and traits
use super::error::DesktopResult;
use image::GrayImage;

#[derive(Debug, Clone)]
pub struct ScreenCapture {
    pub image: GrayImage,
    pub duration_ms: u128,
}

/// Modifier keys the automation needs: input-method toggling and paste hotkeys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Shift,
    Control,
    Meta,
}

impl Modifier {
    /// The modifier that triggers clipboard paste on this platform
    pub fn paste() -> Self {
        if cfg!(target_os = "macos") {
            Modifier::Meta
        } else {
            Modifier::Control
        }
    }
}

// Trait defining desktop capabilities (native backend or test doubles).
// Coordinates are in screenshot space: (0, 0) is the top-left pixel of the captured screen.
#[allow(async_fn_in_trait)]
pub trait DesktopClient {
    // Raw backend-specific capture (implemented per backend)
    async fn capture_frame(&mut self) -> DesktopResult<GrayImage>;

    // Default high-level capture with timing
    async fn screen_capture(&mut self) -> DesktopResult<ScreenCapture> {
        let start = std::time::Instant::now();
        let image = self.capture_frame().await?;
        Ok(ScreenCapture {
            image,
            duration_ms: start.elapsed().as_millis(),
        })
    }

    async fn click(&mut self, x: i32, y: i32) -> DesktopResult<()>;
    /// Press and release a lone modifier key
    async fn tap_modifier(&mut self, modifier: Modifier) -> DesktopResult<()>;
    /// Hold `modifier`, tap the key for `key`, release
    async fn hotkey(&mut self, modifier: Modifier, key: char) -> DesktopResult<()>;
    async fn type_char(&mut self, c: char) -> DesktopResult<()>;
    async fn set_clipboard(&mut self, text: &str) -> DesktopResult<()>;
    fn screen_dimensions(&self) -> (u32, u32);
    fn backend_name(&self) -> &str;
}
