// Scripted in-memory desktop used by the automation tests
use super::error::{DesktopError, DesktopResult};
use super::types::{DesktopClient, Modifier};
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Deterministic noise pattern: distinct seeds give uncorrelated templates
pub fn noise_template(seed: u64, width: u32, height: u32) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(width, height, |_, _| Luma([rng.gen_range(0..=255)]))
}

/// Blocky pattern that survives downscaling (each random value fills a `block` square)
pub fn block_template(seed: u64, width: u32, height: u32, block: u32) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let cols = width.div_ceil(block);
    let rows = height.div_ceil(block);
    let values: Vec<u8> = (0..cols * rows).map(|_| rng.gen_range(0..=255)).collect();
    GrayImage::from_fn(width, height, |x, y| {
        Luma([values[((y / block) * cols + x / block) as usize]])
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Always,
    /// Visible from the n-th capture onwards (0-based)
    FromCapture(u64),
    /// Visible until a click lands inside it
    UntilClicked,
    Never,
}

#[derive(Debug, Clone)]
pub struct Placement {
    pub label: String,
    pub image: GrayImage,
    pub left: u32,
    pub top: u32,
    pub visibility: Visibility,
    pub dismissed: bool,
}

impl Placement {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left as i32
            && y >= self.top as i32
            && x < (self.left + self.image.width()) as i32
            && y < (self.top + self.image.height()) as i32
    }

    fn visible_at(&self, capture_index: u64) -> bool {
        match self.visibility {
            Visibility::Always => true,
            Visibility::FromCapture(n) => capture_index >= n,
            Visibility::UntilClicked => !self.dismissed,
            Visibility::Never => false,
        }
    }
}

/// Everything the automation did to the desktop, in order
#[derive(Debug, Clone, PartialEq)]
pub enum DesktopEvent {
    Click { x: i32, y: i32 },
    Modifier(Modifier),
    Hotkey(Modifier, char),
    Typed(char),
    Clipboard(String),
}

pub struct SyntheticDesktop {
    width: u32,
    height: u32,
    background: u8,
    placements: Vec<Placement>,
    captures: u64,
    pub events: Vec<DesktopEvent>,
    pub clipboard: Option<String>,
    pub fail_clicks: usize,
    pub fail_clipboard: bool,
    pub fail_typing: bool,
}

impl SyntheticDesktop {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: 128,
            placements: Vec::new(),
            captures: 0,
            events: Vec::new(),
            clipboard: None,
            fail_clicks: 0,
            fail_clipboard: false,
            fail_typing: false,
        }
    }

    pub fn place(
        &mut self,
        label: &str,
        image: GrayImage,
        left: u32,
        top: u32,
        visibility: Visibility,
    ) {
        self.placements.push(Placement {
            label: label.to_string(),
            image,
            left,
            top,
            visibility,
            dismissed: false,
        });
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }

    pub fn clicks(&self) -> Vec<(i32, i32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DesktopEvent::Click { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Labels of the visible placements each click landed on
    pub fn clicked_labels(&self) -> Vec<String> {
        self.clicks()
            .into_iter()
            .filter_map(|(x, y)| {
                self.placements
                    .iter()
                    .find(|p| p.visibility != Visibility::Never && p.contains(x, y))
                    .map(|p| p.label.clone())
            })
            .collect()
    }

    fn render(&self) -> GrayImage {
        let mut canvas = GrayImage::from_pixel(self.width, self.height, Luma([self.background]));
        for placement in self
            .placements
            .iter()
            .filter(|p| p.visible_at(self.captures))
        {
            image::imageops::replace(
                &mut canvas,
                &placement.image,
                placement.left as i64,
                placement.top as i64,
            );
        }
        canvas
    }
}

impl DesktopClient for SyntheticDesktop {
    async fn capture_frame(&mut self) -> DesktopResult<GrayImage> {
        let frame = self.render();
        self.captures += 1;
        Ok(frame)
    }

    async fn click(&mut self, x: i32, y: i32) -> DesktopResult<()> {
        if self.fail_clicks > 0 {
            self.fail_clicks -= 1;
            return Err(DesktopError::input("click", "synthetic failure"));
        }
        self.events.push(DesktopEvent::Click { x, y });
        for placement in self.placements.iter_mut() {
            if placement.visibility == Visibility::UntilClicked && placement.contains(x, y) {
                placement.dismissed = true;
            }
        }
        Ok(())
    }

    async fn tap_modifier(&mut self, modifier: Modifier) -> DesktopResult<()> {
        self.events.push(DesktopEvent::Modifier(modifier));
        Ok(())
    }

    async fn hotkey(&mut self, modifier: Modifier, key: char) -> DesktopResult<()> {
        self.events.push(DesktopEvent::Hotkey(modifier, key));
        Ok(())
    }

    async fn type_char(&mut self, c: char) -> DesktopResult<()> {
        if self.fail_typing {
            return Err(DesktopError::input("type", "synthetic failure"));
        }
        self.events.push(DesktopEvent::Typed(c));
        Ok(())
    }

    async fn set_clipboard(&mut self, text: &str) -> DesktopResult<()> {
        if self.fail_clipboard {
            return Err(DesktopError::input("clipboard", "synthetic failure"));
        }
        self.events.push(DesktopEvent::Clipboard(text.to_string()));
        self.clipboard = Some(text.to_string());
        Ok(())
    }

    fn screen_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn backend_name(&self) -> &str {
        "synthetic"
    }
}
