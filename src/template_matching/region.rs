//! Search region management for targeted image matching

/// Rectangle (left, top, width, height) in screenshot coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchRegion {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl SearchRegion {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a full-screen region
    pub fn full_screen(screen_width: u32, screen_height: u32) -> Self {
        Self::new(0, 0, screen_width, screen_height)
    }

    /// Parse a region from "left,top,width,height"
    pub fn parse(value: &str) -> Option<Self> {
        let parts: Vec<&str> = value.split(',').collect();
        if parts.len() == 4
            && let (Ok(left), Ok(top), Ok(width), Ok(height)) = (
                parts[0].trim().parse::<u32>(),
                parts[1].trim().parse::<u32>(),
                parts[2].trim().parse::<u32>(),
                parts[3].trim().parse::<u32>(),
            )
        {
            return Some(Self::new(left, top, width, height));
        }
        None
    }

    /// Clip region to screen boundaries
    pub fn clip_to_screen(&self, screen_width: u32, screen_height: u32) -> SearchRegion {
        let mut region = *self;
        region.left = region.left.min(screen_width.saturating_sub(1));
        region.top = region.top.min(screen_height.saturating_sub(1));

        region.width = region.width.min(screen_width.saturating_sub(region.left));
        region.height = region.height.min(screen_height.saturating_sub(region.top));

        region
    }

    /// Check if this region contains a point
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.left
            && x - self.left < self.width
            && y >= self.top
            && y - self.top < self.height
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl From<(u32, u32, u32, u32)> for SearchRegion {
    fn from((left, top, width, height): (u32, u32, u32, u32)) -> Self {
        Self::new(left, top, width, height)
    }
}

impl std::fmt::Display for SearchRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.left, self.top, self.width, self.height
        )
    }
}
