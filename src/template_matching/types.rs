//! Template matching data types
use image::GrayImage;
use std::path::PathBuf;

/// A reference image loaded from the template store
#[derive(Clone, Debug)]
pub struct Template {
    /// File name used to request it, e.g. "3.png"
    pub name: String,
    pub path: PathBuf,
    /// Grayscale pixels used for matching
    pub image: GrayImage,
}

impl Template {
    pub fn new(name: impl Into<String>, path: PathBuf, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            path,
            image,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get the centre coordinates for this template at a top-left match location
    pub fn center_at(&self, left: u32, top: u32) -> (u32, u32) {
        (left + self.width() / 2, top + self.height() / 2)
    }
}

/// Best placement of a template inside a screenshot, before thresholding
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredPlacement {
    /// Top-left X in screenshot coordinates
    pub left: u32,
    /// Top-left Y in screenshot coordinates
    pub top: u32,
    /// Correlation score (-1.0..=1.0)
    pub score: f32,
}

/// A located template: screen-space centre plus the threshold that accepted it.
/// Only ever produced from the screenshot of the current poll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    pub x: u32,
    pub y: u32,
    pub score: f32,
    pub threshold: f32,
}

impl Match {
    /// Format match with its score percentage
    pub fn describe(&self, template_name: &str) -> String {
        let score_pct = (self.score * 100.0) as u32;
        format!(
            "{} at ({},{}) - {}%",
            template_name, self.x, self.y, score_pct
        )
    }
}
