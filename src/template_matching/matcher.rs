//! Template matching implementation
//!
//! Zero-mean normalized cross-correlation (the score OpenCV calls TM_CCOEFF_NORMED)
//! built on imageproc's raw cross-correlation plus summed-area tables,
//! with an optional coarse-to-fine pass for large screens.
use super::region::SearchRegion;
use super::types::{Match, ScoredPlacement, Template};
use image::GrayImage;
use image::imageops::{self, FilterType};
use imageproc::template_matching::{MatchTemplateMethod, match_template};

/// Coarse candidates kept for full-resolution refinement
const COARSE_CANDIDATES: usize = 5;
/// How far below the threshold a coarse score may fall and still be refined
const COARSE_MARGIN: f32 = 0.25;
/// Smallest downscaled template side worth a coarse pass
const COARSE_MIN_SIDE: u32 = 8;

/// Template matcher with a fixed confidence threshold
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    confidence_threshold: f32,
    coarse_factor: u32,
}

impl TemplateMatcher {
    /// Create a matcher that searches every placement at full resolution
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold: confidence_threshold.clamp(0.0, 1.0),
            coarse_factor: 1,
        }
    }

    /// Search a downscaled copy first and refine the best candidates.
    /// A factor of 1 disables the coarse pass.
    pub fn with_coarse_factor(mut self, factor: u32) -> Self {
        self.coarse_factor = factor.max(1);
        self
    }

    pub fn threshold(&self) -> f32 {
        self.confidence_threshold
    }

    /// Locate `template` in `screen`, returning its centre if the best score clears the threshold
    pub fn find(
        &self,
        screen: &GrayImage,
        template: &Template,
        region: Option<&SearchRegion>,
    ) -> Option<Match> {
        let best = self.best_placement(screen, template, region)?;
        log::debug!(
            "🔍 Best score for '{}': {:.3} at ({}, {}) (threshold {:.2})",
            template.name,
            best.score,
            best.left,
            best.top,
            self.confidence_threshold
        );
        if best.score < self.confidence_threshold {
            return None;
        }

        let (x, y) = template.center_at(best.left, best.top);
        Some(Match {
            x,
            y,
            score: best.score,
            threshold: self.confidence_threshold,
        })
    }

    /// Highest-scoring placement of `template` inside `region` (full screen when absent).
    ///
    /// Ties go to the first placement in row-major order: topmost, then leftmost.
    /// Returns `None` when the template cannot fit in the region or has no contrast.
    pub fn best_placement(
        &self,
        screen: &GrayImage,
        template: &Template,
        region: Option<&SearchRegion>,
    ) -> Option<ScoredPlacement> {
        let (screen_width, screen_height) = screen.dimensions();
        let search = region
            .map(|r| r.clip_to_screen(screen_width, screen_height))
            .unwrap_or_else(|| SearchRegion::full_screen(screen_width, screen_height));
        if !search.is_valid() {
            return None;
        }

        let (tw, th) = template.image.dimensions();
        if tw == 0 || th == 0 || tw > search.width || th > search.height {
            log::debug!(
                "⚠️ Template '{}' ({}x{}) does not fit search region {}",
                template.name,
                tw,
                th,
                search
            );
            return None;
        }

        let view =
            imageops::crop_imm(screen, search.left, search.top, search.width, search.height)
                .to_image();

        let local = if self.coarse_applicable(tw, th) {
            self.coarse_to_fine(&view, &template.image)
        } else {
            ScoreMap::compute(&view, &template.image).and_then(|map| map.best())
        }?;

        Some(ScoredPlacement {
            left: search.left + local.left,
            top: search.top + local.top,
            score: local.score,
        })
    }

    fn coarse_applicable(&self, width: u32, height: u32) -> bool {
        self.coarse_factor > 1
            && width / self.coarse_factor >= COARSE_MIN_SIDE
            && height / self.coarse_factor >= COARSE_MIN_SIDE
    }

    fn coarse_to_fine(&self, view: &GrayImage, template: &GrayImage) -> Option<ScoredPlacement> {
        let factor = self.coarse_factor;
        let small_view = imageops::resize(
            view,
            view.width() / factor,
            view.height() / factor,
            FilterType::Triangle,
        );
        let small_template = imageops::resize(
            template,
            template.width() / factor,
            template.height() / factor,
            FilterType::Triangle,
        );

        let exact = || ScoreMap::compute(view, template).and_then(|map| map.best());
        let Some(coarse) = ScoreMap::compute(&small_view, &small_template) else {
            // Downscaling flattened the template
            return exact();
        };

        let max_left = view.width() - template.width();
        let max_top = view.height() - template.height();
        let cutoff = self.confidence_threshold - COARSE_MARGIN;
        // One peak spreads over neighbouring coarse placements; keep only its strongest
        let radius = (small_template.width().min(small_template.height()) / 2).max(1);
        let candidates = coarse.top_separated(COARSE_CANDIDATES, radius);

        let mut best: Option<ScoredPlacement> = None;
        for candidate in candidates.iter().filter(|c| c.score >= cutoff) {
            let left = (candidate.left * factor).saturating_sub(factor).min(max_left);
            let top = (candidate.top * factor).saturating_sub(factor).min(max_top);
            let right = (candidate.left * factor + factor).min(max_left);
            let bottom = (candidate.top * factor + factor).min(max_top);

            let window = imageops::crop_imm(
                view,
                left,
                top,
                right - left + template.width(),
                bottom - top + template.height(),
            )
            .to_image();

            if let Some(refined) = ScoreMap::compute(&window, template).and_then(|m| m.best()) {
                let refined = ScoredPlacement {
                    left: left + refined.left,
                    top: top + refined.top,
                    score: refined.score,
                };
                if is_better(&refined, best.as_ref()) {
                    best = Some(refined);
                }
            }
        }

        match best {
            Some(best) if best.score >= self.confidence_threshold => Some(best),
            // Coarse candidates can all be look-alikes; confirm the miss at full resolution
            _ => {
                log::debug!("🔍 Coarse pass found no match, searching at full resolution");
                exact()
            }
        }
    }
}

fn is_better(candidate: &ScoredPlacement, current: Option<&ScoredPlacement>) -> bool {
    match current {
        None => true,
        Some(current) => {
            candidate.score > current.score
                || (candidate.score == current.score
                    && (candidate.top, candidate.left) < (current.top, current.left))
        }
    }
}

/// Correlation score for every placement of a template inside an image
struct ScoreMap {
    width: u32,
    scores: Vec<f32>,
}

impl ScoreMap {
    fn compute(image: &GrayImage, template: &GrayImage) -> Option<Self> {
        let (iw, ih) = image.dimensions();
        let (tw, th) = template.dimensions();
        if tw == 0 || th == 0 || tw > iw || th > ih {
            return None;
        }

        let n = tw as u128 * th as u128;
        let (t_sum, t_sq) = template.pixels().fold((0u128, 0u128), |(s, q), p| {
            let v = p[0] as u128;
            (s + v, q + v * v)
        });
        // n² times the template variance, exact in integers
        let t_var = (n * t_sq).saturating_sub(t_sum * t_sum);
        if t_var == 0 {
            return None;
        }

        let cross = match_template(image, template, MatchTemplateMethod::CrossCorrelation);
        let table = SummedArea::new(image);
        let out_w = iw - tw + 1;
        let out_h = ih - th + 1;

        let mut scores = Vec::with_capacity((out_w * out_h) as usize);
        for y in 0..out_h {
            for x in 0..out_w {
                let (sum, sq) = table.window(x, y, tw, th);
                let i_var = (n * sq as u128).saturating_sub(sum as u128 * sum as u128);
                let score = if i_var == 0 {
                    0.0
                } else {
                    let numerator = n as f64 * cross.get_pixel(x, y)[0] as f64
                        - sum as f64 * t_sum as f64;
                    (numerator / (i_var as f64 * t_var as f64).sqrt()).clamp(-1.0, 1.0)
                };
                scores.push(score as f32);
            }
        }

        Some(Self {
            width: out_w,
            scores,
        })
    }

    fn placement(&self, index: usize) -> ScoredPlacement {
        ScoredPlacement {
            left: index as u32 % self.width,
            top: index as u32 / self.width,
            score: self.scores[index],
        }
    }

    /// Highest score, first in row-major order on ties
    fn best(&self) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;
        for index in 0..self.scores.len() {
            let candidate = self.placement(index);
            if best.is_none_or(|b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Up to `k` highest-scoring placements, best first, skipping any placement
    /// within `radius` (on both axes) of one already taken
    fn top_separated(&self, k: usize, radius: u32) -> Vec<ScoredPlacement> {
        let mut indices: Vec<usize> = (0..self.scores.len()).collect();
        indices.sort_by(|&a, &b| {
            self.scores[b]
                .partial_cmp(&self.scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut chosen: Vec<ScoredPlacement> = Vec::with_capacity(k);
        for index in indices {
            if chosen.len() == k {
                break;
            }
            let candidate = self.placement(index);
            let suppressed = chosen.iter().any(|kept| {
                kept.left.abs_diff(candidate.left) <= radius
                    && kept.top.abs_diff(candidate.top) <= radius
            });
            if !suppressed {
                chosen.push(candidate);
            }
        }
        chosen
    }
}

/// Summed-area tables of pixel values and squared pixel values
struct SummedArea {
    stride: usize,
    sums: Vec<u64>,
    squares: Vec<u64>,
}

impl SummedArea {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = image.dimensions();
        let stride = w as usize + 1;
        let mut sums = vec![0u64; stride * (h as usize + 1)];
        let mut squares = vec![0u64; stride * (h as usize + 1)];

        for y in 0..h as usize {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for x in 0..w as usize {
                let v = image.get_pixel(x as u32, y as u32)[0] as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sums[idx] = sums[idx - stride] + row_sum;
                squares[idx] = squares[idx - stride] + row_sq;
            }
        }

        Self {
            stride,
            sums,
            squares,
        }
    }

    /// (sum, sum of squares) over the `w`x`h` window with top-left (x, y)
    fn window(&self, x: u32, y: u32, w: u32, h: u32) -> (u64, u64) {
        let (x, y, w, h) = (x as usize, y as usize, w as usize, h as usize);
        let a = y * self.stride + x;
        let b = y * self.stride + x + w;
        let c = (y + h) * self.stride + x;
        let d = (y + h) * self.stride + x + w;
        (
            self.sums[d] + self.sums[a] - self.sums[b] - self.sums[c],
            self.squares[d] + self.squares[a] - self.squares[b] - self.squares[c],
        )
    }
}
