//! Colour-area heuristic over a captured screenshot.
//!
//! The screenshot is converted to HSV (8-bit convention: hue halved into
//! `0..=180`, saturation and value in `0..=255`) and every pixel inside the
//! configured [`HueBand`] is counted. The fraction of counted pixels is the
//! metric; it is compared against a threshold with a strict `>`.
//!
//! The default band (yellow) and threshold (0.05) are placeholder policy.
//! They have not been tuned against labelled data.

use crate::config::HueBand;
use crate::types::Bitmap;

use image::{ImageBuffer, Rgb};
use tracing::{debug, warn};

/// Outcome of one visual evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualOutcome {
    pub matched: bool,
    /// Fraction of pixels inside the hue band, in `[0, 1]`
    pub metric: f64,
}

impl VisualOutcome {
    const FAILED: VisualOutcome = VisualOutcome {
        matched: false,
        metric: 0.0,
    };
}

#[derive(Debug, Clone)]
pub struct VisualCueStrategy {
    band: HueBand,
    threshold: f64,
}

impl VisualCueStrategy {
    pub fn new(band: HueBand, threshold: f64) -> Self {
        Self { band, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate against the configured threshold
    pub fn evaluate(&self, image: &Bitmap) -> VisualOutcome {
        self.evaluate_at(image, self.threshold)
    }

    /// Evaluate against an explicit threshold. Processing failures give a
    /// negative outcome with a zero metric.
    pub fn evaluate_at(&self, image: &Bitmap, threshold: f64) -> VisualOutcome {
        match self.accent_ratio(image) {
            Ok(metric) => {
                debug!("Accent area ratio {:.4} (threshold {:.4})", metric, threshold);
                VisualOutcome {
                    matched: metric > threshold,
                    metric,
                }
            }
            Err(reason) => {
                warn!("Error in visual cue detection: {}", reason);
                VisualOutcome::FAILED
            }
        }
    }

    /// Decode an encoded screenshot and evaluate it
    pub fn evaluate_encoded(&self, bytes: &[u8]) -> VisualOutcome {
        match Bitmap::decode(bytes) {
            Ok(bitmap) => self.evaluate(&bitmap),
            Err(e) => {
                warn!("Error in visual cue detection: {}", e);
                VisualOutcome::FAILED
            }
        }
    }

    fn accent_ratio(&self, image: &Bitmap) -> Result<f64, String> {
        if image.width == 0 || image.height == 0 {
            return Err(format!("empty bitmap {}x{}", image.width, image.height));
        }

        let data = image.data.as_slice();
        let rgb = ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(image.width, image.height, data)
            .ok_or_else(|| {
                format!(
                    "buffer of {} bytes does not hold a {}x{} RGB image",
                    data.len(),
                    image.width,
                    image.height
                )
            })?;

        let masked = rgb
            .pixels()
            .filter(|p| {
                let [h, s, v] = rgb_to_hsv(p.0);
                self.band.contains(h, s, v)
            })
            .count();

        Ok(masked as f64 / image.pixel_count() as f64)
    }
}

/// RGB to HSV on the 8-bit convention: H in `0..=180`, S and V in `0..=255`.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    let diff = (max - min) as f32;

    let s = if max == 0 {
        0.0
    } else {
        255.0 * diff / max as f32
    };

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut h = if diff == 0.0 {
        0.0
    } else if v as f32 == r {
        60.0 * (g - b) / diff
    } else if v as f32 == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    [
        (h / 2.0).round().min(180.0) as u8,
        s.round() as u8,
        v,
    ]
}
