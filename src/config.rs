use crate::error::{DetectorError, Result};
use crate::types::DetectionMethod;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Inclusive HSV band on the 8-bit convention: hue 0..=180, saturation and
/// value 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HueBand {
    pub hue_min: u8,
    pub hue_max: u8,
    pub sat_min: u8,
    pub sat_max: u8,
    pub val_min: u8,
    pub val_max: u8,
}

impl HueBand {
    /// Yellow accent band, often used for ad call-to-action buttons
    pub const YELLOW: HueBand = HueBand {
        hue_min: 20,
        hue_max: 30,
        sat_min: 100,
        sat_max: 255,
        val_min: 100,
        val_max: 255,
    };

    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.hue_min..=self.hue_max).contains(&h)
            && (self.sat_min..=self.sat_max).contains(&s)
            && (self.val_min..=self.val_max).contains(&v)
    }
}

impl Default for HueBand {
    fn default() -> Self {
        Self::YELLOW
    }
}

/// Configuration for the ad classifier.
///
/// Built once per session and handed to [`crate::AdClassifier::new`]; the
/// classifier never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Text phrases, highest priority first
    pub ad_indicator_phrases: Vec<String>,
    pub cta_words: Vec<String>,
    /// Roles eligible for the call-to-action check. Matched exactly (ignoring
    /// case) against the element role or its last dotted segment, so
    /// `Button` accepts `android.widget.Button` but not `ImageButton`.
    /// Empty means any role.
    pub cta_roles: Vec<String>,
    pub disclosure_words: Vec<String>,
    /// Roles eligible for the disclosure check, same matching as `cta_roles`
    pub disclosure_roles: Vec<String>,
    pub visual_hue_band: HueBand,
    pub visual_area_threshold: f64,
    pub visual_detection_enabled: bool,
    /// Evaluation order of the strategies
    pub strategy_order: Vec<DetectionMethod>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            ad_indicator_phrases: to_strings(&[
                "Ad",
                "Sponsored",
                "Shop now",
                "Learn more",
                "Install now",
                "Download",
            ]),
            cta_words: to_strings(&["Shop", "Install", "Download"]),
            cta_roles: to_strings(&["Button"]),
            disclosure_words: to_strings(&["Ad", "Sponsored"]),
            disclosure_roles: to_strings(&["TextView"]),
            visual_hue_band: HueBand::YELLOW,
            visual_area_threshold: 0.05,
            visual_detection_enabled: false, // image decode + HSV pass per item
            strategy_order: DetectionMethod::STRATEGIES.to_vec(),
        }
    }
}

impl DetectorConfig {
    /// Text and UI checks only, with the short phrase list
    pub fn minimal() -> Self {
        Self {
            ad_indicator_phrases: to_strings(&["Sponsored", "Ad"]),
            strategy_order: vec![DetectionMethod::Text, DetectionMethod::Ui],
            ..Self::default()
        }
    }

    /// Default configuration with the visual heuristic switched on
    pub fn with_visual_detection() -> Self {
        Self {
            visual_detection_enabled: true,
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DetectorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strategy_order.is_empty() {
            return Err(DetectorError::invalid_config(
                "strategy_order",
                "at least one strategy is required",
            ));
        }

        let mut seen = HashSet::new();
        for method in &self.strategy_order {
            if *method == DetectionMethod::None {
                return Err(DetectorError::invalid_config(
                    "strategy_order",
                    "NONE is not a strategy",
                ));
            }
            if !seen.insert(*method) {
                return Err(DetectorError::invalid_config(
                    "strategy_order",
                    format!("{} listed more than once", method),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.visual_area_threshold) {
            return Err(DetectorError::invalid_config(
                "visual_area_threshold",
                format!("{} is outside [0, 1]", self.visual_area_threshold),
            ));
        }

        let band = &self.visual_hue_band;
        if band.hue_max > 180 {
            return Err(DetectorError::invalid_config(
                "visual_hue_band",
                "hue is measured on a 0..=180 scale",
            ));
        }
        if band.hue_min > band.hue_max || band.sat_min > band.sat_max || band.val_min > band.val_max
        {
            return Err(DetectorError::invalid_config(
                "visual_hue_band",
                "lower bound above upper bound",
            ));
        }

        Ok(())
    }

    pub fn strategy_enabled(&self, method: DetectionMethod) -> bool {
        self.strategy_order.contains(&method)
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}
