use crate::error::{DetectorError, LookupError};

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Which strategy produced the positive signal for a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionMethod {
    None,
    Text,
    Ui,
    Visual,
}

impl DetectionMethod {
    /// Every method backed by a strategy, cheapest first.
    pub const STRATEGIES: [DetectionMethod; 3] = [Self::Text, Self::Ui, Self::Visual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Text => "TEXT",
            Self::Ui => "UI",
            Self::Visual => "VISUAL",
        }
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which of the two UI checks matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiCategory {
    /// Call-to-action button ("Install", "Shop now")
    Button,
    /// Ad disclosure label ("Ad", "Sponsored")
    Label,
}

/// Strategy specific payload attached to a detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    None,
    Text {
        matched_indicator: String,
        matched_text: String,
    },
    Ui {
        category: UiCategory,
        element: ElementDescriptor,
    },
    Visual {
        area_ratio: f64,
    },
}

impl Evidence {
    /// Short human readable form, used in log lines and reports
    pub fn describe(&self) -> String {
        match self {
            Evidence::None => "no evidence".to_string(),
            Evidence::Text {
                matched_indicator,
                matched_text,
            } => format!("indicator '{}' in '{}'", matched_indicator, matched_text),
            Evidence::Ui { category, element } => {
                format!("{:?} '{}' ({})", category, element.label, element.role)
            }
            Evidence::Visual { area_ratio } => format!("accent area ratio {:.4}", area_ratio),
        }
    }
}

/// Result of classifying one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub is_ad: bool,
    pub method: DetectionMethod,
    pub evidence: Evidence,
}

impl DetectionResult {
    pub fn organic() -> Self {
        Self {
            is_ad: false,
            method: DetectionMethod::None,
            evidence: Evidence::None,
        }
    }

    pub fn ad(method: DetectionMethod, evidence: Evidence) -> Self {
        Self {
            is_ad: true,
            method,
            evidence,
        }
    }
}

/// Descriptor of one interactive control on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub role: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl ElementDescriptor {
    pub fn new(role: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Element descriptors as captured, or the reason they could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementCollection {
    Available(Vec<ElementDescriptor>),
    Unavailable { reason: String },
}

impl Default for ElementCollection {
    fn default() -> Self {
        ElementCollection::Available(Vec::new())
    }
}

impl ElementCollection {
    pub fn elements(&self) -> Result<&[ElementDescriptor], LookupError> {
        match self {
            ElementCollection::Available(elements) => Ok(elements),
            ElementCollection::Unavailable { reason } => {
                Err(LookupError::Unavailable(reason.clone()))
            }
        }
    }
}

/// Decoded RGB bitmap, 3 bytes per pixel, row major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Bitmap {
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode an encoded screenshot (PNG, JPEG, ...) into RGB.
    pub fn decode(bytes: &[u8]) -> Result<Self, DetectorError> {
        let rgb = image::load_from_memory(bytes)
            .map_err(|e| DetectorError::ImageDecode(e.to_string()))?
            .into_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Immutable capture of on-screen state for one viewed item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenSnapshot {
    #[serde(default, deserialize_with = "deserialize_text_set")]
    text_contents: Vec<String>,
    #[serde(default)]
    ui_elements: ElementCollection,
    #[serde(skip)]
    image: Option<Bitmap>,
}

impl ScreenSnapshot {
    pub fn new<I, S>(texts: I, elements: Vec<ElementDescriptor>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text_contents: dedup_texts(texts.into_iter().map(Into::into)),
            ui_elements: ElementCollection::Available(elements),
            image: None,
        }
    }

    pub fn with_image(mut self, image: Bitmap) -> Self {
        self.image = Some(image);
        self
    }

    /// Record that the element collection could not be read for this item.
    pub fn with_unavailable_elements(mut self, reason: impl Into<String>) -> Self {
        self.ui_elements = ElementCollection::Unavailable {
            reason: reason.into(),
        };
        self
    }

    pub fn text_contents(&self) -> &[String] {
        &self.text_contents
    }

    pub fn ui_elements(&self) -> &ElementCollection {
        &self.ui_elements
    }

    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }
}

/// Drop blank strings and duplicates, keeping first-seen order.
pub(crate) fn dedup_texts(texts: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    texts
        .filter(|t| !t.trim().is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

fn deserialize_text_set<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(dedup_texts(raw.into_iter()))
}

/// Running statistics about a classifier's decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierStats {
    pub items_analyzed: u64,
    pub ads_detected: u64,
    pub per_method: BTreeMap<DetectionMethod, u64>,
}

impl Default for ClassifierStats {
    fn default() -> Self {
        Self {
            items_analyzed: 0,
            ads_detected: 0,
            per_method: DetectionMethod::STRATEGIES
                .iter()
                .map(|m| (*m, 0))
                .collect(),
        }
    }
}

impl ClassifierStats {
    /// Apply one classification outcome. Callers hold the stats lock for the
    /// whole call so the three counters move together.
    pub(crate) fn record(&mut self, result: &DetectionResult) {
        self.items_analyzed += 1;
        if result.is_ad {
            self.ads_detected += 1;
            *self.per_method.entry(result.method).or_insert(0) += 1;
        }
    }

    pub fn method_count(&self, method: DetectionMethod) -> u64 {
        self.per_method.get(&method).copied().unwrap_or(0)
    }

    pub fn ad_percentage(&self) -> f64 {
        if self.items_analyzed == 0 {
            0.0
        } else {
            (self.ads_detected as f64 / self.items_analyzed as f64) * 100.0
        }
    }
}
