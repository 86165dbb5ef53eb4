use tracing::debug;

/// A text indicator hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    pub indicator: String,
    pub text: String,
}

/// Scans on-screen text for ad marker phrases.
///
/// Indicators are checked in priority order and, for each indicator, text
/// items in the order the collaborator supplied them. The first pair where
/// the text contains the indicator (ignoring case) wins.
#[derive(Debug, Clone)]
pub struct TextIndicatorStrategy {
    indicators: Vec<String>,
    lowered: Vec<String>,
}

impl TextIndicatorStrategy {
    pub fn new(indicators: &[String]) -> Self {
        Self {
            indicators: indicators.to_vec(),
            lowered: indicators.iter().map(|i| i.to_lowercase()).collect(),
        }
    }

    pub fn evaluate(&self, texts: &[String]) -> Option<TextMatch> {
        if texts.is_empty() || self.indicators.is_empty() {
            return None;
        }

        let lowered_texts: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();

        for (indicator, needle) in self.indicators.iter().zip(&self.lowered) {
            if needle.is_empty() {
                continue;
            }
            if let Some(pos) = lowered_texts.iter().position(|t| t.contains(needle.as_str())) {
                debug!("Ad indicator found: '{}' in '{}'", indicator, texts[pos]);
                return Some(TextMatch {
                    indicator: indicator.clone(),
                    text: texts[pos].clone(),
                });
            }
        }

        None
    }

    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }
}
