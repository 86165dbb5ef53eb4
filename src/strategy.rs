use crate::config::DetectorConfig;
use crate::text::TextIndicatorStrategy;
use crate::types::{DetectionMethod, Evidence, ScreenSnapshot};
use crate::ui::UiElementStrategy;
use crate::visual::VisualCueStrategy;

/// One detection heuristic in the classifier chain.
///
/// Cost ranks: text 1 (string scans), UI 2 (descriptor filtering), visual 3
/// (full pixel pass). Precision runs the other way: an explicit "Sponsored"
/// label is stronger evidence than a colour ratio.
pub trait DetectionStrategy: Send + Sync {
    fn method(&self) -> DetectionMethod;

    /// Relative cost, lower is cheaper
    fn cost_rank(&self) -> u8;

    /// Only runs when the caller enables it for the call
    fn requires_opt_in(&self) -> bool {
        false
    }

    /// Positive evidence, or `None`. Must not fail or keep state.
    fn evaluate(&self, snapshot: &ScreenSnapshot) -> Option<Evidence>;
}

impl DetectionStrategy for TextIndicatorStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::Text
    }

    fn cost_rank(&self) -> u8 {
        1
    }

    fn evaluate(&self, snapshot: &ScreenSnapshot) -> Option<Evidence> {
        TextIndicatorStrategy::evaluate(self, snapshot.text_contents()).map(|hit| Evidence::Text {
            matched_indicator: hit.indicator,
            matched_text: hit.text,
        })
    }
}

impl DetectionStrategy for UiElementStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::Ui
    }

    fn cost_rank(&self) -> u8 {
        2
    }

    fn evaluate(&self, snapshot: &ScreenSnapshot) -> Option<Evidence> {
        UiElementStrategy::evaluate(self, snapshot.ui_elements()).map(|hit| Evidence::Ui {
            category: hit.category,
            element: hit.element,
        })
    }
}

impl DetectionStrategy for VisualCueStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::Visual
    }

    fn cost_rank(&self) -> u8 {
        3
    }

    fn requires_opt_in(&self) -> bool {
        true
    }

    fn evaluate(&self, snapshot: &ScreenSnapshot) -> Option<Evidence> {
        let image = snapshot.image()?;
        let outcome = VisualCueStrategy::evaluate(self, image);
        outcome.matched.then_some(Evidence::Visual {
            area_ratio: outcome.metric,
        })
    }
}

/// Build the strategies named in `strategy_order`, in that order
pub fn build_chain(config: &DetectorConfig) -> Vec<Box<dyn DetectionStrategy>> {
    config
        .strategy_order
        .iter()
        .filter_map(|method| -> Option<Box<dyn DetectionStrategy>> {
            match method {
                DetectionMethod::Text => Some(Box::new(TextIndicatorStrategy::new(
                    &config.ad_indicator_phrases,
                ))),
                DetectionMethod::Ui => Some(Box::new(UiElementStrategy::new(
                    &config.cta_words,
                    &config.cta_roles,
                    &config.disclosure_words,
                    &config.disclosure_roles,
                ))),
                DetectionMethod::Visual => Some(Box::new(VisualCueStrategy::new(
                    config.visual_hue_band,
                    config.visual_area_threshold,
                ))),
                DetectionMethod::None => None,
            }
        })
        .collect()
}
