use crate::config::DetectorConfig;
use crate::error::Result;
use crate::strategy::{DetectionStrategy, build_chain};
use crate::types::{ClassifierStats, DetectionResult, ScreenSnapshot};

use std::sync::RwLock;
use tracing::{debug, info};

/// Ad classification coordinator.
///
/// Runs the configured strategies cheapest first and stops at the first hit.
/// Statistics are updated once per call under a single write guard, so the
/// classifier can be shared between threads.
pub struct AdClassifier {
    config: DetectorConfig,
    strategies: Vec<Box<dyn DetectionStrategy>>,
    stats: RwLock<ClassifierStats>,
}

impl AdClassifier {
    /// Create a classifier from a validated copy of `config`
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        config.validate()?;
        let strategies = build_chain(config);

        info!(
            "Initializing AdClassifier (strategies: {})",
            strategies
                .iter()
                .map(|s| s.method().as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        Ok(Self {
            config: config.clone(),
            strategies,
            stats: RwLock::new(ClassifierStats::default()),
        })
    }

    /// Classify one snapshot.
    ///
    /// Opt-in strategies (visual) only run when `visual_enabled` is set. Never
    /// fails: strategy level faults surface as a negative result.
    pub fn classify(&self, snapshot: &ScreenSnapshot, visual_enabled: bool) -> DetectionResult {
        let result = self.run_chain(snapshot, visual_enabled);

        let (items, ads) = {
            let mut stats = self.stats.write().unwrap_or_else(|e| e.into_inner());
            stats.record(&result);
            (stats.items_analyzed, stats.ads_detected)
        };

        if result.is_ad {
            info!(
                "Ad detected! (#{} of {} items) Method: {}, {}",
                ads,
                items,
                result.method,
                result.evidence.describe()
            );
        } else {
            debug!("Item #{} classified as organic", items);
        }

        result
    }

    /// Classify using the configured `visual_detection_enabled` flag
    pub fn classify_with_config(&self, snapshot: &ScreenSnapshot) -> DetectionResult {
        self.classify(snapshot, self.config.visual_detection_enabled)
    }

    /// Classify stored snapshots in order
    pub fn classify_batch(
        &self,
        snapshots: &[ScreenSnapshot],
        visual_enabled: bool,
    ) -> Vec<DetectionResult> {
        snapshots
            .iter()
            .map(|snapshot| self.classify(snapshot, visual_enabled))
            .collect()
    }

    fn run_chain(&self, snapshot: &ScreenSnapshot, visual_enabled: bool) -> DetectionResult {
        for strategy in &self.strategies {
            if strategy.requires_opt_in() && !visual_enabled {
                debug!("Skipping {} detection (not enabled)", strategy.method());
                continue;
            }

            debug!("Detecting ads by {}", strategy.method());
            if let Some(evidence) = strategy.evaluate(snapshot) {
                return DetectionResult::ad(strategy.method(), evidence);
            }
        }

        DetectionResult::organic()
    }

    /// Copy of the current statistics
    pub fn statistics(&self) -> ClassifierStats {
        self.stats.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn reset_statistics(&self) {
        let mut stats = self.stats.write().unwrap_or_else(|e| e.into_inner());
        *stats = ClassifierStats::default();
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}

/// Convenience wrapper with the default configuration
pub struct SimpleAdDetector {
    classifier: AdClassifier,
}

impl SimpleAdDetector {
    pub fn new() -> Result<Self> {
        Self::with_config(&DetectorConfig::default())
    }

    pub fn with_config(config: &DetectorConfig) -> Result<Self> {
        Ok(Self {
            classifier: AdClassifier::new(config)?,
        })
    }

    pub fn is_ad(&self, snapshot: &ScreenSnapshot) -> bool {
        self.check(snapshot).is_ad
    }

    pub fn check(&self, snapshot: &ScreenSnapshot) -> DetectionResult {
        self.classifier.classify_with_config(snapshot)
    }

    pub fn statistics(&self) -> ClassifierStats {
        self.classifier.statistics()
    }
}
