use crate::error::Result;
use crate::types::{ClassifierStats, DetectionMethod};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Summary of one viewing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    pub duration_seconds: f64,
    pub items_viewed: u64,
    pub ads_captured: u64,
    pub ad_percentage: f64,
    pub detector: ClassifierStats,
}

impl SessionReport {
    pub fn new(
        session_start: DateTime<Utc>,
        session_end: DateTime<Utc>,
        detector: ClassifierStats,
    ) -> Self {
        let duration_seconds =
            (session_end - session_start).num_milliseconds().max(0) as f64 / 1000.0;
        Self {
            session_start,
            session_end,
            duration_seconds,
            items_viewed: detector.items_analyzed,
            ads_captured: detector.ads_detected,
            ad_percentage: detector.ad_percentage(),
            detector,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn log_summary(&self) {
        info!("=== Session Summary ===");
        info!("Duration: {:.1} seconds", self.duration_seconds);
        info!("Items viewed: {}", self.items_viewed);
        info!("Ads captured: {}", self.ads_captured);
        if self.items_viewed > 0 {
            info!("Ad percentage: {:.1}%", self.ad_percentage);
        }
        for method in DetectionMethod::STRATEGIES {
            info!("  {}: {}", method, self.detector.method_count(method));
        }
        info!("=====================");
    }
}
