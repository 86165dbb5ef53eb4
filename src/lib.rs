//! Shorts Ad Detector
//!
//! Classifies short-form video items as advertisements or organic content
//! from a snapshot of the screen. Three heuristics run cheapest first and
//! stop at the first hit: on-screen text, UI affordances, and an optional
//! colour-area check over the screenshot.
//!
//! # Quick Start
//!
//! ```rust
//! use shorts_ad_detector::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let classifier = AdClassifier::new(&DetectorConfig::default())?;
//!
//!     let snapshot = ScreenSnapshot::new(
//!         ["Check out our Sponsored deal!"],
//!         vec![ElementDescriptor::new("Button", "Install Now")],
//!     );
//!     let result = classifier.classify(&snapshot, false);
//!     assert!(result.is_ad);
//!     assert_eq!(result.method, DetectionMethod::Text);
//!
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod page_source;
pub mod report;
pub mod strategy;
pub mod text;
pub mod types;
pub mod ui;
pub mod visual;
pub mod webdriver;

pub use classifier::{AdClassifier, SimpleAdDetector};
pub use config::{DetectorConfig, HueBand};
pub use error::{DetectorError, LookupError};
pub use report::SessionReport;
pub use types::{
    Bitmap, ClassifierStats, DetectionMethod, DetectionResult, ElementCollection,
    ElementDescriptor, Evidence, ScreenSnapshot, UiCategory,
};
pub use webdriver::{SessionHandle, SnapshotSource, WebDriverSnapshotSource};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        AdClassifier, Bitmap, ClassifierStats, DetectionMethod, DetectionResult, DetectorConfig,
        ElementDescriptor, Evidence, ScreenSnapshot, SimpleAdDetector,
    };
}
