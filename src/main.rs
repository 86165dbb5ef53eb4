use anyhow::{Context, Result, bail};
use chrono::Utc;
use serde::Deserialize;
use shorts_ad_detector::prelude::*;
use shorts_ad_detector::SessionReport;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// One stored item: the captured snapshot plus an optional screenshot file,
/// relative to the snapshot file's directory
#[derive(Deserialize)]
struct StoredSnapshot {
    #[serde(flatten)]
    snapshot: ScreenSnapshot,
    #[serde(default)]
    screenshot: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (snapshots_path, config_path) = parse_args(std::env::args().skip(1))?;

    let config = match config_path {
        Some(path) => DetectorConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => DetectorConfig::default(),
    };

    let classifier = AdClassifier::new(&config)?;
    let started = Utc::now();
    let snapshots = load_snapshots(&snapshots_path, config.visual_detection_enabled).await?;
    info!("Reclassifying {} stored snapshots", snapshots.len());

    for (index, snapshot) in snapshots.iter().enumerate() {
        let result = classifier.classify_with_config(snapshot);
        let status = if result.is_ad { "AD" } else { "organic" };
        println!(
            "#{:<4} {:<8} {:<7} {}",
            index + 1,
            status,
            result.method,
            result.evidence.describe()
        );
    }

    let report = SessionReport::new(started, Utc::now(), classifier.statistics());
    report.log_summary();
    println!("{}", report.to_json_pretty()?);

    Ok(())
}

/// `<snapshots.json> [config.json]`
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(PathBuf, Option<PathBuf>)> {
    let Some(snapshots_path) = args.next().map(PathBuf::from) else {
        bail!("usage: shorts-ad-detector <snapshots.json> [config.json]");
    };
    Ok((snapshots_path, args.next().map(PathBuf::from)))
}

async fn load_snapshots(path: &Path, with_images: bool) -> Result<Vec<ScreenSnapshot>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let stored: Vec<StoredSnapshot> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut snapshots = Vec::with_capacity(stored.len());

    for item in stored {
        let snapshot = match item.screenshot.filter(|_| with_images) {
            Some(file) => match load_bitmap(&base.join(&file)).await {
                Ok(bitmap) => item.snapshot.with_image(bitmap),
                Err(e) => {
                    warn!("Skipping screenshot {}: {:#}", file.display(), e);
                    item.snapshot
                }
            },
            None => item.snapshot,
        };
        snapshots.push(snapshot);
    }

    Ok(snapshots)
}

async fn load_bitmap(path: &Path) -> Result<Bitmap> {
    let bytes = tokio::fs::read(path).await?;
    Ok(Bitmap::decode(&bytes)?)
}
