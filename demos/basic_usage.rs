use anyhow::Result;
use shorts_ad_detector::prelude::*;

/// Two thirds dark blue, one third ad-yellow
fn banner_bitmap() -> Bitmap {
    let (width, height) = (90u32, 30u32);
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _y in 0..height {
        for x in 0..width {
            let pixel: [u8; 3] = if x < 30 { [255, 200, 0] } else { [20, 40, 200] };
            data.extend_from_slice(&pixel);
        }
    }
    Bitmap::from_rgb(width, height, data)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("🎬 Basic Ad Classification Example\n");

    let classifier = AdClassifier::new(&DetectorConfig::with_visual_detection())?;

    let items = vec![
        (
            "text marker",
            ScreenSnapshot::new(["Check out our Sponsored deal!"], vec![]),
        ),
        (
            "install button",
            ScreenSnapshot::new(
                ["cool product"],
                vec![ElementDescriptor::new("android.widget.Button", "Install Now")],
            ),
        ),
        (
            "yellow banner",
            ScreenSnapshot::new(["limited offer"], vec![]).with_image(banner_bitmap()),
        ),
        (
            "organic",
            ScreenSnapshot::new(["my cat does a backflip"], vec![]),
        ),
    ];

    for (name, snapshot) in &items {
        let result = classifier.classify_with_config(snapshot);
        let status = if result.is_ad { "📢 AD     " } else { "✅ ORGANIC" };
        println!("{} - {} [{}] {}", status, name, result.method, result.evidence.describe());
    }

    let stats = classifier.statistics();
    println!("\n📈 Statistics:");
    println!("Items analyzed: {}", stats.items_analyzed);
    println!("Ads detected: {}", stats.ads_detected);
    println!("Ad percentage: {:.1}%", stats.ad_percentage());
    for (method, count) in &stats.per_method {
        println!("  {}: {}", method, count);
    }

    Ok(())
}
