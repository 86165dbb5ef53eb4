mod common;

use common::synthetic_image::yellow_percent;
use shorts_ad_detector::page_source::PageSourceParser;
use shorts_ad_detector::strategy::{DetectionStrategy, build_chain};
use shorts_ad_detector::visual::VisualCueStrategy;
use shorts_ad_detector::{
    AdClassifier, Bitmap, ClassifierStats, DetectionMethod, DetectionResult, DetectorConfig,
    ElementDescriptor, Evidence, HueBand, ScreenSnapshot, UiCategory,
};

fn classifier() -> AdClassifier {
    AdClassifier::new(&DetectorConfig::default()).unwrap()
}

fn assert_consistent(stats: &ClassifierStats) {
    let per_method_total: u64 = stats.per_method.values().sum();
    assert_eq!(stats.ads_detected, per_method_total);
    assert!(stats.ads_detected <= stats.items_analyzed);
    assert_eq!(stats.method_count(DetectionMethod::None), 0);
}

fn mixed_snapshots() -> Vec<ScreenSnapshot> {
    vec![
        ScreenSnapshot::new(["Sponsored"], vec![]),
        ScreenSnapshot::new(["cat video"], vec![]),
        ScreenSnapshot::new(
            ["cat video"],
            vec![ElementDescriptor::new("Button", "Shop the look")],
        ),
        ScreenSnapshot::new(["dance"], vec![]).with_image(yellow_percent(30)),
        ScreenSnapshot::new(["dance"], vec![]).with_image(yellow_percent(1)),
        ScreenSnapshot::default(),
    ]
}

#[test]
fn counters_track_every_call() {
    let classifier = classifier();
    let snapshots = mixed_snapshots();

    let mut expected_ads = 0;
    for round in 1..=5u64 {
        for snapshot in &snapshots {
            if classifier.classify(snapshot, true).is_ad {
                expected_ads += 1;
            }
        }
        let stats = classifier.statistics();
        assert_eq!(stats.items_analyzed, round * snapshots.len() as u64);
        assert_eq!(stats.ads_detected, expected_ads);
        assert_consistent(&stats);
    }

    let stats = classifier.statistics();
    assert_eq!(stats.method_count(DetectionMethod::Text), 5);
    assert_eq!(stats.method_count(DetectionMethod::Ui), 5);
    assert_eq!(stats.method_count(DetectionMethod::Visual), 5);
}

#[test]
fn text_dominates_ui_and_visual() {
    let snapshot = ScreenSnapshot::new(
        ["Sponsored"],
        vec![ElementDescriptor::new("Button", "Install")],
    )
    .with_image(yellow_percent(50));

    let result = classifier().classify(&snapshot, true);
    assert!(result.is_ad);
    assert_eq!(result.method, DetectionMethod::Text);
}

#[test]
fn ui_dominates_visual() {
    let snapshot = ScreenSnapshot::new(
        ["cool product"],
        vec![ElementDescriptor::new("Button", "Install")],
    )
    .with_image(yellow_percent(50));

    let result = classifier().classify(&snapshot, true);
    assert_eq!(result.method, DetectionMethod::Ui);
}

#[test]
fn visual_never_runs_when_disabled() {
    let snapshot = ScreenSnapshot::new(["cool product"], vec![]).with_image(yellow_percent(50));

    let classifier = classifier();
    assert_eq!(classifier.classify(&snapshot, false), DetectionResult::organic());
    assert_eq!(classifier.classify_with_config(&snapshot), DetectionResult::organic());
    assert_eq!(classifier.statistics().items_analyzed, 2);
}

#[test]
fn visual_enabled_without_image_is_organic() {
    let snapshot = ScreenSnapshot::new(["cool product"], vec![]);
    assert_eq!(classifier().classify(&snapshot, true), DetectionResult::organic());
}

#[test]
fn sponsored_text_is_reported_with_indicator() {
    let config = DetectorConfig {
        ad_indicator_phrases: vec!["Sponsored".to_string()],
        ..DetectorConfig::default()
    };
    let classifier = AdClassifier::new(&config).unwrap();

    let result = classifier.classify(
        &ScreenSnapshot::new(["Check out our Sponsored deal!"], vec![]),
        false,
    );
    assert!(result.is_ad);
    assert_eq!(result.method, DetectionMethod::Text);
    match result.evidence {
        Evidence::Text {
            matched_indicator,
            matched_text,
        } => {
            assert_eq!(matched_indicator, "Sponsored");
            assert_eq!(matched_text, "Check out our Sponsored deal!");
        }
        other => panic!("unexpected evidence {:?}", other),
    }
}

#[test]
fn install_button_is_ui_ad() {
    let result = classifier().classify(
        &ScreenSnapshot::new(
            Vec::<String>::new(),
            vec![ElementDescriptor::new("Button", "Install Now")],
        ),
        false,
    );
    assert!(result.is_ad);
    assert_eq!(result.method, DetectionMethod::Ui);
    assert!(matches!(
        result.evidence,
        Evidence::Ui {
            category: UiCategory::Button,
            ..
        }
    ));
}

#[test]
fn ten_percent_yellow_against_thresholds() {
    let image = yellow_percent(10);
    let strategy = VisualCueStrategy::new(HueBand::YELLOW, 0.05);

    let outcome = strategy.evaluate(&image);
    assert!(outcome.matched);
    assert!((outcome.metric - 0.10).abs() < 1e-9);

    let outcome = strategy.evaluate_at(&image, 0.15);
    assert!(!outcome.matched);

    let strict = AdClassifier::new(&DetectorConfig {
        visual_area_threshold: 0.15,
        ..DetectorConfig::default()
    })
    .unwrap();
    let snapshot = ScreenSnapshot::new(["dance"], vec![]).with_image(image.clone());
    assert!(!strict.classify(&snapshot, true).is_ad);

    let result = classifier().classify(&snapshot, true);
    assert_eq!(result.method, DetectionMethod::Visual);
    match result.evidence {
        Evidence::Visual { area_ratio } => assert!((area_ratio - 0.10).abs() < 1e-9),
        other => panic!("unexpected evidence {:?}", other),
    }
}

#[test]
fn strategies_are_idempotent() {
    let snapshot = ScreenSnapshot::new(
        ["Sponsored", "Learn more"],
        vec![
            ElementDescriptor::new("TextView", "Ad"),
            ElementDescriptor::new("Button", "Download"),
        ],
    )
    .with_image(yellow_percent(12));

    for strategy in build_chain(&DetectorConfig::default()) {
        let first = strategy.evaluate(&snapshot);
        for _ in 0..3 {
            assert_eq!(strategy.evaluate(&snapshot), first, "{}", strategy.method());
        }
    }
}

#[test]
fn faults_degrade_to_false_negatives() {
    let classifier = classifier();
    let broken = ScreenSnapshot::new(["cool product"], vec![])
        .with_unavailable_elements("uiautomator crashed")
        .with_image(Bitmap::from_rgb(640, 480, vec![0; 17]));

    let result = classifier.classify(&broken, true);
    assert_eq!(result, DetectionResult::organic());

    let stats = classifier.statistics();
    assert_eq!(stats.items_analyzed, 1);
    assert_eq!(stats.ads_detected, 0);
}

#[test]
fn unavailable_elements_do_not_hide_text_evidence() {
    let snapshot =
        ScreenSnapshot::new(["Sponsored"], vec![]).with_unavailable_elements("timeout");
    assert_eq!(classifier().classify(&snapshot, false).method, DetectionMethod::Text);
}

#[test]
fn concurrent_callers_keep_counters_consistent() {
    let classifier = classifier();
    let snapshots = mixed_snapshots();
    let threads = 8;
    let rounds = 50;

    std::thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                for _ in 0..rounds {
                    for snapshot in &snapshots {
                        classifier.classify(snapshot, true);
                    }
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..200 {
                assert_consistent(&classifier.statistics());
            }
        });
    });

    let stats = classifier.statistics();
    assert_eq!(
        stats.items_analyzed,
        (threads * rounds * snapshots.len()) as u64
    );
    assert_eq!(stats.ads_detected, (threads * rounds * 3) as u64);
    assert_consistent(&stats);
}

#[test]
fn batch_results_follow_input_order() {
    let results = classifier().classify_batch(&mixed_snapshots(), true);
    let methods: Vec<_> = results.iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![
            DetectionMethod::Text,
            DetectionMethod::None,
            DetectionMethod::Ui,
            DetectionMethod::Visual,
            DetectionMethod::None,
            DetectionMethod::None,
        ]
    );
}

#[test]
fn page_source_snapshot_classifies_end_to_end() {
    let source = r#"<hierarchy>
  <android.widget.TextView text="Cooking with Sam" class="android.widget.TextView"/>
  <android.widget.Button text="Shop now" class="android.widget.Button" clickable="true"/>
</hierarchy>"#;
    let snapshot = PageSourceParser::new().unwrap().parse(source);

    let config = DetectorConfig {
        ad_indicator_phrases: vec!["Sponsored".to_string()],
        ..DetectorConfig::default()
    };
    let result = AdClassifier::new(&config).unwrap().classify(&snapshot, false);

    assert_eq!(result.method, DetectionMethod::Ui);
    match result.evidence {
        Evidence::Ui { category, element } => {
            assert_eq!(category, UiCategory::Button);
            assert_eq!(element.label, "Shop now");
            assert_eq!(element.role, "android.widget.Button");
        }
        other => panic!("unexpected evidence {:?}", other),
    }
}

#[test]
fn look_alike_widgets_stay_organic() {
    let source = r#"<hierarchy>
  <android.widget.ImageButton text="" class="android.widget.ImageButton" content-desc="Add to queue"/>
  <android.widget.RadioButton text="Download quality" class="android.widget.RadioButton"/>
  <android.widget.TextView text="Cooking with Sam" class="android.widget.TextView"/>
</hierarchy>"#;
    let snapshot = PageSourceParser::new().unwrap().parse(source);

    let config = DetectorConfig {
        ad_indicator_phrases: vec!["Sponsored".to_string()],
        ..DetectorConfig::default()
    };
    let result = AdClassifier::new(&config).unwrap().classify(&snapshot, false);

    assert!(!result.is_ad);
    assert_eq!(result.method, DetectionMethod::None);
}
