use std::path::Path;

use archflow::{Config, parse_diagram, render_svg};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert!(
        !svg.contains("NaN"),
        "{fixture}: non-finite coordinate leaked into output"
    );
}

fn render_fixture(path: &Path) -> String {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let diagram = parse_diagram(&input).expect("parse failed");
    render_svg(&diagram, &Config::default())
}

#[test]
fn render_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "fraud_detection.json5",
        "pinned_positions.json5",
        "minimal.json5",
    ];

    for rel in candidates {
        let path = root.join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        let svg = render_fixture(&path);
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn fraud_detection_renders_all_layers() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fraud_detection.json5");
    let svg = render_fixture(&root);

    assert_eq!(svg.matches("<g class=\"zone\">").count(), 3);
    assert_eq!(svg.matches("class=\"edge\"").count(), 6);
    assert_eq!(svg.matches("<g class=\"node\"").count(), 6);
    // Three flow markers per connection.
    assert_eq!(svg.matches("<animateMotion").count(), 18);
    // Render order is zones, then connections, then nodes.
    let zone_at = svg.find("<g class=\"zone\">").unwrap();
    let edge_at = svg.find("class=\"edge\"").unwrap();
    let node_at = svg.find("<g class=\"node\"").unwrap();
    assert!(zone_at < edge_at && edge_at < node_at);
    // Header is on by default.
    assert!(svg.contains("Data Collection &amp; Integration for Fraud Detection"));
}

#[test]
fn pinned_positions_are_honored() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/pinned_positions.json5");
    let svg = render_fixture(&root);
    assert!(svg.contains("x=\"100.00\" y=\"100.00\""));
    assert!(svg.contains("x=\"600.00\" y=\"520.00\""));
    // scoring -> alerts is a vertical run: same column, 420 apart.
    assert!(svg.contains("PHI Boundary · Private Subnet"));
}

#[test]
fn minimal_fixture_gets_minimum_canvas() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/minimal.json5");
    let svg = render_fixture(&root);
    assert!(svg.contains("viewBox=\"0 0 1200 800\""));
    assert_eq!(svg.matches("<g class=\"node\"").count(), 1);
    assert_eq!(svg.matches("class=\"edge\"").count(), 0);
}
