use std::collections::BTreeSet;
use std::fs;

use movienow_charts::app::{self, STEPS, SUCCESS_LINE, SUMMARY_TITLE};
use movienow_charts::{fonts, interactive, RenderConfig};

const SKIP_REASON: &str = "no chart font found. Set MOVIENOW_FONTS_DIR or copy assets/fonts next to the binary.";

fn file_names(dir: &std::path::Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn default_run_writes_five_files_and_reports_success() {
    if !fonts::chart_fonts_available() {
        eprintln!("Skipping default_run_writes_five_files_and_reports_success: {SKIP_REASON}");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RenderConfig::new().with_output_dir(dir.path()).with_dpi(20);
    let mut transcript = Vec::new();

    let written = app::run(&config, &mut transcript).expect("run");

    let expected: BTreeSet<String> = [
        "country_performance_dashboard.png",
        "genre_analysis.png",
        "customer_segmentation.png",
        "temporal_analysis.png",
        "interactive_dashboard.html",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect();
    assert_eq!(written.len(), 5);
    assert_eq!(file_names(dir.path()), expected);

    let text = String::from_utf8(transcript).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines.first(),
        Some(&"Generating MovieNow Business Intelligence Visualizations...")
    );
    let steps: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .collect();
    assert_eq!(
        steps,
        vec![
            "1. Creating Country Performance Dashboard...",
            "2. Creating Genre Analysis...",
            "3. Creating Customer Segmentation...",
            "4. Creating Temporal Analysis...",
            "5. Creating Interactive Dashboard...",
        ]
    );
    assert_eq!(steps, STEPS);
    assert!(lines.contains(&SUCCESS_LINE));
    assert!(lines.contains(&SUMMARY_TITLE));
    let rule = "=".repeat(50);
    assert_eq!(lines[lines.len() - 2], "Time Period: 24 months");
    assert_eq!(lines.last(), Some(&rule.as_str()));
}

#[test]
fn briefing_adds_a_pdf() {
    if !fonts::chart_fonts_available() {
        eprintln!("Skipping briefing_adds_a_pdf: {SKIP_REASON}");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RenderConfig::new()
        .with_output_dir(dir.path())
        .with_dpi(20)
        .with_briefing(true);

    let written = app::run(&config, &mut Vec::new()).expect("run");

    assert_eq!(written.len(), 6);
    let pdf = fs::read(dir.path().join("movienow_briefing.pdf")).expect("pdf");
    assert!(pdf.starts_with(b"%PDF-"));
}

#[test]
fn interactive_dashboard_needs_no_fonts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RenderConfig::new().with_output_dir(dir.path());

    let path = interactive::render(&movienow_charts::MovieNowData::sample(), &config)
        .expect("render html");

    assert_eq!(path, dir.path().join(interactive::FILE_NAME));
    let html = fs::read_to_string(&path).expect("html");
    assert!(html.contains(interactive::TITLE));
    assert!(html.contains("\"Customer Segments\""));
}
