use std::path::Path;

use movienow_charts::fonts;
use movienow_charts::reports::{country, genre, segments, temporal};
use movienow_charts::style::{self, StyleSheet};
use movienow_charts::{MovieNowData, RenderConfig};
use sha2::{Digest, Sha256};

const LOW_DPI: u32 = 30;

const SKIP_REASON: &str = "no chart font found. Set MOVIENOW_FONTS_DIR or copy assets/fonts next to the binary.";

fn config(dir: &Path) -> RenderConfig {
    RenderConfig::new().with_output_dir(dir).with_dpi(LOW_DPI)
}

fn digest(path: &Path) -> [u8; 32] {
    let bytes = std::fs::read(path).expect("read png");
    Sha256::digest(&bytes).into()
}

#[test]
fn dashboards_have_figure_proportions() {
    if !fonts::chart_fonts_available() {
        eprintln!("Skipping dashboards_have_figure_proportions: {SKIP_REASON}");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let config = config(dir.path());
    let data = MovieNowData::sample();
    let sheet = style::resolve(&config.style).sheet;

    let paths = [
        country::render(&data, &config, sheet).expect("country"),
        genre::render(&data, &config, sheet).expect("genre"),
        segments::render(&data, &config, sheet).expect("segments"),
        temporal::render(&data, &config, sheet).expect("temporal"),
    ];

    for path in &paths {
        let (width, height) = image::image_dimensions(path).expect("png header");
        assert_eq!((width, height), (16 * LOW_DPI, 12 * LOW_DPI), "{}", path.display());
    }
}

#[test]
fn rendering_is_deterministic() {
    if !fonts::chart_fonts_available() {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_REASON}");
        return;
    }
    let data = MovieNowData::sample();
    let sheet = style::resolve(style::PREFERRED_STYLE).sheet;

    let first_dir = tempfile::tempdir().expect("temp dir");
    let second_dir = tempfile::tempdir().expect("temp dir");
    let first = temporal::render(&data, &config(first_dir.path()), sheet).expect("first");
    let second = temporal::render(&data, &config(second_dir.path()), sheet).expect("second");

    assert_eq!(
        digest(&first),
        digest(&second),
        "PNG renders must be byte-identical across runs"
    );
}

#[test]
fn output_directory_is_created() {
    if !fonts::chart_fonts_available() {
        eprintln!("Skipping output_directory_is_created: {SKIP_REASON}");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let nested = dir.path().join("nested/output");
    let path = country::render(
        &MovieNowData::sample(),
        &config(&nested),
        style::resolve(style::DEFAULT_STYLE).sheet,
    )
    .expect("render");
    assert_eq!(path, nested.join(country::FILE_NAME));
    assert!(path.is_file());
}

#[test]
fn panel_background_reaches_the_plot() {
    if !fonts::chart_fonts_available() {
        eprintln!("Skipping panel_background_reaches_the_plot: {SKIP_REASON}");
        return;
    }
    let gray = style::lookup(style::PREFERRED_STYLE).expect("built-in sheet");
    let white: &'static StyleSheet = Box::leak(Box::new(StyleSheet {
        panel_background: gray.background,
        ..gray.clone()
    }));
    assert_ne!(gray.panel_background, white.panel_background);

    let data = MovieNowData::sample();
    let gray_dir = tempfile::tempdir().expect("temp dir");
    let white_dir = tempfile::tempdir().expect("temp dir");
    let gray_png = country::render(&data, &config(gray_dir.path()), gray).expect("gray");
    let white_png = country::render(&data, &config(white_dir.path()), white).expect("white");

    assert_ne!(
        digest(&gray_png),
        digest(&white_png),
        "panel background must change the rendered pixels"
    );

    let pixels = image::open(&gray_png).expect("decode").to_rgb8();
    let expected = gray.panel_background;
    assert!(
        pixels
            .pixels()
            .any(|pixel| pixel.0 == [expected.0, expected.1, expected.2]),
        "no pixel carries the panel background"
    );
}
