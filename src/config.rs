//! Run configuration shared by every report generator.

use std::path::{Path, PathBuf};

use crate::style::PREFERRED_STYLE;

/// Directory the artifacts are written to when nothing else is configured.
pub const DEFAULT_OUTPUT_DIR: &str = "visualizations";

/// Resolution of the PNG dashboards.
pub const DEFAULT_DPI: u32 = 300;

/// Figure canvas width in inches.
pub const FIGURE_WIDTH_IN: f64 = 16.0;

/// Figure canvas height in inches.
pub const FIGURE_HEIGHT_IN: f64 = 12.0;

/// Settings for one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub output_dir: PathBuf,
    pub dpi: u32,
    /// Style requested first in the fallback chain.
    pub style: String,
    /// Also bundle the PNG dashboards into a PDF briefing.
    pub briefing: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dpi: DEFAULT_DPI,
            style: PREFERRED_STYLE.to_owned(),
            briefing: false,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Sets the raster resolution. Zero is raised to one.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(1);
        self
    }

    /// Sets the requested style name.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    /// Enables or disables the PDF briefing.
    pub fn with_briefing(mut self, briefing: bool) -> Self {
        self.briefing = briefing;
        self
    }

    /// Path of `file_name` inside the output directory.
    pub fn output_path(&self, file_name: impl AsRef<Path>) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Pixel size of the figure canvas at the configured resolution.
    pub fn canvas_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (FIGURE_WIDTH_IN * dpi).round() as u32,
            (FIGURE_HEIGHT_IN * dpi).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_output() {
        let config = RenderConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("visualizations"));
        assert_eq!(config.dpi, 300);
        assert_eq!(config.style, "seaborn-v0_8");
        assert!(!config.briefing);
    }

    #[test]
    fn canvas_is_sixteen_by_twelve_inches() {
        assert_eq!(RenderConfig::default().canvas_size(), (4800, 3600));
        assert_eq!(RenderConfig::new().with_dpi(50).canvas_size(), (800, 600));
    }

    #[test]
    fn zero_dpi_is_clamped() {
        assert_eq!(RenderConfig::new().with_dpi(0).dpi, 1);
    }

    #[test]
    fn output_path_joins_directory() {
        let config = RenderConfig::new().with_output_dir("out");
        assert_eq!(config.output_path("a.png"), PathBuf::from("out/a.png"));
    }
}
