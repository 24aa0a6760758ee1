//! End-to-end generation run with its console transcript.

use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

use log::debug;

use crate::briefing::{self, BriefingBuilder, Figure};
use crate::config::RenderConfig;
use crate::dataset::{month_label, MovieNowData};
use crate::error::{Result, VizError};
use crate::interactive;
use crate::reports::{country, genre, segments, temporal};
use crate::style::{self, StyleSheet};

pub const SUCCESS_LINE: &str = "All visualizations generated successfully!";
pub const SUMMARY_TITLE: &str = "MOVIENOW BUSINESS INTELLIGENCE - SUMMARY STATS";

const RULE_WIDTH: usize = 50;

type StaticReport = fn(&MovieNowData, &RenderConfig, &'static StyleSheet) -> Result<PathBuf>;

/// The four PNG dashboards in generation order.
const STATIC_REPORTS: [(&str, StaticReport); 4] = [
    (country::TITLE, country::render),
    (genre::TITLE, genre::render),
    (segments::TITLE, segments::render),
    (temporal::TITLE, temporal::render),
];

/// Progress lines, one per artifact.
pub const STEPS: [&str; 5] = [
    "1. Creating Country Performance Dashboard...",
    "2. Creating Genre Analysis...",
    "3. Creating Customer Segmentation...",
    "4. Creating Temporal Analysis...",
    "5. Creating Interactive Dashboard...",
];

fn emit(out: &mut impl Write, line: impl Display) -> Result<()> {
    writeln!(out, "{line}").map_err(|err| VizError::io("<stdout>", err))
}

/// Flushes the transcript so a closed stdout surfaces as an error.
pub fn flush(out: &mut impl Write) -> Result<()> {
    out.flush().map_err(|err| VizError::io("<stdout>", err))
}

/// Writes `Available styles:` and one indented line per built-in style.
pub fn list_styles(out: &mut impl Write) -> Result<()> {
    emit(out, "Available styles:")?;
    for name in style::available_styles() {
        emit(out, format_args!("  - {name}"))?;
    }
    Ok(())
}

/// Generates every artifact and returns the written paths in order.
pub fn run(config: &RenderConfig, out: &mut impl Write) -> Result<Vec<PathBuf>> {
    let data = MovieNowData::sample();
    run_with_data(&data, config, out)
}

/// Like [`run`] but over caller-supplied data.
pub fn run_with_data(
    data: &MovieNowData,
    config: &RenderConfig,
    out: &mut impl Write,
) -> Result<Vec<PathBuf>> {
    let resolved = style::resolve(&config.style);
    debug!("Using style '{}'", resolved.sheet.name);
    if let Some(notice) = &resolved.notice {
        emit(out, notice)?;
    }

    emit(out, "Generating MovieNow Business Intelligence Visualizations...")?;

    let mut written = Vec::with_capacity(STEPS.len() + 1);
    let mut figures = Vec::with_capacity(STATIC_REPORTS.len());
    for (step, (title, render)) in STEPS.iter().zip(STATIC_REPORTS) {
        emit(out, step)?;
        let path = render(data, config, resolved.sheet)?;
        figures.push(Figure::new(title, &path));
        written.push(path);
    }

    emit(out, STEPS[4])?;
    let html = interactive::render(data, config)?;
    emit(
        out,
        format_args!("Interactive dashboard saved as '{}'", html.display()),
    )?;
    written.push(html);

    if config.briefing {
        let path = write_briefing(data, config, figures)?;
        written.push(path);
    }

    emit(out, format_args!("\n{SUCCESS_LINE}"))?;
    emit(
        out,
        format_args!("Files saved in '{}/' directory:", config.output_dir.display()),
    )?;
    for path in &written {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        emit(out, format_args!("- {name}"))?;
    }

    write_summary(data, out)?;
    Ok(written)
}

fn write_briefing(
    data: &MovieNowData,
    config: &RenderConfig,
    figures: Vec<Figure>,
) -> Result<PathBuf> {
    let months = data.monthly_trends();
    let period = match (months.first(), months.last()) {
        (Some(first), Some(last)) => format!(
            "Sample data, {} to {}",
            month_label(first.month),
            month_label(last.month)
        ),
        _ => "Sample data".to_owned(),
    };

    let builder = figures.into_iter().fold(
        BriefingBuilder::new("MovieNow Business Intelligence Briefing")
            .with_subtitle(period)
            .with_header(|_| "MovieNow Business Intelligence".to_owned()),
        BriefingBuilder::add_figure,
    );
    builder.write_to(config.output_path(briefing::FILE_NAME))
}

/// Writes the closing block of dataset counts.
pub fn write_summary(data: &MovieNowData, out: &mut impl Write) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let lines = [
        format!("\n{rule}"),
        SUMMARY_TITLE.to_owned(),
        rule.clone(),
        format!("Countries Analyzed: {}", data.country_kpis().len()),
        format!("Genres Analyzed: {}", data.genre_performance().len()),
        format!("Customer Segments: {}", data.customer_segments().len()),
        format!("Time Period: {} months", data.monthly_trends().len()),
        rule,
    ];
    for line in lines {
        emit(out, line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_dataset_counts() {
        let mut out = Vec::new();
        write_summary(&MovieNowData::sample(), &mut out).expect("summary");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], SUMMARY_TITLE);
        assert!(lines.contains(&"Countries Analyzed: 7"));
        assert!(lines.contains(&"Genres Analyzed: 7"));
        assert!(lines.contains(&"Customer Segments: 4"));
        let rule = "=".repeat(50);
        assert_eq!(lines[lines.len() - 2], "Time Period: 24 months");
        assert_eq!(lines.last(), Some(&rule.as_str()));
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn failed_flush_is_reported() {
        let err = flush(&mut ClosedPipe).expect_err("broken pipe");
        assert!(matches!(err, VizError::Io { ref source, .. }
            if source.kind() == std::io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn style_listing_names_every_sheet() {
        let mut out = Vec::new();
        list_styles(&mut out).expect("list");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("Available styles:\n"));
        assert!(text.contains("  - seaborn-v0_8\n"));
        assert!(text.contains("  - default\n"));
    }
}
