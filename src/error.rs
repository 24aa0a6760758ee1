//! Error type shared by the dataset, statistics and rendering layers.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can occur while deriving statistics or writing chart artifacts.
#[derive(Debug)]
pub enum VizError {
    /// Creating the output directory or writing an artifact failed.
    Io {
        /// The file or directory that was being written.
        path: PathBuf,
        /// The underlying operating system error.
        source: io::Error,
    },
    /// The plotting backend reported a failure while drawing a figure.
    Drawing(String),
    /// No usable font could be located or registered with the rasterizer.
    Font(String),
    /// A statistic was requested over data it is undefined for.
    Degenerate {
        /// Name of the offending column.
        column: String,
        /// Description of the problem.
        reason: &'static str,
    },
    /// The interactive figure could not be serialized.
    Json(serde_json::Error),
    /// A dashboard image could not be decoded for the briefing.
    Image {
        /// The image that was being read.
        path: PathBuf,
        /// The decoder error.
        source: image::ImageError,
    },
    /// The briefing document could not be assembled or rendered.
    Pdf(printpdf::Error),
    /// No built-in style sheet carries the requested name.
    UnknownStyle(String),
}

impl VizError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn degenerate(column: impl Into<String>, reason: &'static str) -> Self {
        Self::Degenerate {
            column: column.into(),
            reason,
        }
    }
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, .. } => write!(f, "Failed to write {}", path.display()),
            Self::Drawing(message) => write!(f, "Failed to draw chart: {message}"),
            Self::Font(message) => write!(f, "Font setup failed: {message}"),
            Self::Degenerate { column, reason } => {
                write!(f, "Cannot summarise column '{column}': {reason}")
            }
            Self::Json(err) => write!(f, "Failed to serialize interactive figure: {err}"),
            Self::Image { path, .. } => write!(f, "Failed to decode {}", path.display()),
            Self::Pdf(err) => write!(f, "Failed to render briefing PDF: {err}"),
            Self::UnknownStyle(name) => write!(f, "Style '{name}' is not available"),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Image { source, .. } => Some(source),
            Self::Pdf(err) => Some(err),
            Self::Drawing(_) | Self::Font(_) | Self::Degenerate { .. } | Self::UnknownStyle(_) => {
                None
            }
        }
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<printpdf::Error> for VizError {
    fn from(err: printpdf::Error) -> Self {
        Self::Pdf(err)
    }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for VizError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::Drawing(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = VizError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_error_exposes_source_and_path() {
        let err = VizError::io(
            "visualizations/out.png",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to write visualizations/out.png");
        assert_eq!(err.source().map(|s| s.to_string()), Some("denied".into()));
    }

    #[test]
    fn degenerate_error_names_column() {
        let err = VizError::degenerate("avg_rating", "all values are equal");
        assert!(err.to_string().contains("avg_rating"));
        assert!(err.source().is_none());
    }
}
