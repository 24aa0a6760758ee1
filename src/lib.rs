//! Business-intelligence dashboards for the MovieNow rental sample data.
//!
//! [`app::run`] renders four PNG dashboards with `plotters`, an interactive
//! plotly.js page and, on request, a PDF briefing bundling the dashboards.

pub mod app;
pub mod briefing;
pub mod charts;
pub mod config;
pub mod dataset;
pub mod error;
pub mod figure;
pub mod fonts;
pub mod interactive;
pub mod reports;
pub mod stats;
pub mod style;

pub use config::RenderConfig;
pub use dataset::MovieNowData;
pub use error::{Result, VizError};
