//! Interactive HTML dashboard rendered by plotly.js.
//!
//! The figure is described with `serde` types mirroring the plotly.js JSON
//! schema and embedded in a standalone page that loads plotly.js from its CDN.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use log::info;
use serde::Serialize;

use crate::config::RenderConfig;
use crate::dataset::MovieNowData;
use crate::error::{Result, VizError};

pub const FILE_NAME: &str = "interactive_dashboard.html";
pub const TITLE: &str = "MovieNow Business Intelligence Dashboard";

/// Pixel height of the figure.
pub const HEIGHT: u32 = 800;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const DIV_ID: &str = "movienow-dashboard";

const SUBPLOT_TITLES: [&str; 4] = [
    "Country Revenue Performance",
    "Genre Rating Distribution",
    "Customer Segments",
    "Monthly Trends",
];

// Grid geometry in paper coordinates: two columns and two rows with gaps.
const LEFT: [f64; 2] = [0.0, 0.45];
const RIGHT: [f64; 2] = [0.55, 1.0];
const TOP: [f64; 2] = [0.575, 1.0];
const BOTTOM: [f64; 2] = [0.0, 0.425];

/// One plotly.js trace.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Pie(PieTrace),
    Scatter(ScatterTrace),
}

#[derive(Clone, Debug, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub name: String,
    pub marker: MarkerStyle,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub name: String,
    pub showlegend: bool,
    pub domain: Domain,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScatterTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    pub line: LineStyle,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct MarkerStyle {
    pub color: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct LineStyle {
    pub color: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Domain {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f64; 2]>,
    pub anchor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub xref: String,
    pub yref: String,
    pub xanchor: String,
    pub yanchor: String,
    pub showarrow: bool,
    pub font: Font,
}

#[derive(Clone, Debug, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    pub showlegend: bool,
    pub annotations: Vec<Annotation>,
    #[serde(flatten)]
    pub axes: BTreeMap<String, Axis>,
}

/// A complete plotly.js figure.
#[derive(Clone, Debug, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

fn axis(domain: [f64; 2], anchor: &str) -> Axis {
    Axis {
        domain: Some(domain),
        anchor: anchor.to_owned(),
        ..Axis::default()
    }
}

fn titled(mut axis: Axis, text: &str) -> Axis {
    axis.title = Some(Title {
        text: text.to_owned(),
        x: None,
    });
    axis
}

fn subplot_title(text: &str, x: [f64; 2], y: [f64; 2]) -> Annotation {
    Annotation {
        text: text.to_owned(),
        x: (x[0] + x[1]) / 2.0,
        y: y[1],
        xref: "paper".to_owned(),
        yref: "paper".to_owned(),
        xanchor: "center".to_owned(),
        yanchor: "bottom".to_owned(),
        showarrow: false,
        font: Font { size: 16 },
    }
}

/// Builds the 2x2 dashboard: country revenue, genre rating, segment share and
/// monthly rentals with revenue on a secondary axis.
pub fn dashboard_figure(data: &MovieNowData) -> Figure {
    let countries = data.country_kpis();
    let genres = data.genre_performance();
    let segments = data.customer_segments();
    let trends = data.monthly_trends();
    let months: Vec<String> = trends
        .iter()
        .map(|month| month.month.format("%Y-%m-%d").to_string())
        .collect();

    let traces = vec![
        Trace::Bar(BarTrace {
            x: countries.iter().map(|kpi| kpi.country.to_owned()).collect(),
            y: countries
                .iter()
                .map(|kpi| f64::from(kpi.total_revenue))
                .collect(),
            name: "Revenue".to_owned(),
            marker: MarkerStyle {
                color: "lightblue".to_owned(),
            },
            xaxis: "x".to_owned(),
            yaxis: "y".to_owned(),
        }),
        Trace::Bar(BarTrace {
            x: genres.iter().map(|genre| genre.genre.to_owned()).collect(),
            y: genres.iter().map(|genre| genre.avg_rating).collect(),
            name: "Avg Rating".to_owned(),
            marker: MarkerStyle {
                color: "lightgreen".to_owned(),
            },
            xaxis: "x2".to_owned(),
            yaxis: "y2".to_owned(),
        }),
        Trace::Pie(PieTrace {
            labels: segments
                .iter()
                .map(|segment| segment.segment.to_owned())
                .collect(),
            values: segments
                .iter()
                .map(|segment| f64::from(segment.customer_count))
                .collect(),
            name: "Customer Segments".to_owned(),
            showlegend: false,
            domain: Domain {
                x: LEFT,
                y: BOTTOM,
            },
        }),
        Trace::Scatter(ScatterTrace {
            x: months.clone(),
            y: trends.iter().map(|month| month.rentals as f64).collect(),
            mode: "lines+markers".to_owned(),
            name: "Rentals".to_owned(),
            line: LineStyle {
                color: "blue".to_owned(),
            },
            xaxis: "x3".to_owned(),
            yaxis: "y3".to_owned(),
        }),
        Trace::Scatter(ScatterTrace {
            x: months,
            y: trends.iter().map(|month| month.revenue as f64).collect(),
            mode: "lines+markers".to_owned(),
            name: "Revenue".to_owned(),
            line: LineStyle {
                color: "red".to_owned(),
            },
            xaxis: "x3".to_owned(),
            yaxis: "y4".to_owned(),
        }),
    ];

    let mut axes = BTreeMap::new();
    axes.insert("xaxis".to_owned(), axis(LEFT, "y"));
    axes.insert("yaxis".to_owned(), axis(TOP, "x"));
    axes.insert("xaxis2".to_owned(), axis(RIGHT, "y2"));
    axes.insert("yaxis2".to_owned(), axis(TOP, "x2"));
    axes.insert("xaxis3".to_owned(), axis(RIGHT, "y3"));
    axes.insert("yaxis3".to_owned(), titled(axis(BOTTOM, "x3"), "Rentals"));
    axes.insert(
        "yaxis4".to_owned(),
        titled(
            Axis {
                anchor: "x3".to_owned(),
                overlaying: Some("y3".to_owned()),
                side: Some("right".to_owned()),
                ..Axis::default()
            },
            "Revenue ($)",
        ),
    );

    let cells = [(LEFT, TOP), (RIGHT, TOP), (LEFT, BOTTOM), (RIGHT, BOTTOM)];
    let annotations = SUBPLOT_TITLES
        .iter()
        .zip(cells)
        .map(|(text, (x, y))| subplot_title(text, x, y))
        .collect();

    Figure {
        data: traces,
        layout: Layout {
            title: Title {
                text: TITLE.to_owned(),
                x: Some(0.5),
            },
            height: HEIGHT,
            showlegend: true,
            annotations,
            axes,
        },
    }
}

/// Serializes `value` for embedding inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

impl Figure {
    /// Standalone HTML page displaying the figure.
    pub fn to_html(&self) -> Result<String> {
        let data = script_json(&self.data)?;
        let layout = script_json(&self.layout)?;
        Ok(format!(
            r#"<html>
<head><meta charset="utf-8" /><title>{title}</title></head>
<body>
<div id="{id}" class="plotly-graph-div" style="height:{height}px; width:100%;"></div>
<script src="{cdn}" charset="utf-8"></script>
<script type="text/javascript">
Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#,
            title = TITLE,
            id = DIV_ID,
            height = HEIGHT,
            cdn = PLOTLY_CDN,
        ))
    }
}

/// Writes the interactive dashboard and returns its path.
pub fn render(data: &MovieNowData, config: &RenderConfig) -> Result<PathBuf> {
    let output_dir = &config.output_dir;
    fs::create_dir_all(output_dir).map_err(|err| VizError::io(output_dir, err))?;

    let html = dashboard_figure(data).to_html()?;
    let path = config.output_path(FILE_NAME);
    fs::write(&path, html).map_err(|err| VizError::io(&path, err))?;
    info!("Saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn figure_json() -> Value {
        serde_json::to_value(dashboard_figure(&MovieNowData::sample())).expect("serialize")
    }

    #[test]
    fn figure_has_five_traces_of_expected_types() {
        let json = figure_json();
        let types: Vec<&str> = json["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|trace| trace["type"].as_str().expect("type"))
            .collect();
        assert_eq!(types, vec!["bar", "bar", "pie", "scatter", "scatter"]);
    }

    #[test]
    fn revenue_uses_secondary_axis() {
        let json = figure_json();
        assert_eq!(json["data"][4]["yaxis"], "y4");
        assert_eq!(json["layout"]["yaxis4"]["overlaying"], "y3");
        assert_eq!(json["layout"]["yaxis4"]["side"], "right");
        assert_eq!(json["layout"]["yaxis4"]["title"]["text"], "Revenue ($)");
        assert_eq!(json["layout"]["yaxis3"]["title"]["text"], "Rentals");
    }

    #[test]
    fn layout_is_centered_and_tall() {
        let json = figure_json();
        assert_eq!(json["layout"]["title"]["text"], TITLE);
        assert_eq!(json["layout"]["title"]["x"], 0.5);
        assert_eq!(json["layout"]["height"], 800);
        assert_eq!(json["layout"]["showlegend"], true);
        assert_eq!(json["layout"]["annotations"].as_array().map(Vec::len), Some(4));
    }

    #[test]
    fn pie_hides_its_legend() {
        let json = figure_json();
        assert_eq!(json["data"][2]["showlegend"], false);
        assert_eq!(json["data"][2]["values"][2], 1420.0);
    }

    #[test]
    fn months_are_serialized_as_dates() {
        let json = figure_json();
        assert_eq!(json["data"][3]["x"][0], "2018-01-31");
        assert_eq!(json["data"][3]["x"][23], "2019-12-31");
    }

    #[test]
    fn html_embeds_plotly_call() {
        let html = dashboard_figure(&MovieNowData::sample())
            .to_html()
            .expect("html");
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("Plotly.newPlot(\"movienow-dashboard\""));
        assert!(!html.contains("</script><"));
    }
}
