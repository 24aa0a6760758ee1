//! Named style sheets, categorical palettes and continuous color maps.

use log::warn;
use plotters::style::RGBColor;

use crate::error::{Result, VizError};

/// Style requested when nothing else is configured.
pub const PREFERRED_STYLE: &str = "seaborn-v0_8";

/// Second choice when the requested style is unknown.
pub const SECONDARY_STYLE: &str = "seaborn";

/// Style that always exists.
pub const DEFAULT_STYLE: &str = "default";

/// Visual defaults applied to every panel of a figure.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSheet {
    pub name: &'static str,
    pub background: RGBColor,
    pub panel_background: RGBColor,
    pub grid: Option<RGBColor>,
    pub text: RGBColor,
    /// Colors cycled through for single-series lines and markers.
    pub cycle: &'static [RGBColor],
}

const HUSL: &[RGBColor] = &[
    RGBColor(246, 112, 136),
    RGBColor(206, 143, 49),
    RGBColor(150, 163, 49),
    RGBColor(50, 177, 101),
    RGBColor(53, 172, 164),
    RGBColor(56, 168, 197),
    RGBColor(163, 140, 244),
    RGBColor(244, 97, 221),
];

const TABLEAU: &[RGBColor] = &[
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

const CLASSIC: StyleSheet = StyleSheet {
    name: DEFAULT_STYLE,
    background: RGBColor(255, 255, 255),
    panel_background: RGBColor(255, 255, 255),
    grid: None,
    text: RGBColor(0, 0, 0),
    cycle: TABLEAU,
};

const STYLES: &[StyleSheet] = &[
    StyleSheet {
        name: PREFERRED_STYLE,
        background: RGBColor(255, 255, 255),
        panel_background: RGBColor(234, 234, 242),
        grid: Some(RGBColor(255, 255, 255)),
        text: RGBColor(38, 38, 38),
        cycle: HUSL,
    },
    StyleSheet {
        name: "seaborn",
        background: RGBColor(255, 255, 255),
        panel_background: RGBColor(255, 255, 255),
        grid: Some(RGBColor(224, 224, 224)),
        text: RGBColor(38, 38, 38),
        cycle: HUSL,
    },
    StyleSheet {
        name: "seaborn-dark",
        background: RGBColor(255, 255, 255),
        panel_background: RGBColor(234, 234, 242),
        grid: None,
        text: RGBColor(38, 38, 38),
        cycle: HUSL,
    },
    CLASSIC,
];

/// Names of every built-in style sheet.
pub fn available_styles() -> impl Iterator<Item = &'static str> {
    STYLES.iter().map(|style| style.name)
}

/// Looks up a built-in style sheet by name.
pub fn lookup(name: &str) -> Result<&'static StyleSheet> {
    STYLES
        .iter()
        .find(|style| style.name == name)
        .ok_or_else(|| VizError::UnknownStyle(name.to_owned()))
}

/// Outcome of resolving a requested style through the fallback chain.
#[derive(Clone, Debug)]
pub struct ResolvedStyle {
    pub sheet: &'static StyleSheet,
    /// Human-readable note when a fallback was used.
    pub notice: Option<String>,
}

/// Resolves `requested`, then [`SECONDARY_STYLE`], then [`DEFAULT_STYLE`].
pub fn resolve(requested: &str) -> ResolvedStyle {
    resolve_chain(requested, SECONDARY_STYLE)
}

/// Two-level fallback: `requested`, then `secondary`, then the default sheet.
pub fn resolve_chain(requested: &str, secondary: &str) -> ResolvedStyle {
    if let Ok(sheet) = lookup(requested) {
        return ResolvedStyle {
            sheet,
            notice: None,
        };
    }

    if let Ok(sheet) = lookup(secondary) {
        warn!("Style '{requested}' unavailable; using '{secondary}'");
        return ResolvedStyle {
            sheet,
            notice: None,
        };
    }

    warn!("Styles '{requested}' and '{secondary}' unavailable; using '{DEFAULT_STYLE}'");
    ResolvedStyle {
        sheet: &CLASSIC,
        notice: Some(
            "Note: Using default style. For better visuals, pick one from --list-styles."
                .to_owned(),
        ),
    }
}

/// Pastel colors used for the four customer segments.
pub const SEGMENT_COLORS: [RGBColor; 4] = [
    RGBColor(0xff, 0x99, 0x99),
    RGBColor(0x66, 0xb3, 0xff),
    RGBColor(0x99, 0xff, 0x99),
    RGBColor(0xff, 0xcc, 0x99),
];

pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);
pub const FOREST_GREEN: RGBColor = RGBColor(0, 128, 0);
pub const TREND_RED: RGBColor = RGBColor(214, 39, 40);
pub const GRAY: RGBColor = RGBColor(128, 128, 128);

/// Maps a position in `0.0..=1.0` to a color.
pub trait ColorScale {
    fn color_at(&self, t: f64) -> RGBColor;
}

/// Piecewise-linear color map defined by evenly spaced anchors.
#[derive(Clone, Copy, Debug)]
pub struct ColorMap {
    anchors: &'static [RGBColor],
}

impl ColorMap {
    /// Samples the map at `t`, clamped to `0.0..=1.0`.
    pub fn at(&self, t: f64) -> RGBColor {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let segments = self.anchors.len() - 1;
        let scaled = t * segments as f64;
        let index = (scaled.floor() as usize).min(segments - 1);
        let local = scaled - index as f64;
        lerp(self.anchors[index], self.anchors[index + 1], local)
    }

    /// `n` colors spread evenly across the whole map.
    pub fn sample(&self, n: usize) -> Vec<RGBColor> {
        match n {
            0 => Vec::new(),
            1 => vec![self.at(0.0)],
            _ => (0..n).map(|i| self.at(i as f64 / (n - 1) as f64)).collect(),
        }
    }

    /// The same anchors traversed from the other end.
    pub fn reversed(&self) -> ReversedColorMap {
        ReversedColorMap(*self)
    }
}

/// A [`ColorMap`] sampled from 1.0 down to 0.0.
#[derive(Clone, Copy, Debug)]
pub struct ReversedColorMap(ColorMap);

impl ReversedColorMap {
    pub fn at(&self, t: f64) -> RGBColor {
        self.0.at(1.0 - t)
    }
}

impl ColorScale for ColorMap {
    fn color_at(&self, t: f64) -> RGBColor {
        self.at(t)
    }
}

impl ColorScale for ReversedColorMap {
    fn color_at(&self, t: f64) -> RGBColor {
        self.at(t)
    }
}

fn lerp(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

pub const VIRIDIS: ColorMap = ColorMap {
    anchors: &[
        RGBColor(68, 1, 84),
        RGBColor(59, 82, 139),
        RGBColor(33, 145, 140),
        RGBColor(94, 201, 98),
        RGBColor(253, 231, 37),
    ],
};

pub const SET3: ColorMap = ColorMap {
    anchors: &[
        RGBColor(141, 211, 199),
        RGBColor(255, 255, 179),
        RGBColor(190, 186, 218),
        RGBColor(251, 128, 114),
        RGBColor(128, 177, 211),
        RGBColor(253, 180, 98),
        RGBColor(179, 222, 105),
        RGBColor(252, 205, 229),
        RGBColor(217, 217, 217),
    ],
};

pub const RED_YELLOW_GREEN: ColorMap = ColorMap {
    anchors: &[
        RGBColor(165, 0, 38),
        RGBColor(244, 109, 67),
        RGBColor(254, 224, 139),
        RGBColor(217, 239, 139),
        RGBColor(102, 189, 99),
        RGBColor(0, 104, 55),
    ],
};

pub const RED_YELLOW_BLUE: ColorMap = ColorMap {
    anchors: &[
        RGBColor(165, 0, 38),
        RGBColor(244, 109, 67),
        RGBColor(254, 224, 144),
        RGBColor(224, 243, 248),
        RGBColor(116, 173, 209),
        RGBColor(49, 54, 149),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_style_resolves_without_notice() {
        let resolved = resolve("seaborn-dark");
        assert_eq!(resolved.sheet.name, "seaborn-dark");
        assert!(resolved.notice.is_none());
    }

    #[test]
    fn unknown_style_falls_back_to_secondary() {
        let resolved = resolve("seaborn-whitegrid");
        assert_eq!(resolved.sheet.name, SECONDARY_STYLE);
        assert!(resolved.notice.is_none());
    }

    #[test]
    fn preferred_style_is_built_in() {
        assert_eq!(resolve(PREFERRED_STYLE).sheet.name, PREFERRED_STYLE);
    }

    #[test]
    fn exhausted_chain_uses_default_with_notice() {
        let resolved = resolve_chain("ggplot", "fivethirtyeight");
        assert_eq!(resolved.sheet.name, DEFAULT_STYLE);
        assert!(resolved.notice.expect("notice").starts_with("Note:"));
    }

    #[test]
    fn unknown_style_is_reported() {
        let err = lookup("ggplot").unwrap_err();
        assert_eq!(err.to_string(), "Style 'ggplot' is not available");
    }

    #[test]
    fn default_style_is_listed() {
        assert!(available_styles().any(|name| name == DEFAULT_STYLE));
    }

    #[test]
    fn color_map_hits_anchor_endpoints() {
        assert_eq!(VIRIDIS.at(0.0), RGBColor(68, 1, 84));
        assert_eq!(VIRIDIS.at(1.0), RGBColor(253, 231, 37));
        assert_eq!(VIRIDIS.at(2.0), VIRIDIS.at(1.0));
        assert_eq!(RED_YELLOW_BLUE.reversed().at(0.0), RGBColor(49, 54, 149));
    }

    #[test]
    fn sample_spreads_colors_evenly() {
        let colors = RED_YELLOW_GREEN.sample(3);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], RGBColor(165, 0, 38));
        assert_eq!(colors[2], RGBColor(0, 104, 55));
    }
}
