//! Optional PDF briefing bundling the rendered dashboards.
//!
//! The document has a cover page followed by one landscape page per
//! dashboard. Every page carries a running header and a bookmark; figures are
//! downscaled before embedding so the PDF stays small.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use log::{debug, info};
use printpdf::{
    BuiltinFont, Color, Image, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point,
    Rgb,
};

use crate::error::{Result, VizError};

pub const FILE_NAME: &str = "movienow_briefing.pdf";

const MM_PER_INCH: f64 = 25.4;
const MM_PER_POINT: f64 = MM_PER_INCH / 72.0;

/// Longest edge, in pixels, of an embedded figure.
const MAX_EMBED_PX: u32 = 2400;

/// A4 in landscape orientation.
const A4_LANDSCAPE: (f64, f64) = (297.0, 210.0);

type HeaderFactory = dyn Fn(usize) -> String;

/// Page margins in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Margins {
    top: f64,
    right: f64,
    bottom: f64,
    left: f64,
}

impl Margins {
    fn uniform(mm: f64) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(15.0)
    }
}

/// A dashboard image and the caption printed beneath it.
#[derive(Clone, Debug)]
pub struct Figure {
    pub caption: String,
    pub path: PathBuf,
}

impl Figure {
    pub fn new(caption: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            caption: caption.into(),
            path: path.into(),
        }
    }
}

/// Placement of an image scaled to fit a box while keeping its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Resolution that makes the pixel data cover exactly `width_mm`.
    pub dpi: f64,
}

/// Scales a `px_width` x `px_height` image to the largest size fitting in
/// `max_width_mm` x `max_height_mm`.
pub fn fit_within(px_width: u32, px_height: u32, max_width_mm: f64, max_height_mm: f64) -> Fit {
    let px_width = f64::from(px_width.max(1));
    let px_height = f64::from(px_height.max(1));
    let scale = (max_width_mm / px_width).min(max_height_mm / px_height);
    let width_mm = px_width * scale;
    Fit {
        width_mm,
        height_mm: px_height * scale,
        dpi: MM_PER_INCH * px_width / width_mm,
    }
}

/// Pixel size after capping the longest edge at `max_edge`.
pub fn downscaled_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let scaled = |value: u32| ((f64::from(value) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

fn decode(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path).map_err(|source| VizError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let (width, height) = downscaled_size(image.width(), image.height(), MAX_EMBED_PX);
    let image = if (width, height) == image.dimensions() {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };
    // The PDF image stream carries no alpha channel.
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

fn gray(level: f64) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn rule(layer: &PdfLayerReference, y: f64, left: f64, right: f64) {
    layer.set_outline_color(gray(0.6));
    layer.set_outline_thickness(0.5);
    layer.add_shape(Line {
        points: vec![
            (Point::new(Mm(left), Mm(y)), false),
            (Point::new(Mm(right), Mm(y)), false),
        ],
        is_closed: false,
        has_fill: false,
        has_stroke: true,
        is_clipping_path: false,
    });
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Builder for the briefing document.
pub struct BriefingBuilder {
    title: String,
    subtitle: Option<String>,
    paper_size: (f64, f64),
    margins: Margins,
    header: Option<Box<HeaderFactory>>,
    figures: Vec<Figure>,
}

impl BriefingBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            paper_size: A4_LANDSCAPE,
            margins: Margins::default(),
            header: None,
            figures: Vec::new(),
        }
    }

    /// Line printed under the title on the cover page.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Configures the header text for every page after the cover. The
    /// callback receives the 1-based page number.
    pub fn with_header<F>(mut self, header: F) -> Self
    where
        F: Fn(usize) -> String + 'static,
    {
        self.header = Some(Box::new(header));
        self
    }

    pub fn add_figure(mut self, figure: Figure) -> Self {
        self.figures.push(figure);
        self
    }

    /// Number of pages the document will have.
    pub fn page_count(&self) -> usize {
        1 + self.figures.len()
    }

    /// Renders the document to `path`.
    pub fn write_to(self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        let (width, height) = self.paper_size;
        let (document, cover_page, cover_layer) =
            PdfDocument::new(self.title.as_str(), Mm(width), Mm(height), "Cover");
        let fonts = Fonts {
            regular: document.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: document.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };

        let cover = document.get_page(cover_page).get_layer(cover_layer);
        self.draw_cover(&cover, &fonts);
        document.add_bookmark(self.title.as_str(), cover_page);

        let page_count = self.page_count();
        for (index, figure) in self.figures.iter().enumerate() {
            let page_number = index + 2;
            let (page, layer) = document.add_page(Mm(width), Mm(height), figure.caption.as_str());
            let layer = document.get_page(page).get_layer(layer);
            self.draw_header(&layer, &fonts, page_number, page_count);
            self.draw_figure(&layer, &fonts, figure, index + 1)?;
            document.add_bookmark(figure.caption.as_str(), page);
        }

        let file = File::create(path).map_err(|err| VizError::io(path, err))?;
        document.save(&mut BufWriter::new(file))?;
        info!("Saved {}", path.display());
        Ok(path.to_path_buf())
    }

    fn draw_cover(&self, layer: &PdfLayerReference, fonts: &Fonts) {
        let (_, height) = self.paper_size;
        let left = self.margins.left;
        let title_y = height * 0.6;

        layer.set_fill_color(gray(0.1));
        layer.use_text(self.title.as_str(), 28.0, Mm(left), Mm(title_y), &fonts.bold);
        rule(layer, title_y - 6.0, left, self.paper_size.0 - self.margins.right);

        if let Some(subtitle) = &self.subtitle {
            layer.set_fill_color(gray(0.35));
            layer.use_text(
                subtitle.as_str(),
                14.0,
                Mm(left),
                Mm(title_y - 16.0),
                &fonts.regular,
            );
        }

        layer.set_fill_color(gray(0.35));
        for (index, figure) in self.figures.iter().enumerate() {
            let line = format!("{}. {}", index + 1, figure.caption);
            let y = title_y - 34.0 - 8.0 * index as f64;
            layer.use_text(line, 12.0, Mm(left + 4.0), Mm(y), &fonts.regular);
        }
    }

    fn draw_header(
        &self,
        layer: &PdfLayerReference,
        fonts: &Fonts,
        page_number: usize,
        page_count: usize,
    ) {
        let (width, height) = self.paper_size;
        let baseline = height - self.margins.top;
        let text = match &self.header {
            Some(header) => header(page_number),
            None => self.title.clone(),
        };

        layer.set_fill_color(gray(0.35));
        layer.use_text(text, 10.0, Mm(self.margins.left), Mm(baseline), &fonts.regular);
        layer.use_text(
            format!("Page {page_number} of {page_count}"),
            10.0,
            Mm(width - self.margins.right - 28.0),
            Mm(baseline),
            &fonts.regular,
        );
        rule(layer, baseline - 2.5, self.margins.left, width - self.margins.right);
    }

    fn draw_figure(
        &self,
        layer: &PdfLayerReference,
        fonts: &Fonts,
        figure: &Figure,
        figure_number: usize,
    ) -> Result<()> {
        let (width, height) = self.paper_size;
        let caption_size = 11.0;
        let caption_height = caption_size * MM_PER_POINT + 6.0;
        let header_height = 10.0;

        let box_width = width - self.margins.left - self.margins.right;
        let box_height =
            height - self.margins.top - self.margins.bottom - header_height - caption_height;

        let image = decode(&figure.path)?;
        let fit = fit_within(image.width(), image.height(), box_width, box_height);
        debug!(
            "Embedding {} at {:.1}x{:.1} mm ({:.0} dpi)",
            figure.path.display(),
            fit.width_mm,
            fit.height_mm,
            fit.dpi
        );

        let x = self.margins.left + (box_width - fit.width_mm) / 2.0;
        let y = self.margins.bottom + caption_height;
        Image::from_dynamic_image(&image).add_to_layer(
            layer.clone(),
            Some(Mm(x)),
            Some(Mm(y)),
            None,
            None,
            None,
            Some(fit.dpi),
        );

        layer.set_fill_color(gray(0.1));
        layer.use_text(
            format!("Figure {figure_number}: {}", figure.caption),
            caption_size,
            Mm(x),
            Mm(self.margins.bottom + 2.0),
            &fonts.bold,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_keeps_aspect_ratio() {
        let fit = fit_within(4800, 3600, 267.0, 160.0);
        assert!((fit.height_mm - 160.0).abs() < 1e-9);
        assert!((fit.width_mm / fit.height_mm - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn fit_dpi_matches_physical_width() {
        let fit = fit_within(2400, 1800, 203.2, 1000.0);
        assert!((fit.width_mm - 203.2).abs() < 1e-9);
        assert!((fit.dpi - 300.0).abs() < 1e-9);
    }

    #[test]
    fn downscale_caps_longest_edge() {
        assert_eq!(downscaled_size(4800, 3600, 2400), (2400, 1800));
        assert_eq!(downscaled_size(3600, 4800, 2400), (1800, 2400));
        assert_eq!(downscaled_size(800, 600, 2400), (800, 600));
    }

    #[test]
    fn page_count_includes_cover() {
        let builder = BriefingBuilder::new("Briefing")
            .add_figure(Figure::new("One", "one.png"))
            .add_figure(Figure::new("Two", "two.png"));
        assert_eq!(builder.page_count(), 3);
    }

    #[test]
    fn missing_image_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing.png");
        let err = BriefingBuilder::new("Briefing")
            .add_figure(Figure::new("Missing", &missing))
            .write_to(dir.path().join(FILE_NAME))
            .expect_err("missing image");
        assert!(matches!(err, VizError::Image { ref path, .. } if *path == missing));
    }
}
