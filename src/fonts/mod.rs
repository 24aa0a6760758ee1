//! Font discovery and registration for the chart rasterizer.
//!
//! Text in the PNG dashboards is rasterized by `plotters` through `ab_glyph`,
//! which needs the raw bytes of a TrueType font.  Fonts are looked up in the
//! bundled `assets/fonts` directory first (overridable through
//! `MOVIENOW_FONTS_DIR`) and then in well-known system font directories.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use plotters::style::{register_font, FontStyle};

use crate::error::{Result, VizError};

/// Family name every chart text style refers to.
pub const CHART_FONT_FAMILY: &str = "sans-serif";

/// Environment variable that overrides the bundled font directory.
pub const FONTS_DIR_ENV: &str = "MOVIENOW_FONTS_DIR";

/// Environment variable that overrides the system font directory.
pub const SYSTEM_FONTS_DIR_ENV: &str = "MOVIENOW_SYSTEM_FONTS_DIR";

const BUNDLED_REGULAR: &str = "DejaVuSans.ttf";
const BUNDLED_BOLD: &str = "DejaVuSans-Bold.ttf";

/// Regular/bold file name pairs probed inside system font directories.
const SYSTEM_FONT_PAIRS: &[(&str, &str)] = &[
    ("DejaVuSans.ttf", "DejaVuSans-Bold.ttf"),
    ("LiberationSans-Regular.ttf", "LiberationSans-Bold.ttf"),
    ("Arial.ttf", "Arial Bold.ttf"),
    ("arial.ttf", "arialbd.ttf"),
];

const SYSTEM_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/dejavu-sans-fonts",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/liberation-sans",
    "/usr/local/share/fonts",
    "/System/Library/Fonts/Supplemental",
    "/Library/Fonts",
];

/// Where the resolved font files came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// The bundled `assets/fonts` directory or [`FONTS_DIR_ENV`].
    Bundled,
    /// A system font directory.
    System,
}

/// Font files used for chart text.
#[derive(Clone, Debug)]
pub struct FontFiles {
    pub regular: PathBuf,
    /// Bold face; titles fall back to the regular face when absent.
    pub bold: Option<PathBuf>,
    pub origin: FontOrigin,
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_ENV) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn resolve_bundled_fonts() -> Result<FontFiles> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let regular = candidate.join(BUNDLED_REGULAR);
        if regular.is_file() {
            let bold = candidate.join(BUNDLED_BOLD);
            return Ok(FontFiles {
                regular,
                bold: bold.is_file().then_some(bold),
                origin: FontOrigin::Bundled,
            });
        }
        let reason = if candidate.is_dir() {
            format!("missing {}", BUNDLED_REGULAR)
        } else {
            "directory missing".to_owned()
        };
        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(VizError::Font(format!(
        "Unable to locate bundled fonts. Checked: {}. Copy {} into assets/fonts or set {}.",
        attempts.join(", "),
        BUNDLED_REGULAR,
        FONTS_DIR_ENV
    )))
}

fn system_font_directories() -> Vec<PathBuf> {
    let mut directories = Vec::new();

    if let Some(path) = env_path(SYSTEM_FONTS_DIR_ENV) {
        directories.push(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                directories.push(root.join("Fonts"));
            }
        }
    }

    if let Some(home) = env_path("HOME") {
        directories.push(home.join(".local/share/fonts"));
    }

    directories.extend(SYSTEM_FONT_DIRECTORIES.iter().map(PathBuf::from));
    directories
}

fn find_pair(directory: &Path) -> Option<FontFiles> {
    SYSTEM_FONT_PAIRS.iter().find_map(|(regular, bold)| {
        let regular = directory.join(regular);
        if !regular.is_file() {
            return None;
        }
        let bold = directory.join(bold);
        Some(FontFiles {
            regular,
            bold: bold.is_file().then_some(bold),
            origin: FontOrigin::System,
        })
    })
}

fn resolve_system_fonts() -> Result<FontFiles> {
    let directories = system_font_directories();
    directories
        .iter()
        .filter(|directory| directory.is_dir())
        .find_map(|directory| find_pair(directory))
        .ok_or_else(|| {
            let checked = directories
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            VizError::Font(format!("No system sans-serif font found. Checked: {checked}"))
        })
}

/// Locates chart fonts, falling back from the bundled directory to system fonts.
pub fn resolve_font_files() -> Result<FontFiles> {
    match resolve_bundled_fonts() {
        Ok(files) => Ok(files),
        Err(bundled_err) => match resolve_system_fonts() {
            Ok(files) => {
                warn!(
                    "Bundled fonts unavailable ({}); falling back to system font {}.",
                    bundled_err,
                    files.regular.display()
                );
                Ok(files)
            }
            Err(system_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); system fallback failed: {}",
                    bundled_err, system_err
                );
                Err(VizError::Font(format!(
                    "Bundled fonts unavailable and system fallback failed: {system_err}"
                )))
            }
        },
    }
}

fn leak_font(path: &Path) -> std::result::Result<&'static [u8], String> {
    let bytes = fs::read(path).map_err(|err| format!("{}: {}", path.display(), err))?;
    Ok(Box::leak(bytes.into_boxed_slice()))
}

fn register(files: &FontFiles) -> std::result::Result<(), String> {
    let regular = leak_font(&files.regular)?;
    register_font(CHART_FONT_FAMILY, FontStyle::Normal, regular)
        .map_err(|_| format!("{} is not a valid TrueType font", files.regular.display()))?;

    if let Some(bold_path) = &files.bold {
        let bold = leak_font(bold_path)?;
        register_font(CHART_FONT_FAMILY, FontStyle::Bold, bold)
            .map_err(|_| format!("{} is not a valid TrueType font", bold_path.display()))?;
    }

    debug!(
        "Registered chart font {} ({:?})",
        files.regular.display(),
        files.origin
    );
    Ok(())
}

static INSTALLED: OnceLock<std::result::Result<FontFiles, String>> = OnceLock::new();

/// Resolves and registers the chart fonts once per process.
///
/// Later calls return the outcome of the first attempt.
pub fn install_chart_fonts() -> Result<&'static FontFiles> {
    let outcome = INSTALLED.get_or_init(|| {
        let files = resolve_font_files().map_err(|err| err.to_string())?;
        register(&files)?;
        Ok(files)
    });
    outcome
        .as_ref()
        .map_err(|message| VizError::Font(message.clone()))
}

/// Indicates whether a chart font can be located on this machine.
pub fn chart_fonts_available() -> bool {
    resolve_font_files().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_directory_is_always_a_candidate() {
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
        assert!(font_directory_candidates().contains(&manifest));
    }

    #[test]
    fn find_pair_ignores_directories_without_fonts() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(find_pair(dir.path()).is_none());
    }

    #[test]
    fn find_pair_accepts_regular_without_bold() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("LiberationSans-Regular.ttf"), b"stub").expect("write");
        let files = find_pair(dir.path()).expect("pair found");
        assert!(files.regular.ends_with("LiberationSans-Regular.ttf"));
        assert!(files.bold.is_none());
        assert_eq!(files.origin, FontOrigin::System);
    }
}
