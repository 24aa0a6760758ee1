use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::Parser;
use movienow_charts::config::{DEFAULT_DPI, DEFAULT_OUTPUT_DIR};
use movienow_charts::style::PREFERRED_STYLE;
use movienow_charts::{app, RenderConfig};

/// Generates the MovieNow business-intelligence dashboards.
///
/// Chart text needs a TrueType font: place one under `assets/fonts`, point
/// `MOVIENOW_FONTS_DIR` at a directory holding one, or rely on the system
/// font directories.
#[derive(Parser)]
#[command(author, version, about = "MovieNow business-intelligence charts")]
struct Cli {
    /// Directory the dashboards are written to.
    #[arg(long, env = "MOVIENOW_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Resolution of the PNG dashboards.
    #[arg(long, env = "MOVIENOW_DPI", default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Preferred chart style; falls back to "seaborn", then "default".
    #[arg(long, env = "MOVIENOW_STYLE", default_value = PREFERRED_STYLE)]
    style: String,

    /// Print the built-in styles and exit.
    #[arg(long)]
    list_styles: bool,

    /// Also bundle the dashboards into a PDF briefing.
    #[arg(long)]
    briefing: bool,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig::new()
            .with_output_dir(&self.output_dir)
            .with_dpi(self.dpi)
            .with_style(self.style.as_str())
            .with_briefing(self.briefing)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = if cli.list_styles {
        app::list_styles(&mut out)
    } else {
        app::run(&cli.render_config(), &mut out).map(|written| {
            log::info!("Wrote {} artifacts", written.len());
        })
    }
    .and_then(|()| app::flush(&mut out));

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
