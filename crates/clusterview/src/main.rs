//! clusterview: assign points to precomputed k-means centroids and plot
//! the clusters with their convex hulls.
//!
//! Reads a centroid file and a point file (two integers per line, an
//! optional header line), assigns every point to its nearest centroid,
//! and writes the plot as SVG (and optionally PNG). Per-stage
//! diagnostics are printed to stdout.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin clusterview -- [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use clusterview_pipeline::diagnostics::{Clock, process_with_diagnostics};
use clusterview_pipeline::{InputKind, PipelineError, RenderConfig};

/// Assign points to k-means centroids and plot the resulting clusters.
///
/// Every point goes to its nearest centroid (ties go to the lowest
/// centroid index). Each cluster is drawn in its own color with a dashed
/// convex-hull outline; centroids are marked and labelled `C1`, `C2`, ...
#[derive(Parser)]
#[command(name = "clusterview", version)]
struct Cli {
    /// Centroid file: one `x y` pair per line.
    #[arg(long, default_value = PlotPaths::DEFAULT_CENTROIDS)]
    centroids: PathBuf,

    /// Point file: one `x y` pair per line.
    #[arg(long, default_value = PlotPaths::DEFAULT_POINTS)]
    points: PathBuf,

    /// Write the SVG plot to this file.
    #[arg(long, default_value = "clusters.svg")]
    svg: PathBuf,

    /// Also write a PNG preview (geometry only, no text) to this file.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = RenderConfig::DEFAULT_WIDTH, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = RenderConfig::DEFAULT_HEIGHT, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    height: u32,

    /// Header line skipped in the centroid file.
    #[arg(long, default_value = RenderConfig::DEFAULT_CENTROID_HEADER)]
    centroid_header: String,

    /// Header line skipped in the point file.
    #[arg(long, default_value = RenderConfig::DEFAULT_POINT_HEADER)]
    point_header: String,

    /// Disable the background grid.
    #[arg(long)]
    no_grid: bool,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full render config as a JSON string.
    ///
    /// When provided, all other render parameter flags are ignored.
    /// The JSON must be a valid `RenderConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Locations of the two input files.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlotPaths {
    centroids: PathBuf,
    points: PathBuf,
}

impl PlotPaths {
    const DEFAULT_CENTROIDS: &'static str = "centroids.txt";
    const DEFAULT_POINTS: &'static str = "points.txt";

    /// The file a given input kind is read from.
    fn path_for(&self, kind: InputKind) -> &Path {
        match kind {
            InputKind::Centroids => &self.centroids,
            InputKind::Points => &self.points,
        }
    }
}

/// Build a [`RenderConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<RenderConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(RenderConfig {
        centroid_header: cli.centroid_header.clone(),
        point_header: cli.point_header.clone(),
        width: cli.width,
        height: cli.height,
        show_grid: !cli.no_grid,
        ..RenderConfig::default()
    })
}

fn paths_from_cli(cli: &Cli) -> PlotPaths {
    PlotPaths {
        centroids: cli.centroids.clone(),
        points: cli.points.clone(),
    }
}

/// User-facing message for an input file without a single valid line.
fn empty_input_message(kind: InputKind, paths: &PlotPaths) -> String {
    format!(
        "No {kind} found. Please check {}.",
        paths.path_for(kind).display()
    )
}

fn read_input(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Error reading {}: {e}", path.display()))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let paths = paths_from_cli(&cli);

    let (centroid_text, point_text) =
        match read_input(&paths.centroids).and_then(|c| Ok((c, read_input(&paths.points)?))) {
            Ok(texts) => texts,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        };

    eprintln!(
        "Centroids: {} ({} bytes)",
        paths.centroids.display(),
        centroid_text.len(),
    );
    eprintln!(
        "Points: {} ({} bytes)",
        paths.points.display(),
        point_text.len(),
    );
    eprintln!();

    let (scene, diagnostics) =
        match process_with_diagnostics(&centroid_text, &point_text, &config, &StdClock) {
            Ok(result) => result,
            Err(PipelineError::EmptyInput(kind)) => {
                // Nothing to plot; not a failure.
                println!("{}", empty_input_message(kind, &paths));
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                eprintln!("Pipeline error: {e}");
                return ExitCode::FAILURE;
            }
        };

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", diagnostics.report());
    }

    let svg = clusterview_export::to_svg(&scene, &config);
    match std::fs::write(&cli.svg, &svg) {
        Ok(()) => {
            eprintln!("SVG written to {} ({} bytes)", cli.svg.display(), svg.len());
        }
        Err(e) => {
            eprintln!("Error writing SVG to {}: {e}", cli.svg.display());
            return ExitCode::FAILURE;
        }
    }

    if let Some(ref png_path) = cli.png {
        let png = match clusterview_export::to_png(&scene, &config) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Error rendering PNG: {e}");
                return ExitCode::FAILURE;
            }
        };
        match std::fs::write(png_path, &png) {
            Ok(()) => {
                eprintln!("PNG written to {} ({} bytes)", png_path.display(), png.len());
            }
            Err(e) => {
                eprintln!("Error writing PNG to {}: {e}", png_path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
