//! Shared types for the clusterview pipeline.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point with integer coordinates, as read from the input files.
///
/// Centroids use the same type; they differ only by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate (grows upward when plotted).
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Exact squared Euclidean distance to another point.
    ///
    /// Computed in `i128` so that any pair of `i32` coordinates is
    /// representable without overflow, which keeps tie detection exact.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i128 {
        let dx = i128::from(self.x) - i128::from(other.x);
        let dy = i128::from(self.y) - i128::from(other.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance(self, other: Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }

    /// Coordinates as `f64`, for geometry and rendering.
    #[must_use]
    pub fn to_f64(self) -> (f64, f64) {
        (f64::from(self.x), f64::from(self.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Assignment of points to clusters, keyed by centroid index.
///
/// Only centroid indices that received at least one point are present.
/// Iteration is in ascending centroid index, and each cluster keeps its
/// points in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition(BTreeMap<usize, Vec<Point>>);

impl Partition {
    /// Create an empty partition.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Append a point to the cluster of centroid `index`.
    pub fn push(&mut self, index: usize, point: Point) {
        self.0.entry(index).or_default().push(point);
    }

    /// Points assigned to centroid `index`, or `None` if it got none.
    #[must_use]
    pub fn cluster(&self, index: usize) -> Option<&[Point]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    /// Iterate over `(centroid index, points)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Point])> {
        self.0.iter().map(|(&index, points)| (index, points.as_slice()))
    }

    /// Number of non-empty clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no point was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of assigned points across all clusters.
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Cluster sizes in ascending centroid index order.
    #[must_use]
    pub fn sizes(&self) -> Vec<(usize, usize)> {
        self.0.iter().map(|(&index, points)| (index, points.len())).collect()
    }
}

/// Which of the two input files an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    /// The centroid file.
    Centroids,
    /// The point (dataset) file.
    Points,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Centroids => f.write_str("centroids"),
            Self::Points => f.write_str("points"),
        }
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// An input file yielded no valid coordinate lines.
    #[error("no {0} found")]
    EmptyInput(InputKind),

    /// The assigner was handed no centroids.
    #[error("invalid assignment input: {0}")]
    InvalidInput(String),

    /// Render configuration is invalid.
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for parsing and rendering.
///
/// Canvas and marker sizes are in output pixels. The defaults reproduce
/// a 12x10 inch figure at 100 dpi.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Header token that marks non-data lines in the centroid file.
    pub centroid_header: String,

    /// Header token that marks non-data lines in the point file.
    pub point_header: String,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Radius of a cluster member dot.
    pub point_radius: f64,

    /// Half-width of a centroid `X` marker.
    pub centroid_size: f64,

    /// Stroke width of cluster boundaries.
    pub boundary_width: f64,

    /// Fraction of the data extent added as margin on every side.
    pub padding_fraction: f64,

    /// Whether to draw the dashed background grid.
    pub show_grid: bool,
}

impl RenderConfig {
    /// Default centroid header token.
    pub const DEFAULT_CENTROID_HEADER: &'static str = "Centroids:";
    /// Default point header token.
    pub const DEFAULT_POINT_HEADER: &'static str = "Dataset:";
    /// Default canvas width.
    pub const DEFAULT_WIDTH: u32 = 1200;
    /// Default canvas height.
    pub const DEFAULT_HEIGHT: u32 = 1000;
    /// Default member dot radius.
    pub const DEFAULT_POINT_RADIUS: f64 = 4.0;
    /// Default centroid marker half-width.
    pub const DEFAULT_CENTROID_SIZE: f64 = 9.0;
    /// Default boundary stroke width.
    pub const DEFAULT_BOUNDARY_WIDTH: f64 = 2.0;
    /// Default margin fraction.
    pub const DEFAULT_PADDING_FRACTION: f64 = 0.05;

    /// Check the invariants the renderer relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if a header token is
    /// empty, the canvas has a zero dimension, or a size is not a
    /// positive finite number.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.centroid_header.trim().is_empty() || self.point_header.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "header tokens must not be empty".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        for (name, value) in [
            ("point_radius", self.point_radius),
            ("centroid_size", self.centroid_size),
            ("boundary_width", self.boundary_width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PipelineError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(self.padding_fraction.is_finite() && self.padding_fraction >= 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "padding_fraction must be non-negative, got {}",
                self.padding_fraction
            )));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            centroid_header: Self::DEFAULT_CENTROID_HEADER.to_string(),
            point_header: Self::DEFAULT_POINT_HEADER.to_string(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            point_radius: Self::DEFAULT_POINT_RADIUS,
            centroid_size: Self::DEFAULT_CENTROID_SIZE,
            boundary_width: Self::DEFAULT_BOUNDARY_WIDTH,
            padding_fraction: Self::DEFAULT_PADDING_FRACTION,
            show_grid: true,
        }
    }
}
