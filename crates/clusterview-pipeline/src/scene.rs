//! Renderable scene: everything an exporter needs to draw the plot.
//!
//! [`build_scene`] turns a [`Partition`] and the centroid list into
//! styled cluster layers (members, boundary, color) and centroid
//! markers. Exporters only translate the scene into a concrete format.

use serde::{Deserialize, Serialize};

use crate::hull::{Boundary, outline};
use crate::style::{Color, color_for};
use crate::types::{Partition, PipelineError, Point};

/// Plot title.
pub const TITLE: &str = "K-means Clustering Results with Convex Hulls";

/// Horizontal axis label.
pub const X_LABEL: &str = "X-coordinate";

/// Vertical axis label.
pub const Y_LABEL: &str = "Y-coordinate";

/// Legend text for the centroid marker.
pub const CENTROID_LEGEND: &str = "Centroids";

/// Axis-aligned bounding box of the plotted data, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x.
    pub min_x: i32,
    /// Smallest y.
    pub min_y: i32,
    /// Largest x.
    pub max_x: i32,
    /// Largest y.
    pub max_y: i32,
}

impl Bounds {
    /// Bounding box of `points`, or `None` if there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let init = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(iter.fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f64 {
        f64::from(self.max_x) - f64::from(self.min_x)
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f64 {
        f64::from(self.max_y) - f64::from(self.min_y)
    }
}

/// One cluster, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterLayer {
    /// Centroid index (0-based).
    pub index: usize,
    /// Display label, 1-based: `Cluster 1`, `Cluster 2`, ...
    pub label: String,
    /// Fill and stroke color.
    pub color: Color,
    /// Member points in assignment order.
    pub points: Vec<Point>,
    /// Outline to stroke (dashed).
    pub boundary: Boundary,
    /// Whether the hull degenerated and a fallback boundary is used.
    pub degenerate: bool,
}

/// One centroid marker with its annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CentroidMarker {
    /// Centroid index (0-based).
    pub index: usize,
    /// Marker position.
    pub position: Point,
    /// Annotation, 1-based: `C1`, `C2`, ...
    pub label: String,
}

/// A legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegendEntry<'a> {
    /// A cluster swatch.
    Cluster {
        /// Text shown next to the swatch.
        label: &'a str,
        /// Swatch color.
        color: Color,
    },
    /// The centroid marker.
    Centroids,
}

/// The complete plot description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Plot title.
    pub title: String,
    /// Horizontal axis label.
    pub x_label: String,
    /// Vertical axis label.
    pub y_label: String,
    /// Non-empty clusters in ascending centroid index order.
    pub clusters: Vec<ClusterLayer>,
    /// All centroids in input order.
    pub centroids: Vec<CentroidMarker>,
    /// Bounding box over every member point and centroid.
    pub bounds: Bounds,
}

impl Scene {
    /// Legend rows: one per cluster, then the centroid marker.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry<'_>> {
        self.clusters
            .iter()
            .map(|c| LegendEntry::Cluster {
                label: &c.label,
                color: c.color,
            })
            .chain(std::iter::once(LegendEntry::Centroids))
            .collect()
    }

    /// Number of clusters whose hull fell back to a degenerate outline.
    #[must_use]
    pub fn degenerate_count(&self) -> usize {
        self.clusters.iter().filter(|c| c.degenerate).count()
    }
}

/// Build the scene for a partition and its centroids.
///
/// Empty clusters are absent from the partition and produce no layer.
/// Collinear clusters never fail; they are drawn with a fallback
/// boundary and flagged `degenerate`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] if `centroids` is empty.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::{Point, assign, build_scene};
///
/// let centroids = vec![Point::new(0, 0), Point::new(10, 10)];
/// let points = vec![Point::new(1, 1), Point::new(9, 9)];
/// let partition = assign::assign(&centroids, &points).unwrap();
/// let scene = build_scene(&partition, &centroids).unwrap();
/// assert_eq!(scene.clusters[1].label, "Cluster 2");
/// assert_eq!(scene.centroids[0].label, "C1");
/// ```
pub fn build_scene(partition: &Partition, centroids: &[Point]) -> Result<Scene, PipelineError> {
    if centroids.is_empty() {
        return Err(PipelineError::InvalidInput(
            "no centroids to draw".to_string(),
        ));
    }
    let bounds = Bounds::from_points(
        centroids
            .iter()
            .chain(partition.iter().flat_map(|(_, points)| points.iter())),
    )
    .ok_or_else(|| PipelineError::InvalidInput("no centroids to draw".to_string()))?;

    let clusters = partition
        .iter()
        .map(|(index, points)| {
            let outline = outline(points);
            ClusterLayer {
                index,
                label: format!("Cluster {}", index + 1),
                color: color_for(index),
                points: points.to_vec(),
                boundary: outline.boundary,
                degenerate: outline.degenerate,
            }
        })
        .collect();

    let centroids = centroids
        .iter()
        .enumerate()
        .map(|(index, &position)| CentroidMarker {
            index,
            position,
            label: format!("C{}", index + 1),
        })
        .collect();

    Ok(Scene {
        title: TITLE.to_string(),
        x_label: X_LABEL.to_string(),
        y_label: Y_LABEL.to_string(),
        clusters,
        centroids,
        bounds,
    })
}
