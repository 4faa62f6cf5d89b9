//! clusterview-pipeline: nearest-centroid assignment and cluster
//! outlining (sans-IO).
//!
//! Consumes the output of an external k-means run (a centroid list and
//! the dataset it was computed on) and produces a renderable [`Scene`]:
//!
//! parse -> assign to nearest centroid -> outline each cluster -> style.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! text and returns structured data. Reading files and writing images
//! lives in the `clusterview` binary and `clusterview-export`.

pub mod assign;
pub mod diagnostics;
pub mod hull;
pub mod parse;
pub mod pipeline;
pub mod scene;
pub mod style;
pub mod types;

pub use hull::{Boundary, HullError};
pub use pipeline::Pipeline;
pub use scene::{Bounds, CentroidMarker, ClusterLayer, LegendEntry, Scene, build_scene};
pub use style::{Color, color_for};
pub use types::{InputKind, Partition, PipelineError, Point, RenderConfig};

/// Run the full pipeline.
///
/// Takes the raw contents of the centroid file and the point file and
/// produces the [`Scene`] to render.
///
/// # Pipeline steps
///
/// 1. Parse both texts (blank, header, and malformed lines are skipped)
/// 2. Assign each point to its nearest centroid (ties go to the lowest index)
/// 3. Outline every non-empty cluster and pick its color
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` is invalid.
/// Returns [`PipelineError::EmptyInput`] if either text has no valid
/// coordinate line.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::{Point, RenderConfig, process};
///
/// let scene = process(
///     "Centroids:\n0 0\n10 10\n",
///     "Dataset:\n1 1\n2 2\n9 9\n11 11\n5 5\n",
///     &RenderConfig::default(),
/// )
/// .unwrap();
/// assert_eq!(scene.clusters[0].points.last(), Some(&Point::new(5, 5)));
/// ```
pub fn process(
    centroid_text: &str,
    point_text: &str,
    config: &RenderConfig,
) -> Result<Scene, PipelineError> {
    Ok(Pipeline::new(centroid_text, point_text, config.clone())
        .parse()?
        .assign()?
        .outline()?
        .into_scene())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn process_reference_scenario() {
        let scene = process(
            "Centroids:\n0 0\n10 10\n",
            "Dataset:\n1 1\n2 2\n9 9\n11 11\n5 5\n",
            &RenderConfig::default(),
        )
        .unwrap();

        assert_eq!(
            scene.clusters[0].points,
            vec![Point::new(1, 1), Point::new(2, 2), Point::new(5, 5)]
        );
        assert_eq!(
            scene.clusters[1].points,
            vec![Point::new(9, 9), Point::new(11, 11)]
        );
    }

    #[test]
    fn process_empty_centroids() {
        let result = process("Centroids:\n\n\n", "1 1\n", &RenderConfig::default());
        assert_eq!(result, Err(PipelineError::EmptyInput(InputKind::Centroids)));
    }

    #[test]
    fn process_empty_points() {
        let result = process("0 0\n", "Dataset:\n", &RenderConfig::default());
        assert_eq!(result, Err(PipelineError::EmptyInput(InputKind::Points)));
    }

    #[test]
    fn process_is_deterministic() {
        let centroids = "Centroids:\n0 0\n40 0\n0 40\n40 40\n";
        let points = "Dataset:\n3 4\n38 2\n1 37\n41 39\n20 20\n22 5\n5 22\n30 30\n";
        let a = process(centroids, points, &RenderConfig::default()).unwrap();
        let b = process(centroids, points, &RenderConfig::default()).unwrap();
        assert_eq!(a, b);
    }
}
