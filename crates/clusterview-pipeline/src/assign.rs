//! Nearest-centroid assignment.
//!
//! Each point goes to the centroid at minimal Euclidean distance. Exact
//! squared distances are compared, which selects the same centroid as
//! the true distance. Ties go to the lowest centroid index: centroids
//! are scanned in order and only a strictly smaller distance replaces
//! the current best.

use crate::types::{Partition, PipelineError, Point};

/// Index of the centroid nearest to `point`, or `None` if `centroids`
/// is empty.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::Point;
/// use clusterview_pipeline::assign::nearest_centroid;
///
/// let centroids = [Point::new(0, 0), Point::new(10, 10)];
/// assert_eq!(nearest_centroid(Point::new(9, 9), &centroids), Some(1));
/// // Equidistant: the first centroid wins.
/// assert_eq!(nearest_centroid(Point::new(5, 5), &centroids), Some(0));
/// ```
#[must_use]
pub fn nearest_centroid(point: Point, centroids: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, i128)> = None;
    for (index, centroid) in centroids.iter().enumerate() {
        let d = point.distance_squared(*centroid);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((index, d));
        }
    }
    best.map(|(index, _)| index)
}

/// Partition `points` by nearest centroid.
///
/// Points keep their input order within each cluster. An empty `points`
/// slice yields an empty partition.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] if `centroids` is empty.
pub fn assign(centroids: &[Point], points: &[Point]) -> Result<Partition, PipelineError> {
    if centroids.is_empty() {
        return Err(PipelineError::InvalidInput(
            "at least one centroid is required".to_string(),
        ));
    }

    let mut partition = Partition::new();
    for &point in points {
        let index = nearest_centroid(point, centroids).ok_or_else(|| {
            PipelineError::InvalidInput("at least one centroid is required".to_string())
        })?;
        partition.push(index, point);
    }
    Ok(partition)
}
