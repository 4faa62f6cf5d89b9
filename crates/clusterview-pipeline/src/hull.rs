//! Cluster boundaries.
//!
//! A cluster is outlined according to its size:
//!
//! | members | boundary                                         |
//! |---------|--------------------------------------------------|
//! | 0 or 1  | none (a lone point is drawn without a line)      |
//! | 2       | the segment joining the two points               |
//! | 3+      | the closed convex hull, counter-clockwise        |
//!
//! Three or more collinear points have no polygonal hull.
//! [`convex_hull`] reports them as [`HullError::Degenerate`] and
//! [`outline`] falls back to the segment between the two extreme points
//! (or to no boundary at all if every point coincides).

use geo::{ConvexHull, Coord, MultiPoint};
use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Why a convex hull could not be formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HullError {
    /// A polygon needs at least three points.
    #[error("convex hull needs at least 3 points, got {0}")]
    TooFewPoints(usize),

    /// Every point lies on one line; `start` and `end` are its extremes
    /// (equal when all points coincide).
    #[error("degenerate geometry: all points are collinear between {start} and {end}")]
    Degenerate {
        /// Lexicographically smallest point.
        start: Point,
        /// Lexicographically largest point.
        end: Point,
    },
}

/// Renderable outline of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Nothing to draw beyond the points themselves.
    None,
    /// A line between two points.
    Segment(Point, Point),
    /// A closed ring: the first vertex is repeated at the end.
    Polygon(Vec<Point>),
}

impl Boundary {
    /// Vertices to stroke, in drawing order. Empty for [`Boundary::None`].
    #[must_use]
    pub fn path(&self) -> Vec<Point> {
        match self {
            Self::None => Vec::new(),
            Self::Segment(a, b) => vec![*a, *b],
            Self::Polygon(ring) => ring.clone(),
        }
    }
}

/// Boundary of a cluster plus whether the hull degenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// What to draw.
    pub boundary: Boundary,
    /// `true` when 3+ points were collinear and a fallback was used.
    pub degenerate: bool,
}

/// Convex hull of `points` as a closed counter-clockwise ring.
///
/// Hull vertices are a subset of `points`; collinear points along a hull
/// edge are not kept as vertices.
///
/// # Errors
///
/// Returns [`HullError::TooFewPoints`] for fewer than three points and
/// [`HullError::Degenerate`] when all points lie on one line.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::Point;
/// use clusterview_pipeline::hull::{HullError, convex_hull};
///
/// let ring = convex_hull(&[Point::new(0, 0), Point::new(4, 0), Point::new(0, 3)]).unwrap();
/// assert_eq!(ring.len(), 4);
/// assert_eq!(ring.first(), ring.last());
///
/// let line = [Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)];
/// assert!(matches!(convex_hull(&line), Err(HullError::Degenerate { .. })));
/// ```
pub fn convex_hull(points: &[Point]) -> Result<Vec<Point>, HullError> {
    if points.len() < 3 {
        return Err(HullError::TooFewPoints(points.len()));
    }
    if let Some((start, end)) = collinear_extremes(points) {
        return Err(HullError::Degenerate { start, end });
    }

    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| {
            let (x, y) = p.to_f64();
            Coord { x, y }
        })
        .collect();
    let hull = multi.convex_hull();

    // Coordinates came from `i32` values, so the round trip is exact.
    #[allow(clippy::cast_possible_truncation)]
    let ring = hull
        .exterior()
        .coords()
        .map(|c| Point::new(c.x as i32, c.y as i32))
        .collect();
    Ok(ring)
}

/// Outline a cluster according to its size.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::Point;
/// use clusterview_pipeline::hull::{Boundary, outline};
///
/// let pair = outline(&[Point::new(0, 0), Point::new(3, 1)]);
/// assert_eq!(pair.boundary, Boundary::Segment(Point::new(0, 0), Point::new(3, 1)));
///
/// let line = outline(&[Point::new(0, 0), Point::new(2, 2), Point::new(1, 1)]);
/// assert!(line.degenerate);
/// assert_eq!(line.boundary, Boundary::Segment(Point::new(0, 0), Point::new(2, 2)));
/// ```
#[must_use]
pub fn outline(points: &[Point]) -> Outline {
    let boundary = match points {
        [] | [_] => Boundary::None,
        [a, b] => Boundary::Segment(*a, *b),
        _ => match convex_hull(points) {
            Ok(ring) => Boundary::Polygon(ring),
            Err(HullError::Degenerate { start, end }) => {
                let boundary = if start == end {
                    Boundary::None
                } else {
                    Boundary::Segment(start, end)
                };
                return Outline {
                    boundary,
                    degenerate: true,
                };
            }
            Err(HullError::TooFewPoints(_)) => Boundary::None,
        },
    };
    Outline {
        boundary,
        degenerate: false,
    }
}

/// If every point lies on a single line, return its two extreme points.
///
/// Uses exact integer cross products, so nearly collinear clusters are
/// still treated as polygons.
fn collinear_extremes(points: &[Point]) -> Option<(Point, Point)> {
    let start = points.iter().min().copied()?;
    let end = points.iter().max().copied()?;
    if start == end {
        return Some((start, end));
    }

    let dx = i128::from(end.x) - i128::from(start.x);
    let dy = i128::from(end.y) - i128::from(start.y);
    let collinear = points.iter().all(|p| {
        let px = i128::from(p.x) - i128::from(start.x);
        let py = i128::from(p.y) - i128::from(start.y);
        dx * py - dy * px == 0
    });

    collinear.then_some((start, end))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pts(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    /// Twice the signed area of triangle `(a, b, c)`; positive when
    /// counter-clockwise.
    fn cross(a: Point, b: Point, c: Point) -> i128 {
        let abx = i128::from(b.x) - i128::from(a.x);
        let aby = i128::from(b.y) - i128::from(a.y);
        let acx = i128::from(c.x) - i128::from(a.x);
        let acy = i128::from(c.y) - i128::from(a.y);
        abx * acy - aby * acx
    }

    /// Assert the closed ring is a convex CCW polygon over `cluster` that
    /// contains every cluster point.
    fn assert_valid_hull(ring: &[Point], cluster: &[Point]) {
        assert!(ring.len() >= 4, "ring too short: {ring:?}");
        assert_eq!(ring.first(), ring.last(), "ring not closed: {ring:?}");
        for v in ring {
            assert!(cluster.contains(v), "vertex {v} not in cluster");
        }
        for edge in ring.windows(2) {
            for &p in cluster {
                assert!(
                    cross(edge[0], edge[1], p) >= 0,
                    "{p} lies outside edge {} -> {}",
                    edge[0],
                    edge[1],
                );
            }
        }
    }

    // --- convex_hull ---

    #[test]
    fn triangle_hull_is_the_triangle() {
        let cluster = pts(&[(0, 0), (4, 0), (0, 3)]);
        let ring = convex_hull(&cluster).unwrap();
        assert_eq!(ring.len(), 4);
        assert_valid_hull(&ring, &cluster);
    }

    #[test]
    fn square_hull_drops_interior_point() {
        let cluster = pts(&[(0, 0), (4, 0), (2, 2), (4, 4), (0, 4)]);
        let ring = convex_hull(&cluster).unwrap();
        assert_eq!(ring.len(), 5);
        assert!(!ring.contains(&Point::new(2, 2)));
        assert_valid_hull(&ring, &cluster);
    }

    #[test]
    fn hull_handles_duplicates() {
        let cluster = pts(&[(0, 0), (0, 0), (5, 0), (5, 0), (0, 5)]);
        let ring = convex_hull(&cluster).unwrap();
        assert_valid_hull(&ring, &cluster);
    }

    #[test]
    fn hull_contains_scattered_cluster() {
        let cluster = pts(&[
            (3, 7),
            (-2, 4),
            (9, -1),
            (0, 0),
            (5, 5),
            (-6, -3),
            (1, 9),
            (7, 2),
            (-4, 8),
            (2, -5),
        ]);
        let ring = convex_hull(&cluster).unwrap();
        assert_valid_hull(&ring, &cluster);
    }

    #[test]
    fn hull_with_negative_and_large_coordinates() {
        let cluster = pts(&[
            (i32::MIN, i32::MIN),
            (i32::MAX, i32::MIN),
            (0, i32::MAX),
            (0, 0),
        ]);
        let ring = convex_hull(&cluster).unwrap();
        assert_eq!(ring.len(), 4);
        assert_valid_hull(&ring, &cluster);
    }

    #[test]
    fn too_few_points_is_an_error() {
        assert_eq!(convex_hull(&[]), Err(HullError::TooFewPoints(0)));
        assert_eq!(
            convex_hull(&pts(&[(0, 0), (1, 1)])),
            Err(HullError::TooFewPoints(2))
        );
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let result = convex_hull(&pts(&[(1, 1), (0, 0), (2, 2)]));
        assert_eq!(
            result,
            Err(HullError::Degenerate {
                start: Point::new(0, 0),
                end: Point::new(2, 2),
            })
        );
    }

    #[test]
    fn vertical_line_is_degenerate() {
        let result = convex_hull(&pts(&[(3, 9), (3, -1), (3, 4), (3, 0)]));
        assert_eq!(
            result,
            Err(HullError::Degenerate {
                start: Point::new(3, -1),
                end: Point::new(3, 9),
            })
        );
    }

    #[test]
    fn nearly_collinear_is_a_polygon() {
        let cluster = pts(&[(0, 0), (1000, 1000), (500, 501)]);
        let ring = convex_hull(&cluster).unwrap();
        assert_valid_hull(&ring, &cluster);
    }

    // --- outline ---

    #[test]
    fn empty_cluster_has_no_boundary() {
        let o = outline(&[]);
        assert_eq!(o.boundary, Boundary::None);
        assert!(!o.degenerate);
    }

    #[test]
    fn singleton_has_no_boundary() {
        let o = outline(&pts(&[(4, 2)]));
        assert_eq!(o.boundary, Boundary::None);
        assert!(!o.degenerate);
    }

    #[test]
    fn pair_is_a_segment_in_input_order() {
        let o = outline(&pts(&[(9, 9), (1, 1)]));
        assert_eq!(
            o.boundary,
            Boundary::Segment(Point::new(9, 9), Point::new(1, 1))
        );
        assert_eq!(o.boundary.path().len(), 2);
    }

    #[test]
    fn three_points_make_a_closed_polygon() {
        let cluster = pts(&[(0, 0), (6, 0), (3, 5)]);
        let o = outline(&cluster);
        let Boundary::Polygon(ring) = &o.boundary else {
            unreachable!("expected polygon, got {:?}", o.boundary);
        };
        assert_valid_hull(ring, &cluster);
        assert!(!o.degenerate);
    }

    #[test]
    fn collinear_triple_falls_back_to_segment() {
        let o = outline(&pts(&[(0, 0), (1, 1), (2, 2)]));
        assert!(o.degenerate);
        assert_eq!(
            o.boundary,
            Boundary::Segment(Point::new(0, 0), Point::new(2, 2))
        );
    }

    #[test]
    fn coincident_points_fall_back_to_no_boundary() {
        let o = outline(&pts(&[(5, 5), (5, 5), (5, 5)]));
        assert!(o.degenerate);
        assert_eq!(o.boundary, Boundary::None);
        assert!(o.boundary.path().is_empty());
    }

    /// Check an outline against its cluster: valid hulls for polygons, and
    /// a segment between the extremes (or nothing) for degenerate input.
    fn assert_valid_outline(cluster: &[Point]) {
        let o = outline(cluster);
        match &o.boundary {
            Boundary::Polygon(ring) => {
                assert!(!o.degenerate);
                assert_valid_hull(ring, cluster);
            }
            Boundary::Segment(start, end) => {
                assert!(o.degenerate, "non-degenerate segment for {cluster:?}");
                assert_eq!(Some(start), cluster.iter().min());
                assert_eq!(Some(end), cluster.iter().max());
                for &p in cluster {
                    assert_eq!(cross(*start, *end, p), 0, "{p} off the segment");
                }
            }
            Boundary::None => {
                assert!(o.degenerate, "no boundary for {cluster:?}");
                assert!(cluster.iter().all(|p| *p == cluster[0]));
            }
        }
    }

    #[test]
    fn random_clusters_have_valid_outlines() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        // Small spans make duplicates and collinear triples common.
        for span in [0, 1, 2, 3, 10, 1000] {
            for _ in 0..300 {
                let n = rng.gen_range(3..=12);
                let cluster: Vec<Point> = (0..n)
                    .map(|_| Point::new(rng.gen_range(-span..=span), rng.gen_range(-span..=span)))
                    .collect();
                assert_valid_outline(&cluster);
            }
        }
    }

    #[test]
    fn random_clusters_near_large_coordinates() {
        let mut rng = StdRng::seed_from_u64(1_000_000_000);
        for center in [-1_000_000_000, 1_000_000_000] {
            for _ in 0..300 {
                let n = rng.gen_range(3..=12);
                let cluster: Vec<Point> = (0..n)
                    .map(|_| {
                        Point::new(
                            center + rng.gen_range(-50..=50),
                            center + rng.gen_range(-50..=50),
                        )
                    })
                    .collect();
                assert_valid_outline(&cluster);
            }
        }
    }

    #[test]
    fn random_collinear_clusters_are_degenerate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..300 {
            let origin = Point::new(rng.gen_range(-1000..=1000), rng.gen_range(-1000..=1000));
            let (dx, dy) = (rng.gen_range(-5..=5), rng.gen_range(-5..=5));
            let n = rng.gen_range(3..=10);
            let cluster: Vec<Point> = (0..n)
                .map(|_| {
                    let k = rng.gen_range(-20..=20);
                    Point::new(origin.x + k * dx, origin.y + k * dy)
                })
                .collect();
            let o = outline(&cluster);
            assert!(o.degenerate, "collinear cluster not flagged: {cluster:?}");
            assert_valid_outline(&cluster);
        }
    }
}
