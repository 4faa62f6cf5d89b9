//! Coordinate file parsing.
//!
//! Both input files share one line-oriented format: each data line holds
//! exactly two whitespace-separated integers `x y`. Blank lines and lines
//! starting with the file's header token are skipped. Anything else that
//! does not split into exactly two integers is counted as malformed and
//! skipped without raising an error, so annotated or noisy files still
//! load.
//!
//! The parser operates on in-memory text; reading the file is the
//! caller's job.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Outcome of parsing one coordinate file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCoordinates {
    /// Valid points, in file order.
    pub points: Vec<Point>,
    /// Total number of lines in the input.
    pub line_count: usize,
    /// Lines that were neither blank, header, nor a valid `x y` pair.
    pub malformed_count: usize,
}

/// Parse coordinate text, skipping blank lines and lines that start with
/// `header`.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::Point;
/// use clusterview_pipeline::parse::parse_coordinates;
///
/// let parsed = parse_coordinates("Centroids:\n1 2\n\n3 four\n-5 6\n", "Centroids:");
/// assert_eq!(parsed.points, vec![Point::new(1, 2), Point::new(-5, 6)]);
/// assert_eq!(parsed.malformed_count, 1);
/// ```
#[must_use]
pub fn parse_coordinates(text: &str, header: &str) -> ParsedCoordinates {
    let mut parsed = ParsedCoordinates::default();

    for line in text.lines() {
        parsed.line_count += 1;

        if line.trim().is_empty() || line.starts_with(header) {
            continue;
        }

        match parse_line(line) {
            Some(point) => parsed.points.push(point),
            None => parsed.malformed_count += 1,
        }
    }

    parsed
}

/// Parse a single `x y` line. Returns `None` unless the line has exactly
/// two tokens and both are integers.
fn parse_line(line: &str) -> Option<Point> {
    let mut tokens = line.split_whitespace();
    let x = tokens.next()?.parse().ok()?;
    let y = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(Point::new(x, y))
}
