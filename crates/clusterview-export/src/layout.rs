//! Shared drawing geometry: the centroid marker shape and the legend box.
//!
//! Both exporters draw the same shapes; keeping the geometry here makes
//! the SVG and the PNG line up pixel for pixel.

use crate::viewport::Viewport;

/// Half-width of a marker arm relative to its half-length.
const ARM_WIDTH: f64 = 0.32;

/// Height of one legend row in pixels.
pub const LEGEND_ROW_HEIGHT: f64 = 24.0;
/// Width of the legend box in pixels.
pub const LEGEND_WIDTH: f64 = 160.0;
/// Inner padding of the legend box.
pub const LEGEND_PADDING: f64 = 10.0;
/// Radius of a legend swatch circle.
pub const LEGEND_SWATCH_RADIUS: f64 = 6.0;

/// Outline of an `X` marker centred at `(cx, cy)` with arms reaching
/// `size` pixels from the centre along both diagonals.
///
/// The polygon has 12 vertices and is not explicitly closed.
#[must_use]
pub fn x_marker(cx: f64, cy: f64, size: f64) -> Vec<(f64, f64)> {
    let h = ARM_WIDTH;
    // A plus sign with unit arms, rotated by 45 degrees.
    let plus = [
        (h, 1.0),
        (h, h),
        (1.0, h),
        (1.0, -h),
        (h, -h),
        (h, -1.0),
        (-h, -1.0),
        (-h, -h),
        (-1.0, -h),
        (-1.0, h),
        (-h, h),
        (-h, 1.0),
    ];
    let scale = size * std::f64::consts::FRAC_1_SQRT_2;
    plus.iter()
        .map(|&(x, y)| ((x - y).mul_add(scale, cx), (x + y).mul_add(scale, cy)))
        .collect()
}

/// Placement of the legend box in the top-right corner of the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendLayout {
    /// Left edge of the box.
    pub left: f64,
    /// Top edge of the box.
    pub top: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl LegendLayout {
    /// Lay out a legend with `rows` entries.
    #[must_use]
    pub fn new(viewport: &Viewport, rows: usize) -> Self {
        let area = viewport.area();
        #[allow(clippy::cast_precision_loss)]
        let height = (rows as f64).mul_add(LEGEND_ROW_HEIGHT, 2.0 * LEGEND_PADDING);
        Self {
            left: area.right - LEGEND_WIDTH - LEGEND_PADDING,
            top: area.top + LEGEND_PADDING,
            width: LEGEND_WIDTH,
            height,
        }
    }

    /// Centre of the swatch for row `row`.
    #[must_use]
    pub fn swatch_center(&self, row: usize) -> (f64, f64) {
        #[allow(clippy::cast_precision_loss)]
        let y = (row as f64 + 0.5).mul_add(LEGEND_ROW_HEIGHT, self.top + LEGEND_PADDING);
        (self.left + LEGEND_PADDING + LEGEND_SWATCH_RADIUS, y)
    }

    /// Baseline origin of the label text for row `row`.
    #[must_use]
    pub fn text_origin(&self, row: usize) -> (f64, f64) {
        let (sx, sy) = self.swatch_center(row);
        (sx + LEGEND_SWATCH_RADIUS + 10.0, sy + 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterview_pipeline::{Bounds, RenderConfig};

    #[test]
    fn marker_is_symmetric_around_center() {
        let shape = x_marker(50.0, 40.0, 10.0);
        assert_eq!(shape.len(), 12);
        let (sx, sy) = shape
            .iter()
            .fold((0.0, 0.0), |(ax, ay), &(x, y)| (ax + x, ay + y));
        assert!((sx / 12.0 - 50.0).abs() < 1e-9);
        assert!((sy / 12.0 - 40.0).abs() < 1e-9);
    }

    #[test]
    fn marker_arm_tips_reach_size_along_diagonals() {
        let shape = x_marker(0.0, 0.0, 10.0);
        let reach = shape
            .iter()
            .map(|&(x, y)| x.abs().max(y.abs()))
            .fold(0.0_f64, f64::max);
        // Arm tips sit slightly beyond size/sqrt(2) on each axis.
        assert!(reach > 10.0 * std::f64::consts::FRAC_1_SQRT_2);
        assert!(reach < 10.0);
    }

    #[test]
    fn legend_fits_in_plot_area() {
        let bounds = Bounds {
            min_x: 0,
            min_y: 0,
            max_x: 10,
            max_y: 10,
        };
        let vp = Viewport::new(&bounds, &RenderConfig::default());
        let legend = LegendLayout::new(&vp, 4);
        let area = vp.area();
        assert!(legend.left > area.left);
        assert!(legend.left + legend.width < area.right);
        assert!(legend.top + legend.height < area.bottom);
        let (_, first) = legend.swatch_center(0);
        let (_, second) = legend.swatch_center(1);
        assert!((second - first - LEGEND_ROW_HEIGHT).abs() < 1e-9);
    }
}
