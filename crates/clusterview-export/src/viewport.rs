//! Data-to-canvas coordinate mapping shared by the SVG and PNG exporters.
//!
//! The canvas reserves fixed margins for the title, axis labels and tick
//! labels. The data bounds, widened by `padding_fraction`, are stretched
//! over the remaining plot area with the y axis pointing up.

use clusterview_pipeline::{Bounds, Point, RenderConfig};

/// Margin above the plot area (title).
const MARGIN_TOP: f64 = 70.0;
/// Margin below the plot area (tick labels and x label).
const MARGIN_BOTTOM: f64 = 80.0;
/// Margin left of the plot area (tick labels and y label).
const MARGIN_LEFT: f64 = 100.0;
/// Margin right of the plot area.
const MARGIN_RIGHT: f64 = 30.0;
/// Approximate number of grid lines per axis.
const TARGET_TICKS: f64 = 8.0;

/// Pixel rectangle of the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl PlotArea {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Maps data coordinates onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
    area: PlotArea,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Viewport {
    /// Fit `bounds` into a canvas sized by `config`.
    #[must_use]
    pub fn new(bounds: &Bounds, config: &RenderConfig) -> Self {
        let width = f64::from(config.width);
        let height = f64::from(config.height);

        // Margins shrink on tiny canvases so the plot area never vanishes.
        let area = PlotArea {
            left: MARGIN_LEFT.min(width / 4.0),
            top: MARGIN_TOP.min(height / 4.0),
            right: width - MARGIN_RIGHT.min(width / 4.0),
            bottom: height - MARGIN_BOTTOM.min(height / 4.0),
        };

        Self {
            width,
            height,
            area,
            x_range: padded(
                f64::from(bounds.min_x),
                f64::from(bounds.max_x),
                config.padding_fraction,
            ),
            y_range: padded(
                f64::from(bounds.min_y),
                f64::from(bounds.max_y),
                config.padding_fraction,
            ),
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// The plot area in pixels.
    #[must_use]
    pub const fn area(&self) -> PlotArea {
        self.area
    }

    /// Visible data range along x.
    #[must_use]
    pub const fn x_range(&self) -> (f64, f64) {
        self.x_range
    }

    /// Visible data range along y.
    #[must_use]
    pub const fn y_range(&self) -> (f64, f64) {
        self.y_range
    }

    /// Canvas x for data x.
    #[must_use]
    pub fn map_x(&self, x: f64) -> f64 {
        let (lo, hi) = self.x_range;
        (x - lo).mul_add(self.area.width() / (hi - lo), self.area.left)
    }

    /// Canvas y for data y (y grows upward in data space).
    #[must_use]
    pub fn map_y(&self, y: f64) -> f64 {
        let (lo, hi) = self.y_range;
        (y - lo).mul_add(-self.area.height() / (hi - lo), self.area.bottom)
    }

    /// Canvas position of a data point.
    #[must_use]
    pub fn map(&self, p: Point) -> (f64, f64) {
        let (x, y) = p.to_f64();
        (self.map_x(x), self.map_y(y))
    }

    /// Grid/tick positions along x, in data units.
    #[must_use]
    pub fn x_ticks(&self) -> Vec<f64> {
        ticks(self.x_range.0, self.x_range.1)
    }

    /// Grid/tick positions along y, in data units.
    #[must_use]
    pub fn y_ticks(&self) -> Vec<f64> {
        ticks(self.y_range.0, self.y_range.1)
    }
}

/// Widen `[min, max]` by `fraction` of its span on each side. A zero
/// span is widened by one unit so the range never collapses.
fn padded(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = max - min;
    if span <= 0.0 {
        return (min - 1.0, max + 1.0);
    }
    let pad = span * fraction;
    (min - pad, max + pad)
}

/// Step of 1, 2 or 5 times a power of ten giving about
/// [`TARGET_TICKS`] intervals over `span`.
#[must_use]
pub fn nice_step(span: f64) -> f64 {
    let raw = span / TARGET_TICKS;
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Multiples of [`nice_step`] within `[lo, hi]`.
fn ticks(lo: f64, hi: f64) -> Vec<f64> {
    let step = nice_step(hi - lo);
    let first = (lo / step).ceil();
    let epsilon = step * 1e-9;
    (0..)
        .map(|k| f64::from(k).mul_add(step, first * step))
        .take_while(|v| *v <= hi + epsilon)
        .take(64)
        .collect()
}

/// Tick label text with just enough decimals for `step`.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    // Adding 0.0 turns -0.0 into 0.0.
    let value = value + 0.0;
    if step >= 1.0 {
        return format!("{value:.0}");
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let decimals = (-step.log10()).ceil().max(0.0) as usize;
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Bounds {
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    fn viewport(b: Bounds) -> Viewport {
        Viewport::new(&b, &RenderConfig::default())
    }

    #[test]
    fn corners_map_inside_plot_area() {
        let vp = viewport(bounds(0, 0, 100, 50));
        let area = vp.area();
        let (x0, y0) = vp.map(Point::new(0, 0));
        let (x1, y1) = vp.map(Point::new(100, 50));
        assert!(x0 > area.left && x1 < area.right);
        assert!(y0 < area.bottom && y1 > area.top);
    }

    #[test]
    fn y_axis_points_up() {
        let vp = viewport(bounds(0, 0, 10, 10));
        assert!(vp.map_y(10.0) < vp.map_y(0.0));
        assert!(vp.map_x(10.0) > vp.map_x(0.0));
    }

    #[test]
    fn padding_is_symmetric() {
        let vp = viewport(bounds(0, 0, 100, 200));
        let (lo, hi) = vp.x_range();
        assert!((lo + 5.0).abs() < 1e-9);
        assert!((hi - 105.0).abs() < 1e-9);
        let area = vp.area();
        let mid = vp.map_x(50.0);
        assert!((mid - f64::midpoint(area.left, area.right)).abs() < 1e-9);
    }

    #[test]
    fn single_point_does_not_collapse() {
        let vp = viewport(bounds(7, 7, 7, 7));
        let (lo, hi) = vp.x_range();
        assert!(hi > lo);
        assert!(vp.map_x(7.0).is_finite());
        assert!(vp.map_y(7.0).is_finite());
    }

    #[test]
    fn tiny_canvas_keeps_positive_area() {
        let config = RenderConfig {
            width: 20,
            height: 10,
            ..RenderConfig::default()
        };
        let vp = Viewport::new(&bounds(0, 0, 1, 1), &config);
        assert!(vp.area().width() > 0.0);
        assert!(vp.area().height() > 0.0);
    }

    #[test]
    fn nice_steps() {
        assert!((nice_step(100.0) - 20.0).abs() < 1e-9);
        assert!((nice_step(10.0) - 2.0).abs() < 1e-9);
        assert!((nice_step(8.0) - 1.0).abs() < 1e-9);
        assert!((nice_step(3.0) - 0.5).abs() < 1e-9);
        assert!((nice_step(0.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ticks_are_within_range_and_evenly_spaced() {
        let t = ticks(-5.0, 105.0);
        assert_eq!(t.first().copied(), Some(0.0));
        assert_eq!(t.last().copied(), Some(100.0));
        for pair in t.windows(2) {
            assert!((pair[1] - pair[0] - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn tick_labels() {
        assert_eq!(format_tick(20.0, 20.0), "20");
        assert_eq!(format_tick(-0.0, 5.0), "0");
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }
}
