//! SVG export serializer.
//!
//! Draws a [`Scene`] as a static scatter plot using the [`svg`] crate
//! for document construction, XML escaping, and path data formatting:
//!
//! - white background, dashed grid and tick labels
//! - title and axis labels
//! - one `<g id="cluster-N">` per cluster holding its dashed boundary
//!   and its member points
//! - centroid `X` markers with bold `C1`, `C2`, ... annotations
//! - a legend listing every cluster and the centroid marker
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Element, Group, Line, Path, Rectangle, Title};
use svg::node::{Node, Text, Value};

use clusterview_pipeline::style::{CENTROID_EDGE, CENTROID_FILL};
use clusterview_pipeline::scene::CENTROID_LEGEND;
use clusterview_pipeline::{ClusterLayer, Color, LegendEntry, Point, RenderConfig, Scene};

use crate::layout::{LEGEND_SWATCH_RADIUS, LegendLayout, x_marker};
use crate::viewport::{Viewport, format_tick, nice_step};

const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";
const TITLE_FONT_SIZE: f64 = 22.0;
const LABEL_FONT_SIZE: f64 = 18.0;
const TICK_FONT_SIZE: f64 = 13.0;
const ANNOTATION_FONT_SIZE: f64 = 16.0;
const LEGEND_FONT_SIZE: f64 = 14.0;
const GRID_COLOR: &str = "#b0b0b0";
const POINT_OPACITY: f64 = 0.6;
const BOUNDARY_DASH: &str = "8 4";
const GRID_DASH: &str = "4 4";

/// Build SVG path data through `points` in canvas coordinates.
///
/// Returns `None` for fewer than 2 points.
fn path_data(points: &[Point], viewport: &Viewport) -> Option<Data> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut data = Data::new().move_to(viewport.map(*first));
    for p in rest {
        data = data.line_to(viewport.map(*p));
    }
    Some(data)
}

/// Path `d` attribute for a cluster boundary.
///
/// Returns an empty string when there is nothing to stroke.
fn boundary_path_data(points: &[Point], viewport: &Viewport) -> String {
    path_data(points, viewport).map_or_else(String::new, |d| String::from(Value::from(d)))
}

/// A `<text>` element at `(x, y)`.
fn text(x: f64, y: f64, content: &str, font_size: f64) -> Element {
    let mut el = Element::new("text");
    el.assign("x", x);
    el.assign("y", y);
    el.assign("font-family", FONT_FAMILY);
    el.assign("font-size", font_size);
    el.append(Text::new(content));
    el
}

/// Closed polygon path for an `X` marker.
fn marker_path(cx: f64, cy: f64, size: f64) -> Path {
    let shape = x_marker(cx, cy, size);
    let mut data = Data::new();
    for (i, &vertex) in shape.iter().enumerate() {
        data = if i == 0 {
            data.move_to(vertex)
        } else {
            data.line_to(vertex)
        };
    }
    Path::new()
        .set("d", data.close())
        .set("fill", CENTROID_FILL.to_hex())
        .set("stroke", CENTROID_EDGE.to_hex())
        .set("stroke-width", 1.5)
}

fn grid(viewport: &Viewport, show_grid: bool) -> Group {
    let area = viewport.area();
    let mut grid = Group::new().set("id", "grid");
    let mut ticks = Group::new()
        .set("id", "ticks")
        .set("fill", "black")
        .set("font-family", FONT_FAMILY)
        .set("font-size", TICK_FONT_SIZE);

    let (x_lo, x_hi) = viewport.x_range();
    let x_step = nice_step(x_hi - x_lo);
    for x in viewport.x_ticks() {
        let cx = viewport.map_x(x);
        if show_grid {
            grid = grid.add(
                Line::new()
                    .set("x1", cx)
                    .set("y1", area.top)
                    .set("x2", cx)
                    .set("y2", area.bottom),
            );
        }
        let mut label = text(
            cx,
            area.bottom + 20.0,
            &format_tick(x, x_step),
            TICK_FONT_SIZE,
        );
        label.assign("text-anchor", "middle");
        ticks = ticks.add(label);
    }

    let (y_lo, y_hi) = viewport.y_range();
    let y_step = nice_step(y_hi - y_lo);
    for y in viewport.y_ticks() {
        let cy = viewport.map_y(y);
        if show_grid {
            grid = grid.add(
                Line::new()
                    .set("x1", area.left)
                    .set("y1", cy)
                    .set("x2", area.right)
                    .set("y2", cy),
            );
        }
        let mut label = text(
            area.left - 8.0,
            cy + 4.0,
            &format_tick(y, y_step),
            TICK_FONT_SIZE,
        );
        label.assign("text-anchor", "end");
        ticks = ticks.add(label);
    }

    Group::new()
        .add(
            grid.set("stroke", GRID_COLOR)
                .set("stroke-width", 1)
                .set("stroke-dasharray", GRID_DASH)
                .set("opacity", 0.7),
        )
        .add(ticks)
}

fn cluster_group(layer: &ClusterLayer, viewport: &Viewport, config: &RenderConfig) -> Group {
    let color = layer.color.to_hex();
    let mut group = Group::new()
        .set("id", format!("cluster-{}", layer.index + 1))
        .set("class", "cluster");

    let data = boundary_path_data(&layer.boundary.path(), viewport);
    if !data.is_empty() {
        group = group.add(
            Path::new()
                .set("class", "boundary")
                .set("d", data)
                .set("fill", "none")
                .set("stroke", color.clone())
                .set("stroke-width", config.boundary_width)
                .set("stroke-dasharray", BOUNDARY_DASH),
        );
    }

    for p in &layer.points {
        let (cx, cy) = viewport.map(*p);
        group = group.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", config.point_radius)
                .set("fill", color.clone())
                .set("fill-opacity", POINT_OPACITY)
                .set("stroke", "white")
                .set("stroke-width", 0.5),
        );
    }
    group
}

fn centroid_group(scene: &Scene, viewport: &Viewport, config: &RenderConfig) -> Group {
    let mut group = Group::new().set("id", "centroids");
    for marker in &scene.centroids {
        let (cx, cy) = viewport.map(marker.position);
        group = group.add(marker_path(cx, cy, config.centroid_size));
        let mut label = text(
            cx + config.centroid_size + 4.0,
            cy - 4.0,
            &marker.label,
            ANNOTATION_FONT_SIZE,
        );
        label.assign("font-weight", "bold");
        group = group.add(label);
    }
    group
}

fn swatch(cx: f64, cy: f64, color: Color) -> Circle {
    Circle::new()
        .set("cx", cx)
        .set("cy", cy)
        .set("r", LEGEND_SWATCH_RADIUS)
        .set("fill", color.to_hex())
        .set("fill-opacity", POINT_OPACITY)
        .set("stroke", "white")
        .set("stroke-width", 0.5)
}

fn legend(scene: &Scene, viewport: &Viewport) -> Group {
    let entries = scene.legend();
    let layout = LegendLayout::new(viewport, entries.len());
    let mut group = Group::new().set("id", "legend").add(
        Rectangle::new()
            .set("x", layout.left)
            .set("y", layout.top)
            .set("width", layout.width)
            .set("height", layout.height)
            .set("rx", 4)
            .set("fill", "white")
            .set("fill-opacity", 0.8)
            .set("stroke", "#cccccc"),
    );

    for (row, entry) in entries.iter().enumerate() {
        let (sx, sy) = layout.swatch_center(row);
        let (tx, ty) = layout.text_origin(row);
        let label = match entry {
            LegendEntry::Cluster { label, color } => {
                group = group.add(swatch(sx, sy, *color));
                *label
            }
            LegendEntry::Centroids => {
                group = group.add(marker_path(sx, sy, LEGEND_SWATCH_RADIUS));
                CENTROID_LEGEND
            }
        };
        group = group.add(text(tx, ty, label, LEGEND_FONT_SIZE));
    }
    group
}

/// Serialize a scene into an SVG document string.
///
/// The document is `config.width` x `config.height` pixels. Data
/// coordinates are mapped with y pointing up, like a conventional plot.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::{RenderConfig, process};
/// use clusterview_export::to_svg;
///
/// let config = RenderConfig::default();
/// let scene = process("0 0\n10 10\n", "1 1\n2 2\n9 9\n", &config).unwrap();
/// let svg = to_svg(&scene, &config);
/// assert!(svg.starts_with("<?xml"));
/// assert!(svg.contains("id=\"cluster-2\""));
/// ```
#[must_use]
pub fn to_svg(scene: &Scene, config: &RenderConfig) -> String {
    let viewport = Viewport::new(&scene.bounds, config);
    let area = viewport.area();
    let (w, h) = (config.width, config.height);

    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h))
        .add(Title::new(scene.title.as_str()))
        .add(
            Rectangle::new()
                .set("width", w)
                .set("height", h)
                .set("fill", "white"),
        )
        .add(grid(&viewport, config.show_grid))
        .add(
            Rectangle::new()
                .set("id", "frame")
                .set("x", area.left)
                .set("y", area.top)
                .set("width", area.width())
                .set("height", area.height())
                .set("fill", "none")
                .set("stroke", "black"),
        );

    let mut title = text(
        viewport.width() / 2.0,
        area.top.mul_add(0.5, 8.0),
        &scene.title,
        TITLE_FONT_SIZE,
    );
    title.assign("text-anchor", "middle");
    title.assign("font-weight", "bold");
    doc = doc.add(title);

    let mut x_label = text(
        f64::midpoint(area.left, area.right),
        viewport.height() - 20.0,
        &scene.x_label,
        LABEL_FONT_SIZE,
    );
    x_label.assign("text-anchor", "middle");
    doc = doc.add(x_label);

    let y_mid = f64::midpoint(area.top, area.bottom);
    let mut y_label = text(28.0, y_mid, &scene.y_label, LABEL_FONT_SIZE);
    y_label.assign("text-anchor", "middle");
    y_label.assign("transform", format!("rotate(-90 28 {y_mid})"));
    doc = doc.add(y_label);

    let mut clusters = Group::new().set("id", "clusters");
    for layer in &scene.clusters {
        clusters = clusters.add(cluster_group(layer, &viewport, config));
    }
    doc = doc
        .add(clusters)
        .add(centroid_group(scene, &viewport, config))
        .add(legend(scene, &viewport));

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clusterview_pipeline::{Bounds, process};

    /// Content of every `<text>` element, whitespace-trimmed.
    fn texts(svg: &str) -> Vec<String> {
        svg.split("<text")
            .skip(1)
            .filter_map(|chunk| {
                let body = &chunk[chunk.find('>')? + 1..];
                Some(body[..body.find("</text>")?].trim().to_string())
            })
            .collect()
    }

    fn render(centroids: &str, points: &str) -> String {
        let config = RenderConfig::default();
        let scene = process(centroids, points, &config).unwrap();
        to_svg(&scene, &config)
    }

    #[test]
    fn document_has_declaration_and_size() {
        let svg = render("0 0\n10 10\n", "1 1\n9 9\n");
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg"));
        assert!(svg.contains("width=\"1200\""));
        assert!(svg.contains("height=\"1000\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn fixed_text_is_present() {
        let svg = render("0 0\n", "1 1\n");
        let texts = texts(&svg);
        for expected in [
            "K-means Clustering Results with Convex Hulls",
            "X-coordinate",
            "Y-coordinate",
            "Centroids",
        ] {
            assert!(texts.iter().any(|t| t == expected), "missing {expected}");
        }
        assert!(svg.contains("<title"));
    }

    #[test]
    fn one_group_per_non_empty_cluster() {
        let svg = render("0 0\n100 100\n200 0\n", "1 1\n2 2\n199 1\n");
        assert!(svg.contains("id=\"cluster-1\""));
        assert!(!svg.contains("id=\"cluster-2\""));
        assert!(svg.contains("id=\"cluster-3\""));
        let texts = texts(&svg);
        assert!(texts.iter().any(|t| t == "Cluster 1"));
        assert!(!texts.iter().any(|t| t == "Cluster 2"));
        assert!(texts.iter().any(|t| t == "Cluster 3"));
    }

    #[test]
    fn every_point_becomes_a_circle() {
        let svg = render("0 0\n10 10\n", "1 1\n2 2\n9 9\n11 11\n5 5\n");
        // Five members plus two legend swatches.
        assert_eq!(svg.matches("<circle").count(), 7);
    }

    #[test]
    fn every_centroid_is_annotated() {
        let svg = render("0 0\n100 100\n200 0\n", "1 1\n");
        let texts = texts(&svg);
        for label in ["C1", "C2", "C3"] {
            assert!(texts.iter().any(|t| t == label), "missing {label}");
        }
    }

    #[test]
    fn boundaries_are_dashed_in_cluster_color() {
        let svg = render("0 0\n", "0 0\n10 0\n0 10\n");
        let boundary = svg
            .split('<')
            .find(|s| s.contains("class=\"boundary\""))
            .unwrap();
        assert!(boundary.contains("stroke=\"#1f77b4\""));
        assert!(boundary.contains("stroke-dasharray=\"8 4\""));
    }

    #[test]
    fn singleton_cluster_has_no_boundary() {
        let svg = render("0 0\n", "3 3\n");
        assert!(!svg.contains("class=\"boundary\""));
    }

    #[test]
    fn grid_can_be_disabled() {
        let config = RenderConfig {
            show_grid: false,
            ..RenderConfig::default()
        };
        let scene = process("0 0\n", "1 1\n5 5\n", &config).unwrap();
        let svg = to_svg(&scene, &config);
        assert!(!svg.contains("<line"));
        assert!(svg.contains("id=\"ticks\""));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render("0 0\n50 50\n", "3 4\n40 41\n2 7\n");
        let b = render("0 0\n50 50\n", "3 4\n40 41\n2 7\n");
        assert_eq!(a, b);
    }

    #[test]
    fn boundary_path_data_formats() {
        let bounds = Bounds {
            min_x: 0,
            min_y: 0,
            max_x: 10,
            max_y: 10,
        };
        let vp = Viewport::new(&bounds, &RenderConfig::default());
        assert_eq!(boundary_path_data(&[Point::new(1, 1)], &vp), "");
        let d = boundary_path_data(&[Point::new(0, 0), Point::new(10, 10)], &vp);
        assert!(d.starts_with('M'));
        assert!(d.contains('L'));
    }

    #[test]
    fn cluster_boundary_uses_boundary_path_data() {
        let config = RenderConfig::default();
        let scene = process("0 0\n", "0 0\n10 0\n0 10\n", &config).unwrap();
        let vp = Viewport::new(&scene.bounds, &config);
        let expected = boundary_path_data(&scene.clusters[0].boundary.path(), &vp);
        assert!(!expected.is_empty());
        let svg = to_svg(&scene, &config);
        assert!(svg.contains(&format!("d=\"{expected}\"")));
    }
}
