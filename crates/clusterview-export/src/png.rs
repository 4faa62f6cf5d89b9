//! PNG export: rasterize a [`Scene`] with `tiny-skia` and encode it with
//! the `image` crate.
//!
//! The raster uses the same geometry as the SVG export (grid, frame,
//! dashed boundaries, member points, centroid markers, legend swatches)
//! but carries no text, since `tiny-skia` has no font rendering.

use image::{ImageEncoder, Rgba, RgbaImage};
use tiny_skia::{
    Color as SkiaColor, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke,
    StrokeDash, Transform,
};

use clusterview_pipeline::style::{CENTROID_EDGE, CENTROID_FILL};
use clusterview_pipeline::{Color, LegendEntry, Point, RenderConfig, Scene};

use crate::layout::{LEGEND_SWATCH_RADIUS, LegendLayout, x_marker};
use crate::viewport::Viewport;

/// Point fill alpha (0.6 of full coverage).
const POINT_ALPHA: u8 = 153;

/// Errors that can occur while producing a PNG.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The canvas could not be allocated for the requested size.
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

fn paint(color: Color, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

fn dashed(width: f64, on: f32, off: f32) -> Stroke {
    #[allow(clippy::cast_possible_truncation)]
    let width = width as f32;
    Stroke {
        width,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Round,
        dash: StrokeDash::new(vec![on, off], 0.0),
        ..Stroke::default()
    }
}

/// Build a tiny-skia path through canvas-space vertices.
#[allow(clippy::cast_possible_truncation)]
fn polyline(vertices: &[(f64, f64)], close: bool) -> Option<Path> {
    let (first, rest) = vertices.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.0 as f32, first.1 as f32);
    for &(x, y) in rest {
        pb.line_to(x as f32, y as f32);
    }
    if close {
        pb.close();
    }
    pb.finish()
}

#[allow(clippy::cast_possible_truncation)]
fn circle(cx: f64, cy: f64, r: f64) -> Option<Path> {
    PathBuilder::from_circle(cx as f32, cy as f32, r as f32)
}

fn draw_marker(pixmap: &mut Pixmap, cx: f64, cy: f64, size: f64) {
    if let Some(path) = polyline(&x_marker(cx, cy, size), true) {
        pixmap.fill_path(
            &path,
            &paint(CENTROID_FILL, 255),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        let stroke = Stroke {
            width: 1.5,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &paint(CENTROID_EDGE, 255),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn draw_point(pixmap: &mut Pixmap, cx: f64, cy: f64, r: f64, color: Color) {
    if let Some(path) = circle(cx, cy, r) {
        pixmap.fill_path(
            &path,
            &paint(color, POINT_ALPHA),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        let stroke = Stroke {
            width: 0.5,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &paint(Color::rgb(255, 255, 255), 255),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn draw_grid(pixmap: &mut Pixmap, viewport: &Viewport) {
    let area = viewport.area();
    let grid_paint = paint(Color::rgb(0xb0, 0xb0, 0xb0), 180);
    let stroke = dashed(1.0, 4.0, 4.0);
    let vertical = viewport
        .x_ticks()
        .into_iter()
        .map(|x| viewport.map_x(x))
        .map(|cx| [(cx, area.top), (cx, area.bottom)]);
    let horizontal = viewport
        .y_ticks()
        .into_iter()
        .map(|y| viewport.map_y(y))
        .map(|cy| [(area.left, cy), (area.right, cy)]);
    for line in vertical.chain(horizontal) {
        if let Some(path) = polyline(&line, false) {
            pixmap.stroke_path(&path, &grid_paint, &stroke, Transform::identity(), None);
        }
    }
}

fn draw_frame(pixmap: &mut Pixmap, viewport: &Viewport) {
    let a = viewport.area();
    let corners = [
        (a.left, a.top),
        (a.right, a.top),
        (a.right, a.bottom),
        (a.left, a.bottom),
    ];
    if let Some(path) = polyline(&corners, true) {
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        pixmap.stroke_path(
            &path,
            &paint(Color::rgb(0, 0, 0), 255),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

fn draw_legend(pixmap: &mut Pixmap, scene: &Scene, viewport: &Viewport) {
    let entries = scene.legend();
    let layout = LegendLayout::new(viewport, entries.len());
    let box_corners = [
        (layout.left, layout.top),
        (layout.left + layout.width, layout.top),
        (layout.left + layout.width, layout.top + layout.height),
        (layout.left, layout.top + layout.height),
    ];
    if let Some(path) = polyline(&box_corners, true) {
        pixmap.fill_path(
            &path,
            &paint(Color::rgb(255, 255, 255), 204),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
        pixmap.stroke_path(
            &path,
            &paint(Color::rgb(0xcc, 0xcc, 0xcc), 255),
            &Stroke::default(),
            Transform::identity(),
            None,
        );
    }
    for (row, entry) in entries.iter().enumerate() {
        let (sx, sy) = layout.swatch_center(row);
        match entry {
            LegendEntry::Cluster { color, .. } => {
                draw_point(pixmap, sx, sy, LEGEND_SWATCH_RADIUS, *color);
            }
            LegendEntry::Centroids => draw_marker(pixmap, sx, sy, LEGEND_SWATCH_RADIUS),
        }
    }
}

/// Rasterize a scene into straight-alpha RGBA pixels.
///
/// # Errors
///
/// Returns [`ExportError::Canvas`] if the canvas cannot be allocated
/// (zero or oversized dimensions).
pub fn render(scene: &Scene, config: &RenderConfig) -> Result<RgbaImage, ExportError> {
    let (width, height) = (config.width, config.height);
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Canvas { width, height })?;
    pixmap.fill(SkiaColor::WHITE);

    let viewport = Viewport::new(&scene.bounds, config);
    if config.show_grid {
        draw_grid(&mut pixmap, &viewport);
    }
    draw_frame(&mut pixmap, &viewport);

    let to_canvas =
        |points: &[Point]| -> Vec<(f64, f64)> { points.iter().map(|p| viewport.map(*p)).collect() };

    for layer in &scene.clusters {
        let outline = to_canvas(&layer.boundary.path());
        if let Some(path) = polyline(&outline, false) {
            pixmap.stroke_path(
                &path,
                &paint(layer.color, 255),
                &dashed(config.boundary_width, 8.0, 4.0),
                Transform::identity(),
                None,
            );
        }
        for (cx, cy) in to_canvas(&layer.points) {
            draw_point(&mut pixmap, cx, cy, config.point_radius, layer.color);
        }
    }

    for marker in &scene.centroids {
        let (cx, cy) = viewport.map(marker.position);
        draw_marker(&mut pixmap, cx, cy, config.centroid_size);
    }

    draw_legend(&mut pixmap, scene, &viewport);

    // Convert the pixmap (premultiplied RGBA) to an `RgbaImage` (straight RGBA).
    let pixmap_data = pixmap.data();
    let mut img = RgbaImage::new(width, height);
    for (i, pixel) in img.pixels_mut().enumerate() {
        let off = i * 4;
        let a = pixmap_data[off + 3];
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else {
            // Un-premultiply: channel = premultiplied * 255 / alpha.
            let channel = |c: u8| {
                #[allow(clippy::cast_possible_truncation)]
                let v = (u16::from(c) * 255 / u16::from(a)) as u8;
                v
            };
            *pixel = Rgba([
                channel(pixmap_data[off]),
                channel(pixmap_data[off + 1]),
                channel(pixmap_data[off + 2]),
                a,
            ]);
        }
    }
    Ok(img)
}

/// Rasterize a scene and encode it as PNG bytes.
///
/// # Errors
///
/// Returns [`ExportError::Canvas`] if the canvas cannot be allocated and
/// [`ExportError::PngEncode`] if encoding fails.
pub fn to_png(scene: &Scene, config: &RenderConfig) -> Result<Vec<u8>, ExportError> {
    let img = render(scene, config)?;
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png_bytes)
}
