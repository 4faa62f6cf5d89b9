//! clusterview-export: pure format serializers (sans-IO)
//!
//! Turns a [`Scene`](clusterview_pipeline::Scene) into output formats.
//! Supports SVG (vector, with text) and PNG (raster, geometry only).
//! Writing the bytes to disk is left to the caller.

pub mod layout;
pub mod png;
pub mod svg;
pub mod viewport;

pub use png::{ExportError, to_png};
pub use svg::to_svg;
pub use viewport::Viewport;
