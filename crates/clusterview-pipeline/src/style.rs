//! Cluster colors.
//!
//! Clusters are colored from a fixed palette indexed by centroid index
//! modulo the palette size, so cluster `i` gets the same color in every
//! run with the same centroid ordering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Create a color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#1f77b4`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The ten Tableau categorical colors, in their conventional order.
pub const PALETTE: &[Color] = &[
    Color::rgb(0x1f, 0x77, 0xb4), // blue
    Color::rgb(0xff, 0x7f, 0x0e), // orange
    Color::rgb(0x2c, 0xa0, 0x2c), // green
    Color::rgb(0xd6, 0x27, 0x28), // red
    Color::rgb(0x94, 0x67, 0xbd), // purple
    Color::rgb(0x8c, 0x56, 0x4b), // brown
    Color::rgb(0xe3, 0x77, 0xc2), // pink
    Color::rgb(0x7f, 0x7f, 0x7f), // gray
    Color::rgb(0xbc, 0xbd, 0x22), // olive
    Color::rgb(0x17, 0xbe, 0xcf), // cyan
];

/// Fill color of centroid markers.
pub const CENTROID_FILL: Color = Color::rgb(0x00, 0x00, 0x00);

/// Edge color of centroid markers.
pub const CENTROID_EDGE: Color = Color::rgb(0xff, 0xff, 0x00);

/// Color for the cluster of centroid `index`.
///
/// # Examples
///
/// ```
/// use clusterview_pipeline::style::{PALETTE, color_for};
///
/// assert_eq!(color_for(0), PALETTE[0]);
/// assert_eq!(color_for(PALETTE.len() + 3), color_for(3));
/// ```
#[must_use]
pub const fn color_for(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}
