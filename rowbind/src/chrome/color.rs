//! Title and title-bar colours.
//!
//! Colours are plain RGBA; the `color` crate handles CSS parsing and
//! conversion so hosts can accept values like `"#1e293b"` or
//! `"oklch(0.7 0.15 250)"`.

use color::{AlphaColor, Oklch, Srgb};

use crate::error::BindError;

/// An sRGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn to_u8(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Color {
    /// Opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Colour from RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from a hex value (0xRRGGBB).
    pub const fn hex(value: u32) -> Self {
        Self::rgb(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
        )
    }

    /// Colour from OKLCH values (lightness 0-1, chroma 0-0.4, hue 0-360).
    pub fn oklch(l: f32, c: f32, h: f32) -> Self {
        let oklch = AlphaColor::<Oklch>::new([l, c, h, 1.0]);
        Self::from_srgb(oklch.convert())
    }

    /// Parse any CSS colour string.
    pub fn parse(s: &str) -> Result<Self, BindError> {
        let parsed = color::parse_color(s).map_err(|_| BindError::InvalidColor(s.to_string()))?;
        Ok(Self::from_srgb(parsed.to_alpha_color()))
    }

    fn from_srgb(srgb: AlphaColor<Srgb>) -> Self {
        let [r, g, b, a] = srgb.components;
        Self::rgba(to_u8(r), to_u8(g), to_u8(b), to_u8(a))
    }

    pub const fn r(&self) -> u8 {
        self.r
    }

    pub const fn g(&self) -> u8 {
        self.g
    }

    pub const fn b(&self) -> u8 {
        self.b
    }

    pub const fn a(&self) -> u8 {
        self.a
    }

    /// Same colour with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Whether the colour is fully transparent.
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const CLEAR: Self = Self::rgba(0, 0, 0, 0);
    pub const RED: Self = Self::rgb(239, 68, 68);
    pub const BLUE: Self = Self::rgb(59, 130, 246);
    pub const GRAY: Self = Self::rgb(156, 163, 175);
}
