#![forbid(unsafe_code)]

//! Branch and background colors.

use std::fmt;

use serde::{Serialize, Serializer};

/// A CSS-compatible color.
///
/// Generated branch colors are kept in HSL so that evenly spaced hues stay
/// exact; explicit colors are plain RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Hsl {
        hue: f64,
        saturation: f64,
        lightness: f64,
    },
    Rgb(u8, u8, u8),
}

impl Color {
    pub const WHITE: Color = Color::Rgb(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);

    /// Saturation used for generated branch colors (percent).
    pub const GENERATED_SATURATION: f64 = 50.0;
    /// Lightness used for generated branch colors (percent).
    pub const GENERATED_LIGHTNESS: f64 = 50.0;

    /// Evenly spaced hue for branch `index` out of `count`.
    #[must_use]
    pub fn generated(index: usize, count: usize) -> Self {
        let hue = if count == 0 {
            0.0
        } else {
            index as f64 / count as f64 * 360.0
        };
        Self::Hsl {
            hue,
            saturation: Self::GENERATED_SATURATION,
            lightness: Self::GENERATED_LIGHTNESS,
        }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    #[must_use]
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
                Some(Self::Rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::Rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hsl {
                hue,
                saturation,
                lightness,
            } => write!(f, "hsl({hue},{saturation}%,{lightness}%)"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
