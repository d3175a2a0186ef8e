//! Color value type and conversion functions.
//!
//! Provides the plain [`Rgba`] value type and pure conversions between RGB and
//! HSV, all in the unit range with hue as a fraction of a full turn. Also
//! holds the luminance classification used to pick a contrasting outline or
//! text color over an arbitrary background.

use crate::error::PickerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Threshold on the gamma-encoded channel below which the sRGB decode is
/// linear. Deliberately the older 0.03928 rather than 0.04045.
const SRGB_LINEAR_THRESHOLD: f64 = 0.03928;

/// RGBA color with components in [0, 1].
///
/// Serializes as an uppercase hex string, `"#RRGGBB"` when opaque and
/// `"#RRGGBBAA"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::opaque(1.0, 1.0, 1.0);

    /// Opaque color from unit-range channels.
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque color from HSV (all in [0, 1]).
    pub fn from_hsv(h: f64, s: f64, v: f64) -> Self {
        let (r, g, b) = hsv_to_rgb(h, s, v);
        Self::opaque(r, g, b)
    }

    /// Creates a color from 0–255 channel bytes.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: f64::from(a) / 255.0,
        }
    }

    /// Quantizes to 0–255 channel bytes, clamping out-of-range values.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    /// Parses `"#RRGGBB"` or `"#RRGGBBAA"` (the `#` is optional, case insensitive).
    ///
    /// Returns `PickerError::InvalidColor` for any other shape.
    pub fn from_hex(hex: &str) -> Result<Rgba, PickerError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PickerError::InvalidColor(format!(
                "non-hex digit in {hex:?}"
            )));
        }
        if hex.len() != 6 && hex.len() != 8 {
            return Err(PickerError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| PickerError::InvalidColor(format!("invalid component: {e}")))
        };
        let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Rgba::from_rgba8(byte(0)?, byte(2)?, byte(4)?, alpha))
    }

    /// Formats as uppercase hex, omitting alpha when the color is opaque.
    pub fn to_hex(self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// HSV → RGB. All values in [0, 1]; a hue of 1.0 wraps to red.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = (h * 6.0) % 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// RGB → HSV. All values in [0, 1].
///
/// Returns `None` for the hue of achromatic colors (`max == min`), where hue
/// is undefined. Callers decide what hue to keep in that case.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (Option<f64>, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        None
    } else if max == r {
        Some(((g - b) / delta).rem_euclid(6.0) / 6.0)
    } else if max == g {
        Some(((b - r) / delta + 2.0) / 6.0)
    } else {
        Some(((r - g) / delta + 4.0) / 6.0)
    };

    (h, s, v)
}

/// Decodes one gamma-encoded channel to linear light.
fn srgb_component_to_linear(c: f64) -> f64 {
    if c <= SRGB_LINEAR_THRESHOLD {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of a color (alpha ignored), BT.709 weights.
pub fn relative_luminance(color: Rgba) -> f64 {
    0.2126 * srgb_component_to_linear(color.r)
        + 0.7152 * srgb_component_to_linear(color.g)
        + 0.0722 * srgb_component_to_linear(color.b)
}

/// High-contrast foreground for text or indicator outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Foreground {
    Black,
    White,
}

impl Foreground {
    /// Luminance above which a background counts as light.
    ///
    /// The crossover where contrast against black and against white are equal.
    pub fn luminance_threshold() -> f64 {
        (1.05_f64 * 0.05).sqrt() - 0.05
    }

    /// Black on light backgrounds, white on dark ones.
    pub fn for_background(background: Rgba) -> Self {
        if relative_luminance(background) > Self::luminance_threshold() {
            Foreground::Black
        } else {
            Foreground::White
        }
    }

    pub fn to_rgba(self) -> Rgba {
        match self {
            Foreground::Black => Rgba::BLACK,
            Foreground::White => Rgba::WHITE,
        }
    }
}
