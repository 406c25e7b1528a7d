//! Color conversions between additive RGB and HSV.
//!
//! The renderer works in RGB for accumulation and in HSV for reshaping
//! brightness and saturation from the accumulated field strength, so both
//! directions are needed every frame. Both conversions are pure functions.
//!
//! Conventions: `h`, `s`, `v` are normalized to `[0, 1]`; `r`, `g`, `b`
//! live in `[0, 255]` (as `f64` mid-pipeline, rounded to `u8` only when a
//! pixel or a stored color is produced).

use bytemuck::{Pod, Zeroable};

/// Convert HSV (all in `[0, 1]`) to RGB in `[0, 255]`.
///
/// Standard six-sector conversion. Values outside the expected ranges are
/// not validated; the arithmetic produces whatever it produces.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let sector = (i as i64).rem_euclid(6);
    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    (r * 255.0, g * 255.0, b * 255.0)
}

/// Convert RGB in `[0, 255]` to HSV (all in `[0, 1]`).
///
/// The achromatic case (`max == min`) yields `h = 0, s = 0` without
/// dividing by zero.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let r = r / 255.0;
    let g = g / 255.0;
    let b = b / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { d / max };

    let mut h = 0.0;
    if d != 0.0 {
        h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h /= 6.0;
    }

    (h, s, v)
}

/// An 8-bit RGBA color as stored per source and written per pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Host-facing HSVA color tuple: hue in degrees `[0, 360)`, saturation and
/// value in percent `[0, 100]`, alpha in `[0, 1]`.
///
/// This is the format `AddSource` commands carry; it is converted to
/// [`Rgba8`] once, at source creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsva {
    pub h: f64,
    pub s: f64,
    pub v: f64,
    pub a: f64,
}

impl Hsva {
    pub const fn new(h: f64, s: f64, v: f64, a: f64) -> Self {
        Self { h, s, v, a }
    }
}

impl From<Hsva> for Rgba8 {
    fn from(c: Hsva) -> Self {
        let (r, g, b) = hsv_to_rgb(c.h / 360.0, c.s / 100.0, c.v / 100.0);
        Rgba8 {
            r: r.round() as u8,
            g: g.round() as u8,
            b: b.round() as u8,
            a: (c.a * 255.0).round() as u8,
        }
    }
}
