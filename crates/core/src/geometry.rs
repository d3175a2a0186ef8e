//! Geometry primitives shared by the pickers.
//!
//! Points are `glam::DVec2` in widget-local pixels (x right, y down) unless a
//! function says otherwise. Everything here is pure.

use glam::{DAffine2, DVec2};

use crate::color::Rgba;

/// A triangle given by its three vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: DVec2,
    pub p2: DVec2,
    pub p3: DVec2,
}

impl Triangle {
    pub fn new(p1: DVec2, p2: DVec2, p3: DVec2) -> Self {
        Self { p1, p2, p3 }
    }

    /// Maps every vertex through `transform`.
    pub fn transformed(&self, transform: &DAffine2) -> Self {
        Self {
            p1: transform.transform_point2(self.p1),
            p2: transform.transform_point2(self.p2),
            p3: transform.transform_point2(self.p3),
        }
    }

    /// Strict containment, see [`point_in_triangle`].
    pub fn contains(&self, point: DVec2) -> bool {
        point_in_triangle(point, self)
    }
}

/// True iff `inner <= |point| <= outer`, with `point` relative to the center.
pub fn point_in_annulus(point: DVec2, inner_radius: f64, outer_radius: f64) -> bool {
    let dist = point.length();
    inner_radius <= dist && dist <= outer_radius
}

/// Barycentric containment test relative to `p1`.
///
/// Points on an edge or a vertex are outside. A zero-area triangle contains
/// nothing.
pub fn point_in_triangle(point: DVec2, triangle: &Triangle) -> bool {
    let Triangle { p1, p2, p3 } = *triangle;
    let p = point;

    let area = 0.5
        * (-p2.y * p3.x + p1.y * (-p2.x + p3.x) + p1.x * (p2.y - p3.y) + p2.x * p3.y);
    if area == 0.0 {
        return false;
    }

    let s = (p1.y * p3.x - p1.x * p3.y + (p3.y - p1.y) * p.x + (p1.x - p3.x) * p.y)
        / (2.0 * area);
    let t = (p1.x * p2.y - p1.y * p2.x + (p1.y - p2.y) * p.x + (p2.x - p1.x) * p.y)
        / (2.0 * area);

    s > 0.0 && t > 0.0 && 1.0 - s - t > 0.0
}

/// Linear interpolation of the RGB channels; alpha is taken from `a`.
pub fn blend(a: Rgba, b: Rgba, ratio: f64) -> Rgba {
    Rgba {
        r: a.r * (1.0 - ratio) + b.r * ratio,
        g: a.g * (1.0 - ratio) + b.g * ratio,
        b: a.b * (1.0 - ratio) + b.b * ratio,
        a: a.a,
    }
}

/// Clamps `x` to `[lo, hi]`. NaN clamps to `lo`; never panics.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Clamps to the unit interval.
pub fn clamp_unit(x: f64) -> f64 {
    clamp(x, 0.0, 1.0)
}
