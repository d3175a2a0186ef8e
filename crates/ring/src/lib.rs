#![deny(unsafe_code)]
//! Hue ring with an inscribed saturation/value triangle.
//!
//! The ring of outer radius `R` and width `W` sits centered in a `2R × 2R`
//! widget. Angle around the ring is hue, measured with `atan2` in widget
//! pixels (0 along +x). An equilateral triangle is inscribed in the ring's
//! inner circle; its vertices are the pure hue (`s = 1, v = 1`), black
//! (`s = 1, v = 0`) and white (`s = 0, v = 1`). The triangle turns with the
//! hue so the hue vertex always points at the selected hue on the ring.
//!
//! Pointer → (s, v) uses edge-case decomposition: a pointer beyond one of
//! the triangle's edges is projected onto that edge, otherwise the affine
//! `(s, v) → point` map is inverted directly. The mapping is exact at the
//! vertices, continuous across the triangle, and clamps off-triangle drag
//! positions into range.

use std::f64::consts::{FRAC_PI_2, TAU};

use colordial_core::error::PickerError;
use colordial_core::geometry::{clamp_unit, point_in_annulus, Triangle};
use colordial_core::params::param_u32;
use colordial_core::{Channel, ColorModel, Foreground, Picker, Rgba};
use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default outer radius in pixels.
const DEFAULT_OUTER_RADIUS: u32 = 150;
/// Default ring band thickness in pixels.
const DEFAULT_RING_WIDTH: u32 = 35;
/// Slack for the edge tests, in units of the inner radius.
const EDGE_EPSILON: f64 = 1e-9;
/// Values at or below this count as the black vertex.
const BLACK_EPSILON: f64 = 1e-9;

/// Ring size settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Outer radius of the hue ring, in pixels.
    pub outer_radius: u32,
    /// Thickness of the hue band, in pixels.
    pub ring_width: u32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            outer_radius: DEFAULT_OUTER_RADIUS,
            ring_width: DEFAULT_RING_WIDTH,
        }
    }
}

impl RingConfig {
    /// Extracts settings from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            outer_radius: param_u32(params, "outer_radius", DEFAULT_OUTER_RADIUS),
            ring_width: param_u32(params, "ring_width", DEFAULT_RING_WIDTH),
        }
    }
}

/// What a pointer position lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    None,
    Ring,
    Triangle,
}

/// Which control owns the in-progress drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Capture {
    #[default]
    Idle,
    Ring,
    Triangle,
}

/// Validated ring and triangle dimensions plus the pixel math on them.
///
/// Pure: every method takes the hue it needs instead of reading a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    outer_radius: f64,
    ring_width: f64,
}

impl RingGeometry {
    /// Returns `PickerError::InvalidRingGeometry` unless
    /// `0 < ring_width < outer_radius`.
    pub fn new(config: RingConfig) -> Result<Self, PickerError> {
        if config.ring_width == 0 || config.outer_radius <= config.ring_width {
            log::debug!("rejecting ring config {config:?}");
            return Err(PickerError::InvalidRingGeometry {
                outer_radius: config.outer_radius,
                ring_width: config.ring_width,
            });
        }
        Ok(Self {
            outer_radius: f64::from(config.outer_radius),
            ring_width: f64::from(config.ring_width),
        })
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn ring_width(&self) -> f64 {
        self.ring_width
    }

    pub fn inner_radius(&self) -> f64 {
        self.outer_radius - self.ring_width
    }

    /// Side length of the inscribed triangle.
    pub fn triangle_side(&self) -> f64 {
        self.inner_radius() * 3.0 / 3.0_f64.sqrt()
    }

    pub fn triangle_height(&self) -> f64 {
        self.inner_radius() * 3.0 / 2.0
    }

    /// Widget side length (`2R`).
    pub fn size(&self) -> f64 {
        2.0 * self.outer_radius
    }

    /// Ring center in widget pixels.
    pub fn center(&self) -> DVec2 {
        DVec2::splat(self.outer_radius)
    }

    /// The unrotated triangle in its own frame: hue vertex on top, black
    /// bottom-left, white bottom-right.
    pub fn local_triangle(&self) -> Triangle {
        let side = self.triangle_side();
        let height = self.triangle_height();
        Triangle::new(
            DVec2::new(side / 2.0, 0.0),
            DVec2::new(0.0, height),
            DVec2::new(side, height),
        )
    }

    fn local_centroid(&self) -> DVec2 {
        DVec2::new(self.triangle_side() / 2.0, self.triangle_height() * 2.0 / 3.0)
    }

    /// Local triangle frame → widget pixels for the given hue.
    pub fn triangle_transform(&self, hue: f64) -> DAffine2 {
        DAffine2::from_translation(self.center())
            * DAffine2::from_angle(hue * TAU + FRAC_PI_2)
            * DAffine2::from_translation(-self.local_centroid())
    }

    /// The triangle in widget pixels, vertices ordered hue, black, white.
    pub fn triangle(&self, hue: f64) -> Triangle {
        self.local_triangle()
            .transformed(&self.triangle_transform(hue))
    }

    /// Ring first, then triangle; everything else misses.
    pub fn hit_test(&self, hue: f64, point: DVec2) -> HitTarget {
        if point_in_annulus(point - self.center(), self.inner_radius(), self.outer_radius) {
            HitTarget::Ring
        } else if self.triangle(hue).contains(point) {
            HitTarget::Triangle
        } else {
            HitTarget::None
        }
    }

    /// Hue for a pointer anywhere in the widget: `atan2(dy, dx) / 2π mod 1`.
    pub fn hue_at(&self, point: DVec2) -> f64 {
        let d = point - self.center();
        (d.y.atan2(d.x) / TAU).rem_euclid(1.0)
    }

    /// Saturation and value for a pointer, with the triangle rotated to `hue`.
    ///
    /// Positions off the triangle are projected onto the nearest edge; the
    /// result is always in [0, 1].
    pub fn saturation_value_at(&self, hue: f64, point: DVec2) -> (f64, f64) {
        let local = self.triangle_transform(hue).inverse().transform_point2(point);
        let scale = self.inner_radius();
        let centroid = self.local_centroid();
        // Centered on the centroid and scaled so the vertices lie on the unit
        // circle. Each vertex vector is then the normal of the opposite edge.
        let p = (local - centroid) / scale;
        let tri = self.local_triangle();
        let hue_pt = (tri.p1 - centroid) / scale;
        let black = (tri.p2 - centroid) / scale;
        let white = (tri.p3 - centroid) / scale;

        let (s, v) = if white.dot(p - black) < -EDGE_EPSILON {
            // Beyond the hue–black edge.
            (1.0, project(p - black, hue_pt - black))
        } else if hue_pt.dot(p - black) < -EDGE_EPSILON {
            // Beyond the black–white edge.
            (0.0, project(p - black, white - black))
        } else if black.dot(p - hue_pt) < -EDGE_EPSILON {
            // Beyond the hue–white edge.
            (project(p - white, hue_pt - white), 1.0)
        } else {
            // p = black + v·(white − black) + s·v·(hue − white)
            let hue_white = hue_pt - white;
            let v = (p - black).perp_dot(hue_white) / (white - black).perp_dot(hue_white);
            if v <= BLACK_EPSILON {
                (1.0, 0.0)
            } else {
                let rest = p - black - v * (white - black);
                let s = if hue_white.y.abs() < hue_white.x.abs() {
                    rest.x / (v * hue_white.x)
                } else {
                    rest.y / (v * hue_white.y)
                };
                (s, v)
            }
        };
        (clamp_unit(s), clamp_unit(v))
    }

    /// Widget pixel of the (s, v) indicator, with the triangle rotated to `hue`.
    pub fn triangle_pixel(&self, hue: f64, s: f64, v: f64) -> DVec2 {
        let Triangle {
            p1: hue_pt,
            p2: black,
            p3: white,
        } = self.triangle(hue);
        black + (white - black) * v + (hue_pt - white) * s * v
    }
}

/// Scalar projection of `a` onto `onto`, as a fraction of `onto`'s length.
fn project(a: DVec2, onto: DVec2) -> f64 {
    a.dot(onto) / onto.length_squared()
}

/// Ring-and-triangle picker with drag capture.
#[derive(Debug, Clone)]
pub struct RingPicker {
    geometry: RingGeometry,
    capture: Capture,
}

impl RingPicker {
    /// Returns `PickerError::InvalidRingGeometry` for a degenerate ring.
    pub fn new(config: RingConfig) -> Result<Self, PickerError> {
        Ok(Self {
            geometry: RingGeometry::new(config)?,
            capture: Capture::Idle,
        })
    }

    /// Creates a picker from a JSON settings object.
    ///
    /// Reads `outer_radius` and `ring_width`, falling back to defaults for
    /// missing keys.
    pub fn from_json(params: &Value) -> Result<Self, PickerError> {
        Self::new(RingConfig::from_json(params))
    }

    pub fn geometry(&self) -> &RingGeometry {
        &self.geometry
    }

    pub fn capture(&self) -> Capture {
        self.capture
    }

    pub fn hit_test(&self, model: &ColorModel, point: DVec2) -> HitTarget {
        let target = self.geometry.hit_test(model.h(), point);
        log::trace!("ring hit test at {point}: {target:?}");
        target
    }

    /// Sets the hue from the pointer angle. Saturation and value are kept.
    pub fn update_from_ring(&self, model: &mut ColorModel, point: DVec2) -> bool {
        model.set_h(self.geometry.hue_at(point))
    }

    /// Sets saturation and value from the pointer, as one mutation.
    pub fn update_from_triangle(&self, model: &mut ColorModel, point: DVec2) -> bool {
        let (s, v) = self.geometry.saturation_value_at(model.h(), point);
        model.set_channels(&[(Channel::Saturation, s), (Channel::Value, v)])
    }

    /// Direction of the ring indicator line, in radians.
    pub fn ring_indicator_angle(&self, model: &ColorModel) -> f64 {
        model.h() * TAU
    }

    pub fn triangle_indicator_pixel(&self, model: &ColorModel) -> DVec2 {
        self.geometry.triangle_pixel(model.h(), model.s(), model.v())
    }

    /// Current triangle in widget pixels.
    pub fn triangle_points(&self, model: &ColorModel) -> Triangle {
        self.geometry.triangle(model.h())
    }

    /// Outline color for the ring indicator, drawn over the pure hue.
    pub fn ring_outline(&self, model: &ColorModel) -> Foreground {
        Foreground::for_background(Rgba::from_hsv(model.h(), 1.0, 1.0))
    }

    /// Outline color for the triangle indicator, drawn over the current color.
    pub fn triangle_outline(&self, model: &ColorModel) -> Foreground {
        Foreground::for_background(model.color())
    }
}

impl Picker for RingPicker {
    fn press(&mut self, model: &mut ColorModel, point: DVec2, capturing: bool) -> bool {
        let target = self.hit_test(model, point);
        let captured = match target {
            HitTarget::Ring => {
                self.update_from_ring(model, point);
                Capture::Ring
            }
            HitTarget::Triangle => {
                self.update_from_triangle(model, point);
                Capture::Triangle
            }
            HitTarget::None => return false,
        };
        if capturing {
            log::debug!("ring picker captured {captured:?}");
            self.capture = captured;
        }
        true
    }

    fn drag(&mut self, model: &mut ColorModel, point: DVec2) -> bool {
        match self.capture {
            Capture::Ring => {
                self.update_from_ring(model, point);
                true
            }
            Capture::Triangle => {
                self.update_from_triangle(model, point);
                true
            }
            Capture::Idle => false,
        }
    }

    fn release(&mut self) {
        if self.capture != Capture::Idle {
            log::debug!("ring picker released {:?}", self.capture);
        }
        self.capture = Capture::Idle;
    }

    fn is_capturing(&self) -> bool {
        self.capture != Capture::Idle
    }
}
