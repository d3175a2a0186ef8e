#![deny(unsafe_code)]
//! Axis-locked square pickers.
//!
//! A square widget maps its unit square onto two of the six color fields;
//! the third field of the same representation stays where the model has it.
//! X runs left to right from 0 to 1. Y is measured top-down, so the top row
//! is the driven field at 1 and the bottom row at 0.
//!
//! | Style      | X drives | Y drives (top→bottom) |
//! |------------|----------|-----------------------|
//! | Hue        | s        | 1 − v                 |
//! | Saturation | h        | 1 − v                 |
//! | Value      | h        | 1 − s                 |
//! | Red        | b        | 1 − g                 |
//! | Green      | b        | 1 − r                 |
//! | Blue       | r        | 1 − g                 |

use colordial_core::error::PickerError;
use colordial_core::geometry::clamp_unit;
use colordial_core::params::{param_string, param_u32};
use colordial_core::{Channel, ChannelFamily, ColorModel, ColorState, Foreground, Picker, Rgba};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default square side in pixels.
const DEFAULT_SIZE: u32 = 300;
/// Default style name.
const DEFAULT_STYLE: &str = "hue";

/// All style names, in declaration order.
const STYLE_NAMES: &[&str] = &["hue", "saturation", "value", "red", "green", "blue"];

/// `(x channel, y channel, held channel)` per style, indexed by discriminant.
const AXES: [(Channel, Channel, Channel); 6] = [
    (Channel::Saturation, Channel::Value, Channel::Hue),
    (Channel::Hue, Channel::Value, Channel::Saturation),
    (Channel::Hue, Channel::Saturation, Channel::Value),
    (Channel::Blue, Channel::Green, Channel::Red),
    (Channel::Blue, Channel::Red, Channel::Green),
    (Channel::Red, Channel::Green, Channel::Blue),
];

/// Which field is held fixed; the square spans the other two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisStyle {
    #[default]
    Hue,
    Saturation,
    Value,
    Red,
    Green,
    Blue,
}

impl AxisStyle {
    pub const ALL: [AxisStyle; 6] = [
        AxisStyle::Hue,
        AxisStyle::Saturation,
        AxisStyle::Value,
        AxisStyle::Red,
        AxisStyle::Green,
        AxisStyle::Blue,
    ];

    /// Looks a style up by its lowercase name.
    ///
    /// Returns `PickerError::UnknownStyle` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, PickerError> {
        STYLE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| PickerError::UnknownStyle(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        STYLE_NAMES[self as usize]
    }

    /// Returns a slice of all recognized style names.
    pub fn list_names() -> &'static [&'static str] {
        STYLE_NAMES
    }

    /// Channel driven by the x axis.
    pub fn x_channel(self) -> Channel {
        AXES[self as usize].0
    }

    /// Channel driven (inverted) by the y axis.
    pub fn y_channel(self) -> Channel {
        AXES[self as usize].1
    }

    /// Channel left untouched by the square.
    pub fn held_channel(self) -> Channel {
        AXES[self as usize].2
    }

    /// Representation the style works in.
    pub fn family(self) -> ChannelFamily {
        self.held_channel().family()
    }
}

/// One row of the square's background: gradient stops `(offset, color)`
/// running left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientRow {
    pub stops: Vec<(f64, Rgba)>,
}

impl GradientRow {
    /// Colors at the left and right edges.
    pub fn endpoints(&self) -> (Rgba, Rgba) {
        let first = self.stops.first().map_or(Rgba::BLACK, |s| s.1);
        let last = self.stops.last().map_or(Rgba::BLACK, |s| s.1);
        (first, last)
    }
}

/// `coord / extent` clamped to [0, 1]; zero for an empty extent.
fn ratio(coord: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        clamp_unit(coord / extent)
    } else {
        0.0
    }
}

/// Writes both driven fields from a pointer, as one mutation.
pub fn update_from_square(
    model: &mut ColorModel,
    style: AxisStyle,
    point: DVec2,
    size: DVec2,
) -> bool {
    let x = ratio(point.x, size.x);
    let y = ratio(point.y, size.y);
    log::trace!("{} square at ({x}, {y})", style.name());
    model.set_channels(&[(style.x_channel(), x), (style.y_channel(), 1.0 - y)])
}

/// Indicator position in pixels for the current color.
pub fn indicator_pixel(model: &ColorModel, style: AxisStyle, size: DVec2) -> DVec2 {
    DVec2::new(
        model.channel(style.x_channel()) * size.x,
        (1.0 - model.channel(style.y_channel())) * size.y,
    )
}

/// Gradient for pixel row `row` of a square `height` pixels tall.
///
/// Styles whose x axis is hue get a seven-stop rainbow; the others get two
/// stops. Stop colors are opaque.
pub fn gradient_stops(model: &ColorModel, style: AxisStyle, row: f64, height: f64) -> GradientRow {
    let y = ratio(row, height);
    let state = model.state();
    let offsets: Vec<f64> = if style.x_channel() == Channel::Hue {
        (0..=6).map(|i| f64::from(i) / 6.0).collect()
    } else {
        vec![0.0, 1.0]
    };
    GradientRow {
        stops: offsets
            .into_iter()
            .map(|t| (t, stop_color(state, style, t, y)))
            .collect(),
    }
}

fn stop_color(state: &ColorState, style: AxisStyle, x: f64, y: f64) -> Rgba {
    let value = |channel: Channel| {
        if channel == style.x_channel() {
            x
        } else if channel == style.y_channel() {
            1.0 - y
        } else {
            state.channel(channel)
        }
    };
    match style.family() {
        ChannelFamily::Rgb => Rgba::opaque(
            value(Channel::Red),
            value(Channel::Green),
            value(Channel::Blue),
        ),
        _ => Rgba::from_hsv(
            value(Channel::Hue),
            value(Channel::Saturation),
            value(Channel::Value),
        ),
    }
}

/// Square settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareConfig {
    pub style: AxisStyle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for SquareConfig {
    fn default() -> Self {
        Self {
            style: AxisStyle::Hue,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
        }
    }
}

impl SquareConfig {
    /// Extracts settings from a JSON object, falling back to defaults for
    /// missing keys.
    ///
    /// Returns `PickerError::UnknownStyle` if `style` names no style.
    pub fn from_json(params: &Value) -> Result<Self, PickerError> {
        Ok(Self {
            style: AxisStyle::from_name(&param_string(params, "style", DEFAULT_STYLE))?,
            width: param_u32(params, "width", DEFAULT_SIZE),
            height: param_u32(params, "height", DEFAULT_SIZE),
        })
    }
}

/// Square picker with drag capture.
#[derive(Debug, Clone)]
pub struct SquarePicker {
    style: AxisStyle,
    size: DVec2,
    captured: bool,
}

impl SquarePicker {
    pub fn new(config: SquareConfig) -> Self {
        Self {
            style: config.style,
            size: DVec2::new(f64::from(config.width), f64::from(config.height)),
            captured: false,
        }
    }

    pub fn from_json(params: &Value) -> Result<Self, PickerError> {
        SquareConfig::from_json(params).map(Self::new)
    }

    pub fn style(&self) -> AxisStyle {
        self.style
    }

    /// Switches the style. The model is not touched.
    pub fn set_style(&mut self, style: AxisStyle) {
        self.style = style;
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// Follows a widget resize.
    pub fn set_size(&mut self, size: DVec2) {
        self.size = size;
    }

    pub fn update(&self, model: &mut ColorModel, point: DVec2) -> bool {
        update_from_square(model, self.style, point, self.size)
    }

    pub fn indicator_pixel(&self, model: &ColorModel) -> DVec2 {
        indicator_pixel(model, self.style, self.size)
    }

    pub fn gradient_stops(&self, model: &ColorModel, row: f64) -> GradientRow {
        gradient_stops(model, self.style, row, self.size.y)
    }

    /// Outline color for the indicator, drawn over the current color.
    pub fn outline(&self, model: &ColorModel) -> Foreground {
        Foreground::for_background(model.color())
    }

    fn contains(&self, point: DVec2) -> bool {
        point.cmpge(DVec2::ZERO).all() && point.cmple(self.size).all()
    }
}

impl Picker for SquarePicker {
    fn press(&mut self, model: &mut ColorModel, point: DVec2, capturing: bool) -> bool {
        if !self.contains(point) {
            return false;
        }
        self.update(model, point);
        if capturing {
            log::debug!("{} square captured", self.style.name());
            self.captured = true;
        }
        true
    }

    fn drag(&mut self, model: &mut ColorModel, point: DVec2) -> bool {
        if self.captured {
            self.update(model, point);
        }
        self.captured
    }

    fn release(&mut self) {
        if self.captured {
            log::debug!("{} square released", self.style.name());
        }
        self.captured = false;
    }

    fn is_capturing(&self) -> bool {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn square() -> DVec2 {
        DVec2::new(300.0, 200.0)
    }

    // -- table --

    #[test]
    fn red_square_sets_blue_and_green() {
        let mut model = ColorModel::default();
        update_from_square(&mut model, AxisStyle::Red, DVec2::new(150.0, 50.0), square());
        assert!(approx_eq(model.b(), 0.5), "b = {}", model.b());
        assert!(approx_eq(model.g(), 0.75), "g = {}", model.g());
        assert!(approx_eq(model.r(), 1.0), "held red moved to {}", model.r());

        let at = indicator_pixel(&model, AxisStyle::Red, square());
        assert!(approx_eq(at.x / 300.0, 0.5) && approx_eq(at.y / 200.0, 0.25), "{at}");
    }

    #[test]
    fn table_matches_every_style() {
        let expected = [
            (AxisStyle::Hue, Channel::Saturation, Channel::Value),
            (AxisStyle::Saturation, Channel::Hue, Channel::Value),
            (AxisStyle::Value, Channel::Hue, Channel::Saturation),
            (AxisStyle::Red, Channel::Blue, Channel::Green),
            (AxisStyle::Green, Channel::Blue, Channel::Red),
            (AxisStyle::Blue, Channel::Red, Channel::Green),
        ];
        for (style, x, y) in expected {
            assert_eq!(style.x_channel(), x, "{style:?} x axis");
            assert_eq!(style.y_channel(), y, "{style:?} y axis");
            let held = style.held_channel();
            assert!(held != x && held != y, "{style:?} holds a driven channel");
            assert_eq!(held.family(), x.family(), "{style:?} mixes families");
            assert_eq!(held.family(), y.family(), "{style:?} mixes families");
        }
    }

    #[test]
    fn each_style_writes_its_pair_and_holds_the_third() {
        for style in AxisStyle::ALL {
            let mut model = ColorModel::new(Rgba::opaque(0.9, 0.6, 0.3));
            let held_before = model.channel(style.held_channel());
            update_from_square(&mut model, style, DVec2::new(60.0, 150.0), square());
            assert!(approx_eq(model.channel(style.x_channel()), 0.2), "{style:?} x");
            assert!(approx_eq(model.channel(style.y_channel()), 0.25), "{style:?} y");
            assert!(
                approx_eq(model.channel(style.held_channel()), held_before),
                "{style:?} moved its held channel"
            );
        }
    }

    #[test]
    fn top_left_and_bottom_right_corners() {
        let mut model = ColorModel::default();
        update_from_square(&mut model, AxisStyle::Hue, DVec2::ZERO, square());
        assert_eq!((model.s(), model.v()), (0.0, 1.0));
        update_from_square(&mut model, AxisStyle::Hue, square(), square());
        assert_eq!((model.s(), model.v()), (1.0, 0.0));
    }

    #[test]
    fn pointer_outside_the_square_is_clamped() {
        let mut model = ColorModel::default();
        update_from_square(&mut model, AxisStyle::Blue, DVec2::new(-40.0, 900.0), square());
        assert_eq!(model.r(), 0.0);
        assert_eq!(model.g(), 0.0);
    }

    #[test]
    fn empty_square_does_not_produce_nan() {
        let mut model = ColorModel::default();
        update_from_square(&mut model, AxisStyle::Green, DVec2::new(5.0, 5.0), DVec2::ZERO);
        assert_eq!(model.b(), 0.0);
        assert_eq!(model.r(), 1.0);
    }

    #[test]
    fn square_update_notifies_once() {
        let mut model = ColorModel::new(Rgba::opaque(0.2, 0.2, 0.2));
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        model.subscribe(move |_| c.set(c.get() + 1));
        update_from_square(&mut model, AxisStyle::Value, DVec2::new(100.0, 100.0), square());
        assert_eq!(count.get(), 1);
    }

    // -- gradients --

    #[test]
    fn hue_square_row_runs_white_to_hue() {
        let model = ColorModel::new(Rgba::opaque(1.0, 0.0, 0.0));
        let row = gradient_stops(&model, AxisStyle::Hue, 0.0, 200.0);
        let (left, right) = row.endpoints();
        assert_eq!(left.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(right.to_rgba8(), [255, 0, 0, 255]);

        let bottom = gradient_stops(&model, AxisStyle::Hue, 200.0, 200.0);
        let (left, right) = bottom.endpoints();
        assert_eq!(left.to_rgba8(), [0, 0, 0, 255]);
        assert_eq!(right.to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn saturation_square_row_is_a_rainbow() {
        let model = ColorModel::new(Rgba::opaque(1.0, 0.0, 0.0));
        let row = gradient_stops(&model, AxisStyle::Saturation, 0.0, 200.0);
        assert_eq!(row.stops.len(), 7);
        assert_eq!(row.stops[2].1.to_rgba8(), [0, 255, 0, 255]);
        assert_eq!(row.stops[4].1.to_rgba8(), [0, 0, 255, 255]);
    }

    #[test]
    fn rgb_square_rows_hold_the_model_channel() {
        let model = ColorModel::new(Rgba::opaque(0.4, 0.0, 0.0));
        let row = gradient_stops(&model, AxisStyle::Red, 100.0, 200.0);
        let (left, right) = row.endpoints();
        assert!(approx_eq(left.r, 0.4) && approx_eq(right.r, 0.4));
        assert!(approx_eq(left.g, 0.5) && approx_eq(right.g, 0.5));
        assert!(approx_eq(left.b, 0.0) && approx_eq(right.b, 1.0));

        let row = gradient_stops(&model, AxisStyle::Blue, 0.0, 200.0);
        let (left, right) = row.endpoints();
        assert!(approx_eq(left.r, 0.0) && approx_eq(right.r, 1.0));
        assert!(approx_eq(left.g, 1.0) && approx_eq(left.b, 0.0));
    }

    #[test]
    fn gradient_matches_color_picked_at_that_spot() {
        for style in AxisStyle::ALL {
            let mut model = ColorModel::new(Rgba::opaque(0.7, 0.3, 0.5));
            let row = gradient_stops(&model, style, 50.0, 200.0);
            let (_, right) = row.endpoints();
            update_from_square(&mut model, style, DVec2::new(300.0, 50.0), square());
            let picked = model.color();
            assert!(
                approx_eq(picked.r, right.r)
                    && approx_eq(picked.g, right.g)
                    && approx_eq(picked.b, right.b),
                "{style:?}: picked {picked:?}, gradient {right:?}"
            );
        }
    }

    // -- names / config --

    #[test]
    fn from_name_round_trips_every_style() {
        for style in AxisStyle::ALL {
            assert_eq!(AxisStyle::from_name(style.name()).unwrap(), style);
        }
        assert!(matches!(
            AxisStyle::from_name("purple"),
            Err(PickerError::UnknownStyle(_))
        ));
        assert_eq!(AxisStyle::list_names().len(), 6);
    }

    #[test]
    fn style_serializes_as_snake_case_name() {
        let json = serde_json::to_string(&AxisStyle::Saturation).unwrap();
        assert_eq!(json, "\"saturation\"");
    }

    #[test]
    fn config_from_json() {
        let config = SquareConfig::from_json(&json!({"style": "green", "width": 120})).unwrap();
        assert_eq!(config.style, AxisStyle::Green);
        assert_eq!((config.width, config.height), (120, 300));
        assert!(SquareConfig::from_json(&json!({"style": "cyan"})).is_err());
        assert_eq!(SquareConfig::from_json(&json!({})).unwrap(), SquareConfig::default());
    }

    // -- gestures --

    #[test]
    fn capturing_press_then_drag_outside() {
        let mut picker = SquarePicker::new(SquareConfig::default());
        let mut model = ColorModel::default();
        assert!(picker.press(&mut model, DVec2::new(150.0, 150.0), true));
        assert!(picker.is_capturing());
        assert!(picker.drag(&mut model, DVec2::new(-50.0, 600.0)));
        assert_eq!((model.s(), model.v()), (0.0, 0.0));
        picker.release();
        assert!(!picker.drag(&mut model, DVec2::new(300.0, 0.0)));
        assert_eq!((model.s(), model.v()), (0.0, 0.0));
    }

    #[test]
    fn press_outside_is_not_consumed() {
        let mut picker = SquarePicker::new(SquareConfig::default());
        let mut model = ColorModel::default();
        assert!(!picker.press(&mut model, DVec2::new(301.0, 10.0), true));
        assert!(!picker.is_capturing());
        assert_eq!(model.color(), Rgba::WHITE);
    }

    #[test]
    fn set_style_changes_the_mapping() {
        let mut picker = SquarePicker::new(SquareConfig::default());
        let mut model = ColorModel::new(Rgba::BLACK);
        picker.set_style(AxisStyle::Green);
        picker.set_size(DVec2::new(100.0, 100.0));
        picker.update(&mut model, DVec2::new(100.0, 0.0));
        assert_eq!(model.color().to_rgba8(), [255, 0, 255, 255]);
        let at = picker.indicator_pixel(&model);
        assert!(approx_eq(at.x, 100.0) && approx_eq(at.y, 0.0), "{at}");
        assert_eq!(picker.outline(&model), Foreground::Black);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_style() -> impl Strategy<Value = AxisStyle> {
            proptest::sample::select(AxisStyle::ALL.to_vec())
        }

        proptest! {
            #[test]
            fn indicator_is_the_inverse_of_update(
                style in any_style(),
                x in 0.0_f64..=300.0,
                y in 0.0_f64..=200.0,
            ) {
                let mut model = ColorModel::new(Rgba::opaque(0.5, 0.5, 0.5));
                update_from_square(&mut model, style, DVec2::new(x, y), square());
                let at = indicator_pixel(&model, style, square());
                prop_assert!((at.x - x).abs() < 1e-6, "{:?} x: {} vs {}", style, at.x, x);
                prop_assert!((at.y - y).abs() < 1e-6, "{:?} y: {} vs {}", style, at.y, y);
            }
        }
    }
}
