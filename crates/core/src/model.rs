//! The color model: single source of truth for the selected color.
//!
//! [`ColorModel`] keeps RGB, HSV and alpha in step. Every public setter builds
//! a candidate [`ColorState`] with both representations already reconciled and
//! hands it to one private `apply`, which stores it and notifies listeners at
//! most once. Listeners receive `&ColorState` rather than the model, so a
//! notification can never write back into the model mid-update.

use serde::{Deserialize, Serialize};

use crate::color::{hsv_to_rgb, rgb_to_hsv, Rgba};
use crate::geometry::clamp_unit;

/// Which representation a channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFamily {
    Hsv,
    Rgb,
    Alpha,
}

/// One of the seven scalar fields of a [`ColorState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Hue,
    Saturation,
    Value,
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Hue,
        Channel::Saturation,
        Channel::Value,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
        Channel::Alpha,
    ];

    pub fn family(self) -> ChannelFamily {
        match self {
            Channel::Hue | Channel::Saturation | Channel::Value => ChannelFamily::Hsv,
            Channel::Red | Channel::Green | Channel::Blue => ChannelFamily::Rgb,
            Channel::Alpha => ChannelFamily::Alpha,
        }
    }

    /// Gradient stops `(offset, color)` for a slider track of this channel.
    ///
    /// Hue shows the fixed full-saturation rainbow. Alpha fades the current
    /// color in from transparent. Every other channel sweeps itself from 0 to
    /// 1 on an opaque copy of `state`.
    pub fn slider_stops(self, state: &ColorState) -> Vec<(f64, Rgba)> {
        match self {
            Channel::Hue => (0..=6)
                .map(|i| {
                    let t = f64::from(i) / 6.0;
                    (t, Rgba::from_hsv(t, 1.0, 1.0))
                })
                .collect(),
            Channel::Alpha => {
                let color = state.rgba();
                vec![(0.0, Rgba { a: 0.0, ..color }), (1.0, Rgba { a: 1.0, ..color })]
            }
            _ => [0.0, 1.0]
                .into_iter()
                .map(|t| {
                    let mut probe = state.with_channels(&[(self, t)]);
                    probe.a = 1.0;
                    (t, probe.rgba())
                })
                .collect(),
        }
    }
}

/// Snapshot of the selected color in both representations plus alpha.
///
/// All fields are in [0, 1]; hue is a fraction of a full turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorState {
    h: f64,
    s: f64,
    v: f64,
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl ColorState {
    /// Builds a consistent state from an RGBA color. Gray colors get hue 0.
    pub fn from_rgba(color: Rgba) -> Self {
        let (r, g, b) = (clamp_unit(color.r), clamp_unit(color.g), clamp_unit(color.b));
        let (h, s, v) = rgb_to_hsv(r, g, b);
        Self {
            h: h.unwrap_or(0.0),
            s,
            v,
            r,
            g,
            b,
            a: clamp_unit(color.a),
        }
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn channel(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Hue => self.h,
            Channel::Saturation => self.s,
            Channel::Value => self.v,
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
            Channel::Alpha => self.a,
        }
    }

    /// The color as RGBA.
    pub fn rgba(&self) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut f64 {
        match channel {
            Channel::Hue => &mut self.h,
            Channel::Saturation => &mut self.s,
            Channel::Value => &mut self.v,
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
            Channel::Alpha => &mut self.a,
        }
    }

    /// Recomputes h, s, v from r, g, b. Hue survives when the color is gray.
    fn sync_hsv(&mut self) {
        let (h, s, v) = rgb_to_hsv(self.r, self.g, self.b);
        if let Some(h) = h {
            self.h = h;
        }
        self.s = s;
        self.v = v;
    }

    fn sync_rgb(&mut self) {
        (self.r, self.g, self.b) = hsv_to_rgb(self.h, self.s, self.v);
    }

    /// Copy with the given channels overwritten (clamped) and the other
    /// representation recomputed.
    ///
    /// When RGB and HSV channels are mixed in one call, RGB wins: HSV is
    /// recomputed from the written RGB values.
    fn with_channels(&self, writes: &[(Channel, f64)]) -> Self {
        let mut next = *self;
        let mut rgb_written = false;
        let mut hsv_written = false;
        for &(channel, value) in writes {
            *next.channel_mut(channel) = clamp_unit(value);
            match channel.family() {
                ChannelFamily::Rgb => rgb_written = true,
                ChannelFamily::Hsv => hsv_written = true,
                ChannelFamily::Alpha => {}
            }
        }
        if rgb_written {
            next.sync_hsv();
        } else if hsv_written {
            next.sync_rgb();
        }
        next
    }
}

/// Handle returned by [`ColorModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&ColorState)>;

/// Owns the selected color and notifies listeners when it changes.
pub struct ColorModel {
    state: ColorState,
    initial: Rgba,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for ColorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorModel")
            .field("state", &self.state)
            .field("initial", &self.initial)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for ColorModel {
    /// Opaque white, the dialog's default initial color.
    fn default() -> Self {
        Self::new(Rgba::WHITE)
    }
}

impl ColorModel {
    /// Creates a model holding `initial`; [`reset`](Self::reset) returns to it.
    pub fn new(initial: Rgba) -> Self {
        let state = ColorState::from_rgba(initial);
        Self {
            state,
            initial: state.rgba(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &ColorState {
        &self.state
    }

    pub fn color(&self) -> Rgba {
        self.state.rgba()
    }

    pub fn h(&self) -> f64 {
        self.state.h
    }

    pub fn s(&self) -> f64 {
        self.state.s
    }

    pub fn v(&self) -> f64 {
        self.state.v
    }

    pub fn r(&self) -> f64 {
        self.state.r
    }

    pub fn g(&self) -> f64 {
        self.state.g
    }

    pub fn b(&self) -> f64 {
        self.state.b
    }

    pub fn a(&self) -> f64 {
        self.state.a
    }

    pub fn channel(&self, channel: Channel) -> f64 {
        self.state.channel(channel)
    }

    /// Registers a change listener, called once per effective mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&ColorState) + 'static) -> Subscription {
        let id = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    /// Writes several channels as one mutation.
    ///
    /// Returns true if the stored color changed (and listeners were notified).
    /// Writing values equal to the stored (clamped) ones is a no-op, even if
    /// recomputing the other representation would round differently.
    pub fn set_channels(&mut self, writes: &[(Channel, f64)]) -> bool {
        let unchanged = writes
            .iter()
            .all(|&(channel, value)| self.state.channel(channel) == clamp_unit(value));
        if unchanged {
            return false;
        }
        let next = self.state.with_channels(writes);
        self.apply(next)
    }

    pub fn set_channel(&mut self, channel: Channel, value: f64) -> bool {
        self.set_channels(&[(channel, value)])
    }

    pub fn set_rgb(&mut self, r: f64, g: f64, b: f64) -> bool {
        self.set_channels(&[(Channel::Red, r), (Channel::Green, g), (Channel::Blue, b)])
    }

    pub fn set_hsv(&mut self, h: f64, s: f64, v: f64) -> bool {
        self.set_channels(&[
            (Channel::Hue, h),
            (Channel::Saturation, s),
            (Channel::Value, v),
        ])
    }

    pub fn set_h(&mut self, h: f64) -> bool {
        self.set_channel(Channel::Hue, h)
    }

    pub fn set_s(&mut self, s: f64) -> bool {
        self.set_channel(Channel::Saturation, s)
    }

    pub fn set_v(&mut self, v: f64) -> bool {
        self.set_channel(Channel::Value, v)
    }

    pub fn set_r(&mut self, r: f64) -> bool {
        self.set_channel(Channel::Red, r)
    }

    pub fn set_g(&mut self, g: f64) -> bool {
        self.set_channel(Channel::Green, g)
    }

    pub fn set_b(&mut self, b: f64) -> bool {
        self.set_channel(Channel::Blue, b)
    }

    pub fn set_alpha(&mut self, a: f64) -> bool {
        self.set_channel(Channel::Alpha, a)
    }

    /// Writes RGB and alpha together, one notification at most.
    pub fn set_color(&mut self, color: Rgba) -> bool {
        self.set_channels(&[
            (Channel::Red, color.r),
            (Channel::Green, color.g),
            (Channel::Blue, color.b),
            (Channel::Alpha, color.a),
        ])
    }

    /// Restores the color the model was created with.
    pub fn reset(&mut self) -> bool {
        self.set_color(self.initial)
    }

    fn apply(&mut self, next: ColorState) -> bool {
        if next == self.state {
            return false;
        }
        log::trace!("color model: {:?} -> {:?}", self.state, next);
        self.state = next;
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
        true
    }
}
