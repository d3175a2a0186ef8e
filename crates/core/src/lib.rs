#![deny(unsafe_code)]
//! Core types for the colordial color-selection engine.
//!
//! Provides the [`ColorModel`] (RGB/HSV/alpha kept in step, with change
//! notification), the [`Rgba`] value type and RGB↔HSV conversions, luminance
//! classification for contrasting outlines, the geometry primitives the
//! pickers hit-test with, the [`Picker`] gesture trait, and JSON settings
//! helpers.

pub mod color;
pub mod error;
pub mod geometry;
pub mod model;
pub mod params;
pub mod picker;

pub use color::{Foreground, Rgba};
pub use error::PickerError;
pub use geometry::Triangle;
pub use model::{Channel, ChannelFamily, ColorModel, ColorState, Subscription};
pub use picker::Picker;

pub use glam::DVec2;
