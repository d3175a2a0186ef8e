//! Error types for colordial.

use thiserror::Error;

/// Errors produced when configuring pickers or parsing colors.
///
/// Pointer and channel input never fails; it is clamped. These errors only
/// come out of constructors and parsers.
#[derive(Debug, Error)]
pub enum PickerError {
    /// The ring leaves no room for the triangle (zero width, or the width
    /// swallows the whole radius).
    #[error(
        "invalid ring geometry: outer radius {outer_radius} must exceed ring width {ring_width} (> 0)"
    )]
    InvalidRingGeometry { outer_radius: u32, ring_width: u32 },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An axis style name was not recognized.
    #[error("unknown axis style: {0}")]
    UnknownStyle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_ring_geometry_includes_both_sizes() {
        let err = PickerError::InvalidRingGeometry {
            outer_radius: 30,
            ring_width: 35,
        };
        let msg = format!("{err}");
        assert!(msg.contains("30"), "missing outer radius in: {msg}");
        assert!(msg.contains("35"), "missing ring width in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let err = PickerError::InvalidColor("bad hex".into());
        let msg = format!("{err}");
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn unknown_style_includes_name() {
        let err = PickerError::UnknownStyle("magenta".into());
        let msg = format!("{err}");
        assert!(msg.contains("magenta"), "missing style name in: {msg}");
    }

    #[test]
    fn picker_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PickerError>();
    }

    #[test]
    fn picker_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PickerError>();
    }
}
