//! The `Picker` trait implemented by every pointer-driven color picker.
//!
//! The trait is object-safe so a dialog can route pointer events to
//! `dyn Picker` without knowing which widget sits under the pointer.

use glam::DVec2;

use crate::model::ColorModel;

/// Pointer gesture handling shared by the ring and square pickers.
///
/// Points are widget-local pixels. Whether a press starts a drag (an
/// "imprecise" press-drag-release) or is a single jump is decided by the
/// caller's toolkit and passed in as `capturing`.
pub trait Picker {
    /// Handles a pointer press.
    ///
    /// If `point` hits a control, the model is updated from it and `true` is
    /// returned. With `capturing`, the hit control also captures the gesture
    /// until [`release`](Picker::release). A miss returns `false` so the
    /// caller can pass the event on.
    fn press(&mut self, model: &mut ColorModel, point: DVec2, capturing: bool) -> bool;

    /// Handles a pointer move.
    ///
    /// Routes to the captured control regardless of where `point` is.
    /// Returns `false` when nothing is captured.
    fn drag(&mut self, model: &mut ColorModel, point: DVec2) -> bool;

    /// Ends any captured gesture.
    fn release(&mut self);

    /// True while a gesture is captured.
    fn is_capturing(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal picker writing the pointer's x into alpha.
    struct MockPicker {
        captured: bool,
    }

    impl Picker for MockPicker {
        fn press(&mut self, model: &mut ColorModel, point: DVec2, capturing: bool) -> bool {
            model.set_alpha(point.x);
            self.captured = capturing;
            true
        }

        fn drag(&mut self, model: &mut ColorModel, point: DVec2) -> bool {
            if self.captured {
                model.set_alpha(point.x);
            }
            self.captured
        }

        fn release(&mut self) {
            self.captured = false;
        }

        fn is_capturing(&self) -> bool {
            self.captured
        }
    }

    #[test]
    fn picker_trait_is_object_safe() {
        let mut model = ColorModel::default();
        let mut picker: Box<dyn Picker> = Box::new(MockPicker { captured: false });
        assert!(picker.press(&mut model, DVec2::new(0.5, 0.0), true));
        assert!(picker.is_capturing());
        assert!(picker.drag(&mut model, DVec2::new(0.25, 0.0)));
        assert_eq!(model.a(), 0.25);
        picker.release();
        assert!(!picker.drag(&mut model, DVec2::new(0.75, 0.0)));
        assert_eq!(model.a(), 0.25);
    }
}
