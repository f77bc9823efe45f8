use crate::gestures::GestureEvent;

/// Classifies pinch activations as single or double taps.
///
/// Each activation is compared only with the one before it, and always becomes
/// the new reference, so a rapid run of activations yields one `Pinch`
/// followed by `DoubleTap`s.
pub struct TapClassifier {
    double_tap_window_ms: u64,
    last_activation: Option<u64>,
}

impl TapClassifier {
    pub fn new(double_tap_window_ms: u64) -> Self {
        TapClassifier {
            double_tap_window_ms,
            last_activation: None,
        }
    }

    /// Call on every Idle -> Active pinch transition
    pub fn classify(&mut self, now_ms: u64) -> GestureEvent {
        let is_double = self.last_activation.is_some_and(|last| {
            now_ms
                .checked_sub(last)
                .is_some_and(|gap| gap < self.double_tap_window_ms)
        });
        self.last_activation = Some(now_ms);
        if is_double {
            GestureEvent::DoubleTap
        } else {
            GestureEvent::Pinch
        }
    }

    pub fn last_activation(&self) -> Option<u64> {
        self.last_activation
    }

    pub fn reset(&mut self) {
        self.last_activation = None;
    }
}
