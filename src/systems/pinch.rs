use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinchState {
    #[default]
    Idle,
    Active,
}

/// Result of feeding one distance sample to the state machine
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinchTransition {
    /// Idle -> Active
    Start,
    /// Active -> Idle
    End,
    /// Still active
    Hold,
    /// Still idle
    #[default]
    None,
}

/// Two-threshold pinch detector. The gap between `enter_threshold` and
/// `exit_threshold` is a dead zone where the state never changes, so noise
/// around a single boundary value cannot toggle it.
pub struct PinchDetector {
    enter_threshold: f32,
    exit_threshold: f32,
    state: PinchState,
}

impl PinchDetector {
    pub fn new(enter_threshold: f32, exit_threshold: f32) -> Self {
        PinchDetector {
            enter_threshold,
            exit_threshold,
            state: PinchState::Idle,
        }
    }

    pub fn update(&mut self, distance: f32) -> PinchTransition {
        match self.state {
            PinchState::Idle if distance < self.enter_threshold => {
                self.state = PinchState::Active;
                PinchTransition::Start
            }
            PinchState::Active if distance > self.exit_threshold => {
                self.state = PinchState::Idle;
                PinchTransition::End
            }
            PinchState::Active => PinchTransition::Hold,
            PinchState::Idle => PinchTransition::None,
        }
    }

    pub fn state(&self) -> PinchState {
        self.state
    }

    pub fn is_pinching(&self) -> bool {
        self.state == PinchState::Active
    }

    pub fn reset(&mut self) {
        self.state = PinchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enters_and_exits_at_separate_thresholds() {
        let mut p = PinchDetector::new(0.035, 0.05);
        assert_eq!(p.update(0.08), PinchTransition::None);
        assert_eq!(p.update(0.035), PinchTransition::None);
        assert_eq!(p.update(0.034), PinchTransition::Start);
        assert!(p.is_pinching());
        assert_eq!(p.update(0.05), PinchTransition::Hold);
        assert_eq!(p.update(0.051), PinchTransition::End);
        assert_eq!(p.state(), PinchState::Idle);
    }

    #[test]
    fn dead_zone_never_retriggers() {
        let mut p = PinchDetector::new(0.035, 0.05);
        assert_eq!(p.update(0.02), PinchTransition::Start);
        for d in [0.036, 0.049, 0.04, 0.034, 0.045, 0.02, 0.0499] {
            assert_eq!(p.update(d), PinchTransition::Hold);
        }
        assert!(p.is_pinching());
    }

    #[test]
    fn dead_zone_does_not_activate_from_idle() {
        let mut p = PinchDetector::new(0.035, 0.05);
        for d in [0.049, 0.04, 0.036, 0.045] {
            assert_eq!(p.update(d), PinchTransition::None);
        }
        assert!(!p.is_pinching());
    }

    #[test]
    fn noisy_signal_at_one_boundary_toggles_once() {
        let mut p = PinchDetector::new(0.035, 0.05);
        let starts = [0.036, 0.034, 0.036, 0.034, 0.036, 0.034]
            .iter()
            .filter(|d| p.update(**d) == PinchTransition::Start)
            .count();
        assert_eq!(starts, 1);
    }
}
