pub mod cursor_filter;
pub mod dispatch_limiter;
pub mod frame_gate;
pub mod pinch;
pub mod tap;

use cursor_filter::{CursorFilter, CursorSettings};
use dispatch_limiter::DispatchLimiter;
use frame_gate::FrameGate;
use log::{debug, info};
use pinch::{PinchDetector, PinchTransition};
use serde::{Deserialize, Serialize};
use tap::TapClassifier;

use crate::{
    gestures::GestureEvent,
    landmarks::{Handedness, LandmarkFrame},
    tracker_config::TrackerConfig,
};

/// Snapshot of everything the tracker carries from one frame to the next
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    pub last_x: f32,
    pub last_y: f32,
    pub last_sent: Option<u64>,
    pub last_processed: Option<u64>,
    pub is_pinching: bool,
    pub last_pinch_time: Option<u64>,
    pub smoothing: f32,
}

/// The landmark-to-gesture pipeline for one tracking session (one camera, one
/// controlling hand). Every timestamp comes from the frames themselves, so the
/// tracker can be driven without a camera or a clock.
pub struct HandTracker {
    frame_gate: FrameGate,
    cursor_filter: CursorFilter,
    dispatch_limiter: DispatchLimiter,
    pinch_detector: PinchDetector,
    tap_classifier: TapClassifier,
    pointer_landmark: usize,
    pinch_landmarks: (usize, usize),
    control_hand: Handedness,
    hand_present: bool,
    last_transition: PinchTransition,
}

impl HandTracker {
    pub fn new(config: &TrackerConfig) -> Self {
        HandTracker {
            frame_gate: FrameGate::new(config.frame_interval_ms),
            cursor_filter: CursorFilter::new(CursorSettings {
                smoothing: config.smoothing,
                screen_width: config.screen_width,
                screen_height: config.screen_height,
            }),
            dispatch_limiter: DispatchLimiter::new(config.cursor_interval_ms),
            pinch_detector: PinchDetector::new(
                config.pinch_enter_threshold,
                config.pinch_exit_threshold,
            ),
            tap_classifier: TapClassifier::new(config.double_tap_window_ms),
            pointer_landmark: config.pointer_landmark,
            pinch_landmarks: config.pinch_landmarks,
            control_hand: config.control_hand,
            hand_present: false,
            last_transition: PinchTransition::None,
        }
    }

    /// Pick the hand that drives input; all others are ignored
    pub fn select_hand<'a>(&self, hands: &'a [LandmarkFrame]) -> Option<&'a LandmarkFrame> {
        hands.iter().find(|h| h.handedness() == self.control_hand)
    }

    /// Feed one detection result (zero or more hands)
    pub fn handle_detections(&mut self, hands: &[LandmarkFrame]) -> Vec<GestureEvent> {
        let selected = self.select_hand(hands);
        if selected.is_some() != self.hand_present {
            self.hand_present = selected.is_some();
            if self.hand_present {
                info!("{:?} hand found; now controlling pointer", self.control_hand);
            } else {
                info!("{:?} hand lost", self.control_hand);
            }
        }
        match selected {
            Some(frame) => self.tick(frame),
            None => Vec::new(),
        }
    }

    /// Run the full pipeline for one frame of the controlling hand. Returns the
    /// events to dispatch, cursor first.
    pub fn tick(&mut self, frame: &LandmarkFrame) -> Vec<GestureEvent> {
        let now = frame.timestamp_ms();
        let mut events = Vec::new();

        if !self.frame_gate.should_process(now) {
            return events;
        }

        // The smoothed position always advances, even when the send is throttled
        let (x, y) = self
            .cursor_filter
            .update(&frame.point(self.pointer_landmark));
        if self.dispatch_limiter.try_send(now) {
            events.push(GestureEvent::Cursor { x, y });
        }

        let (a, b) = self.pinch_landmarks;
        let transition = self.pinch_detector.update(frame.distance(a, b));
        match transition {
            PinchTransition::Start => {
                let tap = self.tap_classifier.classify(now);
                debug!("Pinch start at {}ms => {:?}", now, tap);
                events.push(tap);
            }
            PinchTransition::End => debug!("Pinch released at {}ms", now),
            PinchTransition::Hold | PinchTransition::None => {}
        }
        self.last_transition = transition;

        events
    }

    pub fn last_transition(&self) -> PinchTransition {
        self.last_transition
    }

    pub fn state(&self) -> TrackerState {
        let (last_x, last_y) = self.cursor_filter.position();
        TrackerState {
            last_x,
            last_y,
            last_sent: self.dispatch_limiter.last_sent(),
            last_processed: self.frame_gate.last_processed(),
            is_pinching: self.pinch_detector.is_pinching(),
            last_pinch_time: self.tap_classifier.last_activation(),
            smoothing: self.cursor_filter.smoothing(),
        }
    }

    /// Start over as if the camera had just been (re)initialised
    pub fn reset(&mut self) {
        self.frame_gate.reset();
        self.cursor_filter.reset();
        self.dispatch_limiter.reset();
        self.pinch_detector.reset();
        self.tap_classifier.reset();
        self.hand_present = false;
        self.last_transition = PinchTransition::None;
    }
}
