use anyhow::Result;
use log::info;

use crate::{
    dispatch::GestureDispatcher, landmark_source::LandmarkSource, landmarks::LandmarkFrame,
    systems::HandTracker,
};

/// Run one detection result through the tracker and dispatch whatever it
/// produces. Returns the number of events dispatched.
pub fn handle_detections_message(
    hands: &[LandmarkFrame],
    tracker: &mut HandTracker,
    dispatcher: &dyn GestureDispatcher,
) -> usize {
    let events = tracker.handle_detections(hands);
    let count = events.len();
    for event in events {
        dispatcher.dispatch(event);
    }
    count
}

/// Drain a source synchronously until it ends. Returns the number of events dispatched.
pub fn replay(
    source: &mut dyn LandmarkSource,
    tracker: &mut HandTracker,
    dispatcher: &dyn GestureDispatcher,
) -> Result<usize> {
    let mut sent = 0;
    let mut detections = 0;
    while let Some(hands) = source.next_detection()? {
        detections += 1;
        sent += handle_detections_message(&hands, tracker, dispatcher);
    }
    info!(
        "Landmark source ended after {} detections; {} events dispatched",
        detections, sent
    );
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        dispatch::test_support::RecordingDispatcher, gestures::GestureEvent,
        landmark_source::JsonLinesSource, tracker_config::TrackerConfig,
    };

    /// One detection line with a left hand: index tip at (x,y), thumb and
    /// middle tips `pinch` apart, plus an idle right hand
    fn detection_line(timestamp: u64, x: f32, y: f32, pinch: f32) -> String {
        let mut left = vec![(0.5_f32, 0.5_f32, 0_f32); 21];
        left[8] = (x, y, 0.);
        left[4] = (0.2, 0.2, 0.);
        left[12] = (0.2 + pinch, 0.2, 0.);
        let right = vec![(0.1_f32, 0.1_f32, 0_f32); 21];
        let points = |pts: &[(f32, f32, f32)]| {
            pts.iter()
                .map(|(x, y, z)| format!(r#"{{"x":{x},"y":{y},"z":{z}}}"#))
                .collect::<Vec<_>>()
                .join(",")
        };
        format!(
            r#"{{"timestamp":{},"hands":[{{"handedness":"Right","landmarks":[{}]}},{{"handedness":"Left","landmarks":[{}]}}]}}"#,
            timestamp,
            points(&right[..]),
            points(&left[..])
        )
    }

    #[test]
    fn replayed_session_produces_expected_events() {
        let lines = [
            detection_line(0, 0.5, 0.5, 0.08),
            // Gated: inside the 30ms frame interval
            detection_line(10, 0.5, 0.5, 0.01),
            detection_line(30, 0.5, 0.5, 0.03),
            detection_line(60, 0.5, 0.5, 0.06),
            detection_line(90, 0.5, 0.5, 0.02),
            detection_line(600, 0.5, 0.5, 0.08),
            detection_line(630, 0.5, 0.5, 0.02),
        ];
        let mut source = JsonLinesSource::new(Cursor::new(lines.join("\n")));
        let mut tracker = HandTracker::new(&TrackerConfig::default());
        let dispatcher = RecordingDispatcher::default();

        let sent = replay(&mut source, &mut tracker, &dispatcher).unwrap();
        let events = dispatcher.events();
        assert_eq!(sent, events.len());

        let taps: Vec<GestureEvent> = events.iter().filter(|e| !e.is_cursor()).copied().collect();
        assert_eq!(
            taps,
            vec![
                GestureEvent::Pinch,
                GestureEvent::DoubleTap,
                GestureEvent::Pinch
            ]
        );
        // Cursor sends at 0, 60 and 600 (630 is inside the 60ms cursor interval)
        assert_eq!(events.iter().filter(|e| e.is_cursor()).count(), 3);
        assert_eq!(events[0], GestureEvent::Cursor { x: 240., y: 135. });
    }

    #[test]
    fn detections_without_control_hand_dispatch_nothing() {
        let mut tracker = HandTracker::new(&TrackerConfig::default());
        let dispatcher = RecordingDispatcher::default();
        assert_eq!(handle_detections_message(&[], &mut tracker, &dispatcher), 0);
        assert!(dispatcher.events().is_empty());
    }
}
