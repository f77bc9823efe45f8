/// Throttles how often the landmark pipeline runs, independent of how often
/// frames arrive. Skipping a frame does not stop anything; the caller simply
/// offers the next one.
pub struct FrameGate {
    interval_ms: u64,
    last_processed: Option<u64>,
}

impl FrameGate {
    pub fn new(interval_ms: u64) -> Self {
        FrameGate {
            interval_ms,
            last_processed: None,
        }
    }

    /// Returns true (and records `now_ms` as processed) if enough time has passed
    /// since the last processed frame.
    pub fn should_process(&mut self, now_ms: u64) -> bool {
        let due = match self.last_processed {
            None => true,
            // A timestamp earlier than the last one means the source restarted
            Some(last) => now_ms
                .checked_sub(last)
                .is_none_or(|elapsed| elapsed >= self.interval_ms),
        };
        if due {
            self.last_processed = Some(now_ms);
        }
        due
    }

    pub fn last_processed(&self) -> Option<u64> {
        self.last_processed
    }

    pub fn reset(&mut self) {
        self.last_processed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_always_processed() {
        let mut gate = FrameGate::new(30);
        assert!(gate.should_process(0));
        assert_eq!(gate.last_processed(), Some(0));
    }

    #[test]
    fn skips_until_interval_elapsed() {
        let mut gate = FrameGate::new(30);
        assert!(gate.should_process(100));
        assert!(!gate.should_process(110));
        assert!(!gate.should_process(129));
        // Skips never move the reference point
        assert_eq!(gate.last_processed(), Some(100));
        assert!(gate.should_process(130));
        assert!(!gate.should_process(140));
        assert!(gate.should_process(175));
    }

    #[test]
    fn fast_render_loop_is_throttled() {
        let mut gate = FrameGate::new(30);
        // ~120Hz display refresh for one second
        let processed = (0..120)
            .map(|i| i * 1000 / 120)
            .filter(|t| gate.should_process(*t))
            .count();
        assert!(processed <= 34, "processed {processed} frames");
        assert!(processed >= 25, "processed {processed} frames");
    }

    #[test]
    fn earlier_timestamp_is_treated_as_restart() {
        let mut gate = FrameGate::new(30);
        assert!(gate.should_process(5000));
        assert!(gate.should_process(10));
        assert!(!gate.should_process(20));
    }
}
