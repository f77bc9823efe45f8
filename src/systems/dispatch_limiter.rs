/// Caps the rate of outbound cursor events. Only cursor updates go through
/// here; tap events are always sent straight away.
pub struct DispatchLimiter {
    min_interval_ms: u64,
    last_sent: Option<u64>,
}

impl DispatchLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        DispatchLimiter {
            min_interval_ms,
            last_sent: None,
        }
    }

    /// Returns true if a cursor event may be sent now, and records it as sent
    pub fn try_send(&mut self, now_ms: u64) -> bool {
        let allowed = match self.last_sent {
            None => true,
            Some(last) => now_ms
                .checked_sub(last)
                .is_none_or(|elapsed| elapsed >= self.min_interval_ms),
        };
        if allowed {
            self.last_sent = Some(now_ms);
        }
        allowed
    }

    pub fn last_sent(&self) -> Option<u64> {
        self.last_sent
    }

    pub fn reset(&mut self) {
        self.last_sent = None;
    }
}
