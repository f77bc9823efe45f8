use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::gestures::GestureEvent;

/// Sends gesture events to the executor.
///
/// Dispatch is fire-and-forget: it returns nothing, never blocks the caller and
/// never retries. The tracker is a continuous stream, so a lost cursor event is
/// superseded by the next one; failures are only logged.
pub trait GestureDispatcher {
    fn dispatch(&self, event: GestureEvent);
}

pub struct HttpDispatcher {
    client: reqwest::Client,
    url: String,
}

impl HttpDispatcher {
    /// `base_url` is the executor API root, e.g. `http://localhost:4000/api`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpDispatcher {
            client,
            url: gesture_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl GestureDispatcher for HttpDispatcher {
    /// Must be called from within a Tokio runtime
    fn dispatch(&self, event: GestureEvent) {
        let request = self.client.post(&self.url).json(&event);
        tokio::spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    debug!("Sent {:?}", event);
                }
                Ok(response) => {
                    warn!("Executor rejected {:?}: {}", event, response.status());
                }
                Err(e) => {
                    warn!("Failed to send {:?}: {}", event, e);
                }
            }
        });
    }
}

fn gesture_url(base_url: &str) -> String {
    format!("{}/gesture", base_url.trim_end_matches('/'))
}

/// Logs events instead of sending them
pub struct LoggingDispatcher;

impl GestureDispatcher for LoggingDispatcher {
    fn dispatch(&self, event: GestureEvent) {
        info!("(dry run) {:?}", event);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::RecordingDispatcher;
    use super::*;

    #[test]
    fn builds_gesture_url() {
        assert_eq!(
            gesture_url("http://localhost:4000/api"),
            "http://localhost:4000/api/gesture"
        );
        assert_eq!(
            gesture_url("http://10.0.0.2:4000/"),
            "http://10.0.0.2:4000/gesture"
        );
    }

    #[tokio::test]
    async fn unreachable_executor_does_not_block_or_panic() {
        // Nothing listens on port 9 (discard) on a test machine
        let dispatcher = HttpDispatcher::new("http://127.0.0.1:9/api").unwrap();
        dispatcher.dispatch(GestureEvent::Pinch);
        dispatcher.dispatch(GestureEvent::Cursor { x: 1., y: 2. });
        assert_eq!(dispatcher.url(), "http://127.0.0.1:9/api/gesture");
    }

    #[test]
    fn recording_dispatcher_keeps_order() {
        let dispatcher = RecordingDispatcher::default();
        dispatcher.dispatch(GestureEvent::Cursor { x: 1., y: 2. });
        dispatcher.dispatch(GestureEvent::DoubleTap);
        assert_eq!(
            dispatcher.events(),
            vec![GestureEvent::Cursor { x: 1., y: 2. }, GestureEvent::DoubleTap]
        );
    }
}
