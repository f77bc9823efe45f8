use std::{fs, io::ErrorKind};

use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::landmarks::{Handedness, LANDMARK_COUNT, indices};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerConfig {
    // -------- FRAME GATE
    /// Minimum time (ms) between two processed frames, regardless of how often
    /// new landmark frames arrive
    pub frame_interval_ms: u64,

    // -------- CURSOR FILTER
    /// Weight kept from the previous smoothed position, in the range (0,1) exclusive.
    /// Higher is smoother but lags more.
    pub smoothing: f32,

    /// Screen size (px) of the host whose pointer is being driven
    pub screen_width: f32,
    pub screen_height: f32,

    /// Which landmark drives the cursor (default: index fingertip)
    pub pointer_landmark: usize,

    // -------- PINCH / TAP
    /// The two landmarks whose distance defines a pinch (default: thumb tip, middle fingertip)
    pub pinch_landmarks: (usize, usize),

    /// Pinch starts when the distance drops below this
    pub pinch_enter_threshold: f32,

    /// Pinch ends when the distance rises above this; must be greater than the enter threshold
    pub pinch_exit_threshold: f32,

    /// Two activations closer together than this (ms) count as a double tap
    pub double_tap_window_ms: u64,

    // -------- DISPATCH
    /// Minimum time (ms) between two cursor events sent to the executor
    pub cursor_interval_ms: u64,

    /// Only this hand drives input; any others are ignored
    pub control_hand: Handedness,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            frame_interval_ms: 30,
            smoothing: 0.75,
            screen_width: 1920.,
            screen_height: 1080.,
            pointer_landmark: indices::INDEX_FINGER_TIP,
            pinch_landmarks: (indices::THUMB_TIP, indices::MIDDLE_FINGER_TIP),
            pinch_enter_threshold: 0.035,
            pinch_exit_threshold: 0.05,
            double_tap_window_ms: 400,
            cursor_interval_ms: 60,
            control_hand: Handedness::Left,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing > 0. && self.smoothing < 1.) {
            bail!(
                "Smoothing must be between 0 and 1 (exclusive), got {}",
                self.smoothing
            );
        }
        if self.pinch_enter_threshold <= 0. {
            bail!(
                "Pinch enter threshold must be above 0, got {}",
                self.pinch_enter_threshold
            );
        }
        if self.pinch_exit_threshold <= self.pinch_enter_threshold {
            bail!(
                "Pinch exit threshold ({}) must be greater than enter threshold ({})",
                self.pinch_exit_threshold,
                self.pinch_enter_threshold
            );
        }
        if self.screen_width <= 0. || self.screen_height <= 0. {
            bail!(
                "Screen size must be positive, got {}x{}",
                self.screen_width,
                self.screen_height
            );
        }
        let (a, b) = self.pinch_landmarks;
        for i in [self.pointer_landmark, a, b] {
            if i >= LANDMARK_COUNT {
                bail!("Landmark index {} out of range (0..{})", i, LANDMARK_COUNT);
            }
        }
        Ok(())
    }

    pub fn write_config_to_file(&self, config_file_path: &str) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, text)
            .with_context(|| format!("Error writing config to file {}", config_file_path))?;
        info!("Wrote config to file: {:?}", config_file_path);
        Ok(())
    }
}

/// Load and validate the tracker config. A missing file is not an error: the
/// defaults are used and written out so they can be edited.
pub fn load_config_from_file(config_file_path: &str) -> Result<TrackerConfig> {
    let config = match fs::read_to_string(config_file_path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Tracker config file not found, will create one with defaults at {}",
                &config_file_path
            );
            let config = TrackerConfig::default();
            config.write_config_to_file(config_file_path)?;
            config
        }
        Err(e) => {
            return Err(anyhow!(
                "Failed to load tracker config from {}: {}",
                config_file_path,
                e
            ));
        }
        Ok(s) => {
            info!("Loaded tracker config OK from \"{}\"", config_file_path);
            serde_json::from_str::<TrackerConfig>(&s)
                .map_err(|e| anyhow!("Failed to parse config data: {}", e))?
        }
    };
    debug!("Tracker config: {:?}", &config);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let mut p = std::env::temp_dir();
        p.push(format!("{}-{}.json", name, std::process::id()));
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn defaults_are_valid() {
        TrackerConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_inverted_hysteresis() {
        let config = TrackerConfig {
            pinch_enter_threshold: 0.05,
            pinch_exit_threshold: 0.05,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_smoothing_outside_open_interval() {
        for smoothing in [0., 1., -0.2, 1.5] {
            let config = TrackerConfig {
                smoothing,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "accepted smoothing {smoothing}");
        }
    }

    #[test]
    fn rejects_out_of_range_landmark() {
        let config = TrackerConfig {
            pointer_landmark: 21,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let path = temp_path("partial-gestures");
        fs::write(&path, r#"{ "smoothing": 0.7, "controlHand": "Right" }"#).unwrap();
        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.smoothing, 0.7);
        assert_eq!(config.control_hand, Handedness::Right);
        assert_eq!(config.cursor_interval_ms, 60);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_writes_defaults() {
        let path = temp_path("missing-gestures");
        let _ = fs::remove_file(&path);
        let config = load_config_from_file(&path).unwrap();
        assert_eq!(config.frame_interval_ms, 30);
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("pinchExitThreshold"));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let path = temp_path("broken-gestures");
        fs::write(&path, "not json").unwrap();
        assert!(load_config_from_file(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
