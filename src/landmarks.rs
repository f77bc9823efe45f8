use anyhow::{Result, anyhow};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::geometry_utils::distance_3d;

/// Number of keypoints the hand landmark model produces per hand
pub const LANDMARK_COUNT: usize = 21;

/// Hand landmark indices, following the MediaPipe hand landmark model
pub mod indices {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_TIP: usize = 12;
}

/// A single keypoint, normalised to the camera image: x and y in [0,1],
/// z is depth relative to the wrist
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn point(&self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand for one video frame. Immutable once built.
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
    handedness: Handedness,
    timestamp_ms: u64,
}

impl LandmarkFrame {
    pub fn new(landmarks: &[Landmark], handedness: Handedness, timestamp_ms: u64) -> Result<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks.try_into().map_err(|_| {
            anyhow!(
                "Expected {} landmarks, got {}",
                LANDMARK_COUNT,
                landmarks.len()
            )
        })?;
        Ok(LandmarkFrame {
            landmarks,
            handedness,
            timestamp_ms,
        })
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Out-of-range indices return the wrist
    pub fn point(&self, index: usize) -> Landmark {
        self.landmarks
            .get(index)
            .copied()
            .unwrap_or(self.landmarks[indices::WRIST])
    }

    /// Euclidean distance in normalised (x,y,z) space between two landmarks
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        distance_3d(&self.point(a), &self.point(b))
    }
}
