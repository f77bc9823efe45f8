pub mod dispatch;
pub mod executor;
pub mod geometry_utils;
pub mod gestures;
pub mod landmark_source;
pub mod landmarks;
pub mod session;
pub mod systems;
pub mod tracker_config;

pub type Point2D = (f32, f32);
