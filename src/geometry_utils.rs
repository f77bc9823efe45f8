use map_range::MapRange;

use crate::{Point2D, landmarks::Landmark};

pub fn distance_3d(a: &Landmark, b: &Landmark) -> f32 {
    nalgebra::distance(&a.point(), &b.point())
}

/// Map a normalised camera-space point onto the screen. The camera view is
/// mirrored for the user, so x is flipped: 0 lands on the right edge.
pub fn normalised_to_screen(x: f32, y: f32, screen_width: f32, screen_height: f32) -> Point2D {
    (
        x.map_range(0. ..1., screen_width..0.),
        y.map_range(0. ..1., 0. ..screen_height),
    )
}

/// Exponential moving average: `alpha` is the weight kept from the previous value,
/// so higher alpha means heavier smoothing (and more lag)
pub fn exponential_smoothing(prior: f32, target: f32, alpha: f32) -> f32 {
    prior * alpha + target * (1. - alpha)
}
