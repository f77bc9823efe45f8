use crate::{
    Point2D,
    geometry_utils::{exponential_smoothing, normalised_to_screen},
    landmarks::Landmark,
};

pub struct CursorSettings {
    pub smoothing: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

/// Maps a fingertip landmark to screen space and smooths it over time.
///
/// The smoothed position starts at (0,0), so the first frame of a session
/// pulls the cursor in from the top-left corner.
pub struct CursorFilter {
    settings: CursorSettings,
    position: Point2D,
}

impl CursorFilter {
    pub fn new(settings: CursorSettings) -> Self {
        CursorFilter {
            settings,
            position: (0., 0.),
        }
    }

    pub fn target(&self, landmark: &Landmark) -> Point2D {
        normalised_to_screen(
            landmark.x,
            landmark.y,
            self.settings.screen_width,
            self.settings.screen_height,
        )
    }

    /// Blend the new target into the smoothed position and return it
    pub fn update(&mut self, landmark: &Landmark) -> Point2D {
        let (target_x, target_y) = self.target(landmark);
        let (x, y) = self.position;
        let alpha = self.settings.smoothing;
        self.position = (
            exponential_smoothing(x, target_x, alpha),
            exponential_smoothing(y, target_y, alpha),
        );
        self.position
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn smoothing(&self) -> f32 {
        self.settings.smoothing
    }

    pub fn reset(&mut self) {
        self.position = (0., 0.);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(smoothing: f32) -> CursorFilter {
        CursorFilter::new(CursorSettings {
            smoothing,
            screen_width: 1920.,
            screen_height: 1080.,
        })
    }

    #[test]
    fn first_update_blends_from_origin() {
        let mut f = filter(0.75);
        let (x, y) = f.update(&Landmark::new(0.5, 0.5, 0.));
        assert!((x - 240.).abs() < 1e-3);
        assert!((y - 135.).abs() < 1e-3);
        assert_eq!(f.position(), (x, y));
    }

    #[test]
    fn converges_on_steady_fingertip() {
        let mut f = filter(0.7);
        let tip = Landmark::new(0.25, 0.8, 0.);
        let (tx, ty) = f.target(&tip);
        assert!((tx - 1440.).abs() < 1e-3);
        assert!((ty - 864.).abs() < 1e-3);

        let mut last = (0., 0.);
        for _ in 0..100 {
            let p = f.update(&tip);
            assert!(p.0 >= last.0 - 1e-3 && p.0 <= tx + 1e-3);
            assert!(p.1 >= last.1 - 1e-3 && p.1 <= ty + 1e-3);
            last = p;
        }
        assert!((last.0 - tx).abs() < 0.5);
        assert!((last.1 - ty).abs() < 0.5);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut f = filter(0.75);
        f.update(&Landmark::new(0.1, 0.9, 0.));
        f.reset();
        assert_eq!(f.position(), (0., 0.));
    }
}
