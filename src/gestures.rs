use serde::{Deserialize, Serialize};

/// A discrete input event produced by the tracker. Serialises to the body of
/// `POST /gesture`, e.g. `{"action":"cursor","x":12.5,"y":40}` or `{"action":"double-tap"}`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum GestureEvent {
    /// Absolute screen-space pixel position
    Cursor { x: f32, y: f32 },
    Pinch,
    DoubleTap,
}

impl GestureEvent {
    pub fn is_cursor(&self) -> bool {
        matches!(self, GestureEvent::Cursor { .. })
    }
}
