//! Two-finger rotation gestures.

use engine::Engine;

/// Deltas below this are treated as finger jitter and dropped.
pub const JITTER_THRESHOLD_DEG: f64 = 0.1;

#[derive(Debug, Default)]
pub struct GestureAdapter {
    active: bool,
}

impl GestureAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn begin(&mut self) {
        self.active = true;
    }

    pub fn end(&mut self) {
        self.active = false;
    }

    /// Forwards one incremental rotation delta (degrees, positive
    /// clockwise). Ignored outside an active gesture and below the jitter
    /// threshold.
    pub fn rotate(&mut self, engine: &mut Engine, delta_deg: f64) {
        if !self.active || !delta_deg.is_finite() {
            return;
        }
        if delta_deg.abs() < JITTER_THRESHOLD_DEG {
            return;
        }
        engine.rotate_bearing(delta_deg);
    }
}
