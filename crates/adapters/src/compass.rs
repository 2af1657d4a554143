//! Device compass tracking.
//!
//! The adapter tracks whether the user has compass mode on and forwards
//! heading samples only while tracking. Sample delivery from the platform
//! is asynchronous, so a sample can still arrive after `stop()`; it is
//! dropped here before it can overwrite a manual change.

use engine::{Engine, RotationSource};

#[derive(Debug, Default)]
pub struct CompassAdapter {
    tracking: bool,
}

impl CompassAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Switches the engine's rotation source to the compass. Idempotent.
    pub fn start(&mut self, engine: &mut Engine) {
        if self.tracking {
            return;
        }
        self.tracking = true;
        engine.set_rotation_source(RotationSource::Compass);
    }

    /// Hands bearing authority back to manual control; the engine adopts
    /// the current bearing as the manual baseline. Idempotent.
    pub fn stop(&mut self, engine: &mut Engine) {
        if !self.tracking {
            return;
        }
        self.tracking = false;
        engine.set_rotation_source(RotationSource::Manual);
    }

    /// Forwards one absolute heading sample (degrees from north).
    pub fn sample(&mut self, engine: &mut Engine, heading_deg: f64) {
        if !self.tracking {
            log::debug!("compass sample {heading_deg:.1} dropped, not tracking");
            return;
        }
        engine.compass_heading(heading_deg);
    }
}
