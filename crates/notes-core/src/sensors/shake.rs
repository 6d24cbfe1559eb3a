//! Shake gesture detection over accelerometer samples.

use serde::{Deserialize, Serialize};

use super::{SensorEvent, STANDARD_GRAVITY};
use crate::{Error, Result};

/// Threshold and debounce window for shake recognition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeSettings {
    /// Minimum g-force that counts as a shake.
    pub threshold_g: f32,
    /// Minimum time between two recognized shakes.
    pub cooldown_ms: u64,
}

impl Default for ShakeSettings {
    fn default() -> Self {
        Self {
            threshold_g: 1.8,
            cooldown_ms: 1000,
        }
    }
}

impl ShakeSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_g.is_finite() || self.threshold_g <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "shake threshold must be a positive number of g, got {}",
                self.threshold_g
            )));
        }
        Ok(())
    }
}

/// Magnitude of an acceleration vector (m/s²) expressed in g.
#[allow(clippy::cast_possible_truncation)]
pub fn g_force(x: f32, y: f32, z: f32) -> f32 {
    let g_x = f64::from(x / STANDARD_GRAVITY);
    let g_y = f64::from(y / STANDARD_GRAVITY);
    let g_z = f64::from(z / STANDARD_GRAVITY);
    (g_x * g_x + g_y * g_y + g_z * g_z).sqrt() as f32
}

/// Debounced threshold filter.
///
/// A sample fires when its g-force is strictly above the threshold and
/// strictly more than the cooldown has passed since the last firing.
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    settings: ShakeSettings,
    last_shake_ms: Option<u64>,
}

impl ShakeDetector {
    #[must_use]
    pub const fn new(settings: ShakeSettings) -> Self {
        Self {
            settings,
            last_shake_ms: None,
        }
    }

    pub const fn settings(&self) -> ShakeSettings {
        self.settings
    }

    /// Feed one accelerometer sample; returns true when a shake is recognized.
    pub fn on_sample(&mut self, x: f32, y: f32, z: f32, timestamp_ms: u64) -> bool {
        let force = g_force(x, y, z);
        if force.is_nan() || force <= self.settings.threshold_g {
            return false;
        }

        let cooled_down = self.last_shake_ms.map_or(true, |last| {
            timestamp_ms.saturating_sub(last) > self.settings.cooldown_ms
        });
        if !cooled_down {
            tracing::debug!("Ignoring shake at {force:.2}g inside cooldown window");
            return false;
        }

        tracing::debug!("Shake recognized at {force:.2}g");
        self.last_shake_ms = Some(timestamp_ms);
        true
    }

    /// Feed any sensor event; non-accelerometer events are ignored.
    pub fn on_event(&mut self, event: &SensorEvent) -> bool {
        match *event {
            SensorEvent::Accelerometer {
                x,
                y,
                z,
                timestamp_ms,
            } => self.on_sample(x, y, z, timestamp_ms),
            SensorEvent::Light { .. } => false,
        }
    }
}

/// A detector bound to a callback, invoked once per recognized shake.
pub struct ShakeListener<F: FnMut()> {
    detector: ShakeDetector,
    on_shake: F,
}

impl<F: FnMut()> ShakeListener<F> {
    pub const fn new(settings: ShakeSettings, on_shake: F) -> Self {
        Self {
            detector: ShakeDetector::new(settings),
            on_shake,
        }
    }

    pub fn on_event(&mut self, event: &SensorEvent) {
        if self.detector.on_event(event) {
            (self.on_shake)();
        }
    }
}
