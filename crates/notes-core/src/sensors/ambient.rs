//! Ambient-light driven dark mode with hysteresis.

use serde::{Deserialize, Serialize};

use super::SensorEvent;
use crate::{Error, Result};

/// Lux bands: dark below the lower bound, light above the upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientThresholds {
    pub dark_below_lux: f32,
    pub light_above_lux: f32,
}

impl Default for AmbientThresholds {
    fn default() -> Self {
        Self {
            dark_below_lux: 20.0,
            light_above_lux: 40.0,
        }
    }
}

impl AmbientThresholds {
    pub fn validate(&self) -> Result<()> {
        if !(self.dark_below_lux.is_finite() && self.light_above_lux.is_finite()) {
            return Err(Error::InvalidInput(
                "ambient light thresholds must be finite".to_string(),
            ));
        }
        if self.dark_below_lux > self.light_above_lux {
            return Err(Error::InvalidInput(format!(
                "dark_below_lux ({}) must not exceed light_above_lux ({})",
                self.dark_below_lux, self.light_above_lux
            )));
        }
        Ok(())
    }
}

/// Three-band hysteresis switch over lux readings.
#[derive(Debug, Clone)]
pub struct AmbientThemeSwitch {
    thresholds: AmbientThresholds,
    dark: bool,
}

impl AmbientThemeSwitch {
    #[must_use]
    pub const fn new(thresholds: AmbientThresholds, initially_dark: bool) -> Self {
        Self {
            thresholds,
            dark: initially_dark,
        }
    }

    pub const fn is_dark(&self) -> bool {
        self.dark
    }

    /// Apply one reading and return the resulting dark-mode flag.
    pub fn update(&mut self, lux: f32) -> bool {
        tracing::debug!("lux = {lux}");
        if lux < self.thresholds.dark_below_lux {
            self.dark = true;
        } else if lux > self.thresholds.light_above_lux {
            self.dark = false;
        }
        self.dark
    }

    /// Apply a light event; returns the new flag, or `None` for other sensors.
    pub fn on_event(&mut self, event: &SensorEvent) -> Option<bool> {
        match *event {
            SensorEvent::Light { lux, .. } => Some(self.update(lux)),
            SensorEvent::Accelerometer { .. } => None,
        }
    }
}

/// Effective dark mode: the sensor flag when a light sensor exists,
/// otherwise the system preference.
pub fn resolve_dark_mode(light_sensor: Option<&AmbientThemeSwitch>, system_dark: bool) -> bool {
    light_sensor.map_or(system_dark, AmbientThemeSwitch::is_dark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_light_forces_dark() {
        let mut switch = AmbientThemeSwitch::new(AmbientThresholds::default(), false);
        assert!(switch.update(10.0));
    }

    #[test]
    fn bright_light_forces_light() {
        let mut switch = AmbientThemeSwitch::new(AmbientThresholds::default(), true);
        assert!(!switch.update(50.0));
    }

    #[test]
    fn middle_band_preserves_previous_state() {
        let mut switch = AmbientThemeSwitch::new(AmbientThresholds::default(), false);
        assert!(!switch.update(30.0));

        switch.update(10.0);
        assert!(switch.update(30.0));
    }

    #[test]
    fn band_edges_are_exclusive() {
        let mut switch = AmbientThemeSwitch::new(AmbientThresholds::default(), false);
        assert!(!switch.update(20.0));
        switch.update(5.0);
        assert!(switch.update(40.0));
    }

    #[test]
    fn accelerometer_events_are_ignored() {
        let mut switch = AmbientThemeSwitch::new(AmbientThresholds::default(), true);
        let event = SensorEvent::Accelerometer {
            x: 0.0,
            y: 0.0,
            z: 9.8,
            timestamp_ms: 0,
        };
        assert_eq!(switch.on_event(&event), None);
        assert!(switch.is_dark());
    }

    #[test]
    fn missing_sensor_follows_system_preference() {
        assert!(resolve_dark_mode(None, true));
        assert!(!resolve_dark_mode(None, false));

        let switch = AmbientThemeSwitch::new(AmbientThresholds::default(), false);
        assert!(!resolve_dark_mode(Some(&switch), true));
    }

    #[test]
    fn inverted_bands_are_rejected() {
        let thresholds = AmbientThresholds {
            dark_below_lux: 50.0,
            light_above_lux: 40.0,
        };
        assert!(thresholds.validate().is_err());
    }
}
