//! Lifecycle-aware routing of sensor events to the filters.

use super::{AmbientThemeSwitch, AmbientThresholds, SensorEvent, ShakeDetector, ShakeSettings};

/// What a dispatched event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSignal {
    /// A shake gesture was recognized.
    Shake,
    /// The ambient-light dark-mode flag changed to the given value.
    ThemeChanged { dark: bool },
}

/// Holds the filters and whether listeners are currently registered.
///
/// Listeners are registered on resume and unregistered on pause; events that
/// still arrive while paused are dropped.
#[derive(Debug, Clone)]
pub struct SensorHub {
    active: bool,
    shake: ShakeDetector,
    ambient: Option<AmbientThemeSwitch>,
}

impl SensorHub {
    /// `ambient` is `None` on devices without a light sensor.
    #[must_use]
    pub const fn new(shake: ShakeSettings, ambient: Option<AmbientThresholds>) -> Self {
        Self {
            active: false,
            shake: ShakeDetector::new(shake),
            ambient: match ambient {
                Some(thresholds) => Some(AmbientThemeSwitch::new(thresholds, false)),
                None => None,
            },
        }
    }

    pub fn resume(&mut self) {
        if !self.active {
            tracing::debug!("Registering sensor listeners");
            self.active = true;
        }
    }

    pub fn pause(&mut self) {
        if self.active {
            tracing::debug!("Unregistering sensor listeners");
            self.active = false;
        }
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub const fn has_light_sensor(&self) -> bool {
        self.ambient.is_some()
    }

    /// Effective dark mode given the system preference.
    pub fn is_dark(&self, system_dark: bool) -> bool {
        super::resolve_dark_mode(self.ambient.as_ref(), system_dark)
    }

    pub fn dispatch(&mut self, event: &SensorEvent) -> Option<SensorSignal> {
        if !self.active {
            return None;
        }

        match event {
            SensorEvent::Accelerometer { .. } => {
                self.shake.on_event(event).then_some(SensorSignal::Shake)
            }
            SensorEvent::Light { .. } => {
                let ambient = self.ambient.as_mut()?;
                let before = ambient.is_dark();
                let dark = ambient.on_event(event)?;
                (dark != before).then_some(SensorSignal::ThemeChanged { dark })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shake_event(timestamp_ms: u64) -> SensorEvent {
        SensorEvent::Accelerometer {
            x: 30.0,
            y: 0.0,
            z: 0.0,
            timestamp_ms,
        }
    }

    fn light(lux: f32) -> SensorEvent {
        SensorEvent::Light {
            lux,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn paused_hub_drops_events() {
        let mut hub = SensorHub::new(ShakeSettings::default(), Some(AmbientThresholds::default()));
        assert_eq!(hub.dispatch(&shake_event(0)), None);

        hub.resume();
        assert_eq!(hub.dispatch(&shake_event(0)), Some(SensorSignal::Shake));

        hub.pause();
        assert_eq!(hub.dispatch(&shake_event(5_000)), None);
    }

    #[test]
    fn theme_changes_are_reported_once() {
        let mut hub = SensorHub::new(ShakeSettings::default(), Some(AmbientThresholds::default()));
        hub.resume();

        assert_eq!(
            hub.dispatch(&light(5.0)),
            Some(SensorSignal::ThemeChanged { dark: true })
        );
        assert_eq!(hub.dispatch(&light(8.0)), None);
        assert_eq!(hub.dispatch(&light(30.0)), None);
        assert_eq!(
            hub.dispatch(&light(90.0)),
            Some(SensorSignal::ThemeChanged { dark: false })
        );
    }

    #[test]
    fn without_light_sensor_theme_follows_system() {
        let mut hub = SensorHub::new(ShakeSettings::default(), None);
        hub.resume();
        assert!(!hub.has_light_sensor());
        assert_eq!(hub.dispatch(&light(1.0)), None);
        assert!(hub.is_dark(true));
        assert!(!hub.is_dark(false));
    }
}
