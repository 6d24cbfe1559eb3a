//! Sensor filters: shake-to-delete and ambient-light theme switching.
//!
//! Both filters are plain state machines over timestamped samples so the
//! platform layer only has to forward events; [`SensorHub`] ties them to the
//! foreground/background lifecycle.

mod ambient;
mod hub;
mod shake;

pub use ambient::{resolve_dark_mode, AmbientThemeSwitch, AmbientThresholds};
pub use hub::{SensorHub, SensorSignal};
pub use shake::{g_force, ShakeDetector, ShakeListener, ShakeSettings};

/// Standard gravity in m/s², used to express acceleration in g.
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// One reading delivered by the platform sensor service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// Acceleration along the device axes in m/s².
    Accelerometer {
        x: f32,
        y: f32,
        z: f32,
        timestamp_ms: u64,
    },
    /// Ambient illuminance in lux.
    Light { lux: f32, timestamp_ms: u64 },
}

impl SensorEvent {
    pub const fn timestamp_ms(&self) -> u64 {
        match self {
            Self::Accelerometer { timestamp_ms, .. } | Self::Light { timestamp_ms, .. } => {
                *timestamp_ms
            }
        }
    }
}
