//! Device sensor feed for the mobile webview.
//!
//! A long-lived eval script hooks motion, ambient light, the system colour
//! scheme and page visibility, and streams each reading back as JSON. Every
//! message becomes a [`PlatformEvent`] on the sensor channel.
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use notes_core::sensors::SensorEvent;
use serde::Deserialize;

#[cfg(target_os = "android")]
use dioxus::document;

use crate::sensors::PlatformEvent;

#[cfg(target_os = "android")]
const DEVICE_SENSOR_SCRIPT: &str = r#"
const send = (message) => dioxus.send(message);

window.addEventListener("devicemotion", (event) => {
    const a = event.accelerationIncludingGravity;
    if (!a || a.x == null || a.y == null || a.z == null) {
        return;
    }
    send({ kind: "motion", x: a.x, y: a.y, z: a.z, timestamp_ms: Date.now() });
});

let lightAvailable = false;
if (typeof AmbientLightSensor !== "undefined") {
    try {
        const sensor = new AmbientLightSensor();
        sensor.addEventListener("reading", () => {
            if (sensor.illuminance != null) {
                send({ kind: "light", lux: sensor.illuminance, timestamp_ms: Date.now() });
            }
        });
        sensor.addEventListener("error", () => send({ kind: "light_sensor", available: false }));
        sensor.start();
        lightAvailable = true;
    } catch (error) {
        lightAvailable = false;
    }
}
send({ kind: "light_sensor", available: lightAvailable });

const scheme = window.matchMedia("(prefers-color-scheme: dark)");
send({ kind: "theme", dark: scheme.matches });
scheme.addEventListener("change", (event) => send({ kind: "theme", dark: event.matches }));

const reportVisibility = () =>
    send({ kind: "visibility", visible: document.visibilityState === "visible" });
document.addEventListener("visibilitychange", reportVisibility);
reportVisibility();

await new Promise(() => {});
"#;

/// One message posted by the sensor script.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceMessage {
    /// Acceleration including gravity, m/s².
    Motion {
        x: f32,
        y: f32,
        z: f32,
        timestamp_ms: u64,
    },
    Light {
        lux: f32,
        timestamp_ms: u64,
    },
    LightSensor {
        available: bool,
    },
    Theme {
        dark: bool,
    },
    Visibility {
        visible: bool,
    },
}

impl From<DeviceMessage> for PlatformEvent {
    fn from(message: DeviceMessage) -> Self {
        match message {
            DeviceMessage::Motion {
                x,
                y,
                z,
                timestamp_ms,
            } => Self::Sensor(SensorEvent::Accelerometer {
                x,
                y,
                z,
                timestamp_ms,
            }),
            DeviceMessage::Light { lux, timestamp_ms } => {
                Self::Sensor(SensorEvent::Light { lux, timestamp_ms })
            }
            DeviceMessage::LightSensor { available } => Self::LightSensor { available },
            DeviceMessage::Theme { dark } => Self::SystemTheme { dark },
            DeviceMessage::Visibility { visible: true } => Self::Resumed,
            DeviceMessage::Visibility { visible: false } => Self::Paused,
        }
    }
}

pub fn parse_device_message(value: serde_json::Value) -> Result<PlatformEvent, serde_json::Error> {
    serde_json::from_value::<DeviceMessage>(value).map(PlatformEvent::from)
}

/// Install the sensor script and forward its messages until the webview or
/// the sensor channel goes away.
#[cfg(target_os = "android")]
pub async fn forward_device_sensors() {
    let mut eval = document::eval(DEVICE_SENSOR_SCRIPT);
    loop {
        let value = match eval.recv::<serde_json::Value>().await {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("Device sensor feed stopped: {}", error);
                return;
            }
        };
        match parse_device_message(value) {
            Ok(event) => {
                if !crate::sensors::publish(event) {
                    tracing::debug!("Sensor channel closed; stopping device feed");
                    return;
                }
            }
            Err(error) => tracing::warn!("Ignoring malformed device sensor message: {}", error),
        }
    }
}
