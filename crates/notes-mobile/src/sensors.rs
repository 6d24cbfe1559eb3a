//! Bridge between the platform sensor callbacks and the UI.
//!
//! Platform glue pushes [`PlatformEvent`]s from any thread with [`publish`];
//! the app shell drains them with [`take_events`] and runs each through a
//! [`SensorBridge`].
#![cfg_attr(not(target_os = "android"), allow(dead_code))]

use std::sync::{Mutex, OnceLock, PoisonError};

use notes_core::config::NotesConfig;
use notes_core::sensors::{AmbientThresholds, SensorEvent, SensorHub, SensorSignal, ShakeSettings};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    Sensor(SensorEvent),
    /// Activity came to the foreground.
    Resumed,
    /// Activity went to the background.
    Paused,
    SystemTheme { dark: bool },
    LightSensor { available: bool },
}

/// What the UI has to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiSignal {
    Shake,
    Theme { dark: bool },
}

struct Channel {
    sender: UnboundedSender<PlatformEvent>,
    receiver: Mutex<Option<UnboundedReceiver<PlatformEvent>>>,
}

static CHANNEL: OnceLock<Channel> = OnceLock::new();

fn channel() -> &'static Channel {
    CHANNEL.get_or_init(|| {
        let (sender, receiver) = mpsc::unbounded_channel();
        Channel {
            sender,
            receiver: Mutex::new(Some(receiver)),
        }
    })
}

/// Queue an event for the UI. Returns `false` once the receiver is gone.
pub fn publish(event: PlatformEvent) -> bool {
    channel().sender.send(event).is_ok()
}

pub fn publish_accelerometer(x: f32, y: f32, z: f32, timestamp_ms: u64) -> bool {
    publish(PlatformEvent::Sensor(SensorEvent::Accelerometer {
        x,
        y,
        z,
        timestamp_ms,
    }))
}

pub fn publish_light(lux: f32, timestamp_ms: u64) -> bool {
    publish(PlatformEvent::Sensor(SensorEvent::Light { lux, timestamp_ms }))
}

/// The receiving end; only the first caller gets it.
pub fn take_events() -> Option<UnboundedReceiver<PlatformEvent>> {
    channel()
        .receiver
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

/// Sensor filters plus the state needed to pick the theme.
#[derive(Debug, Clone)]
pub struct SensorBridge {
    hub: SensorHub,
    shake: ShakeSettings,
    ambient: AmbientThresholds,
    system_dark: bool,
}

impl SensorBridge {
    /// Starts paused and without a light sensor until the platform reports one.
    pub fn new(config: &NotesConfig) -> Self {
        Self {
            hub: SensorHub::new(config.shake, None),
            shake: config.shake,
            ambient: config.ambient,
            system_dark: false,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.hub.is_dark(self.system_dark)
    }

    pub const fn is_listening(&self) -> bool {
        self.hub.is_active()
    }

    pub fn handle(&mut self, event: PlatformEvent) -> Option<UiSignal> {
        match event {
            PlatformEvent::Sensor(event) => match self.hub.dispatch(&event)? {
                SensorSignal::Shake => Some(UiSignal::Shake),
                SensorSignal::ThemeChanged { dark } => Some(UiSignal::Theme { dark }),
            },
            PlatformEvent::Resumed => {
                self.hub.resume();
                None
            }
            PlatformEvent::Paused => {
                self.hub.pause();
                None
            }
            PlatformEvent::SystemTheme { dark } => {
                self.theme_change(|bridge| bridge.system_dark = dark)
            }
            PlatformEvent::LightSensor { available } => {
                if available == self.hub.has_light_sensor() {
                    return None;
                }
                self.theme_change(|bridge| {
                    let active = bridge.hub.is_active();
                    bridge.hub = SensorHub::new(bridge.shake, available.then_some(bridge.ambient));
                    if active {
                        bridge.hub.resume();
                    }
                })
            }
        }
    }

    fn theme_change(&mut self, update: impl FnOnce(&mut Self)) -> Option<UiSignal> {
        let before = self.is_dark();
        update(self);
        let dark = self.is_dark();
        (dark != before).then_some(UiSignal::Theme { dark })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn shake(timestamp_ms: u64) -> PlatformEvent {
        PlatformEvent::Sensor(SensorEvent::Accelerometer {
            x: 25.0,
            y: 0.0,
            z: 0.0,
            timestamp_ms,
        })
    }

    fn light(lux: f32) -> PlatformEvent {
        PlatformEvent::Sensor(SensorEvent::Light {
            lux,
            timestamp_ms: 0,
        })
    }

    #[test]
    fn shakes_only_count_while_resumed() {
        let mut bridge = SensorBridge::new(&NotesConfig::default());
        assert_eq!(bridge.handle(shake(0)), None);

        bridge.handle(PlatformEvent::Resumed);
        assert!(bridge.is_listening());
        assert_eq!(bridge.handle(shake(0)), Some(UiSignal::Shake));
        assert_eq!(bridge.handle(shake(500)), None);

        bridge.handle(PlatformEvent::Paused);
        assert_eq!(bridge.handle(shake(5_000)), None);
    }

    #[test]
    fn theme_follows_system_without_light_sensor() {
        let mut bridge = SensorBridge::new(&NotesConfig::default());
        bridge.handle(PlatformEvent::Resumed);
        assert_eq!(bridge.handle(light(1.0)), None);

        assert_eq!(
            bridge.handle(PlatformEvent::SystemTheme { dark: true }),
            Some(UiSignal::Theme { dark: true })
        );
        assert_eq!(bridge.handle(PlatformEvent::SystemTheme { dark: true }), None);
        assert!(bridge.is_dark());
    }

    #[test]
    fn light_sensor_drives_theme_once_available() {
        let mut bridge = SensorBridge::new(&NotesConfig::default());
        bridge.handle(PlatformEvent::Resumed);
        assert_eq!(
            bridge.handle(PlatformEvent::SystemTheme { dark: true }),
            Some(UiSignal::Theme { dark: true })
        );

        assert_eq!(
            bridge.handle(PlatformEvent::LightSensor { available: true }),
            Some(UiSignal::Theme { dark: false })
        );
        assert!(bridge.is_listening());
        assert_eq!(
            bridge.handle(light(10.0)),
            Some(UiSignal::Theme { dark: true })
        );
        assert_eq!(bridge.handle(light(30.0)), None);
        assert_eq!(
            bridge.handle(light(45.0)),
            Some(UiSignal::Theme { dark: false })
        );
    }

    #[tokio::test]
    async fn published_events_reach_the_receiver_once() {
        let mut events = take_events().unwrap();
        assert!(take_events().is_none());

        assert!(publish_light(12.0, 7));
        assert!(publish(PlatformEvent::Paused));
        assert_eq!(
            events.recv().await,
            Some(PlatformEvent::Sensor(SensorEvent::Light {
                lux: 12.0,
                timestamp_ms: 7
            }))
        );
        assert_eq!(events.recv().await, Some(PlatformEvent::Paused));
    }
}
