use std::path::Path;

use notes_core::config::NotesConfig;
use notes_core::screens::NotesApp;
use notes_core::sensors::{
    g_force, AmbientThemeSwitch, AmbientThresholds, SensorEvent, ShakeDetector, ShakeSettings,
};

use crate::cli::SensorCommands;
use crate::commands::common::{
    fetch_note, open_service, parse_csv_rows, parse_note_id, read_input, timestamp_ms,
    StoreTarget,
};
use crate::error::CliError;

/// A recognized shake in a replayed recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeHit {
    pub timestamp_ms: u64,
    pub g_force: f32,
}

/// A theme flip in a replayed recording.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeChange {
    pub timestamp_ms: u64,
    pub lux: f32,
    pub dark: bool,
}

pub async fn run_sensors(command: SensorCommands, target: &StoreTarget) -> Result<(), CliError> {
    let config = NotesConfig::load()?;
    match command {
        SensorCommands::Shake { input, note } => {
            let hits = replay_shake(&read_input(&input)?, config.shake)?;
            match note {
                Some(id) => delete_on_shake(&id, &hits, target).await,
                None => {
                    print_hits(&hits);
                    Ok(())
                }
            }
        }
        SensorCommands::Light { input, dark } => run_light(&input, config.ambient, dark),
    }
}

fn run_light(input: &Path, thresholds: AmbientThresholds, dark: bool) -> Result<(), CliError> {
    println!("start: {}", theme_label(dark));
    for change in replay_light(&read_input(input)?, thresholds, dark)? {
        println!(
            "{} ms: {} lux -> {}",
            change.timestamp_ms,
            change.lux,
            theme_label(change.dark)
        );
    }
    Ok(())
}

fn print_hits(hits: &[ShakeHit]) {
    if hits.is_empty() {
        println!("No shake recognized");
    }
    for hit in hits {
        println!("shake at {} ms ({:.2} g)", hit.timestamp_ms, hit.g_force);
    }
}

/// Open the note as if on the edit screen and let the first shake delete it.
async fn delete_on_shake(
    id: &str,
    hits: &[ShakeHit],
    target: &StoreTarget,
) -> Result<(), CliError> {
    let id = parse_note_id(id)?;
    let service = open_service(target).await?;
    let mut app = NotesApp::new();
    app.open_note(fetch_note(&service, &id).await?);

    for hit in hits {
        match app.on_shake(&service).await {
            Some(info) => println!("shake at {} ms: {info}", hit.timestamp_ms),
            None => println!("shake at {} ms: no note open", hit.timestamp_ms),
        }
    }
    if app.editing_id().is_some() {
        println!("No shake recognized; note {id} kept");
    }
    Ok(())
}

/// Run `t_ms,x,y,z` rows through the shake detector.
#[allow(clippy::cast_possible_truncation)]
pub fn replay_shake(raw: &str, settings: ShakeSettings) -> Result<Vec<ShakeHit>, CliError> {
    let mut detector = ShakeDetector::new(settings);
    let mut hits = Vec::new();

    for (line, values) in parse_csv_rows(raw, 4)? {
        let (x, y, z) = (values[1] as f32, values[2] as f32, values[3] as f32);
        let event = SensorEvent::Accelerometer {
            x,
            y,
            z,
            timestamp_ms: timestamp_ms(line, values[0])?,
        };
        if detector.on_event(&event) {
            hits.push(ShakeHit {
                timestamp_ms: event.timestamp_ms(),
                g_force: g_force(x, y, z),
            });
        }
    }
    Ok(hits)
}

/// Run `t_ms,lux` rows through the theme switch, reporting each flip.
#[allow(clippy::cast_possible_truncation)]
pub fn replay_light(
    raw: &str,
    thresholds: AmbientThresholds,
    initially_dark: bool,
) -> Result<Vec<ThemeChange>, CliError> {
    let mut switch = AmbientThemeSwitch::new(thresholds, initially_dark);
    let mut changes = Vec::new();

    for (line, values) in parse_csv_rows(raw, 2)? {
        let lux = values[1] as f32;
        let event = SensorEvent::Light {
            lux,
            timestamp_ms: timestamp_ms(line, values[0])?,
        };
        let before = switch.is_dark();
        if let Some(dark) = switch.on_event(&event) {
            if dark != before {
                changes.push(ThemeChange {
                    timestamp_ms: event.timestamp_ms(),
                    lux,
                    dark,
                });
            }
        }
    }
    Ok(changes)
}

const fn theme_label(dark: bool) -> &'static str {
    if dark {
        "dark"
    } else {
        "light"
    }
}
