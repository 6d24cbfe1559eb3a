use std::io::{self, Read};
use std::path::{Path, PathBuf};

use notes_core::config::{default_local_db_path, NotesConfig};
use notes_core::screens::{ListScreen, NoteCard, EMPTY_LIST_HINT};
use notes_core::store::NoteService;
use notes_core::{Note, NoteId};

use crate::auth::AnonymousAuthService;
use crate::error::CliError;

const DB_PATH_ENV: &str = "NOTES_DB_PATH";

/// Where note commands read and write.
#[derive(Debug, Clone, Default)]
pub struct StoreTarget {
    pub local: bool,
    pub db_path: Option<PathBuf>,
}

impl StoreTarget {
    pub fn new(local: bool, db_path: Option<PathBuf>) -> Self {
        let db_path = db_path.or_else(|| std::env::var_os(DB_PATH_ENV).map(PathBuf::from));
        Self {
            local: local || db_path.is_some(),
            db_path,
        }
    }

    pub fn local_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_local_db_path)
    }
}

/// Open the local store, or the realtime database signed in anonymously.
pub async fn open_service(target: &StoreTarget) -> Result<NoteService, CliError> {
    if target.local {
        return Ok(NoteService::open_local_path(target.local_path())?);
    }

    let config = NotesConfig::load()?;
    if !config.has_remote() {
        tracing::warn!("No database URL configured; falling back to the local store");
        return Ok(NoteService::open_local_path(target.local_path())?);
    }

    let auth = AnonymousAuthService::from_config(&config)
        .map_err(|error| CliError::Auth(error.to_string()))?;
    let session = match auth {
        Some(auth) => Some(
            auth.ensure_signed_in()
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?,
        ),
        None => {
            tracing::warn!("No API key configured; using the unscoped collection");
            None
        }
    };

    Ok(NoteService::open_remote(&config, session.as_ref())?)
}

pub fn parse_note_id(id: &str) -> Result<NoteId, CliError> {
    Ok(id.trim().parse::<NoteId>()?)
}

pub async fn fetch_note(service: &NoteService, id: &NoteId) -> Result<Note, CliError> {
    service
        .get(id)
        .await?
        .ok_or_else(|| CliError::NoteNotFound(id.to_string()))
}

pub fn format_card(card: &NoteCard) -> Vec<String> {
    let id = card.id.as_ref().map_or("-", NoteId::as_str);
    let mut lines = vec![format!("{id}  {}  ({})", card.title, card.type_line)];
    lines.extend(card.preview.lines().map(|line| format!("    {line}")));
    lines
}

/// Text rendering of the list screen.
pub fn format_list(screen: &ListScreen) -> Vec<String> {
    if screen.is_empty() {
        return vec![EMPTY_LIST_HINT.to_string()];
    }
    screen.cards().iter().flat_map(format_card).collect()
}

pub fn format_note_detail(note: &Note) -> Vec<String> {
    let id = note.id.as_ref().map_or("-", NoteId::as_str);
    vec![
        format!("id:      {id}"),
        format!("subject: {}", note.subject_label()),
        format!("type:    {}", note.type_label()),
        String::new(),
        note.content.clone().unwrap_or_default(),
    ]
}

/// Read a whole file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String, CliError> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Numeric CSV rows with their 1-based line numbers.
///
/// Blank lines, `#` comments, and a non-numeric header row are skipped.
pub fn parse_csv_rows(raw: &str, columns: usize) -> Result<Vec<(usize, Vec<f64>)>, CliError> {
    let mut rows = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields = line.split(',').map(str::trim).collect::<Vec<_>>();
        let values = fields
            .iter()
            .map(|field| field.parse::<f64>())
            .collect::<Result<Vec<_>, _>>();
        let values = match values {
            Ok(values) => values,
            Err(_) if rows.is_empty() && index == first_data_line(raw) => continue,
            Err(error) => {
                return Err(CliError::InvalidSample {
                    line: line_number,
                    message: error.to_string(),
                });
            }
        };
        if values.len() != columns {
            return Err(CliError::InvalidSample {
                line: line_number,
                message: format!("expected {columns} columns, found {}", values.len()),
            });
        }
        rows.push((line_number, values));
    }
    Ok(rows)
}

fn first_data_line(raw: &str) -> usize {
    raw.lines()
        .position(|line| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .unwrap_or(0)
}

/// Sample timestamp in milliseconds from a CSV field.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn timestamp_ms(line: usize, value: f64) -> Result<u64, CliError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CliError::InvalidSample {
            line,
            message: format!("timestamp must be a non-negative number, got {value}"),
        });
    }
    Ok(value as u64)
}
