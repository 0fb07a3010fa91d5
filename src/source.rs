//! Read-only access to a SQLite page-view log.
//!
//! Expected table layout (name configurable):
//! `session_id TEXT, url_path TEXT, created_at TEXT` with timestamps in any form
//! SQLite's date functions understand. SQLite normalizes them to UTC before decoding.

use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::config::EventStoreConfig;
use crate::error::AppError;
use crate::funnel::TimeWindow;
use crate::models::Event;

pub struct EventStore {
    path: PathBuf,
    table: String,
}

/// The table name is spliced into SQL, so only `[A-Za-z0-9_]+` is accepted.
pub fn check_table_name(table: &str) -> Result<(), AppError> {
    let plain = !table.is_empty()
        && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "event_store.table '{}' is not a plain identifier",
            table
        )))
    }
}

impl EventStore {
    pub fn new(path: &Path, table: &str) -> Result<Self, AppError> {
        check_table_name(table)?;
        Ok(Self {
            path: path.to_path_buf(),
            table: table.to_string(),
        })
    }

    pub fn from_config(config: &EventStoreConfig) -> Result<Self, AppError> {
        Self::new(&config.path, &config.table)
    }

    fn connect(&self) -> Result<Connection, AppError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Page views inside `window`, oldest first.
    pub fn load_events(&self, window: &TimeWindow) -> Result<Vec<Event>, AppError> {
        let conn = self.connect()?;
        let sql = format!(
            "SELECT session_id, url_path, strftime('%Y-%m-%d %H:%M:%f', created_at) FROM {} \
             WHERE julianday(created_at) BETWEEN julianday(?1) AND julianday(?2) \
             ORDER BY julianday(created_at), rowid",
            self.table
        );
        let mut stmt = conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![window.start, window.end], |row| {
                Ok(Event {
                    session_id: row.get(0)?,
                    path: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    occurred_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            table = %self.table,
            events = events.len(),
            "loaded events"
        );
        Ok(events)
    }
}
