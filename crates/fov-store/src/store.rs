use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use fov_core::{SETTINGS_NAMESPACE, Setting, SettingsError, SettingsStore};

use crate::error::Result;
use crate::schema;

/// Per-user integer settings, one SQLite file, scoped by namespace.
pub struct SettingsDb {
    conn: Connection,
    namespace: String,
}

impl SettingsDb {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            namespace: SETTINGS_NAMESPACE.to_string(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn,
            namespace: SETTINGS_NAMESPACE.to_string(),
        })
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn get_value(&self, setting: Setting) -> Result<Option<i64>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE namespace = ?1 AND name = ?2",
                params![self.namespace, setting.key()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_value(&self, setting: Setting, value: i64) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (namespace, name, value, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))",
            params![self.namespace, setting.key(), value],
        )?;
        Ok(())
    }

    /// Returns whether anything was removed.
    pub fn remove(&self, setting: Setting) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM settings WHERE namespace = ?1 AND name = ?2",
            params![self.namespace, setting.key()],
        )?;
        Ok(removed > 0)
    }

    /// Every known setting in this namespace with its stored value, if any.
    pub fn list(&self) -> Result<Vec<(Setting, Option<i64>)>> {
        Setting::ALL
            .into_iter()
            .map(|setting| self.get_value(setting).map(|value| (setting, value)))
            .collect()
    }
}

impl SettingsStore for SettingsDb {
    fn get(&self, setting: Setting) -> Option<i64> {
        match self.get_value(setting) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("failed to read {setting}: {e}");
                None
            }
        }
    }

    fn set(&mut self, setting: Setting, value: i64) -> std::result::Result<(), SettingsError> {
        self.set_value(setting, value).map_err(SettingsError::from)
    }
}
