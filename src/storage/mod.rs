//! Local profile store
//!
//! This module persists the session documents that the browser build keeps
//! in local storage, under the same fixed keys: `temporalSelves` (profile,
//! written by onboarding), `temporalSelvesWithChat` (profile plus chat,
//! written here), and `temporalSelvesReflection` (final answers, written
//! here).
//!
//! Reads degrade gracefully: a missing key or malformed JSON value means
//! "not initialized" and yields `Ok(None)`, never an error the UI has to
//! handle. Writes are last-write-wins with no locking, matching the
//! single-user contract.

use crate::error::{Result, TemporalError};
use crate::reflection::ReflectionRecord;
use crate::session::{ProfileWithChat, SessionProfile};
use anyhow::Context;
use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

/// Storage key for the onboarding profile
pub const KEY_PROFILE: &str = "temporalSelves";
/// Storage key for the profile with chat transcripts
pub const KEY_PROFILE_WITH_CHAT: &str = "temporalSelvesWithChat";
/// Storage key for the final reflection answers
pub const KEY_REFLECTION: &str = "temporalSelvesReflection";

/// Keyed JSON document store backed by sqlite
pub struct ProfileStore {
    db_path: PathBuf,
}

impl ProfileStore {
    /// Create a new store in the user's data directory
    ///
    /// The path can be overridden with the `TEMPORAL_SELVES_DB` environment
    /// variable, which makes it easy to point the binary at a test DB or an
    /// alternate file without changing the application data dir.
    pub fn new() -> Result<Self> {
        if let Ok(override_path) = std::env::var("TEMPORAL_SELVES_DB") {
            return Self::new_with_path(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "xbcsmith", "temporal-selves")
            .ok_or_else(|| TemporalError::Storage("Could not determine data directory".into()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .context("Failed to create data directory")
            .map_err(|e| TemporalError::Storage(e.to_string()))?;

        let db_path = data_dir.join("profile.db");
        let store = Self { db_path };
        store.init()?;

        Ok(store)
    }

    /// Create a new store that uses the specified database path
    ///
    /// This is primarily useful for tests where the default application
    /// data directory is not desirable.
    ///
    /// # Examples
    ///
    /// ```
    /// use temporal_selves::storage::ProfileStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = ProfileStore::new_with_path(dir.path().join("profile.db")).unwrap();
    /// assert!(store.load_profile().unwrap().is_none());
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| TemporalError::Storage(e.to_string()))?;
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                value JSON NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create tables")
        .map_err(|e| TemporalError::Storage(e.to_string()))?;

        Ok(())
    }

    fn connection(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| TemporalError::Storage(e.to_string()).into())
    }

    /// Write a JSON document under a key, replacing any previous value
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let conn = self.connection()?;

        let json = serde_json::to_string(value)
            .context("Failed to serialize document")
            .map_err(|e| TemporalError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT INTO documents (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                            updated_at = excluded.updated_at",
            params![key, json, Utc::now().to_rfc3339()],
        )
        .context("Failed to write document")
        .map_err(|e| TemporalError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Read a JSON document under a key
    ///
    /// A missing key or a value that no longer deserializes is treated as
    /// "not initialized" and returns `Ok(None)`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let conn = self.connection()?;

        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM documents WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read document")
            .map_err(|e| TemporalError::Storage(e.to_string()))?;

        match raw {
            None => Ok(None),
            Some(json) => match serde_json::from_str(&json) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    tracing::warn!("Malformed document under key {}: {}", key, e);
                    Ok(None)
                }
            },
        }
    }

    /// Read the onboarding profile
    pub fn load_profile(&self) -> Result<Option<SessionProfile>> {
        self.get(KEY_PROFILE)
    }

    /// Write the onboarding profile (used by onboarding and test seeding)
    pub fn save_profile(&self, profile: &SessionProfile) -> Result<()> {
        self.put(KEY_PROFILE, profile)
    }

    /// Read the profile with chat transcripts
    pub fn load_profile_with_chat(&self) -> Result<Option<ProfileWithChat>> {
        self.get(KEY_PROFILE_WITH_CHAT)
    }

    /// Write the profile with chat transcripts
    pub fn save_profile_with_chat(&self, profile: &ProfileWithChat) -> Result<()> {
        self.put(KEY_PROFILE_WITH_CHAT, profile)
    }

    /// Read the final reflection record
    pub fn load_reflection(&self) -> Result<Option<ReflectionRecord>> {
        self.get(KEY_REFLECTION)
    }

    /// Write the final reflection record
    pub fn save_reflection(&self, record: &ReflectionRecord) -> Result<()> {
        self.put(KEY_REFLECTION, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ChatTranscripts, Persona};
    use tempfile::tempdir;

    fn test_store() -> (tempfile::TempDir, ProfileStore) {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new_with_path(dir.path().join("profile.db")).unwrap();
        (dir, store)
    }

    fn test_profile() -> SessionProfile {
        SessionProfile::new(
            Persona::new("Alex18", "anxious student"),
            Persona::new("Alex40", "calm mentor"),
        )
    }

    #[test]
    fn test_missing_keys_read_as_none() {
        let (_dir, store) = test_store();
        assert!(store.load_profile().unwrap().is_none());
        assert!(store.load_profile_with_chat().unwrap().is_none());
        assert!(store.load_reflection().unwrap().is_none());
    }

    #[test]
    fn test_profile_roundtrip() {
        let (_dir, store) = test_store();
        let profile = test_profile();
        store.save_profile(&profile).unwrap();
        assert_eq!(store.load_profile().unwrap().unwrap(), profile);
    }

    #[test]
    fn test_profile_with_chat_roundtrip() {
        let (_dir, store) = test_store();
        let mut transcripts = ChatTranscripts::default();
        transcripts.past.push(crate::session::ChatMessage::assistant("hi"));
        let with_chat = ProfileWithChat::new(test_profile(), transcripts);
        store.save_profile_with_chat(&with_chat).unwrap();
        let loaded = store.load_profile_with_chat().unwrap().unwrap();
        assert_eq!(loaded, with_chat);
    }

    #[test]
    fn test_last_write_wins() {
        let (_dir, store) = test_store();
        let mut profile = test_profile();
        store.save_profile(&profile).unwrap();
        profile.past_self.short_bio = "less anxious".to_string();
        store.save_profile(&profile).unwrap();
        assert_eq!(
            store.load_profile().unwrap().unwrap().past_self.short_bio,
            "less anxious"
        );
    }

    #[test]
    fn test_malformed_document_reads_as_none() {
        let (_dir, store) = test_store();
        store.put(KEY_PROFILE, &serde_json::json!({"not": "a profile"})).unwrap();
        assert!(store.load_profile().unwrap().is_none());
    }

    #[test]
    #[serial_test::serial]
    fn test_env_override_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("override.db");
        std::env::set_var("TEMPORAL_SELVES_DB", &path);
        let store = ProfileStore::new().unwrap();
        store.save_profile(&test_profile()).unwrap();
        std::env::remove_var("TEMPORAL_SELVES_DB");
        assert!(path.exists());
    }
}
