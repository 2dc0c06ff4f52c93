// src/backups/models.rs
//! Backup document models
//!
//! Wire shape of an exported backup:
//! `{ version, timestamp, sessions: [{ id, name, createdAt, groups: [{ id, name, tabs: [...] }] }] }`

use serde::{Deserialize, Serialize};

use super::validators::is_valid_backup;
use crate::common::deserialize_json_integer;

/// Backup versions this service accepts
pub const SUPPORTED_VERSIONS: &[i64] = &[1];

/// Session names are 1..=50 characters after trimming
pub const SESSION_NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(deserialize_with = "deserialize_json_integer")]
    pub version: i64,
    pub timestamp: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "deserialize_json_integer")]
    pub created_at: i64,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub tabs: Vec<TabSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub title: String,
    pub url: String,
    pub domain: String,
    pub favicon: String,
    pub last_accessed: f64,
}

/// Counts reported back after a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackupSummary {
    pub version: i64,
    pub sessions: usize,
    pub groups: usize,
    pub tabs: usize,
}

impl BackupDocument {
    /// Builds the typed document from a value, refusing anything the
    /// validator does not accept.
    pub fn from_validated(value: serde_json::Value) -> Option<Self> {
        if !is_valid_backup(&value) {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    pub fn summary(&self) -> BackupSummary {
        let groups = self.sessions.iter().map(|s| s.groups.len()).sum();
        let tabs = self
            .sessions
            .iter()
            .flat_map(|s| &s.groups)
            .map(|g| g.tabs.len())
            .sum();

        BackupSummary {
            version: self.version,
            sessions: self.sessions.len(),
            groups,
            tabs,
        }
    }
}
