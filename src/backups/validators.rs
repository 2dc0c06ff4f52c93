// src/backups/validators.rs
//! Backup document validation
//!
//! One predicate per entity (tab, group, session, document). Each only
//! descends into the level below it, so recursion depth is fixed at the
//! document's three levels whatever the input looks like.
//!
//! The `is_valid_*` guards stop at the first failure and log the failing
//! field at debug level. `validate_with_diagnostics` keeps going across
//! sessions and reports one line per problem for the caller.

use serde_json::{Map, Value};
use tracing::debug;

use super::models::{SESSION_NAME_MAX_CHARS, SUPPORTED_VERSIONS};
use crate::common::{json_integer, ValidationResult, Validator};

// ============================================================================
// Field predicates
// ============================================================================

fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

fn is_finite_number(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_f64)
        .is_some_and(|n| n.is_finite())
}

fn is_integer(value: Option<&Value>) -> bool {
    value.and_then(json_integer).is_some()
}

fn has_trimmed_len(value: Option<&Value>, min: usize, max: usize) -> bool {
    match value {
        Some(Value::String(s)) => (min..=max).contains(&s.trim().chars().count()),
        _ => false,
    }
}

fn is_supported_version(value: Option<&Value>) -> bool {
    value
        .and_then(json_integer)
        .is_some_and(|v| SUPPORTED_VERSIONS.contains(&v))
}

fn reject(entity: &'static str, field: &'static str) -> bool {
    debug!(entity, field, "Backup field failed validation");
    false
}

fn as_object<'a>(value: &'a Value, entity: &'static str) -> Option<&'a Map<String, Value>> {
    let obj = value.as_object();
    if obj.is_none() {
        reject(entity, "<not an object>");
    }
    obj
}

// ============================================================================
// Entity guards
// ============================================================================

pub fn is_valid_tab(value: &Value) -> bool {
    let Some(tab) = as_object(value, "tab") else {
        return false;
    };

    for field in ["title", "url", "domain", "favicon"] {
        if !is_string(tab.get(field)) {
            return reject("tab", field);
        }
    }
    if !is_finite_number(tab.get("lastAccessed")) {
        return reject("tab", "lastAccessed");
    }
    true
}

pub fn is_valid_group(value: &Value) -> bool {
    let Some(group) = as_object(value, "group") else {
        return false;
    };

    if !is_string(group.get("id")) {
        return reject("group", "id");
    }
    if !is_string(group.get("name")) {
        return reject("group", "name");
    }
    match group.get("tabs") {
        Some(Value::Array(tabs)) => tabs.iter().all(is_valid_tab),
        _ => reject("group", "tabs"),
    }
}

pub fn is_valid_session(value: &Value) -> bool {
    let Some(session) = as_object(value, "session") else {
        return false;
    };

    if !is_string(session.get("id")) {
        return reject("session", "id");
    }
    if !has_trimmed_len(session.get("name"), 1, SESSION_NAME_MAX_CHARS) {
        return reject("session", "name");
    }
    if !is_integer(session.get("createdAt")) {
        return reject("session", "createdAt");
    }
    match session.get("groups") {
        Some(Value::Array(groups)) => groups.iter().all(is_valid_group),
        _ => reject("session", "groups"),
    }
}

/// Fast accept/reject check for a whole backup document
pub fn is_valid_backup(value: &Value) -> bool {
    let Some(doc) = as_object(value, "backup") else {
        return false;
    };

    if !is_supported_version(doc.get("version")) {
        return reject("backup", "version");
    }
    if !is_string(doc.get("timestamp")) {
        return reject("backup", "timestamp");
    }
    match doc.get("sessions") {
        Some(Value::Array(sessions)) => sessions.iter().all(is_valid_session),
        _ => reject("backup", "sessions"),
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Exhaustive check that reports every top-level problem and every invalid
/// session by index.
pub fn validate_with_diagnostics(value: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(doc) = value.as_object() else {
        result.add_field_error("document", "must be a JSON object");
        return result;
    };

    if !is_supported_version(doc.get("version")) {
        let supported: Vec<String> = SUPPORTED_VERSIONS.iter().map(i64::to_string).collect();
        result.add_field_error(
            "version",
            &format!(
                "missing or unsupported backup version (supported: {})",
                supported.join(", ")
            ),
        );
    }

    if !is_string(doc.get("timestamp")) {
        result.add_field_error("timestamp", "must be a string");
    }

    let sessions = match doc.get("sessions") {
        Some(Value::Array(sessions)) => sessions,
        _ => {
            result.add_field_error("sessions", "must be an array");
            return result;
        }
    };

    for (index, session) in sessions.iter().enumerate() {
        if !is_valid_session(session) {
            result.add_error(format!("Invalid session at index {}", index));
        }
    }

    result
}

pub struct BackupValidator;

impl Validator<Value> for BackupValidator {
    fn validate(&self, data: &Value) -> ValidationResult {
        validate_with_diagnostics(data)
    }
}
