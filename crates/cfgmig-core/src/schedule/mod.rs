//! Schedule rewriting
//!
//! Legacy schedules allowed a single entry to describe a window that wraps
//! midnight, such as `"after 10pm and before 5am"`. Current schedules express
//! that as two entries. Several older phrasings are also rewritten to the
//! forms the current grammar accepts.

mod time_range;

use time_range::parse_time_window;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::MigrationError;

const SCHEDULE: &str = "schedule";

static SHORTHAND_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"( \d?\d)((a|p)m)").expect("static regex"));

static COMPOUND_WINDOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*?)(after|before) (.*?) and (after|before) (.*?)( |$)(.*)").expect("static regex")
});

static EVERY_WEEKDAY_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"every ((?:mon|tues|wednes|thurs|fri|satur|sun)day)$").expect("static regex")
});

/// Result of rewriting a `schedule` value
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMigration {
    /// Whether anything was rewritten
    pub is_migrated: bool,

    /// Rewritten value; the input unchanged when nothing was rewritten
    pub value: Value,
}

/// Rewrite a legacy `schedule` value
///
/// Accepts a string or a list of strings. A string input stays a string when
/// it still describes a single entry.
///
/// # Errors
/// Returns [`MigrationError::UnexpectedShape`] for any other shape
///
/// # Examples
/// ```
/// # use cfgmig_core::schedule::migrate_schedule;
/// # use serde_json::json;
/// let result = migrate_schedule(&json!("after 10pm and before 5am")).unwrap();
/// assert!(result.is_migrated);
/// assert_eq!(result.value, json!(["after 10pm", "before 5am"]));
/// ```
pub fn migrate_schedule(value: &Value) -> Result<ScheduleMigration, MigrationError> {
    let mut entries = entries_of(value)?;
    let mut is_migrated = false;

    let original_len = entries.len();
    for index in 0..original_len {
        if let Some((first, second)) = split_wrapping_window(&entries[index]) {
            entries[index] = first;
            entries.push(second);
            is_migrated = true;
        }
    }

    for entry in &mut entries {
        if let Some(canonical) = canonicalize(entry) {
            *entry = canonical;
            is_migrated = true;
        }
    }

    if !is_migrated {
        return Ok(ScheduleMigration {
            is_migrated,
            value: value.clone(),
        });
    }

    let value = match (value, entries.len()) {
        (Value::String(_), 1) => Value::String(entries.remove(0)),
        _ => Value::Array(entries.into_iter().map(Value::String).collect()),
    };
    Ok(ScheduleMigration { is_migrated, value })
}

fn entries_of(value: &Value) -> Result<Vec<String>, MigrationError> {
    match value {
        Value::String(entry) => Ok(vec![entry.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| MigrationError::unexpected_shape(SCHEDULE, "string", item))
            })
            .collect(),
        other => Err(MigrationError::unexpected_shape(SCHEDULE, "array", other)),
    }
}

/// Split `"after X and before Y"` in two when the window wraps midnight
fn split_wrapping_window(entry: &str) -> Option<(String, String)> {
    if !(entry.contains(" and ") && entry.contains("before ") && entry.contains("after ")) {
        return None;
    }
    let expanded = SHORTHAND_HOUR.replace_all(entry, "${1}:00${2}");
    let window = parse_time_window(&expanded)?;
    if !window.wraps_midnight() {
        return None;
    }
    tracing::debug!(entry, "splitting schedule window that wraps midnight");

    let first = COMPOUND_WINDOW.replace(entry, "${1}${2} ${3} ${7}");
    let second = COMPOUND_WINDOW.replace(entry, "${1}${4} ${5} ${7}");
    Some((first.trim().to_string(), second.trim().to_string()))
}

/// Rewrite deprecated phrasings until none remain
fn canonicalize(entry: &str) -> Option<String> {
    let mut current = entry.to_string();
    let mut changed = false;
    while let Some(next) = rewrite_once(&current) {
        current = next;
        changed = true;
    }
    changed.then_some(current)
}

fn rewrite_once(entry: &str) -> Option<String> {
    let mut text = entry.to_string();
    let mut changed = false;

    if text.contains("on the last day of the month") {
        text = text.replacen("on the last day of the month", "on the first day of the month", 1);
        changed = true;
    }
    if text.contains("on every weekday") {
        text = text.replacen("on every weekday", "every weekday", 1);
        changed = true;
    }
    if text.ends_with(" every day") {
        text = text.replacen(" every day", "", 1);
        changed = true;
    }
    if EVERY_WEEKDAY_NAME.is_match(&text) {
        text = EVERY_WEEKDAY_NAME.replace(&text, "on ${1}").into_owned();
        changed = true;
    }
    if text.ends_with("days") {
        text = text.replacen("days", "day", 1);
        changed = true;
    }

    changed.then_some(text)
}
