//! Text cleanup for exported records
//!
//! Directory display names are often stored as "Last, First". Before export,
//! names are put back into "First Last" order and characters that break the
//! CSV layout are removed.

use super::record::{NormalizedRecord, TextFields};

/// Characters removed from names and titles
const STRIPPED: &[char] = &[',', '/', '\'', '"', '\\'];

/// Normalize every record, preserving order
pub fn normalize<R: TextFields>(records: &[R]) -> Vec<NormalizedRecord> {
    records.iter().map(normalize_record).collect()
}

pub fn normalize_record<R: TextFields>(record: &R) -> NormalizedRecord {
    NormalizedRecord {
        name: record.name().map(normalize_person_name),
        email: record.email().map(normalize_email),
        title: record.title().map(normalize_title),
        manager: record.manager().map(normalize_person_name),
    }
}

/// "Smith, John Jr" becomes "John Jr Smith"
///
/// Only the first two comma-separated parts are used; anything after a
/// second comma is dropped.
pub fn normalize_person_name(value: &str) -> String {
    let reordered = if value.contains(',') {
        let mut parts = value.split(',');
        let last = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();
        format!("{} {}", rest, last)
    } else {
        value.to_string()
    };
    strip(&reordered)
}

pub fn normalize_title(value: &str) -> String {
    strip(value)
}

pub fn normalize_email(value: &str) -> String {
    value.replace('"', "").trim().to_string()
}

fn strip(value: &str) -> String {
    value.replace(STRIPPED, "").trim().to_string()
}
