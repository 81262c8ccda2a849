// src/sheets/resolve.rs
use crate::core::sanitize::normalize_ws;
use crate::csv::Record;

/// Does a header name satisfy any of the (lowercase) synonyms?
/// Exact match or substring, compared case-insensitively with inner
/// whitespace collapsed (`"Squadra  1"` is `"squadra 1"`).
pub fn header_matches(header: &str, synonyms: &[&str]) -> bool {
    let low = normalize_ws(header).to_lowercase();
    synonyms.iter().any(|n| low == *n || low.contains(n))
}

/// Value of the first header (in sheet order) that matches any synonym,
/// trimmed. `""` when nothing matches.
pub fn resolve(record: &Record, synonyms: &[&str]) -> String {
    record
        .iter()
        .find(|(h, _)| header_matches(h, synonyms))
        .map(|(_, v)| v.trim().to_string())
        .unwrap_or_default()
}

/// [`resolve`], with `default` standing in for an empty result.
pub fn resolve_or(record: &Record, synonyms: &[&str], default: &str) -> String {
    let v = resolve(record, synonyms);
    if v.is_empty() { s!(default) } else { v }
}

const KEY_HEADERS: &[&str] = &["key", "chiave"];
const VALUE_HEADERS: &[&str] = &["value", "valore", "val"];

fn is_named(header: &str, names: &[&str]) -> bool {
    names.iter().any(|n| header.eq_ignore_ascii_case(n))
}

/// How a metadata tab is laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SheetLayout {
    /// One match per row, fields as columns.
    Table,
    /// Two columns, one field per row (`key` / `value`).
    KeyValue,
}

impl SheetLayout {
    /// Key/value when the header row has a column literally named `key`/`chiave`.
    pub fn detect(records: &[Record]) -> Self {
        let has_key = records
            .first()
            .map(|r| r.headers().any(|h| is_named(h, KEY_HEADERS)))
            .unwrap_or(false);
        if has_key { SheetLayout::KeyValue } else { SheetLayout::Table }
    }
}

/// Fold a key/value tab into one record: lowercased, trimmed keys → trimmed values.
///
/// Key column: `key`/`chiave`, else the first. Value column: `value`/`valore`/`val`,
/// else the second, else the first. Rows with an empty key are ignored; a repeated
/// key keeps its first position and its last value.
pub fn key_value_record(records: &[Record]) -> Record {
    let mut out = Record::new();

    for r in records {
        let headers: Vec<&str> = r.headers().collect();
        let Some(first) = headers.first().copied() else { continue };

        let key_h = headers.iter().copied().find(|h| is_named(h, KEY_HEADERS)).unwrap_or(first);
        let val_h = headers
            .iter()
            .copied()
            .find(|h| is_named(h, VALUE_HEADERS))
            .or_else(|| headers.get(1).copied())
            .unwrap_or(first);

        let key = r.get(key_h).unwrap_or("").trim().to_lowercase();
        let val = r.get(val_h).unwrap_or("").trim();
        if !key.is_empty() {
            out.insert(key, val);
        }
    }

    out
}
