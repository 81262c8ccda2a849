// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/* ---------------- Records ---------------- */

/// One data row keyed by header name, in header order.
///
/// Every header of the sheet is present; cells the row did not have are `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set `header` to `value`. A header seen before keeps its position and
    /// takes the new value.
    pub fn insert(&mut self, header: impl Into<String>, value: impl Into<String>) {
        let header = header.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(h, _)| *h == header) {
            Some((_, v)) => *v = value,
            None => self.fields.push((header, value)),
        }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(h, _)| h.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when no cell has visible content.
    pub fn is_blank(&self) -> bool {
        self.values().all(|v| v.trim().is_empty())
    }
}

impl<H: Into<String>, V: Into<String>> FromIterator<(H, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (H, V)>>(iter: I) -> Self {
        let mut rec = Record::new();
        for (h, v) in iter {
            rec.insert(h, v);
        }
        rec
    }
}

/* ---------------- Parsing ---------------- */

/// Strip a leading BOM and fold `\r\n` / lone `\r` into `\n`.
fn normalize(text: &str) -> String {
    let t = text.strip_prefix('\u{feff}').unwrap_or(text);
    t.replace("\r\n", "\n").replace('\r', "\n")
}

fn end_row(row: &mut Vec<String>, quoted_row: bool, rows: &mut Vec<Vec<String>>) {
    let blank = !quoted_row && row.len() == 1 && row[0].trim().is_empty();
    if blank && !rows.is_empty() {
        row.clear();
    } else {
        rows.push(take(row));
    }
}

/// Minimal CSV/TSV parser (quotes + CRLF tolerant). Total over any input.
///
/// The first row is always kept, even when blank; later rows that are a single
/// unquoted whitespace-only cell are skipped. Unterminated quotes run to EOF.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = normalize(text);
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut quoted_row = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if matches!(chars.peek(), Some('"')) => {
                    chars.next(); // double-quote escape
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                quoted_row = true;
            }
            c if c == sep => row.push(take(&mut field)),
            '\n' => {
                row.push(take(&mut field));
                end_row(&mut row, quoted_row, &mut rows);
                quoted_row = false;
            }
            _ => field.push(ch),
        }
    }

    // Flush a trailing row without a final newline.
    if !field.is_empty() || !row.is_empty() || quoted_row {
        row.push(field);
        end_row(&mut row, quoted_row, &mut rows);
    }

    rows
}

/// Parse comma-separated text into records keyed by the (trimmed) header row.
///
/// Short rows are padded with `""`, long rows are cut to the header width.
/// Header-only or empty input yields no records.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut rows = parse_rows(text, ',').into_iter();
    let header: Vec<String> = match rows.next() {
        Some(h) => h.iter().map(|c| c.trim().to_string()).collect(),
        None => return Vec::new(),
    };

    rows.map(|cells| {
        header
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect::<Record>()
    })
    .collect()
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Encode records back to CSV. Headers come from the first record.
pub fn records_to_string(records: &[Record]) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if let Some(first) = records.first() {
        let headers: Vec<&str> = first.headers().collect();
        // writes into a Vec never fail
        let _ = write_row(&mut buf, &headers, ',');
        for r in records {
            let cells: Vec<&str> = headers.iter().map(|h| r.get(h).unwrap_or("")).collect();
            let _ = write_row(&mut buf, &cells, ',');
        }
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}
