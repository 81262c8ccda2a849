// src/logos.rs
use std::collections::HashMap;

use crate::config::consts::LOGO_EXT;
use crate::core::sanitize::slugify;
use crate::csv::Record;

/// Lowercased team name → logo URL, from an opponents tab.
pub type OpponentsMap = HashMap<String, String>;

fn cell<'a>(r: &'a Record, names: &[&str]) -> &'a str {
    names.iter().find_map(|n| r.get(n).filter(|v| !v.trim().is_empty())).unwrap_or("").trim()
}

/// Rows with a `Squadra`/`squadra` name; the `Logo`/`logo` cell may be empty.
/// A repeated name keeps the last row.
pub fn opponents_map(records: &[Record]) -> OpponentsMap {
    let mut out = OpponentsMap::new();
    for r in records {
        let name = cell(r, &["Squadra", "squadra"]);
        if name.is_empty() { continue; }
        out.insert(name.to_lowercase(), s!(cell(r, &["Logo", "logo"])));
    }
    out
}

/// Sheet URL if the opponents tab has one, else `{dir}/{slug}.webp`.
/// An empty name has no logo.
pub fn resolve_logo_src(team_name: &str, opponents: &OpponentsMap, dir: &str) -> String {
    let name = team_name.trim();
    if name.is_empty() {
        return s!();
    }
    if let Some(url) = opponents.get(&name.to_lowercase()).filter(|u| !u.is_empty()) {
        return url.clone();
    }
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        format!("{}.{LOGO_EXT}", slugify(name))
    } else {
        format!("{dir}/{}.{LOGO_EXT}", slugify(name))
    }
}
