// src/meta.rs
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::options::{MetaOptions, SheetOptions};
use crate::csv::Record;
use crate::dates::{parse_date_time_it, to_iso_minutes};
use crate::error::{Error, Result};
use crate::file;
use crate::logos::{OpponentsMap, opponents_map, resolve_logo_src};
use crate::sheets::fetch::{TextFetcher, fetch_preferred, fetch_sheet};
use crate::sheets::resolve::{SheetLayout, key_value_record, resolve, resolve_or};
use crate::sheets::urls::candidate_sources;

/// Header synonyms per logical field, highest priority first.
pub mod fields {
    pub const HOME: &[&str] = &["squadra 1", "casa", "home", "home team", "petriolese"];
    pub const AWAY: &[&str] = &["squadra 2", "trasferta", "away", "away team"];
    pub const COMPETITION: &[&str] = &["competizione", "torneo", "league"];
    pub const MATCHDAY: &[&str] = &["giornata", "matchday"];
    pub const DATE: &[&str] = &["data", "date"];
    pub const TIME: &[&str] = &["ora", "time"];
    pub const VENUE: &[&str] = &["campo", "stadio", "venue"];
    pub const REFEREE: &[&str] = &["arbitro", "referee"];
    pub const NOTE: &[&str] = &["note"];
    pub const SPONSOR: &[&str] = &["sponsor"];
}

/// Contents of `match.json`. Field names are what the poster template and
/// the site scripts read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchMeta {
    pub home_team_name: String,
    pub away_team_name: String,
    pub competition: String,
    pub matchday_label: String,
    /// The date cell as written in the sheet.
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub time: String,
    pub venue: String,
    pub referee: String,
    pub note: String,
    /// `logo1.webp|logo2.png`, sponsor display order.
    pub sponsor_csv: String,
    pub home_logo: String,
    pub away_logo: String,
    #[serde(rename = "kickoffISO", skip_serializing_if = "Option::is_none")]
    pub kickoff_iso: Option<String>,
}

/// The row to publish: `match_index` if it is in range, otherwise the last
/// row with any visible content.
pub fn pick_record(records: &[Record], match_index: Option<usize>) -> Result<&Record> {
    if records.is_empty() {
        return Err(Error::EmptySheet);
    }
    if let Some(r) = match_index.and_then(|i| records.get(i)) {
        return Ok(r);
    }
    records.iter().rev().find(|r| !r.is_blank()).ok_or(Error::NoValidRow)
}

pub fn build_meta(record: &Record, opts: &MetaOptions, opponents: &OpponentsMap) -> MatchMeta {
    let home = resolve_or(record, fields::HOME, &opts.default_home);
    let away = resolve(record, fields::AWAY);
    let date = resolve(record, fields::DATE);
    let time = resolve(record, fields::TIME);
    let kickoff_iso = parse_date_time_it(&date, &time).map(|dt| to_iso_minutes(&dt));

    MatchMeta {
        home_logo: resolve_logo_src(&home, opponents, &opts.logos_dir),
        away_logo: resolve_logo_src(&away, opponents, &opts.logos_dir),
        home_team_name: home,
        away_team_name: away,
        competition: resolve(record, fields::COMPETITION),
        matchday_label: resolve(record, fields::MATCHDAY),
        date_iso: date,
        time,
        venue: resolve(record, fields::VENUE),
        referee: resolve(record, fields::REFEREE),
        note: resolve(record, fields::NOTE),
        sponsor_csv: resolve(record, fields::SPONSOR),
        kickoff_iso,
    }
}

/// Opponents tab: same spreadsheet, other gid. Missing or unreadable → empty map.
fn fetch_opponents(fetcher: &dyn TextFetcher, sheet: &SheetOptions, gid: &str) -> OpponentsMap {
    let Some(file_id) = sheet.file_id.clone() else {
        warn!(gid, "opponents gid given without a sheet id; logos fall back to slugs");
        return OpponentsMap::new();
    };
    let opp = SheetOptions { csv_url: None, file_id: Some(file_id), gid: Some(s!(gid)), pub_url: None };
    opponents_map(&fetch_preferred(fetcher, &candidate_sources(&opp)))
}

/// Fetch the sheet, pick a row, resolve fields and write `opts.out`.
#[instrument(level = "info", skip_all, fields(out = %opts.out.display()))]
pub fn run_meta(fetcher: &dyn TextFetcher, sheet: &SheetOptions, opts: &MetaOptions) -> Result<MatchMeta> {
    let records = fetch_sheet(fetcher, sheet)?;

    let folded;
    let record = match SheetLayout::detect(&records) {
        SheetLayout::KeyValue => {
            folded = key_value_record(&records);
            if folded.is_empty() { return Err(Error::NoValidRow); }
            &folded
        }
        SheetLayout::Table => pick_record(&records, opts.match_index)?,
    };

    let opponents = match opts.opponents_gid.as_deref().filter(|g| !g.is_empty()) {
        Some(gid) => fetch_opponents(fetcher, sheet, gid),
        None => OpponentsMap::new(),
    };

    let meta = build_meta(record, opts, &opponents);
    write_meta(&opts.out, &meta)?;
    info!(home = %meta.home_team_name, away = %meta.away_team_name, "match metadata written");
    Ok(meta)
}

pub fn write_meta(path: &Path, meta: &MatchMeta) -> Result<()> {
    file::write_json(path, meta)
}

pub fn read_meta(path: &Path) -> Result<MatchMeta> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
