// tests/meta_json.rs
//
// Sheet row → match.json, end to end through local CSV files.
//
use std::fs;

use matchday::Error;
use matchday::config::options::{MetaOptions, SheetOptions};
use matchday::csv::{Record, parse_records};
use matchday::logos::OpponentsMap;
use matchday::meta::{MatchMeta, build_meta, pick_record, read_meta, run_meta};
use matchday::sheets::{HttpFetcher, TextFetcher};

fn rec(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().copied().collect()
}

#[test]
fn pick_prefers_valid_index_then_last_non_blank() {
    let recs = parse_records("Squadra 1,Squadra 2\nA,B\nC,D\n , \n");
    assert_eq!(pick_record(&recs, Some(0)).unwrap().get("Squadra 1"), Some("A"));
    // out of range falls back
    assert_eq!(pick_record(&recs, Some(9)).unwrap().get("Squadra 1"), Some("C"));
    assert_eq!(pick_record(&recs, None).unwrap().get("Squadra 1"), Some("C"));
}

#[test]
fn pick_errors() {
    assert!(matches!(pick_record(&[], None), Err(Error::EmptySheet)));
    let blank = vec![rec(&[("a", " "), ("b", "")])];
    assert!(matches!(pick_record(&blank, None), Err(Error::NoValidRow)));
}

#[test]
fn build_meta_resolves_synonyms_logos_and_kickoff() {
    let r = rec(&[
        ("Squadra 1", ""),
        ("Squadra 2", "Real Sàn Marco"),
        ("Torneo", "Seconda Categoria"),
        ("Giornata", "12ª"),
        ("Data", "9/3/2025"),
        ("Ora", "14:30"),
        ("Stadio", "Comunale"),
        ("Arbitro", "Rossi"),
        ("Note", "Ingresso libero"),
        ("Sponsor", "b.webp|a.png"),
    ]);
    let mut opp = OpponentsMap::new();
    opp.insert("petriolese".into(), "https://cdn/home.png".into());

    let m = build_meta(&r, &MetaOptions::default(), &opp);
    assert_eq!(m.home_team_name, "Petriolese");
    assert_eq!(m.home_logo, "https://cdn/home.png");
    assert_eq!(m.away_team_name, "Real Sàn Marco");
    assert_eq!(m.away_logo, "logos/real-san-marco.webp");
    assert_eq!(m.competition, "Seconda Categoria");
    assert_eq!(m.matchday_label, "12ª");
    assert_eq!(m.date_iso, "9/3/2025");
    assert_eq!(m.kickoff_iso.as_deref(), Some("2025-03-09T14:30"));
    assert_eq!(m.venue, "Comunale");
    assert_eq!(m.referee, "Rossi");
    assert_eq!(m.note, "Ingresso libero");
    assert_eq!(m.sponsor_csv, "b.webp|a.png");
}

#[test]
fn json_uses_site_field_names() {
    let m = MatchMeta {
        home_team_name: "A".into(),
        date_iso: "2025-03-09".into(),
        kickoff_iso: None,
        ..Default::default()
    };
    let v = serde_json::to_value(&m).unwrap();
    let obj = v.as_object().unwrap();
    for key in [
        "homeTeamName", "awayTeamName", "competition", "matchdayLabel", "dateISO", "time",
        "venue", "referee", "note", "sponsorCsv", "homeLogo", "awayLogo",
    ] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    assert!(!obj.contains_key("kickoffISO"));
    assert_eq!(obj["dateISO"], "2025-03-09");

    let with = MatchMeta { kickoff_iso: Some("2025-03-09T15:00".into()), ..m };
    assert_eq!(serde_json::to_value(&with).unwrap()["kickoffISO"], "2025-03-09T15:00");
}

#[test]
fn run_meta_writes_json_from_a_table_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("meta.csv");
    fs::write(&csv, "Squadra 1,Squadra 2,Data,Ora\nPetriolese,Borgo,01/02/2025,\nPetriolese,Tolentino,08/02/2025,20:45\n,,,\n").unwrap();

    let out = dir.path().join("data").join("match.json");
    let sheet = SheetOptions { csv_url: Some(csv.to_string_lossy().into_owned()), ..Default::default() };
    let opts = MetaOptions { out: out.clone(), ..Default::default() };

    let m = run_meta(&HttpFetcher::new().unwrap(), &sheet, &opts).unwrap();
    assert_eq!(m.away_team_name, "Tolentino");
    assert_eq!(m.kickoff_iso.as_deref(), Some("2025-02-08T20:45"));
    assert_eq!(read_meta(&out).unwrap(), m);

    let opts = MetaOptions { match_index: Some(0), ..opts };
    let m = run_meta(&HttpFetcher::new().unwrap(), &sheet, &opts).unwrap();
    assert_eq!(m.away_team_name, "Borgo");
    assert_eq!(m.kickoff_iso.as_deref(), Some("2025-02-01T15:00"));
}

#[test]
fn run_meta_reads_key_value_tabs() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("kv.csv");
    fs::write(&csv, "key,value\nSquadra 2,Borgo\nCampo,Comunale\n").unwrap();

    let sheet = SheetOptions { csv_url: Some(csv.to_string_lossy().into_owned()), ..Default::default() };
    let opts = MetaOptions { out: dir.path().join("m.json"), ..Default::default() };
    let m = run_meta(&HttpFetcher::new().unwrap(), &sheet, &opts).unwrap();
    assert_eq!(m.home_team_name, "Petriolese");
    assert_eq!(m.away_team_name, "Borgo");
    assert_eq!(m.venue, "Comunale");
}

/// Serves the match tab and the opponents tab by gid.
struct TwoTabs;

impl TextFetcher for TwoTabs {
    fn fetch_text(&self, source: &str) -> matchday::Result<String> {
        if source.contains("/export?") {
            return Err(Error::HttpStatus { url: source.into(), status: 404 });
        }
        if source.contains("gid=5") {
            Ok("Squadra,Logo\nBorgo,https://cdn/borgo.png\n".into())
        } else {
            Ok("Squadra 1,Squadra 2\nPetriolese,Borgo\n".into())
        }
    }
}

#[test]
fn run_meta_uses_the_opponents_tab_for_logos() {
    let dir = tempfile::tempdir().unwrap();
    let sheet = SheetOptions { file_id: Some("ID".into()), gid: Some("0".into()), ..Default::default() };
    let opts = MetaOptions {
        opponents_gid: Some("5".into()),
        out: dir.path().join("match.json"),
        ..Default::default()
    };
    let m = run_meta(&TwoTabs, &sheet, &opts).unwrap();
    assert_eq!(m.away_logo, "https://cdn/borgo.png");
    assert_eq!(m.home_logo, "logos/petriolese.webp");
}

#[test]
fn run_meta_on_empty_sheet_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("empty.csv");
    fs::write(&csv, "Squadra 1,Squadra 2\n").unwrap();
    let sheet = SheetOptions { csv_url: Some(csv.to_string_lossy().into_owned()), ..Default::default() };
    let opts = MetaOptions { out: dir.path().join("m.json"), ..Default::default() };
    let err = run_meta(&HttpFetcher::new().unwrap(), &sheet, &opts).unwrap_err();
    assert!(matches!(err, Error::EmptySheet));
    assert!(!dir.path().join("m.json").exists());
}
