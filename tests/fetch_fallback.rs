// tests/fetch_fallback.rs
//
// Source fallback policy, driven by a scripted fetcher (no network).
//
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;

use matchday::Error;
use matchday::config::options::SheetOptions;
use matchday::sheets::{HttpFetcher, TextFetcher, fetch_preferred, fetch_sheet};

/// Answers from a fixed table; unknown sources fail. Records every call.
struct Scripted {
    answers: HashMap<&'static str, &'static str>,
    calls: RefCell<Vec<String>>,
}

impl Scripted {
    fn new(answers: &[(&'static str, &'static str)]) -> Self {
        Self { answers: answers.iter().copied().collect(), calls: RefCell::new(Vec::new()) }
    }
}

impl TextFetcher for Scripted {
    fn fetch_text(&self, source: &str) -> matchday::Result<String> {
        self.calls.borrow_mut().push(source.to_string());
        self.answers
            .get(source)
            .map(|t| t.to_string())
            .ok_or_else(|| Error::HttpStatus { url: source.to_string(), status: 500 })
    }
}

fn srcs(list: &[Option<&str>]) -> Vec<Option<String>> {
    list.iter().map(|s| s.map(str::to_string)).collect()
}

#[test]
fn skips_empty_and_failing_until_rows_appear() {
    let f = Scripted::new(&[("A", "h1,h2\n"), ("C", "h1,h2\n1,2\n")]);
    let recs = fetch_preferred(&f, &srcs(&[Some("A"), Some("B"), Some("C"), Some("D")]));
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].get("h2"), Some("2"));
    // D never tried once C produced rows
    assert_eq!(*f.calls.borrow(), vec!["A", "B", "C"]);
}

#[test]
fn all_failing_is_empty_not_a_panic() {
    let f = Scripted::new(&[]);
    assert!(fetch_preferred(&f, &srcs(&[Some("A"), Some("B")])).is_empty());
    assert!(fetch_preferred(&f, &[]).is_empty());
}

#[test]
fn none_slots_are_skipped() {
    let f = Scripted::new(&[("B", "x\n1\n")]);
    let recs = fetch_preferred(&f, &srcs(&[None, Some("B"), None]));
    assert_eq!(recs.len(), 1);
    assert_eq!(*f.calls.borrow(), vec!["B"]);
}

#[test]
fn only_empty_successes_give_empty() {
    let f = Scripted::new(&[("A", "a,b\n"), ("B", "")]);
    assert!(fetch_preferred(&f, &srcs(&[Some("A"), Some("B")])).is_empty());
}

#[test]
fn fetch_sheet_needs_at_least_one_source() {
    let f = Scripted::new(&[]);
    let err = fetch_sheet(&f, &SheetOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingSource(_)));
}

#[test]
fn fetch_sheet_prefers_explicit_url_then_gviz() {
    let gviz = "https://docs.google.com/spreadsheets/d/ID/gviz/tq?gid=0&headers=1&tqx=out:csv";
    let f = Scripted::new(&[("local.csv", "a\n"), (gviz, "a\nfrom-gviz\n")]);
    let opts = SheetOptions {
        csv_url: Some("local.csv".into()),
        file_id: Some("ID".into()),
        ..Default::default()
    };
    let recs = fetch_sheet(&f, &opts).unwrap();
    assert_eq!(recs[0].get("a"), Some("from-gviz"));
}

#[test]
fn http_fetcher_reads_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.csv");
    fs::write(&path, "Squadra 1,Squadra 2\nPetriolese,Borgo\n").unwrap();

    let fetcher = HttpFetcher::new().unwrap();
    let plain = path.to_string_lossy().into_owned();
    let url = format!("file://{plain}");

    let recs = fetch_preferred(&fetcher, &[Some("/definitely/missing.csv".into()), Some(url), Some(plain)]);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].get("Squadra 2"), Some("Borgo"));
}

#[test]
fn http_fetcher_rejects_other_schemes() {
    let fetcher = HttpFetcher::new().unwrap();
    assert!(matches!(fetcher.fetch_text("ftp://example.com/a.csv"), Err(Error::InvalidUrl(_))));
}

#[test]
fn http_fetcher_accepts_a_custom_client() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.csv");
    fs::write(&path, "a\n1\n").unwrap();

    let client = reqwest::blocking::Client::builder().build().unwrap();
    let fetcher = HttpFetcher::with_client(client);
    assert_eq!(fetcher.fetch_text(&path.to_string_lossy()).unwrap(), "a\n1\n");
}
