// tests/resolve.rs
use matchday::csv::{Record, parse_records};
use matchday::meta::fields;
use matchday::sheets::{SheetLayout, key_value_record, resolve, resolve_or};

fn rec(pairs: &[(&str, &str)]) -> Record {
    pairs.iter().copied().collect()
}

#[test]
fn exact_and_substring_headers_match() {
    let r = rec(&[("Giornata", "7ª"), ("Campo (comune)", "  Comunale  ")]);
    assert_eq!(resolve(&r, fields::MATCHDAY), "7ª");
    assert_eq!(resolve(&r, fields::VENUE), "Comunale");
}

#[test]
fn no_match_is_empty_string() {
    let r = rec(&[("Foo", "bar")]);
    assert_eq!(resolve(&r, fields::REFEREE), "");
    assert_eq!(resolve(&Record::new(), fields::REFEREE), "");
}

#[test]
fn resolve_is_idempotent() {
    let r = rec(&[("Data", "09/03/2025"), ("Ora", "15:00")]);
    let first = resolve(&r, fields::DATE);
    assert_eq!(first, resolve(&r, fields::DATE));
    assert_eq!(first, "09/03/2025");
}

#[test]
fn first_header_in_sheet_order_wins() {
    // "Home" comes before "Squadra 1" in the sheet, so it wins even though
    // "squadra 1" is listed first among the synonyms.
    let r = rec(&[("Home", "A"), ("Squadra 1", "B")]);
    assert_eq!(resolve(&r, fields::HOME), "A");
}

#[test]
fn empty_value_falls_back_to_default() {
    let r = rec(&[("Squadra 1", "  "), ("Squadra 2", "Borgo")]);
    assert_eq!(resolve_or(&r, fields::HOME, "Petriolese"), "Petriolese");
    assert_eq!(resolve_or(&r, fields::AWAY, "x"), "Borgo");
}

#[test]
fn key_value_layout_is_detected_and_folded() {
    let recs = parse_records("Chiave,Valore\n Squadra 2 , Borgo \nData,09/03/2025\n,orfano\ndata,10/03/2025\n");
    assert_eq!(SheetLayout::detect(&recs), SheetLayout::KeyValue);

    let folded = key_value_record(&recs);
    assert_eq!(folded.headers().collect::<Vec<_>>(), vec!["squadra 2", "data"]);
    assert_eq!(resolve(&folded, fields::AWAY), "Borgo");
    // repeated key: first position, last value
    assert_eq!(resolve(&folded, fields::DATE), "10/03/2025");
}

#[test]
fn table_layout_without_key_column() {
    let recs = parse_records("Squadra 1,Squadra 2\nA,B\n");
    assert_eq!(SheetLayout::detect(&recs), SheetLayout::Table);
    assert_eq!(SheetLayout::detect(&[]), SheetLayout::Table);
}

#[test]
fn key_value_without_named_columns_uses_first_two() {
    let recs = parse_records("field,content\nArbitro,Rossi\n");
    let folded = key_value_record(&recs);
    assert_eq!(folded.get("arbitro"), Some("Rossi"));
}
