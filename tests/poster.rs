// tests/poster.rs
use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use serde_json::{Map, Value, json};

use matchday::config::options::PosterOptions;
use matchday::meta::{MatchMeta, write_meta};
use matchday::poster::{
    Screenshotter, VARIANTS, fill_template, list_sponsors, render_posters, sponsor_grid_html, template_data,
};
use matchday::progress::{NullProgress, Progress};

fn touch(dir: &Path, names: &[&str]) {
    for n in names {
        fs::write(dir.join(n), b"x").unwrap();
    }
}

#[test]
fn sponsors_follow_the_requested_order_then_alphabetical() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), &["c.png", "a.webp", "b.jpg", "z.svg", "readme.txt", "D.JPEG"]);

    assert_eq!(list_sponsors(dir.path(), ""), vec!["D.JPEG", "a.webp", "b.jpg", "c.png", "z.svg"]);
    assert_eq!(
        list_sponsors(dir.path(), " z.svg | missing.png |c.png|z.svg"),
        vec!["z.svg", "c.png", "D.JPEG", "a.webp", "b.jpg"]
    );
}

#[test]
fn missing_sponsor_dir_is_empty() {
    assert!(list_sponsors(Path::new("/no/such/sponsor/dir"), "a.png").is_empty());
}

#[test]
fn grid_html_points_at_the_asset_folder() {
    let html = sponsor_grid_html(&["a.webp".into(), "b.png".into()]);
    assert_eq!(
        html,
        r#"<div class="s-item"><img src="../assets/sponsor/a.webp" alt=""></div><div class="s-item"><img src="../assets/sponsor/b.png" alt=""></div>"#
    );
    assert_eq!(sponsor_grid_html(&[]), "");
}

#[test]
fn template_placeholders_are_filled_or_blanked() {
    let mut data = Map::new();
    data.insert("homeTeamName".into(), json!("Petriolese"));
    data.insert("round".into(), json!(12));
    data.insert("nothing".into(), Value::Null);

    let out = fill_template("{{homeTeamName}} - {{round}} {{nothing}}{{unknown}} {{ spaced }}", &data);
    assert_eq!(out, "Petriolese - 12  {{ spaced }}");
}

#[test]
fn template_data_has_meta_fields_and_grid() {
    let m = MatchMeta { away_team_name: "Borgo".into(), ..Default::default() };
    let data = template_data(&m, "<div/>").unwrap();
    assert_eq!(data["awayTeamName"], "Borgo");
    assert_eq!(data["SPONSOR_GRID"], "<div/>");
    assert!(!data.contains_key("kickoffISO"));
}

/// Writes a plain PNG of the requested size and remembers what it was asked.
#[derive(Default)]
struct FakeBrowser {
    calls: Vec<(String, u32, u32, String)>,
}

impl Screenshotter for FakeBrowser {
    fn screenshot(&mut self, html: &Path, width: u32, height: u32, out_png: &Path) -> matchday::Result<()> {
        let body = fs::read_to_string(html)?;
        self.calls.push((html.file_name().unwrap().to_string_lossy().into_owned(), width, height, body));
        RgbaImage::from_pixel(width / 40, height / 40, Rgba([1, 2, 3, 255])).save(out_png)?;
        Ok(())
    }
}

#[derive(Default)]
struct Recorder {
    begun: Option<usize>,
    done: Vec<String>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.begun = Some(total); }
    fn item_done(&mut self, label: &str) { self.done.push(label.to_string()); }
    fn finish(&mut self) { self.finished = true; }
}

#[test]
fn render_writes_every_variant() {
    let root = tempfile::tempdir().unwrap();
    let sponsors = root.path().join("assets/sponsor");
    fs::create_dir_all(&sponsors).unwrap();
    touch(&sponsors, &["b.png", "a.webp"]);

    let data = root.path().join("data/match.json");
    let meta = MatchMeta {
        home_team_name: "Petriolese".into(),
        away_team_name: "Borgo".into(),
        sponsor_csv: "b.png".into(),
        ..Default::default()
    };
    write_meta(&data, &meta).unwrap();

    let template = root.path().join("template.html");
    fs::write(&template, "<style>:root{--W:2480px;--H:3508px}</style><h1>{{homeTeamName}} v {{awayTeamName}}</h1>{{SPONSOR_GRID}}").unwrap();

    let opts = PosterOptions {
        data,
        template,
        dist: root.path().join("dist"),
        sponsor_dir: sponsors,
    };
    let mut browser = FakeBrowser::default();
    let mut progress = Recorder::default();
    let files = render_posters(&opts, &mut browser, Some(&mut progress)).unwrap();

    assert_eq!(files.len(), VARIANTS.len() * 3);
    for name in [
        "poster.html", "poster-a4-3508x2480.png", "poster-a4-3508x2480.webp",
        "poster-1080x1350.html", "social-1080x1350.png", "social-1080x1350.webp",
        "poster-1080x1080.html", "social-1080x1080.png", "social-1080x1080.webp",
    ] {
        assert!(opts.dist.join(name).is_file(), "missing {name}");
    }

    let webp = image::open(opts.dist.join("social-1080x1350.webp")).unwrap();
    assert_eq!((webp.width(), webp.height()), (27, 33));

    let sizes: Vec<(u32, u32)> = browser.calls.iter().map(|c| (c.1, c.2)).collect();
    assert_eq!(sizes, vec![(2480, 3508), (1080, 1350), (1080, 1080)]);

    let a4 = &browser.calls[0].3;
    assert!(a4.contains("<h1>Petriolese v Borgo</h1>"));
    assert!(a4.contains(":root{--W:2480px"));
    let b_at = a4.find("sponsor/b.png").unwrap();
    let a_at = a4.find("sponsor/a.webp").unwrap();
    assert!(b_at < a_at, "ordered sponsor first");
    assert!(browser.calls[1].3.contains(":root{ --W:1080px; --H:1350px;--W:2480px"));

    assert_eq!(progress.begun, Some(3));
    assert_eq!(progress.done, vec!["poster-a4-3508x2480", "social-1080x1350", "social-1080x1080"]);
    assert!(progress.finished);
}

#[test]
fn render_without_match_json_fails_cleanly() {
    let root = tempfile::tempdir().unwrap();
    let opts = PosterOptions {
        data: root.path().join("nope.json"),
        template: root.path().join("t.html"),
        dist: root.path().join("dist"),
        sponsor_dir: root.path().join("s"),
    };
    let mut browser = FakeBrowser::default();
    assert!(render_posters(&opts, &mut browser, Some(&mut NullProgress)).is_err());
    assert!(browser.calls.is_empty());
}
