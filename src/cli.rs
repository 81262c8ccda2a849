// src/cli.rs
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};

use crate::config::consts::*;
use crate::config::options::{MetaOptions, PosterOptions, ShareOptions, SheetOptions};
use crate::file::resolve_single_out_path;
use crate::meta::run_meta;
use crate::poster::{HeadlessBrowser, render_posters};
use crate::progress::Progress;
use crate::share::compose::{FitMode, ImageKind};
use crate::share::dispatch::{CommandShare, DirDownloader, NoShare, ShareTarget};
use crate::share::social::{
    InstagramOpener, InstagramOptions, MobileDetector, Navigator, Target, WhatsAppOpener, WhatsAppOptions,
};
use crate::share::stage::{Decoration, ImageStage, StageShareHandler};
use crate::sheets::HttpFetcher;

/// Match-sheet fetcher, poster renderer and share-image exporter
#[derive(Parser, Debug)]
#[command(name = "matchday", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Append logs to this file instead of stderr (RUST_LOG sets the level)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read the match sheet and write match.json
    Meta(MetaArgs),
    /// Render poster HTML/PNG/WebP from match.json
    Render(RenderArgs),
    /// Compose an image onto the share canvas, then share or save it
    Share(ShareArgs),
    /// Print the steps a social link would take
    Links {
        #[command(subcommand)]
        target: LinkTarget,
    },
}

#[derive(Args, Debug)]
pub struct MetaArgs {
    /// Explicit CSV URL or local file, tried first
    #[arg(long, env = "SHEET_CSV_URL")]
    pub csv_url: Option<String>,
    #[arg(long, env = "SHEET_ID")]
    pub sheet_id: Option<String>,
    #[arg(long, env = "SHEET_GID")]
    pub gid: Option<String>,
    /// "Publish to the web" link (.../d/e/<id>/pubhtml?gid=N)
    #[arg(long, env = "SHEET_PUB_URL")]
    pub pub_url: Option<String>,
    /// Row to use (0-based); default is the last non-empty row
    #[arg(long, env = "MATCH_INDEX")]
    pub match_index: Option<usize>,
    /// gid of the tab with Squadra/Logo columns
    #[arg(long)]
    pub opponents_gid: Option<String>,
    #[arg(long, default_value = DEFAULT_HOME_TEAM)]
    pub default_home: String,
    #[arg(long, default_value = DEFAULT_LOGOS_DIR)]
    pub logos_dir: String,
    /// Output file or directory
    #[arg(short, long, default_value = DEFAULT_META_PATH)]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[arg(long, default_value = DEFAULT_META_PATH)]
    pub data: PathBuf,
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    pub template: PathBuf,
    #[arg(long, default_value = DEFAULT_DIST_DIR)]
    pub dist: PathBuf,
    #[arg(long, default_value = DEFAULT_SPONSOR_DIR)]
    pub sponsors: PathBuf,
    /// Chromium-compatible binary
    #[arg(long, env = "CHROME_BIN", default_value = DEFAULT_BROWSER)]
    pub browser: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FitArg {
    Contain,
    Cover,
}

impl From<FitArg> for FitMode {
    fn from(f: FitArg) -> Self {
        match f {
            FitArg::Contain => FitMode::Contain,
            FitArg::Cover => FitMode::Cover,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Png,
    #[value(alias = "jpg")]
    Jpeg,
    Webp,
}

impl From<FormatArg> for ImageKind {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Png => ImageKind::Png,
            FormatArg::Jpeg => ImageKind::Jpeg,
            FormatArg::Webp => ImageKind::WebP,
        }
    }
}

#[derive(Args, Debug)]
pub struct ShareArgs {
    /// Rendered stage (PNG/JPEG/WebP)
    #[arg(short, long)]
    pub input: PathBuf,
    #[arg(long, default_value_t = TARGET_WIDTH)]
    pub width: u32,
    #[arg(long, default_value_t = TARGET_HEIGHT)]
    pub height: u32,
    #[arg(long, default_value = DEFAULT_BACKGROUND)]
    pub background: String,
    #[arg(long, value_enum, default_value = "contain")]
    pub fit: FitArg,
    #[arg(long, value_enum, default_value = "png")]
    pub format: FormatArg,
    /// 0.0..=1.0, JPEG only
    #[arg(long, default_value_t = DEFAULT_QUALITY)]
    pub quality: f32,
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    pub prefix: String,
    /// Full file name, overrides <prefix>_<date>.<ext>
    #[arg(long)]
    pub name: Option<String>,
    /// Where the file is saved when nothing shares it
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Share command, the file path is appended (e.g. "termux-share -a send")
    #[arg(long, env = "MATCHDAY_SHARE_CMD")]
    pub share_with: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub text: Option<String>,
    /// Pixel density the input was rendered at
    #[arg(long, default_value_t = 1.0)]
    pub dpr: f64,
    #[arg(long, default_value_t = DEFAULT_MIN_SCALE)]
    pub min_scale: f64,
    #[arg(long)]
    pub max_scale: Option<f64>,
    #[arg(long)]
    pub capture_class: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeviceArgs {
    /// Treat the device as mobile
    #[arg(long)]
    pub mobile: bool,
    /// Decide mobile/desktop from this user agent instead
    #[arg(long, conflicts_with = "mobile")]
    pub user_agent: Option<String>,
}

impl DeviceArgs {
    fn detector(&self) -> MobileDetector {
        match &self.user_agent {
            Some(ua) => MobileDetector::UserAgent(ua.clone()),
            None => MobileDetector::Fixed(self.mobile),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum LinkTarget {
    Instagram {
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long)]
        web_url: Option<String>,
        #[arg(long)]
        app_url: Option<String>,
        #[command(flatten)]
        device: DeviceArgs,
    },
    Whatsapp {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        desktop_url: Option<String>,
        /// Open in the current frame on mobile
        #[arg(long)]
        same_frame: bool,
        #[command(flatten)]
        device: DeviceArgs,
    },
}

/* ---------------- Frontend sinks ---------------- */

struct CliProgress {
    total: usize,
    done: usize,
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        println!("Rendering {total} variant(s)...");
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        println!("[{}/{}] {label}", self.done, self.total);
    }
}

/// Prints each navigation step instead of driving a browser.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn assign(&mut self, url: &str) {
        println!("assign {url}");
    }
    fn open(&mut self, url: &str, target: Target) {
        println!("open {url} {}", target.as_str());
    }
    fn wait(&mut self, delay: Duration) {
        println!("wait {}ms", delay.as_millis());
        thread::sleep(delay);
    }
}

/* ---------------- Commands ---------------- */

fn meta(a: MetaArgs) -> Result<()> {
    let sheet = SheetOptions {
        csv_url: a.csv_url,
        file_id: a.sheet_id,
        gid: a.gid,
        pub_url: a.pub_url,
    };
    let opts = MetaOptions {
        match_index: a.match_index,
        default_home: a.default_home,
        logos_dir: a.logos_dir,
        opponents_gid: a.opponents_gid,
        out: resolve_single_out_path(&a.out, "match.json")?,
    };

    let fetcher = HttpFetcher::new()?;
    let m = run_meta(&fetcher, &sheet, &opts).wrap_err("building match metadata")?;
    println!("{} vs {} -> {}", m.home_team_name, m.away_team_name, opts.out.display());
    Ok(())
}

fn render(a: RenderArgs) -> Result<()> {
    let opts = PosterOptions { data: a.data, template: a.template, dist: a.dist, sponsor_dir: a.sponsors };
    let mut browser = HeadlessBrowser::new(a.browser);
    let mut progress = CliProgress { total: 0, done: 0 };
    let files = render_posters(&opts, &mut browser, Some(&mut progress)).wrap_err("rendering posters")?;
    for f in files {
        println!("{}", f.display());
    }
    Ok(())
}

fn share(a: ShareArgs) -> Result<()> {
    let stage = ImageStage::open(&a.input)
        .wrap_err_with(|| format!("opening {}", a.input.display()))?
        .with_device_pixel_ratio(a.dpr);

    let options = ShareOptions {
        target_width: a.width,
        target_height: a.height,
        background: a.background,
        file_name_prefix: a.prefix,
        file_name: a.name,
        capture_class: a.capture_class,
        kind: a.format.into(),
        quality: a.quality,
        share_title: a.title.unwrap_or_default(),
        share_text: a.text.unwrap_or_default(),
        min_scale: Some(a.min_scale),
        max_scale: a.max_scale,
        fit: a.fit.into(),
    };

    let target: Box<dyn ShareTarget> = match a.share_with.as_deref().and_then(CommandShare::parse) {
        Some(cmd) => Box::new(cmd),
        None => Box::new(NoShare),
    };
    let mut handler = StageShareHandler::new(stage, options, target, Box::new(DirDownloader::new(a.out_dir)));
    let mut no_decorations: [&mut dyn Decoration; 0] = [];
    let outcome = handler.share(&mut no_decorations)?;

    match outcome.path {
        Some(p) => println!("saved {}", p.display()),
        None => println!("shared {}", outcome.file_name),
    }
    Ok(())
}

fn links(target: LinkTarget) {
    let mut nav = StdoutNavigator;
    match target {
        LinkTarget::Instagram { username, web_url, app_url, device } => {
            InstagramOpener::new(InstagramOptions {
                username,
                web_url,
                app_url,
                mobile: device.detector(),
                ..Default::default()
            })
            .open(&mut nav);
        }
        LinkTarget::Whatsapp { url, desktop_url, same_frame, device } => {
            WhatsAppOpener::new(WhatsAppOptions {
                url,
                desktop_url,
                mobile: device.detector(),
                mobile_target: if same_frame { Target::SelfFrame } else { Target::Blank },
                desktop_target: Target::Blank,
            })
            .open(&mut nav);
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(cli.log_file.as_deref())?;

    match cli.command {
        Command::Meta(a) => meta(a),
        Command::Render(a) => render(a),
        Command::Share(a) => share(a),
        Command::Links { target } => {
            links(target);
            Ok(())
        }
    }
}
