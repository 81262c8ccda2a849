// src/share/social.rs
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use regex::Regex;

use crate::config::consts::{FALLBACK_DELAY_MS, FALLBACK_WINDOW_MS, INSTAGRAM_APP, INSTAGRAM_WEB, WHATSAPP_WEB};

fn mobile_ua() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Android|iPhone|iPad|iPod").expect("static regex"))
}

/// Decides between the app deep link and the web page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MobileDetector {
    Fixed(bool),
    UserAgent(String),
}

impl MobileDetector {
    pub fn is_mobile(&self) -> bool {
        match self {
            MobileDetector::Fixed(m) => *m,
            MobileDetector::UserAgent(ua) => mobile_ua().is_match(ua),
        }
    }
}

impl Default for MobileDetector {
    fn default() -> Self {
        MobileDetector::Fixed(false)
    }
}

/// Window target for [`Navigator::open`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Target {
    #[default]
    Blank,
    SelfFrame,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Blank => "_blank",
            Target::SelfFrame => "_self",
        }
    }
}

/// The browser-ish side effects an opener needs.
pub trait Navigator {
    /// Replace the current location (deep links go through here).
    fn assign(&mut self, url: &str);
    fn open(&mut self, url: &str, target: Target);
    fn wait(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
    fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }
}

/* ---------------- Instagram ---------------- */

#[derive(Clone, Debug, Default)]
pub struct InstagramOptions {
    pub username: String,
    pub web_url: Option<String>,
    pub app_url: Option<String>,
    pub mobile: MobileDetector,
    pub fallback_delay: Option<Duration>,
    pub fallback_window: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct InstagramOpener {
    pub web_url: String,
    pub app_url: String,
    mobile: MobileDetector,
    fallback_delay: Duration,
    fallback_window: Duration,
}

impl InstagramOpener {
    pub fn new(opts: InstagramOptions) -> Self {
        let user = opts.username.trim();
        let web_url = opts.web_url.filter(|u| !u.is_empty()).unwrap_or_else(|| {
            if user.is_empty() { s!(INSTAGRAM_WEB) } else { format!("{INSTAGRAM_WEB}{user}/") }
        });
        let app_url = opts.app_url.filter(|u| !u.is_empty()).unwrap_or_else(|| {
            if user.is_empty() { s!(INSTAGRAM_APP) } else { format!("instagram://user?username={user}") }
        });

        Self {
            web_url,
            app_url,
            mobile: opts.mobile,
            fallback_delay: opts.fallback_delay.unwrap_or(Duration::from_millis(FALLBACK_DELAY_MS)),
            fallback_window: opts.fallback_window.unwrap_or(Duration::from_millis(FALLBACK_WINDOW_MS)),
        }
    }

    /// On mobile, try the app and fall back to the web page if we are still
    /// here within the window. If the app took over, the wait overshoots the
    /// window and nothing else opens.
    pub fn open(&self, nav: &mut dyn Navigator) {
        if !self.mobile.is_mobile() {
            nav.open(&self.web_url, Target::Blank);
            return;
        }

        let start = Instant::now();
        nav.assign(&self.app_url);
        nav.wait(self.fallback_delay);
        if nav.elapsed(start) < self.fallback_window {
            nav.open(&self.web_url, Target::Blank);
        }
    }
}

/* ---------------- WhatsApp ---------------- */

#[derive(Clone, Debug, Default)]
pub struct WhatsAppOptions {
    pub url: Option<String>,
    pub desktop_url: Option<String>,
    pub mobile: MobileDetector,
    pub mobile_target: Target,
    pub desktop_target: Target,
}

#[derive(Clone, Debug)]
pub struct WhatsAppOpener {
    pub url: String,
    pub desktop_url: String,
    mobile: MobileDetector,
    mobile_target: Target,
    desktop_target: Target,
}

impl WhatsAppOpener {
    pub fn new(opts: WhatsAppOptions) -> Self {
        let url = opts.url.filter(|u| !u.is_empty()).unwrap_or_else(|| s!(WHATSAPP_WEB));
        let desktop_url = opts.desktop_url.filter(|u| !u.is_empty()).unwrap_or_else(|| url.clone());
        Self {
            url,
            desktop_url,
            mobile: opts.mobile,
            mobile_target: opts.mobile_target,
            desktop_target: opts.desktop_target,
        }
    }

    pub fn open(&self, nav: &mut dyn Navigator) {
        let (url, target) = if self.mobile.is_mobile() {
            (&self.url, self.mobile_target)
        } else {
            (&self.desktop_url, self.desktop_target)
        };

        match target {
            Target::SelfFrame => nav.assign(url),
            Target::Blank => nav.open(url, target),
        }
    }
}
