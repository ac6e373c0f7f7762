//! Application state types and entry glue.
//!
//! Defines the landing page, theme, and [`AppState`], and re-exports the
//! event loop as `run`.
//!
pub mod keymap;
pub mod relayconf;
pub mod submit;
pub mod update;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ratatui::style::Color;

use crate::form::InquiryType;
use crate::modal::ModalController;
use crate::modal::markup::MarkupSource;
use crate::relay::Relay;
use keymap::Keymap;
use submit::SubmitJob;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub accent: Color,
    pub error: Color,
    pub success: Color,
    pub focus_fg: Color,
    pub focus_bg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
}

const THEME_KEYS: [&str; 11] = [
    "text", "muted", "title", "border", "accent", "error", "success", "focus_fg", "focus_bg",
    "status_bg", "status_fg",
];

impl Theme {
    /// Plain named colors for terminals without truecolor.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            accent: Color::Magenta,
            error: Color::LightRed,
            success: Color::LightGreen,
            focus_fg: Color::Yellow,
            focus_bg: Color::Reset,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
        }
    }

    /// Catppuccin Mocha, with the red used for glitch accents and errors.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),      // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),     // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),     // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),    // surface2
            accent: Color::Rgb(0xf3, 0x8b, 0xa8),    // red
            error: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            success: Color::Rgb(0xa6, 0xe3, 0xa1),   // green
            focus_fg: Color::Rgb(0xf9, 0xe2, 0xaf),  // yellow
            focus_bg: Color::Rgb(0x45, 0x47, 0x5a),  // surface1
            status_bg: Color::Rgb(0x31, 0x32, 0x44), // surface0
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4), // text
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "accent" => &mut self.accent,
            "error" => &mut self.error,
            "success" => &mut self.success,
            "focus_fg" => &mut self.focus_fg,
            "focus_bg" => &mut self.focus_bg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            _ => return None,
        })
    }

    /// Load a theme from `key = value` lines. Unknown or missing keys keep `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    /// Persist the theme as `key = #RRGGBB` lines.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut copy = *self;
        let mut buf = String::new();
        buf.push_str("# contact-tui theme\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        for key in THEME_KEYS {
            if let Some(c) = copy.slot(key) {
                let _ = writeln!(&mut buf, "{} = {}", key, color_to_str(*c));
            }
        }
        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, creating it with `mocha` when missing.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing.to_string_lossy()).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Parse "#RRGGBB", "RRGGBB" or "reset".
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
        Color::Reset => "reset".to_string(),
        // Named colors get a rough hex equivalent
        Color::Black => "#000000".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Magenta => "#FF00FF".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::LightRed => "#FF6666".to_string(),
        Color::LightGreen => "#66FF66".to_string(),
        Color::White => "#FFFFFF".to_string(),
        other => format!("{:?}", other),
    }
}

/// Find an existing config file: current directory first, then the user
/// config directory (`~/.config/contact-tui` on Linux).
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    let local = PathBuf::from(name);
    if local.exists() {
        return Some(local);
    }
    let in_config = dirs::config_dir()?.join("contact-tui").join(name);
    in_config.exists().then_some(in_config)
}

/// Landing page: the inquire button followed by one button per category.
#[derive(Clone, Debug, Default)]
pub struct Landing {
    /// Index into [`Landing::ctas`]; 0 is the plain inquire button.
    pub selected: usize,
}

impl Landing {
    /// Buttons in display order. `None` opens the form without a category.
    pub fn ctas() -> Vec<Option<InquiryType>> {
        std::iter::once(None)
            .chain(InquiryType::ALL.into_iter().map(Some))
            .collect()
    }

    pub fn selected_cta(&self) -> Option<InquiryType> {
        Self::ctas().get(self.selected).copied().flatten()
    }

    pub fn move_by(&mut self, delta: isize) {
        let n = Self::ctas().len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(n) as usize;
    }
}

pub struct AppState {
    pub started_at: Instant,
    pub theme: Theme,
    pub keymap: Keymap,
    pub input_mode: InputMode,
    pub landing: Landing,
    pub modal: ModalController,
    pub markup: Box<dyn MarkupSource>,
    pub relay: Arc<Relay>,
    pub submit_job: Option<SubmitJob>,
    /// Submissions whose dialog was closed or replaced; polled only to log.
    pub orphaned_jobs: Vec<SubmitJob>,
    pub show_keybinds: bool,
    pub help_scroll: u16,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap, markup: Box<dyn MarkupSource>, relay: Relay) -> Self {
        Self {
            started_at: Instant::now(),
            theme,
            keymap,
            input_mode: InputMode::Normal,
            landing: Landing::default(),
            modal: ModalController::new(),
            markup,
            relay: Arc::new(relay),
            submit_job: None,
            orphaned_jobs: Vec::new(),
            show_keybinds: false,
            help_scroll: 0,
        }
    }

    /// Open the contact dialog. Load failures are shown inside the dialog.
    pub fn open_modal(&mut self, category: Option<InquiryType>, now: Instant) {
        let _ = self.modal.open(category, self.markup.as_ref(), now);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self, now: Instant) {
        self.modal.close(now);
        self.input_mode = InputMode::Normal;
    }

    /// Advance timers and collect a finished submission.
    pub fn tick(&mut self, now: Instant) {
        if let Some(job) = &self.submit_job
            && let Some(outcome) = job.poll()
        {
            let session = job.session();
            self.submit_job = None;
            submit::finish_submit(&mut self.modal, session, outcome, now);
        }
        let modal = &mut self.modal;
        self.orphaned_jobs.retain(|job| match job.poll() {
            Some(outcome) => {
                submit::finish_submit(modal, job.session(), outcome, now);
                false
            }
            None => true,
        });
        self.modal.tick(now);
        if self.input_mode == InputMode::Modal && !self.modal.is_open() {
            self.input_mode = InputMode::Normal;
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
