//! Landing-page keybindings: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Keys inside the open contact dialog are fixed (Tab, Shift+Tab, Esc, Enter,
//! typing) and are not configurable here.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic actions available on the landing page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Open the contact dialog without a category.
    OpenInquiry,
    /// Display the help overlay.
    OpenHelp,
    /// Select the previous call-to-action button.
    PrevCta,
    /// Select the next call-to-action button.
    NextCta,
    /// Press the selected call-to-action button.
    ActivateCta,
    /// Toggle the keybindings panel on the right.
    ToggleKeybindsPane,
    /// Swallow the key.
    Ignore,
}

/// Mapping from `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
///
/// Several keys may map to the same action (`Left` and `h` both select the
/// previous button).
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('i')), KeyAction::OpenInquiry);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Enter), KeyAction::ActivateCta);
        bindings.insert((M::NONE, Left), KeyAction::PrevCta);
        bindings.insert((M::NONE, Right), KeyAction::NextCta);
        bindings.insert((M::NONE, BackTab), KeyAction::PrevCta);
        bindings.insert((M::SHIFT, BackTab), KeyAction::PrevCta);
        bindings.insert((M::NONE, Tab), KeyAction::NextCta);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevCta);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextCta);
        // Shift+K arrives differently depending on the terminal
        bindings.insert((M::SHIFT, Char('k')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::SHIFT, Char('K')), KeyAction::ToggleKeybindsPane);
        bindings.insert((M::NONE, Char('K')), KeyAction::ToggleKeybindsPane);
        Self { bindings }
    }

    /// Load a keymap from `path`, falling back to the config dir, and write
    /// the defaults to `path` when neither exists.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing.to_string_lossy()).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Read `<Action> = <KeySpec>` lines on top of the defaults.
    ///
    /// # Returns
    ///
    /// `Some(keymap)` if the file is readable; `None` otherwise.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(line, "skipping unrecognised keybinding"),
            }
        }
        Some(map)
    }

    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# contact-tui keybindings (landing page)\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, BackTab, Left, Right, h, l, ?\n");
        buf.push_str("# Actions: Quit, OpenInquiry, OpenHelp, PrevCta, NextCta, ActivateCta, ToggleKeybindsPane, Ignore\n\n");

        let dump = [
            ("q", KeyAction::Quit),
            ("Ctrl+c", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("i", KeyAction::OpenInquiry),
            ("?", KeyAction::OpenHelp),
            ("Enter", KeyAction::ActivateCta),
            ("Left", KeyAction::PrevCta),
            ("Right", KeyAction::NextCta),
            ("BackTab", KeyAction::PrevCta),
            ("Tab", KeyAction::NextCta),
            ("h", KeyAction::PrevCta),
            ("l", KeyAction::NextCta),
            ("K", KeyAction::ToggleKeybindsPane),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Snapshot of all bindings as ((modifiers, code), action) pairs.
    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Format a key into a spec like "Ctrl+q" or "BackTab".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "Shift+Tab".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Left" => Left,
        "Right" => Right,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "OpenInquiry" => Some(KeyAction::OpenInquiry),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "PrevCta" => Some(KeyAction::PrevCta),
        "NextCta" => Some(KeyAction::NextCta),
        "ActivateCta" => Some(KeyAction::ActivateCta),
        "ToggleKeybindsPane" => Some(KeyAction::ToggleKeybindsPane),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenInquiry => "OpenInquiry",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::PrevCta => "PrevCta",
        KeyAction::NextCta => "NextCta",
        KeyAction::ActivateCta => "ActivateCta",
        KeyAction::ToggleKeybindsPane => "ToggleKeybindsPane",
        KeyAction::Ignore => "Ignore",
    }
}
