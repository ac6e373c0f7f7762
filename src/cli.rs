//! Command line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::form::InquiryType;
use crate::relay::{DeliveryPolicy, RelayConfig};

#[derive(Debug, Parser)]
#[command(name = "contact-tui", version, about = "Contact form that relays inquiries to a Google Form")]
pub struct Cli {
    /// Form markup: a TOML file or an http(s) URL. Defaults to the built-in form.
    #[arg(long, value_name = "PATH|URL", env = "CONTACT_TUI_FORM")]
    pub form: Option<String>,

    /// Relay settings file, created with placeholders when missing.
    #[arg(long, value_name = "PATH", default_value = "relay.conf")]
    pub relay_config: String,

    /// Override the Google Form id from the relay settings.
    #[arg(long, value_name = "ID", env = "CONTACT_TUI_FORM_ID")]
    pub form_id: Option<String>,

    /// Only report success when the form host answers with 2xx/3xx.
    #[arg(long)]
    pub strict: bool,

    /// Open the contact form at startup with this inquiry type selected.
    #[arg(long, value_name = "TYPE")]
    pub category: Option<InquiryType>,

    /// Open the contact form at startup.
    #[arg(long)]
    pub open: bool,

    /// Theme colors file, created with defaults when missing.
    #[arg(long, value_name = "PATH", default_value = "theme.conf")]
    pub theme: String,

    /// Landing page keybindings file, created with defaults when missing.
    #[arg(long, value_name = "PATH", default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Directory for the log file.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Apply flag overrides on top of a loaded relay configuration.
    pub fn apply_to(&self, cfg: &mut RelayConfig) {
        if let Some(id) = &self.form_id {
            cfg.form_id = id.clone();
        }
        if self.strict {
            cfg.policy = DeliveryPolicy::Strict;
        }
    }

    /// Dialog to open at startup: `Some(category)` when requested.
    pub fn initial_modal(&self) -> Option<Option<InquiryType>> {
        if self.category.is_some() || self.open {
            Some(self.category)
        } else {
            None
        }
    }
}
