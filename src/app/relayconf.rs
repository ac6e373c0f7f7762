//! Relay configuration: parse/write `relay.conf`.
//!
//! The file uses the same `key = value` format as the theme and keybinding
//! files:
//! - `form_id`, `form_host`: where submissions go
//! - `policy`: `optimistic` or `strict`
//! - `timeout_secs`: HTTP timeout
//! - `entry.<fieldId>`: entry key the field is posted under

use std::time::Duration;

use crate::form::FieldId;
use crate::relay::{DeliveryPolicy, RelayConfig};

/// Load relay settings, or write and return the placeholder defaults when
/// the file does not exist anywhere.
///
/// # Arguments
///
/// * `path` - The preferred location of `relay.conf`.
pub fn load_or_init(path: &str) -> RelayConfig {
    let p = std::path::Path::new(path);
    if p.exists() {
        return from_file(path).unwrap_or_default();
    }
    if let Some(existing) = crate::app::config_file_read_path("relay.conf") {
        return from_file(&existing.to_string_lossy()).unwrap_or_default();
    }
    let cfg = RelayConfig::placeholder();
    if let Err(e) = write_file(&cfg, path) {
        tracing::warn!(error = %e, path, "could not write default relay.conf");
    }
    cfg
}

/// Read relay settings on top of the placeholder defaults. Unknown keys are
/// skipped.
///
/// # Returns
///
/// `Some(config)` if the file is readable; `None` otherwise.
pub fn from_file(path: &str) -> Option<RelayConfig> {
    let contents = std::fs::read_to_string(path).ok()?;
    let mut cfg = RelayConfig::placeholder();
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
        match lhs {
            "form_id" => cfg.form_id = rhs.to_string(),
            "form_host" => cfg.form_host = rhs.to_string(),
            "policy" => match DeliveryPolicy::parse(rhs) {
                Some(p) => cfg.policy = p,
                None => tracing::warn!(value = rhs, "unknown relay policy, keeping default"),
            },
            "timeout_secs" => {
                if let Ok(secs) = rhs.parse::<u64>() {
                    cfg.timeout = Duration::from_secs(secs);
                }
            }
            key => {
                if let Some(field) = key.strip_prefix("entry.").and_then(FieldId::from_dom_id) {
                    cfg.entries.insert(field, rhs.to_string());
                }
            }
        }
    }
    if cfg.is_configured()
        && cfg
            .entries
            .values()
            .any(|v| v.starts_with("entry.YOUR_"))
    {
        tracing::warn!("relay.conf sets a form_id but still has placeholder entry keys");
    }
    Some(cfg)
}

/// Write relay settings to `path` in `key = value` form.
pub fn write_file(cfg: &RelayConfig, path: &str) -> std::io::Result<()> {
    use std::fmt::Write as _;
    let mut buf = String::new();
    buf.push_str("# contact-tui relay destination\n");
    buf.push_str("# Google Form id (from the form's public URL). While it is\n");
    buf.push_str("# YOUR_FORM_ID_HERE submissions are simulated and only logged.\n");
    let _ = writeln!(&mut buf, "form_id = {}", cfg.form_id);
    let _ = writeln!(&mut buf, "form_host = {}", cfg.form_host);
    buf.push_str("# optimistic: any attempt counts as delivered; strict: require a 2xx/3xx\n");
    let _ = writeln!(&mut buf, "policy = {}", cfg.policy.as_str());
    let _ = writeln!(&mut buf, "timeout_secs = {}\n", cfg.timeout.as_secs());
    buf.push_str("# Entry keys: inspect the Google Form to find each field's entry.N id\n");
    for field in FieldId::ALL {
        let key = cfg.entries.get(&field).map(String::as_str).unwrap_or("");
        let _ = writeln!(&mut buf, "entry.{} = {}", field.dom_id(), key);
    }
    std::fs::write(path, buf)
}
