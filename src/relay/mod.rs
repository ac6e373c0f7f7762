//! Submission relay: turns a validated form into a Google Form
//! `formResponse` POST.
//!
//! Calls block; run [`Relay::submit`] off the UI thread.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{ContactError, Result};
use crate::form::{FieldId, FormData};

/// Form id shipped in the default configuration. While it is in place no
/// request is sent and submissions are simulated.
pub const PLACEHOLDER_FORM_ID: &str = "YOUR_FORM_ID_HERE";
pub const DEFAULT_FORM_HOST: &str = "docs.google.com/forms/d/e";
pub const SIMULATED_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// How a sent request is judged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DeliveryPolicy {
    /// Any attempt counts as delivered, even a transport error: the remote
    /// side may still have recorded the row.
    #[default]
    Optimistic,
    /// Only a 2xx/3xx response counts as delivered.
    Strict,
}

impl DeliveryPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryPolicy::Optimistic => "optimistic",
            DeliveryPolicy::Strict => "strict",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Some(DeliveryPolicy::Optimistic),
            "strict" => Some(DeliveryPolicy::Strict),
            _ => None,
        }
    }
}

/// Destination id plus the field-name-to-entry-key mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    pub form_id: String,
    pub form_host: String,
    pub entries: BTreeMap<FieldId, String>,
    pub policy: DeliveryPolicy,
    pub timeout: Duration,
    pub simulated_delay: Duration,
}

impl RelayConfig {
    /// Placeholder configuration: simulated submissions only.
    pub fn placeholder() -> Self {
        let entries = FieldId::ALL
            .into_iter()
            .map(|f| (f, placeholder_entry(f)))
            .collect();
        Self {
            form_id: PLACEHOLDER_FORM_ID.to_string(),
            form_host: DEFAULT_FORM_HOST.to_string(),
            entries,
            policy: DeliveryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            simulated_delay: SIMULATED_DELAY,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.form_id.trim().is_empty() && self.form_id != PLACEHOLDER_FORM_ID
    }

    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/{}/formResponse",
            self.form_host.trim_matches('/'),
            self.form_id
        )
    }

    /// Entry key for a field, e.g. `entry.123456`.
    pub fn entry(&self, field: FieldId) -> Option<&str> {
        self.entries
            .get(&field)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Default entry key written for a field until the integrator replaces it.
pub fn placeholder_entry(field: FieldId) -> String {
    let slug = match field {
        FieldId::Name => "NAME",
        FieldId::Email => "EMAIL",
        FieldId::Company => "COMPANY",
        FieldId::Phone => "PHONE",
        FieldId::Linkedin => "LINKEDIN",
        FieldId::InquiryType => "INQUIRY_TYPE",
        FieldId::Message => "MESSAGE",
    };
    format!("entry.YOUR_{}_ENTRY_ID", slug)
}

/// Sends an URL-encoded body. Returns the HTTP status of whatever answered.
pub trait Transport: Send + Sync {
    fn post_form(&self, url: &str, body: &str) -> Result<u16>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn post_form(&self, url: &str, body: &str) -> Result<u16> {
        let resp = self
            .agent
            .post(url)
            .set("Content-Type", "application/x-www-form-urlencoded")
            .send_string(body);
        match resp {
            Ok(resp) => Ok(resp.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(ureq::Error::Transport(e)) => anyhow::bail!("network error: {}", e),
        }
    }
}

pub struct Relay {
    config: RelayConfig,
    transport: Box<dyn Transport>,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Self {
        let transport = Box::new(UreqTransport::new(config.timeout));
        Self { config, transport }
    }

    pub fn with_transport(config: RelayConfig, transport: Box<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Encode `data` under the configured entry keys, in submission order.
    pub fn encode(&self, data: &FormData) -> Result<String> {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for field in FieldId::ALL {
            let key = self.config.entry(field).ok_or_else(|| {
                ContactError::Config(format!("no entry key for `{}`", field.dom_id()))
            })?;
            ser.append_pair(key, data.get(field));
        }
        Ok(ser.finish())
    }

    /// Submit `data`. `Ok(true)` means the inquiry counts as received.
    pub fn submit(&self, data: &FormData) -> Result<bool> {
        if !self.config.is_configured() {
            tracing::warn!("relay destination not configured; simulating submission");
            std::thread::sleep(self.config.simulated_delay);
            let payload: Vec<(&str, &str)> = data.iter().map(|(k, v)| (k.dom_id(), v)).collect();
            tracing::info!(?payload, "form data (not submitted, configure relay.conf)");
            return Ok(true);
        }

        let url = self.config.endpoint();
        let body = self.encode(data)?;
        tracing::info!(%url, bytes = body.len(), "submitting inquiry");
        match self.transport.post_form(&url, &body) {
            Ok(status) => {
                tracing::info!(status, "relay responded");
                match self.config.policy {
                    DeliveryPolicy::Optimistic => Ok(true),
                    DeliveryPolicy::Strict => Ok((200..400).contains(&status)),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "error submitting inquiry");
                match self.config.policy {
                    DeliveryPolicy::Optimistic => Ok(true),
                    DeliveryPolicy::Strict => Ok(false),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_uses_host_and_id() {
        let mut cfg = RelayConfig::placeholder();
        cfg.form_id = "1FAIpQLSabc".into();
        assert_eq!(
            cfg.endpoint(),
            "https://docs.google.com/forms/d/e/1FAIpQLSabc/formResponse"
        );
        assert!(cfg.is_configured());
    }

    #[test]
    fn blank_entry_key_is_treated_as_missing() {
        let mut cfg = RelayConfig::placeholder();
        cfg.entries.insert(FieldId::Phone, "  ".into());
        assert_eq!(cfg.entry(FieldId::Phone), None);
    }

    #[test]
    fn policy_parse_is_case_insensitive() {
        assert_eq!(DeliveryPolicy::parse("Strict"), Some(DeliveryPolicy::Strict));
        assert_eq!(DeliveryPolicy::parse("nope"), None);
    }
}
