//! Form markup: where it comes from and what it must contain.
//!
//! The modal does not hardcode its form. On every open it fetches a small
//! TOML document describing the fields, from the embedded default, a local
//! file, or an HTTP(S) URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::{ContactError, Result};
use crate::form::{FieldId, InquiryType};

const EMBEDDED_MARKUP: &str = include_str!("../../assets/contact.toml");
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Input widget used for a field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Url,
    Select,
    Textarea,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FieldSpec {
    pub id: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FormTemplate {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub intro: Option<String>,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    pub fields: Vec<FieldSpec>,
}

fn default_title() -> String {
    "Contact".to_string()
}

fn default_submit_label() -> String {
    "[ Submit ]".to_string()
}

impl FormTemplate {
    /// Parse markup and check that every required field is present.
    /// Unknown field ids are dropped with a warning.
    pub fn parse(text: &str) -> std::result::Result<Self, ContactError> {
        let mut template: FormTemplate =
            toml::from_str(text).map_err(|e| ContactError::MarkupLoad {
                source: "markup".to_string(),
                reason: e.to_string(),
            })?;
        template.fields.retain(|f| {
            let known = FieldId::from_dom_id(&f.id).is_some();
            if !known {
                tracing::warn!(id = %f.id, "ignoring unknown field in contact markup");
            }
            known
        });
        for required in FieldId::REQUIRED {
            if template.spec(required).is_none() {
                return Err(ContactError::MissingField(required.dom_id()));
            }
        }
        Ok(template)
    }

    pub fn embedded() -> std::result::Result<Self, ContactError> {
        Self::parse(EMBEDDED_MARKUP)
    }

    pub fn spec(&self, id: FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.id == id.dom_id())
    }

    /// Field ids in markup order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.fields
            .iter()
            .filter_map(|f| FieldId::from_dom_id(&f.id))
            .collect()
    }

    /// Options of the category select that name a known inquiry type.
    pub fn category_options(&self) -> Vec<InquiryType> {
        self.spec(FieldId::InquiryType)
            .map(|s| {
                s.options
                    .iter()
                    .filter_map(|o| o.parse::<InquiryType>().ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Anything that can hand back form markup.
pub trait MarkupSource: Send + Sync {
    fn fetch(&self) -> Result<String>;

    /// Human readable location, used in logs and errors.
    fn describe(&self) -> String;
}

/// The template compiled into the binary.
pub struct EmbeddedMarkup;

impl MarkupSource for EmbeddedMarkup {
    fn fetch(&self) -> Result<String> {
        Ok(EMBEDDED_MARKUP.to_string())
    }

    fn describe(&self) -> String {
        "embedded contact form".to_string()
    }
}

pub struct FileMarkup {
    pub path: PathBuf,
}

impl MarkupSource for FileMarkup {
    fn fetch(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Markup served over HTTP. Only a 2xx response counts as loaded.
pub struct HttpMarkup {
    url: String,
    agent: ureq::Agent,
}

impl HttpMarkup {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build();
        Self {
            url: url.into(),
            agent,
        }
    }
}

impl MarkupSource for HttpMarkup {
    fn fetch(&self) -> Result<String> {
        match self.agent.get(&self.url).call() {
            Ok(resp) => {
                let status = resp.status();
                if !(200..300).contains(&status) {
                    anyhow::bail!("unexpected status {} from {}", status, self.url);
                }
                resp.into_string()
                    .with_context(|| format!("reading body of {}", self.url))
            }
            Err(ureq::Error::Status(code, _)) => {
                anyhow::bail!("server returned {} for {}", code, self.url)
            }
            Err(ureq::Error::Transport(e)) => {
                anyhow::bail!("network error fetching {}: {}", self.url, e)
            }
        }
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source from a CLI value: URL, path, or the embedded default.
pub fn source_for(spec: Option<&str>) -> Box<dyn MarkupSource> {
    match spec {
        Some(s) if s.starts_with("http://") || s.starts_with("https://") => {
            Box::new(HttpMarkup::new(s))
        }
        Some(s) => Box::new(FileMarkup {
            path: PathBuf::from(s),
        }),
        None => Box::new(EmbeddedMarkup),
    }
}

/// Fetch and parse markup, normalising every failure to a [`ContactError`].
pub fn load_template(source: &dyn MarkupSource) -> std::result::Result<FormTemplate, ContactError> {
    let text = source.fetch().map_err(|e| ContactError::MarkupLoad {
        source: source.describe(),
        reason: format!("{:#}", e),
    })?;
    match FormTemplate::parse(&text) {
        Err(ContactError::MarkupLoad { reason, .. }) => Err(ContactError::MarkupLoad {
            source: source.describe(),
            reason,
        }),
        other => other,
    }
}
