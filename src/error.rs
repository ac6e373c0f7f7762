use std::fmt::{Display, Formatter};

/// Result alias used across the crate.
pub type Result<T> = anyhow::Result<T>;

/// Domain failures surfaced to the user.
///
/// Plumbing errors travel as `anyhow::Error`; these variants are attached
/// where a failure needs a specific user-facing treatment and can be
/// recovered with `downcast_ref`.
#[derive(Debug)]
pub enum ContactError {
    /// The form markup could not be fetched or parsed.
    MarkupLoad { source: String, reason: String },
    /// The markup loaded but lacks a field the validator needs.
    MissingField(&'static str),
    /// The relay has no entry key for a field.
    Config(String),
    /// A submission failed before or while it was sent.
    Submission(String),
}

impl ContactError {
    /// Text shown inside the dialog or in the form status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            ContactError::MarkupLoad { .. } | ContactError::MissingField(_) => {
                "Error loading form. Please refresh and try again."
            }
            ContactError::Config(_) | ContactError::Submission(_) => {
                "An error occurred. Please try again or contact us directly."
            }
        }
    }
}

impl Display for ContactError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContactError::MarkupLoad { source, reason } => {
                write!(f, "failed to load contact form from {}: {}", source, reason)
            }
            ContactError::MissingField(id) => {
                write!(f, "contact form markup has no `{}` field", id)
            }
            ContactError::Config(msg) => write!(f, "relay misconfigured: {}", msg),
            ContactError::Submission(msg) => write!(f, "submission failed: {}", msg),
        }
    }
}

impl std::error::Error for ContactError {}

/// Best user-facing message for any error, falling back to the generic submission text.
pub fn user_message(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<ContactError>()
        .map(ContactError::user_message)
        .unwrap_or("An error occurred. Please try again or contact us directly.")
}
