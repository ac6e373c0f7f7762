//! Field rules and whole-form validation.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ContactForm, FieldId, InquiryType};

/// Minimum message length, counted in characters after trimming.
pub const MIN_MESSAGE_LEN: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// True for absolute `http` / `https` URLs. Used for the profile link, which
/// is optional and not part of [`validate_form`].
pub fn is_valid_url(input: &str) -> bool {
    match url::Url::parse(input) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Check one field value. `Err` carries the message to display.
pub fn check_field(id: FieldId, value: &str) -> Result<(), &'static str> {
    match id {
        FieldId::Name => {
            if value.trim().is_empty() {
                return Err("Name is required");
            }
        }
        FieldId::Email => {
            let email = value.trim();
            if email.is_empty() {
                return Err("Email is required");
            }
            if !is_valid_email(email) {
                return Err("Please enter a valid email address");
            }
        }
        FieldId::InquiryType => {
            if value.parse::<InquiryType>().is_err() {
                return Err("Please select an inquiry type");
            }
        }
        FieldId::Message => {
            let message = value.trim();
            if message.is_empty() {
                return Err("Message is required");
            }
            if message.chars().count() < MIN_MESSAGE_LEN {
                return Err("Message must be at least 10 characters");
            }
        }
        FieldId::Company | FieldId::Phone | FieldId::Linkedin => {}
    }
    Ok(())
}

/// Run every required rule, setting or clearing each field's error state.
/// Returns `true` when the form may be submitted.
pub fn validate_form(form: &mut ContactForm) -> bool {
    let mut ok = true;
    for id in FieldId::REQUIRED {
        match check_field(id, form.value(id)) {
            Ok(()) => form.clear_error(id),
            Err(msg) => {
                form.show_error(id, msg);
                ok = false;
            }
        }
    }
    tracing::debug!(valid = ok, "validated contact form");
    ok
}

/// Focus left `id`. Re-validates only once the field has content, so an
/// untouched form is not flooded with errors while tabbing through it.
pub fn on_blur(form: &mut ContactForm, id: FieldId) -> Option<bool> {
    if !id.is_required() || form.value(id).trim().is_empty() {
        return None;
    }
    Some(validate_form(form))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn url_requires_http_scheme() {
        assert!(is_valid_url("https://www.linkedin.com/in/someone"));
        assert!(is_valid_url("http://example.org"));
        assert!(!is_valid_url("ftp://example.org"));
        assert!(!is_valid_url("linkedin.com/in/someone"));
    }

    #[test]
    fn message_length_boundary() {
        assert_eq!(
            check_field(FieldId::Message, "123456789"),
            Err("Message must be at least 10 characters")
        );
        assert_eq!(check_field(FieldId::Message, "1234567890"), Ok(()));
        assert_eq!(
            check_field(FieldId::Message, "   123456789   "),
            Err("Message must be at least 10 characters")
        );
    }

    #[test]
    fn optional_fields_always_pass() {
        assert_eq!(check_field(FieldId::Company, ""), Ok(()));
        assert_eq!(check_field(FieldId::Linkedin, "not a url"), Ok(()));
    }
}
