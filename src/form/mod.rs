//! Contact form model: field identifiers, inquiry categories, live values,
//! and the per-field error state the validator writes into.
//!
pub mod validate;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::modal::markup::FormTemplate;

/// Fields of the contact form, in submission order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Name,
    Email,
    Company,
    Phone,
    Linkedin,
    InquiryType,
    Message,
}

impl FieldId {
    pub const ALL: [FieldId; 7] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::Company,
        FieldId::Phone,
        FieldId::Linkedin,
        FieldId::InquiryType,
        FieldId::Message,
    ];

    /// Fields checked by [`validate::validate_form`].
    pub const REQUIRED: [FieldId; 4] = [
        FieldId::Name,
        FieldId::Email,
        FieldId::InquiryType,
        FieldId::Message,
    ];

    /// Identifier used by the markup and the relay configuration.
    pub fn dom_id(self) -> &'static str {
        match self {
            FieldId::Name => "name",
            FieldId::Email => "email",
            FieldId::Company => "company",
            FieldId::Phone => "phone",
            FieldId::Linkedin => "linkedin",
            FieldId::InquiryType => "inquiryType",
            FieldId::Message => "message",
        }
    }

    pub fn from_dom_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.dom_id() == id)
    }

    /// Identifier of the node holding this field's error text.
    pub fn error_id(self) -> String {
        format!("{}-error", self.dom_id())
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// Inquiry categories offered by the landing page and the form's select.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InquiryType {
    Workshop,
    Consulting,
    Speaking,
    Partnership,
    Other,
}

impl InquiryType {
    pub const ALL: [InquiryType; 5] = [
        InquiryType::Workshop,
        InquiryType::Consulting,
        InquiryType::Speaking,
        InquiryType::Partnership,
        InquiryType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InquiryType::Workshop => "workshop",
            InquiryType::Consulting => "consulting",
            InquiryType::Speaking => "speaking",
            InquiryType::Partnership => "partnership",
            InquiryType::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InquiryType::Workshop => "Workshop",
            InquiryType::Consulting => "Consulting",
            InquiryType::Speaking => "Speaking engagement",
            InquiryType::Partnership => "Partnership",
            InquiryType::Other => "Other",
        }
    }
}

impl FromStr for InquiryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown inquiry type `{}`", s))
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error text and `aria-invalid` flag for one field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldStatus {
    pub error: String,
    pub invalid: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Form-level status line shown under the submit control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormStatus {
    pub message: String,
    pub kind: StatusKind,
}

/// The submit button: disabled and relabelled while a submission is in flight.
#[derive(Clone, Debug)]
pub struct SubmitControl {
    pub disabled: bool,
    pub label: String,
    original_label: String,
}

impl SubmitControl {
    pub const SENDING_LABEL: &'static str = "[ Sending... ]";

    fn new(label: &str) -> Self {
        Self {
            disabled: false,
            label: label.to_string(),
            original_label: label.to_string(),
        }
    }

    pub fn begin_sending(&mut self) {
        self.disabled = true;
        self.label = Self::SENDING_LABEL.to_string();
    }

    pub fn restore(&mut self) {
        self.disabled = false;
        self.label = self.original_label.clone();
    }
}

/// Snapshot of field values taken at submit time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormData {
    values: BTreeMap<FieldId, String>,
}

impl FormData {
    /// Value of a field, or `""` when the markup has no such field.
    pub fn get(&self, id: FieldId) -> &str {
        self.values.get(&id).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.values.insert(id, value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Live state of the loaded contact form.
#[derive(Clone, Debug)]
pub struct ContactForm {
    values: BTreeMap<FieldId, String>,
    status: BTreeMap<FieldId, FieldStatus>,
    category_options: Vec<InquiryType>,
    pub submit: SubmitControl,
    pub form_status: Option<FormStatus>,
}

impl ContactForm {
    /// Build an empty form holding exactly the fields the markup declares.
    pub fn from_template(template: &FormTemplate) -> Self {
        let mut values = BTreeMap::new();
        let mut status = BTreeMap::new();
        for field in template.field_ids() {
            values.insert(field, String::new());
            status.insert(field, FieldStatus::default());
        }
        Self {
            values,
            status,
            category_options: template.category_options(),
            submit: SubmitControl::new(&template.submit_label),
            form_status: None,
        }
    }

    pub fn has_field(&self, id: FieldId) -> bool {
        self.values.contains_key(&id)
    }

    pub fn value(&self, id: FieldId) -> &str {
        self.values.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Categories the select offers, in markup order.
    pub fn category_options(&self) -> &[InquiryType] {
        &self.category_options
    }

    /// Replace a value programmatically. Does not touch error state.
    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(&id) {
            *slot = value.into();
        }
    }

    /// Pre-select a category; ignored when the select does not offer it.
    pub fn preselect_category(&mut self, category: InquiryType) -> bool {
        if self.category_options.contains(&category) {
            self.set_value(FieldId::InquiryType, category.as_str());
            true
        } else {
            false
        }
    }

    /// Keystroke into a text field.
    pub fn type_char(&mut self, id: FieldId, c: char) {
        if let Some(slot) = self.values.get_mut(&id) {
            slot.push(c);
            self.clear_error(id);
        }
    }

    pub fn backspace(&mut self, id: FieldId) {
        if let Some(slot) = self.values.get_mut(&id) {
            slot.pop();
            self.clear_error(id);
        }
    }

    /// Move the category select by `step` options; an empty value counts as
    /// the placeholder slot before the first option.
    pub fn cycle_category(&mut self, step: isize) {
        if self.category_options.is_empty() || !self.has_field(FieldId::InquiryType) {
            return;
        }
        let slots = self.category_options.len() as isize + 1;
        let current = self
            .value(FieldId::InquiryType)
            .parse::<InquiryType>()
            .ok()
            .and_then(|t| self.category_options.iter().position(|o| *o == t))
            .map(|i| i as isize + 1)
            .unwrap_or(0);
        let next = (current + step).rem_euclid(slots);
        let value = if next == 0 {
            ""
        } else {
            self.category_options[(next - 1) as usize].as_str()
        };
        self.set_value(FieldId::InquiryType, value);
        self.clear_error(FieldId::InquiryType);
    }

    pub fn show_error(&mut self, id: FieldId, message: &str) {
        if let Some(st) = self.status.get_mut(&id) {
            st.error = message.to_string();
            st.invalid = true;
        }
    }

    pub fn clear_error(&mut self, id: FieldId) {
        if let Some(st) = self.status.get_mut(&id) {
            st.error.clear();
            st.invalid = false;
        }
    }

    pub fn status(&self, id: FieldId) -> Option<&FieldStatus> {
        self.status.get(&id)
    }

    /// Current error text; empty when the field is valid or absent.
    pub fn error(&self, id: FieldId) -> &str {
        self.status.get(&id).map(|s| s.error.as_str()).unwrap_or("")
    }

    pub fn is_invalid(&self, id: FieldId) -> bool {
        self.status.get(&id).map(|s| s.invalid).unwrap_or(false)
    }

    pub fn set_form_status(&mut self, message: &str, kind: StatusKind) {
        self.form_status = Some(FormStatus {
            message: message.to_string(),
            kind,
        });
    }

    /// Clear every value back to its default, leaving statuses alone.
    pub fn reset(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    pub fn data(&self) -> FormData {
        FormData {
            values: self.values.clone(),
        }
    }
}
