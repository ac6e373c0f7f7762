//! Modal controller: dialog lifecycle, lazily loaded form content, focus.
//!
//! All timing is expressed as deadlines checked by [`ModalController::tick`],
//! so the event loop never sleeps on the UI thread.
//!
pub mod focus;
pub mod markup;

use std::time::{Duration, Instant};

use crate::error::ContactError;
use crate::form::validate;
use crate::form::{ContactForm, FieldId, InquiryType};
use focus::{FocusTrap, Focusable};
use markup::{FormTemplate, MarkupSource};

/// Delay before the first field takes focus, letting the open transition finish.
pub const FOCUS_DELAY: Duration = Duration::from_millis(300);
/// Time between hiding the dialog and clearing its content.
pub const CLOSE_TRANSITION: Duration = Duration::from_millis(300);

/// The dialog that is currently open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalSession {
    pub id: u64,
    pub prefilled: Option<InquiryType>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open(ModalSession),
}

/// Markup plus the live form built from it.
#[derive(Clone, Debug)]
pub struct LoadedForm {
    pub template: FormTemplate,
    pub form: ContactForm,
}

/// What the dialog's container currently holds.
#[derive(Clone, Debug)]
pub enum Content {
    Empty,
    Form(Box<LoadedForm>),
    LoadError(String),
}

impl Content {
    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

#[derive(Debug)]
pub struct ModalController {
    state: ModalState,
    content: Content,
    visible: bool,
    scroll_locked: bool,
    focus: FocusTrap,
    focus_at: Option<Instant>,
    clear_at: Option<Instant>,
    close_at: Option<Instant>,
    next_session: u64,
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            state: ModalState::Closed,
            content: Content::Empty,
            visible: false,
            scroll_locked: false,
            focus: FocusTrap::default(),
            focus_at: None,
            clear_at: None,
            close_at: None,
            next_session: 1,
        }
    }

    /// Open the dialog, loading its form from `source`.
    ///
    /// A load failure still shows the dialog, with an inline error in place
    /// of the form, and is returned so the caller can log it.
    pub fn open(
        &mut self,
        category: Option<InquiryType>,
        source: &dyn MarkupSource,
        now: Instant,
    ) -> Result<u64, ContactError> {
        if let ModalState::Open(prev) = &self.state {
            tracing::debug!(session = prev.id, "replacing open contact modal");
        }
        let id = self.next_session;
        self.next_session += 1;
        self.state = ModalState::Open(ModalSession {
            id,
            prefilled: category,
        });
        self.clear_at = None;
        self.close_at = None;

        let result = markup::load_template(source);
        let order = match result {
            Ok(template) => {
                let mut form = ContactForm::from_template(&template);
                if let Some(cat) = category
                    && !form.preselect_category(cat)
                {
                    tracing::warn!(category = %cat, "markup does not offer prefilled category");
                }
                let mut order = vec![Focusable::CloseButton];
                order.extend(template.field_ids().into_iter().map(Focusable::Field));
                order.push(Focusable::Submit);
                self.content = Content::Form(Box::new(LoadedForm { template, form }));
                Ok(order)
            }
            Err(err) => {
                tracing::error!(error = %err, "error opening contact modal");
                self.content = Content::LoadError(err.user_message().to_string());
                Err(err)
            }
        };

        self.visible = true;
        self.scroll_locked = true;
        match order {
            Ok(order) => {
                self.focus.on_visibility_change(true, order);
                self.focus_at = Some(now + FOCUS_DELAY);
                tracing::info!(session = id, category = ?category, "contact modal opened");
                Ok(id)
            }
            Err(err) => {
                self.focus
                    .on_visibility_change(true, vec![Focusable::CloseButton]);
                self.focus_at = Some(now + FOCUS_DELAY);
                Err(err)
            }
        }
    }

    /// Hide the dialog. Content is cleared once the close transition ends.
    pub fn close(&mut self, now: Instant) {
        let ModalState::Open(session) = &self.state else {
            return;
        };
        tracing::info!(session = session.id, "contact modal closed");
        self.visible = false;
        self.scroll_locked = false;
        self.focus.on_visibility_change(false, Vec::new());
        self.focus_at = None;
        self.close_at = None;
        self.clear_at = Some(now + CLOSE_TRANSITION);
        self.state = ModalState::Closed;
    }

    /// Close the dialog once `delay` has passed.
    pub fn schedule_close(&mut self, now: Instant, delay: Duration) {
        if self.is_open() {
            self.close_at = Some(now + delay);
        }
    }

    /// Fire every deadline that has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.close_at.is_some_and(|t| now >= t) {
            self.close_at = None;
            self.close(now);
        }
        if self.focus_at.is_some_and(|t| now >= t) {
            self.focus_at = None;
            self.focus.focus_first_field();
        }
        if self.clear_at.is_some_and(|t| now >= t) {
            self.clear_at = None;
            self.content = Content::Empty;
        }
    }

    /// Tab within the dialog; re-validates the field being left.
    pub fn focus_next(&mut self) {
        let blurred = self.focus.next();
        self.blur(blurred);
    }

    /// Shift+Tab within the dialog; re-validates the field being left.
    pub fn focus_prev(&mut self) {
        let blurred = self.focus.prev();
        self.blur(blurred);
    }

    fn blur(&mut self, field: Option<FieldId>) {
        if let (Some(id), Some(form)) = (field, self.form_mut()) {
            validate::on_blur(form, id);
        }
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn session_id(&self) -> Option<u64> {
        match &self.state {
            ModalState::Open(s) => Some(s.id),
            ModalState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn form(&self) -> Option<&ContactForm> {
        match &self.content {
            Content::Form(loaded) => Some(&loaded.form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut ContactForm> {
        match &mut self.content {
            Content::Form(loaded) => Some(&mut loaded.form),
            _ => None,
        }
    }

    pub fn template(&self) -> Option<&FormTemplate> {
        match &self.content {
            Content::Form(loaded) => Some(&loaded.template),
            _ => None,
        }
    }

    pub fn focus(&self) -> &FocusTrap {
        &self.focus
    }
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}
