//! Keyboard focus inside the dialog.

use crate::form::FieldId;

/// Something inside the dialog that can hold focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focusable {
    CloseButton,
    Field(FieldId),
    Submit,
}

/// Confines Tab / Shift+Tab to the dialog while it is visible.
///
/// The modal controller calls [`FocusTrap::on_visibility_change`] itself when
/// it shows or hides the dialog.
#[derive(Clone, Debug, Default)]
pub struct FocusTrap {
    order: Vec<Focusable>,
    current: Option<usize>,
    active: bool,
}

impl FocusTrap {
    pub fn on_visibility_change(&mut self, visible: bool, order: Vec<Focusable>) {
        self.active = visible;
        self.current = None;
        self.order = if visible { order } else { Vec::new() };
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn focused(&self) -> Option<Focusable> {
        self.current.and_then(|i| self.order.get(i).copied())
    }

    pub fn focused_field(&self) -> Option<FieldId> {
        match self.focused() {
            Some(Focusable::Field(id)) => Some(id),
            _ => None,
        }
    }

    /// Focus the first form control, skipping the close button.
    pub fn focus_first_field(&mut self) {
        if !self.active {
            return;
        }
        self.current = self
            .order
            .iter()
            .position(|f| matches!(f, Focusable::Field(_)))
            .or(if self.order.is_empty() { None } else { Some(0) });
    }

    /// Tab. Returns the field that lost focus, if any.
    pub fn next(&mut self) -> Option<FieldId> {
        self.step(1)
    }

    /// Shift+Tab. Returns the field that lost focus, if any.
    pub fn prev(&mut self) -> Option<FieldId> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<FieldId> {
        if !self.active || self.order.is_empty() {
            return None;
        }
        let blurred = self.focused_field();
        let len = self.order.len() as isize;
        let next = match self.current {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.current = Some(next as usize);
        blurred
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trap() -> FocusTrap {
        let mut t = FocusTrap::default();
        t.on_visibility_change(
            true,
            vec![
                Focusable::CloseButton,
                Focusable::Field(FieldId::Name),
                Focusable::Field(FieldId::Message),
                Focusable::Submit,
            ],
        );
        t
    }

    #[test]
    fn tab_wraps_from_last_to_first() {
        let mut t = trap();
        t.focus_first_field();
        assert_eq!(t.focused(), Some(Focusable::Field(FieldId::Name)));
        assert_eq!(t.next(), Some(FieldId::Name));
        assert_eq!(t.next(), Some(FieldId::Message));
        assert_eq!(t.focused(), Some(Focusable::Submit));
        assert_eq!(t.next(), None);
        assert_eq!(t.focused(), Some(Focusable::CloseButton));
    }

    #[test]
    fn shift_tab_wraps_from_first_to_last() {
        let mut t = trap();
        t.next();
        assert_eq!(t.focused(), Some(Focusable::CloseButton));
        t.prev();
        assert_eq!(t.focused(), Some(Focusable::Submit));
    }

    #[test]
    fn hidden_dialog_does_not_trap() {
        let mut t = trap();
        t.on_visibility_change(false, Vec::new());
        assert_eq!(t.next(), None);
        assert_eq!(t.focused(), None);
        t.focus_first_field();
        assert_eq!(t.focused(), None);
    }
}
