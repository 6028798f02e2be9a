//! Editable form fields and the submit gate.

use crate::session::SessionState;

/// Which form field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Query,
    Context,
}

/// Owns the query and optional user context as typed by the user.
///
/// Values are stored verbatim; trimming happens only when a request is built.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    query: String,
    user_context: String,
    focus: Field,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn set_user_context(&mut self, text: impl Into<String>) {
        self.user_context = text.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn user_context(&self) -> &str {
        &self.user_context
    }

    /// True iff the trimmed query is non-empty and no attempt is in flight.
    pub fn can_submit(&self, state: &SessionState) -> bool {
        !self.query.trim().is_empty() && !matches!(state, SessionState::InFlight)
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Field::Query => Field::Context,
            Field::Context => Field::Query,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Query => &mut self.query,
            Field::Context => &mut self.user_context,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
    }

    pub fn clear_focused(&mut self) {
        self.focused_mut().clear();
    }
}
