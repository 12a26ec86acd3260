//! Login overlay shown over the chat transcript.

use ratatui::crossterm::event::{KeyCode, KeyEvent};

use crate::admin::login::{LoginOutcome, MISSING_FIELDS_NOTICE};
use crate::utils::line_editor::{
    apply_line_edit_action, map_key_event_to_action, LineEditAction, LineEditOutcome,
    LineEditorOptions, LineEditorState, MaskMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCommand {
    None,
    Close,
    Submit { email: String, password: String },
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: LineEditorState,
    pub password: LineEditorState,
    pub focus: LoginField,
    pub notice: Option<&'static str>,
    pub submitting: bool,
}

impl LoginForm {
    pub fn new(email_hint: Option<&str>) -> Self {
        let email = LineEditorState::with_text(email_hint.unwrap_or_default().to_string());
        let focus = if email.text.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
        Self {
            email,
            password: LineEditorState::default(),
            focus,
            notice: None,
            submitting: false,
        }
    }

    pub fn mask_for(field: LoginField) -> MaskMode {
        match field {
            LoginField::Email => MaskMode::None,
            LoginField::Password => MaskMode::Hidden,
        }
    }

    fn focused_mut(&mut self) -> &mut LineEditorState {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    fn try_submit(&mut self) -> LoginCommand {
        if self.email.text.trim().is_empty() || self.password.text.is_empty() {
            self.notice = Some(MISSING_FIELDS_NOTICE);
            return LoginCommand::None;
        }
        self.submitting = true;
        self.notice = None;
        LoginCommand::Submit {
            email: self.email.text.trim().to_string(),
            password: self.password.text.clone(),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> LoginCommand {
        if self.submitting {
            return LoginCommand::None;
        }
        match key.code {
            KeyCode::Esc => return LoginCommand::Close,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.toggle_focus();
                return LoginCommand::None;
            }
            _ => {}
        }

        let options = LineEditorOptions {
            allow_cancel: false,
            ..LineEditorOptions::default()
        };
        let Some(action) = map_key_event_to_action(key, &options) else {
            return LoginCommand::None;
        };
        self.apply(action)
    }

    pub fn handle_paste(&mut self, text: &str) -> LoginCommand {
        if self.submitting {
            return LoginCommand::None;
        }
        self.apply(LineEditAction::Paste(text.to_string()))
    }

    fn apply(&mut self, action: LineEditAction) -> LoginCommand {
        match apply_line_edit_action(self.focused_mut(), action) {
            LineEditOutcome::Submit(_) => match self.focus {
                LoginField::Email => {
                    self.focus = LoginField::Password;
                    LoginCommand::None
                }
                LoginField::Password => self.try_submit(),
            },
            LineEditOutcome::Cancelled => LoginCommand::Close,
            LineEditOutcome::Continue { .. } => LoginCommand::None,
        }
    }

    /// Record the backend's answer. Returns true when the login succeeded.
    pub fn settle(&mut self, outcome: LoginOutcome) -> bool {
        self.submitting = false;
        self.notice = outcome.notice();
        if self.notice.is_some() {
            self.password.clear();
            self.focus = LoginField::Password;
        }
        outcome == LoginOutcome::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::login::{INVALID_CREDENTIALS_NOTICE, LOGIN_FAILED_NOTICE};
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            form.handle_key(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn enter_moves_from_email_to_password_then_submits() {
        let mut form = LoginForm::new(None);
        type_text(&mut form, "admin@rex.test");
        assert_eq!(form.handle_key(&key(KeyCode::Enter)), LoginCommand::None);
        assert_eq!(form.focus, LoginField::Password);

        type_text(&mut form, "pw");
        assert_eq!(
            form.handle_key(&key(KeyCode::Enter)),
            LoginCommand::Submit {
                email: "admin@rex.test".to_string(),
                password: "pw".to_string()
            }
        );
        assert!(form.submitting);
        assert_eq!(form.handle_key(&key(KeyCode::Char('x'))), LoginCommand::None);
    }

    #[test]
    fn email_hint_focuses_password() {
        let form = LoginForm::new(Some("admin@rex.test"));
        assert_eq!(form.focus, LoginField::Password);
        assert_eq!(form.email.text, "admin@rex.test");
    }

    #[test]
    fn blank_fields_show_notice() {
        let mut form = LoginForm::new(None);
        form.focus = LoginField::Password;
        assert_eq!(form.handle_key(&key(KeyCode::Enter)), LoginCommand::None);
        assert_eq!(form.notice, Some(MISSING_FIELDS_NOTICE));
    }

    #[test]
    fn failed_outcomes_clear_password_and_keep_form_open() {
        let mut form = LoginForm::new(Some("admin@rex.test"));
        type_text(&mut form, "wrong");
        form.handle_key(&key(KeyCode::Enter));

        assert!(!form.settle(LoginOutcome::Rejected));
        assert_eq!(form.notice, Some(INVALID_CREDENTIALS_NOTICE));
        assert!(form.password.text.is_empty());

        type_text(&mut form, "again");
        form.handle_key(&key(KeyCode::Enter));
        assert!(!form.settle(LoginOutcome::Failed));
        assert_eq!(form.notice, Some(LOGIN_FAILED_NOTICE));

        assert!(form.settle(LoginOutcome::Authenticated));
    }

    #[test]
    fn escape_closes() {
        let mut form = LoginForm::new(None);
        assert_eq!(form.handle_key(&key(KeyCode::Esc)), LoginCommand::Close);
    }
}
