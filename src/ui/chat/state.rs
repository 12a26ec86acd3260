//! Screen state of the chat terminal, independent of the backend.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::chat::login_form::{LoginCommand, LoginForm};
use crate::ui::chat::reveal::RevealState;
use crate::utils::input::{sanitize_text_input, single_line};
use crate::utils::line_editor::{
    apply_line_edit_action, map_key_event_to_action, LineEditAction, LineEditOutcome,
    LineEditorOptions, LineEditorState,
};

pub const HELP_TEXT: &str = "Type a message and press Enter to talk to Rex.\n\
/log <file>  start logging the transcript to a file\n\
/log         pause or resume logging\n\
/quit        leave (Ctrl+C also works)\n\
PageUp/PageDown scroll the transcript.";

/// Input the terminal handles itself instead of sending to Rex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCommand {
    Help,
    Log(Option<String>),
    Quit,
}

pub fn parse_local_command(input: &str) -> Option<LocalCommand> {
    let trimmed = input.trim();
    let rest = trimmed.strip_prefix('/')?;
    let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();
    match name.to_lowercase().as_str() {
        "help" if args.is_empty() => Some(LocalCommand::Help),
        "quit" | "exit" if args.is_empty() => Some(LocalCommand::Quit),
        "log" => Some(LocalCommand::Log((!args.is_empty()).then(|| args.to_string()))),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    None,
    Redraw,
    Send(String),
    Local(LocalCommand),
    Login { email: String, password: String },
    Quit,
}

pub struct ChatUi {
    pub input: LineEditorState,
    /// Wrapped lines scrolled up from the bottom.
    pub scroll_back: u16,
    pub login: Option<LoginForm>,
    pub reveal: RevealState,
    email_hint: Option<String>,
}

impl ChatUi {
    pub fn new(reveal_interval_ms: u64, email_hint: Option<String>) -> Self {
        Self {
            input: LineEditorState::default(),
            scroll_back: 0,
            login: None,
            reveal: RevealState::new(reveal_interval_ms),
            email_hint,
        }
    }

    pub fn open_login(&mut self) {
        if self.login.is_none() {
            self.login = Some(LoginForm::new(self.email_hint.as_deref()));
        }
    }

    /// Handle a key press. While `busy`, Enter keeps the typed text in place.
    pub fn handle_key(&mut self, key: &KeyEvent, busy: bool) -> UiCommand {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d')) {
            return UiCommand::Quit;
        }

        if let Some(form) = self.login.as_mut() {
            return match form.handle_key(key) {
                LoginCommand::None => UiCommand::Redraw,
                LoginCommand::Close => {
                    self.login = None;
                    UiCommand::Redraw
                }
                LoginCommand::Submit { email, password } => UiCommand::Login { email, password },
            };
        }

        match key.code {
            KeyCode::PageUp | KeyCode::Up => {
                let step = if key.code == KeyCode::PageUp { 10 } else { 1 };
                self.scroll_back = self.scroll_back.saturating_add(step);
                return UiCommand::Redraw;
            }
            KeyCode::PageDown | KeyCode::Down => {
                let step = if key.code == KeyCode::PageDown { 10 } else { 1 };
                self.scroll_back = self.scroll_back.saturating_sub(step);
                return UiCommand::Redraw;
            }
            KeyCode::Enter if busy => return UiCommand::None,
            _ => {}
        }

        let options = LineEditorOptions {
            allow_cancel: false,
            ..LineEditorOptions::default()
        };
        match map_key_event_to_action(key, &options) {
            Some(action) => self.apply_input(action),
            None => UiCommand::None,
        }
    }

    pub fn handle_paste(&mut self, text: &str) -> UiCommand {
        let cleaned = single_line(&sanitize_text_input(text));
        if let Some(form) = self.login.as_mut() {
            form.handle_paste(&cleaned);
            return UiCommand::Redraw;
        }
        self.apply_input(LineEditAction::Paste(cleaned))
    }

    fn apply_input(&mut self, action: LineEditAction) -> UiCommand {
        match apply_line_edit_action(&mut self.input, action) {
            LineEditOutcome::Submit(_) => {
                let text = self.input.take();
                self.scroll_back = 0;
                match parse_local_command(&text) {
                    Some(LocalCommand::Quit) => UiCommand::Quit,
                    Some(command) => UiCommand::Local(command),
                    None => UiCommand::Send(text),
                }
            }
            LineEditOutcome::Continue { redraw: true } => UiCommand::Redraw,
            LineEditOutcome::Continue { redraw: false } | LineEditOutcome::Cancelled => {
                UiCommand::None
            }
        }
    }
}
