//! Single-line editing shared by the chat input, the login overlay and the
//! admin console prompts.
//!
//! Key handling is split from terminal IO: [`map_key_event_to_action`] and
//! [`apply_line_edit_action`] are pure, so the full-screen chat can drive
//! them from its own event loop while [`prompt_line_editor`] wraps them in a
//! blocking raw-mode prompt for the console.

use crate::utils::input::sanitize_text_input;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditorState {
    pub text: String,
    /// Cursor position in characters, not bytes.
    pub cursor: usize,
}

impl LineEditorState {
    pub fn with_text(text: String) -> Self {
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the editor empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    None,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEditorOptions {
    pub initial_text: String,
    pub allow_cancel: bool,
    pub mask_mode: MaskMode,
}

impl Default for LineEditorOptions {
    fn default() -> Self {
        Self {
            initial_text: String::new(),
            allow_cancel: true,
            mask_mode: MaskMode::None,
        }
    }
}

impl LineEditorOptions {
    pub fn prefilled(text: &str) -> Self {
        Self {
            initial_text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn masked() -> Self {
        Self {
            mask_mode: MaskMode::Hidden,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditAction {
    Insert(char),
    Paste(String),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveStart,
    MoveEnd,
    DeleteToEnd,
    DeleteWord,
    ClearAll,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEditOutcome {
    Continue { redraw: bool },
    Submit(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct LineEditorError {
    message: String,
}

impl LineEditorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.message == CANCELLED
    }
}

impl fmt::Display for LineEditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LineEditorError {}

const CANCELLED: &str = "Cancelled by user";

fn io_error(err: io::Error) -> LineEditorError {
    LineEditorError::new(err.to_string())
}

/// Read one line in raw mode. Esc or Ctrl+C cancels when allowed.
pub fn prompt_line_editor(
    prompt: &str,
    options: &LineEditorOptions,
) -> Result<String, LineEditorError> {
    enable_raw_mode().map_err(io_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, event::EnableBracketedPaste).map_err(io_error)?;

    let result = (|| -> Result<String, LineEditorError> {
        let mut state = LineEditorState::with_text(options.initial_text.clone());
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                redraw_line(prompt, &state, options).map_err(io_error)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100)).map_err(io_error)? {
                continue;
            }
            let action = match event::read().map_err(io_error)? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    map_key_event_to_action(&key, options)
                }
                Event::Paste(text) => Some(LineEditAction::Paste(sanitize_text_input(&text))),
                _ => None,
            };
            let Some(action) = action else {
                continue;
            };

            match apply_line_edit_action(&mut state, action) {
                LineEditOutcome::Continue { redraw } => needs_redraw = redraw,
                LineEditOutcome::Submit(value) => break Ok(value),
                LineEditOutcome::Cancelled => break Err(LineEditorError::new(CANCELLED)),
            }
        }
    })();

    // Restore the terminal even when the prompt failed.
    let restore = disable_raw_mode()
        .and_then(|_| execute!(stdout, event::DisableBracketedPaste))
        .map_err(io_error);
    println!();

    match (result, restore) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(err), _) | (Ok(_), Err(err)) => Err(err),
    }
}

fn redraw_line(
    prompt: &str,
    state: &LineEditorState,
    options: &LineEditorOptions,
) -> io::Result<()> {
    let shown = display_text(state, options.mask_mode);
    let before_cursor: String = shown.chars().take(state.cursor).collect();
    let cursor_columns =
        UnicodeWidthStr::width(prompt) + UnicodeWidthStr::width(before_cursor.as_str());

    print!("\r\x1b[K{prompt}{shown}");
    if cursor_columns > 0 {
        print!("\r\x1b[{cursor_columns}C");
    } else {
        print!("\r");
    }
    io::stdout().flush()
}

/// The text as it should appear on screen.
pub fn display_text(state: &LineEditorState, mask_mode: MaskMode) -> String {
    match mask_mode {
        MaskMode::None => state.text.clone(),
        MaskMode::Hidden => "*".repeat(state.text.chars().count()),
    }
}

pub fn map_key_event_to_action(
    key: &KeyEvent,
    options: &LineEditorOptions,
) -> Option<LineEditAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(LineEditAction::Submit),
        KeyCode::Esc if options.allow_cancel => Some(LineEditAction::Cancel),
        KeyCode::Backspace => Some(LineEditAction::Backspace),
        KeyCode::Delete => Some(LineEditAction::Delete),
        KeyCode::Left => Some(LineEditAction::MoveLeft),
        KeyCode::Right => Some(LineEditAction::MoveRight),
        KeyCode::Home => Some(LineEditAction::MoveStart),
        KeyCode::End => Some(LineEditAction::MoveEnd),
        KeyCode::Char('a') if ctrl => Some(LineEditAction::MoveStart),
        KeyCode::Char('e') if ctrl => Some(LineEditAction::MoveEnd),
        KeyCode::Char('k') if ctrl => Some(LineEditAction::DeleteToEnd),
        KeyCode::Char('w') if ctrl => Some(LineEditAction::DeleteWord),
        KeyCode::Char('u') if ctrl => Some(LineEditAction::ClearAll),
        KeyCode::Char('c') if ctrl && options.allow_cancel => Some(LineEditAction::Cancel),
        KeyCode::Char('\n' | '\r') => Some(LineEditAction::Submit),
        KeyCode::Char(c) if !ctrl => Some(LineEditAction::Insert(c)),
        _ => None,
    }
}

pub fn apply_line_edit_action(
    state: &mut LineEditorState,
    action: LineEditAction,
) -> LineEditOutcome {
    let len = state.text.chars().count();
    let changed = match action {
        LineEditAction::Insert(c) => {
            let at = char_to_byte_index(&state.text, state.cursor);
            state.text.insert(at, c);
            state.cursor += 1;
            true
        }
        LineEditAction::Paste(text) => {
            let first_line = text.split('\n').next().unwrap_or("");
            let at = char_to_byte_index(&state.text, state.cursor);
            state.text.insert_str(at, first_line);
            state.cursor += first_line.chars().count();
            if text.contains('\n') {
                return LineEditOutcome::Submit(state.text.clone());
            }
            !first_line.is_empty()
        }
        LineEditAction::Backspace if state.cursor > 0 => {
            remove_char_range(&mut state.text, state.cursor - 1, state.cursor);
            state.cursor -= 1;
            true
        }
        LineEditAction::Delete if state.cursor < len => {
            remove_char_range(&mut state.text, state.cursor, state.cursor + 1);
            true
        }
        LineEditAction::MoveLeft if state.cursor > 0 => {
            state.cursor -= 1;
            true
        }
        LineEditAction::MoveRight if state.cursor < len => {
            state.cursor += 1;
            true
        }
        LineEditAction::MoveStart if state.cursor > 0 => {
            state.cursor = 0;
            true
        }
        LineEditAction::MoveEnd if state.cursor < len => {
            state.cursor = len;
            true
        }
        LineEditAction::DeleteToEnd if state.cursor < len => {
            remove_char_range(&mut state.text, state.cursor, len);
            true
        }
        LineEditAction::DeleteWord if state.cursor > 0 => {
            let chars: Vec<char> = state.text.chars().collect();
            let mut start = state.cursor;
            while start > 0 && chars[start - 1] == ' ' {
                start -= 1;
            }
            while start > 0 && chars[start - 1] != ' ' {
                start -= 1;
            }
            remove_char_range(&mut state.text, start, state.cursor);
            state.cursor = start;
            true
        }
        LineEditAction::ClearAll if !state.text.is_empty() => {
            state.clear();
            true
        }
        LineEditAction::Submit => return LineEditOutcome::Submit(state.text.clone()),
        LineEditAction::Cancel => return LineEditOutcome::Cancelled,
        _ => false,
    };
    LineEditOutcome::Continue { redraw: changed }
}

fn remove_char_range(input: &mut String, start: usize, end: usize) {
    let from = char_to_byte_index(input, start);
    let to = char_to_byte_index(input, end);
    input.replace_range(from..to, "");
}

fn char_to_byte_index(input: &str, char_index: usize) -> usize {
    input
        .char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(input.len())
}
