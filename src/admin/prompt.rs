//! Console input/output for the admin shell.
//!
//! Everything the console reads or prints goes through [`ConsoleIo`], so the
//! shell can be scripted in tests.

use std::io;

use crate::utils::line_editor::{prompt_line_editor, LineEditorError, LineEditorOptions};

pub trait ConsoleIo {
    /// Read one line, starting from `initial`. `Ok(None)` means the user
    /// cancelled with Esc or Ctrl+C.
    fn read_line(&mut self, prompt: &str, initial: &str) -> io::Result<Option<String>>;

    /// Like [`ConsoleIo::read_line`], but the input is masked.
    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn say(&mut self, line: &str);
}

/// The real terminal, using the raw-mode line editor.
#[derive(Debug, Default)]
pub struct TerminalIo;

impl TerminalIo {
    fn prompt(prompt: &str, options: &LineEditorOptions) -> io::Result<Option<String>> {
        match prompt_line_editor(prompt, options) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_cancelled() => Ok(None),
            Err(err) => Err(into_io(err)),
        }
    }
}

fn into_io(err: LineEditorError) -> io::Error {
    io::Error::other(err.to_string())
}

impl ConsoleIo for TerminalIo {
    fn read_line(&mut self, prompt: &str, initial: &str) -> io::Result<Option<String>> {
        Self::prompt(prompt, &LineEditorOptions::prefilled(initial))
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Self::prompt(prompt, &LineEditorOptions::masked())
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Only an explicit yes confirms. Blank or anything else declines.
pub fn parse_confirmation(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "no" | "n" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Ask a yes/no question. Cancelling counts as no.
pub fn confirm(io: &mut dyn ConsoleIo, question: &str) -> io::Result<bool> {
    let answer = io.read_line(&format!("{question} [y/N]: "), "")?;
    Ok(answer.as_deref().is_some_and(parse_confirmation))
}

#[cfg(test)]
pub use scripted::ScriptedIo;

#[cfg(test)]
mod scripted {
    use super::ConsoleIo;
    use std::collections::VecDeque;
    use std::io;

    /// Replays canned answers and records everything printed.
    ///
    /// Each answer replaces the prefilled text, mirroring a user who clears
    /// the field and types. `None` cancels; running out of answers is an
    /// error so a test cannot loop forever.
    #[derive(Debug, Default)]
    pub struct ScriptedIo {
        answers: VecDeque<Option<String>>,
        pub prompts: Vec<String>,
        pub output: Vec<String>,
    }

    impl ScriptedIo {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(|s| Some(s.into())).collect(),
                ..Self::default()
            }
        }

        pub fn then_cancel(mut self) -> Self {
            self.answers.push_back(None);
            self
        }

        pub fn printed(&self, needle: &str) -> bool {
            self.output.iter().any(|line| line.contains(needle))
        }

        fn next(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.prompts.push(prompt.to_string());
            self.answers.pop_front().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
            })
        }
    }

    impl ConsoleIo for ScriptedIo {
        fn read_line(&mut self, prompt: &str, initial: &str) -> io::Result<Option<String>> {
            let answer = self.next(prompt)?;
            // "=" keeps the prefilled value.
            Ok(answer.map(|text| if text == "=" { initial.to_string() } else { text }))
        }

        fn read_secret(&mut self, prompt: &str) -> io::Result<Option<String>> {
            self.next(prompt)
        }

        fn say(&mut self, line: &str) {
            self.output.push(line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_confirms() {
        assert!(parse_confirmation("y"));
        assert!(parse_confirmation(" YES "));
        assert!(!parse_confirmation(""));
        assert!(!parse_confirmation("n"));
        assert!(!parse_confirmation("sure"));
    }

    #[test]
    fn parses_booleans() {
        assert_eq!(parse_bool("On"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(format_bool(true), "yes");
    }

    #[test]
    fn cancelled_confirmation_declines() {
        let mut io = ScriptedIo::default().then_cancel();
        assert!(!confirm(&mut io, "Delete?").unwrap());
        assert_eq!(io.prompts, vec!["Delete? [y/N]: "]);
    }
}
