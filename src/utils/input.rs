//! Cleaning pasted or typed text before it reaches the editor.

/// Expand tabs, turn carriage returns into newlines and drop other control
/// characters that would corrupt the terminal.
pub fn sanitize_text_input(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => sanitized.push_str("    "),
            '\r' => sanitized.push('\n'),
            '\n' => sanitized.push('\n'),
            c if c.is_control() => {}
            c => sanitized.push(c),
        }
    }
    sanitized
}

/// Collapse pasted multi-line text into one chat line.
pub fn single_line(text: &str) -> String {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
