use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::core::message::{Message, TranscriptRole};
use crate::ui::chat::login_form::{LoginField, LoginForm};
use crate::ui::chat::state::ChatUi;
use crate::utils::line_editor::{display_text, LineEditorState, MaskMode};

/// Everything one frame needs.
pub struct ChatView<'a> {
    pub transcript: &'a [Message],
    pub ui: &'a ChatUi,
    pub loading: bool,
    pub username: &'a str,
    pub logging_status: String,
    /// Animation frame for the typing indicator.
    pub frame: usize,
}

fn role_prefix(role: TranscriptRole) -> Span<'static> {
    match role {
        TranscriptRole::User => Span::styled("> ", Style::default().fg(Color::Cyan)),
        TranscriptRole::Rex => Span::styled(
            "Rex: ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        TranscriptRole::System => Span::raw(""),
        TranscriptRole::Error => Span::styled("! ", Style::default().fg(Color::Red)),
    }
}

fn body_style(role: TranscriptRole) -> Style {
    match role {
        TranscriptRole::User => Style::default().fg(Color::Cyan),
        TranscriptRole::Rex => Style::default(),
        TranscriptRole::System => Style::default().fg(Color::DarkGray),
        TranscriptRole::Error => Style::default().fg(Color::Red),
    }
}

pub fn transcript_lines(view: &ChatView<'_>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, message) in view.transcript.iter().enumerate() {
        let shown = view.ui.reveal.visible(index, &message.content);
        let style = body_style(message.role);
        for (line_no, text) in shown.split('\n').enumerate() {
            let mut spans = Vec::with_capacity(2);
            if line_no == 0 {
                spans.push(role_prefix(message.role));
            }
            spans.push(Span::styled(text.to_string(), style));
            lines.push(Line::from(spans));
        }
        lines.push(Line::default());
    }
    if view.loading {
        let dots = ".".repeat(1 + view.frame % 3);
        lines.push(Line::from(Span::styled(
            format!("Rex is typing{dots}"),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

/// Rows the lines occupy once wrapped to `width` columns.
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Characters skipped so the cursor stays inside a field `width` wide.
fn horizontal_offset(state: &LineEditorState, width: u16) -> usize {
    state.cursor.saturating_sub(usize::from(width.saturating_sub(1)))
}

fn field_text(state: &LineEditorState, mask: MaskMode, width: u16) -> (String, u16) {
    let offset = horizontal_offset(state, width);
    let shown: String = display_text(state, mask).chars().skip(offset).collect();
    let before_cursor: String = shown.chars().take(state.cursor - offset).collect();
    let cursor = u16::try_from(UnicodeWidthStr::width(before_cursor.as_str())).unwrap_or(width);
    (shown, cursor)
}

pub fn draw(f: &mut Frame, view: &ChatView<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());

    let title = format!(
        "Rex • talking as {} • Logging: {}",
        view.username, view.logging_status
    );
    let lines = transcript_lines(view);
    let body_height = chunks[0].height.saturating_sub(1);
    let total = wrapped_height(&lines, chunks[0].width);
    let max_offset = total.saturating_sub(body_height);
    let offset = max_offset.saturating_sub(view.ui.scroll_back);

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    f.render_widget(transcript, chunks[0]);

    let input_title = if view.loading {
        "Waiting for Rex… (Ctrl+C to quit)"
    } else {
        "Message (Enter to send, /help for commands, Ctrl+C to quit)"
    };
    let inner_width = chunks[1].width.saturating_sub(2);
    let (shown, cursor) = field_text(&view.ui.input, MaskMode::None, inner_width);
    let input = Paragraph::new(shown).block(
        Block::default()
            .borders(Borders::ALL)
            .title(input_title)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(input, chunks[1]);

    match &view.ui.login {
        Some(form) => draw_login(f, form),
        None => f.set_cursor_position(Position::new(
            chunks[1].x + 1 + cursor.min(inner_width),
            chunks[1].y + 1,
        )),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

const LABEL_WIDTH: u16 = 10;

fn draw_login(f: &mut Frame, form: &LoginForm) {
    let area = centered(f.area(), 56, 8);
    let field_width = area.width.saturating_sub(2 + LABEL_WIDTH);
    let (email, email_cursor) = field_text(&form.email, MaskMode::None, field_width);
    let (password, password_cursor) = field_text(
        &form.password,
        LoginForm::mask_for(LoginField::Password),
        field_width,
    );

    let footer = if form.submitting {
        Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(notice) = form.notice {
        Line::from(Span::styled(notice, Style::default().fg(Color::Red)))
    } else {
        Line::from(Span::styled(
            "Enter to continue • Tab to switch • Esc to close",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let body = vec![
        Line::default(),
        Line::from(vec![Span::raw("Email:    "), Span::raw(email)]),
        Line::from(vec![Span::raw("Password: "), Span::raw(password)]),
        Line::default(),
        footer,
    ];

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(body).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Admin login")
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        area,
    );

    let (row, cursor) = match form.focus {
        LoginField::Email => (2, email_cursor),
        LoginField::Password => (3, password_cursor),
    };
    f.set_cursor_position(Position::new(
        area.x + 1 + LABEL_WIDTH + cursor.min(field_width),
        area.y + row,
    ));
}
