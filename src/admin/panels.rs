//! The seven admin panels and how their data is rendered.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

use crate::admin::prompt::format_bool;
use crate::api::{
    ConversationMessage, ConversationSummary, CustomGuideline, LanguageGuidelines, Memory,
    Reflection, Settings, TraitEntry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Conversations,
    Settings,
    Guidelines,
    CustomGuidelines,
    Reflections,
    Memories,
    Theamal,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Panel::Conversations,
        Panel::Settings,
        Panel::Guidelines,
        Panel::CustomGuidelines,
        Panel::Reflections,
        Panel::Memories,
        Panel::Theamal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Panel::Conversations => "conversations",
            Panel::Settings => "settings",
            Panel::Guidelines => "guidelines",
            Panel::CustomGuidelines => "custom-guidelines",
            Panel::Reflections => "reflections",
            Panel::Memories => "memories",
            Panel::Theamal => "theamal",
        }
    }

    pub fn parse(input: &str) -> Option<Panel> {
        let normalized = input.trim().to_lowercase().replace('_', "-");
        Panel::ALL
            .into_iter()
            .find(|panel| panel.name() == normalized)
    }

    /// Collection endpoint, relative to the base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Panel::Conversations => "api/conversations",
            Panel::Settings => "api/settings",
            Panel::Guidelines => "api/guidelines",
            Panel::CustomGuidelines => "api/custom-guidelines",
            Panel::Reflections => "api/reflections",
            Panel::Memories => "api/memories",
            Panel::Theamal => "api/theamal",
        }
    }

    /// Plural noun used in status lines ("No memories found").
    pub fn noun(self) -> &'static str {
        match self {
            Panel::Conversations => "conversations",
            Panel::Settings => "settings",
            Panel::Guidelines => "language guidelines",
            Panel::CustomGuidelines => "custom guidelines",
            Panel::Reflections => "reflections",
            Panel::Memories => "memories",
            Panel::Theamal => "theamal entries",
        }
    }

    /// Singular noun for record-level notices ("Reflection not found").
    pub fn record_noun(self) -> &'static str {
        match self {
            Panel::Conversations => "conversation",
            Panel::Settings => "settings",
            Panel::Guidelines => "guidelines",
            Panel::CustomGuidelines => "guideline",
            Panel::Reflections => "reflection",
            Panel::Memories => "memory",
            Panel::Theamal => "theamal entry",
        }
    }

    /// Panels that hold a list of records rather than a single document.
    pub fn is_list(self) -> bool {
        !matches!(self, Panel::Settings | Panel::Guidelines)
    }

    pub fn status_line(self, state: LoadState) -> Option<String> {
        match state {
            LoadState::Loading => Some(format!("Loading {}...", self.noun())),
            LoadState::Empty => Some(format!("No {} found", self.noun())),
            LoadState::Failed => Some(format!("Error loading {}", self.noun())),
            LoadState::Ready => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Empty,
    Failed,
    Ready,
}

const PREVIEW_CHARS: usize = 100;

/// First hundred characters of `content`, with `...` when cut.
pub fn preview(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local));
    }
    // The backend stores naive UTC timestamps.
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().with_timezone(&Local))
}

/// Local date and time, or the raw text when it cannot be parsed.
pub fn local_timestamp(raw: Option<&str>) -> String {
    match raw {
        None => "unknown time".to_string(),
        Some(raw) => parse_timestamp(raw)
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

pub fn local_date(raw: Option<&str>) -> String {
    match raw {
        None => "unknown date".to_string(),
        Some(raw) => parse_timestamp(raw)
            .map(|time| time.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

pub fn render_conversations(conversations: &[ConversationSummary]) -> Vec<String> {
    conversations
        .iter()
        .map(|conversation| {
            format!(
                "[{}] {}  {}  Messages: {}",
                conversation.id,
                conversation.username.as_deref().unwrap_or("Anonymous"),
                local_timestamp(conversation.created_at.as_deref()),
                conversation.message_count
            )
        })
        .collect()
}

pub fn render_messages(messages: &[ConversationMessage]) -> Vec<String> {
    let mut lines = Vec::with_capacity(messages.len() * 2);
    for message in messages {
        lines.push(format!(
            "{} [{}] {}",
            message.sender,
            message.emotional_tone.as_deref().unwrap_or("neutral"),
            local_timestamp(message.timestamp.as_deref())
        ));
        lines.extend(message.content.lines().map(|line| format!("    {line}")));
    }
    lines
}

pub fn render_settings(settings: &Settings) -> Vec<String> {
    vec![
        format!("Greeting: {}", settings.greeting_text),
        format!("Personality: {}", settings.personality_guidelines),
        format!("Response style: {}", settings.response_style),
    ]
}

pub fn render_guidelines(guidelines: &LanguageGuidelines) -> Vec<String> {
    vec![
        format!("Hinglish mode: {}", guidelines.hinglish_mode),
        format!("Hinglish ratio: {}%", guidelines.hinglish_ratio),
        format!("Hinglish phrases: {}", guidelines.hinglish_phrases),
        format!(
            "Languages: English {}, Hindi {}, Hinglish {}",
            format_bool(guidelines.support_english),
            format_bool(guidelines.support_hindi),
            format_bool(guidelines.support_hinglish)
        ),
        format!("Language detection: {}", guidelines.language_detection),
    ]
}

pub fn render_custom_guidelines(guidelines: &[CustomGuideline]) -> Vec<String> {
    guidelines
        .iter()
        .map(|guideline| match guideline.description.as_deref() {
            Some(description) if !description.is_empty() => {
                format!("{} = {}  ({description})", guideline.key, guideline.value)
            }
            _ => format!("{} = {}", guideline.key, guideline.value),
        })
        .collect()
}

fn id_label<T: ToString>(id: Option<&T>) -> String {
    id.map(ToString::to_string).unwrap_or_else(|| "?".to_string())
}

pub fn render_reflections(reflections: &[Reflection]) -> Vec<String> {
    let mut lines = Vec::new();
    for reflection in reflections {
        let updated = reflection
            .updated_at
            .as_deref()
            .or(reflection.created_at.as_deref());
        lines.push(format!(
            "[{}] {}  ({} • {} • {})",
            id_label(reflection.id.as_ref()),
            reflection.title,
            reflection.kind,
            local_date(updated),
            if reflection.published { "Published" } else { "Draft" }
        ));
        lines.push(format!("    {}", preview(&reflection.content)));
    }
    lines
}

pub fn render_memories(memories: &[Memory]) -> Vec<String> {
    let mut lines = Vec::new();
    for memory in memories {
        lines.push(format!(
            "[{}] {}  ({} • importance {})",
            id_label(memory.id.as_ref()),
            memory.title,
            memory.category,
            memory.importance
        ));
        lines.push(format!("    {}", preview(&memory.content)));
    }
    lines
}

pub fn render_theamal(entries: &[TraitEntry]) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(format!(
            "[{}] {}  ({} • importance {} • {})",
            id_label(entry.id.as_ref()),
            entry.title,
            entry.personality_trait,
            entry.importance,
            if entry.active { "Active" } else { "Inactive" }
        ));
        lines.push(format!("    {}", preview(&entry.content)));
    }
    lines
}
