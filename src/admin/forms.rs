//! Prefilled edit forms. Every form returns `Ok(None)` when the user
//! cancels any field.

use std::io;
use std::ops::RangeInclusive;

use crate::admin::prompt::{format_bool, parse_bool, ConsoleIo};
use crate::api::{CustomGuideline, LanguageGuidelines, Memory, Reflection, Settings, TraitEntry};

pub const RATIO_RANGE: RangeInclusive<u8> = 0..=100;
pub const IMPORTANCE_RANGE: RangeInclusive<u8> = 1..=10;

const HINGLISH_MODES: &[&str] = &["auto", "always", "never"];
const DETECTION_MODES: &[&str] = &["match-user", "english", "hindi", "hinglish"];

fn text_field(io: &mut dyn ConsoleIo, label: &str, current: &str) -> io::Result<Option<String>> {
    io.read_line(&format!("{label}: "), current)
}

fn required_field(
    io: &mut dyn ConsoleIo,
    label: &str,
    current: &str,
) -> io::Result<Option<String>> {
    loop {
        let Some(value) = text_field(io, label, current)? else {
            return Ok(None);
        };
        let value = value.trim().to_string();
        if !value.is_empty() {
            return Ok(Some(value));
        }
        io.say(&format!("{label} is required."));
    }
}

fn number_field(
    io: &mut dyn ConsoleIo,
    label: &str,
    current: u8,
    range: RangeInclusive<u8>,
) -> io::Result<Option<u8>> {
    loop {
        let Some(value) = text_field(io, label, &current.to_string())? else {
            return Ok(None);
        };
        match value.trim().parse::<u8>() {
            Ok(number) if range.contains(&number) => return Ok(Some(number)),
            _ => io.say(&format!(
                "{label} must be a number between {} and {}.",
                range.start(),
                range.end()
            )),
        }
    }
}

fn bool_field(io: &mut dyn ConsoleIo, label: &str, current: bool) -> io::Result<Option<bool>> {
    loop {
        let Some(value) = text_field(io, &format!("{label} (yes/no)"), format_bool(current))? else {
            return Ok(None);
        };
        match parse_bool(&value) {
            Some(flag) => return Ok(Some(flag)),
            None => io.say(&format!("{label}: answer yes or no.")),
        }
    }
}

fn choice_field(
    io: &mut dyn ConsoleIo,
    label: &str,
    current: &str,
    choices: &[&str],
) -> io::Result<Option<String>> {
    let prompt = format!("{label} ({})", choices.join("/"));
    loop {
        let Some(value) = text_field(io, &prompt, current)? else {
            return Ok(None);
        };
        let value = value.trim().to_lowercase();
        if choices.contains(&value.as_str()) {
            return Ok(Some(value));
        }
        io.say(&format!("{label} must be one of: {}.", choices.join(", ")));
    }
}

pub fn edit_settings(io: &mut dyn ConsoleIo, current: &Settings) -> io::Result<Option<Settings>> {
    let Some(greeting_text) = text_field(io, "Greeting", &current.greeting_text)? else {
        return Ok(None);
    };
    let Some(personality_guidelines) =
        text_field(io, "Personality", &current.personality_guidelines)?
    else {
        return Ok(None);
    };
    let Some(response_style) = text_field(io, "Response style", &current.response_style)? else {
        return Ok(None);
    };
    Ok(Some(Settings {
        greeting_text,
        personality_guidelines,
        response_style,
    }))
}

pub fn edit_guidelines(
    io: &mut dyn ConsoleIo,
    current: &LanguageGuidelines,
) -> io::Result<Option<LanguageGuidelines>> {
    let Some(hinglish_mode) = choice_field(io, "Hinglish mode", &current.hinglish_mode, HINGLISH_MODES)?
    else {
        return Ok(None);
    };
    let Some(hinglish_ratio) =
        number_field(io, "Hinglish ratio", current.hinglish_ratio, RATIO_RANGE)?
    else {
        return Ok(None);
    };
    let Some(hinglish_phrases) = text_field(io, "Hinglish phrases", &current.hinglish_phrases)?
    else {
        return Ok(None);
    };
    let Some(support_english) = bool_field(io, "Support English", current.support_english)? else {
        return Ok(None);
    };
    let Some(support_hindi) = bool_field(io, "Support Hindi", current.support_hindi)? else {
        return Ok(None);
    };
    let Some(support_hinglish) = bool_field(io, "Support Hinglish", current.support_hinglish)?
    else {
        return Ok(None);
    };
    let Some(language_detection) = choice_field(
        io,
        "Language detection",
        &current.language_detection,
        DETECTION_MODES,
    )?
    else {
        return Ok(None);
    };
    Ok(Some(LanguageGuidelines {
        hinglish_mode,
        hinglish_phrases,
        hinglish_ratio,
        support_english,
        support_hindi,
        support_hinglish,
        language_detection,
    }))
}

/// `existing` is `None` for a new guideline. An existing key cannot change.
pub fn edit_custom_guideline(
    io: &mut dyn ConsoleIo,
    existing: Option<&CustomGuideline>,
) -> io::Result<Option<CustomGuideline>> {
    let key = match existing {
        Some(guideline) => {
            io.say(&format!("Key: {}", guideline.key));
            guideline.key.clone()
        }
        None => {
            let Some(key) = required_field(io, "Key", "")? else {
                return Ok(None);
            };
            key
        }
    };
    let current_value = existing.map(|g| g.value.as_str()).unwrap_or_default();
    let Some(value) = text_field(io, "Value", current_value)? else {
        return Ok(None);
    };
    let current_description = existing
        .and_then(|g| g.description.as_deref())
        .unwrap_or_default();
    let Some(description) = text_field(io, "Description", current_description)? else {
        return Ok(None);
    };
    Ok(Some(CustomGuideline {
        key,
        value,
        description: Some(description),
    }))
}

pub fn edit_reflection(
    io: &mut dyn ConsoleIo,
    current: &Reflection,
) -> io::Result<Option<Reflection>> {
    let Some(title) = required_field(io, "Title", &current.title)? else {
        return Ok(None);
    };
    let Some(content) = text_field(io, "Content", &current.content)? else {
        return Ok(None);
    };
    let Some(kind) = choice_field(io, "Type", &current.kind, Reflection::KINDS)? else {
        return Ok(None);
    };
    let Some(published) = bool_field(io, "Published", current.published)? else {
        return Ok(None);
    };
    Ok(Some(Reflection {
        title,
        content,
        kind,
        published,
        ..current.clone()
    }))
}

pub fn edit_memory(io: &mut dyn ConsoleIo, current: &Memory) -> io::Result<Option<Memory>> {
    let Some(title) = required_field(io, "Title", &current.title)? else {
        return Ok(None);
    };
    let Some(content) = text_field(io, "Content", &current.content)? else {
        return Ok(None);
    };
    let Some(category) = text_field(io, "Category", &current.category)? else {
        return Ok(None);
    };
    let Some(importance) = number_field(io, "Importance", current.importance, IMPORTANCE_RANGE)?
    else {
        return Ok(None);
    };
    Ok(Some(Memory {
        title,
        content,
        category,
        importance,
        ..current.clone()
    }))
}

pub fn edit_trait_entry(
    io: &mut dyn ConsoleIo,
    current: &TraitEntry,
) -> io::Result<Option<TraitEntry>> {
    let Some(title) = required_field(io, "Title", &current.title)? else {
        return Ok(None);
    };
    let Some(content) = text_field(io, "Content", &current.content)? else {
        return Ok(None);
    };
    let Some(personality_trait) =
        text_field(io, "Personality trait", &current.personality_trait)?
    else {
        return Ok(None);
    };
    let Some(importance) = number_field(io, "Importance", current.importance, IMPORTANCE_RANGE)?
    else {
        return Ok(None);
    };
    let Some(active) = bool_field(io, "Active", current.active)? else {
        return Ok(None);
    };
    Ok(Some(TraitEntry {
        title,
        content,
        personality_trait,
        importance,
        active,
        ..current.clone()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::prompt::ScriptedIo;

    #[test]
    fn guidelines_reject_out_of_range_ratio() {
        let mut io = ScriptedIo::new(["=", "150", "abc", "70", "=", "=", "no", "=", "="]);
        let edited = edit_guidelines(&mut io, &LanguageGuidelines::default())
            .unwrap()
            .unwrap();

        assert_eq!(edited.hinglish_ratio, 70);
        assert!(!edited.support_hindi);
        assert_eq!(edited.hinglish_mode, "auto");
        assert_eq!(
            io.output
                .iter()
                .filter(|line| line.contains("between 0 and 100"))
                .count(),
            2
        );
    }

    #[test]
    fn existing_guideline_key_is_not_prompted() {
        let existing = CustomGuideline {
            key: "tone".to_string(),
            value: "soft".to_string(),
            description: None,
        };
        let mut io = ScriptedIo::new(["warm", ""]);
        let edited = edit_custom_guideline(&mut io, Some(&existing))
            .unwrap()
            .unwrap();

        assert_eq!(edited.key, "tone");
        assert_eq!(edited.value, "warm");
        assert!(io.prompts.iter().all(|prompt| !prompt.starts_with("Key")));
    }

    #[test]
    fn new_guideline_requires_a_key() {
        let mut io = ScriptedIo::new(["  ", "greeting", "namaste", "opening line"]);
        let created = edit_custom_guideline(&mut io, None).unwrap().unwrap();
        assert_eq!(created.key, "greeting");
        assert_eq!(created.description.as_deref(), Some("opening line"));
        assert!(io.printed("Key is required."));
    }

    #[test]
    fn reflection_type_must_be_known() {
        let mut io = ScriptedIo::new(["Rain", "Monsoon again", "poem", "Story", "yes"]);
        let edited = edit_reflection(&mut io, &Reflection::default())
            .unwrap()
            .unwrap();
        assert_eq!(edited.kind, "story");
        assert!(edited.published);
        assert!(io.printed("Type must be one of: microblog, story."));
    }

    #[test]
    fn cancelling_abandons_the_form() {
        let mut io = ScriptedIo::new(["Title"]).then_cancel();
        assert!(edit_memory(&mut io, &Memory::default()).unwrap().is_none());
    }

    #[test]
    fn trait_entry_keeps_its_id() {
        let current = TraitEntry {
            id: Some(crate::api::RecordId::new(8)),
            ..TraitEntry::default()
        };
        let mut io = ScriptedIo::new(["Patience", "Waits", "calm", "11", "9", "no"]);
        let edited = edit_trait_entry(&mut io, &current).unwrap().unwrap();
        assert_eq!(edited.id, current.id);
        assert_eq!(edited.importance, 9);
        assert!(!edited.active);
    }
}
