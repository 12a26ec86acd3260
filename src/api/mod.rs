//! Wire payloads exchanged with the Rex backend.
//!
//! Field names follow the backend's snake_case JSON. Every record is
//! display-only on the client side, so deserialization is lenient: missing
//! or `null` fields fall back to defaults rather than failing the whole list.

pub mod client;
pub mod error;

pub use client::RexClient;
pub use error::ApiError;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque identifier assigned by the backend.
///
/// The backend hands out both integer and string ids depending on the
/// resource, so the raw JSON value is kept and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Value);

/// Conversation identifiers share the opaque record id representation.
pub type ConversationId = RecordId;

impl RecordId {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// Interpret user-typed text as an id: digits become a number, anything
    /// else stays a string.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(number) => Self(Value::from(number)),
            Err(_) => Self(Value::from(trimmed)),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{s}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Read an optional value, substituting `fallback` for `null`.
fn null_or<'de, D, T>(deserializer: D, fallback: fn() -> T) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_else(fallback))
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    null_or(deserializer, T::default)
}

fn nullable_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    null_or(deserializer, default_true)
}

fn nullable_importance<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    null_or(deserializer, default_importance)
}

fn nullable_hinglish_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_or(deserializer, default_hinglish_mode)
}

fn nullable_hinglish_ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    null_or(deserializer, default_hinglish_ratio)
}

fn nullable_language_detection<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    null_or(deserializer, default_language_detection)
}

fn nullable_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    null_or(deserializer, Reflection::default_kind)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub username: String,
    pub conversation_id: Option<ConversationId>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    #[serde(default, deserialize_with = "nullable")]
    pub admin_request: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response shape shared by every mutating endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub success: bool,
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSummary {
    pub id: RecordId,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub message_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationMessage {
    #[serde(default, deserialize_with = "nullable")]
    pub sender: String,
    #[serde(default)]
    pub emotional_tone: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, deserialize_with = "nullable")]
    pub greeting_text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub personality_guidelines: String,
    #[serde(default, deserialize_with = "nullable")]
    pub response_style: String,
}

impl Settings {
    pub const DEFAULT_GREETING: &'static str =
        "Welcome to Rex - Mohsin Raja's digital emotional self";
    pub const DEFAULT_PERSONALITY: &'static str =
        "Warm, introspective, emotionally resonant, switches naturally between English and Hinglish";
    pub const DEFAULT_RESPONSE_STYLE: &'static str = "human";

    /// Fill blank fields with the values the console shows for a fresh backend.
    pub fn with_defaults(mut self) -> Self {
        if self.greeting_text.is_empty() {
            self.greeting_text = Self::DEFAULT_GREETING.to_string();
        }
        if self.personality_guidelines.is_empty() {
            self.personality_guidelines = Self::DEFAULT_PERSONALITY.to_string();
        }
        if self.response_style.is_empty() {
            self.response_style = Self::DEFAULT_RESPONSE_STYLE.to_string();
        }
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_hinglish_mode() -> String {
    "auto".to_string()
}

fn default_hinglish_ratio() -> u8 {
    50
}

fn default_language_detection() -> String {
    "match-user".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageGuidelines {
    #[serde(default = "default_hinglish_mode", deserialize_with = "nullable_hinglish_mode")]
    pub hinglish_mode: String,
    #[serde(default, deserialize_with = "nullable")]
    pub hinglish_phrases: String,
    #[serde(default = "default_hinglish_ratio", deserialize_with = "nullable_hinglish_ratio")]
    pub hinglish_ratio: u8,
    #[serde(default = "default_true", deserialize_with = "nullable_true")]
    pub support_english: bool,
    #[serde(default = "default_true", deserialize_with = "nullable_true")]
    pub support_hindi: bool,
    #[serde(default = "default_true", deserialize_with = "nullable_true")]
    pub support_hinglish: bool,
    #[serde(default = "default_language_detection", deserialize_with = "nullable_language_detection")]
    pub language_detection: String,
}

impl Default for LanguageGuidelines {
    fn default() -> Self {
        Self {
            hinglish_mode: default_hinglish_mode(),
            hinglish_phrases: String::new(),
            hinglish_ratio: default_hinglish_ratio(),
            support_english: true,
            support_hindi: true,
            support_hinglish: true,
            language_detection: default_language_detection(),
        }
    }
}

/// Free-form key/value guideline. The key doubles as its identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomGuideline {
    pub key: String,
    #[serde(default, deserialize_with = "nullable")]
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(
        rename = "type",
        default = "Reflection::default_kind",
        deserialize_with = "nullable_kind"
    )]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub published: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing)]
    pub updated_at: Option<String>,
}

impl Reflection {
    pub const KINDS: &'static [&'static str] = &["microblog", "story"];

    fn default_kind() -> String {
        Self::KINDS[0].to_string()
    }
}

impl Default for Reflection {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            kind: Self::default_kind(),
            published: false,
            created_at: None,
            updated_at: None,
        }
    }
}

fn default_importance() -> u8 {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(default = "default_importance", deserialize_with = "nullable_importance")]
    pub importance: u8,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            category: String::new(),
            importance: default_importance(),
            created_at: None,
        }
    }
}

/// Personality-trait entry ("theamal") shaping generated replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub personality_trait: String,
    #[serde(default = "default_importance", deserialize_with = "nullable_importance")]
    pub importance: u8,
    #[serde(default = "default_true", deserialize_with = "nullable_true")]
    pub active: bool,
    #[serde(default, skip_serializing)]
    pub created_at: Option<String>,
}

impl Default for TraitEntry {
    fn default() -> Self {
        Self {
            id: None,
            title: String::new(),
            content: String::new(),
            personality_trait: String::new(),
            importance: default_importance(),
            active: true,
            created_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_keeps_wire_type() {
        let numeric: RecordId = serde_json::from_value(json!(42)).unwrap();
        let text: RecordId = serde_json::from_value(json!("abc-1")).unwrap();
        assert_eq!(numeric.to_string(), "42");
        assert_eq!(text.to_string(), "abc-1");
        assert_eq!(serde_json::to_value(&numeric).unwrap(), json!(42));
        assert_eq!(serde_json::to_value(&text).unwrap(), json!("abc-1"));
    }

    #[test]
    fn record_id_parse_prefers_numbers() {
        assert_eq!(RecordId::parse(" 7 "), RecordId::new(7));
        assert_eq!(RecordId::parse("conv-7"), RecordId::new("conv-7"));
    }

    #[test]
    fn chat_request_sends_null_conversation_id() {
        let request = ChatRequest {
            message: "hi".to_string(),
            username: "Anonymous".to_string(),
            conversation_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"message": "hi", "username": "Anonymous", "conversation_id": null})
        );
    }

    #[test]
    fn chat_reply_tolerates_missing_fields() {
        let reply: ChatReply = serde_json::from_value(json!({
            "message": "Admin panel access requested. Please provide credentials.",
            "admin_request": true
        }))
        .unwrap();
        assert!(reply.admin_request);
        assert!(reply.conversation_id.is_none());

        let reply: ChatReply =
            serde_json::from_value(json!({"message": "hey", "conversation_id": "c1"})).unwrap();
        assert!(!reply.admin_request);
        assert_eq!(reply.conversation_id, Some(RecordId::new("c1")));
    }

    #[test]
    fn reflection_uses_type_on_the_wire_and_skips_timestamps() {
        let reflection: Reflection = serde_json::from_value(json!({
            "id": 3,
            "title": "Rain",
            "content": "Monsoon again",
            "type": "story",
            "published": true,
            "updated_at": "2024-06-01T10:00:00"
        }))
        .unwrap();
        assert_eq!(reflection.kind, "story");

        let body = serde_json::to_value(&reflection).unwrap();
        assert_eq!(body["type"], "story");
        assert!(body.get("updated_at").is_none());
        assert_eq!(body["id"], 3);
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let trait_entry: TraitEntry = serde_json::from_value(json!({
            "id": 5,
            "title": null,
            "content": "Listens first",
            "personality_trait": null,
            "importance": null,
            "active": null
        }))
        .unwrap();
        assert_eq!(trait_entry.title, "");
        assert_eq!(trait_entry.importance, 5);
        assert!(trait_entry.active);

        let guidelines: LanguageGuidelines = serde_json::from_value(json!({
            "hinglish_mode": null,
            "hinglish_ratio": null,
            "language_detection": null,
            "support_hindi": false
        }))
        .unwrap();
        assert_eq!(guidelines.hinglish_mode, "auto");
        assert_eq!(guidelines.hinglish_ratio, 50);
        assert_eq!(guidelines.language_detection, "match-user");
        assert!(!guidelines.support_hindi);

        let reflection: Reflection =
            serde_json::from_value(json!({"id": 2, "type": null, "content": null})).unwrap();
        assert_eq!(reflection.kind, "microblog");
        assert_eq!(reflection.content, "");

        let guideline: CustomGuideline =
            serde_json::from_value(json!({"key": "tone", "value": null})).unwrap();
        assert_eq!(guideline.value, "");
    }

    #[test]
    fn guidelines_default_to_enabled_languages() {
        let guidelines: LanguageGuidelines = serde_json::from_value(json!({})).unwrap();
        assert_eq!(guidelines, LanguageGuidelines::default());
        assert!(guidelines.support_hindi);
        assert_eq!(guidelines.hinglish_ratio, 50);
    }

    #[test]
    fn settings_fill_blank_fields() {
        let settings = Settings {
            response_style: "poetic".to_string(),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(settings.greeting_text, Settings::DEFAULT_GREETING);
        assert_eq!(settings.response_style, "poetic");
    }
}
