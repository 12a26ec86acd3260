use serde::{Deserialize, Serialize};

/// Who a transcript line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Rex,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::User,
            content: content.into(),
        }
    }

    pub fn rex(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Rex,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::System,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: TranscriptRole::Error,
            content: content.into(),
        }
    }

    /// Plain-text rendering used for transcript logs.
    pub fn log_line(&self) -> String {
        match self.role {
            TranscriptRole::User => format!("> {}", self.content),
            TranscriptRole::Rex => format!("Rex: {}", self.content),
            TranscriptRole::System => format!("## {}", self.content),
            TranscriptRole::Error => format!("## error: {}", self.content),
        }
    }
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Rex => "rex",
            TranscriptRole::System => "system",
            TranscriptRole::Error => "error",
        }
    }

    pub fn is_app(self) -> bool {
        matches!(self, TranscriptRole::System | TranscriptRole::Error)
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, String> {
        match value {
            "user" => Ok(TranscriptRole::User),
            "rex" => Ok(TranscriptRole::Rex),
            "system" => Ok(TranscriptRole::System),
            "error" => Ok(TranscriptRole::Error),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, String> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        for role in [
            TranscriptRole::User,
            TranscriptRole::Rex,
            TranscriptRole::System,
            TranscriptRole::Error,
        ] {
            assert_eq!(TranscriptRole::try_from(role.as_str()), Ok(role));
        }
        assert!(TranscriptRole::try_from("assistant").is_err());
    }

    #[test]
    fn log_lines_mark_app_messages() {
        assert_eq!(Message::user("hi").log_line(), "> hi");
        assert_eq!(Message::rex("hello").log_line(), "Rex: hello");
        assert_eq!(
            Message::error("Error connecting to Rex. Please try again.").log_line(),
            "## error: Error connecting to Rex. Please try again."
        );
        assert!(TranscriptRole::Error.is_app());
        assert!(!TranscriptRole::Rex.is_app());
    }
}
