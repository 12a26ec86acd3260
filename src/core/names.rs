//! Best-effort display-name inference from free-form chat input.
//!
//! The rules run in a fixed order and the first one that yields a candidate
//! wins. This is a heuristic, not a parser: a one-word reply such as "Yes"
//! is taken as a name, and that is expected.

use regex::Regex;
use std::sync::LazyLock;

/// A single named matcher in the inference chain.
pub struct NameRule {
    pub name: &'static str,
    matcher: fn(&str) -> Option<String>,
}

impl NameRule {
    pub fn apply(&self, text: &str) -> Option<String> {
        (self.matcher)(text)
    }
}

/// The candidate produced by the first matching rule, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatch {
    pub rule: &'static str,
    pub name: String,
}

pub const COMMON_FIRST_NAMES: &[&str] = &[
    "amit", "anil", "arjun", "deepak", "farhan", "karan", "mohammad", "priya", "raj", "rahul",
    "rohit", "sanjay", "sumit", "vikram", "vivek", "aarav", "aditi", "ananya", "aryan", "divya",
    "ishaan", "kavya", "meera", "neha", "nikhil", "riya", "rohan", "sahil", "tanvi", "yash",
    "akhil", "anjali", "bhavya", "dhruv", "gauri", "jatin", "kamal", "lakshmi", "manish",
    "nandini", "pallavi", "rajiv", "sunil",
];

static INTRODUCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:i am|i'm|my name is|call me|this is) (\w+)")
        .unwrap_or_else(|err| panic!("introduction pattern must compile: {err}"))
});

static KNOWN_FIRST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)^({})\b", COMMON_FIRST_NAMES.join("|"));
    Regex::new(&pattern).unwrap_or_else(|err| panic!("first-name pattern must compile: {err}"))
});

static CAPITALIZED_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]{2,14}$")
        .unwrap_or_else(|err| panic!("capitalized-word pattern must compile: {err}"))
});

pub const NAME_RULES: &[NameRule] = &[
    NameRule {
        name: "single_token",
        matcher: single_token,
    },
    NameRule {
        name: "introduction",
        matcher: introduction,
    },
    NameRule {
        name: "known_first_name",
        matcher: known_first_name,
    },
    NameRule {
        name: "capitalized_word",
        matcher: capitalized_word,
    },
];

fn single_token(text: &str) -> Option<String> {
    let mut tokens = text.split_whitespace();
    let token = tokens.next()?;
    if tokens.next().is_none() && token.chars().count() > 1 {
        Some(token.to_string())
    } else {
        None
    }
}

fn introduction(text: &str) -> Option<String> {
    INTRODUCTION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn known_first_name(text: &str) -> Option<String> {
    KNOWN_FIRST_NAME
        .captures(text.trim_start())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn capitalized_word(text: &str) -> Option<String> {
    let trimmed = text.trim();
    CAPITALIZED_WORD
        .is_match(trimmed)
        .then(|| trimmed.to_string())
}

/// Uppercase the first character and lowercase the rest.
pub fn normalize_name(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Run the rule chain against `text` and return the first candidate.
pub fn extract_name(text: &str) -> Option<NameMatch> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    NAME_RULES.iter().find_map(|rule| {
        rule.apply(text)
            .map(|raw| normalize_name(&raw))
            .filter(|name| !name.is_empty())
            .map(|name| NameMatch {
                rule: rule.name,
                name,
            })
    })
}
