//! UI-agnostic session state types
//!
//! Everything here lives only for the lifetime of the process. Nothing is
//! written to disk.

use serde::{Deserialize, Serialize};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Home,
    Chat,
    Draft,
    Analyze,
}

impl Mode {
    pub fn all() -> [Mode; 4] {
        [Mode::Home, Mode::Chat, Mode::Draft, Mode::Analyze]
    }

    pub fn next(self) -> Self {
        match self {
            Mode::Home => Mode::Chat,
            Mode::Chat => Mode::Draft,
            Mode::Draft => Mode::Analyze,
            Mode::Analyze => Mode::Home,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Mode::Home => Mode::Analyze,
            Mode::Chat => Mode::Home,
            Mode::Draft => Mode::Chat,
            Mode::Analyze => Mode::Draft,
        }
    }
}

/// A grounding citation returned alongside a generated answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: Option<String>,
    pub uri: String,
}

impl Source {
    /// Title to show, falling back to the given placeholder when the provider sent none
    pub fn display_title<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => placeholder,
        }
    }
}

/// A chat message in the consultation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }
}

/// The role of a chat message sender, named the way the provider names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_cycle_round_trips() {
        for mode in Mode::all() {
            assert_eq!(mode.next().prev(), mode);
        }
    }

    #[test]
    fn test_source_title_placeholder() {
        let untitled = Source { title: None, uri: "https://law.moj.gov.tw".into() };
        let blank = Source { title: Some("  ".into()), uri: "https://a".into() };
        let titled = Source { title: Some("Civil Code".into()), uri: "https://b".into() };
        assert_eq!(untitled.display_title("Source"), "Source");
        assert_eq!(blank.display_title("Source"), "Source");
        assert_eq!(titled.display_title("Source"), "Civil Code");
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::model("hi")).unwrap();
        assert_eq!(json, r#"{"role":"model","text":"hi"}"#);
    }
}
