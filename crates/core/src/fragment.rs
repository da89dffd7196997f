//! Non-visual prompt fragments: speech bubbles, suggestion chips, app
//! links, and interactive canvas directives.
//!
//! Every fragment deserializes from a partial wire object into a fully
//! defaulted value, so downstream equality checks never distinguish
//! "absent" from "explicitly empty".

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A speech + display-text chat bubble.
///
/// A prompt carries at most two of these: an opening line before any
/// visual content and an optional closing line after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Simple {
    /// Text-to-speech or SSML payload spoken to the user.
    pub speech: String,
    /// Text shown in the chat bubble; falls back to `speech` on-device
    /// when empty.
    pub text: String,
}

impl Simple {
    pub fn new(speech: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            text: text.into(),
        }
    }
}

/// The bare-string shorthand: the string becomes the speech field.
impl From<&str> for Simple {
    fn from(speech: &str) -> Self {
        Self {
            speech: speech.to_string(),
            text: String::new(),
        }
    }
}

impl From<String> for Simple {
    fn from(speech: String) -> Self {
        Self {
            speech,
            text: String::new(),
        }
    }
}

/// A suggestion chip. Tapping one returns its title to the conversation
/// verbatim, as if the user had typed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestion {
    pub title: String,
}

impl Suggestion {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Rendering hint for an open-URL action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrlHint {
    Amp,
    #[default]
    #[serde(other)]
    LinkUnspecified,
}

/// A URL to open, with an optional rendering hint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<UrlHint>,
}

/// An "open this app/site" suggestion. A prompt carries at most one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<OpenUrl>,
}

/// Starts or continues an interactive canvas session on the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Canvas {
    /// JSON events passed through to the canvas web app. With `override`
    /// false on the containing prompt, entries accumulate across turns.
    pub data: Vec<Value>,
    pub suppress_mic: bool,
    /// URL of the web view to load.
    pub url: String,
    pub enable_full_screen: bool,
    pub continue_tts_during_touch: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_from_bare_string_sets_speech_only() {
        let simple = Simple::from("hi");
        assert_eq!(simple.speech, "hi");
        assert_eq!(simple.text, "");
    }

    #[test]
    fn test_simple_serializes_both_fields() {
        let simple = Simple::from("hi");
        assert_eq!(
            serde_json::to_value(&simple).unwrap(),
            json!({"speech": "hi", "text": ""})
        );
    }

    #[test]
    fn test_simple_default_fill_is_idempotent() {
        let simple = Simple::new("a", "b");
        let serialized = serde_json::to_value(&simple).unwrap();
        let reparsed: Simple = serde_json::from_value(serialized).unwrap();
        assert_eq!(reparsed, simple);
    }

    #[test]
    fn test_simple_deserializes_partial_object() {
        let simple: Simple = serde_json::from_value(json!({"speech": "s"})).unwrap();
        assert_eq!(simple, Simple::from("s"));
    }

    #[test]
    fn test_suggestion_defaults_title() {
        let suggestion: Suggestion = serde_json::from_value(json!({})).unwrap();
        assert_eq!(suggestion.title, "");
    }

    #[test]
    fn test_link_serializes_only_provided_fields() {
        let link = Link {
            name: Some("Learn more".to_string()),
            open: Some(OpenUrl {
                url: "https://example.com".to_string(),
                hint: None,
            }),
        };
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"name": "Learn more", "open": {"url": "https://example.com"}})
        );
        assert_eq!(serde_json::to_value(Link::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_canvas_defaults_every_field() {
        let canvas: Canvas = serde_json::from_value(json!({"url": "https://app"})).unwrap();
        assert_eq!(canvas.url, "https://app");
        assert!(canvas.data.is_empty());
        assert!(!canvas.suppress_mic);
        assert!(!canvas.enable_full_screen);
        assert!(!canvas.continue_tts_during_touch);
    }

    #[test]
    fn test_url_hint_tolerates_unknown_wire_values() {
        let hint: UrlHint = serde_json::from_value(json!("SOMETHING_NEW")).unwrap();
        assert_eq!(hint, UrlHint::LinkUnspecified);
    }
}
