//! The outbound prompt envelope and its merge rules.
//!
//! Handlers contribute fragments in whatever order suits them; the prompt
//! enforces the wire format's cardinality rules while assembling them:
//! two speech bubbles at most, eight suggestion chips at most, a single
//! content/link/canvas/order-update slot each.

use crate::content::{
    Card, Collection, CollectionBrowse, Content, Image, List, Media, OrderUpdate, PromptContent,
    Table,
};
use crate::error::Error;
use crate::fragment::{Canvas, Link, Simple, Suggestion};
use serde::{Deserialize, Serialize};

/// Maximum number of suggestion chips in a single prompt.
const MAX_SUGGESTIONS: usize = 8;

/// Anything a handler can pass to [`Prompt::add`].
///
/// A closed union over the fragment kinds; `add` matches it exhaustively,
/// so an unhandled kind is a compile error rather than a silent no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptItem {
    Text(String),
    Simple(Simple),
    Content(Content),
    Card(Card),
    Collection(Collection),
    CollectionBrowse(CollectionBrowse),
    Canvas(Canvas),
    Image(Image),
    List(List),
    Media(Media),
    Table(Table),
    Link(Link),
    Suggestion(Suggestion),
    OrderUpdate(OrderUpdate),
}

macro_rules! prompt_item_from {
    ($($variant:ident($payload:ty)),* $(,)?) => {
        $(impl From<$payload> for PromptItem {
            fn from(value: $payload) -> Self {
                PromptItem::$variant(value)
            }
        })*
    };
}

prompt_item_from! {
    Simple(Simple),
    Content(Content),
    Card(Card),
    Collection(Collection),
    CollectionBrowse(CollectionBrowse),
    Canvas(Canvas),
    Image(Image),
    List(List),
    Media(Media),
    Table(Table),
    Link(Link),
    Suggestion(Suggestion),
    OrderUpdate(OrderUpdate),
}

impl From<&str> for PromptItem {
    fn from(text: &str) -> Self {
        PromptItem::Text(text.to_string())
    }
}

impl From<String> for PromptItem {
    fn from(text: String) -> Self {
        PromptItem::Text(text)
    }
}

/// The single outbound message envelope assembled during a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Prompt {
    /// When true this prompt replaces previously queued messages instead
    /// of appending to them.
    pub r#override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_simple: Option<Simple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_simple: Option<Simple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_update: Option<OrderUpdate>,
}

impl Prompt {
    /// Appends speech to the opening simple response, creating it when
    /// absent. Only plain text is accepted; `last_simple` is never touched.
    pub fn append(&mut self, item: impl Into<PromptItem>) -> Result<&mut Self, Error> {
        match item.into() {
            PromptItem::Text(speech) => match &mut self.first_simple {
                Some(first) => first.speech.push_str(&speech),
                None => self.first_simple = Some(Simple::from(speech)),
            },
            _ => return Err(Error::UnsupportedAppendType),
        }
        Ok(self)
    }

    /// Adds one fragment, dispatching on its kind.
    pub fn add(&mut self, item: impl Into<PromptItem>) -> Result<&mut Self, Error> {
        match item.into() {
            PromptItem::Text(text) => self.add_simple(Simple::from(text))?,
            PromptItem::Simple(simple) => self.add_simple(simple)?,
            PromptItem::Content(content) => self.content = Some(content),
            PromptItem::Card(card) => self.set_content(PromptContent::Card(card)),
            PromptItem::Collection(collection) => {
                self.set_content(PromptContent::Collection(collection))
            }
            PromptItem::CollectionBrowse(browse) => {
                self.set_content(PromptContent::CollectionBrowse(browse))
            }
            PromptItem::Image(image) => self.set_content(PromptContent::Image(image)),
            PromptItem::List(list) => self.set_content(PromptContent::List(list)),
            PromptItem::Media(media) => self.set_content(PromptContent::Media(media)),
            PromptItem::Table(table) => self.set_content(PromptContent::Table(table)),
            PromptItem::Canvas(canvas) => self.canvas = Some(canvas),
            PromptItem::Link(link) => self.link = Some(link),
            PromptItem::OrderUpdate(update) => self.order_update = Some(update),
            PromptItem::Suggestion(suggestion) => self.add_suggestion(suggestion)?,
        }
        Ok(self)
    }

    /// Adds a sequence of fragments, strictly in order. Stops at the first
    /// rule violation.
    pub fn add_all(
        &mut self,
        items: impl IntoIterator<Item = PromptItem>,
    ) -> Result<&mut Self, Error> {
        for item in items {
            self.add(item)?;
        }
        Ok(self)
    }

    /// The two-slot speech assignment: the first simple added in order
    /// becomes the opening line, the second the closing line, and a third
    /// is an error.
    fn add_simple(&mut self, simple: Simple) -> Result<(), Error> {
        match (&self.first_simple, &self.last_simple) {
            (Some(_), Some(_)) => return Err(Error::TooManySimples),
            (Some(_), None) => self.last_simple = Some(simple),
            // A lone last_simple cannot arise through this API; fill the
            // first slot either way.
            (None, _) => self.first_simple = Some(simple),
        }
        Ok(())
    }

    fn add_suggestion(&mut self, suggestion: Suggestion) -> Result<(), Error> {
        if self.suggestions.len() >= MAX_SUGGESTIONS {
            return Err(Error::TooManySuggestions);
        }
        self.suggestions.push(suggestion);
        Ok(())
    }

    fn set_content(&mut self, item: PromptContent) {
        self.content.get_or_insert_with(Content::default).set(item);
    }
}
