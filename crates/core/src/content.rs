//! Visual content fragments and the per-turn content aggregator.
//!
//! The wire format has a single `content` slot per response; the
//! aggregator holds at most one instance of each sub-kind at a time.
//! Whether a given cross-kind combination is legal is left to the wire
//! consumer.

use crate::fragment::Link;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How an image background is filled when aspect ratios differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageFill {
    Gray,
    White,
    Cropped,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Source URL. JPG, PNG and GIF are supported.
    pub url: String,
    /// Accessibility description of the image.
    pub alt: String,
    pub height: i32,
    pub width: i32,
}

impl Image {
    pub fn new(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.into(),
            ..Self::default()
        }
    }
}

/// A basic card: title, body text, hero image, and an optional button.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Body text; supports a limited markdown subset. Required unless an
    /// image is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_fill: Option<ImageFill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionItem {
    /// Key matching an entry in the associated type.
    pub key: String,
}

/// A selectable collection of type entries, rendered as tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Collection {
    pub image_fill: ImageFill,
    /// min 2, max 10.
    pub items: Vec<CollectionItem>,
    pub subtitle: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionBrowseItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_uri_action: Option<crate::fragment::OpenUrl>,
}

/// A card presenting a set of web pages to open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CollectionBrowse {
    pub image_fill: ImageFill,
    /// min 2, max 10.
    pub items: Vec<CollectionBrowseItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListItem {
    /// Key matching an entry in the associated type.
    pub key: String,
}

/// A selectable list of type entries, rendered as rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    /// min 2, max 30.
    pub items: Vec<ListItem>,
    pub subtitle: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Audio,
    MediaStatusAck,
    #[default]
    #[serde(other)]
    MediaTypeUnspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionalMediaControl {
    Paused,
    Stopped,
    #[serde(other)]
    OptionalMediaControlsUnspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatMode {
    Off,
    All,
    #[default]
    #[serde(other)]
    RepeatModeUnspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large: Option<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<MediaImage>,
}

/// A set of media objects to be played.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Media {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_objects: Option<Vec<MediaObject>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_media_controls: Option<Vec<OptionalMediaControl>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_mode: Option<RepeatMode>,
    /// Offset into the first media object, e.g. `"12.5s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_media_object_index: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Align {
    Leading,
    Center,
    Trailing,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableColumn {
    pub header: String,
    pub align: Align,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    /// Draw a divider after this row.
    pub divider: bool,
}

/// A table card. The first three rows are guaranteed to be shown; later
/// rows may be cut on some surfaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<Link>,
    pub columns: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    pub rows: Vec<TableRow>,
    pub subtitle: String,
    /// Must be set when `subtitle` is set.
    pub title: String,
}

/// A status update for a commerce order.
///
/// The `order` subtree is the full commerce order schema; it is opaque
/// passthrough here, exactly as it arrives from the handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub update_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_notification: Option<Value>,
}

/// One of the seven visual content kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptContent {
    Card(Card),
    Collection(Collection),
    CollectionBrowse(CollectionBrowse),
    Image(Image),
    List(List),
    Media(Media),
    Table(Table),
}

/// The single content slot of a response.
///
/// Holds zero or one instance of each sub-kind simultaneously; setting a
/// kind replaces only the prior value of that kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<Collection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_browse: Option<CollectionBrowse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<List>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
}

impl Content {
    /// Replaces the slot for `item`'s kind, leaving the other kinds alone.
    pub fn set(&mut self, item: PromptContent) {
        match item {
            PromptContent::Card(card) => self.card = Some(card),
            PromptContent::Collection(collection) => self.collection = Some(collection),
            PromptContent::CollectionBrowse(browse) => self.collection_browse = Some(browse),
            PromptContent::Image(image) => self.image = Some(image),
            PromptContent::List(list) => self.list = Some(list),
            PromptContent::Media(media) => self.media = Some(media),
            PromptContent::Table(table) => self.table = Some(table),
        }
    }
}
