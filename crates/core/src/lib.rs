//! Turn-state aggregation and prompt composition for a conversational
//! webhook fulfillment service.
//!
//! One inbound request becomes one [`Turn`]: the wire payload is decoded
//! into fully-defaulted field containers, a handler mutates the turn and
//! contributes prompt fragments, and finalization merges everything into a
//! single outbound response, echoing back only the mutable sections the
//! handler actually changed.

pub mod auth;
pub mod content;
pub mod error;
pub mod fragment;
pub mod json;
pub mod prompt;
pub mod request;
pub mod turn;

pub use auth::AuthHeaderProcessor;
pub use content::{
    Card, Collection, CollectionBrowse, Content, Image, List, Media, OrderUpdate, Table,
};
pub use error::Error;
pub use fragment::{Canvas, Link, Simple, Suggestion};
pub use json::JsonObject;
pub use prompt::{Prompt, PromptItem};
pub use request::{Expected, HandlerRequest, HandlerResponse, Home, Scene, Session, User};
pub use turn::Turn;
