//! Shared Application State
//!
//! Holds the conversation app (handler registry + dispatch policy) and
//! the loaded configuration, created once at startup.

use crate::{app::ConversationApp, config::Config};
use std::sync::Arc;

pub struct AppState {
    pub app: ConversationApp,
    pub config: Arc<Config>,
}
