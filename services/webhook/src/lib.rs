//! Webhook Service Library Crate
//!
//! The transport and dispatch layer around `converse-core`: handler
//! registration, request verification, auth-header processing, axum
//! routing, and configuration. The binary is a thin wrapper around this
//! library.

pub mod app;
pub mod config;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{
    ConversationApp, DispatchError, DispatchOutcome, UnauthorizedError, UnverifiedProcessor,
    Verification, VerificationMessage,
};
