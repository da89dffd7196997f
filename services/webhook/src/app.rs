//! The conversation app: handler registry and per-request dispatch.
//!
//! One inbound webhook request is verified, turned into a [`Turn`],
//! routed to the registered handler for its handler name, and serialized
//! back out with the status code the transport should answer with.

use anyhow::Result;
use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use converse_core::auth::AuthHeaderProcessor;
use converse_core::json::JsonObject;
use converse_core::{HandlerRequest, Turn};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Handler name the platform probes to check service health.
pub const HEALTH_CHECK_HANDLER: &str = "actions.handler.HEALTH_CHECK";

/// Header carrying the platform's signed request token.
const SIGNATURE_HEADER: &str = "google-assistant-signature";

/// Raised by a handler (or catcher) to signal stale or invalid
/// credentials; the dispatcher answers 401 instead of failing the request.
#[derive(Debug, Error)]
#[error("request credentials are stale or invalid")]
pub struct UnauthorizedError;

/// Failures surfaced to the transport's error path.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("handler not found for handle name: {0}")]
    HandlerNotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Future returned by a turn handler, borrowing the turn it mutates.
pub type HandlerFuture<'a> = BoxFuture<'a, Result<()>>;

type TurnHandler = Box<dyn for<'a> Fn(&'a mut Turn) -> HandlerFuture<'a> + Send + Sync>;
type Catcher =
    Box<dyn for<'a> Fn(&'a mut Turn, anyhow::Error) -> HandlerFuture<'a> + Send + Sync>;

/// How the verification failure message is produced.
pub enum VerificationMessage {
    /// Echo the underlying failure text.
    Passthrough,
    /// A fixed replacement string.
    Fixed(String),
    /// Derive the message from the underlying failure text.
    Transform(Box<dyn Fn(&str) -> String + Send + Sync>),
}

/// Request-signature verification settings.
///
/// When configured, every request must carry a platform-signed token that
/// validates against the project id, checked before any turn state is
/// built.
pub struct Verification {
    pub project: String,
    pub status: StatusCode,
    pub message: VerificationMessage,
}

impl Verification {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            status: StatusCode::FORBIDDEN,
            message: VerificationMessage::Passthrough,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_message(mut self, message: VerificationMessage) -> Self {
        self.message = message;
        self
    }

    fn resolve_message(&self, original: &str) -> String {
        match &self.message {
            VerificationMessage::Passthrough => original.to_string(),
            VerificationMessage::Fixed(fixed) => fixed.clone(),
            VerificationMessage::Transform(transform) => transform(original),
        }
    }
}

/// What the transport should answer with.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub status: StatusCode,
    pub body: Value,
}

/// Answers the platform's health probe with a bare JSON object.
async fn health_check(conv: &mut Turn) -> Result<()> {
    conv.json(json!({}));
    Ok(())
}

/// The default catcher: hand the handler's error straight back.
async fn rethrow(_conv: &mut Turn, error: anyhow::Error) -> Result<()> {
    Err(error)
}

/// Registry of turn handlers plus the surrounding per-request policy:
/// verification, auth-header processing, and the turn-level exception
/// catcher.
pub struct ConversationApp {
    handlers: HashMap<String, TurnHandler>,
    catcher: Catcher,
    processor: Arc<dyn AuthHeaderProcessor>,
    client_id: Option<String>,
    verification: Option<Verification>,
}

impl ConversationApp {
    /// Creates an app with the default rethrowing catcher and the health
    /// check handler pre-registered.
    pub fn new(processor: Arc<dyn AuthHeaderProcessor>) -> Self {
        let mut app = Self {
            handlers: HashMap::new(),
            catcher: Box::new(|conv: &mut Turn, error| rethrow(conv, error).boxed()),
            processor,
            client_id: None,
            verification: None,
        };
        app.handle(HEALTH_CHECK_HANDLER, |conv: &mut Turn| {
            health_check(conv).boxed()
        });
        app
    }

    /// Client id used to validate authorization headers as signed identity
    /// tokens.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_verification(mut self, verification: Verification) -> Self {
        self.verification = Some(verification);
        self
    }

    /// Registers the handler executed when the inbound handler name
    /// matches. Re-registering a name replaces the prior handler.
    pub fn handle<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Turn) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    /// Replaces the turn-level exception catcher. The catcher may recover
    /// (the turn is then serialized normally) or return an error of its
    /// own.
    pub fn catch<F>(&mut self, catcher: F) -> &mut Self
    where
        F: for<'a> Fn(&'a mut Turn, anyhow::Error) -> HandlerFuture<'a> + Send + Sync + 'static,
    {
        self.catcher = Box::new(catcher);
        self
    }

    /// Runs one request/response cycle.
    pub async fn dispatch(
        &self,
        body: HandlerRequest,
        headers: &HeaderMap,
    ) -> Result<DispatchOutcome, DispatchError> {
        if let Some(verification) = &self.verification {
            let token = header_str(headers, SIGNATURE_HEADER);
            if let Err(error) = self
                .processor
                .decode_identity(token, &verification.project)
                .await
            {
                warn!(%error, "request signature verification failed");
                let message =
                    verification.resolve_message(&format!("ID token verification failed: {error}"));
                return Ok(DispatchOutcome {
                    status: verification.status,
                    body: json!({ "error": message }),
                });
            }
        }

        let mut conv = Turn::new(body);
        let authorization = header_str(headers, "authorization");
        if !authorization.is_empty() {
            conv.user
                .process_auth_header(
                    authorization,
                    self.processor.as_ref(),
                    self.client_id.as_deref(),
                )
                .await
                .map_err(DispatchError::Internal)?;
        }

        let name = conv.handler.name.clone();
        let handler = self
            .handlers
            .get(&name)
            .ok_or_else(|| DispatchError::HandlerNotFound(name.clone()))?;
        debug!(handler = %name, intent = %conv.intent.name, "dispatching turn");

        if let Err(error) = handler(&mut conv).await {
            if let Err(error) = (self.catcher)(&mut conv, error).await {
                if error.is::<UnauthorizedError>() {
                    info!(handler = %name, "handler denied authorization");
                    return Ok(DispatchOutcome {
                        status: StatusCode::UNAUTHORIZED,
                        body: json!({}),
                    });
                }
                return Err(DispatchError::Internal(error));
            }
        }

        let body = conv
            .serialize()
            .map_err(|error| DispatchError::Internal(error.into()))?;
        Ok(DispatchOutcome {
            status: StatusCode::OK,
            body,
        })
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Processor for deployments without an identity backend: bearer tokens
/// are extracted as-is and identity decoding always fails.
pub struct UnverifiedProcessor;

#[async_trait]
impl AuthHeaderProcessor for UnverifiedProcessor {
    async fn decode_identity(&self, _token: &str, audience: &str) -> Result<JsonObject> {
        anyhow::bail!("no identity decoder configured for audience {audience}")
    }
}
