//! One request/response cycle of the conversation.
//!
//! A [`Turn`] is built fresh from each inbound payload, handed to the
//! registered handler for mutation, finalized exactly once, and then
//! discarded. Mutable sections are snapshotted at construction so
//! finalization can echo back only what the handler changed.

use crate::error::Error;
use crate::json::is_json_equal;
use crate::prompt::{Prompt, PromptItem};
use crate::request::{
    Context, Device, Expected, Handler, HandlerRequest, HandlerResponse, Home, Intent, Scene,
    Session, User,
};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Pre-handler copies of the mutable request sections.
#[derive(Debug, Clone)]
struct Snapshot {
    scene: Scene,
    session: Session,
    user: User,
    home: Home,
}

/// The full context of one handler invocation, provided to handlers as
/// `conv`.
#[derive(Debug)]
pub struct Turn {
    /// The raw inbound payload the turn was built from.
    pub request: HandlerRequest,
    pub handler: Handler,
    pub intent: Intent,
    pub scene: Scene,
    pub session: Session,
    pub user: User,
    pub device: Device,
    pub home: Home,
    pub context: Context,
    pub expected: Expected,
    /// The outbound prompt under assembly. Fragments append to the
    /// conversation history unless `override` is set.
    pub prompt: Prompt,
    /// Escape hatch: when cleared, the prompt's `override` flag is forced
    /// off at finalization.
    pub overwrite: bool,
    /// Set once the response has been computed; all further prompt
    /// mutation fails.
    pub digested: bool,
    raw_response: Option<Value>,
    prompt_set: bool,
    snapshot: Snapshot,
}

impl Turn {
    /// Builds the turn's field containers from an inbound payload and
    /// snapshots the mutable sections for the finalize diff.
    pub fn new(request: HandlerRequest) -> Self {
        let snapshot = Snapshot {
            scene: request.scene.clone(),
            session: request.session.clone(),
            user: request.user.clone(),
            home: request.home.clone(),
        };
        Self {
            handler: request.handler.clone(),
            intent: request.intent.clone(),
            scene: request.scene.clone(),
            session: request.session.clone(),
            user: request.user.clone(),
            device: request.device.clone(),
            home: request.home.clone(),
            context: request.context.clone(),
            expected: Expected::default(),
            prompt: Prompt::default(),
            overwrite: true,
            digested: false,
            raw_response: None,
            prompt_set: false,
            snapshot,
            request,
        }
    }

    /// Adds one prompt fragment. See [`Prompt::add`] for the merge rules.
    pub fn add(&mut self, item: impl Into<PromptItem>) -> Result<&mut Self, Error> {
        self.ensure_open()?;
        self.prompt.add(item)?;
        self.prompt_set = true;
        Ok(self)
    }

    /// Adds a sequence of prompt fragments in order.
    pub fn add_all(
        &mut self,
        items: impl IntoIterator<Item = PromptItem>,
    ) -> Result<&mut Self, Error> {
        self.ensure_open()?;
        self.prompt.add_all(items)?;
        self.prompt_set = true;
        Ok(self)
    }

    /// Appends speech to the opening simple response.
    pub fn append(&mut self, item: impl Into<PromptItem>) -> Result<&mut Self, Error> {
        self.ensure_open()?;
        self.prompt.append(item)?;
        self.prompt_set = true;
        Ok(self)
    }

    /// Manually sets the outbound response, bypassing prompt assembly.
    pub fn json(&mut self, response: Value) -> &mut Self {
        self.raw_response = Some(response);
        self
    }

    /// Whether any `add`/`append` call has touched the prompt.
    pub fn prompt_was_set(&self) -> bool {
        self.prompt_set
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.digested {
            return Err(Error::ResponseAlreadyDigested);
        }
        Ok(())
    }

    /// Computes the outbound response. Callable exactly once.
    ///
    /// The session and prompt are always included; scene, user, and home
    /// are echoed only when they differ structurally from the pre-handler
    /// snapshot, and the expected section only when the handler set a
    /// language or biasing phrases.
    pub fn response(&mut self) -> Result<HandlerResponse, Error> {
        if self.digested {
            return Err(Error::AlreadyFinalized);
        }
        self.digested = true;

        let mut session = self.session.clone();
        // Legacy compatibility: the runtime still expects the merge mode
        // under typeOverrideMode.
        for type_override in &mut session.type_overrides {
            if let Some(mode) = type_override.mode.take() {
                type_override.type_override_mode = Some(mode);
            }
        }

        let mut prompt = self.prompt.clone();
        if !self.overwrite {
            prompt.r#override = false;
        }

        let scene = self
            .echo_if_changed(&self.scene, &self.snapshot.scene)?
            .then(|| self.scene.clone());
        let user = self
            .echo_if_changed(&self.user, &self.snapshot.user)?
            .then(|| self.user.clone());
        let home = self
            .echo_if_changed(&self.home, &self.snapshot.home)?
            .then(|| self.home.clone());

        let expected = (self.expected.language_code.is_some() || !self.expected.speech.is_empty())
            .then(|| self.expected.clone());

        debug!(
            handler = %self.handler.name,
            prompt_set = self.prompt_set,
            echo_scene = scene.is_some(),
            echo_user = user.is_some(),
            echo_home = home.is_some(),
            "turn finalized"
        );

        Ok(HandlerResponse {
            session,
            prompt,
            scene,
            user,
            home,
            expected,
        })
    }

    /// Returns the manually set raw response, or computes and serializes
    /// the generated one (digesting the turn).
    pub fn serialize(&mut self) -> Result<Value, Error> {
        if let Some(raw) = &self.raw_response {
            return Ok(raw.clone());
        }
        Ok(serde_json::to_value(self.response()?)?)
    }

    fn echo_if_changed<T: Serialize>(&self, current: &T, original: &T) -> Result<bool, Error> {
        let current = serde_json::to_value(current)?;
        let original = serde_json::to_value(original)?;
        Ok(!is_json_equal(&current, &original))
    }
}
