//! Field containers for the wire request and response envelopes.
//!
//! Each container deserializes a possibly missing or partially populated
//! request section into a fully-defaulted shape: id and name strings
//! default to empty, maps and lists to empty collections. Handlers mutate
//! these containers directly during a turn.

use crate::auth::AuthHeaderProcessor;
use crate::content::Image;
use crate::fragment::OpenUrl;
use crate::json::JsonObject;
use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The fulfillment handler section: which registered handler should run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Handler {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentParameterValue {
    /// Original text exactly as typed or spoken by the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    /// Structured value produced by intent matching.
    #[serde(skip_serializing_if = "Value::is_null")]
    pub resolved: Value,
}

/// The last matched intent with its resolved parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    pub name: String,
    pub params: BTreeMap<String, IntentParameterValue>,
    /// Raw query text from the user.
    pub query: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotMode {
    Optional,
    Required,
    #[default]
    #[serde(other)]
    ModeUnspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Empty,
    Invalid,
    Filled,
    #[default]
    #[serde(other)]
    SlotUnspecified,
}

/// A named parameter being collected within a scene's form-filling flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slot {
    pub mode: SlotMode,
    pub status: SlotStatus,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub value: Value,
    pub updated: bool,
    /// Prompt played when this slot is requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<Prompt>,
}

/// Directive to transition to another scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextScene {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotFillingStatus {
    Initialized,
    Collecting,
    Final,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// The current state in the conversation's flow graph. Setting `next`
/// transitions immediately after this turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub name: String,
    pub slots: BTreeMap<String, Slot>,
    pub next: NextScene,
    /// Read-only; reported by the runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_filling_status: Option<SlotFillingStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeOverrideMode {
    TypeMerge,
    TypeReplace,
    #[default]
    #[serde(other)]
    TypeUnspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryDisplay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_url: Option<OpenUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub name: String,
    pub synonyms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<EntryDisplay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynonymType {
    pub entries: Vec<Entry>,
}

/// A session-scoped redefinition of a recognized vocabulary type.
///
/// The runtime accepts the merge mode under the legacy field name
/// `typeOverrideMode`; [`crate::turn::Turn`] renames `mode` into it while
/// finalizing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypeOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TypeOverrideMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_override_mode: Option<TypeOverrideMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonym: Option<SynonymType>,
}

/// Per-session state: id, language, and a free-form parameter map the
/// fulfillment may create, update, or remove keys in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// IETF BCP-47 code of the current conversation language. May differ
    /// from the user locale when multi-language features are active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub params: JsonObject,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_overrides: Vec<TypeOverride>,
}

impl Session {
    /// Alias of `language_code`.
    pub fn language(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    /// Alias of `language_code`; both views write the same field.
    pub fn set_language(&mut self, code: impl Into<String>) {
        self.language_code = Some(code.into());
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Guest,
    Verified,
    #[default]
    #[serde(other)]
    UserVerificationStatusUnspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountLinkingStatus {
    Linked,
    NotLinked,
    #[default]
    #[serde(other)]
    AccountLinkingStatusUnspecified,
}

/// The user making the request, with their cross-session parameter map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    /// Primary locale of the user, BCP-47 without the script subtag.
    pub locale: String,
    pub params: JsonObject,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_linking_status: Option<AccountLinkingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen_time: Option<String>,
    /// Opaque entitlement data from the platform store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_entitlements: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<Value>,
}

impl User {
    /// Extracts credentials from an authorization header into `params`.
    ///
    /// With a client id the header is validated and decoded as a signed
    /// identity token and the claims land under `params["tokenPayload"]`;
    /// decode failures propagate. Without one, the raw bearer token value
    /// lands under `params["bearerToken"]`. Exactly one branch runs per
    /// call.
    pub async fn process_auth_header(
        &mut self,
        auth_header: &str,
        processor: &dyn AuthHeaderProcessor,
        client_id: Option<&str>,
    ) -> anyhow::Result<&mut Self> {
        match client_id {
            Some(client_id) => {
                let payload = processor.decode_identity(auth_header, client_id).await?;
                self.params
                    .insert("tokenPayload".to_string(), Value::Object(payload));
            }
            None => {
                let token = processor.extract_bearer_token(auth_header);
                self.params
                    .insert("bearerToken".to_string(), Value::String(token));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    Speech,
    RichResponse,
    WebLink,
    LongFormAudio,
    InteractiveCanvas,
    #[default]
    #[serde(other)]
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeZone {
    /// IANA identifier, e.g. `America/New_York`.
    pub id: String,
    pub version: String,
}

/// The device the query originated from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Device {
    pub capabilities: Vec<Capability>,
    /// Populated only after the user grants location permission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<Value>,
    /// Used to resolve datetime values; UTC when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
}

/// Parameters scoped to the structure the target device belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Home {
    pub params: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaContext {
    /// Playback progress of the active media session, e.g. `"12.5s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasContext {
    /// State last set by the canvas web app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
}

/// Ambient query context: active media session, canvas state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasContext>,
}

/// Expectations for the next dialog turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expected {
    /// Switches the conversation language for all following turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// Phrases biasing speech recognition on the next turn.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub speech: Vec<String>,
}

/// The full inbound webhook payload. Every section normalizes to its
/// defaulted container when missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerRequest {
    pub handler: Handler,
    pub intent: Intent,
    pub scene: Scene,
    pub session: Session,
    pub user: User,
    pub device: Device,
    pub home: Home,
    pub context: Context,
}

/// The outbound webhook payload. Session and prompt are always echoed;
/// the other sections appear only when the handler changed them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerResponse {
    pub session: Session,
    pub prompt: Prompt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home: Option<Home>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Expected>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuthHeaderProcessor;
    use async_trait::async_trait;
    use serde_json::json;

    /// Carries only the trait's default bearer extraction.
    struct BearerOnly;

    #[async_trait]
    impl AuthHeaderProcessor for BearerOnly {
        async fn decode_identity(&self, _token: &str, _audience: &str) -> anyhow::Result<JsonObject> {
            anyhow::bail!("no identity backend in this test")
        }
    }

    #[test]
    fn test_missing_sections_normalize_to_defaults() {
        let request: HandlerRequest = serde_json::from_value(json!({
            "handler": {"name": "main"},
        }))
        .unwrap();
        assert_eq!(request.handler.name, "main");
        assert_eq!(request.session.id, "");
        assert!(request.session.params.is_empty());
        assert!(request.session.type_overrides.is_empty());
        assert_eq!(request.user.locale, "");
        assert!(request.user.params.is_empty());
        assert!(request.home.params.is_empty());
        assert!(request.device.capabilities.is_empty());
        assert_eq!(request.scene.name, "");
        assert!(request.scene.slots.is_empty());
    }

    #[test]
    fn test_session_serialization_shape() {
        let session: Session = serde_json::from_value(json!({"id": "S1"})).unwrap();
        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            json!({"id": "S1", "params": {}})
        );
    }

    #[test]
    fn test_session_language_alias_reads_and_writes_language_code() {
        let mut session = Session::default();
        assert_eq!(session.language(), None);

        session.set_language("fr-CA");
        assert_eq!(session.language_code.as_deref(), Some("fr-CA"));

        session.language_code = Some("en-US".to_string());
        assert_eq!(session.language(), Some("en-US"));
    }

    #[test]
    fn test_scene_defaults_serialize_name_slots_next() {
        let scene = Scene::default();
        assert_eq!(
            serde_json::to_value(&scene).unwrap(),
            json!({"name": "", "slots": {}, "next": {}})
        );
    }

    #[test]
    fn test_slot_values_survive_round_trip() {
        let scene: Scene = serde_json::from_value(json!({
            "name": "start",
            "slots": {
                "number": {
                    "mode": "REQUIRED",
                    "status": "SLOT_UNSPECIFIED",
                    "updated": false,
                    "value": "342",
                },
            },
            "slotFillingStatus": "COLLECTING",
        }))
        .unwrap();
        let slot = &scene.slots["number"];
        assert_eq!(slot.mode, SlotMode::Required);
        assert_eq!(slot.status, SlotStatus::SlotUnspecified);
        assert_eq!(slot.value, json!("342"));
        assert!(!slot.updated);
        assert_eq!(scene.slot_filling_status, Some(SlotFillingStatus::Collecting));
    }

    #[test]
    fn test_capabilities_parse_wire_names() {
        let device: Device = serde_json::from_value(json!({
            "capabilities": ["SPEECH", "RICH_RESPONSE", "WEB_LINK", "LONG_FORM_AUDIO"],
        }))
        .unwrap();
        assert_eq!(
            device.capabilities,
            vec![
                Capability::Speech,
                Capability::RichResponse,
                Capability::WebLink,
                Capability::LongFormAudio,
            ]
        );
    }

    #[test]
    fn test_type_override_modes_parse_wire_names() {
        let session: Session = serde_json::from_value(json!({
            "typeOverrides": [
                {"name": "color", "mode": "TYPE_REPLACE", "synonym": {"entries": [
                    {"name": "red", "synonyms": ["crimson", "scarlet"]},
                ]}},
            ],
        }))
        .unwrap();
        let type_override = &session.type_overrides[0];
        assert_eq!(type_override.mode, Some(TypeOverrideMode::TypeReplace));
        assert_eq!(type_override.type_override_mode, None);
        assert_eq!(
            type_override.synonym.as_ref().unwrap().entries[0].synonyms,
            vec!["crimson", "scarlet"]
        );
    }

    #[test]
    fn test_expected_omits_empty_speech() {
        let expected = Expected {
            language_code: Some("en-US".to_string()),
            speech: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&expected).unwrap(),
            json!({"languageCode": "en-US"})
        );
    }

    #[tokio::test]
    async fn test_process_auth_header_decodes_with_client_id() {
        let mut processor = MockAuthHeaderProcessor::new();
        processor
            .expect_decode_identity()
            .withf(|token, audience| token == "authHeader" && audience == "clientId")
            .returning(|_, _| {
                let mut claims = JsonObject::new();
                claims.insert("key".to_string(), json!("value"));
                Ok(claims)
            });

        let mut user = User::default();
        user.process_auth_header("authHeader", &processor, Some("clientId"))
            .await
            .unwrap();
        assert_eq!(user.params["tokenPayload"], json!({"key": "value"}));
        assert!(!user.params.contains_key("bearerToken"));
    }

    #[tokio::test]
    async fn test_process_auth_header_extracts_bearer_without_client_id() {
        let mut user = User::default();
        user.process_auth_header("Bearer abc123", &BearerOnly, None)
            .await
            .unwrap();
        assert_eq!(user.params["bearerToken"], json!("abc123"));

        let mut user = User::default();
        user.process_auth_header("Other abc123", &BearerOnly, None)
            .await
            .unwrap();
        assert_eq!(user.params["bearerToken"], json!(""));
    }

    #[tokio::test]
    async fn test_process_auth_header_propagates_decode_failure() {
        let mut processor = MockAuthHeaderProcessor::new();
        processor
            .expect_decode_identity()
            .returning(|_, _| anyhow::bail!("audience mismatch"));

        let mut user = User::default();
        let result = user
            .process_auth_header("authHeader", &processor, Some("clientId"))
            .await;
        assert!(result.is_err());
        assert!(user.params.is_empty());
    }
}
