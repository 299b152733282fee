//! Lex V2 host adapter
//!
//! Translates the host's code-hook event into a typed `TurnRequest` and the
//! engine's `TurnResponse` back into the host's response shape. Nothing
//! outside this module sees the wire format.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use intake_core::{
    ChoiceCard, DialogAction, Error, FulfillmentState, InvocationPhase, Message, Result,
    Session, SlotName, TurnRequest, TurnResponse, SLOT_ORDER,
};

// =============================================================================
// Inbound event
// =============================================================================

/// Which code hook invoked the webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationSource {
    DialogCodeHook,
    FulfillmentCodeHook,
}

impl From<InvocationSource> for InvocationPhase {
    fn from(source: InvocationSource) -> Self {
        match source {
            InvocationSource::DialogCodeHook => InvocationPhase::PreCommit,
            InvocationSource::FulfillmentCodeHook => InvocationPhase::PostCommit,
        }
    }
}

/// Code-hook event. Fields the engine does not use are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexEvent {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub input_transcript: String,
    pub invocation_source: InvocationSource,
    pub session_state: LexSessionState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexSessionState {
    pub intent: LexIntent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexIntent {
    pub name: String,
    /// Slot map keyed by host slot name; `null` means unset
    #[serde(default)]
    pub slots: BTreeMap<String, Option<LexSlot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<LexSlotValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexSlotValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreted_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolved_values: Vec<String>,
}

impl LexSlot {
    /// Scalar slot holding `value` as both original and interpreted value
    pub fn scalar(value: &str) -> Self {
        Self {
            shape: Some("Scalar".to_string()),
            value: Some(LexSlotValue {
                original_value: Some(value.to_string()),
                interpreted_value: Some(value.to_string()),
                resolved_values: Vec::new(),
            }),
        }
    }

    /// Interpreted value, falling back to what the user literally said
    pub fn captured(&self) -> Option<&str> {
        let value = self.value.as_ref()?;
        value
            .interpreted_value
            .as_deref()
            .or(value.original_value.as_deref())
    }
}

impl LexEvent {
    /// Parse a raw webhook body
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::MalformedInput(e.to_string()))
    }

    /// Typed request for the engine
    pub fn to_turn_request(&self) -> TurnRequest {
        let intent = &self.session_state.intent;
        let mut session = Session::new(self.session_id.clone(), intent.name.clone())
            .with_utterance(self.input_transcript.clone());

        for (name, slot) in &intent.slots {
            let Some(slot_name) = SlotName::from_wire(name) else {
                continue;
            };
            let value = slot.as_ref().and_then(LexSlot::captured).map(str::to_string);
            session.set_value(slot_name, value);
        }

        TurnRequest::new(self.invocation_source.into(), session)
    }
}

// =============================================================================
// Outbound response
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponse {
    pub session_state: LexResponseState,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<LexMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexResponseState {
    pub dialog_action: LexDialogAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<LexIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexDialogAction {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_to_elicit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "contentType")]
pub enum LexMessage {
    PlainText {
        content: String,
    },
    ImageResponseCard {
        #[serde(rename = "imageResponseCard")]
        image_response_card: LexCard,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexCard {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<LexButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexButton {
    pub text: String,
    pub value: String,
}

impl From<&ChoiceCard> for LexCard {
    fn from(card: &ChoiceCard) -> Self {
        Self {
            title: card.title.clone(),
            subtitle: card.subtitle.clone(),
            buttons: card
                .buttons
                .iter()
                .map(|choice| LexButton {
                    text: choice.label.clone(),
                    value: choice.value.clone(),
                })
                .collect(),
        }
    }
}

impl From<&Message> for LexMessage {
    fn from(message: &Message) -> Self {
        match message {
            Message::PlainText { content } => LexMessage::PlainText {
                content: content.clone(),
            },
            Message::Card { card } => LexMessage::ImageResponseCard {
                image_response_card: card.into(),
            },
        }
    }
}

fn dialog_action(action: &DialogAction) -> LexDialogAction {
    let (action_type, slot_to_elicit) = match action {
        DialogAction::ElicitSlot { slot, .. } => ("ElicitSlot", Some(slot.wire_name().to_string())),
        DialogAction::ElicitIntent { .. } => ("ElicitIntent", None),
        DialogAction::Delegate => ("Delegate", None),
        DialogAction::Close { .. } => ("Close", None),
    };
    LexDialogAction {
        action_type: action_type.to_string(),
        slot_to_elicit,
    }
}

fn intent_state(action: &DialogAction) -> &'static str {
    match action {
        DialogAction::Close {
            state: FulfillmentState::Fulfilled,
            ..
        } => "Fulfilled",
        DialogAction::Close {
            state: FulfillmentState::NotFulfilled,
            ..
        } => "Failed",
        _ => "InProgress",
    }
}

fn messages(action: &DialogAction) -> Vec<LexMessage> {
    action.messages().iter().map(LexMessage::from).collect()
}

/// Render the engine's response for the host.
///
/// Every known slot is written back (unset ones as `null`); slots the
/// engine does not know are echoed unchanged.
pub fn render_response(event: &LexEvent, response: &TurnResponse) -> LexResponse {
    let mut slots = event.session_state.intent.slots.clone();
    for slot in SLOT_ORDER {
        slots.insert(
            slot.wire_name().to_string(),
            response.session.get(slot).map(LexSlot::scalar),
        );
    }

    let intent = LexIntent {
        name: response.session.intent_name.clone(),
        slots,
        state: Some(intent_state(&response.action).to_string()),
        confirmation_state: event.session_state.intent.confirmation_state.clone(),
    };

    LexResponse {
        session_state: LexResponseState {
            dialog_action: dialog_action(&response.action),
            intent: Some(intent),
            session_attributes: event.session_state.session_attributes.clone(),
        },
        messages: messages(&response.action),
    }
}

/// Response for events that never reached the engine
pub fn render_without_session(action: &DialogAction) -> LexResponse {
    LexResponse {
        session_state: LexResponseState {
            dialog_action: dialog_action(action),
            intent: None,
            session_attributes: None,
        },
        messages: messages(action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{Choice, ChoiceCard};
    use serde_json::json;

    fn event(source: &str, transcript: &str) -> serde_json::Value {
        json!({
            "sessionId": "abc-123",
            "inputTranscript": transcript,
            "invocationSource": source,
            "bot": { "name": "Docentes", "localeId": "es_419" },
            "sessionState": {
                "sessionAttributes": { "channel": "web" },
                "intent": {
                    "name": "SolicitudServicio",
                    "state": "InProgress",
                    "confirmationState": "None",
                    "slots": {
                        "NombreContacto": {
                            "shape": "Scalar",
                            "value": {
                                "originalValue": "laura",
                                "interpretedValue": "Laura",
                                "resolvedValues": ["Laura"]
                            }
                        },
                        "NumCelular": {
                            "value": { "originalValue": "300 123 4567" }
                        },
                        "Edad": null,
                        "Extra": { "value": { "interpretedValue": "x" } }
                    }
                }
            }
        })
    }

    fn parse(value: serde_json::Value) -> LexEvent {
        LexEvent::parse(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_event_to_request() {
        let request = parse(event("DialogCodeHook", "Laura")).to_turn_request();

        assert_eq!(request.phase, InvocationPhase::PreCommit);
        assert_eq!(request.session.session_id, "abc-123");
        assert_eq!(request.session.intent_name, "SolicitudServicio");
        assert_eq!(request.session.raw_utterance, "Laura");
        assert_eq!(request.session.get(SlotName::ContactName), Some("Laura"));
        assert_eq!(request.session.get(SlotName::PhoneNumber), Some("300 123 4567"));
        assert_eq!(request.session.get(SlotName::ChildAge), None);
        assert_eq!(request.session.get(SlotName::Shift), None);
    }

    #[test]
    fn test_fulfillment_hook_is_post_commit() {
        let request = parse(event("FulfillmentCodeHook", "")).to_turn_request();
        assert_eq!(request.phase, InvocationPhase::PostCommit);
    }

    #[test]
    fn test_malformed_events() {
        assert!(matches!(
            LexEvent::parse(b"not json"),
            Err(Error::MalformedInput(_))
        ));

        let missing_state = json!({ "invocationSource": "DialogCodeHook" });
        assert!(LexEvent::parse(missing_state.to_string().as_bytes()).is_err());

        let bad_source = json!({
            "invocationSource": "Other",
            "sessionState": { "intent": { "name": "SolicitudServicio" } }
        });
        assert!(LexEvent::parse(bad_source.to_string().as_bytes()).is_err());
    }

    #[test]
    fn test_render_elicit_slot_with_card() {
        let event = parse(event("DialogCodeHook", "bachillerato"));
        let mut request = event.to_turn_request();
        request.session.clear(SlotName::ContactName);

        let action = DialogAction::ElicitSlot {
            slot: SlotName::SchoolLevel,
            messages: vec![
                Message::text("¿En qué nivel de escolaridad está tu hijo?"),
                Message::card(ChoiceCard::new(
                    "Opciones",
                    vec![
                        Choice::new("Preescolar", "Preescolar"),
                        Choice::new("Primaria", "Primaria"),
                    ],
                )),
            ],
        };
        let response = render_response(&event, &TurnResponse::new(request.session, action));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["sessionState"]["dialogAction"]["type"], "ElicitSlot");
        assert_eq!(json["sessionState"]["dialogAction"]["slotToElicit"], "Escolaridad");
        assert_eq!(json["sessionState"]["intent"]["state"], "InProgress");
        assert_eq!(json["sessionState"]["sessionAttributes"]["channel"], "web");

        let slots = &json["sessionState"]["intent"]["slots"];
        assert!(slots["NombreContacto"].is_null());
        assert_eq!(slots["NumCelular"]["shape"], "Scalar");
        assert_eq!(slots["NumCelular"]["value"]["interpretedValue"], "300 123 4567");
        assert!(slots["Confirmacion"].is_null());
        assert_eq!(slots["Extra"]["value"]["interpretedValue"], "x");

        assert_eq!(json["messages"][0]["contentType"], "PlainText");
        assert_eq!(json["messages"][1]["contentType"], "ImageResponseCard");
        assert_eq!(json["messages"][1]["imageResponseCard"]["title"], "Opciones");
        assert_eq!(
            json["messages"][1]["imageResponseCard"]["buttons"][1]["text"],
            "Primaria"
        );
    }

    #[test]
    fn test_render_close_states() {
        let event = parse(event("FulfillmentCodeHook", ""));
        let session = event.to_turn_request().session;

        for (state, expected) in [
            (FulfillmentState::Fulfilled, "Fulfilled"),
            (FulfillmentState::NotFulfilled, "Failed"),
        ] {
            let action = DialogAction::Close {
                state,
                messages: vec![Message::text("fin")],
            };
            let response = render_response(&event, &TurnResponse::new(session.clone(), action));
            assert_eq!(response.session_state.dialog_action.action_type, "Close");
            assert_eq!(
                response.session_state.intent.unwrap().state.as_deref(),
                Some(expected)
            );
        }
    }

    #[test]
    fn test_delegate_has_no_messages() {
        let event = parse(event("DialogCodeHook", "sí"));
        let session = event.to_turn_request().session;
        let response = render_response(&event, &TurnResponse::new(session, DialogAction::Delegate));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["sessionState"]["dialogAction"]["type"], "Delegate");
        assert!(json.get("messages").is_none());
    }

    #[test]
    fn test_render_without_session() {
        let action = DialogAction::ElicitIntent {
            messages: vec![Message::text("¿En qué puedo ayudarte?")],
        };
        let json = serde_json::to_value(render_without_session(&action)).unwrap();
        assert_eq!(json["sessionState"]["dialogAction"]["type"], "ElicitIntent");
        assert!(json["sessionState"].get("intent").is_none());
        assert_eq!(json["messages"][0]["content"], "¿En qué puedo ayudarte?");
    }
}
