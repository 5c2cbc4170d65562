//! Text framing of the protocol: every frame is a JSON object
//! `{"type": .., "payload": ..}`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::messages::{MessageKind, C2S, S2C};

/// Parses one inbound frame into a typed message.
///
/// The kind comes from `type` when present. Frames without it are matched by
/// the keys of their payload (or of the frame itself when there is no
/// `payload`): grid dimensions mean `init_data`, a player plus visible players
/// mean `aoi_update`, associated item ids mean `skill_item_ids`.
pub fn decode_server_message(raw: &str) -> Result<S2C, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut frame) = value else {
        return Err(DecodeError::NotAnObject);
    };

    let payload = frame.remove("payload");
    let kind = match frame.get("type") {
        Some(Value::String(name)) => {
            MessageKind::from_wire(name).ok_or_else(|| DecodeError::UnknownKind(name.clone()))?
        }
        Some(other) => return Err(DecodeError::UnknownKind(other.to_string())),
        None => {
            let body = match &payload {
                Some(Value::Object(map)) => map,
                Some(_) => return Err(DecodeError::UnknownKind("<untyped>".into())),
                None => &frame,
            };
            infer_kind(body).ok_or_else(|| DecodeError::UnknownKind("<untyped>".into()))?
        }
    };

    let payload = match payload {
        Some(p) => p,
        None if frame.contains_key("type") => {
            if kind.needs_payload() {
                return Err(DecodeError::MissingPayload(kind));
            }
            Value::Null
        }
        // untyped frame without a payload wrapper: the frame is the payload
        None => Value::Object(frame),
    };

    Ok(match kind {
        MessageKind::InitData => S2C::InitData(parse_payload(kind, payload)?),
        MessageKind::AoiUpdate => S2C::AoiUpdate(Box::new(parse_payload(kind, payload)?)),
        MessageKind::SkillItemIds => S2C::SkillItemIds(parse_payload(kind, payload)?),
        MessageKind::Error => S2C::Error(parse_payload(kind, payload)?),
        MessageKind::Ping => S2C::Ping,
        MessageKind::Pong => S2C::Pong,
    })
}

pub fn encode_client_message(msg: &C2S) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

fn infer_kind(body: &Map<String, Value>) -> Option<MessageKind> {
    if body.contains_key("gridW") && body.contains_key("gridH") {
        Some(MessageKind::InitData)
    } else if body.contains_key("player") && body.contains_key("visiblePlayers") {
        Some(MessageKind::AoiUpdate)
    } else if body.contains_key("associatedItemIds") {
        Some(MessageKind::SkillItemIds)
    } else {
        None
    }
}

fn parse_payload<T: DeserializeOwned>(kind: MessageKind, payload: Value) -> Result<T, DecodeError> {
    serde_json::from_value(payload).map_err(|source| DecodeError::InvalidPayload { kind, source })
}
