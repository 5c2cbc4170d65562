use thiserror::Error;

use crate::messages::MessageKind;

/// Why an inbound frame was dropped. A frame that fails to decode never
/// reaches the world state.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,

    #[error("unknown message kind `{0}`")]
    UnknownKind(String),

    #[error("`{0}` frame has no payload")]
    MissingPayload(MessageKind),

    #[error("invalid `{kind}` payload: {source}")]
    InvalidPayload {
        kind: MessageKind,
        source: serde_json::Error,
    },

    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}
