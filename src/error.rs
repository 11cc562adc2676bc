//! Board Errors
//!
//! Every failure the board can run into, from drag guards to HTTP.

use thiserror::Error;

use crate::models::CardKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// A drag session is already active
    #[error("a drag is already in progress")]
    DragInProgress,

    #[error("unknown card {0:?}")]
    UnknownCard(CardKey),

    /// The card's previous move has not settled yet
    #[error("card {0:?} still has a move in flight")]
    MovePending(CardKey),

    #[error("missing move URL")]
    MissingMoveUrl,

    #[error("HTTP {0}")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid board config: {0}")]
    Config(String),
}

pub type BoardResult<T> = Result<T, BoardError>;

impl From<wasm_bindgen::JsValue> for BoardError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        BoardError::Network(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}
