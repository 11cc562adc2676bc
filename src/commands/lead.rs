//! Lead Commands
//!
//! Persist a lead's new pipeline status.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::models::{Card, StatusCode};
use super::{fetch, LeadMover};

/// Characters `encodeURIComponent` leaves alone
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A ready-to-send move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub url: String,
    /// Form-encoded body, e.g. `status=interview`
    pub body: String,
    pub csrf_token: String,
}

impl MoveRequest {
    /// Prefer the card's own URL, then the configured pattern.
    /// Fails before any network call if neither yields a URL.
    pub fn build(
        config: &BoardConfig,
        card: &Card,
        status: &StatusCode,
        csrf_token: String,
    ) -> BoardResult<Self> {
        let url = card
            .move_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| card.lead_id.as_ref().and_then(|id| config.move_url_for(id)))
            .ok_or(BoardError::MissingMoveUrl)?;

        Ok(Self {
            url,
            body: form_encode(&[(config.status_field.as_str(), status.as_str())]),
            csrf_token,
        })
    }
}

pub fn form_encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, FORM_VALUE),
                utf8_percent_encode(v, FORM_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Same-origin POST with the anti-forgery headers
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpLeadMover;

#[async_trait(?Send)]
impl LeadMover for HttpLeadMover {
    async fn move_lead(&self, request: &MoveRequest) -> BoardResult<()> {
        let headers = web_sys::Headers::new()?;
        headers.set("Content-Type", FORM_CONTENT_TYPE)?;
        headers.set("X-CSRFToken", &request.csrf_token)?;
        headers.set("X-Requested-With", "XMLHttpRequest")?;

        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&wasm_bindgen::JsValue::from_str(&request.body));
        init.set_credentials(web_sys::RequestCredentials::SameOrigin);

        let req = web_sys::Request::new_with_str_and_init(&request.url, &init)?;
        log::debug!("[MOVE] POST {} {}", request.url, request.body);
        fetch(req).await?;
        Ok(())
    }
}
