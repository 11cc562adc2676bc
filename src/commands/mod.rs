//! Backend Command Wrappers
//!
//! HTTP bindings to the server endpoints the board talks to.

mod lead;

use async_trait::async_trait;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{BoardError, BoardResult};

pub use lead::*;

/// Something that can persist a card move.
/// Single-threaded: futures run on the browser event loop.
#[async_trait(?Send)]
pub trait LeadMover {
    async fn move_lead(&self, request: &MoveRequest) -> BoardResult<()>;
}

/// Run a prepared request through `window.fetch`.
/// Any final status outside 2xx is an error; redirects are followed.
async fn fetch(request: web_sys::Request) -> BoardResult<web_sys::Response> {
    let window = web_sys::window().ok_or_else(|| BoardError::Network("no window".to_string()))?;
    let value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: web_sys::Response = value.dyn_into()?;
    if !response.ok() {
        return Err(BoardError::Http(response.status()));
    }
    Ok(response)
}
