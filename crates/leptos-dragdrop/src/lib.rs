//! Leptos DragDrop Utilities
//!
//! Native HTML5 drag-and-drop handlers for Leptos pages.
//! Drag state lives with the caller; these helpers only deal with the
//! browser side of the contract (payload, preventDefault, drop effect)
//! and with telling a click apart from the release of a drag.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use web_sys::DragEvent;

/// Elements whose own click behaviour must be kept
const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Payload type set on drag start
pub const DRAG_MIME: &str = "text/plain";

pub fn is_interactive_tag(tag: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    INTERACTIVE_TAGS.contains(&tag.as_str())
}

/// True when the event originated on a link, button or form control
pub fn is_interactive_target(ev: &web_sys::Event) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| is_interactive_tag(&el.tag_name()))
        .unwrap_or(false)
}

/// Attach `handler` to an element the page owns. The listener lives as long as the page.
pub fn bind_event<E, H>(target: &web_sys::EventTarget, name: &str, handler: H)
where
    E: FromWasmAbi + 'static,
    H: Fn(E) + 'static,
{
    let cb = Closure::<dyn FnMut(E)>::new(handler);
    let _ = target.add_event_listener_with_callback(name, cb.as_ref().unchecked_ref());
    cb.forget();
}

/// Run `f` once after `ms` milliseconds (0 = next tick)
pub fn defer(ms: i32, f: impl FnOnce() + 'static) {
    if let Some(win) = web_sys::window() {
        let cb = Closure::once_into_js(f);
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms);
    }
}

/// Create dragstart handler for a draggable element.
/// `on_start` returns false to refuse the drag, which cancels it in the browser.
pub fn make_on_dragstart<F>(payload: String, on_start: F) -> impl Fn(DragEvent) + Clone + 'static
where
    F: Fn() -> bool + Clone + 'static,
{
    move |ev: DragEvent| {
        if !on_start() {
            ev.prevent_default();
            return;
        }
        if let Some(dt) = ev.data_transfer() {
            dt.set_effect_allowed("move");
            let _ = dt.set_data(DRAG_MIME, &payload);
        }
    }
}

/// Create dragover handler for a drop target.
/// Without preventDefault here the browser never fires `drop`.
pub fn make_on_dragover<F>(on_over: F) -> impl Fn(DragEvent) + Clone + 'static
where
    F: Fn() + Clone + 'static,
{
    move |ev: DragEvent| {
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        on_over();
    }
}

pub fn make_on_dragleave<F>(on_leave: F) -> impl Fn(DragEvent) + Clone + 'static
where
    F: Fn() + Clone + 'static,
{
    move |_ev: DragEvent| on_leave()
}

pub fn make_on_drop<F>(on_drop: F) -> impl Fn(DragEvent) + Clone + 'static
where
    F: Fn() + Clone + 'static,
{
    move |ev: DragEvent| {
        ev.prevent_default();
        on_drop();
    }
}

/// Create dragend handler. Fires for drops, failed drops and cancels alike.
/// `on_settled` runs on the next tick, after the click that may follow the release.
pub fn make_on_dragend<F, S>(on_end: F, on_settled: S) -> impl Fn(DragEvent) + Clone + 'static
where
    F: Fn() + Clone + 'static,
    S: Fn() + Clone + 'static,
{
    move |_ev: DragEvent| {
        on_end();
        let settled = on_settled.clone();
        defer(0, move || settled());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_tags() {
        assert!(is_interactive_tag("A"));
        assert!(is_interactive_tag("button"));
        assert!(is_interactive_tag("TEXTAREA"));
        assert!(!is_interactive_tag("DIV"));
        assert!(!is_interactive_tag("span"));
    }
}
