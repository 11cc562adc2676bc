//! Toast Component
//!
//! Transient, auto-dismissing status message.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Handle used to show and hide the toast
#[derive(Clone, Copy)]
pub struct ToastHandle {
    message: RwSignal<String>,
    visible: RwSignal<bool>,
    /// Bumped on every show so a stale timer can't hide a newer message
    generation: RwSignal<u32>,
    duration_ms: u32,
}

impl ToastHandle {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            message: RwSignal::new(String::new()),
            visible: RwSignal::new(false),
            generation: RwSignal::new(0),
            duration_ms,
        }
    }

    pub fn message(&self) -> String {
        self.message.get()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    pub fn show(&self, message: impl Into<String>) {
        let mut message = message.into();
        if message.is_empty() {
            message = "OK".to_string();
        }
        self.message.set(message);
        self.visible.set(true);
        self.generation.update(|g| *g = g.wrapping_add(1));

        let handle = *self;
        let shown = self.generation.get_untracked();
        spawn_local(async move {
            TimeoutFuture::new(handle.duration_ms).await;
            if handle.generation.get_untracked() == shown {
                handle.visible.set(false);
            }
        });
    }

    pub fn hide(&self) {
        self.visible.set(false);
    }
}

#[component]
pub fn Toast(toast: ToastHandle) -> impl IntoView {
    view! {
        <div
            class=move || if toast.is_visible() { "ja-toast is-visible" } else { "ja-toast" }
            role="status"
            aria-live="polite"
        >
            <span class="ja-toast__msg">{move || toast.message()}</span>
            <button
                type="button"
                class="ja-toast__close"
                data-toast-dismiss=""
                on:click=move |_| toast.hide()
            >
                "×"
            </button>
        </div>
    }
}
