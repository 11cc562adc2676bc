//! UI Components
//!
//! Leptos components for the parts of the board the page may not provide.

mod toast;

pub use toast::{Toast, ToastHandle};
