//! Lead Board Frontend Entry Point

mod app;
mod board;
mod commands;
mod components;
mod config;
mod context;
mod controller;
mod csrf;
mod dom;
mod error;
mod models;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    let Some(scanned) = dom::scan_document() else {
        log::debug!("[KANBAN] no board on this page");
        return;
    };

    // The page keeps its markup; listeners and effects attach to it in place
    app::mount(scanned);
}
