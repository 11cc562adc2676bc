//! Page Scanner
//!
//! Reads the server-rendered board markup into a `Board` and keeps
//! handles on the elements the board drives. The markup stays the page's.
//!
//! Contract:
//! - root `[data-kanban]`, optional `data-board-config` JSON
//! - lists `[data-droppable='true']` with `data-status`, inside `.ja-kanban__col`
//! - count `.ja-kanban__count` inside the list's `.ja-kanban__col`
//! - cards `[data-draggable-card='true']` with `data-lead-id`, optional `data-move-url`
//! - optional page toast `.ja-toast` with `.ja-toast__msg` and `[data-toast-dismiss]` buttons

use std::collections::BTreeMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::board::Board;
use crate::config::BoardConfig;
use crate::models::{Card, CardKey, LeadId, StatusCode};

pub const BOARD_SELECTOR: &str = "[data-kanban]";
pub const LIST_SELECTOR: &str = "[data-droppable='true']";
pub const CARD_SELECTOR: &str = "[data-draggable-card='true']";
pub const COLUMN_CLASS: &str = "ja-kanban__col";
const TITLE_SELECTOR: &str = ".ja-kanban__title";
const COUNT_SELECTOR: &str = ".ja-kanban__count";
const TOAST_SELECTOR: &str = ".ja-toast";
const TOAST_MSG_SELECTOR: &str = ".ja-toast__msg";
const TOAST_DISMISS_SELECTOR: &str = "[data-toast-dismiss]";

/// Page elements of one column, in board column order
pub struct ColumnElements {
    pub list: Element,
    pub count: Option<Element>,
}

/// The page's own notification area
pub struct PageToast {
    pub root: Element,
    pub message: Option<Element>,
}

/// Everything needed to wire the board
pub struct ScannedBoard {
    pub board: Board,
    pub config: BoardConfig,
    pub columns: Vec<ColumnElements>,
    pub cards: BTreeMap<CardKey, Element>,
    pub toast: Option<PageToast>,
    /// Every `[data-toast-dismiss]` on the page
    pub toast_dismiss: Vec<Element>,
}

fn select_all(scope: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = scope.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn column_container(list: &Element) -> Option<Element> {
    list.closest(&format!(".{}", COLUMN_CLASS)).ok().flatten()
}

fn column_title(container: Option<&Element>, status: Option<&StatusCode>) -> String {
    container
        .and_then(|col| col.query_selector(TITLE_SELECTOR).ok().flatten())
        .and_then(|title| title.text_content())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| status.map(|s| s.to_string()).unwrap_or_default())
}

fn scan_toast(document: &Document) -> Option<PageToast> {
    let root = document.query_selector(TOAST_SELECTOR).ok().flatten()?;
    let message = root.query_selector(TOAST_MSG_SELECTOR).ok().flatten();
    Some(PageToast { root, message })
}

/// Read the board under `root`
pub fn scan_board(document: &Document, root: &Element) -> ScannedBoard {
    let raw_config = root.get_attribute("data-board-config").unwrap_or_default();
    let config = match BoardConfig::from_json(&raw_config) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("[KANBAN] {}, using defaults", e);
            BoardConfig::default()
        }
    };

    let mut board = Board::new();
    let mut columns = Vec::new();
    let mut cards = BTreeMap::new();
    let mut next_key = 0u32;
    for list in select_all(root, LIST_SELECTOR) {
        let status = list
            .get_attribute("data-status")
            .and_then(|s| StatusCode::parse(&s));
        let container = column_container(&list);
        let title = column_title(container.as_ref(), status.as_ref());
        let count = container
            .as_ref()
            .and_then(|col| col.query_selector(COUNT_SELECTOR).ok().flatten());
        let column = board.add_column(status, title);

        for el in select_all(&list, CARD_SELECTOR) {
            let key = CardKey(next_key);
            next_key += 1;
            let mut card = Card::new(
                key,
                el.get_attribute("data-lead-id").and_then(|s| LeadId::parse(&s)),
            );
            card.move_url = el
                .get_attribute("data-move-url")
                .filter(|u| !u.trim().is_empty());
            board.add_card(column, card);
            cards.insert(key, el);
        }
        columns.push(ColumnElements { list, count });
    }

    log::info!(
        "[KANBAN] scanned {} columns, {} cards",
        board.columns().len(),
        next_key
    );
    ScannedBoard {
        board,
        config,
        columns,
        cards,
        toast: scan_toast(document),
        toast_dismiss: document
            .document_element()
            .map(|html| select_all(&html, TOAST_DISMISS_SELECTOR))
            .unwrap_or_default(),
    }
}

/// Find and read the board. None when the page has no board.
pub fn scan_document() -> Option<ScannedBoard> {
    let document = web_sys::window()?.document()?;
    let root = document.query_selector(BOARD_SELECTOR).ok().flatten()?;
    Some(scan_board(&document, &root))
}
