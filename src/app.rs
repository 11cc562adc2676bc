//! Lead Board App
//!
//! Wires the board model onto the page's own markup. Nothing is re-rendered:
//! effects project counts, drag classes and card order onto the scanned nodes.

use std::collections::BTreeMap;
use std::rc::Rc;

use leptos::prelude::*;
use leptos_dragdrop::{
    bind_event, defer, is_interactive_target, make_on_dragend, make_on_dragleave,
    make_on_dragover, make_on_drop, make_on_dragstart,
};
use web_sys::{DragEvent, Element, MouseEvent};

use crate::components::{Toast, ToastHandle};
use crate::context::BoardContext;
use crate::controller::BoardController;
use crate::dom::{ColumnElements, PageToast, ScannedBoard};
use crate::models::{CardKey, ColumnIndex};

/// Hook the scanned board up. The returned context stays alive with the page.
pub fn mount(scanned: ScannedBoard) -> BoardContext {
    let _ = any_spawner::Executor::init_wasm_bindgen();

    let ScannedBoard {
        board,
        config,
        columns,
        cards,
        toast,
        toast_dismiss,
    } = scanned;

    let owner = Owner::new();
    let ctx = owner.with(|| {
        let ctx = BoardContext::new(BoardController::new(board), config);
        let cards = Rc::new(cards);
        for (index, column) in columns.into_iter().enumerate() {
            wire_column(ctx, index, column, cards.clone());
        }
        for (key, el) in cards.iter() {
            wire_card(ctx, *key, el.clone());
        }
        wire_toast(ctx.toast, toast, toast_dismiss);
        ctx
    });
    // Listeners are bound for the page's lifetime, so is their reactive scope
    std::mem::forget(owner);
    ctx
}

fn wire_column(
    ctx: BoardContext,
    index: ColumnIndex,
    column: ColumnElements,
    cards: Rc<BTreeMap<CardKey, Element>>,
) {
    let ColumnElements { list, count } = column;

    if !list.has_attribute("tabindex") {
        let _ = list.set_attribute("tabindex", "0");
    }

    bind_event::<DragEvent, _>(
        &list,
        "dragover",
        make_on_dragover(move || ctx.drag_over(index)),
    );
    bind_event::<DragEvent, _>(
        &list,
        "dragleave",
        make_on_dragleave(move || ctx.drag_leave(index)),
    );
    bind_event::<DragEvent, _>(
        &list,
        "drop",
        make_on_drop(move || {
            ctx.drop_on(index);
            // The source card may have moved lists and never see dragend
            ctx.end_drag();
            defer(0, move || ctx.settle_click());
        }),
    );

    let over = list.clone();
    Effect::new(move |_| {
        let hovered = ctx.controller.with(|c| c.is_hovered(index));
        let _ = over.class_list().toggle_with_force("is-over", hovered);
    });

    // Counts come straight from membership
    if let Some(count) = count {
        Effect::new(move |_| {
            let n = ctx.controller.with(|c| c.count(index));
            count.set_text_content(Some(&n.to_string()));
        });
    }

    let order = Memo::new(move |_| ctx.controller.with(|c| c.board().card_keys(index)));
    Effect::new(move |prev: Option<()>| {
        let keys = order.get();
        // The page already shows the scanned order
        if prev.is_none() {
            return;
        }
        for key in keys {
            if let Some(el) = cards.get(&key) {
                let _ = list.append_child(el);
            }
        }
    });
}

fn wire_card(ctx: BoardContext, key: CardKey, el: Element) {
    let payload = ctx
        .controller
        .with_untracked(|c| c.board().card(key).and_then(|card| card.lead_id.clone()))
        .map(|id| id.to_string())
        .unwrap_or_default();

    bind_event::<DragEvent, _>(
        &el,
        "dragstart",
        make_on_dragstart(payload, move || ctx.begin_drag(key)),
    );
    bind_event::<DragEvent, _>(
        &el,
        "dragend",
        make_on_dragend(move || ctx.end_drag(), move || ctx.settle_click()),
    );
    bind_event(&el, "click", move |ev: MouseEvent| {
        if is_interactive_target(&ev) {
            return;
        }
        ctx.open_detail(key);
    });

    Effect::new(move |_| {
        let (dragging, pending, draggable) = ctx
            .controller
            .with(|c| (c.is_dragging(key), c.is_pending(key), c.can_drag(key)));
        let classes = el.class_list();
        let _ = classes.toggle_with_force("is-dragging", dragging);
        let _ = classes.toggle_with_force("is-pending", pending);
        // No second drag while this card's move is unsettled
        let _ = el.set_attribute("draggable", if draggable { "true" } else { "false" });
    });
}

/// Drive the page's toast when it has one, otherwise mount our own
fn wire_toast(toast: ToastHandle, page: Option<PageToast>, dismiss: Vec<Element>) {
    for button in dismiss {
        bind_event(&button, "click", move |_: MouseEvent| toast.hide());
    }

    let Some(PageToast { root, message }) = page else {
        leptos::mount::mount_to_body(move || view! { <Toast toast=toast /> });
        return;
    };
    Effect::new(move |_| {
        let visible = toast.is_visible();
        let _ = root.class_list().toggle_with_force("is-visible", visible);
    });
    if let Some(message) = message {
        Effect::new(move |_| {
            let text = toast.message();
            message.set_text_content(Some(&text));
        });
    }
}
