//! Board Context
//!
//! Copyable handle over the board's signals, shared by every page listener.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands::HttpLeadMover;
use crate::components::ToastHandle;
use crate::config::BoardConfig;
use crate::controller::{persist_move, BoardController, DragPhase, DropOutcome, MoveOutcome};
use crate::csrf::csrf_token;
use crate::models::{CardKey, ColumnIndex};

/// Board-wide handles
#[derive(Clone, Copy)]
pub struct BoardContext {
    pub controller: RwSignal<BoardController>,
    pub config: StoredValue<BoardConfig>,
    pub toast: ToastHandle,
}

impl BoardContext {
    pub fn new(controller: BoardController, config: BoardConfig) -> Self {
        let toast = ToastHandle::new(config.toast_ms);
        Self {
            controller: RwSignal::new(controller),
            config: StoredValue::new(config),
            toast,
        }
    }

    /// Returns false when the drag must be refused
    pub fn begin_drag(&self, card: CardKey) -> bool {
        match self.controller.try_update(|c| c.begin_drag(card)) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                log::debug!("[KANBAN] drag refused: {}", e);
                false
            }
            None => false,
        }
    }

    pub fn drag_over(&self, column: ColumnIndex) {
        // dragover fires continuously, only touch the signal on change.
        // Idle means something else is dragged over the page (files, text).
        let skip = self
            .controller
            .with_untracked(|c| c.phase() == DragPhase::Idle || c.is_hovered(column));
        if skip {
            return;
        }
        self.controller.update(|c| {
            c.drag_over(column);
        });
    }

    pub fn drag_leave(&self, column: ColumnIndex) {
        if self.controller.with_untracked(|c| c.is_hovered(column)) {
            self.controller.update(|c| c.drag_leave(column));
        }
    }

    pub fn end_drag(&self) {
        self.controller.update(|c| c.end_drag());
    }

    pub fn settle_click(&self) {
        self.controller.update_untracked(|c| c.clear_click_guard());
    }

    /// Optimistic move, then persist and reconcile in the background
    pub fn drop_on(&self, column: ColumnIndex) {
        let outcome = self.controller.try_update(|c| c.drop_on(column));
        let Some(DropOutcome::Moved(pending)) = outcome else {
            return;
        };
        let Some(card) = self
            .controller
            .with_untracked(|c| c.board().card(pending.card).cloned())
        else {
            return;
        };

        let ctx = *self;
        spawn_local(async move {
            let config = ctx.config.get_value();
            let token = csrf_token(&config);
            let result = persist_move(&HttpLeadMover, &config, &card, &pending, token).await;
            let outcome = ctx
                .controller
                .try_update(|c| c.reconcile(pending.card, result))
                .flatten();
            match outcome {
                Some(MoveOutcome::Confirmed) => ctx.toast.show(config.success_message),
                Some(MoveOutcome::RolledBack) => ctx.toast.show(config.failure_message),
                None => {}
            }
        });
    }

    /// Detail page for a plain click
    pub fn open_detail(&self, card: CardKey) {
        let url = self
            .config
            .with_value(|cfg| self.controller.with_untracked(|c| c.click(card, cfg)));
        let Some(url) = url else {
            return;
        };
        if let Some(win) = web_sys::window() {
            if let Err(e) = win.location().set_href(&url) {
                log::error!("[KANBAN] navigation to {} failed: {:?}", url, e);
            }
        }
    }
}
