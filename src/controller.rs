//! Board Controller
//!
//! Drag lifecycle over the in-memory board:
//! Idle -> Dragging -> Dropped (optimistic) -> Confirmed | RolledBack -> Idle.
//! Dragging -> Idle on cancel.

use std::collections::BTreeMap;

use crate::board::Board;
use crate::commands::{LeadMover, MoveRequest};
use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::models::{Card, CardKey, ColumnIndex, LeadId, StatusCode};

/// The one in-progress drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub card: CardKey,
    pub origin: ColumnIndex,
    /// Sibling the card sat before, None when it was last
    pub origin_next: Option<CardKey>,
}

/// An optimistic move awaiting its persistence result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMove {
    pub card: CardKey,
    pub lead_id: LeadId,
    pub status: StatusCode,
    pub origin: ColumnIndex,
    pub origin_next: Option<CardKey>,
    pub target: ColumnIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No session or malformed markup
    Ignored,
    /// Dropped back on the origin column
    NoOp,
    Moved(PendingMove),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Confirmed,
    RolledBack,
}

#[derive(Debug, Clone, Default)]
pub struct BoardController {
    board: Board,
    session: Option<DragSession>,
    /// Column currently hinted as drop target
    hover: Option<ColumnIndex>,
    in_flight: BTreeMap<CardKey, PendingMove>,
    /// Set when a drag ends; a click in the same interaction is swallowed
    click_guard: bool,
}

impl BoardController {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    pub fn is_dragging(&self, card: CardKey) -> bool {
        self.session.as_ref().is_some_and(|s| s.card == card)
    }

    pub fn is_hovered(&self, column: ColumnIndex) -> bool {
        self.hover == Some(column)
    }

    pub fn is_pending(&self, card: CardKey) -> bool {
        self.in_flight.contains_key(&card)
    }

    /// A card can start a drag unless its own move is unsettled
    pub fn can_drag(&self, card: CardKey) -> bool {
        self.board.card(card).is_some() && !self.is_pending(card)
    }

    pub fn count(&self, column: ColumnIndex) -> usize {
        self.board.count(column)
    }

    pub fn begin_drag(&mut self, card: CardKey) -> BoardResult<()> {
        if self.session.is_some() {
            return Err(BoardError::DragInProgress);
        }
        if self.is_pending(card) {
            return Err(BoardError::MovePending(card));
        }
        let origin = self.board.column_of(card).ok_or(BoardError::UnknownCard(card))?;
        self.session = Some(DragSession {
            card,
            origin,
            origin_next: self.board.next_sibling(card),
        });
        self.click_guard = true;
        log::debug!("[KANBAN] drag start card={:?} origin={}", card, origin);
        Ok(())
    }

    /// Returns whether the hint was applied
    pub fn drag_over(&mut self, column: ColumnIndex) -> bool {
        if self.session.is_none() || self.board.column(column).is_none() {
            return false;
        }
        self.hover = Some(column);
        true
    }

    pub fn drag_leave(&mut self, column: ColumnIndex) {
        if self.hover == Some(column) {
            self.hover = None;
        }
    }

    /// Optimistically move the dragged card into `column`
    pub fn drop_on(&mut self, column: ColumnIndex) -> DropOutcome {
        self.drag_leave(column);

        let Some(session) = self.session.clone() else {
            return DropOutcome::Ignored;
        };
        let Some(status) = self.board.column(column).and_then(|c| c.status.clone()) else {
            return DropOutcome::Ignored;
        };
        let Some(lead_id) = self.board.card(session.card).and_then(|c| c.lead_id.clone()) else {
            return DropOutcome::Ignored;
        };
        if column == session.origin {
            return DropOutcome::NoOp;
        }

        self.session = None;
        self.board.move_to_end(session.card, column);
        let pending = PendingMove {
            card: session.card,
            lead_id,
            status,
            origin: session.origin,
            origin_next: session.origin_next,
            target: column,
        };
        self.in_flight.insert(session.card, pending.clone());
        log::info!(
            "[KANBAN] moved lead {} to {} ({} -> {})",
            pending.lead_id,
            pending.status,
            self.count(pending.origin),
            self.count(pending.target)
        );
        DropOutcome::Moved(pending)
    }

    /// Put the card back exactly where it was
    pub fn rollback(&mut self, pending: &PendingMove) {
        self.board
            .insert_before(pending.card, pending.origin, pending.origin_next);
        log::warn!(
            "[KANBAN] rolled back lead {} (counts {} / {})",
            pending.lead_id,
            self.count(pending.origin),
            self.count(pending.target)
        );
    }

    /// Apply a persistence result to the card's pending move
    pub fn reconcile(&mut self, card: CardKey, result: BoardResult<()>) -> Option<MoveOutcome> {
        let pending = self.in_flight.remove(&card)?;
        match result {
            Ok(()) => Some(MoveOutcome::Confirmed),
            Err(e) => {
                log::warn!("[KANBAN] move of lead {} failed: {}", pending.lead_id, e);
                self.rollback(&pending);
                Some(MoveOutcome::RolledBack)
            }
        }
    }

    /// Cleanup for every drag, whatever happened to it
    pub fn end_drag(&mut self) {
        self.session = None;
        self.hover = None;
    }

    pub fn clear_click_guard(&mut self) {
        self.click_guard = false;
    }

    /// Detail URL to open on click, unless the click closes a drag
    pub fn click(&self, card: CardKey, config: &BoardConfig) -> Option<String> {
        if self.click_guard {
            return None;
        }
        let lead = self.board.card(card)?.lead_id.as_ref()?;
        config.detail_url_for(lead)
    }
}

/// Send one move request for an optimistic move. Never retries.
pub async fn persist_move<M: LeadMover + ?Sized>(
    mover: &M,
    config: &BoardConfig,
    card: &Card,
    pending: &PendingMove,
    csrf_token: String,
) -> BoardResult<()> {
    let request = MoveRequest::build(config, card, &pending.status, csrf_token)?;
    mover.move_lead(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::cell::RefCell;

    struct RecordingMover {
        fail_with: Option<BoardError>,
        sent: RefCell<Vec<MoveRequest>>,
    }

    impl RecordingMover {
        fn ok() -> Self {
            Self {
                fail_with: None,
                sent: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: BoardError) -> Self {
            Self {
                fail_with: Some(err),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl LeadMover for RecordingMover {
        async fn move_lead(&self, request: &MoveRequest) -> BoardResult<()> {
            self.sent.borrow_mut().push(request.clone());
            match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }
    }

    const APPLIED: ColumnIndex = 0;
    const INTERVIEW: ColumnIndex = 1;

    /// applied: L1, L2 / interview: empty
    fn scenario() -> BoardController {
        let mut board = Board::new();
        let applied = board.add_column(StatusCode::parse("applied"), "Applied");
        board.add_column(StatusCode::parse("interview"), "Interview");
        board.add_card(applied, Card::new(CardKey(1), LeadId::parse("L1")));
        board.add_card(applied, Card::new(CardKey(2), LeadId::parse("L2")));
        BoardController::new(board)
    }

    fn leads(ctl: &BoardController, column: ColumnIndex) -> Vec<String> {
        ctl.board()
            .card_keys(column)
            .into_iter()
            .map(|k| ctl.board().card(k).unwrap().lead_id.clone().unwrap().to_string())
            .collect()
    }

    fn drag_and_drop(ctl: &mut BoardController, card: u32, column: ColumnIndex) -> DropOutcome {
        ctl.begin_drag(CardKey(card)).unwrap();
        assert!(ctl.drag_over(column));
        let outcome = ctl.drop_on(column);
        ctl.end_drag();
        outcome
    }

    fn run_move(
        ctl: &mut BoardController,
        mover: &RecordingMover,
        card: u32,
        column: ColumnIndex,
    ) -> Option<MoveOutcome> {
        let DropOutcome::Moved(pending) = drag_and_drop(ctl, card, column) else {
            return None;
        };
        let card = ctl.board().card(pending.card).cloned().unwrap();
        let config = BoardConfig::default();
        let result = block_on(persist_move(mover, &config, &card, &pending, "tok".into()));
        ctl.reconcile(pending.card, result)
    }

    #[test]
    fn test_successful_move() {
        let mut ctl = scenario();
        let mover = RecordingMover::ok();

        let outcome = run_move(&mut ctl, &mover, 1, INTERVIEW);

        assert_eq!(outcome, Some(MoveOutcome::Confirmed));
        assert_eq!(leads(&ctl, APPLIED), vec!["L2"]);
        assert_eq!(leads(&ctl, INTERVIEW), vec!["L1"]);
        assert_eq!(ctl.count(APPLIED), 1);
        assert_eq!(ctl.count(INTERVIEW), 1);

        let sent = mover.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "/jobs/kanban/L1/move/");
        assert_eq!(sent[0].body, "status=interview");
        assert_eq!(sent[0].csrf_token, "tok");
        assert!(!ctl.is_pending(CardKey(1)));
    }

    #[test]
    fn test_failed_move_restores_initial_state() {
        let mut ctl = scenario();
        let before = ctl.board().clone();
        let mover = RecordingMover::failing(BoardError::Http(500));

        let outcome = run_move(&mut ctl, &mover, 1, INTERVIEW);

        assert_eq!(outcome, Some(MoveOutcome::RolledBack));
        assert_eq!(ctl.board(), &before);
        assert_eq!(leads(&ctl, APPLIED), vec!["L1", "L2"]);
        assert_eq!(ctl.count(INTERVIEW), 0);
        assert_eq!(mover.sent.borrow().len(), 1);
    }

    #[test]
    fn test_counts_after_optimistic_move() {
        let mut ctl = scenario();
        let DropOutcome::Moved(pending) = drag_and_drop(&mut ctl, 2, INTERVIEW) else {
            panic!("expected a move");
        };
        // visible before the request settles
        assert_eq!(ctl.count(APPLIED), 1);
        assert_eq!(ctl.count(INTERVIEW), 1);
        assert!(ctl.is_pending(pending.card));
        assert_eq!(pending.origin_next, None);
    }

    #[test]
    fn test_rollback_restores_middle_position() {
        let mut board = Board::new();
        let a = board.add_column(StatusCode::parse("applied"), "Applied");
        let b = board.add_column(StatusCode::parse("interview"), "Interview");
        for k in 1..=4 {
            board.add_card(a, Card::new(CardKey(k), LeadId::parse(&format!("L{}", k))));
        }
        board.add_card(b, Card::new(CardKey(9), LeadId::parse("L9")));
        let mut ctl = BoardController::new(board);
        let mover = RecordingMover::failing(BoardError::Network("offline".into()));

        assert_eq!(run_move(&mut ctl, &mover, 3, b), Some(MoveOutcome::RolledBack));

        assert_eq!(leads(&ctl, a), vec!["L1", "L2", "L3", "L4"]);
        assert_eq!(ctl.board().column(a).unwrap().position_of(CardKey(3)), Some(2));
        assert_eq!(leads(&ctl, b), vec!["L9"]);
    }

    #[test]
    fn test_drop_on_origin_is_noop() {
        let mut ctl = scenario();
        let before = ctl.board().clone();

        assert_eq!(drag_and_drop(&mut ctl, 1, APPLIED), DropOutcome::NoOp);
        assert_eq!(ctl.board(), &before);
        assert!(!ctl.is_pending(CardKey(1)));
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_malformed_markup_is_ignored() {
        let mut board = Board::new();
        let a = board.add_column(StatusCode::parse("applied"), "Applied");
        let untagged = board.add_column(None, "Broken");
        let b = board.add_column(StatusCode::parse("interview"), "Interview");
        board.add_card(a, Card::new(CardKey(1), LeadId::parse("L1")));
        board.add_card(a, Card::new(CardKey(2), None));
        let mut ctl = BoardController::new(board);
        let before = ctl.board().clone();

        assert_eq!(drag_and_drop(&mut ctl, 1, untagged), DropOutcome::Ignored);
        assert_eq!(drag_and_drop(&mut ctl, 2, b), DropOutcome::Ignored);
        assert_eq!(ctl.board(), &before);
    }

    #[test]
    fn test_drop_without_session() {
        let mut ctl = scenario();
        assert!(!ctl.drag_over(INTERVIEW));
        assert_eq!(ctl.drop_on(INTERVIEW), DropOutcome::Ignored);
    }

    #[test]
    fn test_missing_move_url_rolls_back_without_request() {
        let mut ctl = scenario();
        let mover = RecordingMover::ok();
        let config = BoardConfig { move_url_pattern: String::new(), ..BoardConfig::default() };
        let DropOutcome::Moved(pending) = drag_and_drop(&mut ctl, 1, INTERVIEW) else {
            panic!("expected a move");
        };

        let card = ctl.board().card(pending.card).cloned().unwrap();
        let result = block_on(persist_move(&mover, &config, &card, &pending, String::new()));
        assert_eq!(result, Err(BoardError::MissingMoveUrl));
        assert_eq!(ctl.reconcile(pending.card, result), Some(MoveOutcome::RolledBack));
        assert!(mover.sent.borrow().is_empty());
        assert_eq!(leads(&ctl, APPLIED), vec!["L1", "L2"]);
    }

    #[test]
    fn test_single_session() {
        let mut ctl = scenario();
        ctl.begin_drag(CardKey(1)).unwrap();
        assert_eq!(ctl.begin_drag(CardKey(2)), Err(BoardError::DragInProgress));
        assert_eq!(ctl.phase(), DragPhase::Dragging);
        assert!(ctl.is_dragging(CardKey(1)));

        // cancel
        ctl.end_drag();
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert!(!ctl.is_dragging(CardKey(1)));
        assert_eq!(ctl.begin_drag(CardKey(99)), Err(BoardError::UnknownCard(CardKey(99))));
    }

    #[test]
    fn test_pending_card_cannot_be_dragged() {
        let mut ctl = scenario();
        let DropOutcome::Moved(pending) = drag_and_drop(&mut ctl, 1, INTERVIEW) else {
            panic!("expected a move");
        };
        assert!(!ctl.can_drag(CardKey(1)));
        assert_eq!(ctl.begin_drag(CardKey(1)), Err(BoardError::MovePending(CardKey(1))));

        // other cards stay independent
        assert!(ctl.can_drag(CardKey(2)));

        ctl.reconcile(pending.card, Ok(()));
        assert!(ctl.can_drag(CardKey(1)));
        assert_eq!(ctl.reconcile(pending.card, Ok(())), None);
    }

    #[test]
    fn test_overlapping_moves_keep_counts_consistent() {
        let mut ctl = scenario();
        let DropOutcome::Moved(first) = drag_and_drop(&mut ctl, 1, INTERVIEW) else {
            panic!("expected a move");
        };
        let DropOutcome::Moved(second) = drag_and_drop(&mut ctl, 2, INTERVIEW) else {
            panic!("expected a move");
        };
        assert_eq!(ctl.count(APPLIED), 0);
        assert_eq!(ctl.count(INTERVIEW), 2);

        ctl.reconcile(first.card, Err(BoardError::Http(500)));
        assert_eq!(leads(&ctl, APPLIED), vec!["L1"]);
        ctl.reconcile(second.card, Err(BoardError::Http(500)));
        assert_eq!(leads(&ctl, APPLIED), vec!["L1", "L2"]);

        for col in [APPLIED, INTERVIEW] {
            assert_eq!(ctl.count(col), ctl.board().card_keys(col).len());
        }
    }

    #[test]
    fn test_hover_hint() {
        let mut ctl = scenario();
        ctl.begin_drag(CardKey(1)).unwrap();
        assert!(ctl.drag_over(INTERVIEW));
        assert!(ctl.is_hovered(INTERVIEW));
        ctl.drag_leave(APPLIED);
        assert!(ctl.is_hovered(INTERVIEW));
        ctl.drag_leave(INTERVIEW);
        assert!(!ctl.is_hovered(INTERVIEW));
    }

    #[test]
    fn test_click_after_drag_is_suppressed() {
        let config = BoardConfig::default();
        let mut ctl = scenario();

        assert_eq!(ctl.click(CardKey(1), &config).as_deref(), Some("/jobs/offres/L1/"));

        drag_and_drop(&mut ctl, 1, INTERVIEW);
        assert_eq!(ctl.click(CardKey(1), &config), None);

        ctl.clear_click_guard();
        assert_eq!(ctl.click(CardKey(1), &config).as_deref(), Some("/jobs/offres/L1/"));
    }
}
