//! Board Model
//!
//! In-memory source of truth: column -> ordered card keys.
//! The rendered page is a projection of this.

use std::collections::BTreeMap;

use crate::models::{Card, CardKey, Column, ColumnIndex, StatusCode};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    columns: Vec<Column>,
    cards: BTreeMap<CardKey, Card>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column and return its index
    pub fn add_column(
        &mut self,
        status: Option<StatusCode>,
        title: impl Into<String>,
    ) -> ColumnIndex {
        self.columns.push(Column::new(status, title));
        self.columns.len() - 1
    }

    /// Append a card at the end of a column.
    /// Returns false when the column doesn't exist or the key is already used.
    pub fn add_card(&mut self, column: ColumnIndex, card: Card) -> bool {
        if column >= self.columns.len() || self.cards.contains_key(&card.key) {
            return false;
        }
        self.columns[column].cards.push(card.key);
        self.cards.insert(card.key, card);
        true
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: ColumnIndex) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn card(&self, key: CardKey) -> Option<&Card> {
        self.cards.get(&key)
    }

    /// Column currently holding the card
    pub fn column_of(&self, card: CardKey) -> Option<ColumnIndex> {
        self.columns.iter().position(|c| c.cards.contains(&card))
    }

    /// Card directly after `card` in its column, if any
    pub fn next_sibling(&self, card: CardKey) -> Option<CardKey> {
        let column = self.column_of(card)?;
        let col = &self.columns[column];
        let pos = col.position_of(card)?;
        col.cards.get(pos + 1).copied()
    }

    /// Number of cards in a column, always derived from membership
    pub fn count(&self, column: ColumnIndex) -> usize {
        self.columns.get(column).map(Column::count).unwrap_or(0)
    }

    /// Card keys of a column in display order
    pub fn card_keys(&self, column: ColumnIndex) -> Vec<CardKey> {
        self.columns
            .get(column)
            .map(|c| c.cards.clone())
            .unwrap_or_default()
    }

    /// Detach the card from whatever column holds it
    fn detach(&mut self, card: CardKey) -> Option<ColumnIndex> {
        let column = self.column_of(card)?;
        self.columns[column].cards.retain(|k| *k != card);
        Some(column)
    }

    /// Move a card to the end of `target`
    pub fn move_to_end(&mut self, card: CardKey, target: ColumnIndex) -> bool {
        self.insert_before(card, target, None)
    }

    /// Move a card into `target` right before `before`.
    /// Falls back to the end of the column when `before` is None or no longer in `target`.
    pub fn insert_before(
        &mut self,
        card: CardKey,
        target: ColumnIndex,
        before: Option<CardKey>,
    ) -> bool {
        let known = target < self.columns.len() && self.cards.contains_key(&card);
        if !known || before == Some(card) {
            return false;
        }
        self.detach(card);
        let cards = &mut self.columns[target].cards;
        match before.and_then(|b| cards.iter().position(|k| *k == b)) {
            Some(pos) => cards.insert(pos, card),
            None => cards.push(card),
        }
        true
    }
}
