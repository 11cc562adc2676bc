//! Board Models
//!
//! Cards and columns as read from the server-rendered page.

/// Stable handle for a card, assigned when the page is scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey(pub u32);

/// Index of a column in board order
pub type ColumnIndex = usize;

/// Lead identifier from `data-lead-id`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeadId(String);

impl LeadId {
    /// Blank identifiers count as missing
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LeadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline stage tag from `data-status` (e.g. "applied", "interview")
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusCode(String);

impl StatusCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One lead card
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub key: CardKey,
    pub lead_id: Option<LeadId>,
    /// Per-card endpoint from `data-move-url`
    pub move_url: Option<String>,
}

impl Card {
    pub fn new(key: CardKey, lead_id: Option<LeadId>) -> Self {
        Self {
            key,
            lead_id,
            move_url: None,
        }
    }
}

/// One pipeline column. Membership order is display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: Option<StatusCode>,
    pub title: String,
    pub cards: Vec<CardKey>,
}

impl Column {
    pub fn new(status: Option<StatusCode>, title: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn position_of(&self, card: CardKey) -> Option<usize> {
        self.cards.iter().position(|k| *k == card)
    }
}
