//! Board Configuration
//!
//! Optional JSON in the board root's `data-board-config` attribute.
//! Every field has a default so the attribute can be omitted entirely.

use serde::Deserialize;

use crate::error::{BoardError, BoardResult};
use crate::models::LeadId;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Fallback move endpoint, `{id}` is replaced by the lead id
    pub move_url_pattern: String,
    /// Detail page opened by a plain click
    pub detail_url_pattern: String,
    /// Form field carrying the new status
    pub status_field: String,
    pub csrf_cookie: String,
    /// Hidden form input used when the cookie is absent
    pub csrf_input: String,
    pub toast_ms: u32,
    pub success_message: String,
    pub failure_message: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            move_url_pattern: "/jobs/kanban/{id}/move/".to_string(),
            detail_url_pattern: "/jobs/offres/{id}/".to_string(),
            status_field: "status".to_string(),
            csrf_cookie: "csrftoken".to_string(),
            csrf_input: "csrfmiddlewaretoken".to_string(),
            toast_ms: 2500,
            success_message: "Statut mis à jour ✅".to_string(),
            failure_message: "Impossible de mettre à jour".to_string(),
        }
    }
}

impl BoardConfig {
    /// Parse the attribute value; blank means defaults
    pub fn from_json(raw: &str) -> BoardResult<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|e| BoardError::Config(e.to_string()))
    }

    pub fn move_url_for(&self, lead: &LeadId) -> Option<String> {
        expand(&self.move_url_pattern, lead)
    }

    pub fn detail_url_for(&self, lead: &LeadId) -> Option<String> {
        expand(&self.detail_url_pattern, lead)
    }
}

fn expand(pattern: &str, lead: &LeadId) -> Option<String> {
    if pattern.is_empty() {
        return None;
    }
    Some(pattern.replace("{id}", lead.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_default() {
        assert_eq!(BoardConfig::from_json("").unwrap(), BoardConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let cfg = BoardConfig::from_json(r#"{"toast_ms": 1000, "csrf_cookie": "xsrf"}"#).unwrap();
        assert_eq!(cfg.toast_ms, 1000);
        assert_eq!(cfg.csrf_cookie, "xsrf");
        assert_eq!(cfg.status_field, "status");
    }

    #[test]
    fn test_invalid_json() {
        let err = BoardConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, BoardError::Config(_)));
    }

    #[test]
    fn test_url_patterns() {
        let cfg = BoardConfig::default();
        let lead = LeadId::parse("17").unwrap();
        assert_eq!(cfg.move_url_for(&lead).as_deref(), Some("/jobs/kanban/17/move/"));
        assert_eq!(cfg.detail_url_for(&lead).as_deref(), Some("/jobs/offres/17/"));

        let cfg = BoardConfig { move_url_pattern: String::new(), ..BoardConfig::default() };
        assert_eq!(cfg.move_url_for(&lead), None);
    }
}
