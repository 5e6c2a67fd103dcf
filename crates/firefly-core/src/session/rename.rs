//! Rename dialog working state.

use super::model::{SessionId, SessionSummary};
use serde::Serialize;

/// Staging state for the rename dialog.
///
/// `edit_title` is a working copy; the committed title in [`SessionSummary`]
/// only changes after the backend accepts the rename and the list is refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameDialogState {
    pub open: bool,
    pub session_id: Option<SessionId>,
    pub current_title: String,
    pub edit_title: String,
    /// Rejection text returned by the backend for the last save attempt.
    pub error: Option<String>,
}

impl RenameDialogState {
    /// Opens the dialog for the given session, seeding the edit buffer with its title.
    pub fn open_for(session: &SessionSummary) -> Self {
        Self {
            open: true,
            session_id: Some(session.id),
            current_title: session.title.clone(),
            edit_title: session.title.clone(),
            error: None,
        }
    }

    /// Save is enabled once a target is set and the trimmed title is non-empty.
    pub fn can_save(&self) -> bool {
        self.session_id.is_some() && !self.edit_title.trim().is_empty()
    }

    /// Returns the target and trimmed title when the dialog can be saved.
    pub fn save_request(&self) -> Option<(SessionId, String)> {
        if !self.can_save() {
            return None;
        }
        self.session_id
            .map(|id| (id, self.edit_title.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_open_for_seeds_both_titles() {
        let summary = SessionSummary::new(3, "Chat A", Utc::now());
        let dialog = RenameDialogState::open_for(&summary);
        assert!(dialog.open);
        assert_eq!(dialog.session_id, Some(SessionId(3)));
        assert_eq!(dialog.current_title, "Chat A");
        assert_eq!(dialog.edit_title, "Chat A");
        assert!(dialog.can_save());
    }

    #[test]
    fn test_blank_title_disables_save() {
        let summary = SessionSummary::new(3, "Chat A", Utc::now());
        let mut dialog = RenameDialogState::open_for(&summary);
        dialog.edit_title = "   ".to_string();
        assert!(!dialog.can_save());
        assert_eq!(dialog.save_request(), None);
    }

    #[test]
    fn test_save_request_trims_title() {
        let summary = SessionSummary::new(3, "Chat A", Utc::now());
        let mut dialog = RenameDialogState::open_for(&summary);
        dialog.edit_title = "  Renamed  ".to_string();
        assert_eq!(
            dialog.save_request(),
            Some((SessionId(3), "Renamed".to_string()))
        );
    }

    #[test]
    fn test_closed_dialog_cannot_save() {
        let dialog = RenameDialogState::default();
        assert!(!dialog.can_save());
    }
}
