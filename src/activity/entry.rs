//! Activity entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User-triggered actions that are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    FetchPage,
    Refresh,
    ClearCache,
    CreateFile,
    Backup,
    DeleteWithBackup,
    Restore,
    DeleteCache,
    SaveSettings,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Action::FetchPage => "FETCH_PAGE",
            Action::Refresh => "REFRESH",
            Action::ClearCache => "CLEAR_CACHE",
            Action::CreateFile => "CREATE_FILE",
            Action::Backup => "BACKUP",
            Action::DeleteWithBackup => "DELETE_WITH_BACKUP",
            Action::Restore => "RESTORE",
            Action::DeleteCache => "DELETE_CACHE",
            Action::SaveSettings => "SAVE_SETTINGS",
        };
        write!(f, "{}", label)
    }
}

/// Whether the action succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn from_flag(ok: bool) -> Self {
        if ok {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// A single activity log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// When the action happened (UTC)
    pub timestamp: DateTime<Utc>,

    pub action: Action,

    /// Page number or file name the action applied to
    pub target: String,

    pub outcome: Outcome,

    /// Extra context, typically the error message on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ActivityEntry {
    pub fn success(action: Action, target: impl Into<String>) -> Self {
        Self::new(action, target, Outcome::Success, None)
    }

    pub fn failure(action: Action, target: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(action, target, Outcome::Failure, Some(detail.into()))
    }

    /// Entry for a boolean-reporting file operation
    pub fn from_flag(action: Action, target: impl Into<String>, ok: bool) -> Self {
        Self::new(action, target, Outcome::from_flag(ok), None)
    }

    fn new(
        action: Action,
        target: impl Into<String>,
        outcome: Outcome,
        detail: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            target: target.into(),
            outcome,
            detail,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let marker = match self.outcome {
            Outcome::Success => "ok",
            Outcome::Failure => "FAILED",
        };

        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.target,
            marker
        );

        if let Some(detail) = &self.detail {
            output.push_str(&format!(" ({})", detail));
        }

        output
    }
}
