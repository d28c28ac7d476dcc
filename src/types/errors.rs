use thiserror::Error;

use super::tab::{GroupId, TabId};

// === HostError ===

/// Errors reported by the host tab/group API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// No tab with the given id exists.
    #[error("No tab with id: {0}")]
    TabNotFound(TabId),
    /// No group with the given id exists.
    #[error("No group with id: {0}")]
    GroupNotFound(GroupId),
    /// The host refused the operation.
    #[error("{0}")]
    Rejected(String),
}

// === HistoryError ===

/// Errors related to most-recently-used tab history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// Fewer than two live tabs remain in the window's history.
    #[error("No previous tab")]
    NoPreviousTab,
    /// The host failed while checking whether a history entry is still live.
    #[error(transparent)]
    Host(#[from] HostError),
}

// === CommandError ===

/// Errors surfaced as `{"success": false, "error": ...}` responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The referenced tab or group no longer exists.
    #[error("{0}")]
    NotFound(String),
    /// The host refused the operation.
    #[error("{0}")]
    HostRejected(String),
    /// A batch operation resolved to zero targets.
    #[error("{0}")]
    EmptyTarget(String),
    /// History has no live previous tab to switch to.
    #[error("No previous tab")]
    NoPreviousTab,
    /// Some members of an independent batch failed.
    #[error("{failed} of {total} operations failed: {first}")]
    BatchFailed {
        failed: usize,
        total: usize,
        first: String,
    },
    /// The request could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<HostError> for CommandError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::TabNotFound(_) | HostError::GroupNotFound(_) => {
                CommandError::NotFound(err.to_string())
            }
            HostError::Rejected(msg) => CommandError::HostRejected(msg),
        }
    }
}

impl From<HistoryError> for CommandError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::NoPreviousTab => CommandError::NoPreviousTab,
            HistoryError::Host(host) => host.into(),
        }
    }
}

// === DragError ===

/// Errors related to starting a drag gesture in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DragError {
    /// Pinned tabs cannot be dragged.
    #[error("Pinned tab cannot be dragged: {0}")]
    PinnedTab(TabId),
    /// The tab is not part of the current snapshot.
    #[error("Tab not in current view: {0}")]
    UnknownTab(TabId),
    /// The group is not part of the current snapshot.
    #[error("Group not in current view: {0}")]
    UnknownGroup(GroupId),
}

// === SettingsError ===

/// Errors related to panel settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O operation failed.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The settings file could not be parsed or a value had the wrong shape.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The dot-path key does not name a setting.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value is outside the accepted range.
    #[error("Invalid settings value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

// === LocaleError ===

/// Errors related to localization.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The requested locale is not supported.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),
    /// An embedded catalog failed to parse.
    #[error("Failed to parse locale catalog {locale}: {reason}")]
    InvalidCatalog { locale: String, reason: String },
}

// === StartupError ===

/// Errors raised while assembling the coordinator.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Locale(#[from] LocaleError),
}
