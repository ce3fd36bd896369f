//! Error types for settings operations.

use quill_store::StoreError;
use thiserror::Error;

use crate::model::SettingField;

/// Raised when the access point is used without an enclosing provider scope.
///
/// This is a wiring defect in the caller, not a runtime condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("settings accessed outside a SettingsProvider scope")]
    OutsideScope,
}

/// Errors that can occur during settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The durable store failed to read or write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The access point was used outside a provider scope.
    #[error(transparent)]
    Scope(#[from] ScopeError),

    /// A textual value could not be converted to the field's type.
    #[error("invalid value {value:?} for {field}: {reason}")]
    InvalidValue {
        field: SettingField,
        value: String,
        reason: String,
    },

    /// No setting has this name.
    #[error("unknown setting: {0}")]
    UnknownField(String),

    /// The configuration document is malformed or inconsistent.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
