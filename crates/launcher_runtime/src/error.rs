//! Runtime error taxonomy.
//!
//! Only programming errors and configuration failures surface here. Expected absences (a missing
//! privileged helper) and inconsistent derived settings are recovered where they occur and never
//! become a [`RuntimeError`].

use platform_host::StateListenerError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors surfaced by the launcher runtime.
pub enum RuntimeError {
    /// Configuration could not be read or failed validation.
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A second binding for the same setting and effect was requested in one scope.
    #[error("binding `{effect}` for setting `{setting}` is already active")]
    DuplicateBinding {
        setting: &'static str,
        effect: &'static str,
    },

    /// The binding scope was already cancelled.
    #[error("binding scope is closed")]
    ScopeClosed,

    #[error("state listener error: {0}")]
    StateListener(#[from] StateListenerError),

    /// A bound side effect failed while applying a setting value.
    #[error("effect `{effect}` failed for setting `{setting}`: {message}")]
    Effect {
        setting: &'static str,
        effect: &'static str,
        message: String,
    },

    #[error("task spawn error: {0}")]
    Spawn(#[from] futures::task::SpawnError),

    #[error("worker pool error: {0}")]
    WorkerPool(String),
}

/// Convenience type alias for runtime results.
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_error_converts() {
        let err: RuntimeError = StateListenerError::AlreadyRegistered.into();
        assert!(matches!(err, RuntimeError::StateListener(_)));
        assert_eq!(
            err.to_string(),
            "state listener error: state listener is already registered"
        );
    }

    #[test]
    fn binding_errors_name_setting_and_effect() {
        let err = RuntimeError::DuplicateBinding {
            setting: "show_status_bar",
            effect: "status_surface",
        };
        assert_eq!(
            err.to_string(),
            "binding `status_surface` for setting `show_status_bar` is already active"
        );
    }
}
