//! Error types for the state stack and its collaborators.

use std::path::PathBuf;
use thiserror::Error;

use crate::states::{LifecyclePhase, StateKind};

/// Stack operations that can fail on a protocol violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOperation {
    Pop,
    Swap,
}

impl std::fmt::Display for StackOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StackOperation::Pop => write!(f, "pop"),
            StackOperation::Swap => write!(f, "swap"),
        }
    }
}

/// Errors raised by the state manager or by a state hook.
#[derive(Debug, Error)]
pub enum StateError {
    /// Popping the root state, or swapping on an empty stack.
    #[error("cannot {operation} a state stack of depth {depth}")]
    StackUnderflow {
        operation: StackOperation,
        depth: usize,
    },

    /// A tick or UI event arrived while no state was on the stack.
    #[error("the state stack is empty")]
    EmptyStack,

    /// A lifecycle hook was invoked out of order.
    #[error("{kind} cannot {hook} while {phase:?}")]
    LifecycleViolation {
        kind: StateKind,
        hook: &'static str,
        phase: LifecyclePhase,
    },

    /// The requested feature exists in the menu but has no implementation.
    #[error("{feature} is not supported yet")]
    NotSupported { feature: &'static str },

    /// Simulated work held the main thread longer than a platform allows.
    #[error("call to '{method}' blocked the main thread for {elapsed_ms} ms")]
    MainThreadBlocked { method: String, elapsed_ms: u64 },

    #[error(transparent)]
    Ui(#[from] UiError),
}

impl StateError {
    /// Fatal errors indicate a caller bug in the stack protocol and end the session.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StateError::StackUnderflow { .. }
                | StateError::EmptyStack
                | StateError::LifecycleViolation { .. }
        )
    }
}

/// Errors raised by the UI layer.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("no prefab registered under '{prefab}'")]
    PrefabMissing { prefab: String },

    #[error("prefab '{prefab}' has no widget named '{widget}'")]
    MissingWidget { prefab: String, widget: String },

    #[error("view {0} does not exist")]
    UnknownView(u64),

    #[error("failed to read prefab list {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse prefab list {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading configuration or persisting settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("remote config fetch failed: {0}")]
    Fetch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_are_fatal() {
        let underflow = StateError::StackUnderflow {
            operation: StackOperation::Pop,
            depth: 1,
        };
        assert!(underflow.is_fatal());
        assert!(StateError::EmptyStack.is_fatal());
    }

    #[test]
    fn test_collaborator_errors_are_not_fatal() {
        assert!(!StateError::NotSupported { feature: "x" }.is_fatal());
        let ui = StateError::from(UiError::PrefabMissing {
            prefab: "Nope".to_string(),
        });
        assert!(!ui.is_fatal());
    }

    #[test]
    fn test_underflow_message() {
        let err = StateError::StackUnderflow {
            operation: StackOperation::Pop,
            depth: 1,
        };
        assert_eq!(err.to_string(), "cannot pop a state stack of depth 1");
    }
}
