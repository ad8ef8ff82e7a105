//! Error types for the update loop and the mounted runtime.
//!
//! Reducer failures are programmer errors in message routing, so they are
//! surfaced through the dispatch that triggered them instead of being
//! swallowed. Invalid effects and subscriptions are not errors at all: they
//! are `None` entries and are skipped.

use thiserror::Error;

use crate::mvu::SubscriptionId;

/// Errors raised by a program's `update` function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// The reducer has no case for this message kind.
    #[error("Unknown message kind '{kind}'")]
    UnknownMessage { kind: String },

    /// The reducer recognised the message but refused to apply it.
    #[error("Message '{kind}' rejected: {reason}")]
    Rejected { kind: String, reason: String },
}

impl UpdateError {
    /// Error for a reducer's default branch.
    pub fn unknown(kind: impl Into<String>) -> Self {
        Self::UnknownMessage { kind: kind.into() }
    }

    pub fn rejected(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            kind: kind.into(),
            reason: reason.into(),
        }
    }

    /// Message kind that caused the failure.
    pub fn kind(&self) -> &str {
        match self {
            UpdateError::UnknownMessage { kind } | UpdateError::Rejected { kind, .. } => kind,
        }
    }
}

/// Errors surfaced by dispatch, mount and unmount.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The reducer failed while processing a dispatched message.
    #[error("Update failed: {0}")]
    Update(#[from] UpdateError),

    /// A subscription's unsubscribe callback failed.
    #[error("Failed to stop subscription '{id}': {source}")]
    Unsubscribe {
        id: SubscriptionId,
        #[source]
        source: anyhow::Error,
    },

    /// Message sent through a handle with no mounted instance behind it.
    #[error("No mounted instance to receive the message")]
    NotMounted,

    /// Message sent while the instance state was borrowed by the caller.
    #[error("Instance is borrowed; message cannot be processed now")]
    Busy,

    /// A single dispatch burst kept producing messages past the limit.
    #[error("Dispatch exceeded {limit} transitions in one burst")]
    DispatchOverflow { limit: usize },
}

impl RuntimeError {
    /// Returns the reducer error, if this failure came from `update`.
    pub fn as_update(&self) -> Option<&UpdateError> {
        match self {
            RuntimeError::Update(err) => Some(err),
            _ => None,
        }
    }
}
