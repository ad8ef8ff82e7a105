//! String-tagged message record.

use std::borrow::Cow;

use crate::error::UpdateError;

/// A message identified by a `kind` tag with an optional payload.
///
/// Suits programs whose messages arrive from loosely typed sources (key maps,
/// scripted input) and whose reducer therefore needs a default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged<P = ()> {
    pub kind: Cow<'static, str>,
    pub payload: Option<P>,
}

impl<P> Tagged<P> {
    pub fn new(kind: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(kind: impl Into<Cow<'static, str>>, payload: P) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The error a reducer returns when it has no case for this message.
    pub fn unknown(&self) -> UpdateError {
        UpdateError::unknown(self.kind())
    }
}
