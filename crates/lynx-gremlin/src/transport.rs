//! Script submission contract.
//!
//! The client owns no connections. Callers construct a transport (WebSocket
//! driver, HTTP bridge, test double) once and share it across operations.

use std::fmt;
use std::future::Future;

use serde_json::Value;

/// Failure raised by a transport while submitting a script.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TransportError(#[from] anyhow::Error);

impl TransportError {
    /// Wrap a driver error, keeping it as the error source.
    pub fn new<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(anyhow::Error::new(err))
    }

    /// Build an error from a plain message, e.g. a server status line.
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self(anyhow::Error::msg(message))
    }

    pub fn into_inner(self) -> anyhow::Error {
        self.0
    }
}

/// Raw result items returned by the server for one script, still in wire form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    items: Vec<Value>,
}

impl ResultSet {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

impl From<Vec<Value>> for ResultSet {
    fn from(items: Vec<Value>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<Value> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A channel that submits script text and returns the server's result items.
///
/// Implementations must not retry or rewrite the script; failures surface to
/// the caller as-is.
pub trait Transport: Send + Sync {
    fn submit(
        &self,
        script: &str,
    ) -> impl Future<Output = Result<ResultSet, TransportError>> + Send;
}
