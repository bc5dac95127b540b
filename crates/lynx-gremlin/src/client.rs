//! Shared Gremlin client and error type.

use std::sync::Arc;

use serde_json::Value;

use lynx_core::{Edge, GremlinConfig, Vertex};

use crate::edges::Edges;
use crate::graphson::GraphsonReader;
use crate::translator::Translator;
use crate::transport::{ResultSet, Transport, TransportError};
use crate::traversal::Traversal;
use crate::vertices::Vertices;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Gremlin transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid argument `{field}`: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("GraphSON decode error: {0}")]
    Decode(String),
}

impl GraphError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// HTTP-style status for callers that surface errors over a REST API.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::InvalidArgument { .. } => Some(400),
            Self::Unsupported(_) => Some(501),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Gremlin client bound to one transport and traversal source.
///
/// Construct once and reuse; clone is cheap (inner Arc). Operations are
/// grouped under [`GremlinClient::vertices`] and [`GremlinClient::edges`].
pub struct GremlinClient<T> {
    transport: Arc<T>,
    translator: Translator,
    reader: GraphsonReader,
    partition_key: String,
    max_hops: u32,
}

impl<T> Clone for GremlinClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            translator: self.translator.clone(),
            reader: self.reader,
            partition_key: self.partition_key.clone(),
            max_hops: self.max_hops,
        }
    }
}

impl<T: Transport> GremlinClient<T> {
    pub fn new(transport: Arc<T>, config: &GremlinConfig) -> Self {
        tracing::info!(
            url = %config.url(),
            traversal_source = %config.traversal_source,
            "Gremlin client ready"
        );
        Self {
            transport,
            translator: Translator::new(&config.traversal_source),
            reader: GraphsonReader::new(),
            partition_key: config.partition_key.clone(),
            max_hops: config.max_hops,
        }
    }

    pub fn vertices(&self) -> Vertices<'_, T> {
        Vertices::new(self)
    }

    pub fn edges(&self) -> Edges<'_, T> {
        Edges::new(self)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn reader(&self) -> &GraphsonReader {
        &self.reader
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    pub fn max_hops(&self) -> u32 {
        self.max_hops
    }

    /// Translate a traversal into script text for this client's alias.
    pub fn compile(&self, traversal: &Traversal) -> String {
        self.translator.translate(&traversal.bytecode())
    }

    /// Compile and submit a traversal.
    pub async fn submit_traversal(&self, traversal: &Traversal) -> Result<ResultSet> {
        let script = self.compile(traversal);
        self.submit(&script).await
    }

    /// Submit script text unchanged.
    pub async fn submit(&self, script: &str) -> Result<ResultSet> {
        tracing::debug!(script = %script, "Submitting Gremlin script");
        match self.transport.submit(script).await {
            Ok(results) => {
                tracing::trace!(items = results.len(), "Gremlin script returned");
                Ok(results)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Gremlin submission failed");
                Err(e.into())
            }
        }
    }

    // ── Result decoding ──────────────────────────────────────────

    pub(crate) fn first_vertex(&self, results: &ResultSet) -> Result<Option<Vertex>> {
        match results.first() {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => self.reader.read_vertex(raw).map(Some),
        }
    }

    pub(crate) fn all_vertices(&self, results: &ResultSet) -> Result<Vec<Vertex>> {
        results
            .items()
            .iter()
            .filter(|raw| !raw.is_null())
            .map(|raw| self.reader.read_vertex(raw))
            .collect()
    }

    pub(crate) fn first_edge(&self, results: &ResultSet) -> Result<Option<Edge>> {
        match results.first() {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => self.reader.read_edge(raw).map(Some),
        }
    }
}
