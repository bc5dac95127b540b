//! Edge operations.

use serde_json::{Map, Value};

use lynx_core::Edge;

use crate::client::{GraphError, GremlinClient, Result};
use crate::sanitize::{ensure_identifier, ensure_safe_properties};
use crate::transport::Transport;
use crate::traversal::Traversal;
use crate::vertices::wire_value;

/// Edge operations on a [`GremlinClient`].
pub struct Edges<'a, T> {
    client: &'a GremlinClient<T>,
}

impl<'a, T: Transport> Edges<'a, T> {
    pub(crate) fn new(client: &'a GremlinClient<T>) -> Self {
        Self { client }
    }

    /// Connect `out_id` to `in_id` with a `label` edge carrying one property
    /// per non-null field of `properties`.
    ///
    /// Fails with `NotFound` when either endpoint does not exist.
    pub async fn add(
        &self,
        out_id: &str,
        in_id: &str,
        label: &str,
        properties: &Map<String, Value>,
    ) -> Result<Edge> {
        ensure_identifier("out_id", out_id)?;
        ensure_identifier("in_id", in_id)?;
        ensure_identifier("label", label)?;
        ensure_safe_properties("properties", properties)?;

        let mut traversal = Traversal::g()
            .v([out_id])
            .add_e(label)
            .to(Traversal::anonymous().v([in_id]));
        for (key, value) in properties.iter().filter(|(_, v)| !v.is_null()) {
            traversal = traversal.property(key, wire_value(value));
        }

        let results = self.client.submit_traversal(&traversal).await?;
        let edge = self
            .client
            .first_edge(&results)?
            .ok_or_else(|| GraphError::not_found("vertex does not exist"))?;

        tracing::debug!(id = %edge.id, label = %edge.label, "Edge created");
        Ok(edge)
    }

    /// Get an edge by id.
    pub async fn retrieve(&self, id: &str) -> Result<Edge> {
        ensure_identifier("id", id)?;

        let traversal = Traversal::g().e([id]);
        let results = self.client.submit_traversal(&traversal).await?;
        self.client
            .first_edge(&results)?
            .ok_or_else(|| GraphError::not_found("record not found"))
    }

    /// Drop an edge. Its endpoints are untouched.
    pub async fn permanently_delete(&self, id: &str) -> Result<bool> {
        ensure_identifier("id", id)?;

        let traversal = Traversal::g().e([id]).drop();
        self.client.submit_traversal(&traversal).await?;
        Ok(true)
    }
}
