//! Vertex operations.
//!
//! Each operation sanitizes its arguments, compiles one traversal (or one
//! literal script), submits it, and decodes the response. Nothing is cached
//! between calls.

use serde_json::{Map, Value};

use lynx_core::Vertex;

use crate::client::{GraphError, GremlinClient, Result};
use crate::literal;
use crate::sanitize::{ensure_identifier, ensure_safe_all, ensure_safe_properties};
use crate::transport::Transport;
use crate::traversal::{Cardinality, Traversal};

const RECORD_NOT_FOUND: &str = "record not found";
const VERTEX_NOT_REACHABLE: &str = "vertex does not exist";

/// Direction of a one-hop neighbor lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outgoing,
    Incoming,
}

/// Vertex operations on a [`GremlinClient`].
pub struct Vertices<'a, T> {
    client: &'a GremlinClient<T>,
}

impl<'a, T: Transport> Vertices<'a, T> {
    pub(crate) fn new(client: &'a GremlinClient<T>) -> Self {
        Self { client }
    }

    // ── Single vertex lookups ───────────────────────────────────

    /// Get a vertex by id.
    pub async fn retrieve(&self, id: &str) -> Result<Vertex> {
        ensure_identifier("id", id)?;

        let traversal = Traversal::g().v([id]);
        let results = self.client.submit_traversal(&traversal).await?;
        self.client
            .first_vertex(&results)?
            .ok_or_else(|| GraphError::not_found(RECORD_NOT_FOUND))
    }

    /// Whether a vertex with `label` holds every given property value.
    ///
    /// Object and array values are compared against their JSON text, and a
    /// null value requires the property to be absent. This is a pre-check:
    /// any failure, including a rejected argument, reports `false`.
    pub async fn exact_match_exists(&self, label: &str, properties: &Map<String, Value>) -> bool {
        match self.try_exact_match(label, properties).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, label, "Exact-match check failed, reporting no match");
                false
            }
        }
    }

    async fn try_exact_match(&self, label: &str, properties: &Map<String, Value>) -> Result<bool> {
        ensure_identifier("label", label)?;
        ensure_safe_properties("properties", properties)?;

        let mut traversal = Traversal::g().v(Vec::<String>::new());
        if properties.is_empty() {
            traversal = traversal.has_label(&[label]);
        }
        for (key, value) in properties {
            traversal = match value {
                Value::Null => traversal.has_label(&[label]).has_not(key),
                Value::Object(_) | Value::Array(_) => {
                    traversal.has_with_label(label, key, Value::String(value.to_string()))
                }
                scalar => traversal.has_with_label(label, key, scalar.clone()),
            };
        }
        let traversal = traversal.limit(1);

        let results = self.client.submit_traversal(&traversal).await?;
        Ok(matches!(results.first(), Some(v) if !v.is_null()))
    }

    // ── Mutations ───────────────────────────────────────────────

    /// Create a vertex of `vertex_type` with one property per non-null input
    /// field, plus the partition key set to `vertex_type`.
    pub async fn add(&self, vertex_type: &str, input: &Map<String, Value>) -> Result<Vertex> {
        ensure_identifier("type", vertex_type)?;
        ensure_safe_properties("input", input)?;
        self.reject_partition_key(input)?;

        let mut traversal = Traversal::g().add_v(vertex_type);
        for (key, value) in input.iter().filter(|(_, v)| !v.is_null()) {
            traversal = traversal.property(key, wire_value(value));
        }
        let traversal = traversal.property(
            self.client.partition_key(),
            Value::String(vertex_type.to_string()),
        );

        let results = self.client.submit_traversal(&traversal).await?;
        let vertex = self
            .client
            .first_vertex(&results)?
            .ok_or_else(|| GraphError::Decode("addV returned no vertex".to_string()))?;

        tracing::debug!(id = %vertex.id, label = %vertex.label, "Vertex created");
        Ok(vertex)
    }

    /// Overwrite or add the given properties. Properties not named in `input`
    /// are left as they are; null input values are skipped.
    pub async fn update(&self, id: &str, input: &Map<String, Value>) -> Result<Vertex> {
        ensure_identifier("id", id)?;
        ensure_safe_properties("input", input)?;
        self.reject_partition_key(input)?;

        let mut traversal = Traversal::g().v([id]);
        for (key, value) in input.iter().filter(|(_, v)| !v.is_null()) {
            traversal = traversal.property_with(Cardinality::Single, key, wire_value(value));
        }

        let results = self.client.submit_traversal(&traversal).await?;
        self.client
            .first_vertex(&results)?
            .ok_or_else(|| GraphError::not_found(RECORD_NOT_FOUND))
    }

    /// Drop a vertex and its edges. There is no way to recover it afterward.
    pub async fn permanently_delete(&self, id: &str) -> Result<bool> {
        ensure_identifier("id", id)?;

        let traversal = Traversal::g().v([id]).drop();
        self.client.submit_traversal(&traversal).await?;
        tracing::debug!(id, "Vertex dropped");
        Ok(true)
    }

    // ── Neighbor queries ────────────────────────────────────────

    /// Vertices one outgoing edge away, optionally restricted to edges with
    /// one of `edge_labels`. The filter rides on the adjacency step.
    pub async fn outgoing_by_type(&self, id: &str, edge_labels: &[&str]) -> Result<Vec<Vertex>> {
        self.adjacent(id, edge_labels, Direction::Outgoing).await
    }

    pub async fn incoming_by_type(&self, id: &str, edge_labels: &[&str]) -> Result<Vec<Vertex>> {
        self.adjacent(id, edge_labels, Direction::Incoming).await
    }

    /// Same result set as [`Self::outgoing_by_type`], with the label filter
    /// applied to an explicit edge step before moving to the far vertex.
    pub async fn outgoing_by_edge_type(
        &self,
        id: &str,
        edge_labels: &[&str],
    ) -> Result<Vec<Vertex>> {
        self.across_edges(id, edge_labels, &[], Direction::Outgoing)
            .await
    }

    pub async fn incoming_by_edge_type(
        &self,
        id: &str,
        edge_labels: &[&str],
    ) -> Result<Vec<Vertex>> {
        self.across_edges(id, edge_labels, &[], Direction::Incoming)
            .await
    }

    /// Vertices across `edge_label` edges, optionally restricted to the given
    /// vertex labels.
    pub async fn outgoing_by_edge_and_vertex_type(
        &self,
        id: &str,
        edge_label: &str,
        vertex_types: &[&str],
    ) -> Result<Vec<Vertex>> {
        ensure_identifier("edge_label", edge_label)?;
        self.across_edges(id, &[edge_label], vertex_types, Direction::Outgoing)
            .await
    }

    pub async fn incoming_by_edge_and_vertex_type(
        &self,
        id: &str,
        edge_label: &str,
        vertex_types: &[&str],
    ) -> Result<Vec<Vertex>> {
        ensure_identifier("edge_label", edge_label)?;
        self.across_edges(id, &[edge_label], vertex_types, Direction::Incoming)
            .await
    }

    async fn adjacent(
        &self,
        id: &str,
        edge_labels: &[&str],
        direction: Direction,
    ) -> Result<Vec<Vertex>> {
        ensure_identifier("id", id)?;
        ensure_safe_all("edge_labels", edge_labels)?;

        let start = Traversal::g().v([id]);
        let traversal = match direction {
            Direction::Outgoing => start.out(edge_labels),
            Direction::Incoming => start.in_(edge_labels),
        };
        let results = self.client.submit_traversal(&traversal).await?;
        self.client.all_vertices(&results)
    }

    async fn across_edges(
        &self,
        id: &str,
        edge_labels: &[&str],
        vertex_types: &[&str],
        direction: Direction,
    ) -> Result<Vec<Vertex>> {
        ensure_identifier("id", id)?;
        ensure_safe_all("edge_labels", edge_labels)?;
        ensure_safe_all("vertex_types", vertex_types)?;

        const NONE: &[&str] = &[];
        let mut traversal = Traversal::g().v([id]);
        traversal = match direction {
            Direction::Outgoing => traversal.out_e(NONE),
            Direction::Incoming => traversal.in_e(NONE),
        };
        if !edge_labels.is_empty() {
            traversal = traversal.has_label(edge_labels);
        }
        traversal = match direction {
            Direction::Outgoing => traversal.in_v(),
            Direction::Incoming => traversal.out_v(),
        };
        if !vertex_types.is_empty() {
            traversal = traversal.has_label(vertex_types);
        }

        let results = self.client.submit_traversal(&traversal).await?;
        self.client.all_vertices(&results)
    }

    // ── Reachability ────────────────────────────────────────────

    /// Find `target` by following outgoing edges from `root`, up to the
    /// client's hop limit.
    pub async fn retrieve_outward(&self, root_id: &str, target_id: &str) -> Result<Vertex> {
        ensure_identifier("root_id", root_id)?;
        ensure_identifier("target_id", target_id)?;

        let script = literal::reachable(
            self.client.translator().alias(),
            root_id,
            target_id,
            self.client.max_hops(),
        );
        let results = self.client.submit(&script).await?;
        self.client
            .first_vertex(&results)?
            .ok_or_else(|| GraphError::not_found(VERTEX_NOT_REACHABLE))
    }

    /// Drop `target` if it is reachable from `root` over outgoing edges.
    pub async fn permanently_delete_outward(&self, root_id: &str, target_id: &str) -> Result<bool> {
        ensure_identifier("root_id", root_id)?;
        ensure_identifier("target_id", target_id)?;

        let script = literal::drop_reachable(
            self.client.translator().alias(),
            root_id,
            target_id,
            self.client.max_hops(),
        );
        self.client.submit(&script).await?;
        Ok(true)
    }

    fn reject_partition_key(&self, input: &Map<String, Value>) -> Result<()> {
        let key = self.client.partition_key();
        if input.contains_key(key) {
            return Err(GraphError::InvalidArgument {
                field: format!("input.{key}"),
                reason: "partition key is set from the vertex type".to_string(),
            });
        }
        Ok(())
    }
}

/// Property value as written to the store: structured values are stored as
/// their JSON text.
pub(crate) fn wire_value(value: &Value) -> Value {
    match value {
        Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
        scalar => scalar.clone(),
    }
}
