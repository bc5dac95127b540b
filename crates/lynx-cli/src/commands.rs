//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use clap::Subcommand;
use serde_json::{Map, Value};

use lynx_core::GremlinConfig;
use lynx_gremlin::{Decoded, GraphError, GraphsonReader, GremlinClient, TypeTag};

use crate::dry_run::DryRunTransport;
use crate::error::{CliError, Result};

// ── decode ──────────────────────────────────────────────────────

/// Decode a GraphSON v1 payload file: one result item or an array of them.
pub fn decode_file(path: &Path, hint: Option<TypeTag>) -> Result<Decoded> {
    let text = std::fs::read_to_string(path)?;
    decode_str(&text, hint)
}

pub fn decode_str(text: &str, hint: Option<TypeTag>) -> Result<Decoded> {
    let raw: Value = serde_json::from_str(text)?;
    let decoded = GraphsonReader::new().read(&raw, hint)?;
    Ok(decoded)
}

// ── compile ─────────────────────────────────────────────────────

/// A client operation to compile without sending.
#[derive(Debug, Clone, Subcommand)]
pub enum Operation {
    /// Fetch a vertex by id.
    Retrieve { id: String },
    /// Create a vertex.
    Add {
        label: String,
        /// Properties as a JSON object.
        #[arg(long, default_value = "{}")]
        props: String,
    },
    /// Overwrite vertex properties.
    Update {
        id: String,
        #[arg(long, default_value = "{}")]
        props: String,
    },
    /// Drop a vertex.
    Delete { id: String },
    /// Check whether a vertex with the given label and properties exists.
    Match {
        label: String,
        #[arg(long, default_value = "{}")]
        props: String,
    },
    /// Neighbors over outgoing edges with any of the given labels.
    Out { id: String, labels: Vec<String> },
    /// Neighbors over incoming edges with any of the given labels.
    In { id: String, labels: Vec<String> },
    /// Neighbors across outgoing edges filtered on an explicit edge step.
    OutEdge {
        id: String,
        labels: Vec<String>,
        /// Restrict the far vertex to these labels (needs exactly one edge label).
        #[arg(long = "vertex-type")]
        vertex_types: Vec<String>,
    },
    /// Neighbors across incoming edges filtered on an explicit edge step.
    InEdge {
        id: String,
        labels: Vec<String>,
        #[arg(long = "vertex-type")]
        vertex_types: Vec<String>,
    },
    /// Search for a vertex reachable over outgoing edges.
    Reach {
        root: String,
        target: String,
        /// Drop the target instead of returning it.
        #[arg(long)]
        drop: bool,
    },
    /// Connect two vertices.
    AddEdge {
        out_id: String,
        in_id: String,
        label: String,
        #[arg(long, default_value = "{}")]
        props: String,
    },
    /// Fetch an edge by id.
    RetrieveEdge { id: String },
    /// Drop an edge.
    DeleteEdge { id: String },
}

/// Run `op` against a dry-run transport and return the scripts it submitted.
///
/// Rejected arguments fail here exactly as they would against a live
/// server, before any script is built.
pub async fn compile(op: &Operation, config: &GremlinConfig) -> Result<Vec<String>> {
    let transport = Arc::new(DryRunTransport::new());
    let client = GremlinClient::new(transport.clone(), config);

    match run(&client, op).await {
        Ok(()) => {}
        // Nothing comes back from a dry run, so lookups end here.
        Err(CliError::Graph(GraphError::NotFound { .. } | GraphError::Decode(_))) => {}
        Err(e) => return Err(e),
    }
    Ok(transport.scripts())
}

async fn run(client: &GremlinClient<DryRunTransport>, op: &Operation) -> Result<()> {
    let vertices = client.vertices();
    let edges = client.edges();
    match op {
        Operation::Retrieve { id } => {
            vertices.retrieve(id).await?;
        }
        Operation::Add { label, props } => {
            vertices.add(label, &parse_properties(props)?).await?;
        }
        Operation::Update { id, props } => {
            vertices.update(id, &parse_properties(props)?).await?;
        }
        Operation::Delete { id } => {
            vertices.permanently_delete(id).await?;
        }
        Operation::Match { label, props } => {
            vertices
                .exact_match_exists(label, &parse_properties(props)?)
                .await;
        }
        Operation::Out { id, labels } => {
            vertices.outgoing_by_type(id, &as_strs(labels)).await?;
        }
        Operation::In { id, labels } => {
            vertices.incoming_by_type(id, &as_strs(labels)).await?;
        }
        Operation::OutEdge {
            id,
            labels,
            vertex_types,
        } => {
            if vertex_types.is_empty() {
                vertices.outgoing_by_edge_type(id, &as_strs(labels)).await?;
            } else {
                let label = single_label(labels)?;
                vertices
                    .outgoing_by_edge_and_vertex_type(id, label, &as_strs(vertex_types))
                    .await?;
            }
        }
        Operation::InEdge {
            id,
            labels,
            vertex_types,
        } => {
            if vertex_types.is_empty() {
                vertices.incoming_by_edge_type(id, &as_strs(labels)).await?;
            } else {
                let label = single_label(labels)?;
                vertices
                    .incoming_by_edge_and_vertex_type(id, label, &as_strs(vertex_types))
                    .await?;
            }
        }
        Operation::Reach { root, target, drop } => {
            if *drop {
                vertices.permanently_delete_outward(root, target).await?;
            } else {
                vertices.retrieve_outward(root, target).await?;
            }
        }
        Operation::AddEdge {
            out_id,
            in_id,
            label,
            props,
        } => {
            edges
                .add(out_id, in_id, label, &parse_properties(props)?)
                .await?;
        }
        Operation::RetrieveEdge { id } => {
            edges.retrieve(id).await?;
        }
        Operation::DeleteEdge { id } => {
            edges.permanently_delete(id).await?;
        }
    }
    Ok(())
}

/// Parse a JSON object of properties.
pub fn parse_properties(raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(CliError::InvalidInput(format!(
            "properties must be a JSON object, got {other}"
        ))),
    }
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

fn single_label(labels: &[String]) -> Result<&str> {
    match labels {
        [label] => Ok(label.as_str()),
        _ => Err(CliError::InvalidInput(
            "--vertex-type needs exactly one edge label".to_string(),
        )),
    }
}
