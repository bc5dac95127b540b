//! lynx-core: Shared graph primitives, configuration, and error handling.
//!
//! This crate provides the foundational types used across all Lynx components:
//! - Property-graph primitives (Vertex, Edge, VertexProperty, Property)
//! - Gremlin connection configuration
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::GremlinConfig;
pub use error::LynxError;
pub use types::{Edge, Element, ElementId, Property, Vertex, VertexProperty};
