//! lynx-gremlin: GraphSON v1 client for Gremlin-family graph stores.
//!
//! Every graph operation is compiled here: arguments are sanitized, a
//! traversal is built and translated into a script for the configured
//! traversal source, the script goes out through a caller-supplied
//! [`Transport`], and the response is decoded by the GraphSON v1 reader.

pub mod client;
pub mod edges;
pub mod graphson;
pub mod literal;
pub mod sanitize;
pub mod translator;
pub mod transport;
pub mod traversal;
pub mod vertices;

pub use client::{GraphError, GremlinClient, Result};
pub use graphson::{Decoded, GraphsonReader, TypeTag};
pub use translator::Translator;
pub use transport::{ResultSet, Transport, TransportError};
pub use traversal::{Bytecode, Cardinality, Traversal};
