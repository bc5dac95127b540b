//! lynx-cli: diagnostics for the Lynx Gremlin client.
//!
//! Decodes captured GraphSON v1 payloads and shows the scripts client
//! operations would submit, without contacting a server.

pub mod commands;
pub mod dry_run;
pub mod error;
