//! Property-graph primitives returned by the Gremlin client.
//!
//! These are plain values: the client builds them from decoded wire payloads
//! and hands them to callers. Nothing here talks to a server.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Identity ──────────────────────────────────────────────────────

/// Store-assigned identifier of a vertex, edge, or vertex property.
///
/// Ids are opaque strings. Servers that hand out numeric ids are supported by
/// carrying the decimal rendering of the number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build an id from a raw wire value. Strings are taken verbatim and
    /// numbers use their decimal form; anything else has no id.
    pub fn from_wire(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── Elements ──────────────────────────────────────────────────────

/// A key/value pair attached to an edge or to a vertex property.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Value,
}

impl Property {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One value of a (possibly multi-valued) vertex property.
///
/// `label` is the property name. A vertex holding three values under
/// `"alias"` carries three `VertexProperty` entries labelled `"alias"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VertexProperty {
    pub id: ElementId,
    pub label: String,
    pub value: Value,
    /// Meta-properties.
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A graph vertex.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub id: ElementId,
    pub label: String,
    /// Store insertion order is preserved, including among entries that
    /// share a label.
    #[serde(default)]
    pub properties: Vec<VertexProperty>,
}

impl Vertex {
    /// A vertex reference carrying identity only.
    pub fn reference(id: ElementId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            properties: Vec::new(),
        }
    }

    /// Every value stored under `name`, in store order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.label == name)
            .map(|p| &p.value)
    }

    /// The first value stored under `name`.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.label == name)
            .map(|p| &p.value)
    }

    /// Distinct property names in first-seen order.
    pub fn property_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for p in &self.properties {
            if !names.contains(&p.label.as_str()) {
                names.push(&p.label);
            }
        }
        names
    }
}

/// A directed, labelled edge from `out_v` to `in_v`.
///
/// Endpoints are identity-only references (id and label); their properties
/// are never populated from an edge payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: ElementId,
    pub label: String,
    pub in_v: Vertex,
    pub out_v: Vertex,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Edge {
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }
}

/// Any graph element a wire payload can decode into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Vertex(Vertex),
    Edge(Edge),
    VertexProperty(VertexProperty),
    Property(Property),
}

impl Element {
    /// Wire name of the element kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Vertex(_) => "vertex",
            Element::Edge(_) => "edge",
            Element::VertexProperty(_) => "vertexProperty",
            Element::Property(_) => "property",
        }
    }

    pub fn into_vertex(self) -> Option<Vertex> {
        match self {
            Element::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_edge(self) -> Option<Edge> {
        match self {
            Element::Edge(e) => Some(e),
            _ => None,
        }
    }
}
