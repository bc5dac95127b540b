//! GraphSON v1 reader.
//!
//! GraphSON v1 carries no per-value type wrappers. Elements are recognised by
//! an optional `type` field (`"vertex"`, `"edge"`) or by a hint from the
//! caller; everything else is plain JSON. The reader is read-only: encoding
//! any element back into GraphSON v1 is unsupported.
//!
//! Wire shapes:
//!
//! ```text
//! vertex          {id, label, type, properties: {name: [{id, value, properties?}, ..]}}
//! edge            {id, label, type, inV, inVLabel, outV, outVLabel, properties: {name: value}}
//! vertexProperty  {id, label, value, properties: {name: value}}
//! property        {name, value}
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value};

use lynx_core::{Edge, Element, ElementId, Property, Vertex, VertexProperty};

use crate::client::{GraphError, Result};

/// The element kinds the reader can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Vertex,
    Edge,
    VertexProperty,
    Property,
}

impl TypeTag {
    pub const ALL: [TypeTag; 4] = [
        TypeTag::Vertex,
        TypeTag::Edge,
        TypeTag::VertexProperty,
        TypeTag::Property,
    ];

    /// Wire name of the tag.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Vertex => "vertex",
            TypeTag::Edge => "edge",
            TypeTag::VertexProperty => "vertexProperty",
            TypeTag::Property => "property",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        TypeTag::ALL.into_iter().find(|t| t.as_str() == name)
    }

    fn decode(self, reader: &GraphsonReader, raw: &Value) -> Result<Element> {
        match self {
            TypeTag::Vertex => reader.decode_vertex(raw).map(Element::Vertex),
            TypeTag::Edge => reader.decode_edge(raw).map(Element::Edge),
            TypeTag::VertexProperty => reader
                .decode_vertex_property(raw)
                .map(Element::VertexProperty),
            TypeTag::Property => reader.decode_property(raw).map(Element::Property),
        }
    }

    /// Always fails: this client only ever reads GraphSON v1.
    pub fn encode(self, _element: &Element) -> Result<Value> {
        Err(GraphError::Unsupported(format!(
            "GraphSON v1 encoding of {} is not implemented",
            self.as_str()
        )))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        TypeTag::from_wire(s).ok_or_else(|| GraphError::InvalidArgument {
            field: "type".to_string(),
            reason: format!("unknown GraphSON v1 type {s:?}"),
        })
    }
}

/// A decoded wire value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Decoded {
    Null,
    Element(Element),
    List(Vec<Decoded>),
    Map(BTreeMap<String, Decoded>),
    /// Numbers, strings, and booleans, passed through unchanged.
    Scalar(Value),
}

impl Decoded {
    pub fn into_element(self) -> Option<Element> {
        match self {
            Decoded::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<Decoded>> {
        match self {
            Decoded::List(items) => Some(items),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Decoded::Null => "null",
            Decoded::Element(e) => e.kind(),
            Decoded::List(_) => "list",
            Decoded::Map(_) => "map",
            Decoded::Scalar(_) => "scalar",
        }
    }
}

fn decode_err(message: impl Into<String>) -> GraphError {
    GraphError::Decode(message.into())
}

fn expect_object(raw: &Value, tag: TypeTag) -> Result<&Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| decode_err(format!("{tag} payload must be a JSON object, got {raw}")))
}

fn required_id(obj: &Map<String, Value>, tag: TypeTag) -> Result<ElementId> {
    obj.get("id")
        .and_then(ElementId::from_wire)
        .ok_or_else(|| decode_err(format!("{tag} payload has no usable id")))
}

fn label_of(obj: &Map<String, Value>) -> String {
    obj.get("label")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Stateless GraphSON v1 reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphsonReader;

impl GraphsonReader {
    pub fn new() -> Self {
        Self
    }

    /// Decode a possibly absent value. Absent stays absent.
    pub fn read_opt(&self, raw: Option<&Value>, hint: Option<TypeTag>) -> Result<Option<Decoded>> {
        raw.map(|r| self.read(r, hint)).transpose()
    }

    /// Decode one wire value.
    ///
    /// Arrays decode element-wise with the same hint. Otherwise the hint, or
    /// failing that a registered `type` field, selects a variant decoder.
    /// Untyped objects decode field by field; scalars pass through.
    pub fn read(&self, raw: &Value, hint: Option<TypeTag>) -> Result<Decoded> {
        match raw {
            Value::Null => Ok(Decoded::Null),
            Value::Array(items) => items
                .iter()
                .map(|item| self.read(item, hint))
                .collect::<Result<Vec<_>>>()
                .map(Decoded::List),
            _ => {
                let tag = hint.or_else(|| {
                    raw.get("type")
                        .and_then(Value::as_str)
                        .and_then(TypeTag::from_wire)
                });
                if let Some(tag) = tag {
                    return tag.decode(self, raw).map(Decoded::Element);
                }
                match raw {
                    Value::Object(map) => map
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), self.read(v, None)?)))
                        .collect::<Result<BTreeMap<_, _>>>()
                        .map(Decoded::Map),
                    other => Ok(Decoded::Scalar(other.clone())),
                }
            }
        }
    }

    /// Always fails: this client only ever reads GraphSON v1.
    pub fn write(&self, element: &Element) -> Result<Value> {
        let tag = TypeTag::from_wire(element.kind()).unwrap_or(TypeTag::Property);
        tag.encode(element)
    }

    pub fn read_vertex(&self, raw: &Value) -> Result<Vertex> {
        match self.read(raw, Some(TypeTag::Vertex))? {
            Decoded::Element(Element::Vertex(v)) => Ok(v),
            other => Err(decode_err(format!("expected vertex, got {}", other.kind()))),
        }
    }

    pub fn read_vertices(&self, raw: &[Value]) -> Result<Vec<Vertex>> {
        raw.iter().map(|r| self.read_vertex(r)).collect()
    }

    pub fn read_edge(&self, raw: &Value) -> Result<Edge> {
        match self.read(raw, Some(TypeTag::Edge))? {
            Decoded::Element(Element::Edge(e)) => Ok(e),
            other => Err(decode_err(format!("expected edge, got {}", other.kind()))),
        }
    }

    /// Decode `raw` with `tag` and return its elements, flattening a list.
    fn read_elements(&self, raw: &Value, tag: TypeTag) -> Result<Vec<Element>> {
        let items = match self.read(raw, Some(tag))? {
            Decoded::List(items) => items,
            single => vec![single],
        };
        items
            .into_iter()
            .map(|d| {
                let kind = d.kind();
                d.into_element()
                    .ok_or_else(|| decode_err(format!("expected {tag}, got {kind}")))
            })
            .collect()
    }

    /// Flattened `{name: value}` properties of edges and vertex properties.
    fn read_flat_properties(&self, obj: &Map<String, Value>) -> Result<Vec<Property>> {
        let Some(raw) = obj.get("properties") else {
            return Ok(Vec::new());
        };
        let raw = raw
            .as_object()
            .ok_or_else(|| decode_err("properties must be a JSON object"))?;

        let mut properties = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let pair = json!({ "name": name, "value": value });
            for element in self.read_elements(&pair, TypeTag::Property)? {
                if let Element::Property(p) = element {
                    properties.push(p);
                }
            }
        }
        Ok(properties)
    }

    // ── Variant decoders ────────────────────────────────────────

    fn decode_vertex(&self, raw: &Value) -> Result<Vertex> {
        let obj = expect_object(raw, TypeTag::Vertex)?;
        let mut vertex = Vertex::reference(required_id(obj, TypeTag::Vertex)?, label_of(obj));

        let Some(groups) = obj.get("properties") else {
            return Ok(vertex);
        };
        let groups = groups
            .as_object()
            .ok_or_else(|| decode_err("vertex properties must be a JSON object"))?;

        // Entries under a property name carry no label of their own; the
        // group name is the label.
        let mut entries = Vec::new();
        for (name, group) in groups {
            let members: Vec<&Value> = match group {
                Value::Array(items) => items.iter().collect(),
                single => vec![single],
            };
            for member in members {
                let mut entry = member.as_object().cloned().ok_or_else(|| {
                    decode_err(format!("vertex property {name:?} entry must be a JSON object"))
                })?;
                entry.insert("label".to_string(), Value::String(name.clone()));
                entries.push(Value::Object(entry));
            }
        }

        for element in self.read_elements(&Value::Array(entries), TypeTag::VertexProperty)? {
            if let Element::VertexProperty(p) = element {
                vertex.properties.push(p);
            }
        }
        Ok(vertex)
    }

    fn decode_edge(&self, raw: &Value) -> Result<Edge> {
        let obj = expect_object(raw, TypeTag::Edge)?;
        let id = required_id(obj, TypeTag::Edge)?;

        let endpoint = |id_key: &str, label_key: &str| -> Result<Vertex> {
            let reference = json!({
                "id": obj.get(id_key).cloned().unwrap_or(Value::Null),
                "label": obj.get(label_key).cloned().unwrap_or(Value::Null),
                "type": "vertex",
            });
            self.read_vertex(&reference)
                .map_err(|e| decode_err(format!("edge {id} endpoint {id_key}: {e}")))
        };
        let in_v = endpoint("inV", "inVLabel")?;
        let out_v = endpoint("outV", "outVLabel")?;

        Ok(Edge {
            id,
            label: label_of(obj),
            in_v,
            out_v,
            properties: self.read_flat_properties(obj)?,
        })
    }

    fn decode_vertex_property(&self, raw: &Value) -> Result<VertexProperty> {
        let obj = expect_object(raw, TypeTag::VertexProperty)?;
        Ok(VertexProperty {
            id: required_id(obj, TypeTag::VertexProperty)?,
            label: label_of(obj),
            value: obj.get("value").cloned().unwrap_or(Value::Null),
            properties: self.read_flat_properties(obj)?,
        })
    }

    fn decode_property(&self, raw: &Value) -> Result<Property> {
        let obj = expect_object(raw, TypeTag::Property)?;
        let key = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| decode_err("property payload has no name"))?;
        Ok(Property::new(
            key,
            obj.get("value").cloned().unwrap_or(Value::Null),
        ))
    }
}
