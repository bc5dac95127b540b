//! Traversal steps and their bytecode form.
//!
//! A [`Traversal`] is an append-only list of [`Step`]s. Builder methods take
//! the traversal by value and return it extended, so a traversal can never be
//! modified behind a reference once handed to the translator.

use serde_json::Value;

use lynx_core::ElementId;

/// Vertex property cardinality for `property()` steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    List,
    Set,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::Single => "single",
            Cardinality::List => "list",
            Cardinality::Set => "set",
        }
    }
}

/// One argument of a bytecode instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Value(Value),
    Cardinality(Cardinality),
    /// An anonymous child traversal.
    Traversal(Bytecode),
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::Value(Value::String(s.to_string()))
    }
}

/// One step instruction: an operator name and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub operator: &'static str,
    pub arguments: Vec<Argument>,
}

/// Language-independent form of a traversal, ready for translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bytecode {
    pub instructions: Vec<Instruction>,
}

/// A single traversal step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    V(Vec<ElementId>),
    E(Vec<ElementId>),
    AddV(String),
    AddE(String),
    To(Traversal),
    Property {
        cardinality: Option<Cardinality>,
        key: String,
        value: Value,
    },
    Has {
        label: Option<String>,
        key: String,
        value: Value,
    },
    HasNot(String),
    HasLabel(Vec<String>),
    HasId(Vec<ElementId>),
    Out(Vec<String>),
    In(Vec<String>),
    OutE(Vec<String>),
    InE(Vec<String>),
    InV,
    OutV,
    Limit(u64),
    Drop,
}

fn strings(values: &[String]) -> Vec<Argument> {
    values.iter().map(|s| Argument::from(s.as_str())).collect()
}

fn ids(values: &[ElementId]) -> Vec<Argument> {
    values.iter().map(|id| Argument::from(id.as_str())).collect()
}

impl Step {
    pub fn operator(&self) -> &'static str {
        match self {
            Step::V(_) => "V",
            Step::E(_) => "E",
            Step::AddV(_) => "addV",
            Step::AddE(_) => "addE",
            Step::To(_) => "to",
            Step::Property { .. } => "property",
            Step::Has { .. } => "has",
            Step::HasNot(_) => "hasNot",
            Step::HasLabel(_) => "hasLabel",
            Step::HasId(_) => "hasId",
            Step::Out(_) => "out",
            Step::In(_) => "in",
            Step::OutE(_) => "outE",
            Step::InE(_) => "inE",
            Step::InV => "inV",
            Step::OutV => "outV",
            Step::Limit(_) => "limit",
            Step::Drop => "drop",
        }
    }

    pub fn arguments(&self) -> Vec<Argument> {
        match self {
            Step::V(v) | Step::E(v) | Step::HasId(v) => ids(v),
            Step::AddV(label) | Step::AddE(label) | Step::HasNot(label) => {
                vec![Argument::from(label.as_str())]
            }
            Step::To(child) => vec![Argument::Traversal(child.bytecode())],
            Step::Property {
                cardinality,
                key,
                value,
            } => {
                let mut args = Vec::with_capacity(3);
                if let Some(c) = cardinality {
                    args.push(Argument::Cardinality(*c));
                }
                args.push(Argument::from(key.as_str()));
                args.push(Argument::Value(value.clone()));
                args
            }
            Step::Has { label, key, value } => {
                let mut args = Vec::with_capacity(3);
                if let Some(l) = label {
                    args.push(Argument::from(l.as_str()));
                }
                args.push(Argument::from(key.as_str()));
                args.push(Argument::Value(value.clone()));
                args
            }
            Step::HasLabel(v) | Step::Out(v) | Step::In(v) | Step::OutE(v) | Step::InE(v) => {
                strings(v)
            }
            Step::Limit(n) => vec![Argument::Value(Value::from(*n))],
            Step::InV | Step::OutV | Step::Drop => Vec::new(),
        }
    }

    pub fn instruction(&self) -> Instruction {
        Instruction {
            operator: self.operator(),
            arguments: self.arguments(),
        }
    }
}

/// An ordered list of steps.
///
/// The root is not part of the traversal: the translator renders a top-level
/// traversal on the configured alias and every child traversal (the argument
/// of `to()`) on the anonymous `__` source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traversal {
    steps: Vec<Step>,
}

impl Traversal {
    /// Start a traversal on the bound traversal source.
    pub fn g() -> Self {
        Self::default()
    }

    /// Start a child traversal for `to()`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn bytecode(&self) -> Bytecode {
        Bytecode {
            instructions: self.steps.iter().map(Step::instruction).collect(),
        }
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    // ── Sources ─────────────────────────────────────────────────

    pub fn v<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        self.push(Step::V(ids.into_iter().map(Into::into).collect()))
    }

    pub fn e<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        self.push(Step::E(ids.into_iter().map(Into::into).collect()))
    }

    pub fn add_v(self, label: &str) -> Self {
        self.push(Step::AddV(label.to_string()))
    }

    // ── Mutation ────────────────────────────────────────────────

    pub fn add_e(self, label: &str) -> Self {
        self.push(Step::AddE(label.to_string()))
    }

    pub fn to(self, target: Traversal) -> Self {
        self.push(Step::To(target))
    }

    pub fn property(self, key: &str, value: Value) -> Self {
        self.push(Step::Property {
            cardinality: None,
            key: key.to_string(),
            value,
        })
    }

    pub fn property_with(self, cardinality: Cardinality, key: &str, value: Value) -> Self {
        self.push(Step::Property {
            cardinality: Some(cardinality),
            key: key.to_string(),
            value,
        })
    }

    pub fn drop(self) -> Self {
        self.push(Step::Drop)
    }

    // ── Filters ─────────────────────────────────────────────────

    pub fn has(self, key: &str, value: Value) -> Self {
        self.push(Step::Has {
            label: None,
            key: key.to_string(),
            value,
        })
    }

    pub fn has_with_label(self, label: &str, key: &str, value: Value) -> Self {
        self.push(Step::Has {
            label: Some(label.to_string()),
            key: key.to_string(),
            value,
        })
    }

    pub fn has_not(self, key: &str) -> Self {
        self.push(Step::HasNot(key.to_string()))
    }

    pub fn has_label<S: AsRef<str>>(self, labels: &[S]) -> Self {
        self.push(Step::HasLabel(owned(labels)))
    }

    pub fn has_id<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ElementId>,
    {
        self.push(Step::HasId(ids.into_iter().map(Into::into).collect()))
    }

    pub fn limit(self, n: u64) -> Self {
        self.push(Step::Limit(n))
    }

    // ── Navigation ──────────────────────────────────────────────

    pub fn out<S: AsRef<str>>(self, edge_labels: &[S]) -> Self {
        self.push(Step::Out(owned(edge_labels)))
    }

    pub fn in_<S: AsRef<str>>(self, edge_labels: &[S]) -> Self {
        self.push(Step::In(owned(edge_labels)))
    }

    pub fn out_e<S: AsRef<str>>(self, edge_labels: &[S]) -> Self {
        self.push(Step::OutE(owned(edge_labels)))
    }

    pub fn in_e<S: AsRef<str>>(self, edge_labels: &[S]) -> Self {
        self.push(Step::InE(owned(edge_labels)))
    }

    pub fn in_v(self) -> Self {
        self.push(Step::InV)
    }

    pub fn out_v(self) -> Self {
        self.push(Step::OutV)
    }
}

fn owned<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|s| s.as_ref().to_string()).collect()
}
