//! Bytecode to Gremlin-Groovy script translation.

use serde_json::Value;

use crate::traversal::{Argument, Bytecode};

/// Prefix of anonymous child traversals.
const ANONYMOUS: &str = "__";

/// Renders bytecode as script text rooted at a traversal-source alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translator {
    alias: String,
}

impl Translator {
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Translate a whole traversal in one pass, e.g. `g.V('a').outE().inV()`.
    pub fn translate(&self, bytecode: &Bytecode) -> String {
        let mut script = String::new();
        render(&mut script, &self.alias, bytecode);
        script
    }
}

fn render(out: &mut String, root: &str, bytecode: &Bytecode) {
    out.push_str(root);
    for instruction in &bytecode.instructions {
        out.push('.');
        out.push_str(instruction.operator);
        out.push('(');
        for (i, arg) in instruction.arguments.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            render_argument(out, arg);
        }
        out.push(')');
    }
}

fn render_argument(out: &mut String, arg: &Argument) {
    match arg {
        Argument::Value(v) => out.push_str(&value_literal(v)),
        Argument::Cardinality(c) => out.push_str(c.as_str()),
        Argument::Traversal(child) => render(out, ANONYMOUS, child),
    }
}

/// Single-quoted string literal with `\` and `'` escaped.
pub fn string_literal(s: &str) -> String {
    let mut lit = String::with_capacity(s.len() + 2);
    lit.push('\'');
    for c in s.chars() {
        match c {
            '\\' => lit.push_str("\\\\"),
            '\'' => lit.push_str("\\'"),
            _ => lit.push(c),
        }
    }
    lit.push('\'');
    lit
}

/// Script literal for a JSON value. Arrays and objects travel as their JSON
/// text inside a string literal.
pub fn value_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_literal(s),
        Value::Array(_) | Value::Object(_) => string_literal(&value.to_string()),
    }
}
