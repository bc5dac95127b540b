//! Test transports.
//!
//! `MemoryGraph` parses submitted Gremlin-Groovy scripts and evaluates the
//! step subset the client emits against an in-memory property graph, replying
//! with GraphSON v1 payloads. `Canned` replays fixed responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{json, Map, Value};

use lynx_core::GremlinConfig;
use lynx_gremlin::{GremlinClient, ResultSet, Transport, TransportError};

// ── Script parsing ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Str(String),
    Num(Value),
    Dot,
    LParen,
    RParen,
    Comma,
}

fn tokenize(script: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = script.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' => i += 1,
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '\'' => {
                let mut s = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err("unterminated string literal".into()),
                        Some('\\') => {
                            let escaped = chars.get(i + 1).ok_or("dangling escape")?;
                            s.push(*escaped);
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(other) => {
                            s.push(*other);
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Str(s));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let start = i;
                i += 1;
                while i < chars.len()
                    && (chars[i].is_ascii_digit() || matches!(chars[i], '.' | 'e' | 'E' | '-' | '+'))
                {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let num: Value = serde_json::from_str(&text).map_err(|e| format!("{text}: {e}"))?;
                tokens.push(Token::Num(num));
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            other => return Err(format!("unexpected character {other:?}")),
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Value(Value),
    Word(String),
    Chain(Chain),
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    name: String,
    args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq)]
struct Chain {
    root: String,
    calls: Vec<Call>,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, String> {
        let t = self.tokens.get(self.pos).cloned().ok_or("unexpected end of script")?;
        self.pos += 1;
        Ok(t)
    }

    fn expect(&mut self, want: Token) -> Result<(), String> {
        let got = self.next()?;
        if got == want {
            Ok(())
        } else {
            Err(format!("expected {want:?}, got {got:?}"))
        }
    }

    fn chain(&mut self) -> Result<Chain, String> {
        let Token::Ident(first) = self.next()? else {
            return Err("chain must start with an identifier".into());
        };
        let mut chain = Chain {
            root: "__".to_string(),
            calls: Vec::new(),
        };
        if self.peek() == Some(&Token::LParen) {
            let args = self.args()?;
            chain.calls.push(Call { name: first, args });
        } else {
            chain.root = first;
        }
        while self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            let Token::Ident(name) = self.next()? else {
                return Err("expected step name".into());
            };
            let args = self.args()?;
            chain.calls.push(Call { name, args });
        }
        Ok(chain)
    }

    fn args(&mut self) -> Result<Vec<Arg>, String> {
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.arg()?);
            match self.next()? {
                Token::Comma => continue,
                Token::RParen => break,
                other => return Err(format!("unexpected {other:?} in argument list")),
            }
        }
        Ok(args)
    }

    fn arg(&mut self) -> Result<Arg, String> {
        match self.peek().cloned() {
            Some(Token::Str(s)) => {
                self.pos += 1;
                Ok(Arg::Value(Value::String(s)))
            }
            Some(Token::Num(n)) => {
                self.pos += 1;
                Ok(Arg::Value(n))
            }
            Some(Token::Ident(word)) => {
                let followed_by = self.tokens.get(self.pos + 1);
                if matches!(followed_by, Some(Token::LParen) | Some(Token::Dot)) {
                    return self.chain().map(Arg::Chain);
                }
                self.pos += 1;
                Ok(match word.as_str() {
                    "true" => Arg::Value(Value::Bool(true)),
                    "false" => Arg::Value(Value::Bool(false)),
                    "null" => Arg::Value(Value::Null),
                    _ => Arg::Word(word),
                })
            }
            other => Err(format!("unexpected argument token {other:?}")),
        }
    }
}

fn parse(script: &str) -> Result<Chain, String> {
    let mut parser = Parser {
        tokens: tokenize(script)?,
        pos: 0,
    };
    let chain = parser.chain()?;
    if parser.pos != parser.tokens.len() {
        return Err(format!("trailing tokens in {script}"));
    }
    Ok(chain)
}

// ── In-memory store ─────────────────────────────────────────────

#[derive(Debug, Clone)]
struct MemVertex {
    id: String,
    label: String,
    /// (property id, key, value)
    props: Vec<(String, String, Value)>,
}

#[derive(Debug, Clone)]
struct MemEdge {
    id: String,
    label: String,
    out_v: String,
    in_v: String,
    props: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
enum Item {
    Vertex(String),
    Edge(String),
}

#[derive(Debug, Clone)]
struct Traverser {
    item: Item,
}

impl Traverser {
    fn new(item: Item) -> Self {
        Self { item }
    }

    fn step(&self, item: Item) -> Self {
        Self { item }
    }
}

#[derive(Default)]
struct Store {
    vertices: Vec<MemVertex>,
    edges: Vec<MemEdge>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn arg_value(arg: &Arg) -> Result<Value, String> {
    match arg {
        Arg::Value(v) => Ok(v.clone()),
        other => Err(format!("expected literal, got {other:?}")),
    }
}

fn arg_strings(args: &[Arg]) -> Result<Vec<String>, String> {
    args.iter()
        .map(|a| match a {
            Arg::Value(Value::String(s)) => Ok(s.clone()),
            other => Err(format!("expected string, got {other:?}")),
        })
        .collect()
}

fn arg_chain(arg: Option<&Arg>) -> Result<&Chain, String> {
    match arg {
        Some(Arg::Chain(c)) => Ok(c),
        other => Err(format!("expected child traversal, got {other:?}")),
    }
}

impl Store {
    fn vertex(&self, id: &str) -> Option<&MemVertex> {
        self.vertices.iter().find(|v| v.id == id)
    }

    fn edge(&self, id: &str) -> Option<&MemEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    fn label_of(&self, item: &Item) -> Option<&str> {
        match item {
            Item::Vertex(id) => self.vertex(id).map(|v| v.label.as_str()),
            Item::Edge(id) => self.edge(id).map(|e| e.label.as_str()),
        }
    }

    fn eval(&mut self, chain: &Chain) -> Result<Vec<Traverser>, String> {
        self.apply(Vec::new(), &chain.calls)
    }

    fn apply(&mut self, mut stream: Vec<Traverser>, calls: &[Call]) -> Result<Vec<Traverser>, String> {
        let mut i = 0;
        let mut pending_edge: Option<String> = None;
        while i < calls.len() {
            let call = &calls[i];
            let args = &call.args;
            stream = match call.name.as_str() {
                "V" => {
                    let ids = arg_strings(args)?;
                    self.vertices
                        .iter()
                        .filter(|v| ids.is_empty() || ids.contains(&v.id))
                        .map(|v| Traverser::new(Item::Vertex(v.id.clone())))
                        .collect()
                }
                "E" => {
                    let ids = arg_strings(args)?;
                    self.edges
                        .iter()
                        .filter(|e| ids.is_empty() || ids.contains(&e.id))
                        .map(|e| Traverser::new(Item::Edge(e.id.clone())))
                        .collect()
                }
                "addV" => {
                    let label = arg_strings(args)?.pop().ok_or("addV needs a label")?;
                    let id = new_id();
                    self.vertices.push(MemVertex {
                        id: id.clone(),
                        label,
                        props: Vec::new(),
                    });
                    vec![Traverser::new(Item::Vertex(id))]
                }
                "addE" => {
                    pending_edge = Some(arg_strings(args)?.pop().ok_or("addE needs a label")?);
                    stream
                }
                "to" => {
                    let label = pending_edge.take().ok_or("to() without addE()")?;
                    let target = self.eval(arg_chain(args.first())?)?;
                    let Some(Traverser { item: Item::Vertex(in_v), .. }) = target.into_iter().next()
                    else {
                        return Ok(Vec::new());
                    };
                    let mut created = Vec::new();
                    for t in &stream {
                        let Item::Vertex(out_v) = &t.item else {
                            return Err("addE from a non-vertex".into());
                        };
                        let id = new_id();
                        self.edges.push(MemEdge {
                            id: id.clone(),
                            label: label.clone(),
                            out_v: out_v.clone(),
                            in_v: in_v.clone(),
                            props: Map::new(),
                        });
                        created.push(Traverser::new(Item::Edge(id)));
                    }
                    created
                }
                "property" => {
                    let (single, key, value) = match args.as_slice() {
                        [Arg::Word(c), k, v] => (c == "single", arg_value(k)?, arg_value(v)?),
                        [k, v] => (false, arg_value(k)?, arg_value(v)?),
                        _ => return Err("bad property() arguments".into()),
                    };
                    let key = key.as_str().ok_or("property key must be a string")?.to_string();
                    for t in &stream {
                        match &t.item {
                            Item::Vertex(id) => {
                                let v = self
                                    .vertices
                                    .iter_mut()
                                    .find(|v| &v.id == id)
                                    .ok_or("vertex vanished")?;
                                if single {
                                    v.props.retain(|(_, k, _)| k != &key);
                                }
                                v.props.push((new_id(), key.clone(), value.clone()));
                            }
                            Item::Edge(id) => {
                                let e = self
                                    .edges
                                    .iter_mut()
                                    .find(|e| &e.id == id)
                                    .ok_or("edge vanished")?;
                                e.props.insert(key.clone(), value.clone());
                            }
                        }
                    }
                    stream
                }
                "has" => {
                    let (label, key, value) = match args.as_slice() {
                        [l, k, v] => (Some(arg_value(l)?), arg_value(k)?, arg_value(v)?),
                        [k, v] => (None, arg_value(k)?, arg_value(v)?),
                        _ => return Err("bad has() arguments".into()),
                    };
                    let key = key.as_str().unwrap_or_default().to_string();
                    stream
                        .into_iter()
                        .filter(|t| {
                            let label_ok = label
                                .as_ref()
                                .map_or(true, |l| self.label_of(&t.item) == l.as_str());
                            label_ok && self.has_value(&t.item, &key, &value)
                        })
                        .collect()
                }
                "hasNot" => {
                    let key = arg_strings(args)?.pop().unwrap_or_default();
                    stream
                        .into_iter()
                        .filter(|t| !self.has_key(&t.item, &key))
                        .collect()
                }
                "hasLabel" => {
                    let labels = arg_strings(args)?;
                    stream
                        .into_iter()
                        .filter(|t| {
                            self.label_of(&t.item)
                                .is_some_and(|l| labels.iter().any(|want| want == l))
                        })
                        .collect()
                }
                "hasId" => {
                    let ids = arg_strings(args)?;
                    stream
                        .into_iter()
                        .filter(|t| match &t.item {
                            Item::Vertex(id) | Item::Edge(id) => ids.contains(id),
                        })
                        .collect()
                }
                "out" | "in" | "outE" | "inE" => {
                    let labels = arg_strings(args)?;
                    let outgoing = call.name.starts_with("out");
                    let to_edge = call.name.ends_with('E');
                    let mut next = Vec::new();
                    for t in &stream {
                        let Item::Vertex(vid) = &t.item else { continue };
                        for e in &self.edges {
                            let (near, far) = if outgoing {
                                (&e.out_v, &e.in_v)
                            } else {
                                (&e.in_v, &e.out_v)
                            };
                            if near != vid || !(labels.is_empty() || labels.contains(&e.label)) {
                                continue;
                            }
                            next.push(if to_edge {
                                t.step(Item::Edge(e.id.clone()))
                            } else {
                                t.step(Item::Vertex(far.clone()))
                            });
                        }
                    }
                    next
                }
                "inV" | "outV" => {
                    let want_in = call.name == "inV";
                    stream
                        .iter()
                        .filter_map(|t| match &t.item {
                            Item::Edge(eid) => self.edge(eid).map(|e| {
                                let v = if want_in { &e.in_v } else { &e.out_v };
                                t.step(Item::Vertex(v.clone()))
                            }),
                            Item::Vertex(_) => None,
                        })
                        .collect()
                }
                "limit" => {
                    let n = arg_value(args.first().ok_or("limit needs n")?)?
                        .as_u64()
                        .ok_or("limit takes an integer")?;
                    stream.into_iter().take(n as usize).collect()
                }
                "drop" => {
                    for t in &stream {
                        match &t.item {
                            Item::Vertex(id) => {
                                self.vertices.retain(|v| &v.id != id);
                                self.edges.retain(|e| &e.out_v != id && &e.in_v != id);
                            }
                            Item::Edge(id) => self.edges.retain(|e| &e.id != id),
                        }
                    }
                    Vec::new()
                }
                "repeat" => {
                    let body = arg_chain(args.first())?.clone();
                    let until = calls.get(i + 1).filter(|c| c.name == "until").ok_or("repeat() needs until()")?;
                    let until = arg_chain(until.args.first())?.clone();
                    i += 1;

                    let mut frontier = stream;
                    let mut done = Vec::new();
                    let mut loops = 0u64;
                    while !frontier.is_empty() && loops < 1_000 {
                        loops += 1;
                        let stepped = self.apply(frontier, &body.calls)?;
                        frontier = Vec::new();
                        for t in stepped {
                            if self.test(&t, loops, &until)? {
                                done.push(t);
                            } else {
                                frontier.push(t);
                            }
                        }
                    }
                    done
                }
                other => return Err(format!("unsupported step {other}")),
            };
            i += 1;
        }
        Ok(stream)
    }

    fn test(&mut self, t: &Traverser, loops: u64, predicate: &Chain) -> Result<bool, String> {
        match predicate.calls.as_slice() {
            [or] if or.name == "or" => {
                for arg in &or.args {
                    if self.test(t, loops, arg_chain(Some(arg))?)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            [l, is] if l.name == "loops" && is.name == "is" => {
                let cmp = arg_chain(is.args.first())?;
                let [gte] = cmp.calls.as_slice() else {
                    return Err("unsupported loops() comparison".into());
                };
                let bound = arg_value(gte.args.first().ok_or("gte needs a bound")?)?
                    .as_u64()
                    .ok_or("gte takes an integer")?;
                Ok(gte.name == "gte" && loops >= bound)
            }
            calls => Ok(!self.apply(vec![t.clone()], calls)?.is_empty()),
        }
    }

    fn has_value(&self, item: &Item, key: &str, value: &Value) -> bool {
        match item {
            Item::Vertex(id) => self
                .vertex(id)
                .is_some_and(|v| v.props.iter().any(|(_, k, val)| k == key && val == value)),
            Item::Edge(id) => self
                .edge(id)
                .is_some_and(|e| e.props.get(key) == Some(value)),
        }
    }

    fn has_key(&self, item: &Item, key: &str) -> bool {
        match item {
            Item::Vertex(id) => self
                .vertex(id)
                .is_some_and(|v| v.props.iter().any(|(_, k, _)| k == key)),
            Item::Edge(id) => self.edge(id).is_some_and(|e| e.props.contains_key(key)),
        }
    }

    fn graphson(&self, item: &Item) -> Value {
        match item {
            Item::Vertex(id) => match self.vertex(id) {
                Some(v) => {
                    let mut props: Map<String, Value> = Map::new();
                    for (pid, key, value) in &v.props {
                        let group = props.entry(key.clone()).or_insert_with(|| json!([]));
                        if let Value::Array(entries) = group {
                            entries.push(json!({"id": pid, "value": value}));
                        }
                    }
                    let mut raw = json!({"id": v.id, "label": v.label, "type": "vertex"});
                    if !props.is_empty() {
                        raw["properties"] = Value::Object(props);
                    }
                    raw
                }
                None => Value::Null,
            },
            Item::Edge(id) => match self.edge(id) {
                Some(e) => json!({
                    "id": e.id,
                    "label": e.label,
                    "type": "edge",
                    "inV": e.in_v,
                    "inVLabel": self.vertex(&e.in_v).map(|v| v.label.clone()),
                    "outV": e.out_v,
                    "outVLabel": self.vertex(&e.out_v).map(|v| v.label.clone()),
                    "properties": e.props,
                }),
                None => Value::Null,
            },
        }
    }
}

/// In-memory Gremlin store that records every submitted script.
#[derive(Default)]
pub struct MemoryGraph {
    store: Mutex<Store>,
    scripts: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl MemoryGraph {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn last_script(&self) -> Option<String> {
        self.scripts.lock().unwrap().last().cloned()
    }

    /// Fail every submission with `message` until cleared.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn vertex_count(&self) -> usize {
        self.store.lock().unwrap().vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.store.lock().unwrap().edges.len()
    }

    fn execute(&self, script: &str) -> Result<ResultSet, TransportError> {
        self.scripts.lock().unwrap().push(script.to_string());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(TransportError::msg(message));
        }
        let chain = parse(script).map_err(TransportError::msg)?;
        let mut store = self.store.lock().unwrap();
        let results = store.eval(&chain).map_err(TransportError::msg)?;
        Ok(results.iter().map(|t| store.graphson(&t.item)).collect())
    }
}

impl Transport for MemoryGraph {
    async fn submit(&self, script: &str) -> Result<ResultSet, TransportError> {
        self.execute(script)
    }
}

/// Replays queued responses in order and records scripts.
#[derive(Default)]
pub struct Canned {
    responses: Mutex<VecDeque<Result<Vec<Value>, String>>>,
    scripts: Mutex<Vec<String>>,
}

impl Canned {
    pub fn new(responses: Vec<Result<Vec<Value>, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            scripts: Mutex::new(Vec::new()),
        })
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    fn execute(&self, script: &str) -> Result<ResultSet, TransportError> {
        self.scripts.lock().unwrap().push(script.to_string());
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(items)) => Ok(ResultSet::new(items)),
            Some(Err(message)) => Err(TransportError::msg(message)),
            None => Ok(ResultSet::default()),
        }
    }
}

impl Transport for Canned {
    async fn submit(&self, script: &str) -> Result<ResultSet, TransportError> {
        self.execute(script)
    }
}

pub fn client_for<T: Transport>(transport: Arc<T>) -> GremlinClient<T> {
    GremlinClient::new(transport, &GremlinConfig::default())
}

pub fn props(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
