// src/core/node.rs
//! Node model: the in-memory shape of a parsed pillar document
//!
//! A document is a tree of `Scalar`, `Sequence` and `Mapping` nodes.
//! Mapping keys may be any scalar YAML allows, and keep their source order.
//! Parsing and serialization go through serde_yaml; nothing here touches
//! the filesystem or crypto.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::{Number, Value};

use crate::core::Result;
use crate::error::CoreError;

/// Atomic YAML value. Only `String` is ever encrypted.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Vec<(Scalar, Node)>),
}

impl Scalar {
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Number(_) => "number",
            Scalar::String(_) => "string",
        }
    }

    /// Does this key answer to a path segment or scope name?
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Scalar::String(s) => s == name,
            Scalar::Number(n) => n.to_string() == name,
            Scalar::Bool(b) => b.to_string() == name,
            Scalar::Null => name == "~" || name == "null",
        }
    }

    /// Rendering used for diagnostic paths
    pub fn label(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => "~".to_string(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(s.into()))
    }

    pub fn empty_mapping() -> Self {
        Node::Mapping(Vec::new())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Scalar(s) => s.kind(),
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    fn mismatch(&self, expected: &'static str) -> CoreError {
        CoreError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn as_scalar(&self) -> Result<&Scalar> {
        match self {
            Node::Scalar(s) => Ok(s),
            other => Err(other.mismatch("scalar")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    pub fn as_sequence(&self) -> Result<&[Node]> {
        match self {
            Node::Sequence(items) => Ok(items),
            other => Err(other.mismatch("sequence")),
        }
    }

    pub fn as_mapping(&self) -> Result<&[(Scalar, Node)]> {
        match self {
            Node::Mapping(entries) => Ok(entries),
            other => Err(other.mismatch("mapping")),
        }
    }

    pub fn as_mapping_mut(&mut self) -> Result<&mut Vec<(Scalar, Node)>> {
        match self {
            Node::Mapping(entries) => Ok(entries),
            other => Err(other.mismatch("mapping")),
        }
    }

    /// First value stored under a matching key
    pub fn get(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.matches(name))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Number of scalar leaves reachable from here
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Scalar(_) => 1,
            Node::Sequence(items) => items.iter().map(Node::leaf_count).sum(),
            Node::Mapping(entries) => entries.iter().map(|(_, v)| v.leaf_count()).sum(),
        }
    }

    /// Same variants, same key sets and same sequence lengths all the way down;
    /// scalar content is not compared.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Scalar(_), Node::Scalar(_)) => true,
            (Node::Sequence(a), Node::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (Node::Mapping(a), Node::Mapping(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_shape(vb))
            }
            _ => false,
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            Value::Number(n) => Ok(Scalar::Number(n)),
            Value::String(s) => Ok(Scalar::String(s)),
            Value::Sequence(_) => Err(CoreError::TypeMismatch {
                expected: "scalar",
                found: "sequence",
            }),
            Value::Mapping(_) => Err(CoreError::TypeMismatch {
                expected: "scalar",
                found: "mapping",
            }),
            Value::Tagged(_) => Err(CoreError::TypeMismatch {
                expected: "scalar",
                found: "tagged value",
            }),
        }
    }
}

impl TryFrom<Value> for Node {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Sequence(items) => Ok(Node::Sequence(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>>>()?,
            )),
            Value::Mapping(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in map {
                    entries.push((Scalar::try_from(k)?, Node::try_from(v)?));
                }
                Ok(Node::Mapping(entries))
            }
            Value::Tagged(_) => Err(CoreError::TypeMismatch {
                expected: "untagged value",
                found: "tagged value",
            }),
            scalar => Ok(Node::Scalar(Scalar::try_from(scalar)?)),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Node::Scalar(s) => s.serialize(serializer),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

/// Parse a YAML document. A document with nothing but blank lines and
/// comments parses to a null root.
pub fn parse(bytes: &[u8]) -> Result<Node> {
    if is_blank_document(bytes) {
        return Ok(Node::null());
    }
    let value: Value = serde_yaml::from_slice(bytes)?;
    Node::try_from(value)
}

pub fn parse_str(text: &str) -> Result<Node> {
    parse(text.as_bytes())
}

/// Serialize a node to YAML text (no header)
pub fn serialize(node: &Node) -> Result<Vec<u8>> {
    Ok(serde_yaml::to_string(node)?.into_bytes())
}

fn is_blank_document(bytes: &[u8]) -> bool {
    String::from_utf8_lossy(bytes).lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}
