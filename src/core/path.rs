// src/core/path.rs
//! Colon-delimited path addressing ("secure_vars:db:password")
//!
//! Segments name mapping keys; on a sequence a segment is an index.

use crate::consts::PATH_SEPARATOR;
use crate::core::node::{Node, Scalar};
use crate::core::Result;
use crate::error::CoreError;

pub fn split(path: &str) -> Vec<&str> {
    path.split(PATH_SEPARATOR).collect()
}

/// Node at `segments`, or `None` if any segment is missing
pub fn get<'a>(node: &'a Node, segments: &[&str]) -> Option<&'a Node> {
    segments.iter().try_fold(node, |current, segment| match current {
        Node::Mapping(entries) => entries
            .iter()
            .find(|(k, _)| k.matches(segment))
            .map(|(_, v)| v),
        Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        Node::Scalar(_) => None,
    })
}

/// Set `value` at `segments`, creating intermediate mappings as needed.
///
/// A null node on the way is replaced by a mapping. Walking through a
/// non-null scalar is a `TypeMismatch`; an out-of-range sequence index
/// is `PathNotFound`.
pub fn set(node: &mut Node, segments: &[&str], value: Node) -> Result<()> {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return Ok(());
    };

    if node.is_null() {
        *node = Node::empty_mapping();
    }

    match node {
        Node::Mapping(entries) => {
            let index = match entries.iter().position(|(k, _)| k.matches(first)) {
                Some(i) => i,
                None => {
                    entries.push((Scalar::from(*first), Node::null()));
                    entries.len() - 1
                }
            };
            set(&mut entries[index].1, rest, value)
        }
        Node::Sequence(items) => {
            let child = first
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get_mut(i))
                .ok_or_else(|| CoreError::PathNotFound(segments.join(":")))?;
            set(child, rest, value)
        }
        Node::Scalar(s) => Err(CoreError::TypeMismatch {
            expected: "mapping",
            found: s.kind(),
        }),
    }
}

/// `get` with a colon path
pub fn get_path<'a>(node: &'a Node, path: &str) -> Option<&'a Node> {
    get(node, &split(path))
}

/// `set` with a colon path
pub fn set_path(node: &mut Node, path: &str, value: Node) -> Result<()> {
    set(node, &split(path), value)
}
