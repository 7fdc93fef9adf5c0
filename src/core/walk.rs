// src/core/walk.rs
//! Tree walker: recursive descent applying the leaf transformer
//!
//! The output always has the input's shape: same keys in the same order,
//! same sequence lengths. Only string scalar content changes.

use tracing::trace;

use crate::consts::PATH_SEPARATOR;
use crate::core::crypto::{is_encrypted, Cipher};
use crate::core::leaf;
use crate::core::node::{Node, Scalar};
use crate::core::Result;
use crate::enums::{Action, WalkPolicy};
use crate::error::CoreError;

/// Walk output: the rewritten tree plus every leaf failure seen.
///
/// Under `BestEffort` a failed leaf keeps its original value.
#[derive(Debug)]
pub struct Walked {
    pub node: Node,
    pub failures: Vec<CoreError>,
}

impl Walked {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Hand back the tree, or the first failure if there was one
    pub fn into_result(mut self) -> Result<Node> {
        if self.failures.is_empty() {
            Ok(self.node)
        } else {
            Err(self.failures.swap_remove(0))
        }
    }
}

/// Walk `node` applying `action` to every string scalar.
///
/// With `scope` set and a mapping root, only the value under the matching
/// top-level key is descended into; every other entry is copied untouched.
/// Under `StopOnError` the first leaf failure aborts the walk.
pub fn walk<C: Cipher + ?Sized>(
    cipher: &C,
    node: &Node,
    action: Action,
    scope: Option<&str>,
    policy: WalkPolicy,
) -> Result<Walked> {
    let mut walker = Walker {
        cipher,
        action,
        policy,
        path: Vec::new(),
        failures: Vec::new(),
    };

    let node = match (scope, node) {
        (Some(scope), Node::Mapping(entries)) => {
            let mut out = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                if key.matches(scope) {
                    walker.path.push(key.label());
                    let walked = walker.node(value)?;
                    walker.path.pop();
                    out.push((key.clone(), walked));
                } else {
                    out.push((key.clone(), value.clone()));
                }
            }
            Node::Mapping(out)
        }
        (Some(_), other) => other.clone(),
        (None, root) => walker.node(root)?,
    };

    Ok(Walked {
        node,
        failures: walker.failures,
    })
}

struct Walker<'a, C: ?Sized> {
    cipher: &'a C,
    action: Action,
    policy: WalkPolicy,
    path: Vec<String>,
    failures: Vec<CoreError>,
}

impl<C: Cipher + ?Sized> Walker<'_, C> {
    fn node(&mut self, node: &Node) -> Result<Node> {
        match node {
            Node::Scalar(Scalar::String(value)) => self.leaf(value),
            Node::Scalar(other) => Ok(Node::Scalar(other.clone())),
            Node::Sequence(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push(index.to_string());
                    let walked = self.node(item);
                    self.path.pop();
                    out.push(walked?);
                }
                Ok(Node::Sequence(out))
            }
            Node::Mapping(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    self.path.push(key.label());
                    let walked = self.node(value);
                    self.path.pop();
                    out.push((key.clone(), walked?));
                }
                Ok(Node::Mapping(out))
            }
        }
    }

    fn leaf(&mut self, value: &str) -> Result<Node> {
        // identify keeps plaintext as-is so a clean tree reports itself
        if self.action == Action::Identify && !is_encrypted(value) {
            return Ok(Node::string(value));
        }

        match leaf::transform(self.cipher, value, self.action) {
            Ok(transformed) => Ok(Node::string(transformed)),
            Err(err) => {
                let err = CoreError::AtPath {
                    path: self.current_path(),
                    source: Box::new(CoreError::from(err)),
                };
                match self.policy {
                    WalkPolicy::StopOnError => Err(err),
                    WalkPolicy::BestEffort => {
                        trace!("leaf failed, keeping value: {err}");
                        self.failures.push(err);
                        Ok(Node::string(value))
                    }
                }
            }
        }
    }

    fn current_path(&self) -> String {
        self.path.join(&PATH_SEPARATOR.to_string())
    }
}
