// src/pillar.rs
//! Single-document operations
//!
//! `Pillar` owns the cipher and the run options (scope, walk policy) and
//! turns a file or a byte buffer into an output buffer. It never writes:
//! callers choose stdout, a new file or the input path via `Destination`.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::Config;
use crate::consts::{SLS_EXTENSION, SLS_HEADER};
use crate::core::crypto::Cipher;
use crate::core::file::{check_for_file, read_sls_file, scan_for_includes};
use crate::core::node::{self, Node};
use crate::core::walk::{walk, Walked};
use crate::core::{leaf, path, Result};
use crate::enums::{Action, WalkPolicy};

/// One named secret for `create` / `update`; `name` is a colon path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub value: String,
}

impl Secret {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Secret {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug)]
pub struct Pillar<C> {
    cipher: C,
    scope: Option<String>,
    policy: WalkPolicy,
    extension: String,
}

impl<C: Cipher> Pillar<C> {
    pub fn new(cipher: C) -> Self {
        Pillar {
            cipher,
            scope: None,
            policy: WalkPolicy::default(),
            extension: SLS_EXTENSION.to_string(),
        }
    }

    /// Scope and options taken from the run config
    pub fn from_config(cipher: C, config: &Config) -> Self {
        Pillar::new(cipher)
            .with_scope(config.scope())
            .with_extension(&config.pillar.extension)
    }

    /// Restrict transformation to one top-level key; empty means no scope
    pub fn with_scope(mut self, scope: Option<&str>) -> Self {
        self.scope = scope.filter(|s| !s.is_empty()).map(str::to_string);
        self
    }

    pub fn with_policy(mut self, policy: WalkPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// File name marker used when sweeping directories
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn policy(&self) -> WalkPolicy {
        self.policy
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Read `path`, apply `action` and render the result
    pub fn apply(&self, path: &Path, action: Action) -> Result<Vec<u8>> {
        check_for_file(path)?;
        let bytes = read_sls_file(path)?;
        debug!("{action} {}", path.display());
        self.apply_bytes(&bytes, action)
    }

    /// Same as `apply` for a document already in memory (stdin)
    pub fn apply_bytes(&self, bytes: &[u8], action: Action) -> Result<Vec<u8>> {
        let root = self.load(bytes)?;
        let transformed = self.transform(&root, action)?;
        self.format_buffer(&transformed, action)
    }

    /// Walk with the configured scope and policy. Under `BestEffort` leaf
    /// failures are logged and the affected values left as they were.
    pub fn transform(&self, root: &Node, action: Action) -> Result<Node> {
        let walked = self.walk(root, action, self.scope())?;
        for failure in &walked.failures {
            warn!("{action} failed {failure}");
        }
        Ok(walked.node)
    }

    /// Raw walker output, failures included
    pub fn walk(&self, root: &Node, action: Action, scope: Option<&str>) -> Result<Walked> {
        walk(&self.cipher, root, action, scope, self.policy)
    }

    /// Serialize, prefixing the renderer header unless this is a report
    pub fn format_buffer(&self, root: &Node, action: Action) -> Result<Vec<u8>> {
        let body = node::serialize(root)?;
        if !action.writes_header() {
            return Ok(body);
        }
        let mut out = Vec::with_capacity(SLS_HEADER.len() + body.len());
        out.extend_from_slice(SLS_HEADER.as_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn encrypt_all(&self, path: &Path) -> Result<Vec<u8>> {
        self.apply(path, Action::Encrypt)
    }

    pub fn decrypt_all(&self, path: &Path) -> Result<Vec<u8>> {
        self.apply(path, Action::Decrypt)
    }

    pub fn keys_all(&self, path: &Path) -> Result<Vec<u8>> {
        self.apply(path, Action::Identify)
    }

    /// New document holding each secret encrypted at its path
    pub fn create(&self, secrets: &[Secret]) -> Result<Vec<u8>> {
        let mut root = Node::null();
        self.set_secrets(&mut root, secrets)?;
        self.format_buffer(&root, Action::Encrypt)
    }

    /// Merge secrets into the document at `path`, replacing existing keys
    pub fn update(&self, path: &Path, secrets: &[Secret]) -> Result<Vec<u8>> {
        check_for_file(path)?;
        let bytes = read_sls_file(path)?;
        self.update_bytes(&bytes, secrets)
    }

    pub fn update_bytes(&self, bytes: &[u8], secrets: &[Secret]) -> Result<Vec<u8>> {
        let mut root = self.load(bytes)?;
        self.set_secrets(&mut root, secrets)?;
        self.format_buffer(&root, Action::Encrypt)
    }

    /// Subtree at a colon path with `action` applied, ignoring scope.
    /// `None` when the path does not exist.
    pub fn value_at_path(
        &self,
        path: &Path,
        yaml_path: &str,
        action: Action,
    ) -> Result<Option<Node>> {
        check_for_file(path)?;
        let bytes = read_sls_file(path)?;
        self.value_at_path_bytes(&bytes, yaml_path, action)
    }

    pub fn value_at_path_bytes(
        &self,
        bytes: &[u8],
        yaml_path: &str,
        action: Action,
    ) -> Result<Option<Node>> {
        let root = self.load(bytes)?;
        let Some(found) = path::get_path(&root, yaml_path) else {
            warn!("unable to find path: '{yaml_path}'");
            return Ok(None);
        };
        let walked = self.walk(found, action, None)?;
        for failure in &walked.failures {
            warn!("{action} failed at '{yaml_path}' {failure}");
        }
        Ok(Some(walked.node))
    }

    fn load(&self, bytes: &[u8]) -> Result<Node> {
        scan_for_includes(bytes)?;
        node::parse(bytes)
    }

    fn set_secrets(&self, root: &mut Node, secrets: &[Secret]) -> Result<()> {
        for secret in secrets {
            let armored = leaf::encrypt_value(&self.cipher, &secret.value)?;
            path::set_path(root, &secret.name, Node::string(armored))?;
        }
        Ok(())
    }
}
