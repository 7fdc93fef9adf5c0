// tests/core/walk.rs
use secure_pillar::core::path::get_path;
use secure_pillar::core::{is_encrypted, parse_str, walk, Node};
use secure_pillar::error::CoreError;
use secure_pillar::{Action, WalkPolicy};

use crate::support::{FakeCipher, FAKE_KEY_ID};

const DOC: &str = "\
secure_vars:
  db_pass: plaintext123
  nested:
    - one
    - two
    - port: 5432
other:
  api_key: leave-me
  enabled: true
";

fn all_strings_encrypted(node: &Node) -> bool {
    match node {
        Node::Scalar(s) => match s {
            secure_pillar::Scalar::String(v) => is_encrypted(v),
            _ => true,
        },
        Node::Sequence(items) => items.iter().all(all_strings_encrypted),
        Node::Mapping(entries) => entries.iter().all(|(_, v)| all_strings_encrypted(v)),
    }
}

#[test]
fn test_identify_on_plaintext_tree_is_identity() {
    let cipher = FakeCipher::new();
    let root = parse_str(DOC).unwrap();

    let walked = walk(&cipher, &root, Action::Identify, None, WalkPolicy::BestEffort).unwrap();
    assert!(walked.is_clean());
    assert_eq!(walked.node, root);
}

#[test]
fn test_encrypt_preserves_shape_and_skips_non_strings() {
    let cipher = FakeCipher::new();
    let root = parse_str(DOC).unwrap();

    let walked = walk(&cipher, &root, Action::Encrypt, None, WalkPolicy::BestEffort).unwrap();
    let out = walked.into_result().unwrap();

    assert!(out.same_shape(&root));
    assert!(all_strings_encrypted(&out));
    assert_eq!(get_path(&out, "other:enabled"), get_path(&root, "other:enabled"));
    assert_eq!(
        get_path(&out, "secure_vars:nested:2:port"),
        get_path(&root, "secure_vars:nested:2:port")
    );
}

#[test]
fn test_scope_leaves_other_keys_untouched() {
    let cipher = FakeCipher::new();
    let root = parse_str(DOC).unwrap();

    let out = walk(
        &cipher,
        &root,
        Action::Encrypt,
        Some("secure_vars"),
        WalkPolicy::BestEffort,
    )
    .unwrap()
    .node;

    assert_eq!(out.get("other"), root.get("other"));
    assert!(all_strings_encrypted(out.get("secure_vars").unwrap()));
    // 3 string leaves under secure_vars
    assert_eq!(cipher.calls(), 3);
}

#[test]
fn test_scope_on_non_mapping_root_passes_through() {
    let cipher = FakeCipher::new();
    let root = parse_str("- a\n- b\n").unwrap();

    let out = walk(&cipher, &root, Action::Encrypt, Some("secure_vars"), WalkPolicy::BestEffort)
        .unwrap()
        .node;
    assert_eq!(out, root);
    assert_eq!(cipher.calls(), 0);
}

#[test]
fn test_empty_and_null_roots_short_circuit() {
    let cipher = FakeCipher::new();
    for text in ["", "{}\n", "[]\n"] {
        let root = parse_str(text).unwrap();
        let walked = walk(&cipher, &root, Action::Decrypt, None, WalkPolicy::StopOnError).unwrap();
        assert_eq!(walked.node, root);
    }
    assert_eq!(cipher.calls(), 0);
}

#[test]
fn test_scalar_root_is_transformed() {
    let cipher = FakeCipher::new();
    let root = Node::string("lonely");

    let out = walk(&cipher, &root, Action::Encrypt, None, WalkPolicy::BestEffort)
        .unwrap()
        .node;
    assert!(is_encrypted(out.as_str().unwrap()));
}

#[test]
fn test_null_sequence_element_walks_to_itself() {
    let cipher = FakeCipher::new();
    let root = parse_str("list:\n  - ~\n  - value\n").unwrap();

    let out = walk(&cipher, &root, Action::Encrypt, None, WalkPolicy::BestEffort)
        .unwrap()
        .node;
    assert!(get_path(&out, "list:0").unwrap().is_null());
    assert!(is_encrypted(get_path(&out, "list:1").unwrap().as_str().unwrap()));
}

#[test]
fn test_best_effort_keeps_failed_leaf_and_continues() {
    crate::common::setup();
    let cipher = FakeCipher::new().failing_on("two");
    let root = parse_str(DOC).unwrap();

    let walked = walk(&cipher, &root, Action::Encrypt, None, WalkPolicy::BestEffort).unwrap();

    assert_eq!(walked.failures.len(), 1);
    match &walked.failures[0] {
        CoreError::AtPath { path, .. } => assert_eq!(path, "secure_vars:nested:1"),
        other => panic!("expected AtPath, got {other:?}"),
    }
    assert_eq!(
        get_path(&walked.node, "secure_vars:nested:1").unwrap().as_str().unwrap(),
        "two"
    );
    // siblings after the failure were still encrypted
    assert!(is_encrypted(
        get_path(&walked.node, "other:api_key").unwrap().as_str().unwrap()
    ));
}

#[test]
fn test_stop_on_error_aborts_walk() {
    let cipher = FakeCipher::new().failing_on("plaintext123");
    let root = parse_str(DOC).unwrap();

    let err = walk(&cipher, &root, Action::Encrypt, None, WalkPolicy::StopOnError).unwrap_err();
    assert!(matches!(err, CoreError::AtPath { ref path, .. } if path == "secure_vars:db_pass"));
    assert!(matches!(err.root_cause(), CoreError::Crypto(_)));
    // nothing after the first leaf was attempted
    assert_eq!(cipher.calls(), 1);
}

#[test]
fn test_identify_replaces_only_ciphertext() {
    let cipher = FakeCipher::new();
    let text = format!(
        "plain: visible\nsecret: |\n{}",
        FakeCipher::armor(FAKE_KEY_ID, "hidden")
            .lines()
            .map(|l| format!("  {l}\n"))
            .collect::<String>()
    );
    let root = parse_str(&text).unwrap();

    let out = walk(&cipher, &root, Action::Identify, None, WalkPolicy::BestEffort)
        .unwrap()
        .node;
    assert_eq!(out.get("plain").unwrap().as_str().unwrap(), "visible");
    assert_eq!(
        out.get("secret").unwrap().as_str().unwrap(),
        "0123456789ABCDEF: Salt Master <salt-master@example.com>"
    );
}
