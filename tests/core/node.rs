// tests/core/node.rs
use secure_pillar::core::{parse_str, serialize, Node, Scalar};
use secure_pillar::error::CoreError;

#[test]
fn test_parse_keeps_key_order_and_scalar_types() {
    let root = parse_str(
        "zeta: 1\nalpha: true\nmid: ~\nname: plain\n42: answer\nlist:\n  - a\n  - 2.5\n",
    )
    .unwrap();

    let entries = root.as_mapping().unwrap();
    let keys: Vec<String> = entries.iter().map(|(k, _)| k.label()).collect();
    assert_eq!(keys, ["zeta", "alpha", "mid", "name", "42", "list"]);

    assert_eq!(root.get("zeta").unwrap().as_scalar().unwrap().kind(), "number");
    assert_eq!(root.get("alpha").unwrap(), &Node::Scalar(Scalar::Bool(true)));
    assert!(root.get("mid").unwrap().is_null());
    assert_eq!(root.get("name").unwrap().as_str().unwrap(), "plain");
    assert_eq!(root.get("42").unwrap().as_str().unwrap(), "answer");
    assert_eq!(root.get("list").unwrap().as_sequence().unwrap().len(), 2);
}

#[test]
fn test_wrong_variant_access_is_type_mismatch() {
    let root = parse_str("key: value\n").unwrap();

    match root.as_sequence() {
        Err(CoreError::TypeMismatch { expected, found }) => {
            assert_eq!(expected, "sequence");
            assert_eq!(found, "mapping");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }

    let leaf = root.get("key").unwrap();
    assert!(matches!(
        leaf.as_mapping(),
        Err(CoreError::TypeMismatch { expected: "mapping", found: "string" })
    ));
    assert!(leaf.is_scalar() && !leaf.is_mapping() && !leaf.is_sequence());
}

#[test]
fn test_blank_document_parses_to_null_root() {
    assert!(parse_str("").unwrap().is_null());
    assert!(parse_str("# only a comment\n\n").unwrap().is_null());
    assert!(parse_str("#!yaml|gpg\n\n").unwrap().is_null());
}

#[test]
fn test_header_comment_is_ignored_by_parser() {
    let root = parse_str("#!yaml|gpg\n\nsecure_vars:\n  db_pass: x\n").unwrap();
    assert!(root.get("secure_vars").unwrap().is_mapping());
}

#[test]
fn test_complex_keys_and_tags_are_rejected() {
    assert!(matches!(
        parse_str("? [a, b]\n: value\n"),
        Err(CoreError::TypeMismatch { .. })
    ));
    assert!(matches!(
        parse_str("key: !custom value\n"),
        Err(CoreError::TypeMismatch { found: "tagged value", .. })
    ));
}

#[test]
fn test_malformed_yaml_is_a_yaml_error() {
    assert!(matches!(
        parse_str("key: [unclosed\n"),
        Err(CoreError::Yaml(_))
    ));
}

#[test]
fn test_serialize_then_parse_gives_same_tree() {
    let text = "secure_vars:\n  db_pass: |\n    line one\n    line two\n  port: 5432\nusers:\n- alice\n- bob\n";
    let root = parse_str(text).unwrap();
    let again = parse_str(&String::from_utf8(serialize(&root).unwrap()).unwrap()).unwrap();
    assert_eq!(root, again);
}

#[test]
fn test_leaf_count_and_same_shape() {
    let a = parse_str("a: 1\nb:\n  - x\n  - y\nc:\n  d: z\n").unwrap();
    let b = parse_str("a: 9\nb:\n  - p\n  - q\nc:\n  d: w\n").unwrap();
    let c = parse_str("a: 9\nb:\n  - p\nc:\n  d: w\n").unwrap();

    assert_eq!(a.leaf_count(), 4);
    assert!(a.same_shape(&b));
    assert!(!a.same_shape(&c));
}
