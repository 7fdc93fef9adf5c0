// tests/core/path.rs
use secure_pillar::core::path::{get_path, set_path, split};
use secure_pillar::core::{parse_str, Node};
use secure_pillar::error::CoreError;

#[test]
fn test_split_on_colons() {
    assert_eq!(split("a:b:c"), ["a", "b", "c"]);
    assert_eq!(split("single"), ["single"]);
}

#[test]
fn test_get_walks_mappings_and_sequence_indexes() {
    let root = parse_str("a:\n  b:\n    - first\n    - c: deep\n").unwrap();

    assert_eq!(get_path(&root, "a:b:0").unwrap().as_str().unwrap(), "first");
    assert_eq!(get_path(&root, "a:b:1:c").unwrap().as_str().unwrap(), "deep");
    assert!(get_path(&root, "a:missing").is_none());
    assert!(get_path(&root, "a:b:7").is_none());
    assert!(get_path(&root, "a:b:0:too_far").is_none());
}

#[test]
fn test_set_creates_intermediate_mappings() {
    let mut root = Node::null();
    set_path(&mut root, "secure_vars:db:password", Node::string("s3cret")).unwrap();
    set_path(&mut root, "secure_vars:db:user", Node::string("app")).unwrap();

    assert_eq!(
        get_path(&root, "secure_vars:db:password").unwrap().as_str().unwrap(),
        "s3cret"
    );
    assert_eq!(get_path(&root, "secure_vars:db").unwrap().leaf_count(), 2);
}

#[test]
fn test_set_replaces_existing_value_in_place() {
    let mut root = parse_str("first: 1\nkey: old\nlast: 3\n").unwrap();
    set_path(&mut root, "key", Node::string("new")).unwrap();

    let keys: Vec<String> = root
        .as_mapping()
        .unwrap()
        .iter()
        .map(|(k, _)| k.label())
        .collect();
    assert_eq!(keys, ["first", "key", "last"]);
    assert_eq!(root.get("key").unwrap().as_str().unwrap(), "new");
}

#[test]
fn test_set_through_scalar_is_type_mismatch() {
    let mut root = parse_str("key: value\n").unwrap();
    assert!(matches!(
        set_path(&mut root, "key:nested", Node::string("x")),
        Err(CoreError::TypeMismatch { expected: "mapping", found: "string" })
    ));
}

#[test]
fn test_set_out_of_range_index_is_path_not_found() {
    let mut root = parse_str("list:\n  - a\n").unwrap();
    assert!(matches!(
        set_path(&mut root, "list:5", Node::string("x")),
        Err(CoreError::PathNotFound(_))
    ));
    set_path(&mut root, "list:0", Node::string("b")).unwrap();
    assert_eq!(get_path(&root, "list:0").unwrap().as_str().unwrap(), "b");
}
