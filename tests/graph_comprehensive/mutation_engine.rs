//! Batch insertion through the public API.

use crate::test_utils::*;
use serde_json::json;
use skein::*;

#[test]
fn placeholders_resolve_in_batch_order() {
    let (_kv, graph) = setup();
    let resolved = seed_social(&graph);
    let pairs = resolved.into_vec();
    assert_eq!(
        pairs,
        vec![
            ("_:ann".to_string(), "n1".to_string()),
            ("_:bob".to_string(), "n2".to_string()),
            ("_:cat".to_string(), "n3".to_string()),
            ("_:p1".to_string(), "n4".to_string()),
            ("_:p2".to_string(), "n5".to_string()),
        ]
    );
}

#[test]
fn stored_records_carry_resolved_references() {
    let (kv, graph) = setup();
    seed_social(&graph);
    assert_eq!(
        kv.get("n1"),
        Some(json!({
            "name": "Ann",
            "email": "ann@example.com",
            "age": 31,
            "bestFriend": "n2",
            "friends": ["n2", "n3"],
            "posts": ["n4", "n5"],
            "$node": "User"
        }))
    );
    assert_eq!(kv.get("n4").unwrap()["author"], json!("n1"));
}

#[test]
fn registry_and_indices_after_seed() {
    let (kv, graph) = setup();
    seed_social(&graph);
    assert_eq!(
        kv.get("$nodes"),
        Some(json!({"User": ["n1", "n2", "n3"], "Post": ["n4", "n5"]}))
    );
    assert_eq!(kv.get("$index___sort___User___age"), Some(json!(["n2", "n1", "n3"])));
    assert_eq!(kv.get("$index___sort___Post___likes"), Some(json!(["n5", "n4"])));
    assert_eq!(
        kv.get("$index___exact___User___email___cat@example.com"),
        Some(json!("n3"))
    );
}

#[test]
fn placeholders_do_not_carry_across_batches() {
    let (kv, graph) = setup();
    graph
        .insert(vec![InsertEntry::new("_:a", "User", json!({"name": "A"}))])
        .unwrap();
    graph
        .insert(vec![InsertEntry::new(
            "_:b",
            "User",
            json!({"bestFriend": "_:a"}),
        )])
        .unwrap();
    // `_:a` belongs to the first batch; the second keeps it literally
    assert_eq!(kv.get("n2").unwrap()["bestFriend"], json!("_:a"));
}

#[test]
fn literal_references_are_stored_unchanged() {
    let (kv, graph) = setup();
    seed_social(&graph);
    graph
        .insert(vec![InsertEntry::new(
            "_:dan",
            "User",
            json!({"name": "Dan", "friends": ["n1", "nobody"]}),
        )])
        .unwrap();
    assert_eq!(kv.get("n6").unwrap()["friends"], json!(["n1", "nobody"]));
}

#[test]
fn reinserting_a_uid_overwrites_the_record() {
    let (kv, graph) = setup();
    graph
        .insert(vec![InsertEntry::new(
            "u1",
            "User",
            json!({"name": "Old", "age": 1}),
        )])
        .unwrap();
    graph
        .insert(vec![InsertEntry::new("u1", "User", json!({"name": "New"}))])
        .unwrap();
    assert_eq!(kv.get("u1"), Some(json!({"name": "New", "$node": "User"})));
    assert_eq!(graph.node_uids("User").unwrap(), vec!["u1", "u1"]);
}

#[test]
fn validation_errors_name_the_failure() {
    let (_kv, graph) = setup();

    let err = graph
        .insert(vec![InsertEntry::new("_:x", "Ghost", json!({"boo": true}))])
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidNode {
            node: "Ghost".to_string()
        }
    );

    let err = graph
        .insert(vec![InsertEntry::new("_:x", "Post", json!({"body": "..."}))])
        .unwrap_err();
    assert_eq!(err.code(), "invalid-edge");

    let err = graph
        .insert(vec![InsertEntry::new("_:x", "Post", json!({"likes": "many"}))])
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidEdgeDataType {
            node: "Post".to_string(),
            edge: "likes".to_string(),
            uid: "_:x".to_string(),
            expected: "number",
        }
    );
    assert!(err.to_string().contains("likes"));
}

#[test]
fn reference_edges_accept_any_value() {
    let (kv, graph) = setup();
    graph
        .insert(vec![InsertEntry::new(
            "u1",
            "User",
            json!({"bestFriend": 5, "friends": "not-a-list"}),
        )])
        .unwrap();
    assert_eq!(kv.get("u1").unwrap()["bestFriend"], json!(5));
}

#[test]
fn non_atomic_failure_leaves_exact_entries_of_validated_nodes() {
    let (kv, graph) = setup();
    let err = graph
        .insert(vec![
            InsertEntry::new("_:a", "User", json!({"email": "first@x"})),
            InsertEntry::new("_:b", "User", json!({"email": 12})),
        ])
        .unwrap_err();
    assert_eq!(err.code(), "invalid-edge-dataType");
    assert_eq!(
        kv.get("$index___exact___User___email___first@x"),
        Some(json!("n1"))
    );
    assert!(kv.get("n1").is_none());
    assert!(graph.node_uids("User").unwrap().is_empty());
}

#[test]
fn sort_index_failure_after_node_writes() {
    let (kv, graph) = setup();
    // Corrupt the sort index with a member that has no age
    kv.set("legacy", json!({"name": "Legacy", "$node": "User"}));
    kv.set("$index___sort___User___age", json!(["legacy"]));

    let err = graph
        .insert(vec![InsertEntry::new("u1", "User", json!({"age": 9}))])
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidSortEdge {
            uid: "legacy".to_string(),
            node: "User".to_string(),
            edge: "age".to_string(),
        }
    );
    // Pass 2 already ran
    assert!(kv.get("u1").is_some());
}

#[test]
fn numeric_exact_values_share_one_key() {
    let (kv, graph) = setup();
    graph.add_edge_index("Post", "likes", IndexKind::Exact).unwrap();
    graph
        .insert(vec![InsertEntry::new("p", "Post", json!({"likes": 3.0}))])
        .unwrap();
    assert_eq!(kv.get("$index___exact___Post___likes___3"), Some(json!("p")));
}
