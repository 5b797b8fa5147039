//! Query engine through the public API.

use crate::test_utils::*;
use serde_json::{json, Value};
use skein::*;

#[test]
fn uid_query_with_nested_single_and_list_references() {
    let (_kv, graph) = setup();
    seed_social(&graph);

    let format = Format::new()
        .uid()
        .edge("name")
        .nested("bestFriend", Format::new().edge("name"))
        .nested("friends", Format::new().uid().edge("name"));
    let out = graph.query(&Query::by_uid("n1", format));

    assert_eq!(
        out.into_json(),
        json!({
            "uid": "n1",
            "name": "Ann",
            "bestFriend": {"name": "Bob"},
            "friends": [
                {"uid": "n2", "name": "Bob"},
                {"uid": "n3", "name": "Cat"}
            ]
        })
    );
}

#[test]
fn exact_query_by_email() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let out = graph.query(&Query::by_exact(
        "User",
        "email",
        "cat@example.com",
        Format::new().uid().edge("age"),
    ));
    assert_eq!(out.into_json(), json!({"uid": "n3", "age": 42}));
}

#[test]
fn exact_query_on_unindexed_value_is_absent() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let out = graph.query(&Query::by_exact("User", "name", "Ann", Format::new().uid()));
    assert!(out.is_absent());
    assert_eq!(out.into_json(), serde_json::Value::Null);
}

#[test]
fn node_query_sorted_by_index_both_ways() {
    let (_kv, graph) = setup();
    seed_social(&graph);

    let asc = graph.query(&Query::by_node("User", Format::new().edge("name").asc("age")));
    assert_eq!(column(&asc, "name"), vec![json!("Bob"), json!("Ann"), json!("Cat")]);

    let dsc = graph.query(&Query::by_node("User", Format::new().edge("name").dsc("age")));
    assert_eq!(column(&dsc, "name"), vec![json!("Cat"), json!("Ann"), json!("Bob")]);
}

#[test]
fn node_query_sorted_by_unindexed_edge() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let out = graph.query(&Query::by_node("User", Format::new().uid().asc("name")));
    assert_eq!(column(&out, "uid"), vec![json!("n1"), json!("n2"), json!("n3")]);
    let out = graph.query(&Query::by_node("User", Format::new().uid().dsc("name")));
    assert_eq!(column(&out, "uid"), vec![json!("n3"), json!("n2"), json!("n1")]);
}

#[test]
fn windowing_on_node_query() {
    let (_kv, graph) = setup();
    seed_social(&graph);

    let first = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").asc("age").count(1),
    ));
    assert_eq!(column(&first, "name"), vec![json!("Bob")]);

    let tail = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").asc("age").start(1),
    ));
    assert_eq!(column(&tail, "name"), vec![json!("Ann"), json!("Cat")]);

    let middle = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").asc("age").start(1).end(1),
    ));
    assert_eq!(column(&middle, "name"), vec![json!("Ann")]);
}

#[test]
fn end_without_start_and_zero_windows_keep_everything() {
    let (_kv, graph) = setup();
    seed_social(&graph);

    let all = vec![json!("Bob"), json!("Ann"), json!("Cat")];
    let end_only = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").asc("age").end(1).count(1),
    ));
    assert_eq!(column(&end_only, "name"), all);

    let zero_count = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").asc("age").count(0),
    ));
    assert_eq!(column(&zero_count, "name"), all);

    let from_zero = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").asc("age").start(0).end(1),
    ));
    assert_eq!(column(&from_zero, "name"), vec![json!("Bob"), json!("Ann")]);
}

#[test]
fn sort_on_edge_missing_from_some_nodes() {
    let (_kv, graph) = setup();
    graph
        .set_schema_edge("User", "score", EdgeDef::new(DataType::Num))
        .unwrap();
    let entries: Vec<InsertEntry> = (0..30)
        .map(|i| {
            let values = if i % 3 == 0 {
                json!({"name": format!("u{}", i), "score": 100 - i})
            } else {
                json!({"name": format!("u{}", i)})
            };
            InsertEntry::new(format!("_:{}", i), "User", values)
        })
        .collect();
    graph.insert(entries).unwrap();

    let asc = graph.query(&Query::by_node(
        "User",
        Format::new().uid().edge("score").asc("score"),
    ));
    let scores = column(&asc, "score");
    assert_eq!(scores.len(), 30);
    assert!(scores[..20].iter().all(Value::is_null));
    let present: Vec<i64> = scores[20..].iter().map(|v| v.as_i64().unwrap()).collect();
    assert_eq!(present, vec![73, 76, 79, 82, 85, 88, 91, 94, 97, 100]);

    let dsc = graph.query(&Query::by_node(
        "User",
        Format::new().uid().edge("score").dsc("score").count(3),
    ));
    assert_eq!(column(&dsc, "score"), vec![json!(100), json!(97), json!(94)]);
}

#[test]
fn sort_index_over_mixed_value_types() {
    let (kv, graph) = setup();
    graph
        .set_schema_edge(
            "Tag",
            "key",
            EdgeDef::new(DataType::Uid).with_index(IndexKind::Sort),
        )
        .unwrap();
    graph
        .insert(vec![
            InsertEntry::new("t1", "Tag", json!({"key": 3})),
            InsertEntry::new("t2", "Tag", json!({"key": "b"})),
            InsertEntry::new("t3", "Tag", json!({"key": 1})),
            InsertEntry::new("t4", "Tag", json!({"key": "a"})),
            InsertEntry::new("t5", "Tag", json!({"key": true})),
        ])
        .unwrap();

    // booleans, then numbers, then strings
    assert_eq!(
        kv.get("$index___sort___Tag___key"),
        Some(json!(["t5", "t3", "t1", "t4", "t2"]))
    );
    let dsc = graph.query(&Query::by_node("Tag", Format::new().uid().dsc("key")));
    assert_eq!(
        column(&dsc, "uid"),
        vec![json!("t2"), json!("t4"), json!("t1"), json!("t3"), json!("t5")]
    );
}

#[test]
fn exact_index_on_list_value_joins_members() {
    let (kv, graph) = setup();
    graph
        .set_schema_edge(
            "User",
            "tags",
            EdgeDef::new(DataType::Uids).with_index(IndexKind::Exact),
        )
        .unwrap();
    graph
        .insert(vec![InsertEntry::new("u1", "User", json!({"tags": ["a", "b"]}))])
        .unwrap();

    assert_eq!(kv.get("$index___exact___User___tags___a,b"), Some(json!("u1")));
    let out = graph.query(&Query::by_exact("User", "tags", json!(["a", "b"]), Format::new().uid()));
    assert_eq!(out.into_json(), json!({"uid": "u1"}));
}

#[test]
fn nested_list_sorted_by_likes() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let out = graph.query(&Query::by_uid(
        "n1",
        Format::new().nested("posts", Format::new().edge("title").dsc("likes")),
    ));
    assert_eq!(
        out.into_json(),
        json!({"posts": [{"title": "Hello"}, {"title": "World"}]})
    );
}

#[test]
fn filter_on_nested_list_keeps_empty_array() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let out = graph.query(&Query::by_uid(
        "n1",
        Format::new().nested(
            "posts",
            Format::new()
                .edge("likes")
                .filter(|p| p["likes"].as_f64().unwrap_or(0.0) > 100.0),
        ),
    ));
    assert_eq!(out.into_json(), json!({"posts": []}));
}

#[test]
fn filter_sees_projection_not_record() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    // `age` is stored but not projected, so the predicate never sees it
    let out = graph.query(&Query::by_node(
        "User",
        Format::new().edge("name").filter(|p| p.contains_key("age")),
    ));
    assert_eq!(out, QueryOutput::Array(vec![]));
}

#[test]
fn reverse_reference_walk() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let out = graph.query(&Query::by_node(
        "Post",
        Format::new()
            .edge("title")
            .nested("author", Format::new().edge("name"))
            .asc("likes"),
    ));
    assert_eq!(
        out.into_json(),
        json!([
            {"title": "World", "author": {"name": "Ann"}},
            {"title": "Hello", "author": {"name": "Ann"}}
        ])
    );
}

#[test]
fn format_from_json_matches_builder() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let format = Format::from_json(&json!({
        "uid": true,
        "name": true,
        "email": false,
        "friends": {"name": true, "$dsc": "age", "$count": 1}
    }))
    .unwrap();
    let out = graph.query(&Query::by_uid("n1", format));
    assert_eq!(
        out.into_json(),
        json!({"uid": "n1", "name": "Ann", "friends": [{"name": "Cat"}]})
    );
}

#[test]
fn batch_queries_keyed_results() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    let results = graph.queries(&[
        (
            "me".to_string(),
            Query::by_exact("User", "email", "ann@example.com", Format::new().edge("name")),
        ),
        (
            "ghost".to_string(),
            Query::by_uid("n99", Format::new().edge("name")),
        ),
        (
            "top".to_string(),
            Query::by_node("Post", Format::new().edge("title").dsc("likes").count(1)),
        ),
        (
            "tags".to_string(),
            Query::by_node("Tag", Format::new().uid()),
        ),
    ]);

    assert_eq!(
        results.keys().cloned().collect::<Vec<_>>(),
        vec!["me", "tags", "top"]
    );
    assert_eq!(results["me"].clone().into_json(), json!({"name": "Ann"}));
    assert_eq!(results["top"].clone().into_json(), json!([{"title": "Hello"}]));
    assert_eq!(results["tags"], QueryOutput::Array(vec![]));
}

#[test]
fn queries_read_the_latest_writes() {
    let (_kv, graph) = setup();
    seed_social(&graph);
    graph
        .insert(vec![InsertEntry::new(
            "_:dan",
            "User",
            json!({"name": "Dan", "age": 18}),
        )])
        .unwrap();
    let out = graph.query(&Query::by_node("User", Format::new().edge("name").asc("age").count(1)));
    assert_eq!(column(&out, "name"), vec![json!("Dan")]);
}
