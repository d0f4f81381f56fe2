// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::context_impl::Context;
use super::track::{ID_LEN, REQUEST_ID_KEY, TRACE_ID_KEY, new_id};
use super::apply_context::ApplyContext;
use crate::Value;
use crate::values::{CAPACITY, Strategy};
use std::thread;

#[test]
fn annotate_creates_log_lazily() {
    let mut ctx = Context::default();
    assert!(ctx.is_empty());
    assert!(ctx.values().is_empty());
    assert_eq!(ctx.lookup("missing"), None);

    ctx.annotate("key1", "value1");
    assert_eq!(ctx.lookup("key1"), Some(Value::from("value1")));

    ctx.annotate("key1", "value2");
    assert_eq!(ctx.lookup_str("key1").as_deref(), Some("value2"));
    assert_eq!(ctx.len(), 1);
}

#[test]
fn values_preserve_first_insertion_order() {
    let ctx = Context::default()
        .with_value("a", 1)
        .with_value("b", 2)
        .with_value("c", 3)
        .with_value("a", 4);
    let keys: Vec<_> = ctx.values().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["a", "b", "c"]);
    assert_eq!(ctx.lookup("a"), Some(Value::Int(4)));
}

#[test]
fn annotate_if_non_empty_skips_empty_strings() {
    let mut ctx = Context::default();
    ctx.annotate_if_non_empty("key1", "");
    assert_eq!(ctx.lookup("key1"), None);
    assert!(ctx.is_empty());

    let ctx = ctx.with_value_if_non_empty("key1", "value1");
    assert_eq!(ctx.lookup_str("key1").as_deref(), Some("value1"));
}

#[test]
fn lookup_str_rejects_other_kinds() {
    let ctx = Context::default()
        .with_value("strKey", "string")
        .with_value("intKey", 42);
    assert_eq!(ctx.lookup_str("strKey").as_deref(), Some("string"));
    assert_eq!(ctx.lookup_str("intKey"), None);
    assert_eq!(ctx.lookup_str("nonexistent"), None);
}

#[test]
fn fork_diverges_in_both_directions() {
    for strategy in [Strategy::Ordered, Strategy::Locked, Strategy::LockFree] {
        let mut original = Context::new(strategy).with_value("key1", "value1");
        let before = original.values();

        let mut forked = original.fork();
        assert_eq!(forked.lookup_str("key1").as_deref(), Some("value1"));

        forked.annotate("key1", "changed");
        forked.annotate("fork_only", true);
        assert_eq!(original.values(), before, "{strategy:?}");

        original.annotate("original_only", true);
        assert_eq!(forked.lookup("original_only"), None, "{strategy:?}");
        assert_eq!(forked.strategy(), strategy);
    }
}

#[test]
fn fork_handed_to_threads() {
    let parent = Context::default().with_value("job", "import");
    let handles: Vec<_> = (0..4)
        .map(|shard| {
            let mut child = parent.fork();
            thread::spawn(move || {
                child.annotate("shard", shard);
                child
            })
        })
        .collect();
    for (shard, handle) in handles.into_iter().enumerate() {
        let child = handle.join().expect("child thread panicked");
        assert_eq!(child.lookup("shard"), Some(Value::Int(shard as i64)));
        assert_eq!(child.lookup_str("job").as_deref(), Some("import"));
    }
    assert_eq!(parent.lookup("shard"), None);
}

#[test]
fn clone_of_ordered_context_is_a_copy() {
    let original = Context::default().with_value("a", 1);
    let mut copy = original.clone();
    copy.annotate("b", 2);
    assert_eq!(original.len(), 1);
    assert_eq!(copy.len(), 2);
}

#[test]
fn clones_of_shared_contexts_annotate_concurrently() {
    const TASKS: usize = 16;
    for strategy in [Strategy::Locked, Strategy::LockFree] {
        let shared = Context::new(strategy).with_value("request", "r1");
        let handles: Vec<_> = (0..TASKS)
            .map(|i| {
                let mut handle = shared.clone();
                thread::spawn(move || handle.annotate(&format!("task{i}"), i))
            })
            .collect();
        for h in handles {
            h.join().expect("annotating thread panicked");
        }
        for i in 0..TASKS {
            assert!(shared.lookup(&format!("task{i}")).is_some(), "{strategy:?}");
        }
        assert_eq!(shared.len(), TASKS + 1);
    }
}

#[test]
fn empty_shared_context_shares_with_its_clones() {
    for strategy in [Strategy::Locked, Strategy::LockFree] {
        let original = Context::new(strategy);
        let mut handle = original.clone();
        handle.annotate("late", "yes");
        assert_eq!(original.lookup_str("late").as_deref(), Some("yes"), "{strategy:?}");

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mut handle = original.clone();
                thread::spawn(move || handle.annotate(&format!("worker{i}"), i))
            })
            .collect();
        for h in handles {
            h.join().expect("annotating thread panicked");
        }
        assert_eq!(original.len(), 5, "{strategy:?}");
    }
}

#[test]
fn fork_of_empty_shared_context_is_independent() {
    for strategy in [Strategy::Locked, Strategy::LockFree] {
        let original = Context::new(strategy);
        let mut forked = original.fork();
        forked.annotate("fork_only", true);
        assert!(original.is_empty(), "{strategy:?}");
        assert_eq!(forked.strategy(), strategy);
    }
}

#[test]
fn context_capacity_bound() {
    let mut ctx = Context::default();
    for i in 0..CAPACITY * 2 {
        ctx.annotate(&format!("k{i}"), i);
    }
    assert_eq!(ctx.len(), CAPACITY);
    ctx.annotate("k0", "still updatable");
    assert_eq!(ctx.lookup_str("k0").as_deref(), Some("still updatable"));
}

#[test]
fn new_tracked_generates_ids() {
    let ctx = Context::new_tracked(Strategy::Ordered);
    let request = ctx.lookup_str(REQUEST_ID_KEY).expect("request id");
    let trace = ctx.lookup_str(TRACE_ID_KEY).expect("trace id");
    assert_eq!(request.len(), ID_LEN);
    assert_eq!(trace.len(), ID_LEN);
    assert_ne!(request, trace);
}

#[test]
fn track_keeps_existing_ids() {
    let mut ctx = Context::default().with_value(REQUEST_ID_KEY, "req123");
    ctx.track();
    assert_eq!(ctx.request_id().as_deref(), Some("req123"));
    assert_eq!(ctx.trace_id().map(|id| id.len()), Some(ID_LEN));
}

#[test]
fn set_tracked_substitutes_empty_ids() {
    let mut ctx = Context::default();
    ctx.set_tracked("req123", "tra456");
    assert_eq!(ctx.request_id().as_deref(), Some("req123"));
    assert_eq!(ctx.trace_id().as_deref(), Some("tra456"));

    ctx.set_tracked("", "");
    let (request, trace) = (ctx.request_id().unwrap(), ctx.trace_id().unwrap());
    assert_eq!(request.len(), ID_LEN);
    assert_eq!(trace.len(), ID_LEN);
    assert_ne!(request, "req123");
}

#[test]
fn tracked_ids_fall_back_without_annotating() {
    let ctx = Context::default().with_tracked("req123", "tra456");
    assert_eq!(ctx.tracked_ids(), ("req123".to_string(), "tra456".to_string()));

    let empty = Context::default();
    let (request, trace) = empty.tracked_ids();
    assert_eq!(request.len(), ID_LEN);
    assert_eq!(trace.len(), ID_LEN);
    assert!(empty.is_empty());
}

#[test]
fn new_ids_are_unique() {
    let a = new_id();
    let b = new_id();
    assert_eq!(a.len(), ID_LEN);
    assert_ne!(a, b);
}

#[test]
fn current_context_is_per_thread() {
    let previous = Context::default().with_value("thread", "main").set_current();
    Context::annotate_current("step", 1);
    assert_eq!(Context::current().len(), 2);
    assert_eq!(Context::current_values().len(), 2);

    thread::spawn(|| {
        assert!(Context::current().is_empty());
    })
    .join()
    .expect("thread panicked");

    previous.set_current();
}

#[test_executors::async_test]
async fn apply_context_installs_and_restores() {
    let outer = Context::default().with_value("outer", true).set_current();

    let inner = Context::default().with_value("inner", true);
    let seen = ApplyContext::new(inner, async {
        Context::annotate_current("during", 1);
        Context::current()
    })
    .await;

    assert!(seen.lookup("inner").is_some());
    assert!(seen.lookup("during").is_some());
    assert!(seen.lookup("outer").is_none());

    let restored = Context::current();
    assert!(restored.lookup("outer").is_some());
    assert!(restored.lookup("inner").is_none());

    outer.set_current();
}
