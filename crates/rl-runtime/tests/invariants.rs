//! Universal invariants 1-6 (spec §8.1).

use rl_core::series::SeriesData;
use rl_core::{mold, Value};
use rl_runtime::frame::{FrameKind, FrameStore};
use rl_runtime::{natives, Evaluator};

fn new_evaluator() -> Evaluator {
    let mut ev = Evaluator::new();
    natives::register_all(&mut ev);
    ev
}

fn run(ev: &mut Evaluator, source: &str) -> Result<Value, rl_core::RlError> {
    let values = rl_reader::parse_source(source, "test").unwrap();
    ev.do_block(&values)
}

#[test]
fn invariant1_reader_round_trip() {
    for source in ["1", "-3", "\"hi\"", "[1 2 3]", "foo:", ":foo", "'foo", "integer!", "a.b.c", "3.25"] {
        let values = rl_reader::parse_source(source, "test").unwrap();
        assert_eq!(values.len(), 1, "source {source:?} did not read as one value");
        let molded = mold::mold(&values[0]);
        let reparsed = rl_reader::parse_source(&molded, "test").unwrap();
        assert_eq!(reparsed.len(), 1);
        assert_eq!(reparsed[0], values[0], "round trip failed for {source:?} via {molded:?}");
    }
}

#[test]
fn invariant2_frame_lookup_finds_nearest_ancestor_binding() {
    let mut store = FrameStore::new();
    let root = store.allocate(FrameKind::Root, None, None);
    store.get_mut(root).bind("x", Value::Integer(1)).unwrap();
    let mid = store.allocate(FrameKind::Call, None, Some(root));
    let leaf = store.allocate(FrameKind::Call, None, Some(mid));

    let (found_in, value) = store.lookup(leaf, "x").unwrap();
    assert_eq!(found_in, root);
    assert_eq!(value, &Value::Integer(1));
    assert!(store.lookup(leaf, "never-bound").is_none());
}

#[test]
fn invariant3_series_cursor_and_length_bounds() {
    let mut s = SeriesData::new(vec![1, 2, 3]);
    assert!(s.index() <= s.len());

    let cloned = s.copy_from_cursor();
    assert_eq!(cloned.len(), s.len());

    s.append(4);
    assert_eq!(s.last(), Some(&4));
    assert_eq!(s.len(), 4);

    let before_len = s.len();
    let before_cursor = s.index();
    let removed = s.remove_at();
    assert!(removed.is_some());
    assert_eq!(s.len(), before_len - 1usize.min(before_len - before_cursor));
}

#[test]
fn invariant4_failed_call_leaves_no_activation_frame() {
    let mut ev = new_evaluator();
    run(&mut ev, "greet: fn [name --title [any]] [title]").unwrap();
    let before = ev.frame_count();
    let err = run(&mut ev, "greet").unwrap_err();
    assert_eq!(err.id, "arg-count");
    assert_eq!(ev.frame_count(), before, "a failed call must not leave a stray activation frame");
}

#[test]
fn invariant5_closures_are_independent() {
    let mut ev = new_evaluator();
    run(&mut ev, "make-adder: fn [x] [fn [y] [x + y]]").unwrap();
    run(&mut ev, "add5: make-adder 5").unwrap();
    run(&mut ev, "add10: make-adder 10").unwrap();
    assert_eq!(run(&mut ev, "add5 1").unwrap(), Value::Integer(6));
    assert_eq!(run(&mut ev, "add10 1").unwrap(), Value::Integer(11));
}

#[test]
fn invariant6_parse_terminates_and_all_consumes_full_length() {
    let mut ev = new_evaluator();
    let result = run(&mut ev, "parse \"aaa\" [[\"a\"] [\"a\"] [\"a\"]] --all").unwrap();
    assert_eq!(result, Value::Logic(true));
}
