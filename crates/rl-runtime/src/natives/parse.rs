//! The `parse` native (spec §4.4): the only bridge between ordinary
//! evaluation and the PARSE engine — PARSE rules are plain values until
//! this native hands them to `parse_engine::parse`.

use std::collections::HashMap;
use std::rc::Rc;

use rl_core::{RlError, Value};

use crate::evaluator::Evaluator;
use crate::frame::FrameHandle;
use crate::function::parse_param_spec;
use crate::parse_engine::{self, ParseOptions};

pub fn register(ev: &mut Evaluator, root: FrameHandle) {
    let params = parse_param_spec(&[
        Value::word("input"),
        Value::lit_word("rules"),
        Value::word("--case"),
        Value::word("--all"),
        Value::word("--part"),
        Value::block(vec![Value::Datatype("integer".into())]),
        Value::word("--any"),
    ])
    .unwrap();

    ev.register_native(
        root,
        "parse",
        params,
        false,
        Rc::new(|_ev: &mut Evaluator, args: &[Value], refs: &HashMap<String, Value>| {
            let rules = match &args[1] {
                Value::Block(series) => series.borrow().items().to_vec(),
                other => return Err(RlError::type_mismatch("block!", other.type_name())),
            };
            let options = ParseOptions {
                case_sensitive: refs.get("case").map(Value::is_truthy).unwrap_or(false),
                require_all: refs.get("all").map(Value::is_truthy).unwrap_or(false),
                any: refs.get("any").map(Value::is_truthy).unwrap_or(false),
                part: match refs.get("part") {
                    Some(Value::Integer(n)) => Some((*n).max(0) as usize),
                    _ => None,
                },
            };
            let (success, _state) = parse_engine::parse(&args[0], &rules, options)?;
            Ok(Value::Logic(success))
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;

    fn setup() -> Evaluator {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        ev
    }

    #[test]
    fn alternation_with_require_all_s5() {
        let mut ev = setup();
        let rules = Value::block(vec![Value::block(vec![Value::string("hi"), Value::word("|"), Value::string("hello")])]);
        let program = vec![Value::word("parse"), Value::string("hello"), rules, Value::word("--all")];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Logic(true));
    }

    #[test]
    fn partial_match_without_require_all_still_succeeds_s5() {
        let mut ev = setup();
        let program = vec![Value::word("parse"), Value::string("hi there"), Value::block(vec![Value::string("hi")])];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Logic(true));
        let program_all = vec![
            Value::word("parse"),
            Value::string("hi there"),
            Value::block(vec![Value::string("hi")]),
            Value::word("--all"),
        ];
        assert_eq!(ev.do_block(&program_all).unwrap(), Value::Logic(false));
    }

    #[test]
    fn block_input_with_datatype_rules_s6() {
        let mut ev = setup();
        let input = Value::block(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        let rules = Value::block(vec![Value::Datatype("integer".into()), Value::Datatype("integer".into()), Value::Datatype("integer".into())]);
        let program = vec![Value::word("parse"), input, rules, Value::word("--all")];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Logic(true));
    }
}
