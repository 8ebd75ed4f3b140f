//! Function construction and branching natives (spec §3.5 functions, §4.3.4
//! call protocol). `fn` and `does` are the natives that actually produce
//! `Value::Function` closures; `if`/`either` exercise the quoted-block
//! positional-parameter mode the same way user code would.

use std::collections::HashMap;
use std::rc::Rc;

use rl_core::{RlError, Value};

use crate::evaluator::Evaluator;
use crate::frame::FrameHandle;
use crate::function::{make_user_function, parse_param_spec};

pub fn register(ev: &mut Evaluator, root: FrameHandle) {
    register_quoted2(ev, root, "fn", false, |ev, spec, body| {
        let params = parse_param_spec(&spec)?;
        let closure = ev.current_frame();
        ev.frames.mark_captured(closure);
        Ok(make_user_function(None, params, body, closure, false))
    });

    register_quoted1(ev, root, "does", |ev, body| {
        let closure = ev.current_frame();
        ev.frames.mark_captured(closure);
        Ok(make_user_function(None, Vec::new(), body, closure, false))
    });

    {
        let params = parse_param_spec(&[Value::word("cond"), Value::lit_word("body")]).unwrap();
        ev.register_native(
            root,
            "if",
            params,
            false,
            Rc::new(|ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
                if args[0].is_truthy() {
                    ev.do_block(&as_block_items(&args[1])?)
                } else {
                    Ok(Value::None)
                }
            }),
        );
    }

    {
        let params = parse_param_spec(&[Value::word("cond"), Value::lit_word("true-body"), Value::lit_word("false-body")]).unwrap();
        ev.register_native(
            root,
            "either",
            params,
            false,
            Rc::new(|ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
                let branch = if args[0].is_truthy() { &args[1] } else { &args[2] };
                ev.do_block(&as_block_items(branch)?)
            }),
        );
    }

    {
        let params = parse_param_spec(&[Value::word("value")]).unwrap();
        ev.register_native(
            root,
            "not",
            params,
            false,
            Rc::new(|_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| Ok(Value::Logic(!args[0].is_truthy()))),
        );
    }

    register_infix_logic(ev, root, "and", |a, b| a && b);
    register_infix_logic(ev, root, "or", |a, b| a || b);
}

fn register_infix_logic(ev: &mut Evaluator, root: FrameHandle, name: &str, op: impl Fn(bool, bool) -> bool + 'static) {
    let params = parse_param_spec(&[Value::word("a"), Value::word("b")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        true,
        Rc::new(move |_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
            Ok(Value::Logic(op(args[0].is_truthy(), args[1].is_truthy())))
        }),
    );
}

fn register_quoted1(
    ev: &mut Evaluator,
    root: FrameHandle,
    name: &str,
    build: impl Fn(&mut Evaluator, Vec<Value>) -> Result<Value, RlError> + 'static,
) {
    let params = parse_param_spec(&[Value::lit_word("body")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        false,
        Rc::new(move |ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| build(ev, as_block_items(&args[0])?)),
    );
}

fn register_quoted2(
    ev: &mut Evaluator,
    root: FrameHandle,
    name: &str,
    infix: bool,
    build: impl Fn(&mut Evaluator, Vec<Value>, Vec<Value>) -> Result<Value, RlError> + 'static,
) {
    let params = parse_param_spec(&[Value::lit_word("spec"), Value::lit_word("body")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        infix,
        Rc::new(move |ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
            build(ev, as_block_items(&args[0])?, as_block_items(&args[1])?)
        }),
    );
}

fn as_block_items(value: &Value) -> Result<Vec<Value>, RlError> {
    match value {
        Value::Block(series) => Ok(series.borrow().items().to_vec()),
        other => Err(RlError::type_mismatch("block!", other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;
    use crate::natives::arithmetic;

    #[test]
    fn fn_and_call_round_trip() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        arithmetic::register(&mut ev, root);
        register(&mut ev, root);
        let program = vec![
            Value::set_word("double"),
            Value::word("fn"),
            Value::block(vec![Value::word("x")]),
            Value::block(vec![Value::word("x"), Value::word("+"), Value::word("x")]),
            Value::word("double"),
            Value::Integer(21),
        ];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Integer(42));
    }

    #[test]
    fn closures_are_independent_per_invocation() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        arithmetic::register(&mut ev, root);
        register(&mut ev, root);
        let program = vec![
            Value::set_word("make-adder"),
            Value::word("fn"),
            Value::block(vec![Value::word("x")]),
            Value::block(vec![
                Value::word("fn"),
                Value::block(vec![Value::word("y")]),
                Value::block(vec![Value::word("x"), Value::word("+"), Value::word("y")]),
            ]),
            Value::set_word("add5"),
            Value::word("make-adder"),
            Value::Integer(5),
            Value::word("add5"),
            Value::Integer(7),
        ];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Integer(12));
    }

    #[test]
    fn if_skips_false_branch() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        let program = vec![Value::Logic(false), Value::word("if"), Value::block(vec![Value::Integer(1)])];
        assert_eq!(ev.do_block(&program).unwrap(), Value::None);
    }

    #[test]
    fn either_picks_matching_branch() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        let program = vec![
            Value::Logic(true),
            Value::word("either"),
            Value::block(vec![Value::Integer(1)]),
            Value::block(vec![Value::Integer(2)]),
        ];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Integer(1));
    }
}
