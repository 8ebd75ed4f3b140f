//! Series natives (spec §3.2). Dispatches over the four concrete series
//! kinds by hand rather than through a trait object — the spec frames this
//! as "an internal dispatch over the concrete series kind", and with only
//! four kinds a `match` reads clearer than a vtable.

use std::collections::HashMap;
use std::rc::Rc;

use rl_core::{RlError, Value};

use crate::evaluator::Evaluator;
use crate::frame::FrameHandle;
use crate::function::parse_param_spec;

pub fn register(ev: &mut Evaluator, root: FrameHandle) {
    register1(ev, root, "first", |v| element_at(v, 0)?.ok_or_else(RlError::empty_series));
    register1(ev, root, "last", |v| last_element(v)?.ok_or_else(RlError::empty_series));
    register1(ev, root, "length?", |v| Ok(Value::Integer(series_len(v)? as i64)));
    register1(ev, root, "clear", |v| {
        clear_series(v)?;
        Ok(v.clone())
    });
    register1(ev, root, "copy", |v| Ok(v.deep_clone_series()));

    register2(ev, root, "append", |series, value| {
        append_element(series, value)?;
        Ok(series.clone())
    });
    register2(ev, root, "pick", |series, index| {
        let Value::Integer(n) = index else {
            return Err(RlError::type_mismatch("integer!", index.type_name()));
        };
        let offset = (*n - 1).max(0) as usize;
        Ok(element_at(series, offset)?.unwrap_or(Value::None))
    });
    register2(ev, root, "skip", |series, count| {
        let Value::Integer(n) = count else {
            return Err(RlError::type_mismatch("integer!", count.type_name()));
        };
        skip_series(series, *n)?;
        Ok(series.clone())
    });
}

fn register1(ev: &mut Evaluator, root: FrameHandle, name: &str, op: impl Fn(&Value) -> Result<Value, RlError> + 'static) {
    let params = parse_param_spec(&[Value::word("series")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        false,
        Rc::new(move |_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| op(&args[0])),
    );
}

fn register2(
    ev: &mut Evaluator,
    root: FrameHandle,
    name: &str,
    op: impl Fn(&Value, &Value) -> Result<Value, RlError> + 'static,
) {
    let params = parse_param_spec(&[Value::word("series"), Value::word("value")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        false,
        Rc::new(move |_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| op(&args[0], &args[1])),
    );
}

fn series_len(value: &Value) -> Result<usize, RlError> {
    value.as_series_len().ok_or_else(|| RlError::type_mismatch("series!", value.type_name()))
}

fn element_at(value: &Value, offset: usize) -> Result<Option<Value>, RlError> {
    match value {
        Value::String(s) => Ok(s.borrow().at(offset).map(|c| Value::string(c.to_string()))),
        Value::Binary(s) => Ok(s.borrow().at(offset).map(|b| Value::Integer(*b as i64))),
        Value::Block(s) => Ok(s.borrow().at(offset).cloned()),
        Value::Paren(s) => Ok(s.borrow().at(offset).cloned()),
        other => Err(RlError::type_mismatch("series!", other.type_name())),
    }
}

fn last_element(value: &Value) -> Result<Option<Value>, RlError> {
    match value {
        Value::String(s) => Ok(s.borrow().last().map(|c| Value::string(c.to_string()))),
        Value::Binary(s) => Ok(s.borrow().last().map(|b| Value::Integer(*b as i64))),
        Value::Block(s) => Ok(s.borrow().last().cloned()),
        Value::Paren(s) => Ok(s.borrow().last().cloned()),
        other => Err(RlError::type_mismatch("series!", other.type_name())),
    }
}

fn append_element(series: &Value, value: &Value) -> Result<(), RlError> {
    match series {
        Value::String(s) => {
            let Value::String(v) = value else {
                return Err(RlError::type_mismatch("string!", value.type_name()));
            };
            s.borrow_mut().append_many(v.borrow().items().iter().copied());
            Ok(())
        }
        Value::Binary(s) => {
            let Value::Integer(n) = value else {
                return Err(RlError::type_mismatch("integer!", value.type_name()));
            };
            s.borrow_mut().append(*n as u8);
            Ok(())
        }
        Value::Block(s) => {
            s.borrow_mut().append(value.clone());
            Ok(())
        }
        Value::Paren(s) => {
            s.borrow_mut().append(value.clone());
            Ok(())
        }
        other => Err(RlError::type_mismatch("series!", other.type_name())),
    }
}

fn clear_series(series: &Value) -> Result<(), RlError> {
    match series {
        Value::String(s) => Ok(s.borrow_mut().clear()),
        Value::Binary(s) => Ok(s.borrow_mut().clear()),
        Value::Block(s) => Ok(s.borrow_mut().clear()),
        Value::Paren(s) => Ok(s.borrow_mut().clear()),
        other => Err(RlError::type_mismatch("series!", other.type_name())),
    }
}

fn skip_series(series: &Value, count: i64) -> Result<(), RlError> {
    match series {
        Value::String(s) => Ok(s.borrow_mut().skip(count)),
        Value::Binary(s) => Ok(s.borrow_mut().skip(count)),
        Value::Block(s) => Ok(s.borrow_mut().skip(count)),
        Value::Paren(s) => Ok(s.borrow_mut().skip(count)),
        other => Err(RlError::type_mismatch("series!", other.type_name())),
    }
}
