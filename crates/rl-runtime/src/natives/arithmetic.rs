//! Arithmetic and comparison natives (spec §4.5 native protocol; minimal
//! native library per spec §1's "generic calling protocol" boundary).
//!
//! Every operator here is infix (spec §4.3.4), so its two parameters are
//! named `a`/`b` purely for readability — the call protocol absorbs the
//! left-hand value itself.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use rl_core::{Decimal, RlError, Value};

use crate::evaluator::Evaluator;
use crate::frame::FrameHandle;
use crate::function::parse_param_spec;

pub fn register(ev: &mut Evaluator, root: FrameHandle) {
    register_infix(ev, root, "+", |a, b| numeric_op(a, b, |x, y| Ok(x + y), |x, y| Ok(x.add(y))));
    register_infix(ev, root, "-", |a, b| numeric_op(a, b, |x, y| Ok(x - y), |x, y| Ok(x.sub(y))));
    register_infix(ev, root, "*", |a, b| numeric_op(a, b, |x, y| Ok(x * y), |x, y| Ok(x.mul(y))));
    register_infix(ev, root, "/", |a, b| {
        numeric_op(
            a,
            b,
            |x, y| if y == 0 { Err(RlError::div_zero()) } else { Ok(x / y) },
            |x, y| x.div(y).ok_or_else(RlError::div_zero),
        )
    });

    register_compare(ev, root, "=", |ord| ord == Ordering::Equal);
    register_compare(ev, root, "<>", |ord| ord != Ordering::Equal);
    register_compare(ev, root, "<", |ord| ord == Ordering::Less);
    register_compare(ev, root, ">", |ord| ord == Ordering::Greater);
    register_compare(ev, root, "<=", |ord| ord != Ordering::Greater);
    register_compare(ev, root, ">=", |ord| ord != Ordering::Less);
}

fn register_infix(
    ev: &mut Evaluator,
    root: FrameHandle,
    name: &str,
    op: impl Fn(&Value, &Value) -> Result<Value, RlError> + 'static,
) {
    let params = parse_param_spec(&[Value::word("a"), Value::word("b")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        true,
        Rc::new(move |_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| op(&args[0], &args[1])),
    );
}

fn register_compare(ev: &mut Evaluator, root: FrameHandle, name: &str, accept: impl Fn(Ordering) -> bool + 'static) {
    let params = parse_param_spec(&[Value::word("a"), Value::word("b")]).unwrap();
    ev.register_native(
        root,
        name,
        params,
        true,
        Rc::new(move |_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
            Ok(Value::Logic(accept(compare(&args[0], &args[1])?)))
        }),
    );
}

/// Dispatches to integer or decimal arithmetic depending on the operand
/// kinds, promoting a mixed integer/decimal pair to decimal.
fn numeric_op(
    a: &Value,
    b: &Value,
    int_op: impl Fn(i64, i64) -> Result<i64, RlError>,
    dec_op: impl Fn(Decimal, Decimal) -> Result<Decimal, RlError>,
) -> Result<Value, RlError> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Value::Integer(int_op(*x, *y)?)),
        (Value::Decimal(x), Value::Decimal(y)) => Ok(Value::Decimal(dec_op(*x, *y)?)),
        (Value::Integer(x), Value::Decimal(y)) => Ok(Value::Decimal(dec_op(Decimal::from_i64(*x), *y)?)),
        (Value::Decimal(x), Value::Integer(y)) => Ok(Value::Decimal(dec_op(*x, Decimal::from_i64(*y))?)),
        _ => Err(RlError::type_mismatch("integer! or decimal!", a.type_name())),
    }
}

fn compare(a: &Value, b: &Value) -> Result<Ordering, RlError> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(x.cmp(y)),
        (Value::Decimal(x), Value::Decimal(y)) => x.partial_cmp(y).ok_or_else(RlError::div_zero),
        (Value::Integer(x), Value::Decimal(y)) => Decimal::from_i64(*x).partial_cmp(y).ok_or_else(RlError::div_zero),
        (Value::Decimal(x), Value::Integer(y)) => x.partial_cmp(&Decimal::from_i64(*y)).ok_or_else(RlError::div_zero),
        (Value::String(x), Value::String(y)) => {
            let xs: String = x.borrow().items().iter().collect();
            let ys: String = y.borrow().items().iter().collect();
            Ok(xs.cmp(&ys))
        }
        _ if a == b => Ok(Ordering::Equal),
        _ => Err(RlError::type_mismatch("comparable values", b.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;

    #[test]
    fn integer_addition_yields_integer() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        let program = vec![Value::Integer(3), Value::word("+"), Value::Integer(4)];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Integer(7));
    }

    #[test]
    fn division_by_zero_is_a_math_error() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        let program = vec![Value::Integer(1), Value::word("/"), Value::Integer(0)];
        let err = ev.do_block(&program).unwrap_err();
        assert_eq!(err.id, "div-zero");
        assert_eq!(err.category, rl_core::ErrorCategory::Math);
    }

    #[test]
    fn comparison_natives_cover_the_ordering_family() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        assert_eq!(ev.do_block(&[Value::Integer(1), Value::word("<"), Value::Integer(2)]).unwrap(), Value::Logic(true));
        assert_eq!(ev.do_block(&[Value::Integer(2), Value::word(">="), Value::Integer(2)]).unwrap(), Value::Logic(true));
        assert_eq!(ev.do_block(&[Value::Integer(2), Value::word("<>"), Value::Integer(2)]).unwrap(), Value::Logic(false));
    }
}
