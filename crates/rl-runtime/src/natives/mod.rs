//! The minimal native library needed to exercise the evaluator (spec §1:
//! "the standard library of native functions beyond the evaluator's generic
//! calling protocol" is out of scope; this module is only what the §8.2
//! scenarios actually call — arithmetic, comparison, `fn`/`does`/`if`,
//! series operations, `parse`, and output).

mod arithmetic;
mod control;
mod io;
mod parse;
mod series;

use crate::evaluator::Evaluator;

/// Installs every native in this module into `ev`'s root frame. Called once
/// by an embedding host (spec §6.1) after `Evaluator::new`/`with_config`.
pub fn register_all(ev: &mut Evaluator) {
    let root = ev.root_frame();
    arithmetic::register(ev, root);
    control::register(ev, root);
    series::register(ev, root);
    io::register(ev, root);
    parse::register(ev, root);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rl_core::Value;

    #[test]
    fn register_all_wires_up_every_scenario_native() {
        let mut ev = Evaluator::new();
        register_all(&mut ev);
        for name in ["+", "-", "*", "/", "=", "<", "fn", "does", "if", "either", "append", "first", "last", "length?", "parse", "print", "mold", "form"] {
            assert!(matches!(ev.lookup(name), Some(Value::Function(_))), "missing native: {name}");
        }
    }
}
