//! Output natives (spec §6 external interfaces: the natives a host wires
//! its stdout/stderr through, rather than the evaluator touching a stream
//! directly).

use std::collections::HashMap;
use std::rc::Rc;

use rl_core::Value;

use crate::evaluator::Evaluator;
use crate::frame::FrameHandle;
use crate::function::parse_param_spec;

pub fn register(ev: &mut Evaluator, root: FrameHandle) {
    let params = parse_param_spec(&[Value::word("value")]).unwrap();
    ev.register_native(
        root,
        "print",
        params,
        false,
        Rc::new(|ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
            let line = format!("{}\n", rl_core::mold::form(&args[0]));
            ev.write_out(&line);
            Ok(Value::None)
        }),
    );

    let params = parse_param_spec(&[Value::word("value")]).unwrap();
    ev.register_native(
        root,
        "mold",
        params,
        false,
        Rc::new(|_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| Ok(Value::string(rl_core::mold::mold(&args[0])))),
    );

    let params = parse_param_spec(&[Value::word("value")]).unwrap();
    ev.register_native(
        root,
        "form",
        params,
        false,
        Rc::new(|_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| Ok(Value::string(rl_core::mold::form(&args[0])))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Evaluator;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc as StdRc;

    struct SharedBuf(StdRc<RefCell<Vec<u8>>>);
    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn print_writes_formed_text_with_newline() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        let buf = StdRc::new(RefCell::new(Vec::new()));
        ev.set_output_writer(Box::new(SharedBuf(buf.clone())));
        ev.do_block(&[Value::word("print"), Value::string("hi")]).unwrap();
        assert_eq!(String::from_utf8(buf.borrow().clone()).unwrap(), "hi\n");
    }

    #[test]
    fn mold_quotes_strings_and_form_does_not() {
        let mut ev = Evaluator::new();
        let root = ev.root_frame();
        register(&mut ev, root);
        assert_eq!(ev.do_block(&[Value::word("mold"), Value::string("a")]).unwrap(), Value::string("\"a\""));
        assert_eq!(ev.do_block(&[Value::word("form"), Value::string("a")]).unwrap(), Value::string("a"));
    }
}
