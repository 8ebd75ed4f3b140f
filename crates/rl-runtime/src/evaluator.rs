//! The tree-walking evaluator (spec §4.3).

use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use rl_core::error::SourcePos;
use rl_core::path::{Path, PathKind, PathSegment};
use rl_core::value::{FunctionBody, FunctionValue, ParamKind};
use rl_core::word::WordKind;
use rl_core::{ErrorCategory, RlError, Value};

use crate::config::EvaluatorConfig;
use crate::frame::{Frame, FrameHandle, FrameKind, FrameStore};
use crate::native::NativeRegistry;

/// One entry in the evaluator's call stack (spec §4.3.1).
#[derive(Debug, Clone)]
pub struct ActivationRecord {
    pub function_name: String,
    pub position: Option<SourcePos>,
    pub frame: FrameHandle,
}

pub struct Evaluator {
    pub(crate) frames: FrameStore,
    pub(crate) current: FrameHandle,
    pub(crate) root: FrameHandle,
    pub(crate) stack: Vec<ActivationRecord>,
    pub(crate) natives: NativeRegistry,
    pub config: EvaluatorConfig,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Evaluator {
    pub fn new() -> Self {
        Evaluator::with_config(EvaluatorConfig::new())
    }

    pub fn with_config(config: EvaluatorConfig) -> Self {
        let mut frames = FrameStore::new();
        let root = frames.allocate(FrameKind::Root, Some("root".to_string()), None);
        Evaluator {
            frames,
            current: root,
            root,
            stack: Vec::new(),
            natives: NativeRegistry::new(),
            config,
            out: Box::new(std::io::stdout()),
            err: Box::new(std::io::stderr()),
        }
    }

    pub fn root_frame(&self) -> FrameHandle {
        self.root
    }

    pub fn current_frame(&self) -> FrameHandle {
        self.current
    }

    pub fn call_stack(&self) -> &[ActivationRecord] {
        &self.stack
    }

    pub fn frame(&self, handle: FrameHandle) -> &Frame {
        self.frames.get(handle)
    }

    /// Total number of frames ever allocated in this evaluator's arena,
    /// used to confirm a failed call left no activation frame behind
    /// (spec §8.1 invariant 4).
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn set_output_writer(&mut self, writer: Box<dyn Write>) {
        self.out = writer;
    }

    pub fn set_error_writer(&mut self, writer: Box<dyn Write>) {
        self.err = writer;
    }

    pub fn write_out(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
    }

    pub fn write_err(&mut self, text: &str) {
        let _ = self.err.write_all(text.as_bytes());
    }

    pub fn lookup(&self, symbol: &str) -> Option<&Value> {
        self.frames.lookup(self.current, symbol).map(|(_, v)| v)
    }

    pub fn bind_root(&mut self, symbol: &str, value: Value) -> Result<(), RlError> {
        self.frames.get_mut(self.root).bind(symbol, value)
    }

    /// Registers a native under `symbol` in `frame` (spec §4.5, §6.3).
    pub fn register_native(
        &mut self,
        frame: FrameHandle,
        symbol: &str,
        params: Vec<rl_core::value::ParamSpec>,
        infix: bool,
        implementation: Rc<crate::native::NativeImpl>,
    ) {
        let id = self.natives.register(implementation);
        let func = crate::function::make_native(symbol, params, id, infix);
        let _ = self.frames.get_mut(frame).bind(symbol, func);
    }

    fn check_cancelled(&self) -> Result<(), RlError> {
        if self.config.cancel_flag.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(RlError::new(ErrorCategory::Throw, "interrupted"));
        }
        Ok(())
    }

    /// `do-block` (spec §4.3.2): evaluates every expression in sequence,
    /// yielding the last one's value.
    pub fn do_block(&mut self, values: &[Value]) -> Result<Value, RlError> {
        let mut pos = 0;
        let mut result = Value::None;
        while pos < values.len() {
            self.check_cancelled()?;
            result = self.do_next(values, &mut pos)?;
            #[cfg(feature = "diagnostics")]
            crate::diagnostics::record_snapshot(self.frames.len(), self.frames.captured_count(), self.stack.len());
        }
        Ok(result)
    }

    /// `do-next` (spec §4.3.3): consumes one or more values from the
    /// cursor, producing exactly one resulting value, then absorbs any
    /// immediately-following infix call (spec §4.3.4's left-to-right rule,
    /// exercised directly by the S1/S9 scenarios).
    pub fn do_next(&mut self, values: &[Value], pos: &mut usize) -> Result<Value, RlError> {
        let mut result = self.do_next_primary(values, pos)?;
        loop {
            match self.peek_infix(values, *pos) {
                Some(func) => {
                    *pos += 1;
                    result = self.call_function(func, values, pos, Some(result))?;
                }
                None => break,
            }
        }
        Ok(result)
    }

    fn peek_infix(&self, values: &[Value], pos: usize) -> Option<Rc<FunctionValue>> {
        match values.get(pos) {
            Some(Value::Word(WordKind::Word, name)) => match self.lookup(name) {
                Some(Value::Function(func)) if func.infix => Some(func.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    fn do_next_primary(&mut self, values: &[Value], pos: &mut usize) -> Result<Value, RlError> {
        let head = values
            .get(*pos)
            .cloned()
            .ok_or_else(RlError::unexpected_eof)?;
        *pos += 1;

        match head {
            Value::None
            | Value::Logic(_)
            | Value::Integer(_)
            | Value::Decimal(_)
            | Value::String(_)
            | Value::Binary(_)
            | Value::Block(_)
            | Value::Datatype(_)
            | Value::Bitset(_)
            | Value::Port(_)
            | Value::Object(_) => Ok(head),
            Value::Paren(items) => {
                let inner: Vec<Value> = items.borrow().items().to_vec();
                self.do_block(&inner)
            }
            Value::Word(WordKind::LitWord, name) => Ok(Value::Word(WordKind::Word, name)),
            Value::Word(WordKind::GetWord, name) => self
                .lookup(&name)
                .cloned()
                .ok_or_else(|| RlError::no_value(&name)),
            Value::Word(WordKind::Word, name) => {
                let bound = self.lookup(&name).cloned().ok_or_else(|| RlError::no_value(&name))?;
                match bound {
                    Value::Function(func) => self.call_function(func, values, pos, None),
                    other => Ok(other),
                }
            }
            Value::Word(WordKind::SetWord, name) => {
                let value = self.do_next(values, pos)?;
                self.frames.set(self.current, &name, value.clone())?;
                Ok(value)
            }
            Value::Function(func) => self.call_function(func, values, pos, None),
            Value::Path(path) => self.eval_path(&path, values, pos),
        }
    }

    /// Walks a path's base and segments (spec §4.3.3 `path` row), invoking
    /// the terminal value with the caller's remaining cursor if it turns
    /// out to be a function.
    fn eval_path(&mut self, path: &Path, values: &[Value], pos: &mut usize) -> Result<Value, RlError> {
        let base = self
            .lookup(&path.head)
            .cloned()
            .ok_or_else(|| RlError::no_value(&path.head))?;

        if path.kind == PathKind::SetPath {
            let (container, last_key) = self.resolve_parent(base, &path.segments)?;
            let new_value = self.do_next(values, pos)?;
            self.write_segment(&container, &last_key, new_value.clone())?;
            return Ok(new_value);
        }

        let mut current = base;
        for segment in &path.segments {
            current = self.read_segment(&current, segment)?;
        }

        if path.kind == PathKind::GetPath {
            return Ok(current);
        }

        match current {
            Value::Function(func) => self.call_function(func, values, pos, None),
            other => Ok(other),
        }
    }

    fn resolve_parent(&mut self, base: Value, segments: &[PathSegment]) -> Result<(Value, PathSegment), RlError> {
        if segments.is_empty() {
            return Err(RlError::new(ErrorCategory::Script, "invalid-path").with_arg(0, "set-path needs a segment"));
        }
        let mut current = base;
        for segment in &segments[..segments.len() - 1] {
            current = self.read_segment(&current, segment)?;
        }
        Ok((current, segments[segments.len() - 1].clone()))
    }

    fn read_segment(&mut self, value: &Value, segment: &PathSegment) -> Result<Value, RlError> {
        match (value, segment) {
            (Value::Object(handle), PathSegment::Word(name)) => self
                .frames
                .get(FrameHandle::from(*handle))
                .get_local(name)
                .cloned()
                .ok_or_else(|| RlError::no_value(name)),
            (Value::Block(series), PathSegment::Index(n)) | (Value::Paren(series), PathSegment::Index(n)) => {
                let idx = (*n - 1).max(0) as usize;
                series.borrow().at(idx).cloned().ok_or_else(RlError::out_of_bounds)
            }
            (_, PathSegment::Eval(block)) => self.do_block(block),
            (other, PathSegment::Word(name)) => Err(RlError::type_mismatch("object!", other.type_name()).with_arg(1, name.clone())),
            (other, PathSegment::Index(_)) => Err(RlError::type_mismatch("series!", other.type_name())),
        }
    }

    fn write_segment(&mut self, container: &Value, segment: &PathSegment, value: Value) -> Result<(), RlError> {
        match (container, segment) {
            (Value::Object(handle), PathSegment::Word(name)) => {
                self.frames.get_mut(FrameHandle::from(*handle)).bind(name, value)
            }
            (Value::Block(series), PathSegment::Index(n)) | (Value::Paren(series), PathSegment::Index(n)) => {
                let idx = (*n - 1).max(0) as usize;
                let mut s = series.borrow_mut();
                if idx < s.len() {
                    s.items_mut()[idx] = value;
                    Ok(())
                } else {
                    Err(RlError::out_of_bounds())
                }
            }
            (other, PathSegment::Word(name)) => Err(RlError::type_mismatch("object!", other.type_name()).with_arg(1, name.clone())),
            (other, _) => Err(RlError::type_mismatch("series!", other.type_name())),
        }
    }

    /// The call protocol (spec §4.3.4).
    pub fn call_function(
        &mut self,
        func: Rc<FunctionValue>,
        values: &[Value],
        pos: &mut usize,
        lhs: Option<Value>,
    ) -> Result<Value, RlError> {
        if let Some(limit) = self.config.max_call_depth {
            if self.stack.len() >= limit {
                return Err(RlError::new(ErrorCategory::Internal, "call-depth-exceeded"));
            }
        }

        let (positional, refinements) = self.gather_args(&func, values, pos, lhs)?;

        let parent = func
            .closure
            .map(FrameHandle::from)
            .unwrap_or(self.root);
        let activation = self.frames.allocate(FrameKind::Call, func.name.clone(), Some(parent));

        let positional_params: Vec<&rl_core::value::ParamSpec> = func
            .params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Positional { .. }))
            .collect();
        for (param, arg) in positional_params.iter().zip(positional.iter()) {
            self.frames.get_mut(activation).bind(&param.name, arg.clone())?;
        }
        for (name, value) in &refinements {
            self.frames.get_mut(activation).bind(name, value.clone())?;
        }

        let call_pos = values.get(pos.saturating_sub(1)).map(|_| SourcePos::default());
        self.stack.push(ActivationRecord {
            function_name: func.name.clone().unwrap_or_else(|| "anonymous".to_string()),
            position: call_pos,
            frame: activation,
        });
        let saved = self.current;
        self.current = activation;

        let result = match &func.body {
            FunctionBody::Block(body) => {
                let cloned: Vec<Value> = body.iter().map(Value::deep_clone_series).collect();
                self.do_block(&cloned)
            }
            FunctionBody::Native(id) => {
                let implementation = self.natives.get(*id);
                implementation(self, &positional, &refinements)
            }
        };

        self.current = saved;
        self.stack.pop();

        result.map_err(|e| e.push_frame(func.name.clone().unwrap_or_else(|| "anonymous".to_string()), None))
    }

    fn gather_args(
        &mut self,
        func: &FunctionValue,
        values: &[Value],
        pos: &mut usize,
        lhs: Option<Value>,
    ) -> Result<(Vec<Value>, HashMap<String, Value>), RlError> {
        let mut positional = Vec::new();
        // An infix call's right operand must bind no looser than a single
        // primary value (spec §4.3.4/§5's left-to-right rule) — otherwise
        // it would itself absorb a following infix call and silently
        // reintroduce precedence, e.g. `3 + 4 * 2` folding as `3 + (4 * 2)`
        // instead of `(3 + 4) * 2`. Left-to-right chaining across more than
        // two operands is the job of the outer `do_next` loop re-peeking
        // after this call returns, not of this call absorbing ahead.
        let is_infix_call = lhs.is_some();
        let mut lhs = lhs;

        let positional_params: Vec<&rl_core::value::ParamSpec> = func
            .params
            .iter()
            .filter(|p| matches!(p.kind, ParamKind::Positional { .. }))
            .collect();

        for param in &positional_params {
            let arg = if let Some(value) = lhs.take() {
                value
            } else {
                let quoted = matches!(param.kind, ParamKind::Positional { quoted: true });
                if quoted {
                    let v = values.get(*pos).cloned().ok_or_else(|| {
                        RlError::arg_count(positional_params.len(), positional.len())
                    })?;
                    *pos += 1;
                    v
                } else {
                    if *pos >= values.len() {
                        return Err(RlError::arg_count(positional_params.len(), positional.len()));
                    }
                    if is_infix_call {
                        self.do_next_primary(values, pos)?
                    } else {
                        self.do_next(values, pos)?
                    }
                }
            };
            if !param.type_filter.is_empty() && !param.type_filter.contains(&arg.type_name().to_string()) {
                return Err(RlError::type_mismatch(&param.type_filter.join("/"), arg.type_name()));
            }
            positional.push(arg);
        }

        let mut refinements = HashMap::new();
        for param in &func.params {
            match param.kind {
                ParamKind::RefinementFlag => {
                    refinements.insert(param.name.clone(), Value::Logic(false));
                }
                ParamKind::RefinementValue { .. } => {
                    refinements.insert(param.name.clone(), Value::None);
                }
                ParamKind::Positional { .. } => {}
            }
        }

        loop {
            let candidate = match values.get(*pos) {
                Some(Value::Word(WordKind::Word, name)) if name.starts_with("--") => name.trim_start_matches("--").to_string(),
                _ => break,
            };
            let declared = func.params.iter().find(|p| {
                p.name == candidate && matches!(p.kind, ParamKind::RefinementFlag | ParamKind::RefinementValue { .. })
            });
            match declared {
                Some(param) if matches!(param.kind, ParamKind::RefinementFlag) => {
                    *pos += 1;
                    refinements.insert(candidate, Value::Logic(true));
                }
                Some(param) if matches!(param.kind, ParamKind::RefinementValue { .. }) => {
                    *pos += 1;
                    let value = self.do_next(values, pos)?;
                    refinements.insert(candidate, value);
                }
                _ => break,
            }
        }

        Ok((positional, refinements))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::parse_param_spec;

    fn install_arithmetic(ev: &mut Evaluator) {
        let root = ev.root_frame();
        for (name, op) in [
            ("+", 0u8),
            ("-", 1u8),
            ("*", 2u8),
            ("/", 3u8),
        ] {
            let params = parse_param_spec(&[Value::word("a"), Value::word("b")]).unwrap();
            ev.register_native(
                root,
                name,
                params,
                true,
                Rc::new(move |_ev: &mut Evaluator, args: &[Value], _refs: &HashMap<String, Value>| {
                    let (Value::Integer(a), Value::Integer(b)) = (&args[0], &args[1]) else {
                        return Err(RlError::type_mismatch("integer!", "other"));
                    };
                    Ok(Value::Integer(match op {
                        0 => a + b,
                        1 => a - b,
                        2 => a * b,
                        _ => a / b,
                    }))
                }),
            );
        }
    }

    #[test]
    fn arithmetic_is_left_to_right_without_precedence() {
        let mut ev = Evaluator::new();
        install_arithmetic(&mut ev);
        let values = vec![Value::Integer(3), Value::word("+"), Value::Integer(4), Value::word("*"), Value::Integer(2)];
        let result = ev.do_block(&values).unwrap();
        assert_eq!(result, Value::Integer(14));
    }

    #[test]
    fn set_word_binds_and_yields_value() {
        let mut ev = Evaluator::new();
        let values = vec![Value::set_word("x"), Value::Integer(10)];
        let result = ev.do_block(&values).unwrap();
        assert_eq!(result, Value::Integer(10));
        assert_eq!(ev.lookup("x"), Some(&Value::Integer(10)));
    }

    #[test]
    fn infix_propagates_left_to_right_s9() {
        let mut ev = Evaluator::new();
        install_arithmetic(&mut ev);
        let program = vec![
            Value::set_word("x"),
            Value::Integer(10),
            Value::word("x"),
            Value::word("+"),
            Value::Integer(5),
        ];
        assert_eq!(ev.do_block(&program).unwrap(), Value::Integer(15));

        let program2 = vec![
            Value::Integer(5),
            Value::word("+"),
            Value::word("x"),
            Value::word("*"),
            Value::Integer(2),
        ];
        assert_eq!(ev.do_block(&program2).unwrap(), Value::Integer(30));
    }

    #[test]
    fn missing_word_fails_with_no_value() {
        let mut ev = Evaluator::new();
        let err = ev.do_block(&[Value::word("undefined")]).unwrap_err();
        assert_eq!(err.id, "no-value");
    }

    #[test]
    fn get_word_does_not_invoke_function() {
        let mut ev = Evaluator::new();
        install_arithmetic(&mut ev);
        let result = ev.do_block(&[Value::get_word("+")]).unwrap();
        assert!(matches!(result, Value::Function(_)));
    }

    #[test]
    fn lit_word_yields_plain_word_without_lookup() {
        let mut ev = Evaluator::new();
        let result = ev.do_block(&[Value::lit_word("undefined")]).unwrap();
        assert_eq!(result, Value::word("undefined"));
    }
}
