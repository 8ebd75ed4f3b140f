//! The central `Value` union (spec §3.1).
//!
//! `Function` and `Object` do not embed runtime types directly — `rl-core`
//! has no evaluator, so a function body is either an inline block or an
//! opaque `NativeId` looked up in `rl-runtime`'s native registry, and an
//! object is an opaque `FrameHandle` looked up in `rl-runtime`'s frame
//! arena (spec §4.2/§9: "frames are referenced by integer handle, not
//! pointer, precisely so a `Value` can name a frame without borrowing
//! it"). This keeps the value model free of a dependency on the crate that
//! depends on it.

use crate::bitset::Bitset;
use crate::decimal::Decimal;
use crate::path::Path;
use crate::series::{SeriesData, SeriesHandle};
use crate::word::WordKind;
use std::fmt;
use std::rc::Rc;

/// Index into `rl-runtime`'s process-wide frame arena (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub usize);

/// Index into `rl-runtime`'s native-function registry (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeId(pub usize);

/// How a formal parameter consumes its argument (spec §4.3.4).
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// A plain positional argument; `quoted` selects evaluated vs. raw
    /// (lit-word-style) argument gathering.
    Positional { quoted: bool },
    /// A `--name` refinement flag with no value.
    RefinementFlag,
    /// A `--name` refinement that also takes a value.
    RefinementValue { quoted: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    /// Non-empty when the parameter carries a datatype filter
    /// (spec §4.3.4: "a parameter may restrict the datatypes it accepts").
    pub type_filter: Vec<String>,
}

impl ParamSpec {
    pub fn positional(name: impl Into<String>, quoted: bool) -> Self {
        ParamSpec {
            name: name.into(),
            kind: ParamKind::Positional { quoted },
            type_filter: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Value>),
    Native(NativeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionValue {
    pub name: Option<String>,
    pub params: Vec<ParamSpec>,
    pub body: FunctionBody,
    /// Infix functions absorb the expression to their left as their first
    /// argument (spec §4.3.4).
    pub infix: bool,
    /// The frame a closure was defined in, captured at `fn`/`does` time.
    pub closure: Option<FrameHandle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortValue {
    pub scheme: String,
    pub spec: Option<Box<Value>>,
}

#[derive(Debug, Clone)]
pub enum Value {
    None,
    Logic(bool),
    Integer(i64),
    Decimal(Decimal),
    String(SeriesHandle<char>),
    Binary(SeriesHandle<u8>),
    Word(WordKind, String),
    /// A datatype literal, e.g. `integer!`; carries the bare type name
    /// without the trailing `!` (spec §3.1, §6.5).
    Datatype(String),
    Block(SeriesHandle<Value>),
    Paren(SeriesHandle<Value>),
    Function(Rc<FunctionValue>),
    Object(FrameHandle),
    Port(Rc<PortValue>),
    Path(Rc<Path>),
    Bitset(Rc<Bitset>),
}

impl Value {
    pub fn string(text: impl Into<String>) -> Value {
        let chars: Vec<char> = text.into().chars().collect();
        Value::String(SeriesData::new(chars).into_handle())
    }

    pub fn binary(bytes: Vec<u8>) -> Value {
        Value::Binary(SeriesData::new(bytes).into_handle())
    }

    pub fn block(items: Vec<Value>) -> Value {
        Value::Block(SeriesData::new(items).into_handle())
    }

    pub fn paren(items: Vec<Value>) -> Value {
        Value::Paren(SeriesData::new(items).into_handle())
    }

    pub fn word(symbol: impl Into<String>) -> Value {
        Value::Word(WordKind::Word, symbol.into())
    }

    pub fn set_word(symbol: impl Into<String>) -> Value {
        Value::Word(WordKind::SetWord, symbol.into())
    }

    pub fn get_word(symbol: impl Into<String>) -> Value {
        Value::Word(WordKind::GetWord, symbol.into())
    }

    pub fn lit_word(symbol: impl Into<String>) -> Value {
        Value::Word(WordKind::LitWord, symbol.into())
    }

    /// `none`/`true`/`false` do not need to be pointer-interned singletons
    /// — they are `Copy`-cheap scalars — but these constructors exist so
    /// call sites read the same way the spec's "three reserved words with
    /// fixed bindings" (§3.3) are introduced.
    pub fn none() -> Value {
        Value::None
    }

    pub fn truth(b: bool) -> Value {
        Value::Logic(b)
    }

    /// Everything except `none` and `false` is truthy (spec §4.3.1).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::None | Value::Logic(false))
    }

    /// The bare type name, without the trailing `!`, used both for
    /// `type?`-family natives and for error-message formatting.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Logic(_) => "logic",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Word(WordKind::Word, _) => "word",
            Value::Word(WordKind::SetWord, _) => "set-word",
            Value::Word(WordKind::GetWord, _) => "get-word",
            Value::Word(WordKind::LitWord, _) => "lit-word",
            Value::Datatype(_) => "datatype",
            Value::Block(_) => "block",
            Value::Paren(_) => "paren",
            Value::Function(_) => "function",
            Value::Object(_) => "object",
            Value::Port(_) => "port",
            Value::Path(path) => match path.kind {
                crate::path::PathKind::Path => "path",
                crate::path::PathKind::GetPath => "get-path",
                crate::path::PathKind::SetPath => "set-path",
            },
            Value::Bitset(_) => "bitset",
        }
    }

    pub fn datatype_word(&self) -> String {
        format!("{}!", self.type_name())
    }

    pub fn as_series_len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.borrow().len()),
            Value::Binary(s) => Some(s.borrow().len()),
            Value::Block(s) => Some(s.borrow().len()),
            Value::Paren(s) => Some(s.borrow().len()),
            _ => None,
        }
    }

    pub fn is_series(&self) -> bool {
        matches!(self, Value::String(_) | Value::Binary(_) | Value::Block(_) | Value::Paren(_))
    }

    /// A same-kind series sharing no storage with `self` (spec §3.2
    /// `copy`), used by the evaluator when cloning function-body literals
    /// (spec §4.3.5) and by the `copy` native.
    pub fn deep_clone_series(&self) -> Value {
        match self {
            Value::String(s) => Value::String(s.borrow().copy_from_cursor().into_handle()),
            Value::Binary(s) => Value::Binary(s.borrow().copy_from_cursor().into_handle()),
            Value::Block(s) => {
                let cloned: Vec<Value> = s.borrow().items().iter().map(Value::deep_clone_series).collect();
                Value::block(cloned)
            }
            Value::Paren(s) => {
                let cloned: Vec<Value> = s.borrow().items().iter().map(Value::deep_clone_series).collect();
                Value::paren(cloned)
            }
            other => other.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Logic(a), Value::Logic(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Integer(a), Value::Decimal(b)) | (Value::Decimal(b), Value::Integer(a)) => {
                Decimal::from_i64(*a) == *b
            }
            (Value::String(a), Value::String(b)) => a.borrow().items() == b.borrow().items(),
            (Value::Binary(a), Value::Binary(b)) => a.borrow().items() == b.borrow().items(),
            (Value::Word(ka, a), Value::Word(kb, b)) => ka == kb && a == b,
            (Value::Datatype(a), Value::Datatype(b)) => a == b,
            (Value::Block(a), Value::Block(b)) => a.borrow().items() == b.borrow().items(),
            (Value::Paren(a), Value::Paren(b)) => a.borrow().items() == b.borrow().items(),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Port(a), Value::Port(b)) => a == b,
            (Value::Path(a), Value::Path(b)) => a == b,
            (Value::Bitset(a), Value::Bitset(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::mold::form(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_excludes_only_none_and_false() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Logic(false).is_truthy());
        assert!(Value::Logic(true).is_truthy());
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::string("").is_truthy());
    }

    #[test]
    fn series_equality_is_structural_not_identity() {
        let a = Value::block(vec![Value::Integer(1), Value::Integer(2)]);
        let b = Value::block(vec![Value::Integer(1), Value::Integer(2)]);
        assert_eq!(a, b);
    }

    #[test]
    fn cross_numeric_equality_compares_by_value() {
        assert_eq!(Value::Integer(3), Value::Decimal(Decimal::from_i64(3)));
    }

    #[test]
    fn deep_clone_series_does_not_share_storage() {
        let original = Value::block(vec![Value::Integer(1)]);
        let cloned = original.deep_clone_series();
        if let (Value::Block(o), Value::Block(c)) = (&original, &cloned) {
            o.borrow_mut().append(Value::Integer(2));
            assert_eq!(o.borrow().len(), 2);
            assert_eq!(c.borrow().len(), 1);
        } else {
            panic!("expected blocks");
        }
    }

    #[test]
    fn type_name_matches_datatype_word() {
        assert_eq!(Value::Integer(1).type_name(), "integer");
        assert_eq!(Value::Integer(1).datatype_word(), "integer!");
    }
}
