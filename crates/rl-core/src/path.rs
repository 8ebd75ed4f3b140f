//! Path expressions (spec §3.6).
//!
//! A path is an ordered list of segments applied to a base value. The base
//! itself is not part of `Path` — it is whatever `Value` the path is
//! attached to in the reader's output (a bare `path`/`get-path`/`set-path`
//! head word plus the segment list), mirroring how the reader never
//! evaluates and the evaluator supplies the base by lookup.

use crate::mold::mold;
use crate::value::Value;
use std::fmt;

/// One path segment (spec §3.6: "word (field or key), index (integer,
/// one-based in surface syntax), and eval (a block whose result is used as
/// a dynamic segment)").
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Word(String),
    Index(i64),
    Eval(Vec<Value>),
}

impl PathSegment {
    pub fn mold(&self) -> String {
        match self {
            PathSegment::Word(w) => w.clone(),
            PathSegment::Index(i) => i.to_string(),
            PathSegment::Eval(values) => {
                let inner: Vec<String> = values.iter().map(mold).collect();
                format!("({})", inner.join(" "))
            }
        }
    }
}

/// The three path flavors share a segment list but differ in evaluation
/// effect exactly like the word flavors (spec §3.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Path,
    GetPath,
    SetPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub kind: PathKind,
    /// The head word this path is rooted at (looked up to obtain the base
    /// value before segments are walked).
    pub head: String,
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn new(kind: PathKind, head: impl Into<String>, segments: Vec<PathSegment>) -> Self {
        Path { kind, head: head.into(), segments }
    }

    pub fn mold(&self) -> String {
        let mut out = String::new();
        if self.kind == PathKind::GetPath {
            out.push(':');
        }
        out.push_str(&self.head);
        for segment in &self.segments {
            out.push('.');
            out.push_str(&segment.mold());
        }
        if self.kind == PathKind::SetPath {
            out.push(':');
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mold_forms_match_spec_table() {
        let p = Path::new(
            PathKind::Path,
            "a",
            vec![PathSegment::Word("b".into()), PathSegment::Word("c".into())],
        );
        assert_eq!(p.mold(), "a.b.c");

        let gp = Path::new(PathKind::GetPath, "a", vec![PathSegment::Word("b".into())]);
        assert_eq!(gp.mold(), ":a.b");

        let sp = Path::new(PathKind::SetPath, "a", vec![PathSegment::Word("b".into())]);
        assert_eq!(sp.mold(), "a.b:");
    }

    #[test]
    fn eval_segment_molds_with_parens() {
        let p = Path::new(
            PathKind::Path,
            "a",
            vec![PathSegment::Eval(vec![Value::Integer(1)])],
        );
        assert_eq!(p.mold(), "a.(1)");
    }
}
