//! Structured error model (spec §3.7, §7).
//!
//! Every fallible operation in the workspace returns `Result<T, RlError>`.
//! Unlike the teacher's FFI-era `CodeGenError` (a two-variant enum wrapping
//! `String`/`fmt::Error`), `RlError` is a single struct: the category, a
//! stable kebab-case ID, up to three interpolation arguments, an optional
//! source position, and a call-stack snapshot collected as the error
//! propagates out of nested calls (§4.3.6, §7).
//!
//! As in the teacher's codebase, this is hand-rolled — no `thiserror` or
//! `anyhow` anywhere in this workspace.

use std::fmt;

/// The seven error categories from spec §7, carrying their numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Throw,
    Note,
    Syntax,
    Script,
    Math,
    Access,
    Internal,
}

impl ErrorCategory {
    /// The numeric code used in the category column of spec §7's taxonomy.
    pub fn code(self) -> u32 {
        match self {
            ErrorCategory::Throw => 0,
            ErrorCategory::Note => 100,
            ErrorCategory::Syntax => 200,
            ErrorCategory::Script => 300,
            ErrorCategory::Math => 400,
            ErrorCategory::Access => 500,
            ErrorCategory::Internal => 900,
        }
    }

    /// Whether this category is intercepted by loop/catch natives (§4.3.6)
    /// rather than always surfacing to the host.
    pub fn is_throw(self) -> bool {
        matches!(self, ErrorCategory::Throw)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCategory::Throw => "Throw",
            ErrorCategory::Note => "Note",
            ErrorCategory::Syntax => "Syntax",
            ErrorCategory::Script => "Script",
            ErrorCategory::Math => "Math",
            ErrorCategory::Access => "Access",
            ErrorCategory::Internal => "Internal",
        };
        write!(f, "{name}")
    }
}

/// A single source position for "near" rendering (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    pub fn new(line: usize, column: usize) -> Self {
        SourcePos { line, column }
    }
}

/// One entry in the call-stack snapshot attached to a propagating error
/// (§3.7, §7: "a snapshot of the call stack at the failure site").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub function_name: String,
    pub position: Option<SourcePos>,
}

/// A structured rlang runtime error.
///
/// `args` is a fixed three-slot tuple of owned strings, matching spec §3.7's
/// "fixed-size argument tuple (three strings, used for message
/// interpolation)". Unused slots are empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct RlError {
    pub category: ErrorCategory,
    pub id: String,
    pub args: [String; 3],
    pub position: Option<SourcePos>,
    /// Leaf-first call stack, appended to as the error crosses call-site
    /// boundaries (§7: "Stacks are displayed leaf-first").
    pub stack: Vec<StackEntry>,
}

impl RlError {
    pub fn new(category: ErrorCategory, id: impl Into<String>) -> Self {
        RlError {
            category,
            id: id.into(),
            args: [String::new(), String::new(), String::new()],
            position: None,
            stack: Vec::new(),
        }
    }

    pub fn with_arg(mut self, index: usize, arg: impl Into<String>) -> Self {
        self.args[index] = arg.into();
        self
    }

    pub fn with_args(mut self, args: [impl Into<String>; 3]) -> Self {
        let [a, b, c] = args;
        self.args = [a.into(), b.into(), c.into()];
        self
    }

    pub fn with_position(mut self, pos: SourcePos) -> Self {
        self.position = Some(pos);
        self
    }

    /// Append the calling function's name/position as this error crosses a
    /// call-site boundary (§4.3.6, §7).
    pub fn push_frame(mut self, function_name: impl Into<String>, position: Option<SourcePos>) -> Self {
        self.stack.push(StackEntry {
            function_name: function_name.into(),
            position,
        });
        self
    }

    pub fn is_throw(&self) -> bool {
        self.category.is_throw()
    }

    // --- convenience constructors for the IDs enumerated in spec §7 ---

    pub fn no_value(symbol: &str) -> Self {
        RlError::new(ErrorCategory::Script, "no-value").with_arg(0, symbol)
    }

    pub fn type_mismatch(expected: &str, got: &str) -> Self {
        RlError::new(ErrorCategory::Script, "type-mismatch")
            .with_arg(0, expected)
            .with_arg(1, got)
    }

    pub fn arg_count(expected: usize, got: usize) -> Self {
        RlError::new(ErrorCategory::Script, "arg-count")
            .with_arg(0, expected.to_string())
            .with_arg(1, got.to_string())
    }

    pub fn out_of_bounds() -> Self {
        RlError::new(ErrorCategory::Script, "out-of-bounds")
    }

    pub fn empty_series() -> Self {
        RlError::new(ErrorCategory::Script, "empty-series")
    }

    pub fn div_zero() -> Self {
        RlError::new(ErrorCategory::Math, "div-zero")
    }

    pub fn unclosed_string(near: &str) -> Self {
        RlError::new(ErrorCategory::Syntax, "invalid-syntax")
            .with_arg(0, format!("unclosed string literal near {near:?}"))
    }

    pub fn unclosed_block() -> Self {
        RlError::new(ErrorCategory::Syntax, "unclosed-block")
    }

    pub fn unclosed_paren() -> Self {
        RlError::new(ErrorCategory::Syntax, "unclosed-paren")
    }

    pub fn unexpected_eof() -> Self {
        RlError::new(ErrorCategory::Syntax, "unexpected-eof")
    }

    pub fn parse_invalid_rule() -> Self {
        RlError::new(ErrorCategory::Script, "parse-invalid-rule")
    }

    /// Whether this error is one of the four "more input expected" signals
    /// from spec §6.2, used by REPL hosts to decide on line continuation.
    pub fn is_incomplete_input(&self) -> bool {
        match self.id.as_str() {
            "unexpected-eof" | "unclosed-block" | "unclosed-paren" => true,
            "invalid-syntax" => self.args[0].to_lowercase().contains("unclosed string literal"),
            _ => false,
        }
    }

    /// The `** <Category> Error: <message>` header line plus "near"/"where"
    /// trailers, per spec §4.6.
    pub fn format_report(&self) -> String {
        let mut out = format!("** {} Error: {}\n", self.category, self.message());
        if let Some(pos) = self.position {
            out.push_str(&format!("** Near: line {}, column {}\n", pos.line + 1, pos.column + 1));
        }
        if !self.stack.is_empty() {
            out.push_str("** Where:\n");
            for entry in &self.stack {
                match entry.position {
                    Some(pos) => out.push_str(&format!(
                        "    {} (line {}, column {})\n",
                        entry.function_name,
                        pos.line + 1,
                        pos.column + 1
                    )),
                    None => out.push_str(&format!("    {}\n", entry.function_name)),
                }
            }
        }
        out
    }

    /// Interpolates `args` into a human-readable message for `id`. Unknown
    /// IDs fall back to `"{id}: {args...}"` so new natives can report
    /// ad-hoc errors without extending this match.
    pub fn message(&self) -> String {
        let [a, b, c] = &self.args;
        match self.id.as_str() {
            "no-value" => format!("{a} has no value"),
            "type-mismatch" => format!("expected {a}, got {b}"),
            "arg-count" => format!("expected {a}, got {b}"),
            "out-of-bounds" => "out of bounds".to_string(),
            "empty-series" => "empty series".to_string(),
            "div-zero" => "attempt to divide by zero".to_string(),
            "invalid-operation" => format!("invalid operation: {a}"),
            "not-implemented" => format!("not implemented: {a}"),
            "unclosed-block" => "missing closing ]".to_string(),
            "unclosed-paren" => "missing closing )".to_string(),
            "unexpected-eof" => "unexpected end of input".to_string(),
            "invalid-syntax" | "invalid-literal" => a.clone(),
            "parse-invalid-rule" => format!("invalid PARSE rule: {a}"),
            "parse-invalid-input" => "invalid PARSE input".to_string(),
            _ => {
                let rest: Vec<&str> = [a.as_str(), b.as_str(), c.as_str()]
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect();
                if rest.is_empty() {
                    self.id.clone()
                } else {
                    format!("{}: {}", self.id, rest.join(", "))
                }
            }
        }
    }
}

impl fmt::Display for RlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_report())
    }
}

impl std::error::Error for RlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_match_taxonomy() {
        assert_eq!(ErrorCategory::Throw.code(), 0);
        assert_eq!(ErrorCategory::Script.code(), 300);
        assert_eq!(ErrorCategory::Internal.code(), 900);
    }

    #[test]
    fn incomplete_input_detection() {
        assert!(RlError::unclosed_block().is_incomplete_input());
        assert!(RlError::unclosed_paren().is_incomplete_input());
        assert!(RlError::unexpected_eof().is_incomplete_input());
        assert!(RlError::unclosed_string("abc").is_incomplete_input());
        assert!(!RlError::div_zero().is_incomplete_input());
        assert!(!RlError::type_mismatch("integer!", "string!").is_incomplete_input());
    }

    #[test]
    fn stack_is_leaf_first() {
        let err = RlError::no_value("missing")
            .push_frame("inner", Some(SourcePos::new(0, 5)))
            .push_frame("outer", Some(SourcePos::new(1, 0)));
        assert_eq!(err.stack[0].function_name, "inner");
        assert_eq!(err.stack[1].function_name, "outer");
    }

    #[test]
    fn format_report_contains_header() {
        let err = RlError::div_zero();
        let report = err.format_report();
        assert!(report.starts_with("** Math Error:"));
    }
}
