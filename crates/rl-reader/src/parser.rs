//! Recursive-descent parser turning a token stream into `rl_core::Value`s
//! (spec §4.1), grounded on the teacher's `Parser { tokens, pos }` shape —
//! a flat cursor over the token vector rather than a fresh character scan
//! per nesting level, so `[`/`(` recursion is just "parse values until the
//! matching close token, erroring to `unexpected-eof` if the stream runs
//! out first".

use rl_core::error::SourcePos;
use rl_core::path::{Path, PathKind, PathSegment};
use rl_core::word::WordKind;
use rl_core::{Decimal, ErrorCategory, RlError, Value};

use crate::token::{Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parses every top-level value; the caller wraps the result into a
    /// block if it wants one (the reader itself returns a bare sequence,
    /// per spec §4.1).
    pub fn parse_all(&mut self) -> Result<Vec<Value>, RlError> {
        let mut values = Vec::new();
        while self.pos < self.tokens.len() {
            values.push(self.parse_value()?);
        }
        Ok(values)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn pos_of(&self, token: &Token) -> SourcePos {
        SourcePos::new(token.line, token.column)
    }

    fn parse_value(&mut self) -> Result<Value, RlError> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(RlError::unexpected_eof)?;

        match token.kind {
            TokenKind::Str => {
                self.pos += 1;
                Ok(Value::string(token.text))
            }
            TokenKind::Binary => {
                self.pos += 1;
                Ok(Value::binary(token.bytes))
            }
            TokenKind::LBracket => {
                self.pos += 1;
                let items = self.parse_sequence(TokenKind::RBracket, RlError::unclosed_block)?;
                Ok(Value::block(items))
            }
            TokenKind::LParen => {
                self.pos += 1;
                let items = self.parse_sequence(TokenKind::RParen, RlError::unclosed_paren)?;
                Ok(Value::paren(items))
            }
            TokenKind::RBracket | TokenKind::RParen => Err(RlError::new(ErrorCategory::Syntax, "invalid-syntax")
                .with_arg(0, "unexpected closing delimiter")
                .with_position(self.pos_of(&token))),
            TokenKind::Atom => {
                self.pos += 1;
                self.parse_atom(&token)
            }
        }
    }

    fn parse_sequence(
        &mut self,
        closer: TokenKind,
        on_eof: impl Fn() -> RlError,
    ) -> Result<Vec<Value>, RlError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => return Err(on_eof()),
                Some(t) if t.kind == closer => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => items.push(self.parse_value()?),
            }
        }
    }

    fn parse_atom(&mut self, token: &Token) -> Result<Value, RlError> {
        let text = token.text.as_str();
        let pos = self.pos_of(token);

        if text == "none" {
            return Ok(Value::None);
        }
        if text == "true" {
            return Ok(Value::Logic(true));
        }
        if text == "false" {
            return Ok(Value::Logic(false));
        }
        if let Some(n) = parse_integer(text) {
            return Ok(Value::Integer(n));
        }
        if looks_like_decimal(text) {
            if let Some(d) = Decimal::parse(text) {
                return Ok(Value::Decimal(d));
            }
        }

        let (sigil, body, trailing_colon) = strip_sigils(text);
        if body.contains('.') {
            return self.parse_path(sigil, trailing_colon, &body, pos);
        }

        match (sigil, trailing_colon) {
            (Sigil::Lit, _) => {
                validate_word(&body, pos)?;
                Ok(Value::Word(WordKind::LitWord, body))
            }
            (Sigil::Get, _) => {
                validate_word(&body, pos)?;
                Ok(Value::Word(WordKind::GetWord, body))
            }
            (Sigil::None, true) => {
                validate_word(&body, pos)?;
                Ok(Value::Word(WordKind::SetWord, body))
            }
            (Sigil::None, false) => {
                if let Some(name) = body.strip_suffix('!') {
                    if !name.is_empty() {
                        return Ok(Value::Datatype(name.to_string()));
                    }
                }
                validate_word(&body, pos)?;
                Ok(Value::Word(WordKind::Word, body))
            }
        }
    }

    /// Builds a path expression, absorbing a following parenthesized group
    /// as an eval segment when a segment is empty (the lexer stopped the
    /// atom at `(`, leaving a trailing `.`).
    fn parse_path(&mut self, sigil: Sigil, trailing_colon: bool, body: &str, pos: SourcePos) -> Result<Value, RlError> {
        let mut parts: Vec<&str> = body.split('.').collect();
        let trailing_empty = parts.last().map(|p| p.is_empty()).unwrap_or(false);
        if trailing_empty {
            parts.pop();
        }
        if parts.is_empty() {
            return Err(RlError::new(ErrorCategory::Syntax, "invalid-syntax")
                .with_arg(0, "empty path")
                .with_position(pos));
        }
        let head = parts[0].to_string();
        let mut segments = Vec::new();
        for part in &parts[1..] {
            segments.push(segment_from_text(part));
        }
        if trailing_empty {
            segments.push(self.parse_eval_segment(pos)?);
            // Further dot-joined segments after an eval segment arrive as a
            // fresh atom beginning with '.', e.g. ".c" in `a.(b).c`.
            while let Some(next) = self.peek().cloned() {
                if next.kind == TokenKind::Atom && next.text.starts_with('.') {
                    self.pos += 1;
                    let rest = &next.text[1..];
                    if rest.is_empty() {
                        segments.push(self.parse_eval_segment(pos)?);
                    } else {
                        for part in rest.split('.') {
                            segments.push(segment_from_text(part));
                        }
                    }
                } else {
                    break;
                }
            }
        }

        let kind = match (sigil, trailing_colon) {
            (Sigil::Get, _) => PathKind::GetPath,
            (_, true) => PathKind::SetPath,
            _ => PathKind::Path,
        };
        Ok(Value::Path(std::rc::Rc::new(Path::new(kind, head, segments))))
    }

    fn parse_eval_segment(&mut self, pos: SourcePos) -> Result<PathSegment, RlError> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::LParen => {
                self.pos += 1;
                let items = self.parse_sequence(TokenKind::RParen, RlError::unclosed_paren)?;
                Ok(PathSegment::Eval(items))
            }
            _ => Err(RlError::new(ErrorCategory::Syntax, "invalid-syntax")
                .with_arg(0, "expected ( after . in path")
                .with_position(pos)),
        }
    }
}

fn segment_from_text(text: &str) -> PathSegment {
    match text.parse::<i64>() {
        Ok(n) => PathSegment::Index(n),
        Err(_) => PathSegment::Word(text.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sigil {
    None,
    Get,
    Lit,
}

/// Strips a leading `:` (get) or `'` (lit) and a trailing `:` (set),
/// reporting which were present. A body must not have both a leading sigil
/// and a trailing colon in well-formed input, but the parser does not
/// enforce that here — `validate_word` catches the residue.
fn strip_sigils(text: &str) -> (Sigil, String, bool) {
    if let Some(rest) = text.strip_prefix(':') {
        return (Sigil::Get, rest.to_string(), false);
    }
    if let Some(rest) = text.strip_prefix('\'') {
        return (Sigil::Lit, rest.to_string(), false);
    }
    if let Some(rest) = text.strip_suffix(':') {
        if !rest.is_empty() {
            return (Sigil::None, rest.to_string(), true);
        }
    }
    (Sigil::None, text.to_string(), false)
}

fn validate_word(body: &str, pos: SourcePos) -> Result<(), RlError> {
    if body.is_empty() {
        return Err(RlError::new(ErrorCategory::Syntax, "invalid-syntax")
            .with_arg(0, "empty word")
            .with_position(pos));
    }
    let mut chars = body.chars();
    let first = chars.next().unwrap();
    if first.is_ascii_digit() {
        return Err(RlError::new(ErrorCategory::Syntax, "invalid-syntax")
            .with_arg(0, format!("word cannot start with a digit: {body}"))
            .with_position(pos));
    }
    Ok(())
}

fn parse_integer(text: &str) -> Option<i64> {
    if text.is_empty() {
        return None;
    }
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok()
}

fn looks_like_decimal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let has_digit = unsigned.chars().any(|c| c.is_ascii_digit());
    let has_marker = unsigned.contains('.') || unsigned.contains('e') || unsigned.contains('E');
    has_digit && has_marker && unsigned.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(src: &str) -> Vec<Value> {
        Parser::new(tokenize(src).unwrap()).parse_all().unwrap()
    }

    #[test]
    fn parses_integers_and_decimals() {
        let values = parse("3 -4 3.14");
        assert_eq!(values[0], Value::Integer(3));
        assert_eq!(values[1], Value::Integer(-4));
        assert_eq!(values[2], Value::Decimal(Decimal::parse("3.14").unwrap()));
    }

    #[test]
    fn parses_word_flavors() {
        let values = parse("foo foo: :foo 'foo");
        assert_eq!(values[0], Value::Word(WordKind::Word, "foo".into()));
        assert_eq!(values[1], Value::Word(WordKind::SetWord, "foo".into()));
        assert_eq!(values[2], Value::Word(WordKind::GetWord, "foo".into()));
        assert_eq!(values[3], Value::Word(WordKind::LitWord, "foo".into()));
    }

    #[test]
    fn parses_datatype_words() {
        let values = parse("integer!");
        assert_eq!(values[0], Value::Datatype("integer".into()));
    }

    #[test]
    fn parses_nested_blocks() {
        let values = parse("[1 [2 3]]");
        if let Value::Block(items) = &values[0] {
            assert_eq!(items.borrow().len(), 2);
        } else {
            panic!("expected block");
        }
    }

    #[test]
    fn unclosed_block_is_detected() {
        let err = Parser::new(tokenize("[1 2").unwrap()).parse_all().unwrap_err();
        assert!(err.is_incomplete_input());
    }

    #[test]
    fn parses_dotted_path() {
        let values = parse("a.b.c");
        match &values[0] {
            Value::Path(p) => {
                assert_eq!(p.head, "a");
                assert_eq!(p.segments.len(), 2);
            }
            other => panic!("expected path, got {other:?}"),
        }
    }

    #[test]
    fn parses_path_with_eval_segment() {
        let values = parse("a.(1 + 2)");
        match &values[0] {
            Value::Path(p) => {
                assert_eq!(p.head, "a");
                assert!(matches!(p.segments[0], PathSegment::Eval(_)));
            }
            other => panic!("expected path, got {other:?}"),
        }
    }
}
