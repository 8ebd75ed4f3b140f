//! Lexical tokens produced by [`crate::lexer::tokenize`].
//!
//! Mirrors the teacher's flat `Token { text, line, column }` shape — the
//! reader is a classic two-stage tokenize-then-parse pipeline rather than a
//! single character-by-character recursive descent, so nested blocks/parens
//! and path segments are just ordinary recursive-descent parsing over a
//! token vector.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A maximal run of atom characters: numbers, words of any flavor,
    /// datatypes, and path expressions, disambiguated by the parser.
    Atom,
    /// A decoded string literal; escapes already resolved.
    Str,
    /// A decoded binary literal's bytes.
    Binary,
    LBracket,
    RBracket,
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub bytes: Vec<u8>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn atom(text: String, line: usize, column: usize) -> Self {
        Token { kind: TokenKind::Atom, text, bytes: Vec::new(), line, column }
    }

    pub fn string(text: String, line: usize, column: usize) -> Self {
        Token { kind: TokenKind::Str, text, bytes: Vec::new(), line, column }
    }

    pub fn binary(bytes: Vec<u8>, line: usize, column: usize) -> Self {
        Token { kind: TokenKind::Binary, text: String::new(), bytes, line, column }
    }

    pub fn punct(kind: TokenKind, line: usize, column: usize) -> Self {
        Token { kind, text: String::new(), bytes: Vec::new(), line, column }
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.kind == TokenKind::Atom && self.text == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Atom => write!(f, "{}", self.text),
            TokenKind::Str => write!(f, "{:?}", self.text),
            TokenKind::Binary => write!(f, "#{{...}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}
