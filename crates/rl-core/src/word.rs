//! Word flavors (spec §3.3).
//!
//! A word is a case-sensitive symbol; the four flavors share that symbol but
//! differ in how `do-next` evaluates them (§4.3.3). Keeping `WordKind`
//! orthogonal to the symbol string itself (rather than four separate
//! `Value` variants with duplicated fields) matches the spec's own framing
//! ("four word flavors share a symbol string") and keeps `Value::Word`'s
//! match arms single-sited in the evaluator.

use std::fmt;

/// Which of the four word flavors a `Value::Word` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordKind {
    Word,
    SetWord,
    GetWord,
    LitWord,
}

impl WordKind {
    pub fn mold(self, symbol: &str) -> String {
        match self {
            WordKind::Word => symbol.to_string(),
            WordKind::SetWord => format!("{symbol}:"),
            WordKind::GetWord => format!(":{symbol}"),
            WordKind::LitWord => format!("'{symbol}"),
        }
    }

    /// The word-character class from spec §4.1: letter, digit, `-`, `_`,
    /// `?`, `!`; callers are responsible for rejecting a leading digit.
    pub fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '-' | '_' | '?' | '!')
    }
}

impl fmt::Display for WordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WordKind::Word => "word",
            WordKind::SetWord => "set-word",
            WordKind::GetWord => "get-word",
            WordKind::LitWord => "lit-word",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mold_forms_match_spec_table() {
        assert_eq!(WordKind::Word.mold("sym"), "sym");
        assert_eq!(WordKind::SetWord.mold("sym"), "sym:");
        assert_eq!(WordKind::GetWord.mold("sym"), ":sym");
        assert_eq!(WordKind::LitWord.mold("sym"), "'sym");
    }

    #[test]
    fn word_char_class() {
        assert!(WordKind::is_word_char('a'));
        assert!(WordKind::is_word_char('-'));
        assert!(WordKind::is_word_char('?'));
        assert!(!WordKind::is_word_char(' '));
        assert!(!WordKind::is_word_char('.'));
    }
}
