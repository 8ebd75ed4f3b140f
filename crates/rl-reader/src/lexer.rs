//! Character-by-character tokenizer (spec §4.1).
//!
//! Structured the way the teacher's `tokenize()` is: a single pass over
//! `chars()`, hand-tracking `line`/`column`, accumulating into a `current`
//! buffer and flushing it to a token on any delimiter. Where the teacher
//! pushes a sentinel `"<<<UNCLOSED_STRING>>>"` token for the parser to
//! detect later, this tokenizer returns the structured error immediately —
//! `rl-core::RlError` already exists to carry it, so there is no need for
//! the sentinel indirection.

use rl_core::RlError;

use crate::token::{Token, TokenKind};

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Cursor { chars: source.chars().peekable(), line: 0, column: 0 }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}

/// Characters that extend an atom beyond the reader's base word-character
/// class. The reader's word-character class is letter/digit/`-_?!`, but
/// `3 + 4 * 2` (spec §8.2 S1) requires symbolic operator words to tokenize
/// too, so the lexer's atom class is wider than the word-validity class the
/// parser later checks bare words against.
fn is_atom_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            '-' | '_' | '?' | '!' | '.' | '\'' | ':' | '+' | '*' | '/' | '=' | '<' | '>' | '&' | '|' | '~' | '^' | '%'
        )
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, RlError> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut current = String::new();
    let mut start_line = 0;
    let mut start_col = 0;

    macro_rules! flush {
        () => {
            if !current.is_empty() {
                tokens.push(Token::atom(std::mem::take(&mut current), start_line, start_col));
            }
        };
    }

    while let Some(c) = cursor.peek() {
        if c == ';' {
            flush!();
            while let Some(c) = cursor.peek() {
                if c == '\n' {
                    break;
                }
                cursor.advance();
            }
            continue;
        }
        if c.is_whitespace() {
            flush!();
            cursor.advance();
            continue;
        }
        if c == '"' {
            flush!();
            let (line, col) = (cursor.line, cursor.column);
            cursor.advance();
            let text = read_string_body(&mut cursor, line, col)?;
            tokens.push(Token::string(text, line, col));
            continue;
        }
        if c == '#' {
            // Only `#{...}` (binary) is reader syntax; a bare `#` elsewhere
            // is folded into the surrounding atom (e.g. as part of a word).
            let mut lookahead = cursor.chars.clone();
            lookahead.next();
            if lookahead.peek() == Some(&'{') {
                flush!();
                let (line, col) = (cursor.line, cursor.column);
                cursor.advance();
                cursor.advance();
                let bytes = read_binary_body(&mut cursor, line, col)?;
                tokens.push(Token::binary(bytes, line, col));
                continue;
            }
        }
        if matches!(c, '[' | ']' | '(' | ')') {
            flush!();
            let kind = match c {
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '(' => TokenKind::LParen,
                _ => TokenKind::RParen,
            };
            let (line, col) = (cursor.line, cursor.column);
            cursor.advance();
            tokens.push(Token::punct(kind, line, col));
            continue;
        }
        if is_atom_char(c) {
            if current.is_empty() {
                start_line = cursor.line;
                start_col = cursor.column;
            }
            current.push(c);
            cursor.advance();
            continue;
        }
        // Any other byte (stray delimiter-like punctuation) is folded into
        // the current atom so the parser can report a clean syntax error
        // rather than the lexer silently dropping it.
        if current.is_empty() {
            start_line = cursor.line;
            start_col = cursor.column;
        }
        current.push(c);
        cursor.advance();
    }
    flush!();

    Ok(tokens)
}

fn read_string_body(cursor: &mut Cursor<'_>, start_line: usize, start_col: usize) -> Result<String, RlError> {
    let mut out = String::new();
    loop {
        match cursor.advance() {
            None => {
                return Err(RlError::unclosed_string(&out)
                    .with_position(rl_core::error::SourcePos::new(start_line, start_col)))
            }
            Some('"') => return Ok(out),
            Some('\\') => match cursor.advance() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {
                    return Err(RlError::unclosed_string(&out)
                        .with_position(rl_core::error::SourcePos::new(start_line, start_col)))
                }
            },
            Some(c) => out.push(c),
        }
    }
}

fn read_binary_body(cursor: &mut Cursor<'_>, start_line: usize, start_col: usize) -> Result<Vec<u8>, RlError> {
    let mut digits = String::new();
    loop {
        match cursor.peek() {
            None => {
                return Err(RlError::unexpected_eof()
                    .with_position(rl_core::error::SourcePos::new(start_line, start_col)))
            }
            Some('}') => {
                cursor.advance();
                break;
            }
            Some(c) if c.is_whitespace() => {
                cursor.advance();
            }
            Some(c) if c.is_ascii_hexdigit() => {
                digits.push(c);
                cursor.advance();
            }
            Some(_) => {
                return Err(rl_core::RlError::new(rl_core::ErrorCategory::Syntax, "invalid-syntax")
                    .with_arg(0, "invalid character in binary literal")
                    .with_position(rl_core::error::SourcePos::new(start_line, start_col)))
            }
        }
    }
    if digits.len() % 2 != 0 {
        return Err(rl_core::RlError::new(rl_core::ErrorCategory::Syntax, "invalid-syntax")
            .with_arg(0, "binary literal has an odd number of hex digits")
            .with_position(rl_core::error::SourcePos::new(start_line, start_col)));
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    let chars: Vec<char> = digits.chars().collect();
    for pair in chars.chunks(2) {
        let byte_str: String = pair.iter().collect();
        let byte = u8::from_str_radix(&byte_str, 16).map_err(|_| {
            rl_core::RlError::new(rl_core::ErrorCategory::Syntax, "invalid-syntax")
                .with_arg(0, "invalid binary literal")
                .with_position(rl_core::error::SourcePos::new(start_line, start_col))
        })?;
        bytes.push(byte);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_arithmetic_expression() {
        let tokens = tokenize("3 + 4 * 2").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["3", "+", "4", "*", "2"]);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert!(err.is_incomplete_input());
    }

    #[test]
    fn binary_literal_decodes_hex() {
        let tokens = tokenize("#{dead}").unwrap();
        assert_eq!(tokens[0].bytes, vec![0xde, 0xad]);
    }

    #[test]
    fn line_comment_is_elided() {
        let tokens = tokenize("1 ; comment\n2").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }
}
