//! Textual rendering (spec §6.5): `mold` produces a re-readable
//! representation (feeding it back through the reader reproduces an equal
//! value); `form` produces the human-facing representation `print` uses,
//! which drops quoting around strings and the `!` suffix is never added to
//! either since datatype values already carry it as part of their name.

use crate::value::{FunctionBody, Value};
#[cfg(test)]
use crate::word::WordKind;

pub fn mold(value: &Value) -> String {
    render(value, true)
}

pub fn form(value: &Value) -> String {
    render(value, false)
}

fn render(value: &Value, molding: bool) -> String {
    match value {
        Value::None => "none".to_string(),
        Value::Logic(b) => b.to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Decimal(d) => d.to_string(),
        Value::String(s) => {
            let text: String = s.borrow().items().iter().collect();
            if molding {
                mold_string(&text)
            } else {
                text
            }
        }
        Value::Binary(b) => {
            let bytes = b.borrow();
            let hex: String = bytes.items().iter().map(|byte| format!("{byte:02x}")).collect();
            format!("#{{{hex}}}")
        }
        Value::Word(kind, symbol) => kind.mold(symbol),
        Value::Datatype(name) => format!("{name}!"),
        Value::Block(items) => {
            let inner: Vec<String> = items.borrow().items().iter().map(|v| render(v, true)).collect();
            format!("[{}]", inner.join(" "))
        }
        Value::Paren(items) => {
            let inner: Vec<String> = items.borrow().items().iter().map(|v| render(v, true)).collect();
            format!("({})", inner.join(" "))
        }
        Value::Function(func) => match &func.body {
            FunctionBody::Native(_) => format!("#[native {}]", func.name.as_deref().unwrap_or("anonymous")),
            FunctionBody::Block(_) => format!("#[function {}]", func.name.as_deref().unwrap_or("anonymous")),
        },
        Value::Object(handle) => format!("#[object {}]", handle.0),
        Value::Port(port) => format!("#[port {}]", port.scheme),
        Value::Path(path) => path.mold(),
        Value::Bitset(set) => set.mold(),
    }
}

/// Wraps `text` in double quotes, escaping embedded quotes and backslashes,
/// so the result re-parses to an equal string (spec §6.5).
fn mold_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mold_quotes_strings_form_does_not() {
        let v = Value::string("hi");
        assert_eq!(mold(&v), "\"hi\"");
        assert_eq!(form(&v), "hi");
    }

    #[test]
    fn mold_escapes_embedded_quotes() {
        let v = Value::string("say \"hi\"");
        assert_eq!(mold(&v), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn blocks_mold_recursively() {
        let v = Value::block(vec![Value::Integer(1), Value::string("a")]);
        assert_eq!(mold(&v), "[1 \"a\"]");
    }

    #[test]
    fn words_mold_by_kind() {
        assert_eq!(mold(&Value::Word(WordKind::SetWord, "x".into())), "x:");
    }

    #[test]
    fn binary_molds_as_hex() {
        let v = Value::binary(vec![0xde, 0xad]);
        assert_eq!(mold(&v), "#{dead}");
    }
}
