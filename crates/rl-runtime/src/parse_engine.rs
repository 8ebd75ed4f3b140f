//! The PARSE dialect (spec §4.4).

use rl_core::value::FunctionBody;
use rl_core::word::WordKind;
use rl_core::{Bitset, RlError, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub case_sensitive: bool,
    pub require_all: bool,
    pub part: Option<usize>,
    pub any: bool,
}

/// The two cursor kinds PARSE operates over, unified behind one element
/// accessor (spec §4.4: "a unified protocol").
enum Input {
    Str(Vec<char>),
    Block(Vec<Value>),
}

impl Input {
    fn from_value(value: &Value) -> Result<Input, RlError> {
        match value {
            Value::String(s) => Ok(Input::Str(s.borrow().items().to_vec())),
            Value::Block(b) => Ok(Input::Block(b.borrow().items().to_vec())),
            other => Err(RlError::type_mismatch("string! or block!", other.type_name())),
        }
    }

    fn len(&self) -> usize {
        match self {
            Input::Str(c) => c.len(),
            Input::Block(b) => b.len(),
        }
    }
}

pub struct ParseState {
    input: Input,
    pos: usize,
    limit: usize,
    pub captures: HashMap<String, Value>,
    pub marks: HashMap<String, usize>,
    options: ParseOptions,
}

/// Runs PARSE against `input` with `rules`, returning success/failure plus
/// the final state for diagnostics (spec §4.4.5's "alternate entry point").
pub fn parse(input: &Value, rules: &[Value], options: ParseOptions) -> Result<(bool, ParseState), RlError> {
    let input_data = Input::from_value(input)?;
    let limit = options.part.unwrap_or_else(|| input_data.len()).min(input_data.len());
    let mut state = ParseState {
        input: input_data,
        pos: 0,
        limit,
        captures: HashMap::new(),
        marks: HashMap::new(),
        options,
    };

    let matched = match_sequence(&mut state, rules)?;
    let success = matched && (!options.require_all || state.pos >= state.limit);
    Ok((success, state))
}

fn match_sequence(state: &mut ParseState, rules: &[Value]) -> Result<bool, RlError> {
    if let Some(alternatives) = split_alternation(rules) {
        let start = state.pos;
        for alt in alternatives {
            state.pos = start;
            if match_rule_run(state, &alt)? {
                return Ok(true);
            }
        }
        state.pos = start;
        return Ok(false);
    }
    match_rule_run(state, rules)
}

fn split_alternation(rules: &[Value]) -> Option<Vec<Vec<Value>>> {
    if !rules.iter().any(is_alternation_bar) {
        return None;
    }
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for rule in rules {
        if is_alternation_bar(rule) {
            groups.push(std::mem::take(&mut current));
        } else {
            current.push(rule.clone());
        }
    }
    groups.push(current);
    Some(groups)
}

fn is_alternation_bar(value: &Value) -> bool {
    matches!(value, Value::Word(WordKind::Word, name) if name == "|")
}

/// Matches a flat sequence of sub-rules, backtracking the cursor to the
/// sequence's start on failure (spec §4.4.3).
fn match_rule_run(state: &mut ParseState, rules: &[Value]) -> Result<bool, RlError> {
    let start = state.pos;
    for rule in rules {
        if !match_one_rule(state, rule)? {
            state.pos = start;
            return Ok(false);
        }
    }
    Ok(true)
}

fn match_one_rule(state: &mut ParseState, rule: &Value) -> Result<bool, RlError> {
    match rule {
        Value::String(s) => {
            let literal: Vec<char> = s.borrow().items().to_vec();
            match_string_literal(state, &literal)
        }
        Value::Integer(n) => match_skip_count(state, *n),
        Value::Word(WordKind::Word, name) if name == "skip" => Ok(advance_one(state)),
        Value::Word(WordKind::Word, name) if name == "end" => Ok(state.pos >= state.limit),
        Value::Word(WordKind::Word, name) => match_datatype_word(state, &format!("{name}!")),
        Value::Datatype(name) => match_datatype_word(state, &format!("{name}!")),
        Value::Bitset(set) => match_bitset(state, set),
        Value::Block(b) => {
            let inner = b.borrow().items().to_vec();
            match_sequence(state, &inner)
        }
        other => Err(RlError::parse_invalid_rule().with_arg(0, other.type_name())),
    }
}

fn advance_one(state: &mut ParseState) -> bool {
    if state.pos < state.limit {
        state.pos += 1;
        true
    } else {
        false
    }
}

fn match_skip_count(state: &mut ParseState, n: i64) -> Result<bool, RlError> {
    if n < 0 {
        return Err(RlError::parse_invalid_rule().with_arg(0, "negative skip count"));
    }
    let n = n as usize;
    if state.pos + n > state.limit {
        return Ok(false);
    }
    state.pos += n;
    Ok(true)
}

fn match_string_literal(state: &mut ParseState, literal: &[char]) -> Result<bool, RlError> {
    match &state.input {
        Input::Str(chars) => {
            if state.pos + literal.len() > state.limit {
                return Ok(false);
            }
            let window = &chars[state.pos..state.pos + literal.len()];
            let matches = if state.options.case_sensitive {
                window == literal
            } else {
                window.iter().map(|c| c.to_ascii_lowercase()).eq(literal.iter().map(|c| c.to_ascii_lowercase()))
            };
            if matches {
                state.pos += literal.len();
            }
            Ok(matches)
        }
        Input::Block(items) => {
            if state.pos >= state.limit {
                return Ok(false);
            }
            let text: String = literal.iter().collect();
            let current_matches = matches!(&items[state.pos], Value::String(s) if s.borrow().items().iter().collect::<String>() == text);
            if current_matches {
                state.pos += 1;
            }
            Ok(current_matches)
        }
    }
}

fn match_datatype_word(state: &mut ParseState, word: &str) -> Result<bool, RlError> {
    match &state.input {
        Input::Block(items) => {
            if state.pos >= state.limit {
                return Ok(false);
            }
            let matches = items[state.pos].datatype_word() == word;
            if matches {
                state.pos += 1;
            }
            Ok(matches)
        }
        Input::Str(_) => Err(RlError::parse_invalid_rule().with_arg(0, format!("datatype rule {word} needs a block cursor"))),
    }
}

fn match_bitset(state: &mut ParseState, set: &Bitset) -> Result<bool, RlError> {
    match &state.input {
        Input::Str(chars) => {
            if state.pos >= state.limit {
                return Ok(false);
            }
            let matches = set.contains(chars[state.pos]);
            if matches {
                state.pos += 1;
            }
            Ok(matches)
        }
        Input::Block(_) => Err(RlError::parse_invalid_rule().with_arg(0, "bitset rule needs a string cursor")),
    }
}

/// Used by the `parse` native (`FunctionBody::Native` dispatch lives in
/// `natives::parse_native`); kept here only so callers don't need to know
/// that a function body matters to this module at all — it never does.
pub fn describe_function_kind(body: &FunctionBody) -> &'static str {
    match body {
        FunctionBody::Block(_) => "user",
        FunctionBody::Native(_) => "native",
    }
}
