//! Helpers for building `rl_core::value::FunctionValue`s (spec §4.3.4).
//!
//! The `Value` shape itself lives in `rl-core` (so the value model doesn't
//! depend on the evaluator); this module is the runtime-side vocabulary for
//! assembling one from a parsed parameter-spec block, the shape the `fn`
//! and `does` natives both produce.

use rl_core::value::{FunctionBody, FunctionValue, NativeId, ParamKind, ParamSpec};
use rl_core::word::WordKind;
use rl_core::{RlError, Value};

use crate::frame::FrameHandle;

/// Parses a parameter-spec block (spec §4.3.4) into `ParamSpec`s. Each
/// element is either a plain word (positional, evaluated), a lit-word
/// (positional, quoted/raw), a `--name` refinement flag, or a refinement
/// immediately followed by its value parameter. A run of datatype words
/// following a parameter restricts its `type_filter`.
pub fn parse_param_spec(spec: &[Value]) -> Result<Vec<ParamSpec>, RlError> {
    let mut params = Vec::new();
    let mut i = 0;
    while i < spec.len() {
        match &spec[i] {
            Value::Word(WordKind::Word, name) if name.starts_with("--") => {
                let refinement_name = name.trim_start_matches("--").to_string();
                i += 1;
                // spec §3.5: a refinement-value is `--name` followed by a
                // *marker block* (its contents, if any, restrict the
                // accepted datatypes; a bare word like `any` inside means
                // unrestricted). A bare `--name` with no following block is
                // a flag refinement.
                match spec.get(i) {
                    Some(Value::Block(marker)) => {
                        let type_filter = marker
                            .borrow()
                            .items()
                            .iter()
                            .filter_map(|v| match v {
                                Value::Datatype(name) => Some(name.clone()),
                                _ => None,
                            })
                            .collect();
                        params.push(ParamSpec {
                            name: refinement_name,
                            kind: ParamKind::RefinementValue { quoted: false },
                            type_filter,
                        });
                        i += 1;
                    }
                    _ => {
                        params.push(ParamSpec {
                            name: refinement_name,
                            kind: ParamKind::RefinementFlag,
                            type_filter: Vec::new(),
                        });
                    }
                }
            }
            Value::Word(WordKind::Word, name) => {
                params.push(ParamSpec::positional(name.clone(), false));
                i += 1;
                i = absorb_type_filter(spec, i, params.last_mut().unwrap());
            }
            Value::Word(WordKind::LitWord, name) => {
                params.push(ParamSpec::positional(name.clone(), true));
                i += 1;
                i = absorb_type_filter(spec, i, params.last_mut().unwrap());
            }
            other => {
                return Err(RlError::type_mismatch("word! or lit-word!", other.type_name()));
            }
        }
    }
    Ok(params)
}

fn absorb_type_filter(spec: &[Value], mut i: usize, param: &mut ParamSpec) -> usize {
    while let Some(Value::Datatype(name)) = spec.get(i) {
        param.type_filter.push(name.clone());
        i += 1;
    }
    i
}

pub fn make_user_function(name: Option<String>, params: Vec<ParamSpec>, body: Vec<Value>, closure: FrameHandle, infix: bool) -> Value {
    Value::Function(std::rc::Rc::new(FunctionValue {
        name,
        params,
        body: FunctionBody::Block(body),
        infix,
        closure: Some(closure.into()),
    }))
}

pub fn make_native(name: &str, params: Vec<ParamSpec>, native_id: NativeId, infix: bool) -> Value {
    Value::Function(std::rc::Rc::new(FunctionValue {
        name: Some(name.to_string()),
        params,
        body: FunctionBody::Native(native_id),
        infix,
        closure: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_positional_params() {
        let spec = vec![Value::word("a"), Value::word("b")];
        let params = parse_param_spec(&spec).unwrap();
        assert_eq!(params.len(), 2);
        assert!(matches!(params[0].kind, ParamKind::Positional { quoted: false }));
    }

    #[test]
    fn parses_lit_word_as_quoted_param() {
        let spec = vec![Value::lit_word("a")];
        let params = parse_param_spec(&spec).unwrap();
        assert!(matches!(params[0].kind, ParamKind::Positional { quoted: true }));
    }

    #[test]
    fn parses_refinement_flag_and_value() {
        let spec = vec![
            Value::word("a"),
            Value::word("--verbose"),
            Value::word("--with"),
            Value::block(vec![Value::word("any")]),
        ];
        let params = parse_param_spec(&spec).unwrap();
        assert_eq!(params[1].name, "verbose");
        assert!(matches!(params[1].kind, ParamKind::RefinementFlag));
        assert_eq!(params[2].name, "with");
        assert!(matches!(params[2].kind, ParamKind::RefinementValue { .. }));
    }

    #[test]
    fn refinement_value_marker_block_restricts_type_filter() {
        let spec = vec![Value::word("--title"), Value::block(vec![Value::Datatype("string".into())])];
        let params = parse_param_spec(&spec).unwrap();
        assert_eq!(params[0].type_filter, vec!["string".to_string()]);
    }

    #[test]
    fn absorbs_trailing_datatype_filter() {
        let spec = vec![Value::word("a"), Value::Datatype("integer".into())];
        let params = parse_param_spec(&spec).unwrap();
        assert_eq!(params[0].type_filter, vec!["integer".to_string()]);
    }
}
