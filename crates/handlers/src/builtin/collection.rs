//! Bracketed composite literals.
//!
//! The outer token is re-split with the tokenizer's own rules: commas
//! separate elements only outside quotes and nested brackets, and map
//! entries split on a top-level `->`. Each element is parsed as a
//! synthetic nested parameter typed by the outer signature's arguments.

use verba_core::lexer::{enclosed, split_elements, split_pair, unquote};
use verba_core::{
    ArgumentParseError, ParameterDescriptor, TokenizationError, Value, ValueType,
};

use crate::handler::{check_length, describe, parse_value, type_argument, ArgumentHandler, HandlerLookup};

fn interior<'a>(
    param: &ParameterDescriptor,
    literal: &'a str,
    example: &str,
) -> Result<&'a str, ArgumentParseError> {
    enclosed(literal).ok_or_else(|| {
        ArgumentParseError::new(
            param.label(),
            literal,
            format!("expected a bracketed literal like {}", example),
        )
    })
}

fn malformed(param: &ParameterDescriptor, literal: &str, err: TokenizationError) -> ArgumentParseError {
    ArgumentParseError::new(param.label(), literal, err.to_string())
}

fn element(
    lookup: &dyn HandlerLookup,
    nested: &ParameterDescriptor,
    outer: &ParameterDescriptor,
    literal: &str,
    raw: &str,
) -> Result<Value, ArgumentParseError> {
    let text = unquote(raw).map_err(|e| malformed(outer, literal, e))?;
    parse_value(lookup, nested, &text)
}

/// Arrays, lists and sets.
///
/// Sets keep the first occurrence of each element; the length bound is
/// checked against the deduplicated count.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceHandler;

impl ArgumentHandler for SequenceHandler {
    fn parse(
        &self,
        lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let inner = interior(param, literal, "[a, b]")?;
        let element_type = type_argument(param, literal, 0)?;
        let raws = split_elements(inner).map_err(|e| malformed(param, literal, e))?;

        let mut items = Vec::with_capacity(raws.len());
        for (index, raw) in raws.iter().enumerate() {
            let nested = param.nested(index, element_type.clone());
            items.push(element(lookup, &nested, param, literal, raw)?);
        }

        let value = match param.value_type() {
            ValueType::Array => Value::Array(items),
            ValueType::Set => Value::set_of(items),
            _ => Value::List(items),
        };
        let count = value.len().unwrap_or_default();
        check_length(param, literal, count, "elements")?;
        Ok(value)
    }

    fn syntax(&self, lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
        match param.signature().arg(0) {
            Some(element) => {
                let nested = param.nested(0, element.clone());
                format!("[{}, ...]", describe(lookup, &nested))
            }
            None => "[...]".to_string(),
        }
    }
}

/// Maps written as `[key -> value, ...]`.
///
/// A repeated key keeps its first position and takes the later value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapHandler;

impl ArgumentHandler for MapHandler {
    fn parse(
        &self,
        lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let inner = interior(param, literal, "[key -> value]")?;
        let key_type = type_argument(param, literal, 0)?;
        let value_type = type_argument(param, literal, 1)?;
        let raws = split_elements(inner).map_err(|e| malformed(param, literal, e))?;

        let mut entries = Vec::with_capacity(raws.len());
        for (index, raw) in raws.iter().enumerate() {
            let (raw_key, raw_value) = split_pair(raw)
                .map_err(|e| malformed(param, literal, e))?
                .ok_or_else(|| {
                    ArgumentParseError::new(
                        param.label(),
                        raw.as_str(),
                        "expected an entry of the form key -> value",
                    )
                })?;
            let key_param = param.nested(index, key_type.clone());
            let value_param = param.nested(index, value_type.clone());
            let key = element(lookup, &key_param, param, literal, &raw_key)?;
            let value = element(lookup, &value_param, param, literal, &raw_value)?;
            entries.push((key, value));
        }

        let map = Value::map_of(entries);
        let count = map.len().unwrap_or_default();
        check_length(param, literal, count, "entries")?;
        Ok(map)
    }

    fn syntax(&self, lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
        match (param.signature().arg(0), param.signature().arg(1)) {
            (Some(key), Some(value)) => format!(
                "[{} -> {}, ...]",
                describe(lookup, &param.nested(0, key.clone())),
                describe(lookup, &param.nested(0, value.clone()))
            ),
            _ => "[key -> value, ...]".to_string(),
        }
    }
}
