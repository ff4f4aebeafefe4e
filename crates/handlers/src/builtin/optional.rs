use verba_core::{ArgumentParseError, ParameterDescriptor, Value};

use crate::handler::{describe, parse_value, type_argument, ArgumentHandler, HandlerLookup};

/// Values of type `optional<T>`.
///
/// `null` (any case) is the absent value; anything else is parsed as `T`
/// under the same label and constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalHandler;

impl ArgumentHandler for OptionalHandler {
    fn parse(
        &self,
        lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        if literal.eq_ignore_ascii_case("null") {
            return Ok(Value::Optional(None));
        }
        let inner = param.unwrapped(type_argument(param, literal, 0)?.clone());
        let value = parse_value(lookup, &inner, literal)?;
        Ok(Value::Optional(Some(Box::new(value))))
    }

    fn syntax(&self, lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
        match param.signature().arg(0) {
            Some(inner) => format!("{}|null", describe(lookup, &param.unwrapped(inner.clone()))),
            None => "null".to_string(),
        }
    }
}
