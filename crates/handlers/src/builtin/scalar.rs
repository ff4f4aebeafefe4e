use verba_core::{ArgumentParseError, MatchSet, ParameterDescriptor, Value};

use crate::handler::{check_length, check_matches, ArgumentHandler, HandlerLookup};

/// Strings, with length and match constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringHandler;

impl ArgumentHandler for StringHandler {
    fn parse(
        &self,
        _lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        check_length(param, literal, literal.chars().count(), "characters")?;
        check_matches(param, literal)?;
        Ok(Value::String(literal.to_string()))
    }

    fn syntax(&self, _lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
        match &param.constraints().matches {
            Some(set @ MatchSet::Equals { .. }) => set.describe(),
            _ => "string".to_string(),
        }
    }
}

/// Booleans: `true`/`false`, `yes`/`no`, `on`/`off`, any case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolHandler;

impl ArgumentHandler for BoolHandler {
    fn parse(
        &self,
        _lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        check_matches(param, literal)?;
        match literal.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(ArgumentParseError::new(
                param.label(),
                literal,
                "expected true or false",
            )),
        }
    }

    fn syntax(&self, _lookup: &dyn HandlerLookup, _param: &ParameterDescriptor) -> String {
        "true|false".to_string()
    }
}

/// A single character.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharHandler;

impl ArgumentHandler for CharHandler {
    fn parse(
        &self,
        _lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let mut chars = literal.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                check_matches(param, literal)?;
                Ok(Value::Char(c))
            }
            _ => Err(ArgumentParseError::new(
                param.label(),
                literal,
                "expected a single character",
            )),
        }
    }

    fn syntax(&self, _lookup: &dyn HandlerLookup, _param: &ParameterDescriptor) -> String {
        "char".to_string()
    }
}
