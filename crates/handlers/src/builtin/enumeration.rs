use verba_core::{ArgumentParseError, ParameterDescriptor, Value, ValueType};

use crate::handler::{check_matches, ArgumentHandler, HandlerLookup};

/// Declared enums, registered once at `enum`.
///
/// An exact variant name wins over a case-insensitive match.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumHandler;

impl ArgumentHandler for EnumHandler {
    fn parse(
        &self,
        _lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let ValueType::Enum(declared) = param.value_type() else {
            return Err(ArgumentParseError::new(
                param.label(),
                literal,
                "parameter is not a declared enum",
            ));
        };
        check_matches(param, literal)?;

        let variants = declared.variants();
        let found = variants
            .iter()
            .find(|v| v.as_str() == literal)
            .or_else(|| variants.iter().find(|v| v.eq_ignore_ascii_case(literal)));

        match found {
            Some(variant) => Ok(Value::Enum {
                type_name: declared.name().to_string(),
                variant: variant.clone(),
            }),
            None => Err(ArgumentParseError::new(
                param.label(),
                literal,
                format!("expected one of {}", variants.join("|")),
            )),
        }
    }

    fn syntax(&self, _lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
        match param.value_type() {
            ValueType::Enum(declared) => declared.variants().join("|"),
            other => other.to_string(),
        }
    }
}
