//! Numeric literals.
//!
//! Integers accept decimal, hex (`0x1f`, `#1f`) and octal (`017`) forms
//! with an optional sign. A declared clamp pulls the parsed value into
//! range before it is narrowed to the target width, so only unclamped
//! out-of-range literals are rejected.
//!
//! Reals read integer-shaped literals with the same radix rules, so `010`
//! is 8.0 and `0x10` is 16.0. Anything else goes through `f64` parsing;
//! `NaN` and infinities are rejected.

use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use verba_core::{ArgumentParseError, ParameterDescriptor, Value, ValueType};

use crate::handler::{check_matches, ArgumentHandler, HandlerLookup};

/// Every numeric type, registered once at `number`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberHandler;

struct Integer<'a> {
    negative: bool,
    digits: &'a str,
    radix: u32,
}

fn split_radix(literal: &str) -> Integer<'_> {
    let (negative, rest) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };
    let (digits, radix) = if let Some(hex) = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .or_else(|| rest.strip_prefix('#'))
    {
        (hex, 16)
    } else if rest.len() > 1 && rest.starts_with('0') && rest.bytes().all(|b| b.is_ascii_digit()) {
        (&rest[1..], 8)
    } else {
        (rest, 10)
    };
    Integer {
        negative,
        digits,
        radix,
    }
}

fn well_formed(int: &Integer<'_>) -> bool {
    !int.digits.is_empty() && int.digits.chars().all(|c| c.is_digit(int.radix))
}

fn parse_i128(literal: &str) -> Option<Result<i128, &'static str>> {
    let int = split_radix(literal);
    if !well_formed(&int) {
        return None;
    }
    let magnitude = match i128::from_str_radix(int.digits, int.radix) {
        Ok(v) => v,
        Err(_) => return Some(Err("integer literal is too large")),
    };
    Some(Ok(if int.negative { -magnitude } else { magnitude }))
}

fn parse_bigint(literal: &str) -> Option<BigInt> {
    let int = split_radix(literal);
    if !well_formed(&int) {
        return None;
    }
    let magnitude = BigInt::parse_bytes(int.digits.as_bytes(), int.radix)?;
    Some(if int.negative { -magnitude } else { magnitude })
}

fn narrow(ty: &ValueType, value: i128) -> Option<Value> {
    match ty {
        ValueType::Byte => i8::try_from(value).ok().map(Value::Byte),
        ValueType::Short => i16::try_from(value).ok().map(Value::Short),
        ValueType::Int => i32::try_from(value).ok().map(Value::Int),
        _ => i64::try_from(value).ok().map(Value::Long),
    }
}

impl NumberHandler {
    fn integer(
        &self,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let fail = |reason: &str| ArgumentParseError::new(param.label(), literal, reason);
        let ty = param.value_type();
        let clamp = param.constraints().clamp.as_ref();
        let value = match (parse_i128(literal), clamp) {
            (Some(Ok(v)), Some(clamp)) => clamp.apply_integer(v),
            (Some(Ok(v)), None) => v,
            // wider than i128: clamp in arbitrary precision, then narrow
            (Some(Err(reason)), Some(clamp)) => parse_bigint(literal)
                .map(|big| clamp.apply_bigint(&big))
                .and_then(|big| big.to_string().parse::<i128>().ok())
                .ok_or_else(|| fail(reason))?,
            (Some(Err(reason)), None) => return Err(fail(reason)),
            (None, _) => return Err(fail("expected an integer")),
        };
        narrow(ty, value).ok_or_else(|| fail(&format!("out of range for {}", ty)))
    }

    fn real(&self, param: &ParameterDescriptor, literal: &str) -> Result<Value, ArgumentParseError> {
        let parsed = match parse_bigint(literal) {
            Some(int) => int.to_string().parse::<f64>().ok(),
            None => literal.parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
        .ok_or_else(|| ArgumentParseError::new(param.label(), literal, "expected a number"))?;
        let value = match &param.constraints().clamp {
            Some(clamp) => clamp.apply_real(parsed),
            None => parsed,
        };
        if *param.value_type() == ValueType::Float {
            let narrowed = value as f32;
            if !narrowed.is_finite() {
                return Err(ArgumentParseError::new(
                    param.label(),
                    literal,
                    "out of range for float",
                ));
            }
            Ok(Value::Float(narrowed))
        } else {
            Ok(Value::Double(value))
        }
    }

    fn big_integer(
        &self,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let value = parse_bigint(literal).ok_or_else(|| {
            ArgumentParseError::new(param.label(), literal, "expected an integer")
        })?;
        Ok(Value::BigInteger(match &param.constraints().clamp {
            Some(clamp) => clamp.apply_bigint(&value),
            None => value,
        }))
    }

    fn big_decimal(
        &self,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        let value = BigDecimal::from_str(literal)
            .ok()
            .or_else(|| parse_bigint(literal).map(|i| BigDecimal::new(i, 0)))
            .ok_or_else(|| ArgumentParseError::new(param.label(), literal, "expected a number"))?;
        Ok(Value::BigDecimal(match &param.constraints().clamp {
            Some(clamp) => clamp.apply_decimal(&value),
            None => value,
        }))
    }

    /// A parameter typed as plain `number`: the narrowest of long,
    /// biginteger and double that holds the literal.
    fn any_number(
        &self,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        if let Some(Ok(value)) = parse_i128(literal) {
            let value = match &param.constraints().clamp {
                Some(clamp) => clamp.apply_integer(value),
                None => value,
            };
            if let Ok(long) = i64::try_from(value) {
                return Ok(Value::Long(long));
            }
        }
        if parse_bigint(literal).is_some() {
            return self.big_integer(param, literal);
        }
        self.real(param, literal)
    }
}

impl ArgumentHandler for NumberHandler {
    fn parse(
        &self,
        _lookup: &dyn HandlerLookup,
        param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        check_matches(param, literal)?;
        match param.value_type() {
            ValueType::Byte | ValueType::Short | ValueType::Int | ValueType::Long => {
                self.integer(param, literal)
            }
            ValueType::Float | ValueType::Double => self.real(param, literal),
            ValueType::BigInteger => self.big_integer(param, literal),
            ValueType::BigDecimal => self.big_decimal(param, literal),
            _ => self.any_number(param, literal),
        }
    }

    fn syntax(&self, _lookup: &dyn HandlerLookup, param: &ParameterDescriptor) -> String {
        param.value_type().to_string()
    }
}
