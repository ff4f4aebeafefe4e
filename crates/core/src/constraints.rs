//! Parameter constraints enforced by argument handlers
//!
//! - [`LengthBounds`]: string length, or element count of a composite
//! - [`MatchSet`]: accepted literal values, by equality or regex
//! - [`Clamp`]: numeric bounds; out-of-range input is pulled into range,
//!   never rejected
//!
//! Bounds are order-normalized on construction, so `LengthBounds::new(5, 1)`
//! behaves like `LengthBounds::new(1, 5)`.

use std::str::FromStr;

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use regex::Regex;

/// Inclusive length bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    min: usize,
    max: usize,
}

impl LengthBounds {
    /// Create bounds; the arguments may be given in either order.
    pub fn new(a: usize, b: usize) -> Self {
        LengthBounds {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Lower bound.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Check a length, describing the violated bound on failure.
    pub fn check(&self, len: usize, unit: &str) -> Result<(), String> {
        if len < self.min {
            Err(format!(
                "expected at least {} {}, found {}",
                self.min, unit, len
            ))
        } else if len > self.max {
            Err(format!("expected at most {} {}, found {}", self.max, unit, len))
        } else {
            Ok(())
        }
    }
}

/// Accepted values for a literal.
#[derive(Debug, Clone)]
pub enum MatchSet {
    /// Literal must equal one of the values
    Equals {
        /// Accepted values
        values: Vec<String>,
        /// Compare without regard to case
        ignore_case: bool,
    },
    /// Literal must fully match one of the patterns
    Patterns(Vec<Regex>),
}

impl MatchSet {
    /// Compile patterns into a match set; each must match the whole literal.
    pub fn patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|p| Regex::new(&format!("^(?:{})$", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MatchSet::Patterns(compiled))
    }

    /// Whether a literal is accepted.
    pub fn matches(&self, literal: &str) -> bool {
        match self {
            MatchSet::Equals {
                values,
                ignore_case: true,
            } => values.iter().any(|v| v.eq_ignore_ascii_case(literal)),
            MatchSet::Equals { values, .. } => values.iter().any(|v| v == literal),
            MatchSet::Patterns(patterns) => patterns.iter().any(|p| p.is_match(literal)),
        }
    }

    /// Short description used in errors and usage strings.
    pub fn describe(&self) -> String {
        match self {
            MatchSet::Equals { values, .. } => values.join("|"),
            MatchSet::Patterns(patterns) => patterns
                .iter()
                .map(|p| {
                    let s = p.as_str();
                    s.strip_prefix("^(?:")
                        .and_then(|s| s.strip_suffix(")$"))
                        .unwrap_or(s)
                        .to_string()
                })
                .collect::<Vec<_>>()
                .join("|"),
        }
    }
}

/// Numeric clamp bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum Clamp {
    /// Integer bounds
    Integer {
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },
    /// Floating point bounds
    Real {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// Arbitrary precision bounds
    Precise {
        /// Lower bound
        min: BigDecimal,
        /// Upper bound
        max: BigDecimal,
    },
}

impl Clamp {
    /// Integer bounds, in either order.
    pub fn integer(a: i64, b: i64) -> Self {
        Clamp::Integer {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Real bounds, in either order. NaN bounds are treated as unbounded.
    pub fn real(a: f64, b: f64) -> Self {
        let a = if a.is_nan() { f64::NEG_INFINITY } else { a };
        let b = if b.is_nan() { f64::INFINITY } else { b };
        Clamp::Real {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Arbitrary precision bounds, in either order.
    pub fn precise(a: BigDecimal, b: BigDecimal) -> Self {
        if a <= b {
            Clamp::Precise { min: a, max: b }
        } else {
            Clamp::Precise { min: b, max: a }
        }
    }

    /// Clamp an integer.
    pub fn apply_integer(&self, value: i128) -> i128 {
        match self {
            Clamp::Integer { min, max } => value.max(*min as i128).min(*max as i128),
            // `as` saturates, so infinite bounds become i128::MIN / i128::MAX
            Clamp::Real { min, max } => value.max(min.ceil() as i128).min(max.floor() as i128),
            Clamp::Precise { .. } => {
                let clamped = self.apply_decimal(&BigDecimal::new(BigInt::from(value), 0));
                integral_part(&clamped)
                    .to_string()
                    .parse()
                    .unwrap_or(value)
            }
        }
    }

    /// Clamp a float.
    pub fn apply_real(&self, value: f64) -> f64 {
        let (min, max) = match self {
            Clamp::Integer { min, max } => (*min as f64, *max as f64),
            Clamp::Real { min, max } => (*min, *max),
            Clamp::Precise { min, max } => (
                min.to_string().parse().unwrap_or(f64::NEG_INFINITY),
                max.to_string().parse().unwrap_or(f64::INFINITY),
            ),
        };
        value.max(min).min(max)
    }

    /// Clamp an arbitrary precision integer.
    pub fn apply_bigint(&self, value: &BigInt) -> BigInt {
        let clamped = self.apply_decimal(&BigDecimal::new(value.clone(), 0));
        integral_part(&clamped)
    }

    /// Clamp an arbitrary precision decimal.
    pub fn apply_decimal(&self, value: &BigDecimal) -> BigDecimal {
        let (min, max) = self.decimal_bounds();
        let mut out = value.clone();
        if let Some(min) = min {
            if out < min {
                out = min;
            }
        }
        if let Some(max) = max {
            if out > max {
                out = max;
            }
        }
        out
    }

    fn decimal_bounds(&self) -> (Option<BigDecimal>, Option<BigDecimal>) {
        match self {
            Clamp::Integer { min, max } => {
                (Some(BigDecimal::from(*min)), Some(BigDecimal::from(*max)))
            }
            Clamp::Real { min, max } => (real_to_decimal(*min), real_to_decimal(*max)),
            Clamp::Precise { min, max } => (Some(min.clone()), Some(max.clone())),
        }
    }
}

fn real_to_decimal(value: f64) -> Option<BigDecimal> {
    if value.is_finite() {
        BigDecimal::from_str(&value.to_string()).ok()
    } else {
        None
    }
}

fn integral_part(value: &BigDecimal) -> BigInt {
    value.with_scale(0).into_bigint_and_exponent().0
}

/// All constraints attached to one parameter.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Length or element count bounds
    pub length: Option<LengthBounds>,
    /// Accepted literal values
    pub matches: Option<MatchSet>,
    /// Numeric clamp
    pub clamp: Option<Clamp>,
}

impl Constraints {
    /// Constraints inherited by the elements of a composite.
    ///
    /// Length bounds describe the composite itself and are not inherited.
    pub fn for_elements(&self) -> Constraints {
        Constraints {
            length: None,
            matches: self.matches.clone(),
            clamp: self.clamp.clone(),
        }
    }
}
