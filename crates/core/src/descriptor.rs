//! Parameter and executable descriptors
//!
//! Descriptors are built explicitly by the host through chained setters;
//! nothing is derived from source declarations.
//!
//! ## Parameter kinds
//!
//! | Kind | Consumes | Counted in min | Counted in max |
//! |------|----------|----------------|----------------|
//! | implicit | nothing, value is injected | no | no |
//! | auto flag | `-alias` if present | no | 1 |
//! | user flag | `-alias operand` if present | no | 2 |
//! | required positional | one token | 1 | 1 |
//! | optional positional | one token if any remain | no | 1 |
//!
//! ## Invariants
//!
//! Checked by [`ExecutableBuilder::build`]:
//! - flags precede the first positional parameter (implicit ones excepted)
//! - required positionals precede optional positionals
//! - a flag alias is declared at most once per executable
//! - every flag has at least one alias, and no flag is implicit

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::constraints::{Clamp, Constraints, LengthBounds, MatchSet};
use crate::error::DescriptorError;
use crate::invocation::CommandBody;
use crate::types::{TypeSignature, ValueType};

// =============================================================================
// Flags
// =============================================================================

/// How a flag consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Presence-only: `-verbose`
    Auto,
    /// Takes the following token as operand: `-level 3`
    User,
}

/// Flag definition attached to a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    kind: FlagKind,
    aliases: Vec<String>,
    default_if_present: String,
    default_if_absent: String,
    exclusive_with: Vec<String>,
}

impl FlagSpec {
    fn new<I, S>(kind: FlagKind, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FlagSpec {
            kind,
            aliases: aliases.into_iter().map(Into::into).collect(),
            default_if_present: String::new(),
            default_if_absent: String::new(),
            exclusive_with: Vec::new(),
        }
    }

    /// A presence-only flag.
    pub fn auto<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FlagKind::Auto, aliases)
    }

    /// An operand-taking flag.
    pub fn user<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(FlagKind::User, aliases)
    }

    /// Literal parsed when an auto flag is present.
    pub fn default_if_present(mut self, literal: impl Into<String>) -> Self {
        self.default_if_present = literal.into();
        self
    }

    /// Literal parsed when the flag is absent.
    pub fn default_if_absent(mut self, literal: impl Into<String>) -> Self {
        self.default_if_absent = literal.into();
        self
    }

    /// Aliases of other flags that may not appear together with this one.
    pub fn exclusive_with<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusive_with = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Flag kind.
    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    /// Declared aliases, without the leading dash.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Literal used when an auto flag is present. Empty when unset.
    pub fn present_literal(&self) -> &str {
        &self.default_if_present
    }

    /// Literal used when the flag is absent. Empty when unset.
    pub fn absent_literal(&self) -> &str {
        &self.default_if_absent
    }

    /// Aliases this flag excludes.
    pub fn exclusions(&self) -> &[String] {
        &self.exclusive_with
    }

    /// Whether `alias` names this flag.
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// The alias a token spells, if it is `-alias` for one of ours.
    pub fn alias_of<'a>(&'a self, token: &str) -> Option<&'a str> {
        let name = token.strip_prefix('-')?;
        self.aliases
            .iter()
            .find(|a| a.as_str() == name)
            .map(String::as_str)
    }
}

// =============================================================================
// Parameters
// =============================================================================

/// One declared parameter of an executable.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    label: String,
    description: Option<String>,
    signature: TypeSignature,
    optional: bool,
    implicit: bool,
    constraints: Constraints,
    flag: Option<FlagSpec>,
}

impl ParameterDescriptor {
    /// A required positional parameter.
    pub fn new(label: impl Into<String>, signature: impl Into<TypeSignature>) -> Self {
        ParameterDescriptor {
            label: label.into(),
            description: None,
            signature: signature.into(),
            optional: false,
            implicit: false,
            constraints: Constraints::default(),
            flag: None,
        }
    }

    /// Attach a human-readable description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Mark the parameter optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the parameter implicit; its value is injected by type.
    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }

    /// Bound the string length or element count.
    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.constraints.length = Some(LengthBounds::new(min, max));
        self
    }

    /// Accept only the given literals.
    pub fn equals<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.matches = Some(MatchSet::Equals {
            values: values.into_iter().map(Into::into).collect(),
            ignore_case: false,
        });
        self
    }

    /// Accept only the given literals, ignoring case.
    pub fn equals_ignore_case<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.matches = Some(MatchSet::Equals {
            values: values.into_iter().map(Into::into).collect(),
            ignore_case: true,
        });
        self
    }

    /// Accept only literals fully matching one of the patterns.
    pub fn matching<I, S>(mut self, patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.constraints.matches = Some(MatchSet::patterns(patterns)?);
        Ok(self)
    }

    /// Clamp numeric values into bounds.
    pub fn clamp(mut self, clamp: Clamp) -> Self {
        self.constraints.clamp = Some(clamp);
        self
    }

    /// Make the parameter a flag.
    pub fn flag(mut self, spec: FlagSpec) -> Self {
        self.flag = Some(spec);
        self
    }

    /// Synthetic parameter for one element of a composite value.
    ///
    /// The element inherits matches and clamp constraints, but not the
    /// composite's length bounds.
    pub fn nested(&self, index: impl fmt::Display, signature: TypeSignature) -> Self {
        ParameterDescriptor {
            label: format!("{}[{}]", self.label, index),
            description: None,
            signature,
            optional: false,
            implicit: false,
            constraints: self.constraints.for_elements(),
            flag: None,
        }
    }

    /// The same parameter viewed as its wrapped type, as for the inner
    /// value of an `optional<T>`.
    ///
    /// Keeps the label and every constraint.
    pub fn unwrapped(&self, signature: TypeSignature) -> Self {
        ParameterDescriptor {
            label: self.label.clone(),
            description: None,
            signature,
            optional: false,
            implicit: false,
            constraints: self.constraints.clone(),
            flag: None,
        }
    }

    /// Label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Description, if any.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Full generic signature.
    pub fn signature(&self) -> &TypeSignature {
        &self.signature
    }

    /// Outer type.
    pub fn value_type(&self) -> &ValueType {
        self.signature.ty()
    }

    /// Constraint metadata.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Flag definition, if this parameter is a flag.
    pub fn flag_spec(&self) -> Option<&FlagSpec> {
        self.flag.as_ref()
    }

    /// Whether the parameter may be left absent.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the value is injected rather than parsed.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Whether this is a flag of either kind.
    pub fn is_flag(&self) -> bool {
        self.flag.is_some()
    }

    /// Whether this is an operand-taking flag.
    pub fn is_user_flag(&self) -> bool {
        self.flag.as_ref().is_some_and(|f| f.kind == FlagKind::User)
    }

    /// Whether this parameter binds a positional token.
    pub fn is_positional(&self) -> bool {
        !self.implicit && self.flag.is_none()
    }
}

// =============================================================================
// Executables
// =============================================================================

/// A registered command: parameter shape plus body.
#[derive(Clone)]
pub struct ExecutableDescriptor {
    description: Option<String>,
    params: Vec<ParameterDescriptor>,
    body: CommandBody,
    min_arguments: usize,
    max_arguments: usize,
}

impl ExecutableDescriptor {
    /// Start building an executable around a command body.
    pub fn builder<F>(body: F) -> ExecutableBuilder
    where
        F: Fn(&crate::Invocation) -> anyhow::Result<crate::ResultCode> + Send + Sync + 'static,
    {
        ExecutableBuilder {
            description: None,
            params: Vec::new(),
            body: Arc::new(body),
        }
    }

    /// Declared parameters, in order.
    pub fn params(&self) -> &[ParameterDescriptor] {
        &self.params
    }

    /// Description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The command body.
    pub fn body(&self) -> &CommandBody {
        &self.body
    }

    /// Fewest tokens a successful match can consume.
    pub fn min_arguments(&self) -> usize {
        self.min_arguments
    }

    /// Most tokens a successful match can consume.
    pub fn max_arguments(&self) -> usize {
        self.max_arguments
    }

    /// Whether `count` remaining tokens fall inside the accepted range.
    pub fn accepts(&self, count: usize) -> bool {
        (self.min_arguments..=self.max_arguments).contains(&count)
    }

    /// Render the argument part of a usage line.
    ///
    /// `syntax` describes the literal form of one parameter, typically by
    /// asking its handler.
    pub fn usage_with<F>(&self, mut syntax: F) -> String
    where
        F: FnMut(&ParameterDescriptor) -> String,
    {
        let mut parts = Vec::new();
        for param in &self.params {
            if param.is_implicit() {
                continue;
            }
            let part = match param.flag_spec() {
                Some(flag) => {
                    let aliases = flag
                        .aliases()
                        .iter()
                        .map(|a| format!("-{}", a))
                        .collect::<Vec<_>>()
                        .join("|");
                    match flag.kind() {
                        FlagKind::Auto => format!("[{}]", aliases),
                        FlagKind::User => format!("[{} <{}>]", aliases, syntax(param)),
                    }
                }
                None if param.is_optional() => {
                    format!("[<{}: {}>]", param.label(), syntax(param))
                }
                None => format!("<{}: {}>", param.label(), syntax(param)),
            };
            parts.push(part);
        }
        parts.join(" ")
    }
}

impl fmt::Debug for ExecutableDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableDescriptor")
            .field("description", &self.description)
            .field("params", &self.params)
            .field("min_arguments", &self.min_arguments)
            .field("max_arguments", &self.max_arguments)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ExecutableDescriptor`].
pub struct ExecutableBuilder {
    description: Option<String>,
    params: Vec<ParameterDescriptor>,
    body: CommandBody,
}

impl ExecutableBuilder {
    /// Append a parameter.
    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// Attach a description.
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Validate the parameter list and compute the accepted token range.
    pub fn build(self) -> Result<ExecutableDescriptor, DescriptorError> {
        validate(&self.params)?;

        let min_arguments = self
            .params
            .iter()
            .filter(|p| p.is_positional() && !p.is_optional())
            .count();
        let max_arguments = self.params.iter().filter(|p| !p.is_implicit()).count()
            + self.params.iter().filter(|p| p.is_user_flag()).count();

        Ok(ExecutableDescriptor {
            description: self.description,
            params: self.params,
            body: self.body,
            min_arguments,
            max_arguments,
        })
    }
}

fn validate(params: &[ParameterDescriptor]) -> Result<(), DescriptorError> {
    let mut seen_positional = false;
    let mut seen_optional = false;
    let mut aliases = HashSet::new();

    for param in params {
        if let Some(flag) = param.flag_spec() {
            if param.is_implicit() {
                return Err(DescriptorError::ImplicitFlag {
                    label: param.label().to_string(),
                });
            }
            if flag.aliases().is_empty() {
                return Err(DescriptorError::FlagWithoutAliases {
                    label: param.label().to_string(),
                });
            }
            if seen_positional {
                return Err(DescriptorError::FlagAfterPositional {
                    label: param.label().to_string(),
                });
            }
            for alias in flag.aliases() {
                if !aliases.insert(alias.as_str()) {
                    return Err(DescriptorError::DuplicateAlias {
                        alias: alias.clone(),
                    });
                }
            }
        } else if param.is_positional() {
            seen_positional = true;
            if param.is_optional() {
                seen_optional = true;
            } else if seen_optional {
                return Err(DescriptorError::RequiredAfterOptional {
                    label: param.label().to_string(),
                });
            }
        }
    }
    Ok(())
}
