//! Argument reification
//!
//! Turns the tokens left after path matching into one [`Argument`] per
//! declared parameter.
//!
//! ## Parameter handling
//!
//! | Parameter | Tokens consumed | Value |
//! |-----------|-----------------|-------|
//! | implicit | none | supplier for the full signature |
//! | auto flag | `-alias` anywhere in the remainder | present/absent literal, `true`/`false` for bools |
//! | user flag | `-alias operand` anywhere in the remainder | operand, or the absent literal |
//! | required | next token | parsed token |
//! | optional | next token, if any | parsed token, or absent |
//!
//! Tokens left over once every parameter is bound fail the whole
//! reification.

use std::collections::VecDeque;

use tracing::trace;
use verba_core::{
    Argument, ArgumentCountError, Arguments, Error, ExecutableDescriptor, FlagKind, FlagSpec,
    ParameterDescriptor, ReificationError, Result, Token, ValueType,
};
use verba_handlers::{parse_value, HandlerLookup, ImplicitProvider};

/// A flag consumed earlier in the same invocation.
struct Consumed<'a> {
    spec: &'a FlagSpec,
    alias: String,
}

/// Binds tokens to an executable's parameters.
#[derive(Clone, Copy)]
pub struct Reifier<'a> {
    handlers: &'a dyn HandlerLookup,
    implicits: &'a dyn ImplicitProvider,
}

impl<'a> Reifier<'a> {
    /// Create a reifier over a handler lookup and an implicit provider.
    pub fn new(handlers: &'a dyn HandlerLookup, implicits: &'a dyn ImplicitProvider) -> Self {
        Reifier {
            handlers,
            implicits,
        }
    }

    /// The handler lookup in use.
    pub fn handlers(&self) -> &'a dyn HandlerLookup {
        self.handlers
    }

    /// Reify `tokens` against `executable`.
    pub fn reify(
        &self,
        executable: &ExecutableDescriptor,
        tokens: VecDeque<Token>,
    ) -> Result<Arguments> {
        let mut tokens = tokens;
        let mut consumed: Vec<Consumed<'_>> = Vec::new();
        let mut slots = Vec::with_capacity(executable.params().len());

        for param in executable.params() {
            let slot = if param.is_implicit() {
                self.implicit(param)?
            } else if let Some(flag) = param.flag_spec() {
                self.flag(param, flag, &mut tokens, &mut consumed)?
            } else {
                self.positional(param, &mut tokens)?
            };
            slots.push(slot);
        }

        if !tokens.is_empty() {
            let tokens: Vec<String> = tokens.into_iter().map(Token::into_string).collect();
            trace!(target: "verba::reify", leftover = ?tokens, "Unconsumed tokens");
            return Err(ReificationError::UnexpectedArguments { tokens }.into());
        }
        Ok(Arguments::new(slots))
    }

    fn implicit(&self, param: &ParameterDescriptor) -> Result<Argument> {
        let supplier = self.implicits.find(param.signature()).ok_or_else(|| {
            ReificationError::MissingImplicit {
                signature: param.signature().to_string(),
            }
        })?;
        Ok(Argument::Present(supplier()))
    }

    fn flag<'p>(
        &self,
        param: &ParameterDescriptor,
        flag: &'p FlagSpec,
        tokens: &mut VecDeque<Token>,
        consumed: &mut Vec<Consumed<'p>>,
    ) -> Result<Argument> {
        let found = match flag.kind() {
            FlagKind::Auto => take_auto(flag, tokens),
            FlagKind::User => take_user(flag, tokens),
        };

        let literal = match found {
            Some((alias, operand)) => {
                check_exclusion(flag, &alias, consumed)?;
                consumed.push(Consumed {
                    spec: flag,
                    alias,
                });
                match operand {
                    Some(operand) => operand.into_string(),
                    None => auto_literal(param, flag, true),
                }
            }
            None => match flag.kind() {
                FlagKind::Auto => auto_literal(param, flag, false),
                FlagKind::User => flag.absent_literal().to_string(),
            },
        };

        if literal.is_empty() {
            return Ok(Argument::Absent);
        }
        self.parse(param, &literal)
    }

    fn positional(
        &self,
        param: &ParameterDescriptor,
        tokens: &mut VecDeque<Token>,
    ) -> Result<Argument> {
        match tokens.pop_front() {
            Some(token) => self.parse(param, &token),
            None if param.is_optional() => Ok(Argument::Absent),
            None => Err(ArgumentCountError::Missing { count: 1 }.into()),
        }
    }

    fn parse(&self, param: &ParameterDescriptor, literal: &str) -> Result<Argument> {
        let value = parse_value(self.handlers, param, literal)?;
        Ok(Argument::Present(value))
    }
}

/// Remove the first `-alias` token of an auto flag.
fn take_auto(flag: &FlagSpec, tokens: &mut VecDeque<Token>) -> Option<(String, Option<Token>)> {
    let index = tokens.iter().position(|t| flag.alias_of(t).is_some())?;
    let token = tokens.remove(index)?;
    let alias = flag.alias_of(&token)?.to_string();
    Some((alias, None))
}

/// Remove the first `-alias operand` pair of a user flag.
fn take_user(flag: &FlagSpec, tokens: &mut VecDeque<Token>) -> Option<(String, Option<Token>)> {
    let index = (0..tokens.len().saturating_sub(1)).find(|&i| flag.alias_of(&tokens[i]).is_some())?;
    let token = tokens.remove(index)?;
    let operand = tokens.remove(index)?;
    let alias = flag.alias_of(&token)?.to_string();
    Some((alias, Some(operand)))
}

/// Literal for an auto flag. Bool flags without an explicit literal
/// synthesize one from presence.
fn auto_literal(param: &ParameterDescriptor, flag: &FlagSpec, present: bool) -> String {
    let declared = if present {
        flag.present_literal()
    } else {
        flag.absent_literal()
    };
    if declared.is_empty() && *param.value_type() == ValueType::Bool {
        return present.to_string();
    }
    declared.to_string()
}

/// Exclusion holds in both directions: either flag may name the other.
fn check_exclusion(flag: &FlagSpec, alias: &str, consumed: &[Consumed<'_>]) -> Result<()> {
    let conflict = consumed.iter().find(|earlier| {
        flag.exclusions().iter().any(|x| earlier.spec.has_alias(x))
            || earlier.spec.exclusions().iter().any(|x| flag.has_alias(x))
    });
    match conflict {
        Some(earlier) => {
            trace!(target: "verba::reify", flag = alias, conflicting = %earlier.alias, "Exclusive flags");
            Err(Error::FlagConflict {
                flag: format!("-{}", alias),
                conflicting: format!("-{}", earlier.alias),
            })
        }
        None => Ok(()),
    }
}
