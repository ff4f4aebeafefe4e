//! Error types for command resolution.
//!
//! Every failure between raw input and a fully reified argument list is an
//! [`Error`]. None of these invoke the command body; the dispatcher reports
//! them as an `INVALID` result.
//!
//! # Categories
//!
//! | Variant | Raised by | Meaning |
//! |---------|-----------|---------|
//! | `Tokenization` | tokenizer | Unbalanced brackets or quotes |
//! | `UnknownCommand` | trie | First token names no command |
//! | `ArgumentCount` | trie | Too few / too many tokens for every candidate |
//! | `ArgumentParse` | handlers | Literal not coercible, or a constraint failed |
//! | `FlagConflict` | reifier | Mutually exclusive flags both present |
//! | `Reification` | reifier | No implicit provider, or leftover tokens |

use thiserror::Error;

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, Error>;

/// Command resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input could not be split into tokens
    #[error(transparent)]
    Tokenization(#[from] TokenizationError),

    /// The first token is not a registered command
    #[error("unknown command '{command}'{}", suggestion_hint(.suggestion))]
    UnknownCommand {
        /// The unmatched token (empty when the input had no tokens)
        command: String,
        /// Closest registered command, if one is similar enough
        suggestion: Option<String>,
    },

    /// No candidate accepts the number of supplied tokens
    #[error(transparent)]
    ArgumentCount(#[from] ArgumentCountError),

    /// A token could not be converted to its parameter's type
    #[error(transparent)]
    ArgumentParse(#[from] ArgumentParseError),

    /// Two mutually exclusive flags were supplied together
    #[error("flag '{flag}' cannot be combined with '{conflicting}'")]
    FlagConflict {
        /// The flag being processed
        flag: String,
        /// The already consumed flag it conflicts with
        conflicting: String,
    },

    /// Arguments could not be assembled for a matched executable
    #[error(transparent)]
    Reification(#[from] ReificationError),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(", did you mean '{}'?", s),
        None => String::new(),
    }
}

impl Error {
    /// Create an unknown command error without a suggestion.
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Error::UnknownCommand {
            command: command.into(),
            suggestion: None,
        }
    }

    /// Whether this error is about the number of supplied tokens.
    pub fn is_argument_count(&self) -> bool {
        matches!(self, Error::ArgumentCount(_))
    }

    /// Whether this error names an unknown command.
    pub fn is_unknown_command(&self) -> bool {
        matches!(self, Error::UnknownCommand { .. })
    }
}

/// Unbalanced input structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizationError {
    /// More opening than closing brackets
    #[error("missing {missing} closing bracket(s)")]
    UnclosedBrackets {
        /// Number of terminators missing at end of input
        missing: usize,
    },

    /// More closing than opening brackets
    #[error("{extra} unmatched closing bracket(s)")]
    UnmatchedBrackets {
        /// Number of surplus terminators
        extra: usize,
    },

    /// A double quote was never closed
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

/// Token count outside every candidate's accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentCountError {
    /// Fewer tokens than the smallest candidate requires
    #[error("missing {count} argument(s)")]
    Missing {
        /// How many more tokens were needed
        count: usize,
    },

    /// More tokens than any candidate accepts
    #[error("invalid or extra argument(s)")]
    Extra,
}

/// A literal that could not be coerced to its target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{token}' for {parameter}: {reason}")]
pub struct ArgumentParseError {
    /// Label of the (possibly nested) parameter
    pub parameter: String,
    /// The offending literal
    pub token: String,
    /// Human-readable cause
    pub reason: String,
}

impl ArgumentParseError {
    /// Create a parse error for a parameter label and literal.
    pub fn new(
        parameter: impl Into<String>,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ArgumentParseError {
            parameter: parameter.into(),
            token: token.into(),
            reason: reason.into(),
        }
    }
}

/// Failure assembling the final argument list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReificationError {
    /// An implicit parameter has no registered supplier
    #[error("no implicit value provider for {signature}")]
    MissingImplicit {
        /// Full generic signature that was looked up
        signature: String,
    },

    /// Tokens were left over after all parameters were bound
    #[error("unexpected extra argument(s): {}", .tokens.join(" "))]
    UnexpectedArguments {
        /// The unconsumed tokens, in order
        tokens: Vec<String>,
    },
}

/// An executable's parameter list violates a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A flag parameter follows a positional one
    #[error("flag parameter '{label}' must precede all positional parameters")]
    FlagAfterPositional {
        /// Offending parameter
        label: String,
    },

    /// A required positional parameter follows an optional one
    #[error("required parameter '{label}' follows an optional parameter")]
    RequiredAfterOptional {
        /// Offending parameter
        label: String,
    },

    /// The same alias is declared by two flags of one executable
    #[error("flag alias '{alias}' is declared more than once")]
    DuplicateAlias {
        /// Repeated alias
        alias: String,
    },

    /// A flag declares no aliases
    #[error("flag parameter '{label}' declares no aliases")]
    FlagWithoutAliases {
        /// Offending parameter
        label: String,
    },

    /// A parameter is both implicit and a flag
    #[error("parameter '{label}' cannot be both implicit and a flag")]
    ImplicitFlag {
        /// Offending parameter
        label: String,
    },
}

/// Command path could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path has no segments
    #[error("command path is empty")]
    Empty,

    /// A segment contains an empty alias, as in `run||r`
    #[error("empty alias in segment '{segment}'")]
    EmptyAlias {
        /// The segment as written
        segment: String,
    },
}
