//! Bracket- and quote-aware splitting of command input.
//!
//! One scanner drives every split in the system:
//! - [`tokenize`] splits a whole command line into [`Token`]s on whitespace
//! - [`split_elements`] splits the interior of a composite literal on commas
//! - [`split_pair`] splits one map entry on `->`
//! - [`unquote`] resolves the quoting of a single element
//!
//! ## Quoting and nesting rules
//!
//! | Input | Behavior |
//! |-------|----------|
//! | `"a b"` | Quoted: whitespace, commas and brackets are literal |
//! | `\"` | Literal quote character, never toggles quoting |
//! | `[` `{` | Increase bracket depth |
//! | `]` `}` | Decrease bracket depth |
//!
//! While the bracket depth is positive, separators are ignored and every
//! character (quotes and escapes included) is copied verbatim, so the
//! handler that owns the nested literal can split it again with the same
//! rules.

use std::fmt;
use std::ops::Deref;

use crate::error::TokenizationError;

/// A raw, untyped piece of user input.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(String);

impl Token {
    /// Create a token from any string.
    pub fn new(text: impl Into<String>) -> Self {
        Token(text.into())
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Token(s.to_string())
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Token(s)
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Scanner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Whitespace,
    Comma,
    Arrow,
    None,
}

impl Separator {
    /// Width in chars of the separator starting at `i`, if any.
    fn width_at(self, chars: &[char], i: usize) -> Option<usize> {
        match self {
            Separator::Whitespace => chars[i].is_whitespace().then_some(1),
            Separator::Comma => (chars[i] == ',').then_some(1),
            Separator::Arrow => {
                (chars[i] == '-' && chars.get(i + 1) == Some(&'>')).then_some(2)
            }
            Separator::None => None,
        }
    }
}

#[derive(Debug)]
struct Segment {
    text: String,
}

#[derive(Default)]
struct Buffer {
    text: String,
    /// Byte length that trailing-whitespace trimming may not cut into.
    floor: usize,
}

impl Buffer {
    fn push(&mut self, c: char) {
        self.text.push(c);
        self.floor = self.text.len();
    }

    fn push_soft_whitespace(&mut self, c: char) {
        if !self.text.is_empty() {
            self.text.push(c);
        }
    }

    fn take(&mut self) -> Segment {
        let keep = self.text.trim_end().len().max(self.floor);
        self.text.truncate(keep);
        let segment = Segment {
            text: std::mem::take(&mut self.text),
        };
        self.floor = 0;
        segment
    }
}

fn scan(
    input: &str,
    separator: Separator,
    strip_quotes: bool,
) -> Result<Vec<Segment>, TokenizationError> {
    let chars: Vec<char> = input.chars().collect();
    let mut segments = Vec::new();
    let mut buf = Buffer::default();
    let mut in_quotes = false;
    let mut depth: isize = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let nested = depth > 0;
        let resolve_quotes = strip_quotes && !nested;

        if c == '\\' && chars.get(i + 1) == Some(&'"') {
            if resolve_quotes {
                buf.push('"');
            } else {
                buf.push('\\');
                buf.push('"');
            }
            i += 2;
            continue;
        }

        if c == '"' {
            in_quotes = !in_quotes;
            if resolve_quotes {
                buf.floor = buf.text.len();
            } else {
                buf.push('"');
            }
        } else if in_quotes {
            buf.push(c);
        } else if c == '[' || c == '{' {
            depth += 1;
            buf.push(c);
        } else if c == ']' || c == '}' {
            depth -= 1;
            buf.push(c);
        } else if let Some(width) = (!nested)
            .then(|| separator.width_at(&chars, i))
            .flatten()
        {
            let segment = buf.take();
            if separator != Separator::Whitespace || !segment.text.is_empty() {
                segments.push(segment);
            }
            i += width;
            continue;
        } else if c.is_whitespace() && !nested {
            buf.push_soft_whitespace(c);
        } else {
            buf.push(c);
        }
        i += 1;
    }

    if in_quotes {
        return Err(TokenizationError::UnterminatedQuote);
    }
    if depth > 0 {
        return Err(TokenizationError::UnclosedBrackets {
            missing: depth as usize,
        });
    }
    if depth < 0 {
        return Err(TokenizationError::UnmatchedBrackets {
            extra: depth.unsigned_abs(),
        });
    }

    let last = buf.take();
    if separator != Separator::Whitespace || !last.text.is_empty() {
        segments.push(last);
    }
    Ok(segments)
}

// =============================================================================
// Public entry points
// =============================================================================

/// Split a command line into tokens.
///
/// Quotes are resolved at the top level; bracketed literals come back as a
/// single token with their interior untouched. Empty tokens are dropped.
///
/// # Errors
///
/// Fails when brackets are unbalanced or a quote is left open.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizationError> {
    Ok(scan(input, Separator::Whitespace, true)?
        .into_iter()
        .filter(|s| !s.text.is_empty())
        .map(|s| Token(s.text))
        .collect())
}

/// Return the interior of a literal wrapped in one matching bracket pair.
///
/// `[a, b]` yields `a, b`; `[a][b]` and `a` yield `None`.
pub fn enclosed(literal: &str) -> Option<&str> {
    let trimmed = literal.trim();
    let open = trimmed.chars().next()?;
    let close = match open {
        '[' => ']',
        '{' => '}',
        _ => return None,
    };
    if trimmed.len() < 2 || !trimmed.ends_with(close) {
        return None;
    }

    // The opening bracket must stay open until the final character.
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let last = trimmed.len() - close.len_utf8();
    for (pos, c) in trimmed.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '[' | '{' if !in_quotes => depth += 1,
            ']' | '}' if !in_quotes => {
                depth = depth.saturating_sub(1);
                if depth == 0 && pos != last {
                    return None;
                }
            }
            _ => {}
        }
    }
    (depth == 0 && !in_quotes).then(|| &trimmed[open.len_utf8()..last])
}

/// Split the interior of a composite literal on top-level commas.
///
/// Elements are returned raw (quotes intact) with surrounding whitespace
/// removed. An interior holding only whitespace has no elements.
pub fn split_elements(interior: &str) -> Result<Vec<String>, TokenizationError> {
    let segments = scan(interior, Separator::Comma, false)?;
    if segments.len() == 1 && segments[0].text.is_empty() {
        return Ok(Vec::new());
    }
    Ok(segments.into_iter().map(|s| s.text).collect())
}

/// Split one raw map entry on its top-level `->`.
///
/// Returns `None` unless exactly one arrow appears outside quotes and
/// brackets.
pub fn split_pair(entry: &str) -> Result<Option<(String, String)>, TokenizationError> {
    let mut segments = scan(entry, Separator::Arrow, false)?;
    if segments.len() != 2 {
        return Ok(None);
    }
    let value = segments.pop().map(|s| s.text).unwrap_or_default();
    let key = segments.pop().map(|s| s.text).unwrap_or_default();
    Ok(Some((key, value)))
}

/// Resolve top-level quotes and escapes of a single raw element.
pub fn unquote(raw: &str) -> Result<String, TokenizationError> {
    Ok(scan(raw, Separator::None, true)?
        .into_iter()
        .next()
        .map(|s| s.text)
        .unwrap_or_default())
}
