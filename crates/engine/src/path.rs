//! Command paths
//!
//! A path is a sequence of segments; each segment is a set of aliases
//! written `return|ret`. Registering a path attaches the executable under
//! every combination of aliases.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;
use verba_core::PathError;

/// Aliases accepted at one position of a path.
pub type AliasSet = SmallVec<[String; 2]>;

/// A parsed command path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPath {
    segments: Vec<AliasSet>,
}

impl CommandPath {
    /// Parse a whitespace-separated path such as `"run strings|str"`.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        Self::from_segments(text.split_whitespace())
    }

    /// Build a path from segments, each possibly holding `|`-separated
    /// aliases.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for segment in segments {
            let segment = segment.as_ref().trim();
            let mut aliases = AliasSet::new();
            for alias in segment.split('|') {
                let alias = alias.trim();
                if alias.is_empty() {
                    return Err(PathError::EmptyAlias {
                        segment: segment.to_string(),
                    });
                }
                if !aliases.iter().any(|a| a == alias) {
                    aliases.push(alias.to_string());
                }
            }
            parsed.push(aliases);
        }
        if parsed.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(CommandPath { segments: parsed })
    }

    /// Alias sets, in order.
    pub fn segments(&self) -> &[AliasSet] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a parsed path has at least one segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Every concrete label sequence this path spells, first aliases first.
    pub fn combinations(&self) -> Vec<Vec<&str>> {
        let mut out: Vec<Vec<&str>> = vec![Vec::with_capacity(self.segments.len())];
        for aliases in &self.segments {
            out = out
                .into_iter()
                .flat_map(|prefix| {
                    aliases.iter().map(move |alias| {
                        let mut next = prefix.clone();
                        next.push(alias.as_str());
                        next
                    })
                })
                .collect();
        }
        out
    }
}

impl FromStr for CommandPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, aliases) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&aliases.join("|"))?;
        }
        Ok(())
    }
}
