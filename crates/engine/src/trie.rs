//! Syntax trie and dispatch
//!
//! Each edge of the trie is one path label; a node may carry any number
//! of executables. Registration builds one chain per alias combination and
//! merges it into the root, so shared prefixes share nodes.
//!
//! ## Dispatch
//!
//! ```text
//! run strings [a, b]
//!  │    │       └── remaining tokens, reified against candidates
//!  │    └── child of `run`
//!  └── root label
//! ```
//!
//! At every node reached, candidates whose `[min, max]` range holds the
//! remaining token count are trial-reified in registration order; the
//! first success wins. Otherwise dispatch descends if the next token is a
//! child label. When it can go no further it reports, in order of
//! preference: the last reification error, a count error against the
//! smallest unmatched minimum, or an unknown command.

use std::collections::VecDeque;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use verba_core::{ArgumentCountError, Arguments, Error, ExecutableDescriptor, Result, Token};
use verba_handlers::{describe, HandlerLookup};

use crate::path::CommandPath;
use crate::reify::Reifier;

/// Similarity a root label needs to be offered as a suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.8;

/// One node of the syntax trie.
#[derive(Debug, Clone, Default)]
pub struct SyntaxNode {
    label: String,
    children: Vec<SyntaxNode>,
    index: FxHashMap<String, usize>,
    executables: Vec<Arc<ExecutableDescriptor>>,
}

impl SyntaxNode {
    fn new(label: impl Into<String>) -> Self {
        SyntaxNode {
            label: label.into(),
            ..Default::default()
        }
    }

    /// A linear chain of nodes with `executable` at the end.
    fn chain(labels: &[&str], executable: Arc<ExecutableDescriptor>) -> Option<SyntaxNode> {
        let (last, prefix) = labels.split_last()?;
        let mut node = SyntaxNode::new(*last);
        node.executables.push(executable);
        for label in prefix.iter().rev() {
            let mut parent = SyntaxNode::new(*label);
            parent.push_child(node);
            node = parent;
        }
        Some(node)
    }

    fn push_child(&mut self, child: SyntaxNode) {
        self.index.insert(child.label.clone(), self.children.len());
        self.children.push(child);
    }

    /// Merge `other` into `self`: executables are unioned and children with
    /// equal labels merged recursively.
    fn merge(&mut self, other: SyntaxNode) {
        for executable in other.executables {
            if !self.executables.iter().any(|e| Arc::ptr_eq(e, &executable)) {
                self.executables.push(executable);
            }
        }
        for child in other.children {
            match self.index.get(&child.label) {
                Some(&i) => self.children[i].merge(child),
                None => self.push_child(child),
            }
        }
    }

    /// Label of the edge leading here. Empty for the root.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Child reached by `label`.
    pub fn child(&self, label: &str) -> Option<&SyntaxNode> {
        self.index.get(label).map(|&i| &self.children[i])
    }

    /// Children, in insertion order.
    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    /// Executables attached here, in registration order.
    pub fn executables(&self) -> &[Arc<ExecutableDescriptor>] {
        &self.executables
    }
}

/// A successful dispatch.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Labels matched on the way to the executable
    pub path: Vec<String>,
    /// The selected executable
    pub executable: Arc<ExecutableDescriptor>,
    /// Its reified arguments
    pub arguments: Arguments,
}

/// Command registry keyed by path.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTrie {
    root: SyntaxNode,
    commands: Vec<(CommandPath, Arc<ExecutableDescriptor>)>,
}

impl SyntaxTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an executable under every alias combination of `path`.
    pub fn register(&mut self, path: CommandPath, executable: Arc<ExecutableDescriptor>) {
        for labels in path.combinations() {
            if let Some(chain) = SyntaxNode::chain(&labels, Arc::clone(&executable)) {
                let mut wrapper = SyntaxNode::default();
                wrapper.push_child(chain);
                self.root.merge(wrapper);
            }
        }
        debug!(target: "verba::registry", path = %path, "Command registered");
        self.commands.push((path, executable));
    }

    /// The root node.
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Registered commands, in registration order.
    pub fn commands(&self) -> &[(CommandPath, Arc<ExecutableDescriptor>)] {
        &self.commands
    }

    /// Labels accepted as the first token.
    pub fn root_labels(&self) -> impl Iterator<Item = &str> {
        self.root.children.iter().map(|c| c.label.as_str())
    }

    /// Resolve tokens to an executable and its arguments.
    pub fn dispatch(&self, tokens: Vec<Token>, reifier: &Reifier<'_>) -> Result<Resolution> {
        let mut tokens: VecDeque<Token> = tokens.into();
        let Some(first) = tokens.pop_front() else {
            return Err(Error::unknown_command(""));
        };
        let Some(mut node) = self.root.child(&first) else {
            return Err(Error::UnknownCommand {
                suggestion: self.suggest(&first),
                command: first.into_string(),
            });
        };

        let mut path = vec![node.label.clone()];
        let mut last_error: Option<Error> = None;
        let mut smallest_min: Option<usize> = None;

        loop {
            let remaining = tokens.len();
            for executable in &node.executables {
                if executable.accepts(remaining) {
                    match reifier.reify(executable, tokens.clone()) {
                        Ok(arguments) => {
                            debug!(target: "verba::dispatch", path = %path.join(" "), "Command resolved");
                            return Ok(Resolution {
                                path,
                                executable: Arc::clone(executable),
                                arguments,
                            });
                        }
                        Err(err) => {
                            trace!(target: "verba::dispatch", error = %err, "Candidate rejected");
                            last_error = Some(err);
                        }
                    }
                } else {
                    let min = executable.min_arguments();
                    smallest_min = Some(smallest_min.map_or(min, |m| m.min(min)));
                }
            }

            match tokens.front().and_then(|t| node.child(t)) {
                Some(child) => {
                    tokens.pop_front();
                    path.push(child.label.clone());
                    node = child;
                }
                None => break,
            }
        }

        if let Some(err) = last_error {
            return Err(err);
        }
        let remaining = tokens.len();
        match smallest_min {
            Some(min) if remaining < min => {
                Err(ArgumentCountError::Missing { count: min - remaining }.into())
            }
            Some(_) => Err(ArgumentCountError::Extra.into()),
            None => Err(Error::unknown_command(path.join(" "))),
        }
    }

    /// Deepest node reachable by following `tokens` from the root.
    pub fn locate(&self, tokens: &[Token]) -> Option<&SyntaxNode> {
        let (first, rest) = tokens.split_first()?;
        let mut node = self.root.child(first)?;
        for token in rest {
            match node.child(token) {
                Some(child) => node = child,
                None => break,
            }
        }
        Some(node)
    }

    /// Closest root label to `token`, if similar enough.
    pub fn suggest(&self, token: &str) -> Option<String> {
        let needle = token.to_lowercase();
        let mut best: Option<(&str, f64)> = None;
        for label in self.root_labels() {
            let score = strsim::jaro_winkler(&needle, &label.to_lowercase());
            if score >= SUGGESTION_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((label, score));
            }
        }
        best.map(|(label, _)| label.to_string())
    }

    /// Usage line for every registered command.
    pub fn usages(&self, lookup: &dyn HandlerLookup) -> Vec<String> {
        self.commands
            .iter()
            .map(|(path, executable)| usage_line(lookup, path, executable))
            .collect()
    }

    /// Usage lines of the commands attached at `node`.
    pub fn usages_at(&self, node: &SyntaxNode, lookup: &dyn HandlerLookup) -> Vec<String> {
        self.commands
            .iter()
            .filter(|(_, e)| node.executables.iter().any(|n| Arc::ptr_eq(n, e)))
            .map(|(path, executable)| usage_line(lookup, path, executable))
            .collect()
    }
}

fn usage_line(
    lookup: &dyn HandlerLookup,
    path: &CommandPath,
    executable: &ExecutableDescriptor,
) -> String {
    let args = executable.usage_with(|p| describe(lookup, p));
    if args.is_empty() {
        path.to_string()
    } else {
        format!("{} {}", path, args)
    }
}
