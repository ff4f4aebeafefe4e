//! Tokenizer behaviour seen through the facade

use proptest::prelude::*;

use crate::common::*;
use verba::{tokenize, CommandDispatcher, ParameterDescriptor, ResultCode, Token, TokenizationError, ValueType};

fn texts(input: &str) -> Vec<String> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(Token::into_string)
        .collect()
}

#[test]
fn quotes_and_brackets_group_tokens() {
    assert_eq!(
        texts(r#"run strings [foo, "Hello World!", baz]"#),
        vec!["run", "strings", r#"[foo, "Hello World!", baz]"#]
    );
    assert_eq!(
        texts(r#"say "two words" [[1, 2], [3]]"#),
        vec!["say", "two words", "[[1, 2], [3]]"]
    );
}

#[test]
fn unbalanced_input_is_rejected() {
    assert_eq!(
        tokenize("run [1, [2]").unwrap_err(),
        TokenizationError::UnclosedBrackets { missing: 1 }
    );
    assert_eq!(
        tokenize("run 1]").unwrap_err(),
        TokenizationError::UnmatchedBrackets { extra: 1 }
    );
    assert_eq!(
        tokenize(r#"say "open"#).unwrap_err(),
        TokenizationError::UnterminatedQuote
    );
}

#[test]
fn unbalanced_input_never_runs_the_body() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "say",
        printing().param(ParameterDescriptor::new("s", ValueType::String)),
    ));

    assert_eq!(h.run(r#"say "open"#), ResultCode::Invalid);
    assert!(h.out.is_empty());
    assert_eq!(h.err.lines(), vec!["unterminated quoted string"]);
}

#[test]
fn quoted_argument_keeps_spaces() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "say",
        printing().param(ParameterDescriptor::new("s", ValueType::String)),
    ));

    assert_eq!(h.run(r#"say "hello   world""#), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["hello   world"]);
}

proptest! {
    #[test]
    fn rejoined_tokens_round_trip(
        words in prop::collection::vec("[A-Za-z0-9_:/.=-]{1,10}", 1..10),
    ) {
        let joined = words.join(" ");
        let tokens = texts(&joined);
        prop_assert_eq!(&tokens, &words);
        prop_assert_eq!(tokens.join(" "), joined);
    }
}
