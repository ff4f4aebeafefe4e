//! Trie resolution: paths, aliases, defaults and count errors

use crate::common::*;
use verba::{
    ArgumentCountError, CommandDispatcher, Error, ExecutableDescriptor, ParameterDescriptor,
    ReificationError, ResultCode, TypeSignature, ValueType,
};

fn defaults_command() -> ExecutableDescriptor {
    ExecutableDescriptor::builder(|inv| {
        let first = inv.get::<String>(0)?;
        let second = inv
            .optional::<String>(1)?
            .unwrap_or_else(|| "DEFAULT".to_string());
        let third = inv.optional::<i32>(2)?.unwrap_or(0);
        inv.out()
            .write_line(&format!("{} {} {}", first, second, third));
        Ok(ResultCode::Success)
    })
    .param(ParameterDescriptor::new("first", ValueType::String))
    .param(ParameterDescriptor::new("second", ValueType::String).optional())
    .param(ParameterDescriptor::new("third", ValueType::Int).optional())
    .build()
    .unwrap()
}

#[test]
fn shared_prefix_merges_into_one_node() {
    let h = Harness::build(
        CommandDispatcher::builder()
            .define("run strings", printing())
            .define("run ints", printing()),
    );

    let root = h.dispatcher.trie().root();
    assert_eq!(root.children().len(), 1);
    let run = root.child("run").unwrap();
    assert_eq!(run.children().len(), 2);
    assert!(run.child("strings").is_some());
    assert!(run.child("ints").is_some());
}

#[test]
fn optional_parameters_fall_back_to_defaults() {
    let h = Harness::build(CommandDispatcher::builder().command("execute", defaults_command()));

    assert_eq!(h.run("execute first"), ResultCode::Success);
    assert_eq!(h.run("execute first second 100"), ResultCode::Success);
    assert_eq!(h.run("execute first second"), ResultCode::Success);
    assert_eq!(
        h.out.lines(),
        vec!["first DEFAULT 0", "first second 100", "first second 0"]
    );
    assert!(h.err.is_empty());
}

#[test]
fn every_alias_combination_resolves() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "return|ret value|val",
        printing().param(ParameterDescriptor::new("n", TypeSignature::int())),
    ));

    for input in ["return value 1", "ret value 2", "return val 3", "ret val 4"] {
        assert_eq!(h.run(input), ResultCode::Success, "{}", input);
    }
    assert_eq!(h.out.lines(), vec!["1", "2", "3", "4"]);
}

#[test]
fn deeper_path_wins_when_shallow_candidate_rejects() {
    let h = Harness::build(
        CommandDispatcher::builder()
            .define(
                "show",
                ExecutableDescriptor::builder(|inv| {
                    inv.out().write_line(&format!("show {}", inv.get::<i32>(0)?));
                    Ok(ResultCode::Success)
                })
                .param(ParameterDescriptor::new("n", ValueType::Int)),
            )
            .define(
                "show all",
                ExecutableDescriptor::builder(|inv| {
                    inv.out().write_line("show all");
                    Ok(ResultCode::Success)
                }),
            ),
    );

    assert_eq!(h.run("show 5"), ResultCode::Success);
    assert_eq!(h.run("show all"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["show 5", "show all"]);
}

#[test]
fn unknown_command_is_invalid() {
    let h = Harness::build(CommandDispatcher::builder().define("status", printing()));

    let err = h.dispatcher.resolve("stat").unwrap_err();
    assert!(err.is_unknown_command());
    assert_eq!(h.run("launch"), ResultCode::Invalid);
    assert_eq!(h.err.lines(), vec!["unknown command 'launch'"]);
    assert!(h.out.is_empty());
}

#[test]
fn empty_input_is_unknown_command() {
    let h = Harness::build(CommandDispatcher::builder().define("status", printing()));
    assert_eq!(
        h.dispatcher.resolve("   ").unwrap_err(),
        Error::unknown_command("")
    );
}

#[test]
fn too_few_and_too_many_tokens() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "pair",
        printing()
            .param(ParameterDescriptor::new("a", ValueType::Int))
            .param(ParameterDescriptor::new("b", ValueType::Int)),
    ));

    assert_eq!(
        h.dispatcher.resolve("pair 1").unwrap_err(),
        Error::ArgumentCount(ArgumentCountError::Missing { count: 1 })
    );
    assert_eq!(
        h.dispatcher.resolve("pair 1 2 3").unwrap_err(),
        Error::ArgumentCount(ArgumentCountError::Extra)
    );

    assert_eq!(h.run("pair 1"), ResultCode::Invalid);
    assert_eq!(
        h.err.lines(),
        vec!["missing 1 argument(s)", "usage: pair <a: int> <b: int>"]
    );
}

#[test]
fn parse_failure_reports_one_message() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "count",
        printing().param(ParameterDescriptor::new("n", ValueType::Int)),
    ));

    assert_eq!(h.run("count many"), ResultCode::Invalid);
    assert_eq!(h.err.lines().len(), 1);
    assert!(h.err.contents().contains("'many'"));
    assert!(h.out.is_empty());
}

#[test]
fn missing_implicit_is_reification_error() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "whoami",
        printing().param(
            ParameterDescriptor::new("session", ValueType::custom("Session", None)).implicit(),
        ),
    ));

    assert_eq!(
        h.dispatcher.resolve("whoami").unwrap_err(),
        Error::Reification(ReificationError::MissingImplicit {
            signature: "Session".to_string()
        })
    );
}

#[test]
fn resolution_reports_matched_path() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "config set|put",
        printing()
            .param(ParameterDescriptor::new("key", ValueType::String))
            .param(ParameterDescriptor::new("value", ValueType::String)),
    ));

    let resolution = h.dispatcher.resolve("config put colour blue").unwrap();
    assert_eq!(resolution.path, vec!["config", "put"]);
    assert_eq!(resolution.arguments.get::<String>(1).unwrap(), "blue");
}
