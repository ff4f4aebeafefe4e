//! Auto flags, user flags and mutual exclusion

use crate::common::*;
use verba::{
    CommandDispatcher, Error, ExecutableBuilder, FlagSpec, ParameterDescriptor, ResultCode,
    TypeSignature, ValueType,
};

fn exclusive_flags() -> ExecutableBuilder {
    printing()
        .param(
            ParameterDescriptor::new("flag1", ValueType::Bool)
                .flag(FlagSpec::auto(["-flag1", "f1"]).exclusive_with(["-flag2"])),
        )
        .param(
            ParameterDescriptor::new("flag2", ValueType::Bool)
                .flag(FlagSpec::auto(["-flag2", "f2"])),
        )
}

#[test]
fn mutually_exclusive_flags_conflict() {
    let h = Harness::build(CommandDispatcher::builder().define("run", exclusive_flags()));

    assert_eq!(h.run("run --flag1 --flag2"), ResultCode::Invalid);
    assert_eq!(
        h.dispatcher.resolve("run --flag1 --flag2").unwrap_err(),
        Error::FlagConflict {
            flag: "--flag2".to_string(),
            conflicting: "--flag1".to_string(),
        }
    );
    assert!(h.out.is_empty());
}

#[test]
fn exclusion_holds_in_either_order() {
    let h = Harness::build(CommandDispatcher::builder().define("run", exclusive_flags()));

    assert_eq!(h.run("run -f2 -f1"), ResultCode::Invalid);
    assert_eq!(h.err.lines().len(), 1);
}

#[test]
fn single_flag_succeeds() {
    let h = Harness::build(CommandDispatcher::builder().define("run", exclusive_flags()));

    assert_eq!(h.run("run -f1"), ResultCode::Success);
    assert_eq!(h.run("run --flag2"), ResultCode::Success);
    assert_eq!(h.run("run"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["true false", "false true", "false false"]);
}

#[test]
fn auto_flag_literals() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "fetch",
        printing()
            .param(
                ParameterDescriptor::new("depth", ValueType::Int).flag(
                    FlagSpec::auto(["deep", "d"])
                        .default_if_present("10")
                        .default_if_absent("1"),
                ),
            )
            .param(ParameterDescriptor::new("url", ValueType::String)),
    ));

    assert_eq!(h.run("fetch example.org"), ResultCode::Success);
    assert_eq!(h.run("fetch -d example.org"), ResultCode::Success);
    assert_eq!(h.run("fetch example.org -deep"), ResultCode::Success);
    assert_eq!(
        h.out.lines(),
        vec!["1 example.org", "10 example.org", "10 example.org"]
    );
}

#[test]
fn user_flag_takes_operand() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "log",
        printing()
            .param(
                ParameterDescriptor::new("level", ValueType::String)
                    .equals_ignore_case(["debug", "info", "warn"])
                    .flag(FlagSpec::user(["level", "l"]).default_if_absent("info")),
            )
            .param(
                ParameterDescriptor::new("tags", TypeSignature::list(TypeSignature::string()))
                    .flag(FlagSpec::user(["tags"])),
            )
            .param(ParameterDescriptor::new("message", ValueType::String)),
    ));

    assert_eq!(h.run("log hello"), ResultCode::Success);
    assert_eq!(h.run("log -l warn hello"), ResultCode::Success);
    assert_eq!(h.run("log -tags [a, b] -level debug hello"), ResultCode::Success);
    assert_eq!(
        h.out.lines(),
        vec!["info - hello", "warn - hello", "debug [a, b] hello"]
    );

    assert_eq!(h.run("log -l loud hello"), ResultCode::Invalid);
}

#[test]
fn usage_renders_flags() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "log",
        printing()
            .param(
                ParameterDescriptor::new("verbose", ValueType::Bool)
                    .flag(FlagSpec::auto(["v", "verbose"])),
            )
            .param(
                ParameterDescriptor::new("level", ValueType::String)
                    .flag(FlagSpec::user(["l"])),
            )
            .param(ParameterDescriptor::new("message", ValueType::String))
            .param(ParameterDescriptor::new("count", ValueType::Int).optional()),
    ));

    assert_eq!(
        h.dispatcher.usages(),
        vec!["log [-v|-verbose] [-l <string>] <message: string> [<count: int>]"]
    );
}
