//! Composite literals: arrays, lists, sets, maps and optionals

use std::collections::BTreeMap;

use crate::common::*;
use verba::{
    Clamp, CommandDispatcher, ParameterDescriptor, ResultCode, TypeSignature, Value, ValueType,
};

#[test]
fn string_array_with_quoted_element() {
    let (body, seen) = capturing();
    let h = Harness::build(CommandDispatcher::builder().define(
        "run strings",
        body.param(ParameterDescriptor::new(
            "items",
            TypeSignature::array(TypeSignature::string()),
        )),
    ));

    assert_eq!(
        h.run(r#"run strings [foo, "Hello World!", baz]"#),
        ResultCode::Success
    );
    assert_eq!(
        seen.lock().clone(),
        vec![Value::Array(vec![
            Value::from("foo"),
            Value::from("Hello World!"),
            Value::from("baz"),
        ])]
    );
}

#[test]
fn length_constrained_int_array() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "run clampedints",
        printing().param(
            ParameterDescriptor::new("values", TypeSignature::array(TypeSignature::int()))
                .length(5, 5)
                .clamp(Clamp::integer(0, 10)),
        ),
    ));

    assert_eq!(h.run("run clampedints [1,2,3,4,5]"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["[1, 2, 3, 4, 5]"]);
    assert!(h.err.is_empty());

    h.out.clear();
    assert_eq!(h.run("run clampedints [1,2,3]"), ResultCode::Invalid);
    assert_eq!(h.err.lines().len(), 1);
    assert!(h.out.is_empty());
}

#[test]
fn element_clamp_applies_inside_array() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "run clampedints",
        printing().param(
            ParameterDescriptor::new("values", TypeSignature::array(TypeSignature::int()))
                .clamp(Clamp::integer(0, 10)),
        ),
    ));

    assert_eq!(h.run("run clampedints [1, 50, -3]"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["[1, 10, 0]"]);
}

#[test]
fn string_int_map() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "stringintmap",
        verba::ExecutableDescriptor::builder(|inv| {
            let map = inv.get::<BTreeMap<String, i32>>(0)?;
            let rendered: Vec<String> = map.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
            inv.out().write_line(&rendered.join(" "));
            Ok(ResultCode::Success)
        })
        .param(ParameterDescriptor::new(
            "entries",
            TypeSignature::map(TypeSignature::string(), TypeSignature::int()),
        )),
    ));

    assert_eq!(
        h.run("stringintmap [foo->256, bar -> 512]"),
        ResultCode::Success
    );
    assert_eq!(h.out.lines(), vec!["bar:512 foo:256"]);
}

#[test]
fn map_value_keeps_entry_order() {
    let (body, seen) = capturing();
    let h = Harness::build(CommandDispatcher::builder().define(
        "stringintmap",
        body.param(ParameterDescriptor::new(
            "entries",
            TypeSignature::map(TypeSignature::string(), TypeSignature::int()),
        )),
    ));

    assert_eq!(
        h.run("stringintmap [foo->256, bar -> 512]"),
        ResultCode::Success
    );
    assert_eq!(
        seen.lock().clone(),
        vec![Value::Map(vec![
            (Value::from("foo"), Value::Int(256)),
            (Value::from("bar"), Value::Int(512)),
        ])]
    );
}

#[test]
fn nested_lists() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "grid",
        verba::ExecutableDescriptor::builder(|inv| {
            let rows = inv.get::<Vec<Vec<i64>>>(0)?;
            let sums: Vec<String> = rows.iter().map(|r| r.iter().sum::<i64>().to_string()).collect();
            inv.out().write_line(&sums.join(","));
            Ok(ResultCode::Success)
        })
        .param(ParameterDescriptor::new(
            "rows",
            TypeSignature::list(TypeSignature::list(TypeSignature::long())),
        )),
    ));

    assert_eq!(h.run("grid [[1, 2], [3], []]"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["3,3,0"]);
}

#[test]
fn set_drops_duplicates() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "tags",
        printing().param(ParameterDescriptor::new(
            "tags",
            TypeSignature::set(TypeSignature::string()),
        )),
    ));

    assert_eq!(h.run("tags [a, b, a, c, b]"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["[a, b, c]"]);
}

#[test]
fn optional_value_accepts_null() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "limit",
        printing().param(ParameterDescriptor::new(
            "n",
            TypeSignature::optional(TypeSignature::int()),
        )),
    ));

    assert_eq!(h.run("limit 5"), ResultCode::Success);
    assert_eq!(h.run("limit NULL"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["5", "null"]);
}

#[test]
fn enum_literal_matches_case_insensitively() {
    let colour = ValueType::enumeration("Colour", ["Red", "Green", "Blue"]);
    let h = Harness::build(CommandDispatcher::builder().define(
        "paint",
        printing().param(ParameterDescriptor::new("colour", colour)),
    ));

    assert_eq!(h.run("paint green"), ResultCode::Success);
    assert_eq!(h.run("paint purple"), ResultCode::Invalid);
    assert_eq!(h.out.lines(), vec!["Green"]);
}

#[test]
fn bad_element_is_invalid() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "sum",
        printing().param(ParameterDescriptor::new(
            "values",
            TypeSignature::list(TypeSignature::int()),
        )),
    ));

    assert_eq!(h.run("sum [1, two, 3]"), ResultCode::Invalid);
    assert!(h.err.contents().contains("values[1]"));
}
