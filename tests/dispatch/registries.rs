//! Handler and implicit registries: duplicates, forks and shadowing

use std::sync::Arc;

use crate::common::*;
use verba::{
    parse_value, ArgumentHandler, ArgumentParseError, BuildError, CommandDispatcher,
    HandlerLookup, HandlerRegistry, ImplicitProvider, ImplicitRegistry, ParameterDescriptor,
    RegistryError, ResultCode, TypeSignature, Value, ValueType,
};

struct Upper;

impl ArgumentHandler for Upper {
    fn parse(
        &self,
        _lookup: &dyn HandlerLookup,
        _param: &ParameterDescriptor,
        literal: &str,
    ) -> Result<Value, ArgumentParseError> {
        Ok(Value::String(literal.to_uppercase()))
    }

    fn syntax(&self, _lookup: &dyn HandlerLookup, _param: &ParameterDescriptor) -> String {
        "STRING".to_string()
    }
}

#[test]
fn duplicate_object_handler_is_rejected() {
    let err = HandlerRegistry::builder()
        .handler(ValueType::Any, Arc::new(Upper))
        .handler(ValueType::Any, Arc::new(Upper))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateHandler {
            ty: "any".to_string()
        }
    );

    let mut registry = HandlerRegistry::new();
    assert!(registry.register(ValueType::Any, Arc::new(Upper)));
    assert!(!registry.register(ValueType::Any, Arc::new(Upper)));
    assert_eq!(registry.len(), 1);
}

#[test]
fn fork_shadows_without_touching_parent() {
    let parent = HandlerRegistry::defaults();
    let mut child = parent.fork();
    assert!(child.register(ValueType::String, Arc::new(Upper)));

    let param = ParameterDescriptor::new("s", ValueType::String);
    assert_eq!(
        parse_value(&child, &param, "quiet").unwrap(),
        Value::from("QUIET")
    );
    assert_eq!(
        parse_value(parent.as_ref(), &param, "quiet").unwrap(),
        Value::from("quiet")
    );

    // Types the child does not override still resolve through the parent
    let int = ParameterDescriptor::new("n", ValueType::Int);
    assert_eq!(parse_value(&child, &int, "7").unwrap(), Value::Int(7));
}

#[test]
fn ancestor_handler_covers_custom_type() {
    let mut registry = HandlerRegistry::new();
    registry.register(ValueType::Any, Arc::new(Upper));

    let param = ParameterDescriptor::new("x", ValueType::custom("Widget", None));
    assert_eq!(
        parse_value(&registry, &param, "knob").unwrap(),
        Value::from("KNOB")
    );
}

#[test]
fn dispatcher_handler_override() {
    let h = Harness::build(
        CommandDispatcher::builder()
            .handler(ValueType::String, Arc::new(Upper))
            .define(
                "say",
                printing().param(ParameterDescriptor::new("word", ValueType::String)),
            ),
    );

    assert_eq!(h.run("say hi"), ResultCode::Success);
    assert_eq!(h.out.lines(), vec!["HI"]);
    assert_eq!(h.dispatcher.usages(), vec!["say <word: STRING>"]);
}

#[test]
fn duplicate_dispatcher_handler_fails_build() {
    let err = CommandDispatcher::builder()
        .handler(ValueType::Int, Arc::new(Upper))
        .handler(ValueType::Int, Arc::new(Upper))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Registry {
            source: RegistryError::DuplicateHandler { .. },
            ..
        }
    ));
}

#[test]
fn missing_element_handler_fails_build() {
    let registry = HandlerRegistry::builder()
        .handler(ValueType::Collection, Arc::new(verba::builtin::SequenceHandler))
        .build()
        .unwrap();
    let err = CommandDispatcher::builder()
        .handlers(Arc::new(registry))
        .define(
            "sum",
            printing().param(ParameterDescriptor::new(
                "values",
                TypeSignature::list(TypeSignature::int()),
            )),
        )
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::Registry {
            path: "sum".to_string(),
            source: RegistryError::MissingHandler {
                ty: "int".to_string(),
                parameter: "values".to_string(),
            },
        }
    );
}

#[test]
fn implicit_registry_fork_and_duplicates() {
    let parent = Arc::new({
        let mut r = ImplicitRegistry::new();
        assert!(r.register(TypeSignature::string(), || Value::from("parent")));
        assert!(!r.register(TypeSignature::string(), || Value::from("again")));
        r
    });
    let mut child = parent.fork();
    assert!(child
        .try_register(TypeSignature::string(), || Value::from("child"))
        .is_ok());
    assert!(child
        .try_register(TypeSignature::string(), || Value::from("again"))
        .is_err());

    let sig = TypeSignature::string();
    assert_eq!(child.find(&sig).unwrap()(), Value::from("child"));
    assert_eq!(parent.find(&sig).unwrap()(), Value::from("parent"));
    assert!(child.find(&TypeSignature::int()).is_none());
}

#[test]
fn implicit_values_reach_the_body() {
    struct Clock(u64);

    let session = ValueType::custom("Clock", None);
    let h = Harness::build(
        CommandDispatcher::builder()
            .implicit(TypeSignature::of(session.clone()), || {
                Value::opaque(Clock(1_700_000_000))
            })
            .define(
                "now",
                verba::ExecutableDescriptor::builder(|inv| {
                    let clock = inv.opaque::<Clock>(0)?;
                    inv.out().write_line(&clock.0.to_string());
                    Ok(ResultCode::Success)
                })
                .param(ParameterDescriptor::new("clock", session).implicit()),
            ),
    );

    assert_eq!(h.run("now"), ResultCode::Success);
    assert_eq!(h.run("now extra"), ResultCode::Invalid);
    assert_eq!(h.out.lines(), vec!["1700000000"]);
}
