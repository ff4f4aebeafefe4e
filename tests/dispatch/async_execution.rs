//! Asynchronous execution through the worker pool

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use crate::common::*;
use verba::{
    CommandDispatcher, ExecutableDescriptor, ExecutionError, ParameterDescriptor, ResultCode,
    Sinks, ValueType, WorkerPool,
};

#[test]
fn async_result_matches_sync() {
    let h = Harness::build(CommandDispatcher::builder().define(
        "double",
        ExecutableDescriptor::builder(|inv| {
            inv.out().write_line(&(inv.get::<i64>(0)? * 2).to_string());
            Ok(ResultCode::Success)
        })
        .param(ParameterDescriptor::new("n", ValueType::Long)),
    ));

    let execution = h.dispatcher.execute_async("double 21");
    assert_eq!(execution.result().unwrap(), ResultCode::Success);
    assert!(execution.is_completed());
    assert_eq!(h.out.lines(), vec!["42"]);
}

#[test]
fn invalid_input_completes_immediately() {
    let h = Harness::build(CommandDispatcher::builder().define("noop", printing()));

    let execution = h.dispatcher.execute_async("nope");
    assert!(execution.is_completed());
    assert!(!execution.cancel());
    assert_eq!(
        execution.result_timeout(Duration::ZERO).unwrap(),
        ResultCode::Invalid
    );
    assert_eq!(h.dispatcher.pool_stats().worker_count, 0);
}

#[test]
fn timeout_does_not_stop_the_body() {
    let gate = Arc::new(Barrier::new(2));
    let g = Arc::clone(&gate);
    let h = Harness::build(CommandDispatcher::builder().define(
        "slow",
        ExecutableDescriptor::builder(move |_| {
            g.wait();
            Ok(ResultCode::Failure)
        }),
    ));

    let execution = h.dispatcher.execute_async("slow");
    assert!(matches!(
        execution.result_timeout(Duration::from_millis(10)),
        Err(ExecutionError::Timeout { .. })
    ));
    gate.wait();
    assert_eq!(execution.result().unwrap(), ResultCode::Failure);
}

#[test]
fn cancellation_reaches_a_running_body() {
    let started = Arc::new(Barrier::new(2));
    let s = Arc::clone(&started);
    let observed = Arc::new(AtomicBool::new(false));
    let o = Arc::clone(&observed);
    let h = Harness::build(CommandDispatcher::builder().define(
        "spin",
        ExecutableDescriptor::builder(move |inv| {
            s.wait();
            while !inv.is_cancelled() {
                std::thread::sleep(Duration::from_millis(1));
            }
            o.store(true, Ordering::SeqCst);
            Ok(ResultCode::Success)
        }),
    ));

    let execution = h.dispatcher.execute_async("spin");
    started.wait();
    assert!(execution.cancel());
    assert_eq!(execution.result().unwrap_err(), ExecutionError::Cancelled);
    h.dispatcher.pool().drain();
    assert!(observed.load(Ordering::SeqCst));
}

#[test]
fn body_errors_terminate() {
    let h = Harness::build(
        CommandDispatcher::builder()
            .define(
                "explode",
                ExecutableDescriptor::builder(|_| panic!("kaboom")),
            )
            .define(
                "fail",
                ExecutableDescriptor::builder(|_| anyhow::bail!("refused")),
            ),
    );

    assert_eq!(
        h.dispatcher.execute_async("explode").result().unwrap(),
        ResultCode::Terminated
    );
    assert_eq!(h.run("fail"), ResultCode::Terminated);
    assert_eq!(
        h.err.lines(),
        vec!["command panicked: kaboom", "command failed: refused"]
    );
}

#[test]
fn dispatchers_share_an_injected_pool() {
    let pool = Arc::new(WorkerPool::new(2, 64, "shared"));
    let counter = Arc::new(AtomicUsize::new(0));

    let build = |name: &str| {
        let c = Arc::clone(&counter);
        CommandDispatcher::builder()
            .pool(Arc::clone(&pool))
            .sinks(Sinks::buffered().0)
            .define(
                name,
                ExecutableDescriptor::builder(move |_| {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(ResultCode::Success)
                }),
            )
            .build()
            .unwrap()
    };
    let first = build("first");
    let second = build("second");

    let executions: Vec<_> = (0..10)
        .map(|i| {
            if i % 2 == 0 {
                first.execute_async("first")
            } else {
                second.execute_async("second")
            }
        })
        .collect();
    for execution in &executions {
        assert_eq!(execution.result().unwrap(), ResultCode::Success);
    }

    assert_eq!(counter.load(Ordering::SeqCst), 10);
    assert!(Arc::ptr_eq(first.pool(), second.pool()));
    assert!(pool.stats().worker_count <= 2);
    pool.shutdown();
}

#[test]
fn executions_have_distinct_ids() {
    let h = Harness::build(CommandDispatcher::builder().define("noop", printing()));
    let a = h.dispatcher.execute_async("noop");
    let b = h.dispatcher.execute_async("noop");
    assert_ne!(a.id(), b.id());
    a.result().unwrap();
    b.result().unwrap();
}
