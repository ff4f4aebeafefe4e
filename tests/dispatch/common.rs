//! Common test utilities for dispatch tests

use std::sync::Arc;

use verba::{
    BufferSink, CommandDispatcher, DispatcherBuilder, DispatcherConfig, ExecutableBuilder,
    ExecutableDescriptor, Invocation, ResultCode, Sinks, Value,
};

/// Dispatcher output captured in memory.
pub struct Harness {
    pub dispatcher: CommandDispatcher,
    pub out: BufferSink,
    pub err: BufferSink,
}

impl Harness {
    /// Build with buffered sinks and a small pool.
    pub fn build(builder: DispatcherBuilder) -> Self {
        let (sinks, out, err) = Sinks::buffered();
        let dispatcher = builder
            .config(small_config())
            .sinks(sinks)
            .build()
            .unwrap();
        Harness {
            dispatcher,
            out,
            err,
        }
    }

    pub fn run(&self, input: &str) -> ResultCode {
        self.dispatcher.execute_sync(input)
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        self.dispatcher.shutdown();
    }
}

pub fn small_config() -> DispatcherConfig {
    DispatcherConfig {
        max_workers: 2,
        max_queue_depth: 64,
        ..DispatcherConfig::default()
    }
}

/// A body that prints every argument on one line, `-` for absent slots.
pub fn printing() -> ExecutableBuilder {
    ExecutableDescriptor::builder(|inv: &Invocation| {
        inv.out().write_line(&render(inv));
        Ok(ResultCode::Success)
    })
}

pub fn render(inv: &Invocation) -> String {
    inv.iter()
        .map(|slot| match slot.value() {
            Some(v) => v.to_string(),
            None => "-".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A body that stores its arguments for later inspection.
pub fn capturing() -> (ExecutableBuilder, Arc<parking_lot::Mutex<Vec<Value>>>) {
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let builder = ExecutableDescriptor::builder(move |inv: &Invocation| {
        let mut seen = sink.lock();
        seen.clear();
        seen.extend(inv.iter().filter_map(|slot| slot.value().cloned()));
        Ok(ResultCode::Success)
    });
    (builder, seen)
}
