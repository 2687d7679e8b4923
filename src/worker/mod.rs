//! Worker-process side of isolated tool execution.

mod runtime;

pub use runtime::WorkerRuntime;
