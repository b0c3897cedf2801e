//! Async runtime adapter: executes IO effects and sends completions back over the kernel bus.

mod async_runtime;
mod executor;

pub use async_runtime::AsyncRuntime;
pub use executor::execute_effect;
