use super::executor::execute_effect;
use crate::kernel::effect::Effect;
use crate::kernel::services::bus::KernelBusSender;
use crate::kernel::services::ports::FileProvider;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Runs file-system effects off the UI thread.
///
/// Effects go through a single queue and run one at a time in submission order, so a
/// flushed write always lands before the read or rename issued after it.
pub struct AsyncRuntime {
    runtime: tokio::runtime::Runtime,
    queue: mpsc::UnboundedSender<Effect>,
    worker: JoinHandle<()>,
}

impl AsyncRuntime {
    pub fn new(
        provider: Arc<dyn FileProvider>,
        bus: KernelBusSender,
        note_extension: String,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .or_else(|e| {
                tracing::error!(
                    error = %e,
                    "Failed to create multi-thread tokio runtime, falling back to current-thread"
                );
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
            })?;

        let (queue, mut rx) = mpsc::unbounded_channel::<Effect>();
        let extension: Arc<str> = Arc::from(note_extension);
        let worker = runtime.spawn(async move {
            while let Some(effect) = rx.recv().await {
                let provider = Arc::clone(&provider);
                let extension = Arc::clone(&extension);
                let result = tokio::task::spawn_blocking(move || {
                    execute_effect(provider.as_ref(), effect, &extension)
                })
                .await;
                match result {
                    Ok(Some(action)) => {
                        if bus.send_action(action).is_err() {
                            tracing::debug!("kernel bus closed, stopping effect worker");
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::error!(error = %e, "effect task failed"),
                }
            }
        });

        Ok(Self {
            runtime,
            queue,
            worker,
        })
    }

    /// Closes the queue and waits up to `timeout` for the effects already queued to run.
    /// Returns false when the worker was still busy at the deadline.
    pub fn shutdown(self, timeout: Duration) -> bool {
        let Self {
            runtime,
            queue,
            worker,
        } = self;
        drop(queue);
        let finished = runtime.block_on(async { tokio::time::timeout(timeout, worker).await });
        match finished {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "effect worker panicked");
                false
            }
            Err(_) => {
                tracing::warn!(?timeout, "effect worker still busy at shutdown");
                false
            }
        }
    }

    /// Queues the file-system effects of a batch, keeping their order. Watcher and focus
    /// effects belong to the frontend and are skipped here.
    pub fn execute(&self, effects: &[Effect]) {
        for effect in effects.iter().filter(|effect| effect.is_io()) {
            if self.queue.send(effect.clone()).is_err() {
                tracing::error!(?effect, "effect worker stopped; dropping effect");
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../../../tests/unit/kernel/services/adapters/runtime/async_runtime.rs"]
mod tests;
