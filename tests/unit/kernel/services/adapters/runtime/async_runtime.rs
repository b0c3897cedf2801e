use super::*;
use crate::kernel::action::Action;
use crate::kernel::binding::BindingGeneration;
use crate::kernel::effect::ReadPurpose;
use crate::kernel::services::adapters::LocalFileProvider;
use crate::kernel::services::bus::{kernel_bus, KernelMessage};
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn effects_in_a_batch_complete_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.md");
    let (tx, mut rx) = kernel_bus();
    let runtime = AsyncRuntime::new(Arc::new(LocalFileProvider::new()), tx, "md".to_string())
        .expect("runtime");
    let generation = BindingGeneration::default().next();

    runtime.execute(&[
        Effect::WriteFile {
            generation,
            path: path.clone(),
            content: "flushed".to_string(),
            version: 3,
        },
        Effect::FocusEditor,
        Effect::ReadFile {
            generation,
            path: path.clone(),
            purpose: ReadPurpose::Load,
        },
    ]);

    let first = rx.recv_timeout(Duration::from_secs(5)).expect("write completion");
    let second = rx.recv_timeout(Duration::from_secs(5)).expect("read completion");
    assert!(matches!(
        first,
        KernelMessage::Action(Action::FileSaved { version: 3, .. })
    ));
    match second {
        KernelMessage::Action(Action::FileLoaded { content, .. }) => {
            assert_eq!(content, "flushed")
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn shutdown_waits_for_queued_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("last.md");
    let (tx, _rx) = kernel_bus();
    let runtime = AsyncRuntime::new(Arc::new(LocalFileProvider::new()), tx, "md".to_string())
        .expect("runtime");

    runtime.execute(&[Effect::WriteFile {
        generation: BindingGeneration::default().next(),
        path: path.clone(),
        content: "final words".to_string(),
        version: 1,
    }]);

    assert!(runtime.shutdown(Duration::from_secs(5)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "final words");
}
