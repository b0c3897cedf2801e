use super::*;
use crate::kernel::binding::BindingGeneration;
use crate::kernel::effect::ReadPurpose;
use crate::kernel::services::adapters::LocalFileProvider;
use tempfile::tempdir;

fn run(effect: Effect) -> Option<Action> {
    execute_effect(&LocalFileProvider::new(), effect, "md")
}

#[test]
fn read_reports_content_or_failure() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.md");
    std::fs::write(&path, "# A").unwrap();
    let generation = BindingGeneration::default().next();

    let loaded = run(Effect::ReadFile {
        generation,
        path: path.clone(),
        purpose: ReadPurpose::Load,
    });
    assert_eq!(
        loaded,
        Some(Action::FileLoaded {
            generation,
            path,
            purpose: ReadPurpose::Load,
            content: "# A".to_string(),
        })
    );

    let missing = run(Effect::ReadFile {
        generation,
        path: dir.path().join("missing.md"),
        purpose: ReadPurpose::Reload,
    });
    assert!(matches!(
        missing,
        Some(Action::FileLoadFailed {
            purpose: ReadPurpose::Reload,
            ..
        })
    ));
}

#[test]
fn write_reports_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.md");
    let generation = BindingGeneration::default().next();

    let saved = run(Effect::WriteFile {
        generation,
        path: path.clone(),
        content: "body".to_string(),
        version: 7,
    });
    assert_eq!(
        saved,
        Some(Action::FileSaved {
            generation,
            path: path.clone(),
            version: 7,
        })
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "body");
}

#[test]
fn listing_keeps_only_notes() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.md"), "").unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    std::fs::create_dir(dir.path().join("c.md")).unwrap();

    let listed = run(Effect::ListNotes {
        dir: dir.path().to_path_buf(),
    });
    assert_eq!(
        listed,
        Some(Action::NotesListed {
            dir: dir.path().to_path_buf(),
            notes: vec!["a.md".to_string()],
        })
    );
}

#[test]
fn create_untitled_picks_next_free_index() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("Untitled-0.md"), "").unwrap();
    std::fs::write(dir.path().join("Untitled-2.md"), "").unwrap();

    let created = run(Effect::CreateUntitled {
        dir: dir.path().to_path_buf(),
    });
    let expected = dir.path().join("Untitled-3.md");
    assert_eq!(
        created,
        Some(Action::NoteCreated {
            path: expected.clone()
        })
    );
    assert_eq!(std::fs::read_to_string(expected).unwrap(), "");
}

#[test]
fn rename_and_delete_report_outcomes() {
    let dir = tempdir().unwrap();
    let from = dir.path().join("a.md");
    let to = dir.path().join("b.md");
    std::fs::write(&from, "x").unwrap();

    assert_eq!(
        run(Effect::RenameNote {
            from: from.clone(),
            to: to.clone(),
        }),
        Some(Action::NoteRenamed {
            from: from.clone(),
            to: to.clone(),
        })
    );
    assert!(matches!(
        run(Effect::RenameNote {
            from: from.clone(),
            to: to.clone(),
        }),
        Some(Action::FsOpFailed { op: "rename", .. })
    ));

    assert_eq!(
        run(Effect::DeleteNote { path: to.clone() }),
        Some(Action::NoteDeleted { path: to.clone() })
    );
    assert!(matches!(
        run(Effect::DeleteNote { path: to }),
        Some(Action::FsOpFailed { op: "delete", .. })
    ));
}

#[test]
fn frontend_effects_are_not_executed() {
    assert_eq!(run(Effect::FocusEditor), None);
    assert_eq!(
        run(Effect::Unwatch {
            slot: crate::kernel::effect::WatchSlot::Binding
        }),
        None
    );
}
