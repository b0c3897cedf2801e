use super::*;

fn entry(name: &str, is_file: bool) -> DirEntry {
    DirEntry::new(PathBuf::from("notes").join(name), is_file)
}

#[test]
fn filter_keeps_enumeration_order_and_extension() {
    let entries = vec![
        entry("zeta.md", true),
        entry("image.png", true),
        entry("alpha.md", true),
        entry("folder.md", false),
        entry(".md", true),
        entry("draft.md.bak", true),
    ];

    assert_eq!(filter_notes(&entries, "md"), vec!["zeta.md", "alpha.md"]);
}

#[test]
fn untitled_numbering_takes_max_plus_one() {
    let names = ["Untitled-0.md", "Untitled-2.md"];
    assert_eq!(next_untitled_name(names, "md"), "Untitled-3.md");
}

#[test]
fn untitled_numbering_starts_at_zero() {
    let names = ["notes.md", "todo.md"];
    assert_eq!(next_untitled_name(names, "md"), "Untitled-0.md");
    assert_eq!(next_untitled_index(std::iter::empty::<&str>()), 0);
}

#[test]
fn unparsable_untitled_suffix_counts_as_zero() {
    assert_eq!(next_untitled_index(["Untitled-draft.md"]), 1);
    assert_eq!(next_untitled_index(["Untitled-.md", "Untitled-7copy.md"]), 8);
}

#[test]
fn note_name_and_path_checks() {
    assert!(is_note_name("a.md", "md"));
    assert!(!is_note_name("a.mdx", "md"));
    assert!(!is_note_name("amd", "md"));
    assert!(!is_note_name(".md", "md"));

    assert!(is_note_path(Path::new("/x/a.md"), "md"));
    assert!(!is_note_path(Path::new("/x/a.txt"), "md"));
    assert!(!is_note_path(Path::new("/x/README"), "md"));
}

#[test]
fn renamed_path_stays_in_same_directory() {
    let path = Path::new("notes/Untitled-0.md");
    assert_eq!(
        renamed_path(path, "groceries", "md"),
        Ok(PathBuf::from("notes/groceries.md"))
    );
    assert_eq!(
        renamed_path(path, " groceries.md ", "md"),
        Ok(PathBuf::from("notes/groceries.md"))
    );
}

#[test]
fn renamed_path_rejects_bad_names() {
    let path = Path::new("notes/a.md");
    assert_eq!(renamed_path(path, "   ", "md"), Err(RenameError::EmptyName));
    assert_eq!(renamed_path(path, ".md", "md"), Err(RenameError::EmptyName));
    assert!(matches!(
        renamed_path(path, "../escape", "md"),
        Err(RenameError::InvalidName(_))
    ));
}

#[test]
fn display_stem_drops_extension() {
    assert_eq!(display_stem(Path::new("notes/Untitled-3.md")), "Untitled-3");
}
