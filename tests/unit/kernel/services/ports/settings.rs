use super::*;

#[test]
fn empty_settings_file_keeps_defaults() {
    let settings: Settings = serde_json::from_str("{}").expect("parse empty settings");
    let config = settings.to_config();

    assert_eq!(settings, Settings::default());
    assert_eq!(config.indent_width, 4);
    assert_eq!(config.notes_dir, PathBuf::from("notes"));
}

#[test]
fn partial_settings_override_only_named_fields() {
    let data = r#"{
      "notesDir": "/tmp/my-notes",
      "editor": { "autoCloseMarkdownDelimiters": true }
    }"#;
    let settings: Settings = serde_json::from_str(data).expect("parse settings");
    let config = settings.to_config();

    assert_eq!(config.notes_dir, PathBuf::from("/tmp/my-notes"));
    assert!(config.auto_close_markdown_delimiters);
    assert_eq!(config.indent_width, 4);
    assert_eq!(config.render_debounce_ms, 300);
}

#[test]
fn zero_indent_width_is_ignored() {
    let data = r#"{ "editor": { "indent_width": 0, "render_debounce_ms": 50 } }"#;
    let settings: Settings = serde_json::from_str(data).expect("parse settings");
    let config = settings.to_config();

    assert_eq!(config.indent_width, 4);
    assert_eq!(config.render_debounce_ms, 50);
}

#[test]
fn settings_serde_roundtrip() {
    let original = Settings {
        notes_dir: Some(PathBuf::from("journal")),
        editor: EditorSettings {
            indent_width: 2,
            auto_close_markdown_delimiters: true,
            render_debounce_ms: Some(120),
        },
    };
    let json = serde_json::to_string(&original).expect("serialize Settings");
    let decoded: Settings = serde_json::from_str(&json).expect("deserialize Settings");
    assert_eq!(decoded, original);
}
