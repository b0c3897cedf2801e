use super::*;

#[test]
fn test_default_config() {
    let config = EditorConfig::default();
    assert_eq!(config.indent_width, 4);
    assert_eq!(config.indent_unit(), "    ");
    assert_eq!(config.render_debounce(), Duration::from_millis(300));
    assert_eq!(config.create_debounce(), Duration::from_millis(100));
    assert_eq!(config.watcher_poll_interval(), Duration::from_millis(250));
    assert_eq!(config.note_extension, "md");
    assert!(!config.auto_close_markdown_delimiters);
}

#[test]
fn test_indent_unit_never_empty() {
    let config = EditorConfig {
        indent_width: 0,
        ..EditorConfig::default()
    };
    assert_eq!(config.indent_unit(), " ");
}
