use super::*;
use tempfile::tempdir;

#[test]
fn settings_path_lives_under_marknote_dir() {
    let path = get_settings_path().expect("settings path");
    assert!(path.ends_with(".marknote/settings.json"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let settings = load_settings_from(&dir.path().join("settings.json")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn default_file_is_written_once_and_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".marknote").join("settings.json");

    write_default_settings(&path).unwrap();
    assert_eq!(load_settings_from(&path).unwrap(), Settings::default());

    std::fs::write(&path, r#"{ "editor": { "indentWidth": 2 } }"#).unwrap();
    write_default_settings(&path).unwrap();
    assert_eq!(load_settings_from(&path).unwrap().editor.indent_width, 2);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_settings_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_)));
    assert!(err.to_string().starts_with("invalid settings"));
}
