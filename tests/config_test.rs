//! Tests for layered configuration loading from files

use std::fs;

use tempfile::TempDir;

use orgtree::application::ApplicationError;
use orgtree::config::Settings;
use orgtree::domain::SearchStrategy;

#[test]
fn given_no_config_file_when_loading_then_defaults() {
    let settings = Settings::load_without_global(None).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_config_file_when_loading_then_specified_fields_override() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orgtree.toml");
    fs::write(&path, "strategy = \"trampoline\"\ncolor = false\n").unwrap();

    // Act
    let settings = Settings::load_without_global(Some(&path)).unwrap();

    // Assert
    assert_eq!(settings.strategy, SearchStrategy::Trampoline);
    assert!(!settings.color);
    assert!(settings.pretty_json, "unspecified field keeps default");
}

#[test]
fn given_missing_config_file_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    let err = Settings::load_without_global(Some(&temp.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ApplicationError::Config { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn given_unknown_strategy_when_loading_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orgtree.toml");
    fs::write(&path, "strategy = \"bogo\"\n").unwrap();

    let err = Settings::load_without_global(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { .. }));
}

#[test]
fn given_settings_when_rendering_toml_then_loadable_again() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orgtree.toml");
    let settings = Settings {
        strategy: SearchStrategy::Recursive,
        pretty_json: false,
        color: true,
    };
    fs::write(&path, settings.to_toml().unwrap()).unwrap();

    // Act
    let loaded = Settings::load_without_global(Some(&path)).unwrap();

    // Assert
    assert_eq!(loaded, settings);
}
