//! Environment overrides live in their own test binary: they mutate process env.

use std::fs;

use tempfile::TempDir;

use orgtree::config::Settings;
use orgtree::domain::SearchStrategy;

#[test]
fn given_env_vars_when_loading_then_env_wins_over_config_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("orgtree.toml");
    fs::write(&path, "strategy = \"recursive\"\npretty_json = true\n").unwrap();
    std::env::set_var("ORGTREE_STRATEGY", "worklist");
    std::env::set_var("ORGTREE_PRETTY_JSON", "false");

    // Act
    let settings = Settings::load_without_global(Some(&path));
    std::env::remove_var("ORGTREE_STRATEGY");
    std::env::remove_var("ORGTREE_PRETTY_JSON");

    // Assert
    let settings = settings.unwrap();
    assert_eq!(settings.strategy, SearchStrategy::Worklist);
    assert!(!settings.pretty_json);
    assert!(settings.color);
}
