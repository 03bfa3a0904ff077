//! The example config shipped at the workspace root stays loadable

use std::path::PathBuf;

use chronomcp_config::{load_config, Config};

fn example_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join("chronomcp.example.yaml")
}

#[test]
fn test_example_config_matches_defaults() {
    let config = load_config(&example_path()).unwrap();
    assert_eq!(config, Config::default());
}
