//! Integration-level tests exercising the loader and builder together.

use super::*;
use std::io::Write;

#[test]
fn loader_and_builder_agree_on_defaults() {
    let loaded = ConfigLoader::new().extract().unwrap();
    let built = ConfigBuilder::new().build().unwrap();
    assert_eq!(loaded.store.backend, built.store.backend);
    assert_eq!(loaded.store.key_separator, built.store.key_separator);
}

#[test]
fn env_overrides_take_effect() {
    std::env::set_var("DATABAYES_STORE_KEY_SEPARATOR", "|");
    let mut loader = ConfigLoader::new();
    loader.load_env();
    let config = loader.extract().unwrap();
    std::env::remove_var("DATABAYES_STORE_KEY_SEPARATOR");
    assert_eq!(config.store.key_separator, "|");
}

#[test]
fn file_then_env_layering_env_wins() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[store]\nkey_separator = \":\"").unwrap();

    std::env::set_var("DATABAYES_STORE_KEY_SEPARATOR", "#");
    let mut loader = ConfigLoader::new();
    loader.load_file(file.path()).unwrap();
    loader.load_env();
    let config = loader.extract().unwrap();
    std::env::remove_var("DATABAYES_STORE_KEY_SEPARATOR");

    assert_eq!(config.store.key_separator, "#");
}
