//! Unit tests for configuration loading and lazy validation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SIHOOK_* variables are marked with #[serial].

use serial_test::serial;
use sihook_common::config::{SearchIndexConfig, TomlConfig};
use sihook_common::Error;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 9] = [
    "SIHOOK_CONFIG",
    "SIHOOK_ENDPOINT",
    "SIHOOK_CREDENTIALS",
    "SIHOOK_INDEXABLE_TYPES",
    "SIHOOK_TARGETLINK_BASE_PATH",
    "SIHOOK_INDEX_NAME",
    "SIHOOK_CATALOG_URL",
    "SIHOOK_REQUEST_TIMEOUT_SECS",
    "SIHOOK_LOG_LEVEL",
];

fn clear_env() {
    for name in ENV_VARS {
        env::remove_var(name);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn configured() -> SearchIndexConfig {
    SearchIndexConfig {
        endpoint: Some("http://test.endpoint".to_string()),
        credentials: Some("testuser:testpassword".to_string()),
        indexable_types: Some("indexable_dataset".to_string()),
        targetlink_base_path: Some("/foo/bar/".to_string()),
        index_name: Some("test-index".to_string()),
        ..SearchIndexConfig::default()
    }
}

#[test]
fn test_assert_configuration_passes_when_complete() {
    assert!(configured().assert_configuration().is_ok());
}

#[test]
fn test_assert_configuration_missing_endpoint() {
    let config = SearchIndexConfig {
        endpoint: None,
        ..configured()
    };
    assert!(matches!(config.assert_configuration(), Err(Error::Config(_))));
}

#[test]
fn test_assert_configuration_missing_credentials() {
    let config = SearchIndexConfig {
        credentials: None,
        ..configured()
    };
    assert!(matches!(config.assert_configuration(), Err(Error::Config(_))));
}

#[test]
fn test_assert_configuration_no_colon_credentials() {
    let config = SearchIndexConfig {
        credentials: Some("testuser-testpassword".to_string()),
        ..configured()
    };
    let err = config.assert_configuration().unwrap_err();
    assert!(err.to_string().contains("username:password"));
}

#[test]
fn test_assert_configuration_missing_targetlink_base_path() {
    let config = SearchIndexConfig {
        targetlink_base_path: None,
        ..configured()
    };
    assert!(config.assert_configuration().is_err());
}

#[test]
fn test_assert_configuration_missing_index_name() {
    let config = SearchIndexConfig {
        index_name: None,
        ..configured()
    };
    assert!(config.assert_configuration().is_err());
}

#[test]
fn test_credentials_have_username_and_password() {
    let credentials = configured().credentials().unwrap();
    assert_eq!(credentials.username, "testuser");
    assert_eq!(credentials.password, "testpassword");
}

#[test]
fn test_indexable_types_are_trimmed() {
    let config = SearchIndexConfig {
        indexable_types: Some("one,two, three,                         four".to_string()),
        ..configured()
    };
    let types = config.indexable_types().unwrap();
    assert_eq!(types, vec!["one", "two", "three", "four"]);
}

#[test]
fn test_should_be_indexed() {
    let config = SearchIndexConfig {
        indexable_types: Some("test".to_string()),
        ..configured()
    };
    assert!(config.should_be_indexed("test").unwrap());
    assert!(config.should_be_indexed("test   ").unwrap());
    assert!(!config.should_be_indexed("boo").unwrap());
    assert!(!config.should_be_indexed("yaa").unwrap());
}

#[test]
fn test_targetlink_base_path_completes_path() {
    let config = SearchIndexConfig {
        targetlink_base_path: Some("foooo/bar".to_string()),
        ..configured()
    };
    assert_eq!(config.targetlink_base_path().unwrap(), "foooo/bar/");
}

#[test]
fn test_targetlink_for_dataset() {
    let config = SearchIndexConfig {
        targetlink_base_path: Some("/test/path/".to_string()),
        ..configured()
    };
    assert_eq!(
        config.targetlink_for("example-dataset").unwrap(),
        "/test/path/example-dataset"
    );
}

#[test]
#[serial]
fn test_load_from_explicit_file() {
    clear_env();
    let file = write_config(
        r#"
        port = 6000

        [logging]
        level = "debug"

        [search_index]
        endpoint = "http://index.local/api"
        credentials = "user:secret"
        indexable_types = "dataset, showcase"
        targetlink_base_path = "/datasets"
        index_name = "govdata"
        request_timeout_secs = 5

        [catalog]
        url = "http://catalog.local"
        "#,
    );

    let config = TomlConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.port, 6000);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.search_index.endpoint().unwrap(), "http://index.local/api/");
    assert_eq!(config.search_index.request_timeout_secs, 5);
    assert!(config.search_index.should_be_indexed("showcase").unwrap());
    assert_eq!(config.catalog.base_url().unwrap(), "http://catalog.local");
}

#[test]
#[serial]
fn test_missing_sections_use_defaults() {
    clear_env();
    let file = write_config("port = 7000\n");

    let config = TomlConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.port, 7000);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.search_index.request_timeout_secs, 30);
    // Missing values only fail on use
    assert!(config.search_index.endpoint().is_err());
}

#[test]
#[serial]
fn test_env_overrides_file_values() {
    clear_env();
    let file = write_config(
        r#"
        [search_index]
        endpoint = "http://from-file"
        index_name = "file-index"
        "#,
    );
    env::set_var("SIHOOK_ENDPOINT", "http://from-env/");
    env::set_var("SIHOOK_REQUEST_TIMEOUT_SECS", "12");

    let config = TomlConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.search_index.endpoint().unwrap(), "http://from-env/");
    assert_eq!(config.search_index.index_name().unwrap(), "file-index");
    assert_eq!(config.search_index.request_timeout_secs, 12);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_toml_is_config_error() {
    clear_env();
    let file = write_config("port = \"not a number\"\n");

    let result = TomlConfig::load(Some(file.path()));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_config_path_from_env() {
    clear_env();
    let file = write_config("port = 6123\n");
    env::set_var("SIHOOK_CONFIG", file.path());

    let config = TomlConfig::load(None).unwrap();
    assert_eq!(config.port, 6123);

    clear_env();
}
