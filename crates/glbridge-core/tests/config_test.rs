use glbridge_core::config::{BridgeConfig, ConfigError};

#[test]
fn test_empty_config_enables_error_checking() {
    let config = BridgeConfig::from_toml_str("").unwrap();
    assert!(config.checks.automatic_error_checking);
    assert!(config.driver.library_paths.is_empty());
    assert_eq!(config, BridgeConfig::default());
}

#[test]
fn test_parse_full_config() {
    let config = BridgeConfig::from_toml_str(
        r#"
        [checks]
        automatic_error_checking = false

        [driver]
        library_paths = ["/opt/mesa/lib/libGL.so.1"]
        "#,
    )
    .unwrap();
    assert!(!config.checks.automatic_error_checking);
    assert_eq!(config.driver.library_paths, vec!["/opt/mesa/lib/libGL.so.1"]);
}

#[test]
fn test_malformed_config_is_a_parse_error() {
    let err = BridgeConfig::from_toml_str("[checks]\nautomatic_error_checking = \"sometimes\"")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = BridgeConfig::load_or_default("/nonexistent/glbridge/glbridge.toml");
    assert_eq!(config, BridgeConfig::default());
}
