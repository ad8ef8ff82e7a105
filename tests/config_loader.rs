use mvu_state::config::{Config, ConfigError, CounterConfig, RuntimeConfig};

/// Test that Config::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.runtime.max_transitions_per_dispatch, 10_000);
    assert_eq!(config.counter.click_limit, 30);
    assert_eq!(config.counter.click_step, 5);
    assert_eq!(config.counter.tick_ms, 250);
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("mvu-state/config.toml"));
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_parse_valid_toml() {
    let toml_content = r#"
[runtime]
max_transitions_per_dispatch = 64

[counter]
click_limit = 12
click_step = 2
tick_ms = 100
"#;

    let config: Config = toml::from_str(toml_content).expect("Should parse valid TOML");

    assert_eq!(config.runtime.max_transitions_per_dispatch, 64);
    assert_eq!(
        config.counter,
        CounterConfig {
            click_limit: 12,
            click_step: 2,
            tick_ms: 100,
        }
    );
}

/// Missing sections and fields fall back to their defaults.
#[test]
fn test_partial_toml_uses_defaults() {
    let config: Config = toml::from_str("[counter]\nclick_limit = 3\n").unwrap();

    assert_eq!(config.runtime, RuntimeConfig::default());
    assert_eq!(config.counter.click_limit, 3);
    assert_eq!(config.counter.click_step, 5);

    let empty: Config = toml::from_str("").unwrap();
    assert_eq!(empty, Config::default());
}

#[test]
fn test_parse_invalid_toml() {
    let result: Result<Config, _> = toml::from_str("this is not valid toml [[[");
    assert!(result.is_err());
}

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let serialized = toml::to_string(&original).expect("Should serialize");
    let deserialized: Config = toml::from_str(&serialized).expect("Should deserialize");
    assert_eq!(original, deserialized);
}

#[test]
fn test_validation_fails_zero_transition_limit() {
    let mut config = Config::default();
    config.runtime.max_transitions_per_dispatch = 0;

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => {
            assert!(message.contains("max_transitions_per_dispatch"));
        }
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_validation_fails_zero_click_step() {
    let mut config = Config::default();
    config.counter.click_step = 0;

    match config.validate().unwrap_err() {
        ConfigError::ValidationError { message } => assert!(message.contains("click_step")),
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_validation_fails_zero_tick() {
    let mut config = Config::default();
    config.counter.tick_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

/// This tests the real user flow: write TOML → load → validate.
#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[counter]\nclick_limit = 8\n").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert_eq!(config.counter.click_limit, 8);
    assert_eq!(config.runtime, RuntimeConfig::default());
}

#[test]
fn test_load_from_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[runtime]\nmax_transitions_per_dispatch = 0\n").unwrap();

    let result = Config::load_from(&path);

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}

#[test]
fn test_load_from_reports_parse_error_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[counter\nclick_limit = ").unwrap();

    match Config::load_from(&path).unwrap_err() {
        ConfigError::ParseError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_load_from_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Config::load_from(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ReadError { .. }));
    assert!(err.to_string().starts_with("Failed to read config file"));
}
