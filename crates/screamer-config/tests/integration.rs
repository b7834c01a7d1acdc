//! Integration tests for screamer-config file handling.

use screamer_config::{ConfigError, EngineConfig, Oversampling, factory_preset};
use tempfile::TempDir;

#[test]
fn save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = factory_preset("dark").unwrap().config().unwrap();
    config.engine.max_block_size = 128;
    config.save(&path).unwrap();

    let loaded = EngineConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.engine.oversampling, Oversampling::High);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        EngineConfig::load(&path),
        Err(ConfigError::ReadFile { .. })
    ));
    assert_eq!(
        EngineConfig::load_or_default(&path).unwrap(),
        EngineConfig::default()
    );
}

#[test]
fn invalid_file_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[params\ndrive = ").unwrap();
    assert!(matches!(
        EngineConfig::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn invalid_config_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = EngineConfig::default();
    config.engine.channels = 5;
    assert!(matches!(config.save(&path), Err(ConfigError::Invalid(_))));
    assert!(!path.exists());
}

#[test]
fn preset_drives_a_processor() {
    let config = factory_preset("transparent").unwrap().config().unwrap();
    let mut pedal = config.build(44100.0).unwrap();
    assert!(pedal.options().ramp_parameters);

    let mut left = vec![0.25f32; 512];
    let mut right = vec![-0.25f32; 512];
    pedal.process(&mut [&mut left, &mut right]).unwrap();
    assert!(left.iter().chain(&right).all(|s| s.is_finite()));
}
