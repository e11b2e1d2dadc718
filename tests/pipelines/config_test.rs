/*!
 * Configuration Tests
 * Defaults, JSON files and environment overrides
 */

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use sync_pipelines::{AckConfig, ConfigError, SensorConfig};

const ENV_VARS: &[&str] = &[
    "ACK_CONFIG",
    "ACK_WORKERS",
    "ACK_ITEMS",
    "SENSOR_CONFIG",
    "SENSOR_GENERATORS",
    "SENSOR_CYCLES",
    "SENSOR_CAPACITY",
    "SENSOR_INTERVAL_MS",
    "SENSOR_PERIOD_MS",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_env_defaults() {
    clear_env();
    assert_eq!(AckConfig::from_env().unwrap(), AckConfig::default());
    assert_eq!(SensorConfig::from_env().unwrap(), SensorConfig::default());
}

#[test]
#[serial]
fn test_env_overrides_fields() {
    clear_env();
    std::env::set_var("ACK_WORKERS", "6");
    std::env::set_var("SENSOR_CYCLES", "2");
    std::env::set_var("SENSOR_INTERVAL_MS", "250");

    let ack = AckConfig::from_env().unwrap();
    assert_eq!(ack.workers, 6);
    assert_eq!(ack.items, AckConfig::default().items);

    let sensor = SensorConfig::from_env().unwrap();
    assert_eq!(sensor.cycles, 2);
    assert_eq!(sensor.report_interval_ms, 250);

    clear_env();
}

#[test]
#[serial]
fn test_env_rejects_garbage() {
    clear_env();
    std::env::set_var("ACK_ITEMS", "lots");

    let err = AckConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Env { var: "ACK_ITEMS", .. }));

    clear_env();
}

#[test]
#[serial]
fn test_env_rejects_zero_workers() {
    clear_env();
    std::env::set_var("ACK_WORKERS", "0");
    assert!(matches!(
        AckConfig::from_env(),
        Err(ConfigError::Invalid { field: "workers", .. })
    ));
    clear_env();
}

#[test]
#[serial]
fn test_file_then_env_layering() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"generators": 3, "capacity": 90}}"#).unwrap();

    std::env::set_var("SENSOR_CONFIG", file.path());
    std::env::set_var("SENSOR_CAPACITY", "120");

    let config = SensorConfig::from_env().unwrap();
    assert_eq!(config.generators, 3);
    assert_eq!(config.capacity, 120);
    assert_eq!(config.window_width, SensorConfig::default().window_width);

    clear_env();
}

#[test]
fn test_from_file_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    assert!(matches!(
        AckConfig::from_file(file.path()),
        Err(ConfigError::Parse { .. })
    ));
    assert!(matches!(
        AckConfig::from_file("/nonexistent/ack.json"),
        Err(ConfigError::Io { .. })
    ));
}
