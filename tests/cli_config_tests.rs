//! Config loading behavior used by every command

use infractl::config::Config;
use tempfile::TempDir;

#[test]
fn test_partial_override_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    // A fully specified file written by `infractl init`, with one section edited
    let mut config = Config::default();
    config.aws.region = "eu-west-1".to_string();
    config.cleanup.snapshot_age_days = 60;
    config.save(&path).unwrap();

    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded.aws.region, "eu-west-1");
    assert_eq!(loaded.cleanup.snapshot_age_days, 60);
    // Untouched sections keep their defaults
    assert_eq!(loaded.cost.anomaly_days, 7);
    assert_eq!(loaded.cost.anomaly_threshold_percent, 50.0);
    assert_eq!(loaded.email.smtp_port, 587);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");
    let config = Config::load(Some(&missing)).unwrap();
    assert_eq!(config.aws.region, "us-east-1");
    assert_eq!(config.email.password_env, "INFRACTL_SMTP_PASSWORD");
}

#[test]
fn test_round_trip_is_lossless() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("rt.toml");

    let mut config = Config::default();
    config.email.sender = "ops@example.com".to_string();
    config.cost.anomaly_threshold_percent = 75.5;
    config.save(&path).unwrap();

    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded.email.sender, "ops@example.com");
    assert_eq!(loaded.cost.anomaly_threshold_percent, 75.5);
    assert_eq!(loaded.aws.pricing_location, "US East (N. Virginia)");
}
