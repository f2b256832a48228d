use encore_domain::config::LoggingConfig;
use encore_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn configured_directory_receives_json_lines() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        level: "debug".to_owned(),
        console: false,
        directory: Some(log_dir.clone()),
        json: true,
        max_files: 2,
        ..LoggingConfig::default()
    };

    let logger = Logger::from_config("integration-file-logging", &config)?;
    assert!(logger.guard().is_some());

    tracing::info!(product = "violin", "catalog entry saved");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let line = contents.lines().find(|l| l.contains("catalog entry saved")).expect("event line");
    assert!(line.trim_start().starts_with('{'), "file output should be JSON");
    assert!(line.contains("violin"));

    Ok(())
}
