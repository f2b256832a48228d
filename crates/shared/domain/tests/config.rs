use encore_domain::config::{ApiConfig, DatabaseConfig, LoggingConfig, ServerConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "encore");
    assert_eq!(db.database, "catalog");
    assert!(db.credentials.is_none());

    let logging = LoggingConfig::default();
    assert_eq!(logging.level, "info");
    assert!(logging.console);
    assert!(logging.directory.is_none());
    assert_eq!(logging.max_files, 10);
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": {
            "url": "ws://localhost:8000",
            "namespace": "shop",
            "database": "instruments",
            "credentials": { "username": "admin", "password": "secret" }
        },
        "logging": { "level": "debug", "json": true, "directory": "/var/log/encore" },
        "runtime": { "worker_threads": 2 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "shop");
    assert_eq!(cfg.database.credentials.as_ref().map(|c| c.username.as_str()), Some("admin"));
    assert_eq!(cfg.logging.level, "debug");
    assert!(cfg.logging.json);
    assert!(cfg.logging.console, "unset fields fall back to defaults");
    assert_eq!(cfg.runtime.worker_threads, Some(2));
}

#[test]
fn api_config_is_cheap_to_clone_and_copy_on_write() {
    let original = ApiConfig::default();
    let mut copy = original.clone();
    copy.server.port = 9000;

    assert_eq!(original.server.port, 4583);
    assert_eq!(copy.server.port, 9000);
}
