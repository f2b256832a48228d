use encore_database::*;

const WIDGETS_V1: &str = "
DEFINE TABLE IF NOT EXISTS widget SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS name ON widget TYPE string;
";

#[tokio::test]
async fn connect_in_memory_and_health_check() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .init()
        .await
        .expect("connect to mem://");

    assert!(db.is_healthy().await);
    assert_eq!(db.namespace(), "test_ns");
    assert_eq!(db.name(), "test_db");
    db.use_ns("test_ns").use_db("test_db").await.expect("session switch");
}

#[tokio::test]
async fn missing_parameters_fail_validation() {
    let err = Database::builder().init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

#[tokio::test]
async fn migrations_are_applied_and_recorded() {
    let db = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .migration(Migration::new("widgets", "0001", WIDGETS_V1))
        .init()
        .await
        .expect("migrated database");

    let mut response = db
        .query("SELECT VALUE checksum FROM migration WHERE slice = 'widgets'")
        .await
        .expect("ledger query");
    let checksums: Vec<String> = response.take(0).expect("checksums");
    assert_eq!(checksums, vec![Migration::new("widgets", "0001", WIDGETS_V1).checksum()]);

    db.query("CREATE widget SET name = 'lever'")
        .await
        .expect("insert")
        .check()
        .expect("schema accepts defined field");
}

#[tokio::test]
async fn failing_migration_surfaces_an_error() {
    let err = Database::builder()
        .url("mem://")
        .session("test_ns", "test_db")
        .migration(Migration::new("broken", "0001", "THIS IS NOT SURQL;"))
        .init()
        .await
        .unwrap_err();

    assert!(matches!(err, DatabaseError::Surreal { .. }));
}

#[test]
fn error_messages_include_their_context() {
    let err = DatabaseError::Connection {
        message: "engine unhealthy".into(),
        context: Some("mem://".into()),
    };
    let text = err.to_string();
    assert!(text.starts_with("Database connection failed"));
    assert!(text.contains("engine unhealthy"));
    assert!(text.contains("mem://"));
}
