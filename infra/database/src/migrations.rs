use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// Ledger table that records every applied migration.
const BOOTSTRAP: &str = "
DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS migration_key ON migration FIELDS slice, version UNIQUE;
";

/// A versioned `SurrealQL` script contributed by a feature slice.
///
/// Migrations are applied in the order they are registered, once per `(slice, version)` pair.
/// The SHA-256 checksum of the script is stored alongside, so an applied script that is later
/// edited is reported instead of silently skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Lowercase hex SHA-256 of the script body.
    #[must_use]
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.script.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

/// Outcome of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<Migration>,
    pub skipped: Vec<Migration>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct AppliedMigration {
    pub slice: String,
    pub version: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    #[must_use]
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        self.bootstrap().await?;

        let mut report = MigrationReport::default();
        let applied = self.get_migrations_map().await?;

        for migration in migrations {
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &existing.checksum)?;
                report.skipped.push(*migration);
                continue;
            }

            self.apply_migration(migration).await?;
            report.applied.push(*migration);
        }

        Ok(report)
    }

    async fn bootstrap(&self) -> Result<(), DatabaseError> {
        self.db
            .query(BOOTSTRAP)
            .await
            .context("Defining migration ledger")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Defining migration ledger")?;

        Ok(())
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum }} RETURN NONE;
            COMMIT TRANSACTION;",
            migration.script,
        );

        let context = format!("SQL execution failed at {}", migration.key());

        self.db
            .query(query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", migration.checksum()))
            .await
            .context(context.clone())?
            .check()
            .map_err(surrealdb::Error::from)
            .context(context)?;

        Ok(())
    }

    async fn get_migrations_map(
        &self,
    ) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing migrations map")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry))
            .collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let expected = migration.checksum();
    if existing != expected {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (stored {existing}, current {expected})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "DEFINE TABLE IF NOT EXISTS widget SCHEMALESS;";

    #[test]
    fn checksum_is_stable_hex_sha256() {
        let migration = Migration::new("demo", "0001", SCRIPT);
        let checksum = migration.checksum();
        assert_eq!(checksum.len(), 64);
        assert!(checksum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(checksum, Migration::new("other", "0002", SCRIPT).checksum());
    }

    #[test]
    fn checksum_mismatch_is_reported() {
        let migration = Migration::new("demo", "0001", SCRIPT);
        assert!(ensure_checksum_match(&migration, &migration.checksum()).is_ok());

        let err = ensure_checksum_match(&migration, "deadbeef").unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { .. }));
        assert!(err.to_string().contains("demo:0001"));
    }
}
