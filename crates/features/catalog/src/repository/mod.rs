//! `SurrealDB` persistence of catalog entities.

mod records;

pub use records::{
    AccessoryRecord, CategoryRecord, InstrumentTypeRecord, InsuranceOptionRecord, ProductRecord,
    SubscriptionPlanRecord,
};

use crate::error::CatalogError;
use crate::models::{Model, ValidationErrors};
use crate::relations;
use chrono::{DateTime, SubsecRound, Utc};
use encore_database::{Database, DatabaseErrorExt};
use encore_kernel::safe_nanoid;
use std::fmt::Debug;
use std::marker::PhantomData;
use surrealdb::types::SurrealValue;
use tracing::{debug, info, instrument};

/// A model with a storage record.
pub trait Stored: Model {
    type Record: SurrealValue + Clone + Debug + Send + Sync + 'static;

    fn to_record(&self) -> Result<Self::Record, CatalogError>;

    fn from_record(record: Self::Record) -> Result<Self, CatalogError>;
}

/// Table access for one model.
///
/// Writes run the model's save hook, validation and a reference check before touching the
/// database. Deletes apply the cascade/set-null rules of [`relations::RELATIONS`] in one
/// transaction.
#[derive(Debug, Clone)]
pub struct Repository<E> {
    db: Database,
    _model: PhantomData<fn() -> E>,
}

impl<E: Stored> Repository<E> {
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db, _model: PhantomData }
    }

    /// Every record of the table, in storage order.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn list(&self) -> Result<Vec<E>, CatalogError> {
        let records = self
            .db
            .query(format!("SELECT * OMIT id FROM {}", E::TABLE))
            .await
            .context("Listing records")?
            .take::<Vec<E::Record>>(0)
            .context("Decoding records")?;

        debug!(count = records.len(), "Records loaded");
        records.into_iter().map(E::from_record).collect()
    }

    /// Records whose `field` equals `value`. `field` must be a column name of the table.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn list_by(&self, field: &str, value: &str) -> Result<Vec<E>, CatalogError> {
        let records = self
            .db
            .query(format!("SELECT * OMIT id FROM {} WHERE {field} = $value", E::TABLE))
            .bind(("value", value.to_owned()))
            .await
            .context("Listing records by field")?
            .take::<Vec<E::Record>>(0)
            .context("Decoding records")?;

        records.into_iter().map(E::from_record).collect()
    }

    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn find(&self, id: &str) -> Result<Option<E>, CatalogError> {
        let mut records = self
            .db
            .query(format!("SELECT * OMIT id FROM {} WHERE uid = $uid LIMIT 1", E::TABLE))
            .bind(("uid", id.to_owned()))
            .await
            .context("Loading record")?
            .take::<Vec<E::Record>>(0)
            .context("Decoding record")?;

        records.pop().map(E::from_record).transpose()
    }

    /// # Errors
    /// [`CatalogError::NotFound`] when no record has this id.
    pub async fn get(&self, id: &str) -> Result<E, CatalogError> {
        self.find(id).await?.ok_or_else(|| CatalogError::not_found(E::TABLE, id))
    }

    pub async fn exists(&self, id: &str) -> Result<bool, CatalogError> {
        exists_in(&self.db, E::TABLE, id).await
    }

    /// Assigns a fresh id and stores the entity.
    ///
    /// Returns the entity as it reads back from storage, so money comes back at cent scale.
    ///
    /// # Errors
    /// [`CatalogError::Validation`] for constraint violations or dangling references.
    #[instrument(skip_all, fields(table = E::TABLE))]
    pub async fn insert(&self, mut entity: E) -> Result<E, CatalogError> {
        entity.set_id(safe_nanoid!());
        entity.prepare_save(now(), None);
        self.check(&entity).await?;
        let record = entity.to_record()?;

        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", E::TABLE))
            .bind(("data", record.clone()))
            .await
            .context("Creating record")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Creating record")?;

        info!(id = entity.id(), "Record created");
        E::from_record(record)
    }

    /// Replaces the stored record `id` with `entity`.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] for an unknown id, [`CatalogError::Validation`] as for inserts.
    #[instrument(skip(self, entity), fields(table = E::TABLE))]
    pub async fn update(&self, id: &str, entity: E) -> Result<E, CatalogError> {
        let record = self.stage(id, entity).await?;

        self.db
            .query(format!("UPDATE {} CONTENT $data WHERE uid = $uid RETURN NONE", E::TABLE))
            .bind(("data", record.clone()))
            .bind(("uid", id.to_owned()))
            .await
            .context("Updating record")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Updating record")?;

        info!("Record updated");
        E::from_record(record)
    }

    /// Replaces several records in one transaction.
    ///
    /// Every entity is checked before the transaction starts. Field errors are keyed
    /// `{id}.{field}`. A record deleted after the check fails the whole transaction.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] for an unknown id, [`CatalogError::Validation`] as for inserts.
    #[instrument(skip_all, fields(table = E::TABLE, count = entities.len()))]
    pub async fn update_many(&self, entities: Vec<(String, E)>) -> Result<Vec<E>, CatalogError> {
        let mut errors = ValidationErrors::new();
        let mut staged = Vec::with_capacity(entities.len());
        for (id, entity) in entities {
            match self.stage(&id, entity).await {
                Ok(record) => staged.push((id, record)),
                Err(CatalogError::Validation { errors: row_errors, .. }) => {
                    errors.extend_prefixed(&id, row_errors);
                },
                Err(other) => return Err(other),
            }
        }
        errors.into_result()?;

        if staged.is_empty() {
            return Ok(Vec::new());
        }

        let mut script = String::from("BEGIN TRANSACTION;\n");
        for index in 0..staged.len() {
            script.push_str(&format!(
                "IF (SELECT VALUE uid FROM {table} WHERE uid = $uid{index}) = [] {{ THROW 'missing ' + $uid{index}; }};\n\
                 UPDATE {table} CONTENT $data{index} WHERE uid = $uid{index} RETURN NONE;\n",
                table = E::TABLE,
            ));
        }
        script.push_str("COMMIT TRANSACTION;");

        let mut query = self.db.query(script);
        for (index, (id, record)) in staged.iter().enumerate() {
            query = query
                .bind((format!("uid{index}"), id.clone()))
                .bind((format!("data{index}"), record.clone()));
        }
        query
            .await
            .context("Updating records")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Updating records")?;

        info!(count = staged.len(), "Records updated");
        staged.into_iter().map(|(_, record)| E::from_record(record)).collect()
    }

    /// Deletes the record and applies the delete rules to dependent tables.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] for an unknown id.
    #[instrument(skip(self), fields(table = E::TABLE))]
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        if !self.exists(id).await? {
            return Err(CatalogError::not_found(E::TABLE, id));
        }

        self.db
            .query(relations::delete_script(E::TABLE))
            .bind(("uid", id.to_owned()))
            .await
            .context("Deleting record")?
            .check()
            .map_err(surrealdb::Error::from)
            .context("Deleting record")?;

        info!("Record deleted");
        Ok(())
    }

    /// Runs the save hook and the checks for `entity` stored as `id`.
    async fn stage(&self, id: &str, mut entity: E) -> Result<E::Record, CatalogError> {
        let previous = self.get(id).await?;
        entity.set_id(id.to_owned());
        entity.prepare_save(now(), Some(&previous));
        self.check(&entity).await?;
        entity.to_record()
    }

    async fn check(&self, entity: &E) -> Result<(), CatalogError> {
        let mut errors = entity.validate().err().unwrap_or_default();

        for (field, id) in entity.references() {
            let Some(relation) = relations::reference(E::TABLE, field) else { continue };
            if id.is_empty() || errors.contains(field) {
                continue;
            }
            if !exists_in(&self.db, relation.target, id).await? {
                errors.add(
                    field,
                    format!("Select a valid choice. {id} is not one of the available choices."),
                );
            }
        }

        errors.into_result().map_err(CatalogError::from)
    }
}

/// Current time at the precision timestamps are stored with.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Whether `table` holds a record with this id. `table` must be a catalog table name.
pub async fn exists_in(db: &Database, table: &str, id: &str) -> Result<bool, CatalogError> {
    let found = db
        .query(format!("SELECT VALUE uid FROM {table} WHERE uid = $uid LIMIT 1"))
        .bind(("uid", id.to_owned()))
        .await
        .context("Checking record")?
        .take::<Vec<String>>(0)
        .context("Decoding record check")?;

    Ok(!found.is_empty())
}

