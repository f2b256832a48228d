//! Catalog use cases on top of the repository: admin change lists, record editing, inlines and
//! the read-only storefront views.

use crate::admin::query::{self, ChangeList, ChangeListQuery, Entry, Related};
use crate::admin::{AdminSite, InlineAdmin, ModelAdmin};
use crate::error::{CatalogError, CatalogErrorExt};
use crate::models::{
    Accessory, Category, InstrumentType, InsuranceOption, Model, Product, SubscriptionPlan,
    ValidationErrors,
};
use crate::relations;
use crate::repository::{self, Repository, Stored};
use encore_database::Database;
use encore_derive::api_model;
use encore_domain::constants::{CATEGORY_TABLE, INSTRUMENT_TYPE_TABLE};
use fxhash::FxHashMap;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// One row of a bulk change-list edit.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct ListEdit {
    pub id: String,
    /// New values of list-editable columns
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub changes: Map<String, Value>,
}

/// An active category with its active instrument types.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTree {
    pub category: Category,
    pub instrument_types: Vec<InstrumentType>,
}

/// Storefront product filters; `None` means any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub instrument_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CatalogService<'a> {
    db: &'a Database,
    site: &'a AdminSite,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database, site: &'a AdminSite) -> Self {
        Self { db, site }
    }

    #[must_use]
    pub const fn site(&self) -> &AdminSite {
        self.site
    }

    fn repository<E: Stored>(&self) -> Repository<E> {
        Repository::new(self.db.clone())
    }

    // --- Admin ---

    /// A filtered, searched, ordered and paginated change list of `E`.
    ///
    /// # Errors
    /// Unknown model, invalid filters or database failures.
    pub async fn change_list<E: Stored>(
        &self,
        query: &ChangeListQuery,
    ) -> Result<ChangeList, CatalogError> {
        let admin = self.site.get(E::TABLE)?;
        let related = self.load_related(E::TABLE).await?;
        let entries = self
            .repository::<E>()
            .list()
            .await?
            .iter()
            .map(|item| Entry::from_model(item, &related))
            .collect::<Result<Vec<_>, _>>()?;

        query::change_list(self.site, admin, entries, &related, query)
    }

    /// # Errors
    /// [`CatalogError::NotFound`] for an unknown id.
    pub async fn get<E: Stored>(&self, id: &str) -> Result<E, CatalogError> {
        self.repository::<E>().get(id).await
    }

    /// Decodes a JSON payload into `E` and stores it under a new id.
    ///
    /// # Errors
    /// Malformed payloads, constraint violations or database failures.
    pub async fn create<E: Stored>(&self, payload: Value) -> Result<E, CatalogError> {
        let entity: E = serde_json::from_value(payload).context("Decoding payload")?;
        self.repository::<E>().insert(entity).await
    }

    /// Replaces every field of record `id` with the payload.
    ///
    /// # Errors
    /// As for [`Self::create`], plus [`CatalogError::NotFound`].
    pub async fn replace<E: Stored>(&self, id: &str, payload: Value) -> Result<E, CatalogError> {
        let entity: E = serde_json::from_value(payload).context("Decoding payload")?;
        self.repository::<E>().update(id, entity).await
    }

    /// # Errors
    /// [`CatalogError::NotFound`] for an unknown id.
    pub async fn delete<E: Stored>(&self, id: &str) -> Result<(), CatalogError> {
        self.repository::<E>().delete(id).await
    }

    /// Applies change-list edits to several records.
    ///
    /// Every edit is checked before anything is written and the rows are saved in one
    /// transaction, so one bad row rejects the batch. Field errors are keyed `{id}.{field}`.
    ///
    /// # Errors
    /// [`CatalogError::Validation`] for non-editable fields or constraint violations,
    /// [`CatalogError::NotFound`] for unknown ids.
    pub async fn bulk_edit<E: Stored>(&self, edits: Vec<ListEdit>) -> Result<Vec<E>, CatalogError> {
        let admin = self.site.get(E::TABLE)?;
        let repository = self.repository::<E>();

        let mut errors = ValidationErrors::new();
        let mut staged = Vec::with_capacity(edits.len());
        for edit in edits {
            let current = repository.get(&edit.id).await?;
            match edited(admin, &current, edit.changes) {
                Ok(entity) => staged.push((edit.id, entity)),
                Err(CatalogError::Validation { errors: row_errors, .. }) => {
                    errors.extend_prefixed(&edit.id, row_errors);
                },
                Err(other) => return Err(other),
            }
        }
        errors.into_result()?;

        let saved = repository.update_many(staged).await?;
        info!(model = E::TABLE, count = saved.len(), "Change list edited");
        Ok(saved)
    }

    /// Child records of an inline, ordered by the child model ordering.
    ///
    /// # Errors
    /// [`CatalogError::UnknownModel`] when `C` is not an inline of `parent`,
    /// [`CatalogError::NotFound`] for an unknown parent.
    pub async fn inline_children<C: Stored>(
        &self,
        parent: &ModelAdmin,
        parent_id: &str,
    ) -> Result<Vec<C>, CatalogError> {
        let inline = inline_of::<C>(parent)?;
        self.require_parent(parent, parent_id).await?;

        let children = self.repository::<C>().list_by(&inline.fk_field, parent_id).await?;
        let related = self.load_related(C::TABLE).await?;
        sorted(self.site, children, &related)
    }

    /// Adds a child record through an inline. Only the inline's fields are accepted; the parent
    /// reference comes from `parent_id`.
    ///
    /// # Errors
    /// As for [`Self::inline_children`], plus validation of the submitted fields.
    pub async fn inline_create<C: Stored>(
        &self,
        parent: &ModelAdmin,
        parent_id: &str,
        mut fields: Map<String, Value>,
    ) -> Result<C, CatalogError> {
        let inline = inline_of::<C>(parent)?;
        self.require_parent(parent, parent_id).await?;

        let mut errors = ValidationErrors::new();
        for field in fields.keys().filter(|field| !inline.fields.contains(field)) {
            errors.add(field.as_str(), "This field is not part of the inline form.");
        }
        errors.into_result()?;

        fields.insert(inline.fk_field.clone(), Value::String(parent_id.to_owned()));
        let child: C = serde_json::from_value(Value::Object(fields)).context("Decoding inline")?;
        self.repository::<C>().insert(child).await
    }

    async fn require_parent(&self, parent: &ModelAdmin, id: &str) -> Result<(), CatalogError> {
        if repository::exists_in(self.db, &parent.model, id).await? {
            Ok(())
        } else {
            Err(CatalogError::not_found(&parent.model, id))
        }
    }

    /// Loads every record `table` refers to, parents first, for titles, lookups and ordering.
    async fn load_related(&self, table: &str) -> Result<Related, CatalogError> {
        let mut related = Related::new();
        for parent in relations::parents(table) {
            match parent {
                CATEGORY_TABLE => related.extend(&self.repository::<Category>().list().await?)?,
                INSTRUMENT_TYPE_TABLE => {
                    related.extend(&self.repository::<InstrumentType>().list().await?)?;
                },
                other => debug!(table = other, "No related loader for table"),
            }
        }
        Ok(related)
    }

    // --- Storefront ---

    /// Active categories with their active instrument types.
    ///
    /// # Errors
    /// Database failures.
    pub async fn category_tree(&self) -> Result<Vec<CategoryTree>, CatalogError> {
        let related = Related::new();
        let categories = self.active::<Category>(&related).await?;

        let mut categories_related = Related::new();
        categories_related.extend(&categories)?;
        let mut types_by_category: FxHashMap<String, Vec<InstrumentType>> = FxHashMap::default();
        for instrument_type in self.active::<InstrumentType>(&categories_related).await? {
            types_by_category.entry(instrument_type.category.clone()).or_default().push(instrument_type);
        }

        Ok(categories
            .into_iter()
            .map(|category| {
                let instrument_types = types_by_category.remove(&category.id).unwrap_or_default();
                CategoryTree { category, instrument_types }
            })
            .collect())
    }

    /// Active products matching the filter, in model order.
    ///
    /// # Errors
    /// Database failures.
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, CatalogError> {
        let related = self.load_related(Product::TABLE).await?;
        let mut products = self.active::<Product>(&related).await?;
        products.retain(|product| {
            matches(filter.category.as_deref(), product.category.as_deref())
                && matches(filter.instrument_type.as_deref(), product.instrument_type.as_deref())
        });
        Ok(products)
    }

    /// An active product.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] for unknown or inactive products.
    pub async fn product(&self, id: &str) -> Result<Product, CatalogError> {
        self.repository::<Product>()
            .find(id)
            .await?
            .filter(Product::is_active)
            .ok_or_else(|| CatalogError::not_found(Product::TABLE, id))
    }

    /// # Errors
    /// Database failures.
    pub async fn accessories(&self) -> Result<Vec<Accessory>, CatalogError> {
        self.active::<Accessory>(&Related::new()).await
    }

    /// # Errors
    /// Database failures.
    pub async fn plans(&self) -> Result<Vec<SubscriptionPlan>, CatalogError> {
        self.active::<SubscriptionPlan>(&Related::new()).await
    }

    /// # Errors
    /// Database failures.
    pub async fn insurance_options(&self) -> Result<Vec<InsuranceOption>, CatalogError> {
        self.active::<InsuranceOption>(&Related::new()).await
    }

    async fn active<E: Stored>(&self, related: &Related) -> Result<Vec<E>, CatalogError> {
        let mut items = self.repository::<E>().list().await?;
        items.retain(E::is_active);
        sorted(self.site, items, related)
    }
}

fn inline_of<C: Model>(parent: &ModelAdmin) -> Result<&InlineAdmin, CatalogError> {
    parent.inlines.iter().find(|inline| inline.model == C::TABLE).ok_or_else(|| {
        CatalogError::UnknownModel {
            message: format!("{} has no inline {}", parent.model, C::TABLE).into(),
            context: None,
        }
    })
}

fn matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|wanted| actual == Some(wanted))
}

/// Applies list edits to a copy of `current` and decodes the result.
fn edited<E: Model>(
    admin: &ModelAdmin,
    current: &E,
    changes: Map<String, Value>,
) -> Result<E, CatalogError> {
    let Value::Object(mut fields) = serde_json::to_value(current)? else {
        return Err(format!("{} does not serialize to an object", E::TABLE).into());
    };
    query::apply_edits(admin, &mut fields, changes)?;

    let entity: E = serde_json::from_value(Value::Object(fields)).context("Decoding edit")?;
    entity.validate()?;
    Ok(entity)
}

/// Sorts models by their model ordering.
///
/// # Errors
/// Serialization failures.
pub fn sorted<E: Model>(
    site: &AdminSite,
    items: Vec<E>,
    related: &Related,
) -> Result<Vec<E>, CatalogError> {
    let ordering = site.find(E::TABLE).map(|m| m.model_ordering.clone()).unwrap_or_default();
    let mut entries =
        items.iter().map(|item| Entry::from_model(item, related)).collect::<Result<Vec<_>, _>>()?;
    query::order_by(site, E::TABLE, &ordering, &mut entries, related);

    let mut by_id: FxHashMap<String, E> =
        items.into_iter().map(|item| (item.id().to_owned(), item)).collect();
    Ok(entries.iter().filter_map(|entry| by_id.remove(&entry.id)).collect())
}
