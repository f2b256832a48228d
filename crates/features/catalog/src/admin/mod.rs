//! Declarative admin registry.
//!
//! A [`ModelAdmin`] describes how one model appears in the admin: list columns, inline-editable
//! columns, filters, search fields, ordering, form fieldsets and inline child models. The
//! [`AdminSite`] owns every registration and resolves model keys coming from the HTTP layer.

pub mod query;
mod registrations;

use crate::error::CatalogError;
use encore_derive::api_model;

/// A titled group of form fields.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq, Eq)]
pub struct Fieldset {
    pub title: String,
    pub fields: Vec<String>,
}

/// A child model edited together with its parent.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq, Eq)]
pub struct InlineAdmin {
    pub model: String,
    /// Field of the child pointing at the parent
    pub fk_field: String,
    pub fields: Vec<String>,
    /// Number of empty forms offered
    pub extra: u32,
}

/// One selectable value of a choice field.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct Choice {
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub value: serde_json::Value,
    pub label: String,
}

/// The allowed values of a field.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct FieldChoices {
    pub field: String,
    pub choices: Vec<Choice>,
}

/// Admin configuration of a single model.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct ModelAdmin {
    /// Model key, equal to the table name
    pub model: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
    pub list_display: Vec<String>,
    pub list_editable: Vec<String>,
    pub list_filter: Vec<String>,
    pub search_fields: Vec<String>,
    /// Change-list ordering; empty means the model ordering applies
    pub ordering: Vec<String>,
    /// Default ordering of the model itself
    pub model_ordering: Vec<String>,
    pub fieldsets: Vec<Fieldset>,
    pub inlines: Vec<InlineAdmin>,
    pub choices: Vec<FieldChoices>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

impl ModelAdmin {
    /// Starts a registration. The plural defaults to the name with an `s` appended.
    #[must_use]
    pub fn new(model: &str, verbose_name: &str) -> Self {
        Self {
            model: model.to_owned(),
            verbose_name: verbose_name.to_owned(),
            verbose_name_plural: format!("{verbose_name}s"),
            list_display: Vec::new(),
            list_editable: Vec::new(),
            list_filter: Vec::new(),
            search_fields: Vec::new(),
            ordering: Vec::new(),
            model_ordering: Vec::new(),
            fieldsets: Vec::new(),
            inlines: Vec::new(),
            choices: Vec::new(),
        }
    }

    #[must_use]
    pub fn plural(mut self, plural: &str) -> Self {
        self.verbose_name_plural = plural.to_owned();
        self
    }

    #[must_use]
    pub fn list_display(mut self, fields: &[&str]) -> Self {
        self.list_display = owned(fields);
        self
    }

    #[must_use]
    pub fn list_editable(mut self, fields: &[&str]) -> Self {
        self.list_editable = owned(fields);
        self
    }

    #[must_use]
    pub fn list_filter(mut self, fields: &[&str]) -> Self {
        self.list_filter = owned(fields);
        self
    }

    #[must_use]
    pub fn search_fields(mut self, fields: &[&str]) -> Self {
        self.search_fields = owned(fields);
        self
    }

    #[must_use]
    pub fn ordering(mut self, fields: &[&str]) -> Self {
        self.ordering = owned(fields);
        self
    }

    #[must_use]
    pub fn model_ordering(mut self, fields: &[&str]) -> Self {
        self.model_ordering = owned(fields);
        self
    }

    #[must_use]
    pub fn fieldset(mut self, title: &str, fields: &[&str]) -> Self {
        self.fieldsets.push(Fieldset { title: title.to_owned(), fields: owned(fields) });
        self
    }

    #[must_use]
    pub fn inline(mut self, model: &str, fk_field: &str, fields: &[&str], extra: u32) -> Self {
        self.inlines.push(InlineAdmin {
            model: model.to_owned(),
            fk_field: fk_field.to_owned(),
            fields: owned(fields),
            extra,
        });
        self
    }

    #[must_use]
    pub fn choices(mut self, field: &str, choices: Vec<Choice>) -> Self {
        self.choices.push(FieldChoices { field: field.to_owned(), choices });
        self
    }

    /// Admin ordering, falling back to the model ordering.
    #[must_use]
    pub fn effective_ordering(&self) -> &[String] {
        if self.ordering.is_empty() { &self.model_ordering } else { &self.ordering }
    }

    #[must_use]
    pub fn is_editable(&self, field: &str) -> bool {
        self.list_editable.iter().any(|f| f == field)
    }

    #[must_use]
    pub fn is_filterable(&self, field: &str) -> bool {
        self.list_filter.iter().any(|f| f == field)
    }
}

/// Summary of a registered model.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub model: String,
    pub verbose_name: String,
    pub verbose_name_plural: String,
}

/// Registry of admin-managed models, in registration order.
#[derive(Debug, Clone, Default)]
pub struct AdminSite {
    models: Vec<ModelAdmin>,
}

impl AdminSite {
    #[must_use]
    pub const fn new() -> Self {
        Self { models: Vec::new() }
    }

    /// The site with every catalog model registered.
    #[must_use]
    pub fn catalog() -> Self {
        registrations::catalog_site()
    }

    /// Adds a registration; a later registration of the same model replaces the earlier one.
    pub fn register(&mut self, admin: ModelAdmin) {
        if let Some(existing) = self.models.iter_mut().find(|m| m.model == admin.model) {
            *existing = admin;
        } else {
            self.models.push(admin);
        }
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelAdmin> {
        self.models.iter()
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<ModelSummary> {
        self.models
            .iter()
            .map(|m| ModelSummary {
                model: m.model.clone(),
                verbose_name: m.verbose_name.clone(),
                verbose_name_plural: m.verbose_name_plural.clone(),
            })
            .collect()
    }

    #[must_use]
    pub fn find(&self, model: &str) -> Option<&ModelAdmin> {
        self.models.iter().find(|m| m.model == model)
    }

    /// Resolves a model key.
    ///
    /// # Errors
    /// [`CatalogError::UnknownModel`] when nothing is registered under `model`.
    pub fn get(&self, model: &str) -> Result<&ModelAdmin, CatalogError> {
        self.find(model).ok_or_else(|| CatalogError::UnknownModel {
            message: model.to_owned().into(),
            context: None,
        })
    }
}
