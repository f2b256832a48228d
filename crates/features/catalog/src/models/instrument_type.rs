use super::validation::{MAX_IMAGE_PATH, MAX_TEXT};
use super::{Category, Model, ValidationErrors, default_true};
use crate::admin::query::Related;
use encore_derive::api_model;
use encore_domain::constants::{CATEGORY_TABLE, INSTRUMENT_TYPE_TABLE};

/// Specific instrument kind within a category (e.g. Electric Guitar).
///
/// Deleting the owning [`Category`] deletes its instrument types.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq, Eq)]
pub struct InstrumentType {
    #[serde(default)]
    pub id: String,
    /// Owning category id
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Stored image path
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl InstrumentType {
    #[must_use]
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            category: category.into(),
            name: name.into(),
            description: None,
            image: None,
            display_order: 0,
            is_active: true,
        }
    }

    /// `"{category} - {name}"`.
    #[must_use]
    pub fn display(&self, category: &Category) -> String {
        format!("{} - {}", category.name, self.name)
    }
}

impl Model for InstrumentType {
    const TABLE: &'static str = INSTRUMENT_TYPE_TABLE;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("category", &self.category);
        errors.text("name", &self.name, MAX_TEXT);
        errors.max_length("image", self.image.as_deref(), MAX_IMAGE_PATH);
        errors.into_result()
    }

    fn references(&self) -> Vec<(&'static str, &str)> {
        vec![("category", self.category.as_str())]
    }

    fn title(&self, related: &Related) -> String {
        match related.title(CATEGORY_TABLE, &self.category) {
            Some(category) => format!("{category} - {}", self.name),
            None => self.name.clone(),
        }
    }
}
