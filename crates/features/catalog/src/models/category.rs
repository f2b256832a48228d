use super::validation::{MAX_SHORT_TEXT, MAX_TEXT};
use super::{Model, ValidationErrors, default_true};
use crate::admin::query::Related;
use encore_derive::api_model;
use encore_domain::constants::CATEGORY_TABLE;

/// Top-level grouping of instruments (e.g. Strings, Percussion, Keys).
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq, Eq)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Icon identifier, e.g. `fa-guitar`
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            friendly_name: None,
            description: None,
            icon: None,
            display_order: 0,
            is_active: true,
        }
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        self.friendly_name.as_deref()
    }
}

impl Model for Category {
    const TABLE: &'static str = CATEGORY_TABLE;

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
        errors.text("name", &self.name, MAX_TEXT);
        errors.max_length("friendly_name", self.friendly_name.as_deref(), MAX_TEXT);
        errors.max_length("icon", self.icon.as_deref(), MAX_SHORT_TEXT);
        errors.into_result()
    }

    fn title(&self, _related: &Related) -> String {
        self.name.clone()
    }
}
