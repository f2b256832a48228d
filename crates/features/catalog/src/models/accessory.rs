use super::validation::{MAX_IMAGE_PATH, MAX_TEXT, MONEY};
use super::{Model, ValidationErrors, default_true};
use crate::admin::query::Related;
use chrono::{DateTime, Utc};
use encore_derive::api_model;
use encore_domain::constants::ACCESSORY_TABLE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};

/// Fixed accessory groups. Serialized by their lowercase key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccessoryCategory {
    Picks,
    Straps,
    Cables,
    Cases,
    Stands,
    Maintenance,
    Other,
}

impl AccessoryCategory {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Picks => "Picks & Plectrums",
            Self::Straps => "Straps & Harnesses",
            Self::Cables => "Cables & Connectors",
            Self::Cases => "Cases & Bags",
            Self::Stands => "Stands & Holders",
            Self::Maintenance => "Maintenance & Care",
            Self::Other => "Other Accessories",
        }
    }
}

/// Non-instrument add-on item (picks, straps, cables, cases).
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct Accessory {
    #[serde(default)]
    pub id: String,
    pub category: AccessoryCategory,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Accessory {
    #[must_use]
    pub fn new(
        category: AccessoryCategory,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: String::new(),
            category,
            name: name.into(),
            description: description.into(),
            price,
            image: None,
            stock_quantity: 0,
            is_active: true,
            created_at: None,
        }
    }

    /// `"{category label} - {name}"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} - {}", self.category.label(), self.name)
    }
}

impl Model for Accessory {
    const TABLE: &'static str = ACCESSORY_TABLE;

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
        errors.require("description", &self.description);
        errors.decimal("price", Some(self.price), MONEY);
        errors.max_length("image", self.image.as_deref(), MAX_IMAGE_PATH);
        errors.into_result()
    }

    fn prepare_save(&mut self, now: DateTime<Utc>, previous: Option<&Self>) {
        self.created_at = previous.and_then(|p| p.created_at).or(Some(now));
    }

    fn title(&self, _related: &Related) -> String {
        self.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn category_keys_and_labels() {
        let keys: Vec<String> = AccessoryCategory::iter().map(|c| c.as_ref().to_owned()).collect();
        assert_eq!(keys, ["picks", "straps", "cables", "cases", "stands", "maintenance", "other"]);
        assert_eq!(AccessoryCategory::from_str("cases").unwrap(), AccessoryCategory::Cases);
        assert!(AccessoryCategory::from_str("drums").is_err());
    }

    #[test]
    fn display_uses_category_label() {
        let strap = Accessory::new(
            AccessoryCategory::Straps,
            "Leather Strap",
            "Padded",
            Decimal::new(2499, 2),
        );
        assert_eq!(strap.display(), "Straps & Harnesses - Leather Strap");
    }

    #[test]
    fn unknown_category_is_rejected_on_input() {
        let payload = serde_json::json!({
            "category": "drums",
            "name": "Snare",
            "description": "Nope",
            "price": "10.00",
        });
        assert!(serde_json::from_value::<Accessory>(payload).is_err());
    }
}
