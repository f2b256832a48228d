use super::validation::{MAX_IMAGE_PATH, MAX_SHORT_TEXT, MAX_TEXT, MAX_URL, MONEY, RATING};
use super::{Model, ValidationErrors, default_true};
use crate::admin::query::Related;
use chrono::{DateTime, Utc};
use encore_derive::api_model;
use encore_domain::constants::{CURRENCY_SYMBOL, PRODUCT_TABLE};
use rust_decimal::Decimal;

pub const RENTAL_NOT_AVAILABLE: &str = "Rental not available";
pub const PURCHASE_NOT_AVAILABLE: &str = "Purchase not available";

const fn some_false() -> Option<bool> {
    Some(false)
}

/// A rentable and/or purchasable instrument listing.
///
/// The availability flags and the prices are independent: a product may claim rental
/// availability without a rental price, in which case it displays as not available.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub instrument_type: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,

    #[serde(default = "some_false")]
    pub has_sizes: Option<bool>,
    #[serde(default = "default_true")]
    pub is_rental_available: bool,
    #[serde(default = "default_true")]
    pub is_purchase_available: bool,

    #[serde(default)]
    pub rental_price_monthly: Option<Decimal>,
    #[serde(default)]
    pub purchase_price: Option<Decimal>,

    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// New, Used, Vintage
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub year_made: Option<i64>,

    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub sound_sample_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,

    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub review_count: i64,

    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            category: None,
            instrument_type: None,
            sku: None,
            name: name.into(),
            description: description.into(),
            long_description: None,
            has_sizes: Some(false),
            is_rental_available: true,
            is_purchase_available: true,
            rental_price_monthly: None,
            purchase_price: None,
            brand: None,
            model: None,
            condition: None,
            year_made: None,
            image_url: None,
            image: None,
            sound_sample_url: None,
            video_url: None,
            rating: None,
            review_count: 0,
            stock_quantity: 0,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn display(&self) -> &str {
        &self.name
    }

    /// `€{price}/month`, or [`RENTAL_NOT_AVAILABLE`] when no rental price is set.
    #[must_use]
    pub fn rental_price_display(&self) -> String {
        self.rental_price_monthly.map_or_else(
            || RENTAL_NOT_AVAILABLE.to_owned(),
            |price| format!("{CURRENCY_SYMBOL}{price:.2}/month"),
        )
    }

    /// `€{price}`, or [`PURCHASE_NOT_AVAILABLE`] when no purchase price is set.
    #[must_use]
    pub fn purchase_price_display(&self) -> String {
        self.purchase_price.map_or_else(
            || PURCHASE_NOT_AVAILABLE.to_owned(),
            |price| format!("{CURRENCY_SYMBOL}{price:.2}"),
        )
    }
}

impl Model for Product {
    const TABLE: &'static str = PRODUCT_TABLE;

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
        errors.max_length("sku", self.sku.as_deref(), MAX_TEXT);
        errors.max_length("brand", self.brand.as_deref(), MAX_TEXT);
        errors.max_length("model", self.model.as_deref(), MAX_TEXT);
        errors.max_length("condition", self.condition.as_deref(), MAX_SHORT_TEXT);
        errors.max_length("image", self.image.as_deref(), MAX_IMAGE_PATH);
        errors.url("image_url", self.image_url.as_deref(), MAX_URL);
        errors.url("sound_sample_url", self.sound_sample_url.as_deref(), MAX_URL);
        errors.url("video_url", self.video_url.as_deref(), MAX_URL);
        errors.decimal("rental_price_monthly", self.rental_price_monthly, MONEY);
        errors.decimal("purchase_price", self.purchase_price, MONEY);
        errors.decimal("rating", self.rating, RATING);
        errors.into_result()
    }

    fn prepare_save(&mut self, now: DateTime<Utc>, previous: Option<&Self>) {
        self.created_at = previous.and_then(|p| p.created_at).or(Some(now));
        self.updated_at = Some(now);
    }

    fn references(&self) -> Vec<(&'static str, &str)> {
        let mut references = Vec::new();
        if let Some(category) = &self.category {
            references.push(("category", category.as_str()));
        }
        if let Some(instrument_type) = &self.instrument_type {
            references.push(("instrument_type", instrument_type.as_str()));
        }
        references
    }

    fn title(&self, _related: &Related) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn price_displays_follow_prices_only() {
        let mut product = Product::new("Student Violin", "A 4/4 violin");
        product.is_rental_available = true;
        product.is_purchase_available = true;
        assert_eq!(product.rental_price_display(), RENTAL_NOT_AVAILABLE);
        assert_eq!(product.purchase_price_display(), PURCHASE_NOT_AVAILABLE);

        product.is_rental_available = false;
        product.is_purchase_available = false;
        product.rental_price_monthly = Some(Decimal::from_str("19.5").unwrap());
        product.purchase_price = Some(Decimal::from_str("349.00").unwrap());
        assert_eq!(product.rental_price_display(), "€19.50/month");
        assert_eq!(product.purchase_price_display(), "€349.00");
    }

    #[test]
    fn zero_price_is_still_a_price() {
        let mut product = Product::new("Loaner Ukulele", "Free with any plan");
        product.rental_price_monthly = Some(Decimal::ZERO);
        assert_eq!(product.rental_price_display(), "€0.00/month");
    }

    #[test]
    fn timestamps_are_managed_on_save() {
        let created = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z").unwrap().to_utc();
        let later = DateTime::parse_from_rfc3339("2024-02-01T10:00:00Z").unwrap().to_utc();

        let mut original = Product::new("Cello", "Full size");
        original.created_at = Some(later);
        original.prepare_save(created, None);
        assert_eq!(original.created_at, Some(created));
        assert_eq!(original.updated_at, Some(created));

        let mut edited = original.clone();
        edited.created_at = None;
        edited.prepare_save(later, Some(&original));
        assert_eq!(edited.created_at, Some(created));
        assert_eq!(edited.updated_at, Some(later));
    }
}
