//! Storage shapes of the catalog entities.
//!
//! Records keep the public id in `uid`, money as integer cents and timestamps as RFC 3339
//! strings, so only plain scalar values cross the database boundary.

use super::Stored;
use crate::error::CatalogError;
use crate::models::{
    Accessory, AccessoryCategory, Category, InstrumentType, InsuranceOption, Product,
    SubscriptionDuration, SubscriptionPlan,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use surrealdb::types::SurrealValue;

const CENTS_SCALE: u32 = 2;

pub(crate) fn to_cents(field: &str, value: Decimal) -> Result<i64, CatalogError> {
    let mut scaled = value.round_dp(CENTS_SCALE);
    scaled.rescale(CENTS_SCALE);
    i64::try_from(scaled.mantissa()).map_err(|_| CatalogError::Internal {
        message: format!("{field} is out of range: {value}").into(),
        context: None,
    })
}

pub(crate) fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, CENTS_SCALE)
}

fn optional_cents(field: &str, value: Option<Decimal>) -> Result<Option<i64>, CatalogError> {
    value.map(|v| to_cents(field, v)).transpose()
}

fn timestamp(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|t| t.to_rfc3339_opts(SecondsFormat::Micros, true))
}

fn parse_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>, CatalogError> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw).map(|t| t.to_utc()).map_err(|e| {
                CatalogError::Internal {
                    message: format!("Invalid stored timestamp '{raw}': {e}").into(),
                    context: None,
                }
            })
        })
        .transpose()
}

#[derive(Debug, Clone, SurrealValue)]
pub struct CategoryRecord {
    pub uid: String,
    pub name: String,
    pub friendly_name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
}

impl Stored for Category {
    type Record = CategoryRecord;

    fn to_record(&self) -> Result<Self::Record, CatalogError> {
        Ok(CategoryRecord {
            uid: self.id.clone(),
            name: self.name.clone(),
            friendly_name: self.friendly_name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            display_order: self.display_order,
            is_active: self.is_active,
        })
    }

    fn from_record(record: Self::Record) -> Result<Self, CatalogError> {
        Ok(Self {
            id: record.uid,
            name: record.name,
            friendly_name: record.friendly_name,
            description: record.description,
            icon: record.icon,
            display_order: record.display_order,
            is_active: record.is_active,
        })
    }
}

#[derive(Debug, Clone, SurrealValue)]
pub struct InstrumentTypeRecord {
    pub uid: String,
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub display_order: i64,
    pub is_active: bool,
}

impl Stored for InstrumentType {
    type Record = InstrumentTypeRecord;

    fn to_record(&self) -> Result<Self::Record, CatalogError> {
        Ok(InstrumentTypeRecord {
            uid: self.id.clone(),
            category: self.category.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            display_order: self.display_order,
            is_active: self.is_active,
        })
    }

    fn from_record(record: Self::Record) -> Result<Self, CatalogError> {
        Ok(Self {
            id: record.uid,
            category: record.category,
            name: record.name,
            description: record.description,
            image: record.image,
            display_order: record.display_order,
            is_active: record.is_active,
        })
    }
}

#[derive(Debug, Clone, SurrealValue)]
pub struct ProductRecord {
    pub uid: String,
    pub category: Option<String>,
    pub instrument_type: Option<String>,
    pub sku: Option<String>,
    pub name: String,
    pub description: String,
    pub long_description: Option<String>,
    pub has_sizes: Option<bool>,
    pub is_rental_available: bool,
    pub is_purchase_available: bool,
    pub rental_price_monthly: Option<i64>,
    pub purchase_price: Option<i64>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub condition: Option<String>,
    pub year_made: Option<i64>,
    pub image_url: Option<String>,
    pub image: Option<String>,
    pub sound_sample_url: Option<String>,
    pub video_url: Option<String>,
    pub rating: Option<i64>,
    pub review_count: i64,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Stored for Product {
    type Record = ProductRecord;

    fn to_record(&self) -> Result<Self::Record, CatalogError> {
        Ok(ProductRecord {
            uid: self.id.clone(),
            category: self.category.clone(),
            instrument_type: self.instrument_type.clone(),
            sku: self.sku.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            long_description: self.long_description.clone(),
            has_sizes: self.has_sizes,
            is_rental_available: self.is_rental_available,
            is_purchase_available: self.is_purchase_available,
            rental_price_monthly: optional_cents(
                "rental_price_monthly",
                self.rental_price_monthly,
            )?,
            purchase_price: optional_cents("purchase_price", self.purchase_price)?,
            brand: self.brand.clone(),
            model: self.model.clone(),
            condition: self.condition.clone(),
            year_made: self.year_made,
            image_url: self.image_url.clone(),
            image: self.image.clone(),
            sound_sample_url: self.sound_sample_url.clone(),
            video_url: self.video_url.clone(),
            rating: optional_cents("rating", self.rating)?,
            review_count: self.review_count,
            stock_quantity: self.stock_quantity,
            is_active: self.is_active,
            created_at: timestamp(self.created_at),
            updated_at: timestamp(self.updated_at),
        })
    }

    fn from_record(record: Self::Record) -> Result<Self, CatalogError> {
        Ok(Self {
            id: record.uid,
            category: record.category,
            instrument_type: record.instrument_type,
            sku: record.sku,
            name: record.name,
            description: record.description,
            long_description: record.long_description,
            has_sizes: record.has_sizes,
            is_rental_available: record.is_rental_available,
            is_purchase_available: record.is_purchase_available,
            rental_price_monthly: record.rental_price_monthly.map(from_cents),
            purchase_price: record.purchase_price.map(from_cents),
            brand: record.brand,
            model: record.model,
            condition: record.condition,
            year_made: record.year_made,
            image_url: record.image_url,
            image: record.image,
            sound_sample_url: record.sound_sample_url,
            video_url: record.video_url,
            rating: record.rating.map(from_cents),
            review_count: record.review_count,
            stock_quantity: record.stock_quantity,
            is_active: record.is_active,
            created_at: parse_timestamp(record.created_at)?,
            updated_at: parse_timestamp(record.updated_at)?,
        })
    }
}

#[derive(Debug, Clone, SurrealValue)]
pub struct AccessoryRecord {
    pub uid: String,
    pub category: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub image: Option<String>,
    pub stock_quantity: i64,
    pub is_active: bool,
    pub created_at: Option<String>,
}

impl Stored for Accessory {
    type Record = AccessoryRecord;

    fn to_record(&self) -> Result<Self::Record, CatalogError> {
        Ok(AccessoryRecord {
            uid: self.id.clone(),
            category: self.category.as_ref().to_owned(),
            name: self.name.clone(),
            description: self.description.clone(),
            price: to_cents("price", self.price)?,
            image: self.image.clone(),
            stock_quantity: self.stock_quantity,
            is_active: self.is_active,
            created_at: timestamp(self.created_at),
        })
    }

    fn from_record(record: Self::Record) -> Result<Self, CatalogError> {
        let category = AccessoryCategory::from_str(&record.category).map_err(|_| {
            CatalogError::Internal {
                message: format!("Unknown stored accessory category '{}'", record.category).into(),
                context: None,
            }
        })?;

        Ok(Self {
            id: record.uid,
            category,
            name: record.name,
            description: record.description,
            price: from_cents(record.price),
            image: record.image,
            stock_quantity: record.stock_quantity,
            is_active: record.is_active,
            created_at: parse_timestamp(record.created_at)?,
        })
    }
}

#[derive(Debug, Clone, SurrealValue)]
pub struct SubscriptionPlanRecord {
    pub uid: String,
    pub name: String,
    pub duration_months: i64,
    pub monthly_price: i64,
    pub total_price: i64,
    pub discount_percentage: i64,
    pub is_popular: bool,
    pub description: String,
    pub features: String,
    pub is_active: bool,
}

impl Stored for SubscriptionPlan {
    type Record = SubscriptionPlanRecord;

    fn to_record(&self) -> Result<Self::Record, CatalogError> {
        Ok(SubscriptionPlanRecord {
            uid: self.id.clone(),
            name: self.name.clone(),
            duration_months: i64::from(self.duration_months.months()),
            monthly_price: to_cents("monthly_price", self.monthly_price)?,
            total_price: to_cents("total_price", self.total_price)?,
            discount_percentage: to_cents("discount_percentage", self.discount_percentage)?,
            is_popular: self.is_popular,
            description: self.description.clone(),
            features: self.features.clone(),
            is_active: self.is_active,
        })
    }

    fn from_record(record: Self::Record) -> Result<Self, CatalogError> {
        let duration_months = u8::try_from(record.duration_months)
            .map_err(|e| e.to_string())
            .and_then(SubscriptionDuration::try_from)
            .map_err(|message| CatalogError::Internal {
                message: format!("Invalid stored duration: {message}").into(),
                context: None,
            })?;

        Ok(Self {
            id: record.uid,
            name: record.name,
            duration_months,
            monthly_price: from_cents(record.monthly_price),
            total_price: from_cents(record.total_price),
            discount_percentage: from_cents(record.discount_percentage),
            is_popular: record.is_popular,
            description: record.description,
            features: record.features,
            is_active: record.is_active,
        })
    }
}

#[derive(Debug, Clone, SurrealValue)]
pub struct InsuranceOptionRecord {
    pub uid: String,
    pub name: String,
    pub description: String,
    pub monthly_cost: i64,
    pub coverage_amount: i64,
    pub deductible: i64,
    pub is_active: bool,
}

impl Stored for InsuranceOption {
    type Record = InsuranceOptionRecord;

    fn to_record(&self) -> Result<Self::Record, CatalogError> {
        Ok(InsuranceOptionRecord {
            uid: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            monthly_cost: to_cents("monthly_cost", self.monthly_cost)?,
            coverage_amount: to_cents("coverage_amount", self.coverage_amount)?,
            deductible: to_cents("deductible", self.deductible)?,
            is_active: self.is_active,
        })
    }

    fn from_record(record: Self::Record) -> Result<Self, CatalogError> {
        Ok(Self {
            id: record.uid,
            name: record.name,
            description: record.description,
            monthly_cost: from_cents(record.monthly_cost),
            coverage_amount: from_cents(record.coverage_amount),
            deductible: from_cents(record.deductible),
            is_active: record.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_conversion() {
        assert_eq!(to_cents("price", Decimal::from_str("24.99").unwrap()).unwrap(), 2499);
        assert_eq!(to_cents("price", Decimal::from_str("7").unwrap()).unwrap(), 700);
        assert_eq!(from_cents(30000).to_string(), "300.00");
    }

    #[test]
    fn product_record_preserves_prices_and_timestamps() {
        let mut product = Product::new("Viola", "Student viola");
        product.id = "AB12cd34EF56".to_owned();
        product.rental_price_monthly = Some(Decimal::from_str("35.50").unwrap());
        product.created_at = Some(Utc::now());

        let restored = Product::from_record(product.to_record().unwrap()).unwrap();
        assert_eq!(restored.rental_price_monthly, product.rental_price_monthly);
        assert_eq!(restored.purchase_price, None);
        assert_eq!(
            restored.created_at.map(|t| t.timestamp_micros()),
            product.created_at.map(|t| t.timestamp_micros())
        );
    }

    #[test]
    fn corrupt_duration_is_reported() {
        let record = SubscriptionPlanRecord {
            uid: "plan".to_owned(),
            name: "Odd".to_owned(),
            duration_months: 5,
            monthly_price: 100,
            total_price: 500,
            discount_percentage: 0,
            is_popular: false,
            description: "d".to_owned(),
            features: "f".to_owned(),
            is_active: true,
        };
        assert!(matches!(
            SubscriptionPlan::from_record(record),
            Err(CatalogError::Internal { .. })
        ));
    }
}
