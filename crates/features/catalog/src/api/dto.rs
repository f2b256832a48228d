use crate::error::CatalogError;
use crate::models::{Accessory, Category, InstrumentType, Model, Product, SubscriptionPlan};
use crate::service::CategoryTree;
use encore_derive::api_model;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

/// A record of any admin model, with snake_case field names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct AdminRecord(pub Value);

impl AdminRecord {
    pub(super) fn from_model<E: Model>(item: &E) -> Result<Self, CatalogError> {
        Ok(Self(serde_json::to_value(item)?))
    }
}

/// Storefront product filters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Category id
    pub category: Option<String>,
    /// Instrument type id
    pub instrument_type: Option<String>,
}

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub title: String,
    pub instrument_types: Vec<InstrumentType>,
}

impl From<CategoryTree> for CategoryView {
    fn from(tree: CategoryTree) -> Self {
        Self {
            title: tree.category.display().to_owned(),
            category: tree.category,
            instrument_types: tree.instrument_types,
        }
    }
}

/// A product with its price labels.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    /// `€{price}/month` or `Rental not available`
    pub rental_price_display: String,
    /// `€{price}` or `Purchase not available`
    pub purchase_price_display: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            rental_price_display: product.rental_price_display(),
            purchase_price_display: product.purchase_price_display(),
            product,
        }
    }
}

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub struct AccessoryView {
    #[serde(flatten)]
    pub accessory: Accessory,
    pub title: String,
    pub category_label: String,
}

impl From<Accessory> for AccessoryView {
    fn from(accessory: Accessory) -> Self {
        Self {
            title: accessory.display(),
            category_label: accessory.category.label().to_owned(),
            accessory,
        }
    }
}

/// A subscription plan with its display texts and one entry per feature line.
#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub struct PlanView {
    #[serde(flatten)]
    pub plan: SubscriptionPlan,
    pub title: String,
    pub duration_label: String,
    pub features_list: Vec<String>,
}

impl From<SubscriptionPlan> for PlanView {
    fn from(plan: SubscriptionPlan) -> Self {
        Self {
            title: plan.display(),
            duration_label: plan.duration_months.label(),
            features_list: plan.features_list().map(str::to_owned).collect(),
            plan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn admin_record_is_documented_as_an_object() {
        let schema = serde_json::to_value(AdminRecord::schema()).unwrap();
        assert_eq!(schema["type"], "object");

        let record = AdminRecord::from_model(&Category::new("Strings")).unwrap();
        assert_eq!(serde_json::to_value(record).unwrap()["name"], "Strings");
    }
}
