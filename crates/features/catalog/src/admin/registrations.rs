use super::{AdminSite, Choice, ModelAdmin};
use crate::models::{
    Accessory, AccessoryCategory, Category, InstrumentType, InsuranceOption, Model, Product,
    SubscriptionDuration, SubscriptionPlan,
};
use strum::IntoEnumIterator;

pub(super) fn catalog_site() -> AdminSite {
    let mut site = AdminSite::new();
    site.register(category());
    site.register(instrument_type());
    site.register(accessory());
    site.register(subscription_plan());
    site.register(insurance_option());
    site.register(product());
    site
}

fn category() -> ModelAdmin {
    ModelAdmin::new(Category::TABLE, "Category")
        .plural("Categories")
        .list_display(&["name", "friendly_name", "display_order", "is_active"])
        .list_editable(&["display_order", "is_active"])
        .list_filter(&["is_active"])
        .search_fields(&["name", "friendly_name"])
        .model_ordering(&["display_order", "name"])
        .fieldset("Basic Information", &["name", "friendly_name", "description"])
        .fieldset("Display Settings", &["icon", "display_order", "is_active"])
        .inline(
            InstrumentType::TABLE,
            "category",
            &["name", "description", "image", "display_order", "is_active"],
            1,
        )
}

fn instrument_type() -> ModelAdmin {
    ModelAdmin::new(InstrumentType::TABLE, "Instrument type")
        .list_display(&["name", "category", "display_order", "is_active"])
        .list_editable(&["display_order", "is_active"])
        .list_filter(&["category", "is_active"])
        .search_fields(&["name", "category__name"])
        .ordering(&["category", "display_order"])
        .model_ordering(&["display_order", "name"])
}

fn product() -> ModelAdmin {
    ModelAdmin::new(Product::TABLE, "Product")
        .list_display(&[
            "name",
            "category",
            "instrument_type",
            "brand",
            "model",
            "rental_price_monthly",
            "purchase_price",
            "stock_quantity",
            "is_active",
        ])
        .list_editable(&["is_active", "stock_quantity"])
        .list_filter(&[
            "category",
            "instrument_type",
            "is_rental_available",
            "is_purchase_available",
            "condition",
            "is_active",
        ])
        .search_fields(&["name", "brand", "model", "description"])
        .ordering(&["category", "instrument_type", "name"])
        .model_ordering(&["category", "instrument_type", "name"])
        .fieldset(
            "Basic Information",
            &["name", "category", "instrument_type", "description", "long_description"],
        )
        .fieldset("Product Details", &["brand", "model", "condition", "year_made", "sku"])
        .fieldset(
            "Pricing & Options",
            &[
                "rental_price_monthly",
                "purchase_price",
                "is_rental_available",
                "is_purchase_available",
                "has_sizes",
            ],
        )
        .fieldset("Media", &["image", "image_url", "sound_sample_url", "video_url"])
        .fieldset("Availability", &["stock_quantity", "is_active"])
}

fn accessory() -> ModelAdmin {
    let categories = AccessoryCategory::iter()
        .map(|c| Choice { value: c.as_ref().into(), label: c.label().to_owned() })
        .collect();

    ModelAdmin::new(Accessory::TABLE, "Accessory")
        .plural("Accessories")
        .list_display(&["name", "category", "price", "stock_quantity", "is_active"])
        .list_editable(&["price", "stock_quantity", "is_active"])
        .list_filter(&["category", "is_active"])
        .search_fields(&["name", "description"])
        .ordering(&["category", "name"])
        .model_ordering(&["category", "name"])
        .choices("category", categories)
}

fn subscription_plan() -> ModelAdmin {
    let durations = SubscriptionDuration::iter()
        .map(|d| Choice { value: d.months().into(), label: d.label() })
        .collect();

    ModelAdmin::new(SubscriptionPlan::TABLE, "Subscription plan")
        .list_display(&[
            "name",
            "duration_months",
            "monthly_price",
            "total_price",
            "discount_percentage",
            "is_popular",
            "is_active",
        ])
        .list_editable(&["monthly_price", "discount_percentage", "is_popular", "is_active"])
        .list_filter(&["duration_months", "is_popular", "is_active"])
        .search_fields(&["name", "description"])
        .ordering(&["duration_months"])
        .model_ordering(&["duration_months"])
        .fieldset("Basic Information", &["name", "duration_months", "description"])
        .fieldset("Pricing", &["monthly_price", "discount_percentage"])
        .fieldset("Features", &["features", "is_popular", "is_active"])
        .choices("duration_months", durations)
}

fn insurance_option() -> ModelAdmin {
    ModelAdmin::new(InsuranceOption::TABLE, "Insurance option")
        .list_display(&["name", "monthly_cost", "coverage_amount", "deductible", "is_active"])
        .list_editable(&["monthly_cost", "coverage_amount", "deductible", "is_active"])
        .list_filter(&["is_active"])
        .search_fields(&["name", "description"])
        .ordering(&["name"])
}
