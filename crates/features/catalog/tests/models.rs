use chrono::Utc;
use encore_catalog::admin::query::Related;
use encore_catalog::models::{
    Accessory, AccessoryCategory, Category, InstrumentType, InsuranceOption, Model,
    PURCHASE_NOT_AVAILABLE, Product, RENTAL_NOT_AVAILABLE, SubscriptionDuration,
    SubscriptionPlan,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

fn duration() -> impl Strategy<Value = SubscriptionDuration> {
    prop_oneof![
        Just(SubscriptionDuration::ThreeMonths),
        Just(SubscriptionDuration::SixMonths),
        Just(SubscriptionDuration::TwelveMonths),
        Just(SubscriptionDuration::TwentyFourMonths),
    ]
}

/// Money values with at most 8 digits and 2 decimal places.
fn money() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #[test]
    fn total_price_is_monthly_times_months(
        monthly in money(),
        duration in duration(),
        supplied in money(),
    ) {
        let mut plan = SubscriptionPlan::new("Plan", duration, monthly);
        plan.total_price = supplied;
        plan.prepare_save(Utc::now(), None);

        prop_assert_eq!(plan.total_price, monthly * Decimal::from(duration.months()));
    }

    #[test]
    fn price_labels_are_unavailable_iff_price_is_missing(
        rental in proptest::option::of(money()),
        purchase in proptest::option::of(money()),
        rental_flag in any::<bool>(),
        purchase_flag in any::<bool>(),
    ) {
        let mut product = Product::new("Cello", "Full size cello");
        product.rental_price_monthly = rental;
        product.purchase_price = purchase;
        product.is_rental_available = rental_flag;
        product.is_purchase_available = purchase_flag;

        prop_assert_eq!(product.rental_price_display() == RENTAL_NOT_AVAILABLE, rental.is_none());
        prop_assert_eq!(product.purchase_price_display() == PURCHASE_NOT_AVAILABLE, purchase.is_none());
    }
}

#[test]
fn plan_total_follows_every_save() {
    let mut plan = SubscriptionPlan::new("Yearly", SubscriptionDuration::TwelveMonths, dec("25.50"));
    plan.prepare_save(Utc::now(), None);
    assert_eq!(plan.total_price, dec("306.00"));

    let previous = plan.clone();
    plan.monthly_price = dec("20.00");
    plan.duration_months = SubscriptionDuration::TwentyFourMonths;
    plan.prepare_save(Utc::now(), Some(&previous));
    assert_eq!(plan.total_price, dec("480.00"));
}

#[test]
fn plan_rejects_unknown_duration_in_payloads() {
    let payload = json!({
        "name": "Odd",
        "duration_months": 5,
        "monthly_price": "10.00",
        "description": "Five months",
        "features": "Nothing",
    });
    let err = serde_json::from_value::<SubscriptionPlan>(payload).unwrap_err();
    assert!(err.to_string().contains("Value 5 is not a valid choice."));
}

#[test]
fn decimals_serialize_as_strings() {
    let mut product = Product::new("Trumpet", "Bb trumpet");
    product.rental_price_monthly = Some(dec("35.50"));
    let value = serde_json::to_value(&product).unwrap();
    assert_eq!(value["rental_price_monthly"], json!("35.50"));
    assert_eq!(value["purchase_price"], json!(null));
    assert_eq!(product.rental_price_display(), "€35.50/month");
    assert_eq!(product.purchase_price_display(), "Purchase not available");
}

#[test]
fn payload_defaults_match_model_defaults() {
    let category: Category = serde_json::from_value(json!({ "name": "Strings" })).unwrap();
    assert!(category.is_active);
    assert_eq!(category.display_order, 0);
    assert!(category.id.is_empty());

    let product: Product =
        serde_json::from_value(json!({ "name": "Viola", "description": "Viola 16\"" })).unwrap();
    assert_eq!(product.has_sizes, Some(false));
    assert!(product.is_rental_available && product.is_purchase_available);
    assert_eq!(product.category, None);
}

#[test]
fn unknown_payload_fields_are_rejected() {
    let result = serde_json::from_value::<Category>(json!({ "name": "Keys", "colour": "red" }));
    assert!(result.is_err());
}

#[test]
fn display_strings() {
    let mut strings = Category::new("Strings");
    strings.id = "cat1".to_owned();
    let violin = InstrumentType::new("cat1", "Violin");
    assert_eq!(strings.display(), "Strings");
    assert_eq!(violin.display(&strings), "Strings - Violin");

    let mut related = Related::new();
    related.extend(&[strings]).unwrap();
    assert_eq!(violin.title(&related), "Strings - Violin");

    let picks = Accessory::new(AccessoryCategory::Picks, "Jazz III", "Nylon picks", dec("4.99"));
    assert_eq!(picks.display(), "Picks & Plectrums - Jazz III");

    let plan = SubscriptionPlan::new("Starter", SubscriptionDuration::ThreeMonths, dec("30"));
    assert_eq!(plan.display(), "Starter (3 months)");

    let insurance: InsuranceOption = serde_json::from_value(json!({
        "name": "Full Cover",
        "description": "Accidental damage",
        "monthly_cost": "4.50",
        "coverage_amount": "1500.00",
        "deductible": "50.00",
    }))
    .unwrap();
    assert_eq!(insurance.display(), "Full Cover");
}

#[test]
fn accessory_categories_use_lowercase_keys() {
    let json = serde_json::to_value(AccessoryCategory::Maintenance).unwrap();
    assert_eq!(json, json!("maintenance"));
    assert!(serde_json::from_value::<AccessoryCategory>(json!("drums")).is_err());
    assert_eq!(AccessoryCategory::Other.label(), "Other Accessories");
}

#[test]
fn product_validation_collects_every_violation() {
    let mut product = Product::new("", "");
    product.rental_price_monthly = Some(dec("1.234"));
    product.purchase_price = Some(dec("1234567.00"));
    product.video_url = Some("not a url".to_owned());
    product.condition = Some("x".repeat(51));

    let errors = product.validate().unwrap_err();
    for field in ["name", "description", "rental_price_monthly", "purchase_price", "video_url", "condition"] {
        assert!(errors.contains(field), "expected an error for {field}: {errors}");
    }
}

#[test]
fn trailing_zeros_do_not_count_as_places() {
    let mut product = Product::new("Flute", "Silver flute");
    product.purchase_price = Some(dec("120.5000"));
    product.rating = Some(dec("4.50"));
    assert!(product.validate().is_ok());
}
