use encore_domain::constants::{
    ACCESSORY_TABLE, CATEGORY_TABLE, CURRENCY_SYMBOL, INSTRUMENT_TYPE_TABLE,
    INSURANCE_OPTION_TABLE, PRODUCT_TABLE, SUBSCRIPTION_PLAN_TABLE,
};

#[test]
fn constants_match_table_names() {
    assert_eq!(CATEGORY_TABLE, "category");
    assert_eq!(INSTRUMENT_TYPE_TABLE, "instrument_type");
    assert_eq!(PRODUCT_TABLE, "product");
    assert_eq!(ACCESSORY_TABLE, "accessory");
    assert_eq!(SUBSCRIPTION_PLAN_TABLE, "subscription_plan");
    assert_eq!(INSURANCE_OPTION_TABLE, "insurance_option");
    assert_eq!(CURRENCY_SYMBOL, "€");
}
