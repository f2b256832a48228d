//! Names shared between the HTTP surface, the database schema and the admin registry.

/// `OpenAPI` tag for system endpoints (health).
pub const SYSTEM_TAG: &str = "System";
/// `OpenAPI` tag for the administrative change-list API.
pub const ADMIN_TAG: &str = "Admin";
/// `OpenAPI` tag for the public storefront API.
pub const STOREFRONT_TAG: &str = "Storefront";

/// Environment variable prefix for configuration overrides (`ENCORE__SERVER__PORT`).
pub const ENV_PREFIX: &str = "ENCORE";

// Table names. They double as the admin model keys.
pub const CATEGORY_TABLE: &str = "category";
pub const INSTRUMENT_TYPE_TABLE: &str = "instrument_type";
pub const PRODUCT_TABLE: &str = "product";
pub const ACCESSORY_TABLE: &str = "accessory";
pub const SUBSCRIPTION_PLAN_TABLE: &str = "subscription_plan";
pub const INSURANCE_OPTION_TABLE: &str = "insurance_option";

/// Currency symbol used by the storefront price labels.
pub const CURRENCY_SYMBOL: &str = "€";
