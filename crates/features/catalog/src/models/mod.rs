//! Catalog entities.
//!
//! Every entity serializes with snake_case keys that double as admin field names, carries a
//! string `id` assigned on create, and implements [`Model`] so the repository and the admin
//! change list can treat them uniformly.

mod accessory;
mod category;
mod instrument_type;
mod insurance;
mod product;
mod subscription;
pub mod validation;

pub use accessory::{Accessory, AccessoryCategory};
pub use category::Category;
pub use instrument_type::InstrumentType;
pub use insurance::InsuranceOption;
pub use product::{PURCHASE_NOT_AVAILABLE, Product, RENTAL_NOT_AVAILABLE};
pub use subscription::{SubscriptionDuration, SubscriptionPlan};
pub use validation::ValidationErrors;

use crate::admin::query::Related;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Behaviour shared by every persisted catalog entity.
pub trait Model: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Table name, also used as the admin model key.
    const TABLE: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn is_active(&self) -> bool;

    /// Checks field constraints that do not need the database.
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Runs before every persist. `previous` is the stored version on update.
    fn prepare_save(&mut self, _now: DateTime<Utc>, _previous: Option<&Self>) {}

    /// Referenced records as `(field, id)` pairs.
    fn references(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }

    /// Human readable title, resolved against already loaded related records.
    fn title(&self, related: &Related) -> String;
}

pub(crate) const fn default_true() -> bool {
    true
}
