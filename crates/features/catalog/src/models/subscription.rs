use super::validation::{MAX_TEXT, MONEY, PERCENTAGE};
use super::{Model, ValidationErrors, default_true};
use crate::admin::query::Related;
use chrono::{DateTime, Utc};
use encore_derive::api_model;
use encore_domain::constants::SUBSCRIPTION_PLAN_TABLE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Rental plan length. Serialized as the number of months.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum SubscriptionDuration {
    ThreeMonths,
    SixMonths,
    TwelveMonths,
    TwentyFourMonths,
}

impl SubscriptionDuration {
    #[must_use]
    pub const fn months(self) -> u8 {
        match self {
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
            Self::TwentyFourMonths => 24,
        }
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{} Months", self.months())
    }
}

impl TryFrom<u8> for SubscriptionDuration {
    type Error = String;

    fn try_from(months: u8) -> Result<Self, Self::Error> {
        match months {
            3 => Ok(Self::ThreeMonths),
            6 => Ok(Self::SixMonths),
            12 => Ok(Self::TwelveMonths),
            24 => Ok(Self::TwentyFourMonths),
            other => Err(format!("Value {other} is not a valid choice.")),
        }
    }
}

impl From<SubscriptionDuration> for u8 {
    fn from(duration: SubscriptionDuration) -> Self {
        duration.months()
    }
}

/// Fixed-duration rental pricing plan.
///
/// `total_price` is derived: every save overwrites it with `monthly_price × duration_months`.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct SubscriptionPlan {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "server", schema(value_type = u8))]
    pub duration_months: SubscriptionDuration,
    pub monthly_price: Decimal,
    #[serde(default)]
    pub total_price: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub is_popular: bool,
    pub description: String,
    /// Features included in the plan, one per line
    pub features: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SubscriptionPlan {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        duration_months: SubscriptionDuration,
        monthly_price: Decimal,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            duration_months,
            monthly_price,
            total_price: Decimal::ZERO,
            discount_percentage: Decimal::ZERO,
            is_popular: false,
            description: String::new(),
            features: String::new(),
            is_active: true,
        }
    }

    /// `monthly_price × duration_months`, without rounding.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.monthly_price * Decimal::from(self.duration_months.months())
    }

    /// `"{name} ({n} months)"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} ({} months)", self.name, self.duration_months.months())
    }

    /// Non-empty, trimmed lines of the feature text.
    pub fn features_list(&self) -> impl Iterator<Item = &str> {
        self.features.lines().map(str::trim).filter(|line| !line.is_empty())
    }
}

impl Model for SubscriptionPlan {
    const TABLE: &'static str = SUBSCRIPTION_PLAN_TABLE;

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
        errors.require("features", &self.features);
        errors.decimal("monthly_price", Some(self.monthly_price), MONEY);
        errors.decimal("discount_percentage", Some(self.discount_percentage), PERCENTAGE);
        errors.into_result()
    }

    fn prepare_save(&mut self, _now: DateTime<Utc>, _previous: Option<&Self>) {
        self.total_price = self.computed_total();
    }

    fn title(&self, _related: &Related) -> String {
        self.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn save_overwrites_supplied_total() {
        let mut plan = SubscriptionPlan::new(
            "Half Year",
            SubscriptionDuration::SixMonths,
            Decimal::from_str("50.00").unwrap(),
        );
        plan.total_price = Decimal::from(1);
        plan.prepare_save(Utc::now(), None);
        assert_eq!(plan.total_price, Decimal::from_str("300.00").unwrap());
        assert_eq!(plan.total_price.to_string(), "300.00");
    }

    #[test]
    fn durations_round_trip_as_months() {
        let json = serde_json::to_value(SubscriptionDuration::TwentyFourMonths).unwrap();
        assert_eq!(json, serde_json::json!(24));
        let parsed: SubscriptionDuration = serde_json::from_value(serde_json::json!(12)).unwrap();
        assert_eq!(parsed, SubscriptionDuration::TwelveMonths);
        assert!(serde_json::from_value::<SubscriptionDuration>(serde_json::json!(7)).is_err());
        assert_eq!(SubscriptionDuration::ThreeMonths.label(), "3 Months");
    }

    #[test]
    fn display_and_features() {
        let mut plan = SubscriptionPlan::new(
            "Starter",
            SubscriptionDuration::ThreeMonths,
            Decimal::from(30),
        );
        plan.features = "Free tuning\n\n  Swap once  \n".to_owned();
        assert_eq!(plan.display(), "Starter (3 months)");
        assert_eq!(plan.features_list().collect::<Vec<_>>(), ["Free tuning", "Swap once"]);
    }
}
