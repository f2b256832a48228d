use super::validation::{MAX_TEXT, MONEY};
use super::{Model, ValidationErrors, default_true};
use crate::admin::query::Related;
use encore_derive::api_model;
use encore_domain::constants::INSURANCE_OPTION_TABLE;
use rust_decimal::Decimal;

/// Add-on coverage plan for rented instruments.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq, Eq)]
pub struct InsuranceOption {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub description: String,
    pub monthly_cost: Decimal,
    pub coverage_amount: Decimal,
    pub deductible: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl InsuranceOption {
    #[must_use]
    pub fn display(&self) -> &str {
        &self.name
    }
}

impl Model for InsuranceOption {
    const TABLE: &'static str = INSURANCE_OPTION_TABLE;

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
        errors.decimal("monthly_cost", Some(self.monthly_cost), MONEY);
        errors.decimal("coverage_amount", Some(self.coverage_amount), MONEY);
        errors.decimal("deductible", Some(self.deductible), MONEY);
        errors.into_result()
    }

    fn title(&self, _related: &Related) -> String {
        self.name.clone()
    }
}
