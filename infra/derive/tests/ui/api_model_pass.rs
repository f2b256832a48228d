use encore_derive::api_model;

#[api_model(rename_all = "snake_case")]
pub struct CategorySummary {
    pub display_order: i64,
    pub friendly_name: Option<String>,
}

#[api_model]
pub struct PriceTag {
    pub rental_display: String,
}

fn main() {
    let summary: CategorySummary =
        serde_json::from_str(r#"{"display_order": 2, "friendly_name": null}"#).unwrap();
    assert_eq!(summary.display_order, 2);
    assert!(summary.friendly_name.is_none());

    let unknown = r#"{"display_order": 2, "friendly_name": null, "icon": "fa-guitar"}"#;
    assert!(serde_json::from_str::<CategorySummary>(unknown).is_err());

    let tag = PriceTag { rental_display: "Rental not available".to_owned() };
    assert_eq!(serde_json::to_string(&tag).unwrap(), r#"{"rentalDisplay":"Rental not available"}"#);
}
