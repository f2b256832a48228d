use encore_catalog::CatalogError;
use encore_catalog::admin::AdminSite;
use encore_catalog::admin::query::{
    self, ChangeListQuery, Entry, Related, apply_edits, compare_values,
};
use encore_catalog::models::{Category, InstrumentType, Model, Product};
use serde_json::{Map, Value, json};
use std::cmp::Ordering;
use std::collections::BTreeMap;

fn category(id: &str, name: &str, display_order: i64, is_active: bool) -> Category {
    let mut category = Category::new(name);
    category.id = id.to_owned();
    category.display_order = display_order;
    category.is_active = is_active;
    category
}

fn instrument_type(id: &str, category: &str, name: &str, display_order: i64) -> InstrumentType {
    let mut instrument_type = InstrumentType::new(category, name);
    instrument_type.id = id.to_owned();
    instrument_type.display_order = display_order;
    instrument_type
}

struct Fixture {
    site: AdminSite,
    related: Related,
    categories: Vec<Category>,
    instrument_types: Vec<InstrumentType>,
}

fn fixture() -> Fixture {
    let mut strings = category("strings", "Strings", 2, true);
    strings.friendly_name = Some("Bowed & plucked".to_owned());
    let categories = vec![
        strings,
        category("keys", "Keys", 1, true),
        category("brass", "Brass", 1, false),
    ];
    let instrument_types = vec![
        instrument_type("violin", "strings", "Violin", 1),
        instrument_type("guitar", "strings", "Guitar", 0),
        instrument_type("piano", "keys", "Piano", 5),
        instrument_type("trumpet", "brass", "Trumpet", 0),
    ];

    let mut related = Related::new();
    related.extend(&categories).unwrap();
    related.extend(&instrument_types).unwrap();

    Fixture { site: AdminSite::catalog(), related, categories, instrument_types }
}

fn entries<E: Model>(items: &[E], related: &Related) -> Vec<Entry> {
    items.iter().map(|item| Entry::from_model(item, related).unwrap()).collect()
}

fn params(pairs: &[(&str, &str)]) -> ChangeListQuery {
    let raw: BTreeMap<String, String> =
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    ChangeListQuery::from_params(raw).unwrap()
}

fn ids(list: &query::ChangeList) -> Vec<&str> {
    list.rows.iter().map(|row| row.id.as_str()).collect()
}

#[test]
fn categories_use_model_ordering() {
    let fx = fixture();
    let admin = fx.site.get("category").unwrap();
    let list = query::change_list(
        &fx.site,
        admin,
        entries(&fx.categories, &fx.related),
        &fx.related,
        &ChangeListQuery::default(),
    )
    .unwrap();

    assert_eq!(list.total, 3);
    assert_eq!(ids(&list), ["brass", "keys", "strings"]);
    assert_eq!(
        list.rows[2].values,
        json!({
            "name": "Strings",
            "friendly_name": "Bowed & plucked",
            "display_order": 2,
            "is_active": true,
        })
        .as_object()
        .cloned()
        .unwrap()
    );
}

#[test]
fn search_matches_any_search_field_case_insensitively() {
    let fx = fixture();
    let admin = fx.site.get("category").unwrap();
    let all = entries(&fx.categories, &fx.related);

    let by_friendly_name = query::change_list(
        &fx.site,
        admin,
        all.clone(),
        &fx.related,
        &params(&[("q", "PLUCKED")]),
    )
    .unwrap();
    assert_eq!(ids(&by_friendly_name), ["strings"]);

    let no_match =
        query::change_list(&fx.site, admin, all, &fx.related, &params(&[("q", "strings drums")]))
            .unwrap();
    assert_eq!(no_match.total, 0);
}

#[test]
fn search_follows_reference_lookups() {
    let fx = fixture();
    let admin = fx.site.get("instrument_type").unwrap();
    let list = query::change_list(
        &fx.site,
        admin,
        entries(&fx.instrument_types, &fx.related),
        &fx.related,
        &params(&[("q", "keys")]),
    )
    .unwrap();

    assert_eq!(ids(&list), ["piano"]);
}

#[test]
fn instrument_types_order_by_category_then_display_order() {
    let fx = fixture();
    let admin = fx.site.get("instrument_type").unwrap();
    let list = query::change_list(
        &fx.site,
        admin,
        entries(&fx.instrument_types, &fx.related),
        &fx.related,
        &ChangeListQuery::default(),
    )
    .unwrap();

    // Categories sort by (display_order, name): Brass, Keys, Strings.
    assert_eq!(ids(&list), ["trumpet", "piano", "guitar", "violin"]);
    assert_eq!(list.rows[3].values["category"], json!("Strings"));
    assert_eq!(list.rows[3].title, "Strings - Violin");
}

#[test]
fn filters_match_list_filter_fields_only() {
    let fx = fixture();
    let admin = fx.site.get("category").unwrap();
    let all = entries(&fx.categories, &fx.related);

    let inactive = query::change_list(
        &fx.site,
        admin,
        all.clone(),
        &fx.related,
        &params(&[("is_active", "0")]),
    )
    .unwrap();
    assert_eq!(ids(&inactive), ["brass"]);

    let result =
        query::change_list(&fx.site, admin, all.clone(), &fx.related, &params(&[("name", "Keys")]));
    let Err(CatalogError::Validation { errors, .. }) = result else {
        panic!("filtering by a non-filter field must fail");
    };
    assert!(errors.contains("name"));

    let result =
        query::change_list(&fx.site, admin, all, &fx.related, &params(&[("is_active", "maybe")]));
    assert!(matches!(result, Err(CatalogError::Validation { .. })));
}

#[test]
fn reference_filters_match_ids_and_null() {
    let fx = fixture();
    let admin = fx.site.get("product").unwrap();
    let mut cello = Product::new("Cello", "Full size");
    cello.id = "cello".to_owned();
    cello.category = Some("strings".to_owned());
    let mut kazoo = Product::new("Kazoo", "Plastic kazoo");
    kazoo.id = "kazoo".to_owned();
    let products = entries(&[cello, kazoo], &fx.related);

    let strings = query::change_list(
        &fx.site,
        admin,
        products.clone(),
        &fx.related,
        &params(&[("category", "strings")]),
    )
    .unwrap();
    assert_eq!(ids(&strings), ["cello"]);

    let uncategorized = query::change_list(
        &fx.site,
        admin,
        products,
        &fx.related,
        &params(&[("category", "null")]),
    )
    .unwrap();
    assert_eq!(ids(&uncategorized), ["kazoo"]);
    assert_eq!(uncategorized.rows[0].values["category"], Value::Null);
}

#[test]
fn pagination_reports_total_before_slicing() {
    let fx = fixture();
    let admin = fx.site.get("instrument_type").unwrap();
    let list = query::change_list(
        &fx.site,
        admin,
        entries(&fx.instrument_types, &fx.related),
        &fx.related,
        &params(&[("page", "2"), ("per_page", "3")]),
    )
    .unwrap();

    assert_eq!(list.total, 4);
    assert_eq!(list.page, 2);
    assert_eq!(ids(&list), ["violin"]);
}

#[test]
fn paging_parameters_are_validated() {
    let raw = BTreeMap::from([("page".to_owned(), "0".to_owned())]);
    assert!(ChangeListQuery::from_params(raw).is_err());

    let raw = BTreeMap::from([("per_page".to_owned(), "10000".to_owned())]);
    assert_eq!(ChangeListQuery::from_params(raw).unwrap().per_page, query::MAX_PER_PAGE);
}

#[test]
fn list_edits_only_touch_editable_columns() {
    let fx = fixture();
    let admin = fx.site.get("category").unwrap();
    let mut fields = entries(&fx.categories, &fx.related).remove(0).fields;

    let rejected: Map<String, Value> =
        json!({ "name": "Renamed", "display_order": 9 }).as_object().cloned().unwrap();
    let errors = apply_edits(admin, &mut fields, rejected).unwrap_err();
    assert!(errors.contains("name"));
    assert!(!errors.contains("display_order"));
    assert_eq!(fields["display_order"], json!(2), "nothing applied on rejection");

    let accepted: Map<String, Value> =
        json!({ "display_order": 9, "is_active": false }).as_object().cloned().unwrap();
    apply_edits(admin, &mut fields, accepted).unwrap();
    assert_eq!(fields["display_order"], json!(9));
    assert_eq!(fields["is_active"], json!(false));
}

#[test]
fn json_values_have_a_total_order() {
    assert_eq!(compare_values(&Value::Null, &json!(false)), Ordering::Less);
    assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
    assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
    assert_eq!(compare_values(&json!(1.5), &json!(1.5)), Ordering::Equal);
}
