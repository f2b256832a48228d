//! Change-list engine: search, filter, order, paginate and list-edit already loaded records.
//!
//! Records are handled as JSON objects keyed by admin field names, so the same code serves
//! every model. References are resolved through [`Related`], which holds the parent records
//! a change list needs (their titles and fields).

use super::{AdminSite, ModelAdmin};
use crate::error::CatalogError;
use crate::models::{Model, ValidationErrors};
use crate::relations;
use encore_derive::api_model;
use fxhash::FxHashMap;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Rows per page unless the request asks otherwise.
pub const DEFAULT_PER_PAGE: usize = 100;
/// Upper bound of `per_page`.
pub const MAX_PER_PAGE: usize = 500;

const QUERY_PARAM: &str = "q";
const PAGE_PARAM: &str = "page";
const PER_PAGE_PARAM: &str = "per_page";
const LOOKUP_SEPARATOR: &str = "__";

/// A loaded record: id, title and its fields as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub fields: Map<String, Value>,
}

impl Entry {
    /// Serializes a model into an entry, resolving its title against `related`.
    pub fn from_model<E: Model>(item: &E, related: &Related) -> Result<Self, CatalogError> {
        let Value::Object(fields) = serde_json::to_value(item)? else {
            return Err(CatalogError::Internal {
                message: format!("{} does not serialize to an object", E::TABLE).into(),
                context: None,
            });
        };
        Ok(Self { id: item.id().to_owned(), title: item.title(related), fields })
    }
}

/// A parent record as seen from its children.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedRecord {
    pub title: String,
    pub fields: Map<String, Value>,
}

/// Parent records keyed by table and id.
#[derive(Debug, Clone, Default)]
pub struct Related {
    tables: FxHashMap<String, FxHashMap<String, RelatedRecord>>,
}

impl Related {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: &str, id: impl Into<String>, record: RelatedRecord) {
        self.tables.entry(table.to_owned()).or_default().insert(id.into(), record);
    }

    /// Adds every item of a model. Titles are resolved against what is already present, so
    /// parents go in before their children.
    pub fn extend<E: Model>(&mut self, items: &[E]) -> Result<(), CatalogError> {
        let entries =
            items.iter().map(|item| Entry::from_model(item, self)).collect::<Result<Vec<_>, _>>()?;
        for entry in entries {
            self.insert(E::TABLE, entry.id, RelatedRecord { title: entry.title, fields: entry.fields });
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, table: &str, id: &str) -> Option<&RelatedRecord> {
        self.tables.get(table).and_then(|records| records.get(id))
    }

    #[must_use]
    pub fn title(&self, table: &str, id: &str) -> Option<&str> {
        self.get(table, id).map(|record| record.title.as_str())
    }
}

/// Parsed change-list request parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeListQuery {
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ChangeListQuery {
    fn default() -> Self {
        Self { search: None, filters: BTreeMap::new(), page: 1, per_page: DEFAULT_PER_PAGE }
    }
}

impl ChangeListQuery {
    /// Splits raw query parameters into search text, paging and field filters.
    ///
    /// # Errors
    /// [`CatalogError::Validation`] for non-numeric or zero `page`/`per_page`.
    pub fn from_params(mut params: BTreeMap<String, String>) -> Result<Self, CatalogError> {
        let mut errors = ValidationErrors::new();
        let search = params.remove(QUERY_PARAM).filter(|q| !q.trim().is_empty());
        let page = parse_positive(&mut errors, PAGE_PARAM, params.remove(PAGE_PARAM), 1);
        let per_page = parse_positive(
            &mut errors,
            PER_PAGE_PARAM,
            params.remove(PER_PAGE_PARAM),
            DEFAULT_PER_PAGE,
        )
        .min(MAX_PER_PAGE);
        errors.into_result()?;

        Ok(Self { search, filters: params, page, per_page })
    }
}

fn parse_positive(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<String>,
    default: usize,
) -> usize {
    match value.as_deref().map(str::parse::<usize>) {
        None => default,
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            errors.add(field, "Enter a whole number greater than 0.");
            default
        },
    }
}

/// One change-list row.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct ChangeListRow {
    pub id: String,
    pub title: String,
    /// `list_display` columns; references show the related record's title
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub values: Map<String, Value>,
}

/// A page of a model's change list.
#[api_model(rename_all = "snake_case")]
#[derive(Clone, PartialEq)]
pub struct ChangeList {
    pub model: String,
    /// Matching records before pagination
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub rows: Vec<ChangeListRow>,
}

/// Runs a change-list request: filter, search, order, paginate and project rows.
///
/// # Errors
/// [`CatalogError::Validation`] for filters on fields outside `list_filter` or filter values
/// that do not fit the field.
pub fn change_list(
    site: &AdminSite,
    admin: &ModelAdmin,
    entries: Vec<Entry>,
    related: &Related,
    query: &ChangeListQuery,
) -> Result<ChangeList, CatalogError> {
    let mut matching = filter(admin, entries, &query.filters)?;
    if let Some(search_text) = &query.search {
        matching.retain(|entry| matches_search(admin, entry, related, search_text));
    }
    order(site, admin, &mut matching, related);

    let total = matching.len();
    let rows = matching
        .iter()
        .skip(query.page.saturating_sub(1).saturating_mul(query.per_page))
        .take(query.per_page)
        .map(|entry| row(admin, entry, related))
        .collect();

    Ok(ChangeList {
        model: admin.model.clone(),
        total,
        page: query.page,
        per_page: query.per_page,
        rows,
    })
}

/// Keeps entries whose fields equal every filter value.
///
/// Booleans accept `true`/`false`/`1`/`0`; `null` (or an empty value) matches a missing value.
///
/// # Errors
/// [`CatalogError::Validation`] for unknown filter fields or malformed boolean values.
pub fn filter(
    admin: &ModelAdmin,
    entries: Vec<Entry>,
    filters: &BTreeMap<String, String>,
) -> Result<Vec<Entry>, CatalogError> {
    let mut errors = ValidationErrors::new();
    for field in filters.keys().filter(|field| !admin.is_filterable(field)) {
        errors.add(field.as_str(), format!("Filtering by '{field}' is not allowed."));
    }
    errors.into_result()?;

    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut keep = true;
        for (field, expected) in filters {
            let actual = entry.fields.get(field).unwrap_or(&Value::Null);
            if !filter_matches(field, actual, expected)? {
                keep = false;
                break;
            }
        }
        if keep {
            kept.push(entry);
        }
    }
    Ok(kept)
}

fn filter_matches(field: &str, actual: &Value, expected: &str) -> Result<bool, CatalogError> {
    let expected = expected.trim();
    if expected.is_empty() || expected.eq_ignore_ascii_case("null") {
        return Ok(actual.is_null());
    }

    Ok(match actual {
        Value::Null => false,
        Value::Bool(value) => {
            let Some(wanted) = parse_bool(expected) else {
                let mut errors = ValidationErrors::new();
                errors.add(field, format!("'{expected}' is not a valid boolean."));
                return Err(errors.into());
            };
            *value == wanted
        },
        Value::String(value) => value == expected,
        other => other.to_string() == expected,
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Every whitespace-separated term must occur (case-insensitively) in at least one search field.
#[must_use]
pub fn matches_search(admin: &ModelAdmin, entry: &Entry, related: &Related, text: &str) -> bool {
    let haystacks: Vec<String> = admin
        .search_fields
        .iter()
        .filter_map(|field| lookup(&admin.model, entry, field, related))
        .filter_map(|value| searchable_text(&value))
        .map(|text| text.to_lowercase())
        .collect();

    text.split_whitespace()
        .map(str::to_lowercase)
        .all(|term| haystacks.iter().any(|haystack| haystack.contains(&term)))
}

/// Resolves `field` or a `reference__field` lookup against an entry.
fn lookup(table: &str, entry: &Entry, field: &str, related: &Related) -> Option<Value> {
    match field.split_once(LOOKUP_SEPARATOR) {
        None => entry.fields.get(field).cloned(),
        Some((reference, remote)) => {
            let relation = relations::reference(table, reference)?;
            let id = entry.fields.get(reference)?.as_str()?;
            related.get(relation.target, id)?.fields.get(remote).cloned()
        },
    }
}

fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Sorts entries by the admin's effective ordering. A `-` prefix sorts descending; references
/// sort by the related model's own ordering, with missing references first. Ties fall back to id.
pub fn order(site: &AdminSite, admin: &ModelAdmin, entries: &mut Vec<Entry>, related: &Related) {
    order_by(site, &admin.model, admin.effective_ordering(), entries, related);
}

/// Sorts entries of `table` by an explicit ordering.
pub fn order_by(
    site: &AdminSite,
    table: &str,
    ordering: &[String],
    entries: &mut Vec<Entry>,
    related: &Related,
) {
    let mut keyed: Vec<(Vec<(Value, bool)>, Entry)> = entries
        .drain(..)
        .map(|entry| (sort_key(site, table, ordering, &entry, related), entry))
        .collect();

    keyed.sort_by(|(a, a_entry), (b, b_entry)| {
        a.iter()
            .zip(b)
            .map(|((left, descending), (right, _))| {
                let ordering = compare_values(left, right);
                if *descending { ordering.reverse() } else { ordering }
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a_entry.id.cmp(&b_entry.id))
    });

    entries.extend(keyed.into_iter().map(|(_, entry)| entry));
}

fn sort_key(
    site: &AdminSite,
    table: &str,
    ordering: &[String],
    entry: &Entry,
    related: &Related,
) -> Vec<(Value, bool)> {
    let mut key = Vec::with_capacity(ordering.len());
    for spec in ordering {
        let (field, descending) =
            spec.strip_prefix('-').map_or((spec.as_str(), false), |field| (field, true));

        let Some(relation) = relations::reference(table, field) else {
            key.push((entry.fields.get(field).cloned().unwrap_or(Value::Null), descending));
            continue;
        };

        let remote_ordering =
            site.find(relation.target).map(|m| m.model_ordering.as_slice()).unwrap_or_default();
        let parent = entry
            .fields
            .get(field)
            .and_then(Value::as_str)
            .and_then(|id| related.get(relation.target, id));

        if remote_ordering.is_empty() {
            let id = parent.and(entry.fields.get(field)).cloned().unwrap_or(Value::Null);
            key.push((id, descending));
            continue;
        }
        for remote in remote_ordering {
            let value = parent.and_then(|p| p.fields.get(remote)).cloned().unwrap_or(Value::Null);
            key.push((value, descending));
        }
    }
    key
}

/// Total order over JSON scalars: null < bool < number < string < array < object.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    const fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => a.as_f64().unwrap_or_default().total_cmp(&b.as_f64().unwrap_or_default()),
        },
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => rank(left).cmp(&rank(right)),
    }
}

/// Projects the `list_display` columns of an entry.
#[must_use]
pub fn row(admin: &ModelAdmin, entry: &Entry, related: &Related) -> ChangeListRow {
    let values = admin
        .list_display
        .iter()
        .map(|column| {
            let raw = entry.fields.get(column).cloned().unwrap_or(Value::Null);
            let value = match (relations::reference(&admin.model, column), raw.as_str()) {
                (Some(relation), Some(id)) => related
                    .title(relation.target, id)
                    .map_or(Value::Null, |title| Value::String(title.to_owned())),
                _ => raw,
            };
            (column.clone(), value)
        })
        .collect();

    ChangeListRow { id: entry.id.clone(), title: entry.title.clone(), values }
}

/// Applies change-list edits to a record's fields.
///
/// Nothing is applied when any edited field is outside `list_editable`.
///
/// # Errors
/// [`ValidationErrors`] naming every non-editable field.
pub fn apply_edits(
    admin: &ModelAdmin,
    fields: &mut Map<String, Value>,
    changes: Map<String, Value>,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in changes.keys().filter(|field| !admin.is_editable(field)) {
        errors.add(field.as_str(), "This field is not editable from the change list.");
    }
    errors.into_result()?;

    fields.extend(changes);
    Ok(())
}
