//! Foreign keys between catalog tables and what happens to children when a parent is deleted.

use encore_domain::constants::{CATEGORY_TABLE, INSTRUMENT_TYPE_TABLE, PRODUCT_TABLE};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Children are deleted with the parent.
    Cascade,
    /// The child's reference is cleared.
    SetNull,
}

/// `table.field` references a record of `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub table: &'static str,
    pub field: &'static str,
    pub target: &'static str,
    pub on_delete: OnDelete,
}

pub const RELATIONS: &[Relation] = &[
    Relation {
        table: INSTRUMENT_TYPE_TABLE,
        field: "category",
        target: CATEGORY_TABLE,
        on_delete: OnDelete::Cascade,
    },
    Relation {
        table: PRODUCT_TABLE,
        field: "category",
        target: CATEGORY_TABLE,
        on_delete: OnDelete::SetNull,
    },
    Relation {
        table: PRODUCT_TABLE,
        field: "instrument_type",
        target: INSTRUMENT_TYPE_TABLE,
        on_delete: OnDelete::SetNull,
    },
];

/// The relation declared by `table.field`, if the field is a reference.
#[must_use]
pub fn reference(table: &str, field: &str) -> Option<&'static Relation> {
    RELATIONS.iter().find(|r| r.table == table && r.field == field)
}

/// Relations whose target is `table`.
pub fn dependents(table: &str) -> impl Iterator<Item = &'static Relation> + '_ {
    RELATIONS.iter().filter(move |r| r.target == table)
}

/// Tables referenced by `table`, directly or through other references, parents first.
#[must_use]
pub fn parents(table: &str) -> Vec<&'static str> {
    let mut found = Vec::new();
    collect_parents(table, &mut found);
    found
}

fn collect_parents(table: &str, found: &mut Vec<&'static str>) {
    for relation in RELATIONS.iter().filter(|r| r.table == table) {
        if found.contains(&relation.target) || relation.target == table {
            continue;
        }
        collect_parents(relation.target, found);
        if !found.contains(&relation.target) {
            found.push(relation.target);
        }
    }
}

/// Builds the transaction that deletes the `table` record bound as `$uid`.
///
/// Cascading children are collected into variables first, so their own dependents are handled
/// before they disappear; set-null children get their reference removed.
#[must_use]
pub fn delete_script(table: &str) -> String {
    let mut script = String::from("BEGIN TRANSACTION;\nLET $v0 = [$uid];\n");
    let mut counter = 0;
    let mut path = vec![table];
    delete_dependents(&mut script, table, 0, &mut counter, &mut path);
    let _ = writeln!(script, "DELETE {table} WHERE uid INSIDE $v0;");
    script.push_str("COMMIT TRANSACTION;");
    script
}

fn delete_dependents<'a>(
    script: &mut String,
    table: &str,
    var: usize,
    counter: &mut usize,
    path: &mut Vec<&'a str>,
) {
    for relation in dependents(table) {
        if path.contains(&relation.table) {
            continue;
        }
        match relation.on_delete {
            OnDelete::Cascade => {
                *counter += 1;
                let child = *counter;
                let _ = writeln!(
                    script,
                    "LET $v{child} = (SELECT VALUE uid FROM {} WHERE {} INSIDE $v{var});",
                    relation.table, relation.field
                );
                path.push(relation.table);
                delete_dependents(script, relation.table, child, counter, path);
                path.pop();
                let _ = writeln!(script, "DELETE {} WHERE uid INSIDE $v{child};", relation.table);
            },
            OnDelete::SetNull => {
                let _ = writeln!(
                    script,
                    "UPDATE {} SET {} = NONE WHERE {} INSIDE $v{var};",
                    relation.table, relation.field, relation.field
                );
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_delete_cascades_and_nulls() {
        let script = delete_script(CATEGORY_TABLE);
        let expected = "BEGIN TRANSACTION;
LET $v0 = [$uid];
LET $v1 = (SELECT VALUE uid FROM instrument_type WHERE category INSIDE $v0);
UPDATE product SET instrument_type = NONE WHERE instrument_type INSIDE $v1;
DELETE instrument_type WHERE uid INSIDE $v1;
UPDATE product SET category = NONE WHERE category INSIDE $v0;
DELETE category WHERE uid INSIDE $v0;
COMMIT TRANSACTION;";
        assert_eq!(script, expected);
    }

    #[test]
    fn instrument_type_delete_only_nulls_products() {
        let script = delete_script(INSTRUMENT_TYPE_TABLE);
        assert!(script.contains("UPDATE product SET instrument_type = NONE"));
        assert!(!script.contains("DELETE product"));
        assert!(script.contains("DELETE instrument_type WHERE uid INSIDE $v0;"));
    }

    #[test]
    fn leaf_tables_delete_a_single_record() {
        assert_eq!(
            delete_script(PRODUCT_TABLE),
            "BEGIN TRANSACTION;\nLET $v0 = [$uid];\nDELETE product WHERE uid INSIDE $v0;\nCOMMIT TRANSACTION;"
        );
    }

    #[test]
    fn reference_lookup() {
        assert_eq!(reference(PRODUCT_TABLE, "category").unwrap().target, CATEGORY_TABLE);
        assert!(reference(PRODUCT_TABLE, "brand").is_none());
    }

    #[test]
    fn parents_come_before_children() {
        assert_eq!(parents(PRODUCT_TABLE), [CATEGORY_TABLE, INSTRUMENT_TYPE_TABLE]);
        assert_eq!(parents(INSTRUMENT_TYPE_TABLE), [CATEGORY_TABLE]);
        assert!(parents(CATEGORY_TABLE).is_empty());
    }
}
