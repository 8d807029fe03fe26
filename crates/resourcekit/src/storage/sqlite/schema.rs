//! SQL generation from a record's field table.
//!
//! Pure functions, no I/O. Column names come from `R::FIELDS`, values are
//! always bound as parameters.

use rusqlite::types::Value;

use resourcekit_core::record::{FieldDef, FieldKind, FieldValue, Record, ID_FIELD};
use resourcekit_core::selection::{Predicate, Selection};

use super::conversions::to_sql_value;

fn column_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Uuid | FieldKind::Text | FieldKind::Timestamp => "TEXT",
        FieldKind::Int | FieldKind::Bool => "INTEGER",
    }
}

fn column_list(fields: &[FieldDef]) -> String {
    fields
        .iter()
        .map(|def| format!("\"{}\"", def.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CREATE TABLE IF NOT EXISTS` statement for `R`.
pub fn create_table<R: Record>() -> String {
    let columns = R::FIELDS
        .iter()
        .map(|def| {
            let mut column = format!("    \"{}\" {}", def.name, column_type(def.kind));
            if def.name == ID_FIELD {
                column.push_str(" PRIMARY KEY");
            }
            if !def.nullable {
                column.push_str(" NOT NULL");
            }
            if def.unique {
                column.push_str(" UNIQUE");
            }
            column
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n);",
        R::TABLE,
        columns
    )
}

/// `INSERT` of every column, bound in `R::FIELDS` order.
pub fn insert<R: Record>() -> String {
    let placeholders = (1..=R::FIELDS.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        R::TABLE,
        column_list(R::FIELDS),
        placeholders
    )
}

/// `UPDATE` of every non-id column, bound in `R::FIELDS` order with the id last.
pub fn update<R: Record>() -> String {
    let assignments = R::FIELDS
        .iter()
        .filter(|def| def.name != ID_FIELD)
        .enumerate()
        .map(|(i, def)| format!("\"{}\" = ?{}", def.name, i + 1))
        .collect::<Vec<_>>();
    format!(
        "UPDATE \"{}\" SET {} WHERE \"{}\" = ?{}",
        R::TABLE,
        assignments.join(", "),
        ID_FIELD,
        assignments.len() + 1
    )
}

pub fn delete<R: Record>() -> String {
    format!("DELETE FROM \"{}\" WHERE \"{}\" = ?1", R::TABLE, ID_FIELD)
}

pub fn select_by_id<R: Record>() -> String {
    format!(
        "SELECT {} FROM \"{}\" WHERE \"{}\" = ?1",
        column_list(R::FIELDS),
        R::TABLE,
        ID_FIELD
    )
}

fn render_predicate(predicate: &Predicate, params: &mut Vec<Value>) -> String {
    match predicate {
        Predicate::Eq {
            field,
            value: FieldValue::Null,
        } => format!("\"{field}\" IS NULL"),
        Predicate::Eq { field, value } => {
            params.push(to_sql_value(value));
            format!("\"{field}\" = ?")
        }
        Predicate::In { values, .. } if values.is_empty() => "1 = 0".to_string(),
        Predicate::In { field, values } => {
            params.extend(values.iter().map(to_sql_value));
            let placeholders = vec!["?"; values.len()].join(", ");
            format!("\"{field}\" IN ({placeholders})")
        }
        Predicate::Before { field, at } => {
            params.push(to_sql_value(&FieldValue::Timestamp(*at)));
            format!("\"{field}\" < ?")
        }
        Predicate::After { field, at } => {
            params.push(to_sql_value(&FieldValue::Timestamp(*at)));
            format!("\"{field}\" > ?")
        }
    }
}

/// Renders a selection to a parameterised `SELECT` in insertion order.
pub fn select<R: Record>(selection: &Selection) -> (String, Vec<Value>) {
    let mut params = Vec::new();
    let mut sql = format!("SELECT {} FROM \"{}\"", column_list(R::FIELDS), R::TABLE);

    let conditions = selection
        .predicates()
        .iter()
        .map(|predicate| render_predicate(predicate, &mut params))
        .collect::<Vec<_>>();
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY rowid");

    if let Some(window) = selection.window() {
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::Integer(i64::try_from(window.limit).unwrap_or(i64::MAX)));
        params.push(Value::Integer(i64::try_from(window.offset).unwrap_or(i64::MAX)));
    }

    (sql, params)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use resourcekit_core::filters::LimitOffset;
    use uuid::Uuid;

    use super::*;
    use crate::models::Item;

    #[test]
    fn test_create_table() {
        assert_eq!(
            create_table::<Item>(),
            "CREATE TABLE IF NOT EXISTS \"items\" (\n\
             \x20   \"id\" TEXT PRIMARY KEY NOT NULL,\n\
             \x20   \"name\" TEXT NOT NULL UNIQUE,\n\
             \x20   \"description\" TEXT,\n\
             \x20   \"owner_id\" TEXT,\n\
             \x20   \"created\" TEXT NOT NULL,\n\
             \x20   \"updated\" TEXT NOT NULL\n\
             );"
        );
    }

    #[test]
    fn test_insert() {
        assert_eq!(
            insert::<Item>(),
            "INSERT INTO \"items\" (\"id\", \"name\", \"description\", \"owner_id\", \"created\", \"updated\") \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        );
    }

    #[test]
    fn test_update_binds_id_last() {
        assert_eq!(
            update::<Item>(),
            "UPDATE \"items\" SET \"name\" = ?1, \"description\" = ?2, \"owner_id\" = ?3, \
             \"created\" = ?4, \"updated\" = ?5 WHERE \"id\" = ?6"
        );
    }

    #[test]
    fn test_select_all() {
        let (sql, params) = select::<Item>(&Selection::all());
        assert_eq!(
            sql,
            "SELECT \"id\", \"name\", \"description\", \"owner_id\", \"created\", \"updated\" \
             FROM \"items\" ORDER BY rowid"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_renders_predicates_in_order() {
        let owner = Uuid::new_v4();
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let selection = Selection::all()
            .and(Predicate::Eq {
                field: "owner_id",
                value: owner.into(),
            })
            .and(Predicate::After { field: "created", at })
            .paginate(LimitOffset::new(10, 20));

        let (sql, params) = select::<Item>(&selection);

        assert!(sql.ends_with(
            "WHERE \"owner_id\" = ? AND \"created\" > ? ORDER BY rowid LIMIT ? OFFSET ?"
        ));
        assert_eq!(
            params,
            vec![
                Value::Text(owner.to_string()),
                Value::Text("2024-06-01T12:00:00.000000Z".to_string()),
                Value::Integer(10),
                Value::Integer(20),
            ]
        );
    }

    #[test]
    fn test_select_null_equality_and_empty_membership() {
        let selection = Selection::all()
            .and(Predicate::Eq {
                field: "description",
                value: FieldValue::Null,
            })
            .and(Predicate::In {
                field: "id",
                values: vec![],
            });

        let (sql, params) = select::<Item>(&selection);

        assert!(sql.contains("WHERE \"description\" IS NULL AND 1 = 0"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_membership_placeholders() {
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let selection = Selection::all().and(Predicate::In {
            field: "id",
            values: ids.iter().map(|id| FieldValue::from(*id)).collect(),
        });

        let (sql, params) = select::<Item>(&selection);

        assert!(sql.contains("\"id\" IN (?, ?)"));
        assert_eq!(params.len(), 2);
    }
}
