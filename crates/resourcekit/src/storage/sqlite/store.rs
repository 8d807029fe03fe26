//! SQLite store implementation.

use std::marker::PhantomData;

use async_trait::async_trait;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tokio_rusqlite::Connection;

use resourcekit_core::record::{FieldMap, Record, ID_FIELD};
use resourcekit_core::selection::Selection;
use resourcekit_core::storage::{Store, StoreError};

use super::conversions::{record_to_params, row_to_fields, to_sql_value};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

fn to_record<R: Record>(fields: FieldMap) -> Result<R, StoreError> {
    R::from_fields(fields).map_err(|e| StoreError::serialization(e.to_string()))
}

/// SQLite-backed store for one record type.
///
/// Each store owns its connection; several stores may share one database file.
pub struct SqliteStore<R> {
    conn: Connection,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SqliteStore<R> {
    /// Creates a new store with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// The table for `R` is created automatically.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        Self::init_schema(conn).await
    }

    /// Creates a new store with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        Self::init_schema(conn).await
    }

    async fn init_schema(conn: Connection) -> Result<Self, StoreError> {
        let ddl = schema::create_table::<R>();
        conn.call(move |conn| {
            conn.execute_batch(&ddl).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(map_tokio_rusqlite_error)?;

        tracing::debug!(table = R::TABLE, "SQLite table ready");

        Ok(Self {
            conn,
            _record: PhantomData,
        })
    }

    /// Reads back the row with `id` after a write.
    async fn refresh(&self, id: String) -> Result<R, StoreError> {
        let sql = schema::select_by_id::<R>();
        let fields = self
            .conn
            .call(move |conn| {
                conn.query_row(&sql, [&id], |row| row_to_fields(row, R::FIELDS))
                    .map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        to_record(fields)
    }
}

#[async_trait]
impl<R: Record> Store<R> for SqliteStore<R> {
    async fn select(&self, selection: &Selection) -> Result<Vec<R>, StoreError> {
        let (sql, params) = schema::select::<R>(selection);

        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), |row| {
                        row_to_fields(row, R::FIELDS)
                    })
                    .map_err(wrap_err)?;

                let mut fields = Vec::new();
                for row_result in rows {
                    fields.push(row_result.map_err(wrap_err)?);
                }
                Ok(fields)
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        rows.into_iter().map(to_record).collect()
    }

    async fn insert(&self, record: R) -> Result<R, StoreError> {
        let sql = schema::insert::<R>();
        let params = record_to_params(&record);

        self.conn
            .call(move |conn| {
                conn.execute(&sql, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        self.refresh(record.id().to_string()).await
    }

    async fn save(&self, record: R) -> Result<R, StoreError> {
        let sql = schema::update::<R>();
        let id = record.id().to_string();
        let mut params: Vec<Value> = R::FIELDS
            .iter()
            .filter(|def| def.name != ID_FIELD)
            .map(|def| record.get(def.name).map(|v| to_sql_value(&v)).unwrap_or(Value::Null))
            .collect();
        params.push(Value::Text(id.clone()));

        self.conn
            .call(move |conn| {
                let changed = conn
                    .execute(&sql, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                if changed == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)?;

        self.refresh(id).await
    }

    async fn remove(&self, record: &R) -> Result<(), StoreError> {
        let sql = schema::delete::<R>();
        let id = record.id().to_string();

        self.conn
            .call(move |conn| {
                let changed = conn.execute(&sql, [&id]).map_err(wrap_err)?;
                if changed == 0 {
                    return Err(wrap_err(rusqlite::Error::QueryReturnedNoRows));
                }
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use resourcekit_core::filters::{BeforeAfter, Filters, LimitOffset};
    use resourcekit_core::record::FieldValue;
    use resourcekit_core::selection::Predicate;
    use resourcekit_core::storage::{
        Repository, RepositoryError, RepositoryParams, StoreErrorKind,
    };
    use uuid::Uuid;

    use super::*;
    use crate::models::Item;

    fn item(name: &str, day: u32) -> Item {
        let at = Utc.with_ymd_and_hms(2024, 6, day, 0, 0, 0).unwrap();
        Item {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            owner_id: None,
            created: at,
            updated: at,
        }
    }

    async fn store() -> SqliteStore<Item> {
        SqliteStore::new_in_memory().await.unwrap()
    }

    fn names(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_insert_and_refresh() {
        let store = store().await;
        let mut lamp = item("lamp", 1);
        lamp.description = Some("brass".to_string());

        let stored = store.insert(lamp.clone()).await.unwrap();

        assert_eq!(stored, lamp);
    }

    #[tokio::test]
    async fn test_select_keeps_insertion_order() {
        let store = store().await;
        for (name, day) in [("c", 3), ("a", 1), ("b", 2)] {
            store.insert(item(name, day)).await.unwrap();
        }

        let rows = store.select(&Selection::all()).await.unwrap();

        assert_eq!(names(&rows), vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_select_with_range_and_window() {
        let store = store().await;
        for day in 1..=6 {
            store.insert(item(&day.to_string(), day)).await.unwrap();
        }

        let selection = Selection::all()
            .and(Predicate::After {
                field: "created",
                at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            })
            .and(Predicate::Before {
                field: "created",
                at: Utc.with_ymd_and_hms(2024, 6, 6, 0, 0, 0).unwrap(),
            })
            .paginate(LimitOffset::new(2, 1));
        let rows = store.select(&selection).await.unwrap();

        assert_eq!(names(&rows), vec!["3", "4"]);
    }

    #[tokio::test]
    async fn test_select_null_owner() {
        let store = store().await;
        let mut owned = item("owned", 1);
        owned.owner_id = Some(Uuid::new_v4());
        store.insert(owned).await.unwrap();
        store.insert(item("orphan", 2)).await.unwrap();

        let selection = Selection::all().and(Predicate::Eq {
            field: "owner_id",
            value: FieldValue::Null,
        });
        let rows = store.select(&selection).await.unwrap();

        assert_eq!(names(&rows), vec!["orphan"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_integrity_error() {
        let store = store().await;
        store.insert(item("lamp", 1)).await.unwrap();

        let error = store.insert(item("lamp", 2)).await.unwrap_err();

        assert_eq!(error.kind, StoreErrorKind::Integrity);
    }

    #[tokio::test]
    async fn test_duplicate_id_is_integrity_error() {
        let store = store().await;
        let lamp = item("lamp", 1);
        let mut chair = item("chair", 1);
        chair.id = lamp.id;
        store.insert(lamp).await.unwrap();

        let error = store.insert(chair).await.unwrap_err();

        assert_eq!(error.kind, StoreErrorKind::Integrity);
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let store = store().await;
        let mut lamp = store.insert(item("lamp", 1)).await.unwrap();

        lamp.description = Some("brass".to_string());
        let saved = store.save(lamp.clone()).await.unwrap();
        assert_eq!(saved.description.as_deref(), Some("brass"));

        store.remove(&saved).await.unwrap();
        assert!(store.select(&Selection::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_remove_missing_rows() {
        let store = store().await;
        let ghost = item("ghost", 1);

        assert_eq!(
            store.save(ghost.clone()).await.unwrap_err().kind,
            StoreErrorKind::Missing
        );
        assert_eq!(
            store.remove(&ghost).await.unwrap_err().kind,
            StoreErrorKind::Missing
        );
    }

    #[tokio::test]
    async fn test_repository_round_trip_over_sqlite() {
        let store: Arc<dyn Store<Item>> = Arc::new(store().await);
        let repository = Repository::<Item>::new(store.clone());

        let created = repository
            .create(
                [("name".to_string(), FieldValue::from("lamp"))]
                    .into_iter()
                    .collect(),
            )
            .await
            .unwrap();
        let scoped =
            Repository::<Item>::construct(store.clone(), RepositoryParams::new(Some(created.id)))
                .unwrap();

        assert_eq!(scoped.scalar().await.unwrap(), created);

        let updated = scoped
            .update(
                [("description".to_string(), FieldValue::from("brass"))]
                    .into_iter()
                    .collect(),
            )
            .await
            .unwrap();
        assert_eq!(updated.description.as_deref(), Some("brass"));
        assert!(updated.updated >= updated.created);

        scoped.delete().await.unwrap();
        assert!(matches!(
            scoped.scalar().await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_repository_conflict_over_sqlite() {
        let store: Arc<dyn Store<Item>> = Arc::new(store().await);
        let repository = Repository::<Item>::new(store);
        let payload: FieldMap = [("name".to_string(), FieldValue::from("lamp"))]
            .into_iter()
            .collect();

        repository.create(payload.clone()).await.unwrap();
        let result = repository.create(payload).await;

        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_repository_filters_over_sqlite() {
        let store: Arc<dyn Store<Item>> = Arc::new(store().await);
        let mut wanted = Vec::new();
        for day in 1..=5 {
            let row = store.insert(item(&day.to_string(), day)).await.unwrap();
            if day != 3 {
                wanted.push(row.id);
            }
        }

        let first_day = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let filters = Filters::none()
            .with_ids(wanted)
            .with_updated(BeforeAfter::updated(None, Some(first_day)));
        let params = RepositoryParams::new(None).with_filters(filters);
        let repository = Repository::<Item>::construct(store, params).unwrap();

        assert_eq!(
            names(&repository.scalars().await.unwrap()),
            vec!["2", "4", "5"]
        );
    }
}
