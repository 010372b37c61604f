use crate::database::{stores, SqlitePool};
use crate::repositories::cascade;
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use domain::{DomainError, Store, StoreRepository};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = stores)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct StoreModel {
    id: i32,
    title: String,
    description: String,
    owner_id: i32,
    created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = stores)]
struct NewStoreModel {
    title: String,
    description: String,
    owner_id: i32,
    created_at: NaiveDateTime,
}

impl From<StoreModel> for Store {
    fn from(model: StoreModel) -> Self {
        Store::with_id(
            model.id,
            model.title,
            model.description,
            model.owner_id,
            Utc.from_utc_datetime(&model.created_at),
        )
    }
}

impl From<&Store> for NewStoreModel {
    fn from(store: &Store) -> Self {
        NewStoreModel {
            title: store.title.clone(),
            description: store.description.clone(),
            owner_id: store.owner_id,
            created_at: store.created_at.naive_utc(),
        }
    }
}

pub struct SqliteStoreRepository {
    pool: SqlitePool,
}

impl SqliteStoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreRepository for SqliteStoreRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Store>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            stores::table
                .filter(stores::id.eq(id))
                .select(StoreModel::as_select())
                .first::<StoreModel>(&mut conn)
                .optional()
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.map(|model| model.into()))
    }

    async fn find_by_owner(&self, owner_id: i32) -> Result<Vec<Store>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            stores::table
                .filter(stores::owner_id.eq(owner_id))
                .order(stores::created_at.desc())
                .select(StoreModel::as_select())
                .load::<StoreModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }

    async fn search(&self, query: Option<&str>) -> Result<Vec<Store>, DomainError> {
        let query = query.map(str::trim).filter(|q| !q.is_empty()).map(String::from);

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || match query {
            Some(q) => {
                // SQLite LIKE is already case-insensitive for ASCII.
                let pattern = format!("%{}%", q);
                stores::table
                    .filter(
                        stores::title
                            .like(pattern.clone())
                            .or(stores::description.like(pattern)),
                    )
                    .order(stores::created_at.desc())
                    .select(StoreModel::as_select())
                    .load::<StoreModel>(&mut conn)
            }
            None => stores::table
                .order(stores::created_at.desc())
                .select(StoreModel::as_select())
                .load::<StoreModel>(&mut conn),
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }

    async fn save(&self, store: &Store) -> Result<Store, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_store = NewStoreModel::from(store);

        let result = tokio::task::spawn_blocking(move || {
            // Insert and read-back share one transaction; the max-id lookup
            // must not observe a concurrent writer's row.
            conn.transaction(|conn| {
                diesel::insert_into(stores::table)
                    .values(&new_store)
                    .execute(conn)?;

                stores::table
                    .order(stores::id.desc())
                    .select(StoreModel::as_select())
                    .first::<StoreModel>(conn)
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, store: &Store) -> Result<Store, DomainError> {
        let store_id = store.id.ok_or_else(|| {
            DomainError::ValidationError("Store ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let title = store.title.clone();
        let description = store.description.clone();

        let result = tokio::task::spawn_blocking(move || {
            diesel::update(stores::table.filter(stores::id.eq(store_id)))
                .set((
                    stores::title.eq(title),
                    stores::description.eq(description),
                ))
                .execute(&mut conn)?;

            stores::table
                .filter(stores::id.eq(store_id))
                .select(StoreModel::as_select())
                .first::<StoreModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| cascade::delete_stores(conn, &[id]))
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Store>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            stores::table
                .order(stores::created_at.desc())
                .select(StoreModel::as_select())
                .load::<StoreModel>(&mut conn)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        Ok(result.into_iter().map(|model| model.into()).collect())
    }
}
