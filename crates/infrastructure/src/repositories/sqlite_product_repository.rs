use crate::database::{products, store_products, SqlitePool};
use crate::repositories::cascade;
use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use domain::{DomainError, Product, ProductRepository, ProductSpec};
use rust_decimal::Decimal;
use std::str::FromStr;

// Database model - separate from domain entity. The price column holds the
// canonical decimal string; a row that fails to parse surfaces as a
// repository error rather than a panic.
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ProductModel {
    id: i32,
    name: String,
    screen_size: f32,
    price: String,
    processor: i32,
    graphics_card: i32,
    ram: i32,
    storage: i32,
    url: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = products)]
struct NewProductModel {
    name: String,
    screen_size: f32,
    price: String,
    processor: i32,
    graphics_card: i32,
    ram: i32,
    storage: i32,
    url: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<&Product> for NewProductModel {
    fn from(product: &Product) -> Self {
        NewProductModel {
            name: product.spec.name.clone(),
            screen_size: product.spec.screen_size,
            price: product.spec.price.to_string(),
            processor: product.spec.processor,
            graphics_card: product.spec.graphics_card,
            ram: product.spec.ram,
            storage: product.spec.storage,
            url: product.spec.url.clone(),
            created_at: product.created_at.naive_utc(),
            updated_at: product.updated_at.naive_utc(),
        }
    }
}

fn to_domain(model: ProductModel, store_ids: Vec<i32>) -> Result<Product, DomainError> {
    let price = Decimal::from_str(&model.price).map_err(|e| {
        DomainError::RepositoryError(format!(
            "corrupt price '{}' for product {}: {}",
            model.price, model.id, e
        ))
    })?;

    Ok(Product::with_id(
        model.id,
        ProductSpec {
            name: model.name,
            screen_size: model.screen_size,
            price,
            processor: model.processor,
            graphics_card: model.graphics_card,
            ram: model.ram,
            storage: model.storage,
            url: model.url,
        },
        store_ids,
        Utc.from_utc_datetime(&model.created_at),
        Utc.from_utc_datetime(&model.updated_at),
    ))
}

fn load_store_ids(conn: &mut SqliteConnection, product_id: i32) -> QueryResult<Vec<i32>> {
    store_products::table
        .filter(store_products::product_id.eq(product_id))
        .order(store_products::id.asc())
        .select(store_products::store_id)
        .load(conn)
}

/// Attach store ids to a batch of rows with one join-table query.
fn to_domain_batch(
    conn: &mut SqliteConnection,
    models: Vec<ProductModel>,
) -> QueryResult<Vec<(ProductModel, Vec<i32>)>> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let associations: Vec<(i32, i32)> = store_products::table
        .filter(store_products::product_id.eq_any(ids.iter().copied()))
        .order(store_products::id.asc())
        .select((store_products::product_id, store_products::store_id))
        .load(conn)?;

    Ok(models
        .into_iter()
        .map(|model| {
            let store_ids = associations
                .iter()
                .filter(|(product_id, _)| *product_id == model.id)
                .map(|(_, store_id)| *store_id)
                .collect();
            (model, store_ids)
        })
        .collect())
}

pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            let model = products::table
                .filter(products::id.eq(id))
                .select(ProductModel::as_select())
                .first::<ProductModel>(&mut conn)
                .optional()?;

            match model {
                Some(model) => {
                    let store_ids = load_store_ids(&mut conn, model.id)?;
                    Ok(Some((model, store_ids)))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        result.map(|(model, store_ids)| to_domain(model, store_ids)).transpose()
    }

    async fn find_by_id_in_store(
        &self,
        product_id: i32,
        store_id: i32,
    ) -> Result<Option<Product>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            let model = products::table
                .inner_join(store_products::table)
                .filter(products::id.eq(product_id))
                .filter(store_products::store_id.eq(store_id))
                .select(ProductModel::as_select())
                .first::<ProductModel>(&mut conn)
                .optional()?;

            match model {
                Some(model) => {
                    let store_ids = load_store_ids(&mut conn, model.id)?;
                    Ok(Some((model, store_ids)))
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        result.map(|(model, store_ids)| to_domain(model, store_ids)).transpose()
    }

    async fn find_by_store(&self, store_id: i32) -> Result<Vec<Product>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            let models = products::table
                .inner_join(store_products::table)
                .filter(store_products::store_id.eq(store_id))
                .order(products::created_at.desc())
                .select(ProductModel::as_select())
                .load::<ProductModel>(&mut conn)?;

            to_domain_batch(&mut conn, models)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        result
            .into_iter()
            .map(|(model, store_ids)| to_domain(model, store_ids))
            .collect()
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let result = tokio::task::spawn_blocking(move || {
            let models = products::table
                .order(products::created_at.desc())
                .select(ProductModel::as_select())
                .load::<ProductModel>(&mut conn)?;

            to_domain_batch(&mut conn, models)
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        result
            .into_iter()
            .map(|(model, store_ids)| to_domain(model, store_ids))
            .collect()
    }

    async fn save(&self, product: &Product) -> Result<Product, DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let new_product = NewProductModel::from(product);
        let store_ids = product.store_ids.clone();

        let result = tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| {
                diesel::insert_into(products::table)
                    .values(&new_product)
                    .execute(conn)?;

                // Get the last inserted row
                let model = products::table
                    .order(products::id.desc())
                    .select(ProductModel::as_select())
                    .first::<ProductModel>(conn)?;

                for store_id in &store_ids {
                    diesel::insert_into(store_products::table)
                        .values((
                            store_products::store_id.eq(*store_id),
                            store_products::product_id.eq(model.id),
                        ))
                        .execute(conn)?;
                }

                Ok((model, store_ids))
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        let (model, store_ids) = result;
        to_domain(model, store_ids)
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let product_id = product.id.ok_or_else(|| {
            DomainError::ValidationError("Product ID is required for updates".to_string())
        })?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        let changes = NewProductModel::from(product);
        let store_ids = product.store_ids.clone();
        let created_at = product.created_at.naive_utc();

        let result = tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| {
                diesel::update(products::table.filter(products::id.eq(product_id)))
                    .set((
                        products::name.eq(changes.name),
                        products::screen_size.eq(changes.screen_size),
                        products::price.eq(changes.price),
                        products::processor.eq(changes.processor),
                        products::graphics_card.eq(changes.graphics_card),
                        products::ram.eq(changes.ram),
                        products::storage.eq(changes.storage),
                        products::url.eq(changes.url),
                        products::created_at.eq(created_at),
                        products::updated_at.eq(changes.updated_at),
                    ))
                    .execute(conn)?;

                // Rewrite the store associations to match the entity.
                diesel::delete(
                    store_products::table.filter(store_products::product_id.eq(product_id)),
                )
                .execute(conn)?;
                for store_id in &store_ids {
                    diesel::insert_into(store_products::table)
                        .values((
                            store_products::store_id.eq(*store_id),
                            store_products::product_id.eq(product_id),
                        ))
                        .execute(conn)?;
                }

                let model = products::table
                    .filter(products::id.eq(product_id))
                    .select(ProductModel::as_select())
                    .first::<ProductModel>(conn)?;

                Ok((model, store_ids))
            })
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        let (model, store_ids) = result;
        to_domain(model, store_ids)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            conn.transaction(|conn| cascade::delete_products(conn, &[id]))
        })
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(|e: diesel::result::Error| DomainError::RepositoryError(e.to_string()))?;

        Ok(())
    }
}
