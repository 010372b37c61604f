use crate::entities::Product;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;
    /// Scoped lookup: the product must be listed in the given store.
    async fn find_by_id_in_store(
        &self,
        product_id: i32,
        store_id: i32,
    ) -> Result<Option<Product>, DomainError>;
    async fn find_by_store(&self, store_id: i32) -> Result<Vec<Product>, DomainError>;
    /// The whole catalog across every store, newest first.
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;
    async fn save(&self, product: &Product) -> Result<Product, DomainError>;
    async fn update(&self, product: &Product) -> Result<Product, DomainError>;
    /// Deletes the product together with its store associations and reviews.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
