use crate::entities::Store;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Store>, DomainError>;
    async fn find_by_owner(&self, owner_id: i32) -> Result<Vec<Store>, DomainError>;
    /// Substring match on title or description, folding ASCII case only
    /// (SQLite's LIKE does not fold non-ASCII characters).
    /// An absent or empty query returns the full store set.
    async fn search(&self, query: Option<&str>) -> Result<Vec<Store>, DomainError>;
    async fn save(&self, store: &Store) -> Result<Store, DomainError>;
    async fn update(&self, store: &Store) -> Result<Store, DomainError>;
    /// Deletes the store, its product associations, and any product (with
    /// its reviews) left without a remaining store.
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
    async fn find_all(&self) -> Result<Vec<Store>, DomainError>;
}
