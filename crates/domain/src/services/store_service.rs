use crate::entities::Store;
use crate::errors::DomainError;
use crate::repositories::StoreRepository;
use std::sync::Arc;

/// Store lifecycle and discovery.
pub struct StoreService {
    store_repository: Arc<dyn StoreRepository>,
}

impl StoreService {
    pub fn new(store_repository: Arc<dyn StoreRepository>) -> Self {
        Self { store_repository }
    }

    pub async fn create_store(
        &self,
        owner_id: i32,
        title: String,
        description: String,
    ) -> Result<Store, DomainError> {
        let store = Store::new(title, description, owner_id);
        store.validate()?;
        self.store_repository.save(&store).await
    }

    pub async fn get_store(&self, store_id: i32) -> Result<Store, DomainError> {
        self.store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(DomainError::StoreNotFound(store_id))
    }

    pub async fn update_store(
        &self,
        acting_user_id: i32,
        store_id: i32,
        title: String,
        description: String,
    ) -> Result<Store, DomainError> {
        let mut store = self.get_store(store_id).await?;
        if store.owner_id != acting_user_id {
            return Err(DomainError::Unauthorized(
                "only the owner may update a store".to_string(),
            ));
        }

        store.title = title;
        store.description = description;
        store.validate()?;
        self.store_repository.update(&store).await
    }

    pub async fn delete_store(
        &self,
        acting_user_id: i32,
        store_id: i32,
    ) -> Result<(), DomainError> {
        let store = self.get_store(store_id).await?;
        if store.owner_id != acting_user_id {
            return Err(DomainError::Unauthorized(
                "only the owner may delete a store".to_string(),
            ));
        }

        self.store_repository.delete(store_id).await
    }

    /// Stores owned by the acting user.
    pub async fn list_stores_for_user(&self, user_id: i32) -> Result<Vec<Store>, DomainError> {
        self.store_repository.find_by_owner(user_id).await
    }

    /// Absent or empty query returns every store; otherwise a substring
    /// match on title or description, folding ASCII case only.
    pub async fn search_stores(&self, query: Option<&str>) -> Result<Vec<Store>, DomainError> {
        self.store_repository.search(query).await
    }

    pub async fn list_stores(&self) -> Result<Vec<Store>, DomainError> {
        self.store_repository.find_all().await
    }
}
