use crate::entities::{Product, ProductSpec};
use crate::errors::DomainError;
use crate::repositories::{ProductRepository, StoreRepository};
use crate::services::access::can_modify_product;
use std::sync::Arc;

/// Product lifecycle, guarded by store ownership.
pub struct ProductService {
    product_repository: Arc<dyn ProductRepository>,
    store_repository: Arc<dyn StoreRepository>,
}

impl ProductService {
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        store_repository: Arc<dyn StoreRepository>,
    ) -> Self {
        Self {
            product_repository,
            store_repository,
        }
    }

    /// Create a listing in a store the acting user owns. An absent store is
    /// not-found; someone else's store is unauthorized.
    pub async fn create_product(
        &self,
        acting_user_id: i32,
        store_id: i32,
        spec: ProductSpec,
    ) -> Result<Product, DomainError> {
        let store = self
            .store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(DomainError::StoreNotFound(store_id))?;

        if store.owner_id != acting_user_id {
            return Err(DomainError::Unauthorized(
                "only the store owner may add products".to_string(),
            ));
        }

        let product = Product::new(spec, vec![store_id]);
        product.validate()?;
        self.product_repository.save(&product).await
    }

    /// Scoped lookup: the product must be listed in the given store.
    pub async fn get_product_in_store(
        &self,
        store_id: i32,
        product_id: i32,
    ) -> Result<Product, DomainError> {
        self.product_repository
            .find_by_id_in_store(product_id, store_id)
            .await?
            .ok_or(DomainError::ProductNotFoundInStore {
                product_id,
                store_id,
            })
    }

    pub async fn update_product(
        &self,
        acting_user_id: i32,
        store_id: i32,
        product_id: i32,
        spec: ProductSpec,
    ) -> Result<Product, DomainError> {
        let mut product = self.get_product_in_store(store_id, product_id).await?;
        self.authorize(acting_user_id, &product).await?;

        product.apply_spec(spec);
        product.validate()?;
        self.product_repository.update(&product).await
    }

    pub async fn delete_product(
        &self,
        acting_user_id: i32,
        store_id: i32,
        product_id: i32,
    ) -> Result<(), DomainError> {
        let product = self.get_product_in_store(store_id, product_id).await?;
        self.authorize(acting_user_id, &product).await?;

        self.product_repository.delete(product_id).await
    }

    /// Cross-list an existing product into another store the acting user
    /// owns. The user must already control the product through one of its
    /// current stores.
    pub async fn list_in_store(
        &self,
        acting_user_id: i32,
        store_id: i32,
        product_id: i32,
    ) -> Result<Product, DomainError> {
        let store = self
            .store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(DomainError::StoreNotFound(store_id))?;

        if store.owner_id != acting_user_id {
            return Err(DomainError::Unauthorized(
                "only the store owner may list products in it".to_string(),
            ));
        }

        let mut product = self
            .product_repository
            .find_by_id(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;
        self.authorize(acting_user_id, &product).await?;

        if !product.is_listed_in(store_id) {
            product.store_ids.push(store_id);
            product = self.product_repository.update(&product).await?;
        }

        Ok(product)
    }

    async fn authorize(&self, acting_user_id: i32, product: &Product) -> Result<(), DomainError> {
        let owned_stores = self.store_repository.find_by_owner(acting_user_id).await?;
        if !can_modify_product(&owned_stores, product) {
            return Err(DomainError::Unauthorized(
                "user owns none of the stores listing this product".to_string(),
            ));
        }
        Ok(())
    }
}
