//! In-memory repository fakes for service unit tests.

use crate::entities::{Product, ProductSpec, Review, Store, User};
use crate::errors::DomainError;
use crate::repositories::{ProductRepository, ReviewRepository, StoreRepository, UserRepository};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: Mutex<i32>,
}

impl InMemoryUserRepository {
    fn allocate_id(&self) -> i32 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == Some(id))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut stored = user.clone();
        stored.id = Some(self.allocate_id());
        self.users.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DomainError::RepositoryError("no such user".to_string()))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.users.lock().unwrap().retain(|u| u.id != Some(id));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryStoreRepository {
    stores: Mutex<Vec<Store>>,
    next_id: Mutex<i32>,
}

impl InMemoryStoreRepository {
    fn allocate_id(&self) -> i32 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }
}

#[async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Store>, DomainError> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == Some(id))
            .cloned())
    }

    async fn find_by_owner(&self, owner_id: i32) -> Result<Vec<Store>, DomainError> {
        Ok(self
            .stores
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn search(&self, query: Option<&str>) -> Result<Vec<Store>, DomainError> {
        let stores = self.stores.lock().unwrap();
        match query {
            Some(q) if !q.trim().is_empty() => {
                Ok(stores.iter().filter(|s| s.matches_query(q)).cloned().collect())
            }
            _ => Ok(stores.clone()),
        }
    }

    async fn save(&self, store: &Store) -> Result<Store, DomainError> {
        let mut stored = store.clone();
        stored.id = Some(self.allocate_id());
        self.stores.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, store: &Store) -> Result<Store, DomainError> {
        let mut stores = self.stores.lock().unwrap();
        let slot = stores
            .iter_mut()
            .find(|s| s.id == store.id)
            .ok_or_else(|| DomainError::RepositoryError("no such store".to_string()))?;
        *slot = store.clone();
        Ok(store.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.stores.lock().unwrap().retain(|s| s.id != Some(id));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Store>, DomainError> {
        Ok(self.stores.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
    next_id: Mutex<i32>,
}

impl InMemoryProductRepository {
    fn allocate_id(&self) -> i32 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == Some(id))
            .cloned())
    }

    async fn find_by_id_in_store(
        &self,
        product_id: i32,
        store_id: i32,
    ) -> Result<Option<Product>, DomainError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == Some(product_id) && p.is_listed_in(store_id))
            .cloned())
    }

    async fn find_by_store(&self, store_id: i32) -> Result<Vec<Product>, DomainError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_listed_in(store_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn save(&self, product: &Product) -> Result<Product, DomainError> {
        let mut stored = product.clone();
        stored.id = Some(self.allocate_id());
        self.products.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, product: &Product) -> Result<Product, DomainError> {
        let mut products = self.products.lock().unwrap();
        let slot = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| DomainError::RepositoryError("no such product".to_string()))?;
        *slot = product.clone();
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.products.lock().unwrap().retain(|p| p.id != Some(id));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryReviewRepository {
    reviews: Mutex<Vec<Review>>,
    next_id: Mutex<i32>,
}

impl InMemoryReviewRepository {
    fn allocate_id(&self) -> i32 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == Some(id))
            .cloned())
    }

    async fn find_by_product(&self, product_id: i32) -> Result<Vec<Review>, DomainError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_and_product(
        &self,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<Review>, DomainError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.product_id == product_id)
            .cloned())
    }

    async fn save(&self, review: &Review) -> Result<Review, DomainError> {
        let mut stored = review.clone();
        stored.id = Some(self.allocate_id());
        self.reviews.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, review: &Review) -> Result<Review, DomainError> {
        let mut reviews = self.reviews.lock().unwrap();
        let slot = reviews
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or_else(|| DomainError::RepositoryError("no such review".to_string()))?;
        *slot = review.clone();
        Ok(review.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.reviews.lock().unwrap().retain(|r| r.id != Some(id));
        Ok(())
    }
}

/// Fixture builder used across service tests.
pub fn spec(name: &str, price: Decimal, screen: f32, gpu: i32, cpu: i32, ram: i32, storage: i32) -> ProductSpec {
    ProductSpec {
        name: name.to_string(),
        screen_size: screen,
        price,
        processor: cpu,
        graphics_card: gpu,
        ram,
        storage,
        url: format!("https://example.com/{}", name.to_lowercase().replace(' ', "-")),
    }
}
