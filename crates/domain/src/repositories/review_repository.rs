use crate::entities::Review;
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, DomainError>;
    async fn find_by_product(&self, product_id: i32) -> Result<Vec<Review>, DomainError>;
    async fn find_by_user_and_product(
        &self,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<Review>, DomainError>;
    async fn save(&self, review: &Review) -> Result<Review, DomainError>;
    async fn update(&self, review: &Review) -> Result<Review, DomainError>;
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
