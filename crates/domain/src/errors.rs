use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("User not found with id: {0}")]
    UserNotFound(i32),

    #[error("Username already taken: {0}")]
    UsernameAlreadyExists(String),

    #[error("Store not found with id: {0}")]
    StoreNotFound(i32),

    #[error("Product {product_id} not found in store {store_id}")]
    ProductNotFoundInStore { product_id: i32, store_id: i32 },

    #[error("Product not found with id: {0}")]
    ProductNotFound(i32),

    #[error("Review not found with id: {0}")]
    ReviewNotFound(i32),

    #[error("User {user_id} already reviewed product {product_id}")]
    DuplicateReview { user_id: i32, product_id: i32 },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Repository error: {0}")]
    RepositoryError(String),
}
