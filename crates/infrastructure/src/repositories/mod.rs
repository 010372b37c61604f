pub(crate) mod cascade;
pub mod sqlite_product_repository;
pub mod sqlite_review_repository;
pub mod sqlite_store_repository;
pub mod sqlite_user_repository;

pub use sqlite_product_repository::SqliteProductRepository;
pub use sqlite_review_repository::SqliteReviewRepository;
pub use sqlite_store_repository::SqliteStoreRepository;
pub use sqlite_user_repository::SqliteUserRepository;
