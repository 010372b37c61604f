pub mod product_repository;
pub mod review_repository;
pub mod store_repository;
pub mod user_repository;

pub use product_repository::ProductRepository;
pub use review_repository::ReviewRepository;
pub use store_repository::StoreRepository;
pub use user_repository::UserRepository;
