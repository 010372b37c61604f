pub mod access;
pub mod catalog_service;
pub mod product_service;
pub mod review_service;
pub mod store_service;
pub mod user_service;

pub use access::{can_modify_product, can_modify_review};
pub use catalog_service::CatalogService;
pub use product_service::ProductService;
pub use review_service::ReviewService;
pub use store_service::StoreService;
pub use user_service::UserService;
