pub mod product;
pub mod review;
pub mod store;
pub mod user;

pub use product::*;
pub use review::*;
pub use store::*;
pub use user::*;
