//! Ownership checks for mutations. A failed check is `Unauthorized`,
//! which callers keep distinct from not-found.

use crate::entities::{Product, Review, Store};

/// A user may modify a product iff they own at least one of the stores the
/// product is listed in. `owned_stores` are the acting user's stores.
pub fn can_modify_product(owned_stores: &[Store], product: &Product) -> bool {
    owned_stores
        .iter()
        .any(|store| store.id.is_some_and(|id| product.is_listed_in(id)))
}

/// A user may modify a review iff they authored it.
pub fn can_modify_review(user_id: i32, review: &Review) -> bool {
    review.user_id == user_id
}
