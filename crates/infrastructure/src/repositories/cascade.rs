//! Referential-cascade helpers shared by the SQLite repositories.
//!
//! SQLite foreign keys are not relied on for cascading; each delete runs
//! these steps inside the caller's transaction so a concurrent scan never
//! sees a half-deleted aggregate.

use crate::database::{products, reviews, store_products, stores};
use diesel::prelude::*;

/// Delete products with their reviews and store associations.
pub(crate) fn delete_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> QueryResult<()> {
    if product_ids.is_empty() {
        return Ok(());
    }

    diesel::delete(reviews::table.filter(reviews::product_id.eq_any(product_ids.iter().copied())))
        .execute(conn)?;
    diesel::delete(
        store_products::table.filter(store_products::product_id.eq_any(product_ids.iter().copied())),
    )
    .execute(conn)?;
    diesel::delete(products::table.filter(products::id.eq_any(product_ids.iter().copied())))
        .execute(conn)?;

    Ok(())
}

/// Delete stores, unlisting their products; a product left with no
/// remaining store is deleted outright (with its reviews).
pub(crate) fn delete_stores(conn: &mut SqliteConnection, store_ids: &[i32]) -> QueryResult<()> {
    if store_ids.is_empty() {
        return Ok(());
    }

    let listed: Vec<i32> = store_products::table
        .filter(store_products::store_id.eq_any(store_ids.iter().copied()))
        .select(store_products::product_id)
        .load(conn)?;

    diesel::delete(
        store_products::table.filter(store_products::store_id.eq_any(store_ids.iter().copied())),
    )
    .execute(conn)?;

    let survivors: Vec<i32> = store_products::table
        .filter(store_products::product_id.eq_any(listed.iter().copied()))
        .select(store_products::product_id)
        .load(conn)?;
    let orphaned: Vec<i32> = listed
        .into_iter()
        .filter(|product_id| !survivors.contains(product_id))
        .collect();
    delete_products(conn, &orphaned)?;

    diesel::delete(stores::table.filter(stores::id.eq_any(store_ids.iter().copied())))
        .execute(conn)?;

    Ok(())
}
