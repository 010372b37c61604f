use crate::dominance::dominates;
use crate::entities::Product;
use crate::errors::DomainError;
use crate::repositories::{ProductRepository, StoreRepository};
use std::sync::Arc;

/// The dominance query engine.
///
/// A reference product is always resolved scoped to its store, but the
/// candidate set is the whole catalog: a listing can be beaten by a
/// competitor's product from any store.
pub struct CatalogService {
    product_repository: Arc<dyn ProductRepository>,
    store_repository: Arc<dyn StoreRepository>,
}

impl CatalogService {
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        store_repository: Arc<dyn StoreRepository>,
    ) -> Self {
        Self {
            product_repository,
            store_repository,
        }
    }

    /// The cheapest product that dominates the referenced listing, if any.
    pub async fn first_dominator(
        &self,
        store_id: i32,
        product_id: i32,
    ) -> Result<Option<Product>, DomainError> {
        let dominators = self.ordered_dominators(store_id, product_id).await?;
        Ok(dominators.into_iter().next())
    }

    /// Every dominator except the cheapest, in ascending-price order.
    /// Empty when the listing has zero or one dominator.
    pub async fn subsequent_dominators(
        &self,
        store_id: i32,
        product_id: i32,
    ) -> Result<Vec<Product>, DomainError> {
        let dominators = self.ordered_dominators(store_id, product_id).await?;
        Ok(dominators.into_iter().skip(1).collect())
    }

    /// All products listed in a store, in the catalog's natural order.
    pub async fn list_products_for_store(
        &self,
        store_id: i32,
    ) -> Result<Vec<Product>, DomainError> {
        self.store_repository
            .find_by_id(store_id)
            .await?
            .ok_or(DomainError::StoreNotFound(store_id))?;

        self.product_repository.find_by_store(store_id).await
    }

    /// Full dominator set for the scoped reference, sorted by ascending
    /// price and then ascending id so both entry points slice one list.
    async fn ordered_dominators(
        &self,
        store_id: i32,
        product_id: i32,
    ) -> Result<Vec<Product>, DomainError> {
        let reference = self
            .product_repository
            .find_by_id_in_store(product_id, store_id)
            .await?
            .ok_or(DomainError::ProductNotFoundInStore {
                product_id,
                store_id,
            })?;

        let mut dominators: Vec<Product> = self
            .product_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|candidate| candidate.id != reference.id)
            .filter(|candidate| dominates(&reference, candidate))
            .collect();

        dominators.sort_by(|a, b| a.price().cmp(&b.price()).then(a.id.cmp(&b.id)));

        Ok(dominators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ProductSpec, Store};
    use crate::test_support::{spec, InMemoryProductRepository, InMemoryStoreRepository};
    use rust_decimal_macros::dec;

    struct Fixture {
        products: Arc<InMemoryProductRepository>,
        stores: Arc<InMemoryStoreRepository>,
        service: CatalogService,
    }

    fn fixture() -> Fixture {
        let products = Arc::new(InMemoryProductRepository::default());
        let stores = Arc::new(InMemoryStoreRepository::default());
        let service = CatalogService::new(products.clone(), stores.clone());
        Fixture {
            products,
            stores,
            service,
        }
    }

    async fn add_store(fx: &Fixture, title: &str, owner_id: i32) -> i32 {
        let store = fx
            .stores
            .save(&Store::new(title.to_string(), String::new(), owner_id))
            .await
            .unwrap();
        store.id.unwrap()
    }

    async fn add_product(fx: &Fixture, store_id: i32, spec: ProductSpec) -> i32 {
        let product = fx
            .products
            .save(&Product::new(spec, vec![store_id]))
            .await
            .unwrap();
        product.id.unwrap()
    }

    #[tokio::test]
    async fn first_dominator_picks_the_only_dominator() {
        let fx = fixture();
        let store_id = add_store(&fx, "Store", 1).await;

        let reference = add_product(&fx, store_id, spec("R", dec!(1000), 15.6, 4, 8, 16, 512)).await;
        let c1 = add_product(&fx, store_id, spec("C1", dec!(900), 15.6, 4, 8, 16, 512)).await;
        // Price not lower.
        add_product(&fx, store_id, spec("C2", dec!(1100), 15.6, 4, 8, 16, 512)).await;
        // Screen regresses.
        add_product(&fx, store_id, spec("C3", dec!(800), 13.0, 4, 8, 16, 512)).await;

        let first = fx.service.first_dominator(store_id, reference).await.unwrap();
        assert_eq!(first.unwrap().id, Some(c1));

        let rest = fx
            .service
            .subsequent_dominators(store_id, reference)
            .await
            .unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn dominators_are_split_by_ascending_price() {
        let fx = fixture();
        let store_id = add_store(&fx, "Store", 1).await;

        let reference = add_product(&fx, store_id, spec("R", dec!(1000), 15.6, 4, 8, 16, 512)).await;
        let d1 = add_product(&fx, store_id, spec("D1", dec!(950), 15.6, 4, 8, 16, 512)).await;
        let d2 = add_product(&fx, store_id, spec("D2", dec!(850), 15.6, 4, 8, 16, 512)).await;

        let first = fx.service.first_dominator(store_id, reference).await.unwrap();
        assert_eq!(first.unwrap().id, Some(d2));

        let rest = fx
            .service
            .subsequent_dominators(store_id, reference)
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, Some(d1));
    }

    #[tokio::test]
    async fn first_and_rest_partition_the_full_dominator_set() {
        let fx = fixture();
        let store_id = add_store(&fx, "Store", 1).await;

        let reference = add_product(&fx, store_id, spec("R", dec!(1000), 15.6, 4, 8, 16, 512)).await;
        for (name, price) in [("A", dec!(700)), ("B", dec!(950)), ("C", dec!(800))] {
            add_product(&fx, store_id, spec(name, price, 15.6, 4, 8, 16, 512)).await;
        }

        let first = fx
            .service
            .first_dominator(store_id, reference)
            .await
            .unwrap()
            .unwrap();
        let rest = fx
            .service
            .subsequent_dominators(store_id, reference)
            .await
            .unwrap();

        let mut combined: Vec<_> = std::iter::once(first.clone()).chain(rest.clone()).collect();
        let prices: Vec<_> = combined.iter().map(|p| p.price()).collect();
        assert_eq!(prices, vec![dec!(700), dec!(800), dec!(950)]);

        // No duplicates, no omissions.
        combined.dedup_by_key(|p| p.id);
        assert_eq!(combined.len(), 3);
        assert!(!rest.iter().any(|p| p.id == first.id));
    }

    #[tokio::test]
    async fn no_dominator_means_none_and_empty() {
        let fx = fixture();
        let store_id = add_store(&fx, "Store", 1).await;

        let reference = add_product(&fx, store_id, spec("R", dec!(500), 15.6, 4, 8, 16, 512)).await;
        add_product(&fx, store_id, spec("Pricier", dec!(600), 17.0, 8, 16, 32, 1024)).await;

        let first = fx.service.first_dominator(store_id, reference).await.unwrap();
        assert!(first.is_none());

        let rest = fx
            .service
            .subsequent_dominators(store_id, reference)
            .await
            .unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn candidates_come_from_the_whole_catalog() {
        let fx = fixture();
        let home = add_store(&fx, "Home", 1).await;
        let rival = add_store(&fx, "Rival", 2).await;

        let reference = add_product(&fx, home, spec("R", dec!(1000), 15.6, 4, 8, 16, 512)).await;
        let elsewhere = add_product(&fx, rival, spec("Cheap", dec!(900), 15.6, 4, 8, 16, 512)).await;

        let first = fx.service.first_dominator(home, reference).await.unwrap();
        assert_eq!(first.unwrap().id, Some(elsewhere));
    }

    #[tokio::test]
    async fn scoped_mismatch_is_not_found() {
        let fx = fixture();
        let home = add_store(&fx, "Home", 1).await;
        let other = add_store(&fx, "Other", 2).await;
        let product_id = add_product(&fx, home, spec("R", dec!(1000), 15.6, 4, 8, 16, 512)).await;

        // Product exists, but not under this store.
        let err = fx
            .service
            .first_dominator(other, product_id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::ProductNotFoundInStore { .. }
        ));
    }

    #[tokio::test]
    async fn equal_priced_dominators_break_ties_by_id() {
        let fx = fixture();
        let store_id = add_store(&fx, "Store", 1).await;

        let reference = add_product(&fx, store_id, spec("R", dec!(1000), 15.6, 4, 8, 16, 512)).await;
        let first_in = add_product(&fx, store_id, spec("E1", dec!(900), 15.6, 4, 8, 16, 512)).await;
        let second_in = add_product(&fx, store_id, spec("E2", dec!(900), 15.6, 4, 8, 16, 512)).await;

        let first = fx.service.first_dominator(store_id, reference).await.unwrap();
        assert_eq!(first.unwrap().id, Some(first_in));

        let rest = fx
            .service
            .subsequent_dominators(store_id, reference)
            .await
            .unwrap();
        assert_eq!(rest[0].id, Some(second_in));
    }

    #[tokio::test]
    async fn listing_requires_an_existing_store() {
        let fx = fixture();
        let err = fx.service.list_products_for_store(99).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreNotFound(99)));

        let store_id = add_store(&fx, "Store", 1).await;
        add_product(&fx, store_id, spec("P", dec!(100), 13.3, 2, 4, 8, 128)).await;
        let listed = fx.service.list_products_for_store(store_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
