use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::info;

/// Marketplace application - wires the SQLite adapters into the domain
/// services and exposes the composed surface to the binaries.
pub struct MarketplaceApp {
    pub user_service: UserService,
    pub store_service: StoreService,
    pub product_service: ProductService,
    pub review_service: ReviewService,
    pub catalog_service: CatalogService,
}

impl MarketplaceApp {
    pub fn new(database_path: &str) -> Self {
        // Infrastructure layer - database setup
        let database = Database::new(database_path);
        let pool = database.get_pool().clone();

        // Create repository implementations
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let store_repository: Arc<dyn StoreRepository> =
            Arc::new(SqliteStoreRepository::new(pool.clone()));
        let product_repository: Arc<dyn ProductRepository> =
            Arc::new(SqliteProductRepository::new(pool.clone()));
        let review_repository: Arc<dyn ReviewRepository> =
            Arc::new(SqliteReviewRepository::new(pool));

        // Domain services
        let user_service = UserService::new(user_repository);
        let store_service = StoreService::new(store_repository.clone());
        let product_service =
            ProductService::new(product_repository.clone(), store_repository.clone());
        let review_service =
            ReviewService::new(review_repository, product_repository.clone());
        let catalog_service = CatalogService::new(product_repository, store_repository);

        Self {
            user_service,
            store_service,
            product_service,
            review_service,
            catalog_service,
        }
    }

    /// Create a listing and immediately look up the cheapest product that
    /// beats it, the way the storefront lands sellers on the price
    /// comparison right after adding a product.
    pub async fn add_product_and_compare(
        &self,
        acting_user_id: i32,
        store_id: i32,
        spec: ProductSpec,
    ) -> Result<(Product, Option<Product>), DomainError> {
        let product = self
            .product_service
            .create_product(acting_user_id, store_id, spec)
            .await?;
        let product_id = product.id.unwrap_or(0);
        info!(product_id, store_id, "created product listing");

        let cheaper = self
            .catalog_service
            .first_dominator(store_id, product_id)
            .await?;
        if let Some(found) = &cheaper {
            info!(
                beaten_by = found.id.unwrap_or(0),
                "listing is dominated on price"
            );
        }

        Ok((product, cheaper))
    }
}
