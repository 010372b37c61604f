use application::MarketplaceApp;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use domain::{DomainError, Product, ProductSpec, Review, Store, User};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod config;
use config::Config;

#[derive(Clone)]
struct AppState {
    app: Arc<MarketplaceApp>,
}

#[derive(Debug, Deserialize)]
struct RegisterUserRequest {
    username: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct StoreRequest {
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    comment: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct UserInfo {
    id: Option<i32>,
    username: String,
    email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
struct StoreInfo {
    id: Option<i32>,
    title: String,
    description: String,
    owner_id: i32,
    created_at: DateTime<Utc>,
}

impl From<Store> for StoreInfo {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            title: store.title,
            description: store.description,
            owner_id: store.owner_id,
            created_at: store.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProductInfo {
    id: Option<i32>,
    name: String,
    screen_size: f32,
    price: Decimal,
    processor: i32,
    graphics_card: i32,
    ram: i32,
    storage: i32,
    url: String,
    store_ids: Vec<i32>,
}

impl From<Product> for ProductInfo {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.spec.name,
            screen_size: product.spec.screen_size,
            price: product.spec.price,
            processor: product.spec.processor,
            graphics_card: product.spec.graphics_card,
            ram: product.spec.ram,
            storage: product.spec.storage,
            url: product.spec.url,
            store_ids: product.store_ids,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReviewInfo {
    id: Option<i32>,
    comment: String,
    product_id: i32,
    user_id: i32,
    created_at: DateTime<Utc>,
}

impl From<Review> for ReviewInfo {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            comment: review.comment,
            product_id: review.product_id,
            user_id: review.user_id,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ComparisonResponse {
    product: ProductInfo,
    cheaper: Option<ProductInfo>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("api_server=debug,tower_http=debug")
        .init();

    info!("Starting marketplace catalog API server");

    // Load configuration from environment
    let config = Config::from_env();
    info!("Using database: {}", config.database_path);

    let app_state = AppState {
        app: Arc::new(MarketplaceApp::new(&config.database_path)),
    };

    // Build our application with routes
    let app = Router::new()
        // Accounts
        .route("/api/users", post(register_user))
        // Store discovery and management
        .route("/api/stores", get(search_stores).post(create_store))
        .route(
            "/api/stores/:store_id",
            get(get_store).put(update_store).delete(delete_store),
        )
        .route("/api/my/stores", get(my_stores))
        // Products within a store
        .route(
            "/api/stores/:store_id/products",
            get(list_products).post(add_product),
        )
        .route(
            "/api/stores/:store_id/products/:product_id",
            post(cross_list_product)
                .put(update_product)
                .delete(delete_product),
        )
        // Price comparison
        .route(
            "/api/stores/:store_id/products/:product_id/cheaper",
            get(first_dominator),
        )
        .route(
            "/api/stores/:store_id/products/:product_id/cheaper/rest",
            get(subsequent_dominators),
        )
        // Reviews
        .route(
            "/api/products/:product_id/reviews",
            get(list_reviews).post(add_review),
        )
        .route("/api/products/:product_id/reviews/mine", get(my_review))
        .route(
            "/api/reviews/:review_id",
            put(update_review).delete(delete_review),
        )
        // Health check
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let bind_address = format!("{}:{}", config.api_host, config.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("API server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

/// The acting user arrives as a header set by the auth gateway. A guarded
/// route without it is unauthenticated, not anonymous.
fn acting_user(headers: &HeaderMap) -> Result<i32, DomainError> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .ok_or(DomainError::Unauthenticated)
}

fn error_response(error: DomainError) -> Response {
    let status = match &error {
        DomainError::UserNotFound(_)
        | DomainError::StoreNotFound(_)
        | DomainError::ProductNotFound(_)
        | DomainError::ProductNotFoundInStore { .. }
        | DomainError::ReviewNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Unauthorized(_) => StatusCode::FORBIDDEN,
        DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
        DomainError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::UsernameAlreadyExists(_) | DomainError::DuplicateReview { .. } => {
            StatusCode::CONFLICT
        }
        DomainError::RepositoryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(serde_json::json!({ "error": error.to_string() }))).into_response()
}

// Handler functions
async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> impl IntoResponse {
    match state
        .app
        .user_service
        .register_user(payload.username, payload.email)
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(UserInfo::from(user))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn search_stores(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    match state
        .app
        .store_service
        .search_stores(params.q.as_deref())
        .await
    {
        Ok(stores) => {
            let infos: Vec<StoreInfo> = stores.into_iter().map(Into::into).collect();
            Json(infos).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn create_store(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<StoreRequest>,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .store_service
        .create_store(user_id, payload.title, payload.description)
        .await
    {
        Ok(store) => (StatusCode::CREATED, Json(StoreInfo::from(store))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_store(State(state): State<AppState>, Path(store_id): Path<i32>) -> impl IntoResponse {
    match state.app.store_service.get_store(store_id).await {
        Ok(store) => Json(StoreInfo::from(store)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_store(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<StoreRequest>,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .store_service
        .update_store(user_id, store_id, payload.title, payload.description)
        .await
    {
        Ok(store) => Json(StoreInfo::from(store)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_store(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state.app.store_service.delete_store(user_id, store_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn my_stores(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state.app.store_service.list_stores_for_user(user_id).await {
        Ok(stores) => {
            let infos: Vec<StoreInfo> = stores.into_iter().map(Into::into).collect();
            Json(infos).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn list_products(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
) -> impl IntoResponse {
    match state
        .app
        .catalog_service
        .list_products_for_store(store_id)
        .await
    {
        Ok(products) => {
            let infos: Vec<ProductInfo> = products.into_iter().map(Into::into).collect();
            Json(infos).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn add_product(
    State(state): State<AppState>,
    Path(store_id): Path<i32>,
    headers: HeaderMap,
    Json(spec): Json<ProductSpec>,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    // The storefront lands sellers on the comparison view right after
    // adding a product, so the response carries the first dominator too.
    match state
        .app
        .add_product_and_compare(user_id, store_id, spec)
        .await
    {
        Ok((product, cheaper)) => (
            StatusCode::CREATED,
            Json(ComparisonResponse {
                product: product.into(),
                cheaper: cheaper.map(Into::into),
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// List an existing product in another store the acting user owns.
async fn cross_list_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .product_service
        .list_in_store(user_id, store_id, product_id)
        .await
    {
        Ok(product) => Json(ProductInfo::from(product)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
    headers: HeaderMap,
    Json(spec): Json<ProductSpec>,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .product_service
        .update_product(user_id, store_id, product_id, spec)
        .await
    {
        Ok(product) => Json(ProductInfo::from(product)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_product(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .product_service
        .delete_product(user_id, store_id, product_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn first_dominator(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(e) = acting_user(&headers) {
        return error_response(e);
    }

    match state
        .app
        .catalog_service
        .first_dominator(store_id, product_id)
        .await
    {
        Ok(cheaper) => Json(cheaper.map(ProductInfo::from)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn subsequent_dominators(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(e) = acting_user(&headers) {
        return error_response(e);
    }

    match state
        .app
        .catalog_service
        .subsequent_dominators(store_id, product_id)
        .await
    {
        Ok(products) => {
            let infos: Vec<ProductInfo> = products.into_iter().map(Into::into).collect();
            Json(infos).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> impl IntoResponse {
    match state
        .app
        .review_service
        .list_reviews_for_product(product_id)
        .await
    {
        Ok(reviews) => {
            let infos: Vec<ReviewInfo> = reviews.into_iter().map(Into::into).collect();
            Json(infos).into_response()
        }
        Err(e) => error_response(e),
    }
}

async fn add_review(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<ReviewRequest>,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .review_service
        .create_review(user_id, product_id, payload.comment)
        .await
    {
        Ok(review) => (StatusCode::CREATED, Json(ReviewInfo::from(review))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn my_review(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .review_service
        .get_user_review(user_id, product_id)
        .await
    {
        Ok(review) => Json(review.map(ReviewInfo::from)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
    headers: HeaderMap,
    Json(payload): Json<ReviewRequest>,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .review_service
        .update_review(user_id, review_id, payload.comment)
        .await
    {
        Ok(review) => Json(ReviewInfo::from(review)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = match acting_user(&headers) {
        Ok(id) => id,
        Err(e) => return error_response(e),
    };

    match state
        .app
        .review_service
        .delete_review(user_id, review_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
