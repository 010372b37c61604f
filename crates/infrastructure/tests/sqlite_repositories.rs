//! SQLite adapter tests against a migrated temp database.

use domain::{
    Product, ProductRepository, ProductSpec, Review, ReviewRepository, Store, StoreRepository,
    User, UserRepository,
};
use infrastructure::{
    Database, SqliteProductRepository, SqliteReviewRepository, SqliteStoreRepository,
    SqliteUserRepository,
};
use rust_decimal_macros::dec;
use tempfile::TempDir;

struct Repos {
    users: SqliteUserRepository,
    stores: SqliteStoreRepository,
    products: SqliteProductRepository,
    reviews: SqliteReviewRepository,
    _dir: TempDir,
}

fn repos() -> Repos {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("test.db");
    let database = Database::new(db_path.to_str().expect("utf-8 path"));
    let pool = database.get_pool().clone();
    Repos {
        users: SqliteUserRepository::new(pool.clone()),
        stores: SqliteStoreRepository::new(pool.clone()),
        products: SqliteProductRepository::new(pool.clone()),
        reviews: SqliteReviewRepository::new(pool),
        _dir: dir,
    }
}

fn laptop(name: &str) -> ProductSpec {
    ProductSpec {
        name: name.to_string(),
        screen_size: 15.6,
        price: dec!(1234.56),
        processor: 8,
        graphics_card: 4,
        ram: 16,
        storage: 512,
        url: format!("https://example.com/{}", name.to_lowercase()),
    }
}

async fn seeded_store(repos: &Repos, username: &str) -> i32 {
    let user = repos
        .users
        .save(&User::new(username.to_string(), format!("{}@example.com", username)))
        .await
        .unwrap();
    let store = repos
        .stores
        .save(&Store::new(
            format!("{}'s store", username),
            String::new(),
            user.id.unwrap(),
        ))
        .await
        .unwrap();
    store.id.unwrap()
}

#[tokio::test]
async fn product_price_survives_the_text_column() {
    let repos = repos();
    let store_id = seeded_store(&repos, "seller").await;

    let saved = repos
        .products
        .save(&Product::new(laptop("L"), vec![store_id]))
        .await
        .unwrap();

    let loaded = repos
        .products
        .find_by_id(saved.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.price(), dec!(1234.56));
    assert_eq!(loaded.store_ids, vec![store_id]);
}

#[tokio::test]
async fn scoped_lookup_misses_products_of_other_stores() {
    let repos = repos();
    let home = seeded_store(&repos, "home").await;
    let other = seeded_store(&repos, "other").await;

    let product = repos
        .products
        .save(&Product::new(laptop("L"), vec![home]))
        .await
        .unwrap();
    let product_id = product.id.unwrap();

    assert!(repos
        .products
        .find_by_id_in_store(product_id, home)
        .await
        .unwrap()
        .is_some());
    assert!(repos
        .products
        .find_by_id_in_store(product_id, other)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn updating_a_product_rewrites_its_store_associations() {
    let repos = repos();
    let first = seeded_store(&repos, "first").await;
    let second = seeded_store(&repos, "second").await;

    let mut product = repos
        .products
        .save(&Product::new(laptop("L"), vec![first]))
        .await
        .unwrap();
    product.store_ids.push(second);

    let updated = repos.products.update(&product).await.unwrap();
    assert_eq!(updated.store_ids, vec![first, second]);

    let by_second = repos.products.find_by_store(second).await.unwrap();
    assert_eq!(by_second.len(), 1);
}

#[tokio::test]
async fn deleting_a_store_keeps_cross_listed_products() {
    let repos = repos();
    let doomed = seeded_store(&repos, "doomed").await;
    let keeper = seeded_store(&repos, "keeper").await;

    let orphan = repos
        .products
        .save(&Product::new(laptop("Orphan"), vec![doomed]))
        .await
        .unwrap();
    let shared = repos
        .products
        .save(&Product::new(laptop("Shared"), vec![doomed, keeper]))
        .await
        .unwrap();

    repos
        .reviews
        .save(&Review::new("gone with the store".to_string(), orphan.id.unwrap(), 1))
        .await
        .unwrap();

    repos.stores.delete(doomed).await.unwrap();

    assert!(repos
        .products
        .find_by_id(orphan.id.unwrap())
        .await
        .unwrap()
        .is_none());
    assert!(repos
        .reviews
        .find_by_product(orphan.id.unwrap())
        .await
        .unwrap()
        .is_empty());

    let survivor = repos
        .products
        .find_by_id(shared.id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(survivor.store_ids, vec![keeper]);
}

#[tokio::test]
async fn deleting_a_user_takes_their_stores_and_reviews() {
    let repos = repos();
    let owner = repos
        .users
        .save(&User::new("owner".to_string(), "owner@example.com".to_string()))
        .await
        .unwrap();
    let owner_id = owner.id.unwrap();
    let store = repos
        .stores
        .save(&Store::new("Mine".to_string(), String::new(), owner_id))
        .await
        .unwrap();
    let store_id = store.id.unwrap();

    repos
        .products
        .save(&Product::new(laptop("L"), vec![store_id]))
        .await
        .unwrap();

    repos.users.delete(owner_id).await.unwrap();

    assert!(repos.stores.find_by_id(store_id).await.unwrap().is_none());
    assert!(repos.products.find_by_store(store_id).await.unwrap().is_empty());
    assert!(repos.users.find_by_id(owner_id).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_saves_each_get_their_own_row() {
    let repos = repos();

    let ann = User::new("ann".to_string(), "ann@example.com".to_string());
    let bob = User::new("bob".to_string(), "bob@example.com".to_string());
    let cam = User::new("cam".to_string(), "cam@example.com".to_string());
    let dee = User::new("dee".to_string(), "dee@example.com".to_string());
    let (a, b, c, d) = tokio::join!(
        repos.users.save(&ann),
        repos.users.save(&bob),
        repos.users.save(&cam),
        repos.users.save(&dee),
    );

    let saved = [a.unwrap(), b.unwrap(), c.unwrap(), d.unwrap()];
    assert_eq!(saved[0].username, "ann");
    assert_eq!(saved[1].username, "bob");
    assert_eq!(saved[2].username, "cam");
    assert_eq!(saved[3].username, "dee");

    // Every caller got the row it inserted, not a later writer's.
    let mut ids: Vec<i32> = saved.iter().map(|u| u.id.unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);

    for user in &saved {
        let loaded = repos.users.find_by_id(user.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded.username, user.username);
    }
}

#[tokio::test]
async fn store_search_matches_title_and_description() {
    let repos = repos();
    let owner = repos
        .users
        .save(&User::new("owner".to_string(), "owner@example.com".to_string()))
        .await
        .unwrap();
    let owner_id = owner.id.unwrap();

    repos
        .stores
        .save(&Store::new(
            "Alpha Computers".to_string(),
            "Desktops and parts".to_string(),
            owner_id,
        ))
        .await
        .unwrap();
    repos
        .stores
        .save(&Store::new(
            "Beta".to_string(),
            "Gaming LAPTOPS only".to_string(),
            owner_id,
        ))
        .await
        .unwrap();

    let by_title = repos.stores.search(Some("alpha")).await.unwrap();
    assert_eq!(by_title.len(), 1);

    let by_description = repos.stores.search(Some("laptops")).await.unwrap();
    assert_eq!(by_description.len(), 1);
    assert_eq!(by_description[0].title, "Beta");

    let everything = repos.stores.search(None).await.unwrap();
    assert_eq!(everything.len(), 2);
}
