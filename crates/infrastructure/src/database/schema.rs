// Database schema for the marketplace catalog
diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,          // unique
        email -> Text,
    }
}

diesel::table! {
    stores (id) {
        id -> Integer,
        title -> Text,
        description -> Text,
        owner_id -> Integer,       // the single owning user
        created_at -> Timestamp,
    }
}

diesel::table! {
    products (id) {
        id -> Integer,
        name -> Text,
        screen_size -> Float,      // inches
        price -> Text,             // canonical decimal string
        processor -> Integer,
        graphics_card -> Integer,
        ram -> Integer,
        storage -> Integer,
        url -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    store_products (id) {
        id -> Integer,
        store_id -> Integer,
        product_id -> Integer,     // unique per (store_id, product_id)
    }
}

diesel::table! {
    reviews (id) {
        id -> Integer,
        comment -> Text,
        product_id -> Integer,
        user_id -> Integer,        // unique per (user_id, product_id)
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::joinable!(stores -> users (owner_id));
diesel::joinable!(store_products -> stores (store_id));
diesel::joinable!(store_products -> products (product_id));
diesel::joinable!(reviews -> products (product_id));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, stores, products, store_products, reviews,);
