// Database schema for the storefront
diesel::table! {
    users (id) {
        id -> Text,
        username -> Nullable<Text>,  // Unique when present
        email -> Text,               // Unique
        password_hash -> Text,       // bcrypt hash, never plaintext
        role -> Text,                // customer, admin
        created_at -> Timestamp,
    }
}

diesel::table! {
    categories (id) {
        id -> Text,
        name -> Text,
        description -> Text,
    }
}

diesel::table! {
    products (id) {
        id -> Text,
        name -> Text,
        price_cents -> BigInt,      // Minor currency units
        description -> Text,
        category_id -> Text,
        stock -> Integer,
    }
}

diesel::table! {
    orders (id) {
        id -> Text,
        user_id -> Text,
        total_price_cents -> BigInt, // Snapshot taken at placement
        status -> Text,              // pending, processing, shipped, delivered, cancelled
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    order_items (order_id, line_index) {
        order_id -> Text,
        line_index -> Integer,       // Position in the request
        product_id -> Text,
        quantity -> BigInt,
    }
}

diesel::joinable!(products -> categories (category_id));
diesel::joinable!(order_items -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(users, categories, products, orders, order_items,);

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'customer',
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
    description TEXT NOT NULL DEFAULT '',
    category_id TEXT NOT NULL REFERENCES categories (id),
    stock INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_products_category ON products (category_id);

CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL,
    total_price_cents BIGINT NOT NULL CHECK (total_price_cents >= 0),
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_orders_user ON orders (user_id);

CREATE TABLE IF NOT EXISTS order_items (
    order_id TEXT NOT NULL REFERENCES orders (id),
    line_index INTEGER NOT NULL,
    product_id TEXT NOT NULL,
    quantity BIGINT NOT NULL CHECK (quantity > 0),
    PRIMARY KEY (order_id, line_index)
);
"#;
