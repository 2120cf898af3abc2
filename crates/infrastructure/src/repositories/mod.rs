pub mod sqlite_category_repository;
pub mod sqlite_order_repository;
pub mod sqlite_product_repository;
pub mod sqlite_user_repository;

pub use sqlite_category_repository::SqliteCategoryRepository;
pub use sqlite_order_repository::SqliteOrderRepository;
pub use sqlite_product_repository::SqliteProductRepository;
pub use sqlite_user_repository::SqliteUserRepository;
