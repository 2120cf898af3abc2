pub mod category_repository;
pub mod order_repository;
pub mod product_repository;
pub mod user_repository;

pub use category_repository::CategoryRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use user_repository::UserRepository;
