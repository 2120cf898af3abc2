pub mod catalog_service;
pub mod order_admin;
pub mod order_placement;
pub mod user_service;

pub use catalog_service::{CatalogService, NewCategory, NewProduct, ProductQuery};
pub use order_admin::{OrderAdminService, OrderFilter};
pub use order_placement::{OrderPlacementService, PlaceOrder, RequestedItem};
pub use user_service::{AuthenticatedUser, Credentials, Registration, UserService};
