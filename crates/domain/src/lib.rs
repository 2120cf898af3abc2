pub mod entities;
pub mod errors;
pub mod repositories;
pub mod security;
pub mod services;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use entities::*;
pub use errors::*;
pub use repositories::*;
pub use security::*;
pub use services::*;
