//! In-memory repositories and security ports.
//!
//! Used by the unit tests in this crate and, behind the `test-utils`
//! feature, by the HTTP tests downstream. Handles are cheap to clone and
//! share their storage, so a test can keep one handle for assertions and
//! hand another to a service.

mod catalog;
mod order;
mod security;
mod user;

pub use catalog::{MockCategoryRepository, MockProductRepository};
pub use order::MockOrderRepository;
pub use security::{MockPasswordHasher, MockTokenIssuer};
pub use user::MockUserRepository;

use crate::errors::DomainError;

fn poisoned<T>(_: T) -> DomainError {
    DomainError::PersistenceError("in-memory store lock poisoned".to_string())
}
