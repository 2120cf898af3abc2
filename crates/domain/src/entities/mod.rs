pub mod category;
pub mod id;
pub mod money;
pub mod order;
pub mod product;
pub mod user;

pub use category::*;
pub use id::*;
pub use money::*;
pub use order::*;
pub use product::*;
pub use user::*;
