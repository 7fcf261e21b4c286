//! Aggregates module
pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartError, CartLine};
pub use order::{CheckoutDetails, Order, OrderLine, OrderStatus, StatusPolicy, TransitionError};
pub use product::{NewProduct, Product, ProductError, ProductPatch};
pub use user::User;
