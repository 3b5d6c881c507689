//! Domain services.
//!
//! Routes stay thin; anything that coordinates more than one store call or
//! enforces an aggregate invariant lives here.

pub mod cart;
pub mod checkout;

pub use cart::{CartError, CartService};
pub use checkout::{CheckoutError, CheckoutService};
