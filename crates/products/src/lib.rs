//! Products domain module.
//!
//! This crate contains the product record, the presence/type checks applied
//! to create and update candidates, and the client-side search predicate.
//! Everything here is deterministic domain logic (no IO, no HTTP, no storage).

pub mod coerce;
pub mod filter;
pub mod product;

pub use filter::{SearchField, filter_products, matches};
pub use product::{NewProduct, Product, StockUpdate};
