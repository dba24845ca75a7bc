//! `stocktake-client`
//!
//! **Responsibility:** client-side data service for the inventory page.
//!
//! This crate provides:
//! - `ProductClient`: HTTP bindings for the four product operations
//! - `InventoryState`: the page's local state and the actions that keep it in
//!   step with the server (mount, add, delete, edit)
//!
//! The server stays the authority: every successful write is followed by a
//! full re-fetch instead of patching local state.

pub mod api;
pub mod state;

pub use api::{ClientError, CreateRequest, ProductClient, ProductService, UpdateRequest};
pub use state::{EditState, InventoryState, ProductForm};
