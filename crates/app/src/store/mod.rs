//! Record store access

mod auth_store;
mod client;
mod errors;
pub mod records;
pub mod schema;

pub use auth_store::*;
pub use client::*;
pub use errors::*;
