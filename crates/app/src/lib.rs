//! Record store access, session state and services behind the camp registry
//! command line.

pub mod audit;
pub mod auth;
pub mod camps;
pub mod config;
pub mod context;
pub mod health;
pub mod observability;
pub mod seed;
pub mod session;
pub mod store;

#[cfg(test)]
mod test;
