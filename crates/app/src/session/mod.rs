//! Session and registry state

mod accounts;
mod errors;
mod state;

pub use accounts::*;
pub use errors::*;
pub use state::*;

#[cfg(test)]
mod tests;
