//! Compliance audit narration

mod auditor;
mod client;
mod errors;

pub use auditor::*;
pub use client::*;
pub use errors::*;
