//! Camp Registry
//!
//! Domain model of the regional summer-camp registry: camp cards and their
//! documents, registry search and statistics, the spreadsheet export and the
//! compliance pre-check behind the ministry's audit.

pub mod audit;
pub mod camps;
pub mod documents;
pub mod export;
pub mod fixtures;
pub mod ids;
pub mod prelude;
pub mod registry;
pub mod report;
pub mod stats;
pub mod users;
