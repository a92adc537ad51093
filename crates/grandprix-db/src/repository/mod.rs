//! # Repositories
//!
//! Data access objects over the shared connection pool.
//!
//! - [`snapshot`] - Versioned entity records, one ordered list per category

pub mod snapshot;
