//! # grandprix-db: Snapshot Storage for the Grand Prix Booking System
//!
//! Persists booking state in SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Grand Prix Booking Data Flow                        │
//! │                                                                         │
//! │  Front end (start up / shut down)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   grandprix-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │ SnapshotRepository │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│ save_all/load_all  │  │ (embedded) │  │   │
//! │  │   │  SqlitePool   │    │ save/load_system   │  │ 001_*.sql  │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL mode)                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use grandprix_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//! let mut system = db.snapshots().load_booking_system().await?;
//! // ... take bookings ...
//! db.snapshots().save_system(&system.snapshot()).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{AccountRecord, EntityKind, SnapshotRepository, SCHEMA_VERSION};
