//! # Snapshot Repository
//!
//! Saves and loads ordered lists of entities, one list per category.
//!
//! ## Record Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  entity_snapshots                                                       │
//! │                                                                         │
//! │  category   position  schema_version  payload (JSON)                    │
//! │  ─────────  ────────  ──────────────  ──────────────────────────────    │
//! │  events     0         1               {"id":"1","name":"Grand Prix…"}   │
//! │  events     1         1               {"id":"2","name":"Qualifiers…"}   │
//! │  discounts  0         1               {"code":"EID2025",…}              │
//! │                                                                         │
//! │  save_all(kind, items)  DELETE category + INSERT rows, one transaction  │
//! │  load_all(kind)         rows ordered by position, decoded; none → []    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Categories are independent. Saving the whole system writes several
//! categories one after another, each in its own transaction.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use tracing::{debug, info};

use grandprix_core::{Admin, BookingSystem, Customer, SystemSnapshot};

use crate::error::{DbError, DbResult};

/// Record layout version written by this build.
pub const SCHEMA_VERSION: i64 = 1;

// =============================================================================
// Entity Categories
// =============================================================================

/// The persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Users,
    Events,
    Orders,
    Tickets,
    Discounts,
    SeasonTickets,
    WeekendPackages,
    WalletPayments,
}

impl EntityKind {
    pub const ALL: [EntityKind; 8] = [
        EntityKind::Users,
        EntityKind::Events,
        EntityKind::Orders,
        EntityKind::Tickets,
        EntityKind::Discounts,
        EntityKind::SeasonTickets,
        EntityKind::WeekendPackages,
        EntityKind::WalletPayments,
    ];

    /// Category name stored in the `category` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Events => "events",
            EntityKind::Orders => "orders",
            EntityKind::Tickets => "tickets",
            EntityKind::Discounts => "discounts",
            EntityKind::SeasonTickets => "season_tickets",
            EntityKind::WeekendPackages => "weekend_packages",
            EntityKind::WalletPayments => "wallet_payments",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored user: customers and admins share the `users` category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum AccountRecord {
    Customer(Customer),
    Admin(Admin),
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for versioned entity records.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Replaces the stored list for `kind` with `items`, keeping their order.
    ///
    /// Every item is encoded before anything is written, so an encoding error
    /// leaves the stored list untouched. Returns the number of rows written.
    pub async fn save_all<T: Serialize>(&self, kind: EntityKind, items: &[T]) -> DbResult<usize> {
        let payloads = items
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| DbError::Encode {
                category: kind.to_string(),
                source,
            })?;

        let saved_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM entity_snapshots WHERE category = ?1")
            .bind(kind.as_str())
            .execute(&mut *tx)
            .await?;

        for (position, payload) in payloads.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO entity_snapshots (category, position, schema_version, payload, saved_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(kind.as_str())
            .bind(position as i64)
            .bind(SCHEMA_VERSION)
            .bind(payload.as_str())
            .bind(saved_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        debug!(category = %kind, rows = payloads.len(), "Category saved");
        Ok(payloads.len())
    }

    /// Loads the stored list for `kind` in saved order.
    ///
    /// A category that was never saved loads as an empty list.
    ///
    /// ## Errors
    /// - `UnsupportedSchema` for a record newer than [`SCHEMA_VERSION`]
    /// - `Decode` for a payload that does not fit `T`
    pub async fn load_all<T: DeserializeOwned>(&self, kind: EntityKind) -> DbResult<Vec<T>> {
        let rows: Vec<(i64, i64, String)> = sqlx::query_as(
            r#"
            SELECT position, schema_version, payload
            FROM entity_snapshots
            WHERE category = ?1
            ORDER BY position
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (position, schema_version, payload) in rows {
            if schema_version > SCHEMA_VERSION {
                return Err(DbError::UnsupportedSchema {
                    category: kind.to_string(),
                    position,
                    found: schema_version,
                    supported: SCHEMA_VERSION,
                });
            }
            let item = serde_json::from_str(&payload).map_err(|source| DbError::Decode {
                category: kind.to_string(),
                position,
                source,
            })?;
            items.push(item);
        }

        debug!(category = %kind, rows = items.len(), "Category loaded");
        Ok(items)
    }

    /// Number of stored records in `kind`.
    pub async fn count(&self, kind: EntityKind) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entity_snapshots WHERE category = ?1")
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Removes every record in `kind`. Returns the number removed.
    pub async fn clear(&self, kind: EntityKind) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM entity_snapshots WHERE category = ?1")
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // -------------------------------------------------------------------------
    // Whole System
    // -------------------------------------------------------------------------

    /// Saves users, events and discounts. Order histories travel inside
    /// their customers.
    pub async fn save_system(&self, snapshot: &SystemSnapshot) -> DbResult<()> {
        let accounts: Vec<AccountRecord> = snapshot
            .customers
            .iter()
            .cloned()
            .map(AccountRecord::Customer)
            .chain(snapshot.admins.iter().cloned().map(AccountRecord::Admin))
            .collect();

        self.save_all(EntityKind::Users, &accounts).await?;
        self.save_all(EntityKind::Events, &snapshot.events).await?;
        self.save_all(EntityKind::Discounts, &snapshot.discounts).await?;

        info!(
            users = accounts.len(),
            events = snapshot.events.len(),
            discounts = snapshot.discounts.len(),
            "System saved"
        );
        Ok(())
    }

    /// Loads what [`SnapshotRepository::save_system`] wrote. An empty
    /// database gives an empty snapshot.
    pub async fn load_system(&self) -> DbResult<SystemSnapshot> {
        let mut snapshot = SystemSnapshot::default();

        for account in self.load_all::<AccountRecord>(EntityKind::Users).await? {
            match account {
                AccountRecord::Customer(c) => snapshot.customers.push(c),
                AccountRecord::Admin(a) => snapshot.admins.push(a),
            }
        }
        snapshot.events = self.load_all(EntityKind::Events).await?;
        snapshot.discounts = self.load_all(EntityKind::Discounts).await?;

        info!(
            customers = snapshot.customers.len(),
            admins = snapshot.admins.len(),
            events = snapshot.events.len(),
            "System loaded"
        );
        Ok(snapshot)
    }

    /// Loads and rebuilds a ready-to-use [`BookingSystem`].
    pub async fn load_booking_system(&self) -> DbResult<BookingSystem> {
        let snapshot = self.load_system().await?;
        Ok(BookingSystem::from_snapshot(snapshot)?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
