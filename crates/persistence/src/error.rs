// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
///
/// Capacity and range conflicts are detected at write time, inside the
/// reservation transaction, so the conflict variants live here and carry
/// the detail callers need for a 409 response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// Serialization/deserialization error.
    SerializationError(String),
    /// A stored row could not be mapped back to a domain value.
    CorruptRecord {
        /// The table the row came from.
        table: &'static str,
        /// Description of the mapping failure.
        reason: String,
    },
    /// The requested resource was not found.
    NotFound(String),
    /// A cabin date range overlaps existing non-cancelled bookings.
    /// The candidate write was rolled back.
    RangeConflict {
        /// The cabin that was requested.
        cabin_id: i64,
        /// Booking IDs of the overlapping reservations.
        conflicting: Vec<i64>,
    },
    /// A reservation would push aggregate occupancy above the capacity
    /// bound. The candidate write was rolled back.
    CapacityExceeded {
        /// The resource that was requested.
        resource_id: i64,
        /// The requested party size.
        requested: u32,
        /// Seats still available before this attempt, clamped to zero.
        remaining: u32,
    },
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::CorruptRecord { table, reason } => {
                write!(f, "Corrupt record in table '{table}': {reason}")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::RangeConflict {
                cabin_id,
                conflicting,
            } => {
                write!(
                    f,
                    "Cabin {cabin_id} is unavailable for the requested dates: conflicts with bookings {conflicting:?}"
                )
            }
            Self::CapacityExceeded {
                resource_id,
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "Resource {resource_id} cannot seat {requested}: only {remaining} remaining"
                )
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
