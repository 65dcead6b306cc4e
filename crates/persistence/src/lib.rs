// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the lodge reservation core.
//!
//! This crate stores reservable resources and their reservations in SQLite
//! via Diesel, and enforces the two storage-level guarantees the rest of
//! the system leans on:
//!
//! - **Range exclusivity** — no two non-cancelled cabin bookings overlap on
//!   `[check_in, check_out)` for the same cabin.
//! - **Capacity bounds** — aggregate headcount per dining `(date, time)`
//!   slot and per experience day never exceeds the resource's bound.
//!
//! Both are enforced by atomic write-then-verify inside immediate
//! transactions (see `mutations::reserve`), so they hold under concurrent
//! requests without in-process locking.
//!
//! ## Testing
//!
//! Standard tests run against in-memory shared-cache SQLite databases.
//! Each `new_in_memory()` call receives a unique database via an atomic
//! counter, ensuring deterministic test isolation.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use lodge_domain::{
    Cabin, CabinBooking, DiningItem, DiningReservation, Experience, ExperienceBooking,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Time};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use queries::availability::RangeAvailability;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based collisions.
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single SQLite connection.
///
/// All methods take `&mut self`; callers that share an adapter across
/// request handlers wrap it in a mutex.
pub struct Persistence {
    conn: SqliteConnection,
    database_url: String,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: shared_memory_url,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;

        // WAL mode for better read concurrency on file databases
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: path_str.to_string(),
        })
    }

    /// Opens an additional connection to the same database.
    ///
    /// The new handle shares the underlying database but issues its own
    /// transactions, so two handles genuinely contend for the write lock.
    /// For in-memory databases the original handle must stay alive, or the
    /// shared cache is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened.
    pub fn reopen(&self) -> Result<Self, PersistenceError> {
        let mut conn: SqliteConnection = sqlite::open_connection(&self.database_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: self.database_url.clone(),
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Registers a cabin and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_cabin(&mut self, cabin: &Cabin) -> Result<i64, PersistenceError> {
        mutations::resources::create_cabin(&mut self.conn, cabin)
    }

    /// Retrieves a cabin by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no cabin with this ID exists.
    pub fn get_cabin(&mut self, cabin_id: i64) -> Result<Cabin, PersistenceError> {
        queries::resources::get_cabin(&mut self.conn, cabin_id)
    }

    /// Lists all cabins ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_cabins(&mut self) -> Result<Vec<Cabin>, PersistenceError> {
        queries::resources::list_cabins(&mut self.conn)
    }

    /// Registers a dining item and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_dining_item(&mut self, item: &DiningItem) -> Result<i64, PersistenceError> {
        mutations::resources::create_dining_item(&mut self.conn, item)
    }

    /// Retrieves a dining item by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no dining item with this ID exists.
    pub fn get_dining_item(&mut self, dining_item_id: i64) -> Result<DiningItem, PersistenceError> {
        queries::resources::get_dining_item(&mut self.conn, dining_item_id)
    }

    /// Lists all dining items ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_dining_items(&mut self) -> Result<Vec<DiningItem>, PersistenceError> {
        queries::resources::list_dining_items(&mut self.conn)
    }

    /// Registers an experience and returns its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_experience(
        &mut self,
        experience: &Experience,
    ) -> Result<i64, PersistenceError> {
        mutations::resources::create_experience(&mut self.conn, experience)
    }

    /// Retrieves an experience by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no experience with this ID exists.
    pub fn get_experience(&mut self, experience_id: i64) -> Result<Experience, PersistenceError> {
        queries::resources::get_experience(&mut self.conn, experience_id)
    }

    /// Lists all experiences ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_experiences(&mut self) -> Result<Vec<Experience>, PersistenceError> {
        queries::resources::list_experiences(&mut self.conn)
    }

    // ========================================================================
    // Availability & Capacity
    // ========================================================================

    /// Checks whether `[check_in, check_out)` is free for the given cabin.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn is_range_available(
        &mut self,
        cabin_id: i64,
        check_in: Date,
        check_out: Date,
    ) -> Result<RangeAvailability, PersistenceError> {
        queries::availability::is_range_available(&mut self.conn, cabin_id, check_in, check_out)
    }

    /// Lists the blocked date ranges for a cabin within a query window,
    /// merged into disjoint ordered ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_unavailable_ranges(
        &mut self,
        cabin_id: i64,
        window_start: Date,
        window_end: Date,
    ) -> Result<Vec<(Date, Date)>, PersistenceError> {
        queries::availability::list_unavailable_ranges(
            &mut self.conn,
            cabin_id,
            window_start,
            window_end,
        )
    }

    /// Remaining seats for a dining `(date, time)` slot, clamped to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn remaining_dining_capacity(
        &mut self,
        dining_item_id: i64,
        max_people: u32,
        date: Date,
        time: Time,
    ) -> Result<u32, PersistenceError> {
        queries::capacity::remaining_dining_capacity(
            &mut self.conn,
            dining_item_id,
            max_people,
            date,
            time,
        )
    }

    /// Remaining participants for an experience day, clamped to zero.
    /// `None` means the experience is unbounded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn remaining_experience_capacity(
        &mut self,
        experience_id: i64,
        max_participants: Option<u32>,
        date: Date,
    ) -> Result<Option<u32>, PersistenceError> {
        queries::capacity::remaining_experience_capacity(
            &mut self.conn,
            experience_id,
            max_participants,
            date,
        )
    }

    // ========================================================================
    // Guarded reservation writes
    // ========================================================================

    /// Reserves a cabin for `[check_in, check_out)`, rolling back on
    /// overlap.
    ///
    /// # Errors
    ///
    /// Returns `RangeConflict` on overlap, or a database error.
    pub fn reserve_cabin_range(
        &mut self,
        booking: &CabinBooking,
    ) -> Result<i64, PersistenceError> {
        mutations::reserve::reserve_cabin_range(&mut self.conn, booking)
    }

    /// Reserves seats for a dining slot, rolling back on overbooking.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` on overbooking, or a database error.
    pub fn reserve_dining_seats(
        &mut self,
        reservation: &DiningReservation,
        max_people: u32,
    ) -> Result<i64, PersistenceError> {
        mutations::reserve::reserve_dining_seats(&mut self.conn, reservation, max_people)
    }

    /// Reserves participants for an experience day, rolling back on
    /// overbooking.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` on overbooking, or a database error.
    pub fn reserve_experience_participants(
        &mut self,
        booking: &ExperienceBooking,
        max_participants: Option<u32>,
    ) -> Result<i64, PersistenceError> {
        mutations::reserve::reserve_experience_participants(
            &mut self.conn,
            booking,
            max_participants,
        )
    }

    /// Rewrites a cabin booking's guest-editable fields, re-running the
    /// range guard with the booking excluded from its own conflict scan.
    ///
    /// # Errors
    ///
    /// Returns `RangeConflict` if the new range is taken, or a database
    /// error.
    pub fn update_cabin_booking(
        &mut self,
        booking: &CabinBooking,
    ) -> Result<(), PersistenceError> {
        mutations::reserve::update_cabin_booking(&mut self.conn, booking)
    }

    /// Rewrites a dining reservation's guest-editable fields, re-running
    /// the capacity check against the target slot.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the target slot cannot take the party,
    /// or a database error.
    pub fn update_dining_reservation(
        &mut self,
        reservation: &DiningReservation,
        max_people: u32,
    ) -> Result<(), PersistenceError> {
        mutations::reserve::update_dining_reservation(&mut self.conn, reservation, max_people)
    }

    /// Rewrites an experience booking's guest-editable fields, re-running
    /// the capacity check against the target day.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the target day cannot take the party,
    /// or a database error.
    pub fn update_experience_booking(
        &mut self,
        booking: &ExperienceBooking,
        max_participants: Option<u32>,
    ) -> Result<(), PersistenceError> {
        mutations::reserve::update_experience_booking(&mut self.conn, booking, max_participants)
    }

    // ========================================================================
    // Reservation lookup & history
    // ========================================================================

    /// Retrieves a cabin booking by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking with this ID exists.
    pub fn get_cabin_booking(
        &mut self,
        booking_id: i64,
    ) -> Result<CabinBooking, PersistenceError> {
        queries::reservations::get_cabin_booking(&mut self.conn, booking_id)
    }

    /// Lists a customer's cabin bookings, optionally filtered to one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_cabin_bookings_for_customer(
        &mut self,
        customer_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<CabinBooking>, PersistenceError> {
        queries::reservations::list_cabin_bookings_for_customer(&mut self.conn, customer_id, status)
    }

    /// Retrieves a dining reservation by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no reservation with this ID exists.
    pub fn get_dining_reservation(
        &mut self,
        reservation_id: i64,
    ) -> Result<DiningReservation, PersistenceError> {
        queries::reservations::get_dining_reservation(&mut self.conn, reservation_id)
    }

    /// Lists a customer's dining reservations, optionally filtered to one
    /// status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_dining_reservations_for_customer(
        &mut self,
        customer_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<DiningReservation>, PersistenceError> {
        queries::reservations::list_dining_reservations_for_customer(
            &mut self.conn,
            customer_id,
            status,
        )
    }

    /// Retrieves an experience booking by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking with this ID exists.
    pub fn get_experience_booking(
        &mut self,
        booking_id: i64,
    ) -> Result<ExperienceBooking, PersistenceError> {
        queries::reservations::get_experience_booking(&mut self.conn, booking_id)
    }

    /// Lists a customer's experience bookings, optionally filtered to one
    /// status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_experience_bookings_for_customer(
        &mut self,
        customer_id: &str,
        status: Option<&str>,
    ) -> Result<Vec<ExperienceBooking>, PersistenceError> {
        queries::reservations::list_experience_bookings_for_customer(
            &mut self.conn,
            customer_id,
            status,
        )
    }

    // ========================================================================
    // Lifecycle & payment writes
    // ========================================================================

    /// Sets a cabin booking's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking with this ID exists.
    pub fn set_cabin_booking_status(
        &mut self,
        booking_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::set_cabin_booking_status(&mut self.conn, booking_id, status)
    }

    /// Sets a dining reservation's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no reservation with this ID exists.
    pub fn set_dining_reservation_status(
        &mut self,
        reservation_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::set_dining_reservation_status(
            &mut self.conn,
            reservation_id,
            status,
        )
    }

    /// Sets an experience booking's status.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking with this ID exists.
    pub fn set_experience_booking_status(
        &mut self,
        booking_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::set_experience_booking_status(&mut self.conn, booking_id, status)
    }

    /// Sets a cabin booking's payment flags.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking with this ID exists.
    pub fn set_cabin_booking_payment(
        &mut self,
        booking_id: i64,
        is_paid: bool,
        deposit_paid: bool,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::set_cabin_booking_payment(
            &mut self.conn,
            booking_id,
            is_paid,
            deposit_paid,
        )
    }

    /// Sets a dining reservation's payment flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no reservation with this ID exists.
    pub fn set_dining_reservation_payment(
        &mut self,
        reservation_id: i64,
        is_paid: bool,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::set_dining_reservation_payment(
            &mut self.conn,
            reservation_id,
            is_paid,
        )
    }

    /// Sets an experience booking's payment flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no booking with this ID exists.
    pub fn set_experience_booking_payment(
        &mut self,
        booking_id: i64,
        is_paid: bool,
    ) -> Result<(), PersistenceError> {
        mutations::reservations::set_experience_booking_payment(
            &mut self.conn,
            booking_id,
            is_paid,
        )
    }
}
