// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation lookup and customer history queries.

use crate::data_models::{CabinBookingRow, DiningReservationRow, ExperienceBookingRow};
use crate::diesel_schema::{cabin_bookings, dining_reservations, experience_bookings};
use crate::error::PersistenceError;
use diesel::prelude::*;
use lodge_domain::{CabinBooking, DiningReservation, ExperienceBooking};

/// Retrieves a cabin booking by ID.
///
/// # Errors
///
/// Returns `NotFound` if no booking with this ID exists.
pub fn get_cabin_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<CabinBooking, PersistenceError> {
    let row: Option<CabinBookingRow> = cabin_bookings::table
        .filter(cabin_bookings::booking_id.eq(booking_id))
        .first(conn)
        .optional()?;
    row.ok_or_else(|| {
        PersistenceError::NotFound(format!("Cabin booking {booking_id} not found"))
    })?
    .into_domain()
}

/// Lists a customer's cabin bookings, newest first, optionally filtered to
/// one status.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_cabin_bookings_for_customer(
    conn: &mut SqliteConnection,
    customer_id: &str,
    status: Option<&str>,
) -> Result<Vec<CabinBooking>, PersistenceError> {
    let mut query = cabin_bookings::table
        .filter(cabin_bookings::customer_id.eq(customer_id))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(cabin_bookings::status.eq(status.to_string()));
    }
    let rows: Vec<CabinBookingRow> = query
        .order(cabin_bookings::booking_id.desc())
        .load(conn)?;
    rows.into_iter().map(CabinBookingRow::into_domain).collect()
}

/// Retrieves a dining reservation by ID.
///
/// # Errors
///
/// Returns `NotFound` if no reservation with this ID exists.
pub fn get_dining_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<DiningReservation, PersistenceError> {
    let row: Option<DiningReservationRow> = dining_reservations::table
        .filter(dining_reservations::reservation_id.eq(reservation_id))
        .first(conn)
        .optional()?;
    row.ok_or_else(|| {
        PersistenceError::NotFound(format!("Dining reservation {reservation_id} not found"))
    })?
    .into_domain()
}

/// Lists a customer's dining reservations, newest first, optionally
/// filtered to one status.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_dining_reservations_for_customer(
    conn: &mut SqliteConnection,
    customer_id: &str,
    status: Option<&str>,
) -> Result<Vec<DiningReservation>, PersistenceError> {
    let mut query = dining_reservations::table
        .filter(dining_reservations::customer_id.eq(customer_id))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(dining_reservations::status.eq(status.to_string()));
    }
    let rows: Vec<DiningReservationRow> = query
        .order(dining_reservations::reservation_id.desc())
        .load(conn)?;
    rows.into_iter()
        .map(DiningReservationRow::into_domain)
        .collect()
}

/// Retrieves an experience booking by ID.
///
/// # Errors
///
/// Returns `NotFound` if no booking with this ID exists.
pub fn get_experience_booking(
    conn: &mut SqliteConnection,
    booking_id: i64,
) -> Result<ExperienceBooking, PersistenceError> {
    let row: Option<ExperienceBookingRow> = experience_bookings::table
        .filter(experience_bookings::booking_id.eq(booking_id))
        .first(conn)
        .optional()?;
    row.ok_or_else(|| {
        PersistenceError::NotFound(format!("Experience booking {booking_id} not found"))
    })?
    .into_domain()
}

/// Lists a customer's experience bookings, newest first, optionally
/// filtered to one status.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_experience_bookings_for_customer(
    conn: &mut SqliteConnection,
    customer_id: &str,
    status: Option<&str>,
) -> Result<Vec<ExperienceBooking>, PersistenceError> {
    let mut query = experience_bookings::table
        .filter(experience_bookings::customer_id.eq(customer_id))
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(experience_bookings::status.eq(status.to_string()));
    }
    let rows: Vec<ExperienceBookingRow> = query
        .order(experience_bookings::booking_id.desc())
        .load(conn)?;
    rows.into_iter()
        .map(ExperienceBookingRow::into_domain)
        .collect()
}
