// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lifecycle status and payment-flag writes.
//!
//! Status strings are validated by the domain state machines before they
//! reach this layer; these functions only persist the transition.

use crate::diesel_schema::{cabin_bookings, dining_reservations, experience_bookings};
use crate::error::PersistenceError;
use diesel::prelude::*;
use tracing::info;

/// Sets a cabin booking's status.
///
/// # Errors
///
/// Returns `NotFound` if no booking with this ID exists.
pub fn set_cabin_booking_status(
    conn: &mut SqliteConnection,
    booking_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        cabin_bookings::table.filter(cabin_bookings::booking_id.eq(booking_id)),
    )
    .set(cabin_bookings::status.eq(status))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Cabin booking {booking_id} not found"
        )));
    }
    info!(booking_id, status, "Updated cabin booking status");
    Ok(())
}

/// Sets a dining reservation's status.
///
/// # Errors
///
/// Returns `NotFound` if no reservation with this ID exists.
pub fn set_dining_reservation_status(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        dining_reservations::table.filter(dining_reservations::reservation_id.eq(reservation_id)),
    )
    .set(dining_reservations::status.eq(status))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Dining reservation {reservation_id} not found"
        )));
    }
    info!(reservation_id, status, "Updated dining reservation status");
    Ok(())
}

/// Sets an experience booking's status.
///
/// # Errors
///
/// Returns `NotFound` if no booking with this ID exists.
pub fn set_experience_booking_status(
    conn: &mut SqliteConnection,
    booking_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        experience_bookings::table.filter(experience_bookings::booking_id.eq(booking_id)),
    )
    .set(experience_bookings::status.eq(status))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Experience booking {booking_id} not found"
        )));
    }
    info!(booking_id, status, "Updated experience booking status");
    Ok(())
}

/// Sets a cabin booking's payment flags.
///
/// # Errors
///
/// Returns `NotFound` if no booking with this ID exists.
pub fn set_cabin_booking_payment(
    conn: &mut SqliteConnection,
    booking_id: i64,
    is_paid: bool,
    deposit_paid: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        cabin_bookings::table.filter(cabin_bookings::booking_id.eq(booking_id)),
    )
    .set((
        cabin_bookings::is_paid.eq(i32::from(is_paid)),
        cabin_bookings::deposit_paid.eq(i32::from(deposit_paid)),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Cabin booking {booking_id} not found"
        )));
    }
    info!(booking_id, is_paid, deposit_paid, "Updated cabin booking payment");
    Ok(())
}

/// Sets a dining reservation's payment flag.
///
/// # Errors
///
/// Returns `NotFound` if no reservation with this ID exists.
pub fn set_dining_reservation_payment(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    is_paid: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        dining_reservations::table.filter(dining_reservations::reservation_id.eq(reservation_id)),
    )
    .set(dining_reservations::is_paid.eq(i32::from(is_paid)))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Dining reservation {reservation_id} not found"
        )));
    }
    info!(reservation_id, is_paid, "Updated dining reservation payment");
    Ok(())
}

/// Sets an experience booking's payment flag.
///
/// # Errors
///
/// Returns `NotFound` if no booking with this ID exists.
pub fn set_experience_booking_payment(
    conn: &mut SqliteConnection,
    booking_id: i64,
    is_paid: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        experience_bookings::table.filter(experience_bookings::booking_id.eq(booking_id)),
    )
    .set(experience_bookings::is_paid.eq(i32::from(is_paid)))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Experience booking {booking_id} not found"
        )));
    }
    info!(booking_id, is_paid, "Updated experience booking payment");
    Ok(())
}
