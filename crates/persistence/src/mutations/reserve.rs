// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Guarded reservation writes.
//!
//! Every reservation is an atomic write-then-verify: the candidate row is
//! written inside an immediate transaction, the aggregate (range overlap or
//! slot occupancy) is re-read with the candidate in place, and the whole
//! transaction rolls back if the post-write aggregate violates the bound.
//! Under concurrent attempts SQLite serializes the transactions, so at most
//! the bounded number of candidates survive and no record outlives a
//! rollback.
//!
//! Reschedules follow the same pattern: the row is updated first, then the
//! guard re-runs with the reservation excluded from (range) or included in
//! (occupancy) its own scan.

use crate::data_models::{
    NewCabinBooking, NewDiningReservation, NewExperienceBooking, format_date, format_time,
};
use crate::diesel_schema::{cabin_bookings, dining_reservations, experience_bookings};
use crate::error::PersistenceError;
use crate::queries::{availability, capacity};
use crate::sqlite;
use diesel::prelude::*;
use lodge_domain::{CabinBooking, DiningReservation, ExperienceBooking};
use tracing::{info, warn};

/// Reserves a cabin for `[check_in, check_out)`.
///
/// Returns the new booking ID, or `RangeConflict` with the blocking booking
/// IDs if the range is taken. A conflict leaves the store unchanged.
///
/// # Errors
///
/// Returns `RangeConflict` on overlap, or a database error.
pub fn reserve_cabin_range(
    conn: &mut SqliteConnection,
    booking: &CabinBooking,
) -> Result<i64, PersistenceError> {
    let row: NewCabinBooking = NewCabinBooking::from_domain(booking)?;
    let booking_id: i64 = conn.immediate_transaction(|conn| {
        diesel::insert_into(cabin_bookings::table)
            .values(&row)
            .execute(conn)?;
        let booking_id: i64 = sqlite::get_last_insert_rowid(conn)?;
        let conflicting: Vec<i64> = availability::overlapping_booking_ids(
            conn,
            booking.cabin_id,
            booking.check_in,
            booking.check_out,
            Some(booking_id),
        )?;
        if conflicting.is_empty() {
            Ok(booking_id)
        } else {
            warn!(
                cabin_id = booking.cabin_id,
                ?conflicting,
                "Cabin range conflict, rolling back"
            );
            Err(PersistenceError::RangeConflict {
                cabin_id: booking.cabin_id,
                conflicting,
            })
        }
    })?;
    info!(
        booking_id,
        cabin_id = booking.cabin_id,
        customer_id = %booking.customer_id,
        "Reserved cabin range"
    );
    Ok(booking_id)
}

/// Reserves seats for a dining `(date, time)` slot.
///
/// Returns the new reservation ID, or `CapacityExceeded` with the remaining
/// seat count if the slot cannot take the party.
///
/// # Errors
///
/// Returns `CapacityExceeded` on overbooking, or a database error.
pub fn reserve_dining_seats(
    conn: &mut SqliteConnection,
    reservation: &DiningReservation,
    max_people: u32,
) -> Result<i64, PersistenceError> {
    let row: NewDiningReservation = NewDiningReservation::from_domain(reservation)?;
    let reservation_id: i64 = conn.immediate_transaction(|conn| {
        diesel::insert_into(dining_reservations::table)
            .values(&row)
            .execute(conn)?;
        let reservation_id: i64 = sqlite::get_last_insert_rowid(conn)?;
        let occupancy: i64 = capacity::dining_slot_occupancy(
            conn,
            reservation.dining_item_id,
            reservation.date,
            reservation.time,
        )?;
        if occupancy > i64::from(max_people) {
            let already_booked: i64 = occupancy - i64::from(reservation.num_guests);
            warn!(
                dining_item_id = reservation.dining_item_id,
                occupancy, max_people, "Dining slot capacity exceeded, rolling back"
            );
            return Err(PersistenceError::CapacityExceeded {
                resource_id: reservation.dining_item_id,
                requested: reservation.num_guests,
                remaining: u32::try_from((i64::from(max_people) - already_booked).max(0))
                    .unwrap_or(0),
            });
        }
        Ok(reservation_id)
    })?;
    info!(
        reservation_id,
        dining_item_id = reservation.dining_item_id,
        customer_id = %reservation.customer_id,
        "Reserved dining seats"
    );
    Ok(reservation_id)
}

/// Reserves participants for an experience day.
///
/// An unbounded experience (`max_participants` of `None`) never rejects on
/// capacity; the write still runs inside the same transactional pattern.
///
/// # Errors
///
/// Returns `CapacityExceeded` on overbooking, or a database error.
pub fn reserve_experience_participants(
    conn: &mut SqliteConnection,
    booking: &ExperienceBooking,
    max_participants: Option<u32>,
) -> Result<i64, PersistenceError> {
    let row: NewExperienceBooking = NewExperienceBooking::from_domain(booking)?;
    let booking_id: i64 = conn.immediate_transaction(|conn| {
        diesel::insert_into(experience_bookings::table)
            .values(&row)
            .execute(conn)?;
        let booking_id: i64 = sqlite::get_last_insert_rowid(conn)?;
        if let Some(max_participants) = max_participants {
            let occupancy: i64 =
                capacity::experience_day_occupancy(conn, booking.experience_id, booking.date)?;
            if occupancy > i64::from(max_participants) {
                let already_booked: i64 = occupancy - i64::from(booking.num_participants);
                warn!(
                    experience_id = booking.experience_id,
                    occupancy, max_participants, "Experience capacity exceeded, rolling back"
                );
                return Err(PersistenceError::CapacityExceeded {
                    resource_id: booking.experience_id,
                    requested: booking.num_participants,
                    remaining: u32::try_from(
                        (i64::from(max_participants) - already_booked).max(0),
                    )
                    .unwrap_or(0),
                });
            }
        }
        Ok(booking_id)
    })?;
    info!(
        booking_id,
        experience_id = booking.experience_id,
        customer_id = %booking.customer_id,
        "Reserved experience participants"
    );
    Ok(booking_id)
}

/// Rewrites a cabin booking's guest-editable fields and re-verifies the
/// range, excluding the booking from its own conflict scan.
///
/// # Errors
///
/// Returns `RangeConflict` if the new range is taken, `QueryFailed` if the
/// booking has no persisted ID, or a database error.
pub fn update_cabin_booking(
    conn: &mut SqliteConnection,
    booking: &CabinBooking,
) -> Result<(), PersistenceError> {
    let booking_id: i64 = booking.booking_id.ok_or_else(|| {
        PersistenceError::QueryFailed("Cabin booking has no persisted ID".to_string())
    })?;
    let check_in_text: String = format_date(booking.check_in)?;
    let check_out_text: String = format_date(booking.check_out)?;
    let num_guests: i32 = i32::try_from(booking.num_guests)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let special_requests: String = serde_json::to_string(&booking.special_requests)?;

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(
            cabin_bookings::table.filter(cabin_bookings::booking_id.eq(booking_id)),
        )
        .set((
            cabin_bookings::check_in.eq(&check_in_text),
            cabin_bookings::check_out.eq(&check_out_text),
            cabin_bookings::num_guests.eq(num_guests),
            cabin_bookings::base_price_cents.eq(booking.base_price.cents()),
            cabin_bookings::extras_price_cents.eq(booking.extras_price.cents()),
            cabin_bookings::total_price_cents.eq(booking.total_price.cents()),
            cabin_bookings::deposit_cents.eq(booking.deposit_amount.cents()),
            cabin_bookings::special_requests.eq(&special_requests),
        ))
        .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Cabin booking {booking_id} not found"
            )));
        }
        let conflicting: Vec<i64> = availability::overlapping_booking_ids(
            conn,
            booking.cabin_id,
            booking.check_in,
            booking.check_out,
            Some(booking_id),
        )?;
        if conflicting.is_empty() {
            Ok(())
        } else {
            warn!(
                booking_id,
                ?conflicting,
                "Cabin reschedule conflict, rolling back"
            );
            Err(PersistenceError::RangeConflict {
                cabin_id: booking.cabin_id,
                conflicting,
            })
        }
    })
}

/// Rewrites a dining reservation's guest-editable fields and re-verifies
/// the target slot's occupancy with the updated row in place.
///
/// # Errors
///
/// Returns `CapacityExceeded` if the target slot cannot take the party,
/// `QueryFailed` if the reservation has no persisted ID, or a database
/// error.
pub fn update_dining_reservation(
    conn: &mut SqliteConnection,
    reservation: &DiningReservation,
    max_people: u32,
) -> Result<(), PersistenceError> {
    let reservation_id: i64 = reservation.reservation_id.ok_or_else(|| {
        PersistenceError::QueryFailed("Dining reservation has no persisted ID".to_string())
    })?;
    let date_text: String = format_date(reservation.date)?;
    let time_text: String = format_time(reservation.time)?;
    let num_guests: i32 = i32::try_from(reservation.num_guests)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let special_requests: String = serde_json::to_string(&reservation.special_requests)?;

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(
            dining_reservations::table
                .filter(dining_reservations::reservation_id.eq(reservation_id)),
        )
        .set((
            dining_reservations::date.eq(&date_text),
            dining_reservations::time.eq(&time_text),
            dining_reservations::num_guests.eq(num_guests),
            dining_reservations::total_price_cents.eq(reservation.total_price.cents()),
            dining_reservations::special_requests.eq(&special_requests),
        ))
        .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Dining reservation {reservation_id} not found"
            )));
        }
        let occupancy: i64 = capacity::dining_slot_occupancy(
            conn,
            reservation.dining_item_id,
            reservation.date,
            reservation.time,
        )?;
        if occupancy > i64::from(max_people) {
            let already_booked: i64 = occupancy - i64::from(reservation.num_guests);
            warn!(
                reservation_id,
                occupancy, max_people, "Dining reschedule capacity exceeded, rolling back"
            );
            return Err(PersistenceError::CapacityExceeded {
                resource_id: reservation.dining_item_id,
                requested: reservation.num_guests,
                remaining: u32::try_from((i64::from(max_people) - already_booked).max(0))
                    .unwrap_or(0),
            });
        }
        Ok(())
    })
}

/// Rewrites an experience booking's guest-editable fields and re-verifies
/// the target day's occupancy with the updated row in place.
///
/// # Errors
///
/// Returns `CapacityExceeded` if the target day cannot take the party,
/// `QueryFailed` if the booking has no persisted ID, or a database error.
pub fn update_experience_booking(
    conn: &mut SqliteConnection,
    booking: &ExperienceBooking,
    max_participants: Option<u32>,
) -> Result<(), PersistenceError> {
    let booking_id: i64 = booking.booking_id.ok_or_else(|| {
        PersistenceError::QueryFailed("Experience booking has no persisted ID".to_string())
    })?;
    let date_text: String = format_date(booking.date)?;
    let num_participants: i32 = i32::try_from(booking.num_participants)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let special_requests: String = serde_json::to_string(&booking.special_requests)?;

    conn.immediate_transaction(|conn| {
        let updated: usize = diesel::update(
            experience_bookings::table.filter(experience_bookings::booking_id.eq(booking_id)),
        )
        .set((
            experience_bookings::date.eq(&date_text),
            experience_bookings::num_participants.eq(num_participants),
            experience_bookings::total_price_cents.eq(booking.total_price.cents()),
            experience_bookings::special_requests.eq(&special_requests),
        ))
        .execute(conn)?;
        if updated == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Experience booking {booking_id} not found"
            )));
        }
        if let Some(max_participants) = max_participants {
            let occupancy: i64 =
                capacity::experience_day_occupancy(conn, booking.experience_id, booking.date)?;
            if occupancy > i64::from(max_participants) {
                let already_booked: i64 = occupancy - i64::from(booking.num_participants);
                warn!(
                    booking_id,
                    occupancy, max_participants,
                    "Experience reschedule capacity exceeded, rolling back"
                );
                return Err(PersistenceError::CapacityExceeded {
                    resource_id: booking.experience_id,
                    requested: booking.num_participants,
                    remaining: u32::try_from(
                        (i64::from(max_participants) - already_booked).max(0),
                    )
                    .unwrap_or(0),
                });
            }
        }
        Ok(())
    })
}
