// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate occupancy queries for shared-capacity resources.
//!
//! Dining occupancy is scoped to an exact `(date, time)` slot; experience
//! occupancy is scoped to a whole day. Statuses that do not count toward
//! occupancy (cancelled, and no-show for dining) are excluded, which is how
//! cancellation frees capacity without deleting rows.

use crate::data_models::{format_date, format_time};
use crate::diesel_schema::{dining_reservations, experience_bookings};
use crate::error::PersistenceError;
use diesel::dsl::sum;
use diesel::prelude::*;
use lodge_domain::{DiningReservationStatus, ExperienceBookingStatus};
use time::{Date, Time};

/// Sums the guests booked for an exact dining `(date, time)` slot.
///
/// The unclamped aggregate, for the reservation path's post-write check.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn dining_slot_occupancy(
    conn: &mut SqliteConnection,
    dining_item_id: i64,
    date: Date,
    time: Time,
) -> Result<i64, PersistenceError> {
    let date_text: String = format_date(date)?;
    let time_text: String = format_time(time)?;

    let occupancy: Option<i64> = dining_reservations::table
        .filter(dining_reservations::dining_item_id.eq(dining_item_id))
        .filter(dining_reservations::date.eq(date_text))
        .filter(dining_reservations::time.eq(time_text))
        .filter(
            dining_reservations::status.ne_all(vec![
                DiningReservationStatus::Cancelled.as_str(),
                DiningReservationStatus::NoShow.as_str(),
            ]),
        )
        .select(sum(dining_reservations::num_guests))
        .first(conn)?;
    Ok(occupancy.unwrap_or(0))
}

/// Sums the participants booked for an experience on a given day.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn experience_day_occupancy(
    conn: &mut SqliteConnection,
    experience_id: i64,
    date: Date,
) -> Result<i64, PersistenceError> {
    let date_text: String = format_date(date)?;

    let occupancy: Option<i64> = experience_bookings::table
        .filter(experience_bookings::experience_id.eq(experience_id))
        .filter(experience_bookings::date.eq(date_text))
        .filter(experience_bookings::status.ne(ExperienceBookingStatus::Cancelled.as_str()))
        .select(sum(experience_bookings::num_participants))
        .first(conn)?;
    Ok(occupancy.unwrap_or(0))
}

/// Remaining seats for a dining slot, clamped to zero for display.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn remaining_dining_capacity(
    conn: &mut SqliteConnection,
    dining_item_id: i64,
    max_people: u32,
    date: Date,
    time: Time,
) -> Result<u32, PersistenceError> {
    let occupancy: i64 = dining_slot_occupancy(conn, dining_item_id, date, time)?;
    Ok(u32::try_from((i64::from(max_people) - occupancy).max(0)).unwrap_or(0))
}

/// Remaining participants for an experience day, clamped to zero.
///
/// Returns `None` for unbounded experiences.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn remaining_experience_capacity(
    conn: &mut SqliteConnection,
    experience_id: i64,
    max_participants: Option<u32>,
    date: Date,
) -> Result<Option<u32>, PersistenceError> {
    let Some(max_participants) = max_participants else {
        return Ok(None);
    };
    let occupancy: i64 = experience_day_occupancy(conn, experience_id, date)?;
    Ok(Some(
        u32::try_from((i64::from(max_participants) - occupancy).max(0)).unwrap_or(0),
    ))
}
