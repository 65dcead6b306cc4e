// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cabin date-range availability queries.
//!
//! Bookings block `[check_in, check_out)` half-open; a check-out on day N
//! and a check-in on day N never conflict. Dates are ISO 8601 text, so the
//! SQL comparisons below are chronological.

use crate::data_models::{format_date, parse_date};
use crate::diesel_schema::cabin_bookings;
use crate::error::PersistenceError;
use diesel::prelude::*;
use lodge_domain::CabinBookingStatus;
use time::Date;

/// Result of a range availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeAvailability {
    /// Whether the range is free of conflicting bookings.
    pub available: bool,
    /// Booking IDs that block the range, ordered by ID.
    pub conflicting: Vec<i64>,
}

/// Returns the IDs of non-cancelled bookings that overlap
/// `[check_in, check_out)` for the given cabin.
///
/// `exclude_booking` removes a booking from its own conflict scan, which
/// the write-then-verify reservation path and reschedules rely on.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn overlapping_booking_ids(
    conn: &mut SqliteConnection,
    cabin_id: i64,
    check_in: Date,
    check_out: Date,
    exclude_booking: Option<i64>,
) -> Result<Vec<i64>, PersistenceError> {
    let check_in_text: String = format_date(check_in)?;
    let check_out_text: String = format_date(check_out)?;

    let mut query = cabin_bookings::table
        .filter(cabin_bookings::cabin_id.eq(cabin_id))
        .filter(cabin_bookings::status.ne(CabinBookingStatus::Cancelled.as_str()))
        .filter(cabin_bookings::check_in.lt(check_out_text))
        .filter(cabin_bookings::check_out.gt(check_in_text))
        .into_boxed();

    if let Some(booking_id) = exclude_booking {
        query = query.filter(cabin_bookings::booking_id.ne(booking_id));
    }

    Ok(query
        .select(cabin_bookings::booking_id)
        .order(cabin_bookings::booking_id.asc())
        .load(conn)?)
}

/// Checks whether `[check_in, check_out)` is free for the given cabin.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn is_range_available(
    conn: &mut SqliteConnection,
    cabin_id: i64,
    check_in: Date,
    check_out: Date,
) -> Result<RangeAvailability, PersistenceError> {
    let conflicting: Vec<i64> =
        overlapping_booking_ids(conn, cabin_id, check_in, check_out, None)?;
    Ok(RangeAvailability {
        available: conflicting.is_empty(),
        conflicting,
    })
}

/// Lists the blocked date ranges for a cabin within a query window.
///
/// Overlapping and back-to-back bookings are merged into disjoint ranges,
/// clipped to `[window_start, window_end)` and ordered by start date.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or a stored date
/// cannot be parsed.
pub fn list_unavailable_ranges(
    conn: &mut SqliteConnection,
    cabin_id: i64,
    window_start: Date,
    window_end: Date,
) -> Result<Vec<(Date, Date)>, PersistenceError> {
    let start_text: String = format_date(window_start)?;
    let end_text: String = format_date(window_end)?;

    let rows: Vec<(String, String)> = cabin_bookings::table
        .filter(cabin_bookings::cabin_id.eq(cabin_id))
        .filter(cabin_bookings::status.ne(CabinBookingStatus::Cancelled.as_str()))
        .filter(cabin_bookings::check_in.lt(end_text))
        .filter(cabin_bookings::check_out.gt(start_text))
        .select((cabin_bookings::check_in, cabin_bookings::check_out))
        .order(cabin_bookings::check_in.asc())
        .load(conn)?;

    let mut merged: Vec<(Date, Date)> = Vec::new();
    for (check_in_text, check_out_text) in rows {
        let range_start: Date =
            parse_date("cabin_bookings", &check_in_text)?.max(window_start);
        let range_end: Date = parse_date("cabin_bookings", &check_out_text)?.min(window_end);
        if range_end <= range_start {
            continue;
        }
        match merged.last_mut() {
            // Touching ranges merge: checkout day N followed by check-in
            // day N is one continuous blocked span.
            Some(last) if range_start <= last.1 => {
                last.1 = last.1.max(range_end);
            }
            _ => merged.push((range_start, range_end)),
        }
    }
    Ok(merged)
}
