// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and domain conversions.
//!
//! Dates and times are stored as ISO 8601 text so that lexicographic
//! comparison in SQL matches chronological comparison. Monetary columns are
//! whole cents. Special requests are a JSON array in a text column.

use crate::diesel_schema::{
    cabin_bookings, cabins, dining_items, dining_reservations, experience_bookings, experiences,
};
use crate::error::PersistenceError;
use diesel::prelude::*;
use lodge_domain::{
    Cabin, CabinBooking, CabinBookingStatus, CustomerId, DiningItem, DiningReservation,
    DiningReservationStatus, Experience, ExperienceBooking, ExperienceBookingStatus, Money,
};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Time};

/// Storage format for dates.
pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Storage format for times of day.
pub(crate) const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");

/// Formats a date for storage.
pub(crate) fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored date.
pub(crate) fn parse_date(table: &'static str, value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT).map_err(|e| PersistenceError::CorruptRecord {
        table,
        reason: format!("invalid date '{value}': {e}"),
    })
}

/// Formats a time of day for storage.
pub(crate) fn format_time(time: Time) -> Result<String, PersistenceError> {
    time.format(TIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored time of day.
pub(crate) fn parse_time(table: &'static str, value: &str) -> Result<Time, PersistenceError> {
    Time::parse(value, TIME_FORMAT).map_err(|e| PersistenceError::CorruptRecord {
        table,
        reason: format!("invalid time '{value}': {e}"),
    })
}

fn parse_status<T: std::str::FromStr>(
    table: &'static str,
    value: &str,
) -> Result<T, PersistenceError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| PersistenceError::CorruptRecord {
        table,
        reason: format!("invalid status '{value}': {e}"),
    })
}

fn parse_requests(table: &'static str, json: &str) -> Result<Vec<String>, PersistenceError> {
    serde_json::from_str(json).map_err(|e| PersistenceError::CorruptRecord {
        table,
        reason: format!("invalid special_requests JSON: {e}"),
    })
}

/// Cabin row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct CabinRow {
    pub cabin_id: i64,
    pub name: String,
    pub price_per_night_cents: i64,
    pub discount_cents: Option<i64>,
    pub max_capacity: i32,
}

impl CabinRow {
    /// Maps this row to the domain type.
    pub fn into_domain(self) -> Result<Cabin, PersistenceError> {
        let max_capacity: u32 =
            u32::try_from(self.max_capacity).map_err(|_| PersistenceError::CorruptRecord {
                table: "cabins",
                reason: format!("negative max_capacity {}", self.max_capacity),
            })?;
        Ok(Cabin::with_id(
            self.cabin_id,
            self.name,
            Money::from_cents(self.price_per_night_cents),
            self.discount_cents.map(Money::from_cents),
            max_capacity,
        ))
    }
}

/// Insertable cabin.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cabins)]
pub struct NewCabin {
    pub name: String,
    pub price_per_night_cents: i64,
    pub discount_cents: Option<i64>,
    pub max_capacity: i32,
}

/// Dining item row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct DiningItemRow {
    pub dining_item_id: i64,
    pub name: String,
    pub price_per_person_cents: i64,
    pub min_people: i32,
    pub max_people: i32,
    pub serving_start: String,
    pub serving_end: String,
}

impl DiningItemRow {
    /// Maps this row to the domain type.
    pub fn into_domain(self) -> Result<DiningItem, PersistenceError> {
        let serving_start: Time = parse_time("dining_items", &self.serving_start)?;
        let serving_end: Time = parse_time("dining_items", &self.serving_end)?;
        let bounds_err = |field: &str, value: i32| PersistenceError::CorruptRecord {
            table: "dining_items",
            reason: format!("negative {field} {value}"),
        };
        let min_people: u32 =
            u32::try_from(self.min_people).map_err(|_| bounds_err("min_people", self.min_people))?;
        let max_people: u32 =
            u32::try_from(self.max_people).map_err(|_| bounds_err("max_people", self.max_people))?;
        Ok(DiningItem::with_id(
            self.dining_item_id,
            self.name,
            Money::from_cents(self.price_per_person_cents),
            min_people,
            max_people,
            serving_start,
            serving_end,
        ))
    }
}

/// Insertable dining item.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dining_items)]
pub struct NewDiningItem {
    pub name: String,
    pub price_per_person_cents: i64,
    pub min_people: i32,
    pub max_people: i32,
    pub serving_start: String,
    pub serving_end: String,
}

/// Experience row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct ExperienceRow {
    pub experience_id: i64,
    pub name: String,
    pub price_per_person_cents: i64,
    pub max_participants: Option<i32>,
}

impl ExperienceRow {
    /// Maps this row to the domain type.
    pub fn into_domain(self) -> Result<Experience, PersistenceError> {
        let max_participants: Option<u32> = match self.max_participants {
            Some(value) => {
                Some(
                    u32::try_from(value).map_err(|_| PersistenceError::CorruptRecord {
                        table: "experiences",
                        reason: format!("negative max_participants {value}"),
                    })?,
                )
            }
            None => None,
        };
        Ok(Experience::with_id(
            self.experience_id,
            self.name,
            Money::from_cents(self.price_per_person_cents),
            max_participants,
        ))
    }
}

/// Insertable experience.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = experiences)]
pub struct NewExperience {
    pub name: String,
    pub price_per_person_cents: i64,
    pub max_participants: Option<i32>,
}

/// Cabin booking row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct CabinBookingRow {
    pub booking_id: i64,
    pub cabin_id: i64,
    pub customer_id: String,
    pub check_in: String,
    pub check_out: String,
    pub num_guests: i32,
    pub base_price_cents: i64,
    pub extras_price_cents: i64,
    pub total_price_cents: i64,
    pub deposit_cents: i64,
    pub is_paid: i32,
    pub deposit_paid: i32,
    pub status: String,
    pub special_requests: String,
}

impl CabinBookingRow {
    /// Maps this row to the domain type.
    pub fn into_domain(self) -> Result<CabinBooking, PersistenceError> {
        let status: CabinBookingStatus = parse_status("cabin_bookings", &self.status)?;
        let num_guests: u32 =
            u32::try_from(self.num_guests).map_err(|_| PersistenceError::CorruptRecord {
                table: "cabin_bookings",
                reason: format!("negative num_guests {}", self.num_guests),
            })?;
        Ok(CabinBooking {
            booking_id: Some(self.booking_id),
            cabin_id: self.cabin_id,
            customer_id: CustomerId::new(&self.customer_id),
            check_in: parse_date("cabin_bookings", &self.check_in)?,
            check_out: parse_date("cabin_bookings", &self.check_out)?,
            num_guests,
            base_price: Money::from_cents(self.base_price_cents),
            extras_price: Money::from_cents(self.extras_price_cents),
            total_price: Money::from_cents(self.total_price_cents),
            deposit_amount: Money::from_cents(self.deposit_cents),
            is_paid: self.is_paid != 0,
            deposit_paid: self.deposit_paid != 0,
            status,
            special_requests: parse_requests("cabin_bookings", &self.special_requests)?,
        })
    }
}

/// Insertable cabin booking.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cabin_bookings)]
pub struct NewCabinBooking {
    pub cabin_id: i64,
    pub customer_id: String,
    pub check_in: String,
    pub check_out: String,
    pub num_guests: i32,
    pub base_price_cents: i64,
    pub extras_price_cents: i64,
    pub total_price_cents: i64,
    pub deposit_cents: i64,
    pub is_paid: i32,
    pub deposit_paid: i32,
    pub status: String,
    pub special_requests: String,
}

impl NewCabinBooking {
    /// Builds an insertable row from a domain booking.
    ///
    /// # Errors
    ///
    /// Returns an error if a date or the request list cannot be serialized.
    pub fn from_domain(booking: &CabinBooking) -> Result<Self, PersistenceError> {
        Ok(Self {
            cabin_id: booking.cabin_id,
            customer_id: booking.customer_id.value().to_string(),
            check_in: format_date(booking.check_in)?,
            check_out: format_date(booking.check_out)?,
            num_guests: i32::try_from(booking.num_guests)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            base_price_cents: booking.base_price.cents(),
            extras_price_cents: booking.extras_price.cents(),
            total_price_cents: booking.total_price.cents(),
            deposit_cents: booking.deposit_amount.cents(),
            is_paid: i32::from(booking.is_paid),
            deposit_paid: i32::from(booking.deposit_paid),
            status: booking.status.as_str().to_string(),
            special_requests: serde_json::to_string(&booking.special_requests)?,
        })
    }
}

/// Dining reservation row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct DiningReservationRow {
    pub reservation_id: i64,
    pub dining_item_id: i64,
    pub customer_id: String,
    pub date: String,
    pub time: String,
    pub num_guests: i32,
    pub total_price_cents: i64,
    pub is_paid: i32,
    pub status: String,
    pub special_requests: String,
}

impl DiningReservationRow {
    /// Maps this row to the domain type.
    pub fn into_domain(self) -> Result<DiningReservation, PersistenceError> {
        let status: DiningReservationStatus = parse_status("dining_reservations", &self.status)?;
        let num_guests: u32 =
            u32::try_from(self.num_guests).map_err(|_| PersistenceError::CorruptRecord {
                table: "dining_reservations",
                reason: format!("negative num_guests {}", self.num_guests),
            })?;
        Ok(DiningReservation {
            reservation_id: Some(self.reservation_id),
            dining_item_id: self.dining_item_id,
            customer_id: CustomerId::new(&self.customer_id),
            date: parse_date("dining_reservations", &self.date)?,
            time: parse_time("dining_reservations", &self.time)?,
            num_guests,
            total_price: Money::from_cents(self.total_price_cents),
            is_paid: self.is_paid != 0,
            status,
            special_requests: parse_requests("dining_reservations", &self.special_requests)?,
        })
    }
}

/// Insertable dining reservation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dining_reservations)]
pub struct NewDiningReservation {
    pub dining_item_id: i64,
    pub customer_id: String,
    pub date: String,
    pub time: String,
    pub num_guests: i32,
    pub total_price_cents: i64,
    pub is_paid: i32,
    pub status: String,
    pub special_requests: String,
}

impl NewDiningReservation {
    /// Builds an insertable row from a domain reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if a date/time or the request list cannot be
    /// serialized.
    pub fn from_domain(reservation: &DiningReservation) -> Result<Self, PersistenceError> {
        Ok(Self {
            dining_item_id: reservation.dining_item_id,
            customer_id: reservation.customer_id.value().to_string(),
            date: format_date(reservation.date)?,
            time: format_time(reservation.time)?,
            num_guests: i32::try_from(reservation.num_guests)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            total_price_cents: reservation.total_price.cents(),
            is_paid: i32::from(reservation.is_paid),
            status: reservation.status.as_str().to_string(),
            special_requests: serde_json::to_string(&reservation.special_requests)?,
        })
    }
}

/// Experience booking row as stored.
#[derive(Debug, Clone, Queryable)]
pub struct ExperienceBookingRow {
    pub booking_id: i64,
    pub experience_id: i64,
    pub customer_id: String,
    pub date: String,
    pub num_participants: i32,
    pub total_price_cents: i64,
    pub is_paid: i32,
    pub status: String,
    pub special_requests: String,
}

impl ExperienceBookingRow {
    /// Maps this row to the domain type.
    pub fn into_domain(self) -> Result<ExperienceBooking, PersistenceError> {
        let status: ExperienceBookingStatus = parse_status("experience_bookings", &self.status)?;
        let num_participants: u32 = u32::try_from(self.num_participants).map_err(|_| {
            PersistenceError::CorruptRecord {
                table: "experience_bookings",
                reason: format!("negative num_participants {}", self.num_participants),
            }
        })?;
        Ok(ExperienceBooking {
            booking_id: Some(self.booking_id),
            experience_id: self.experience_id,
            customer_id: CustomerId::new(&self.customer_id),
            date: parse_date("experience_bookings", &self.date)?,
            num_participants,
            total_price: Money::from_cents(self.total_price_cents),
            is_paid: self.is_paid != 0,
            status,
            special_requests: parse_requests("experience_bookings", &self.special_requests)?,
        })
    }
}

/// Insertable experience booking.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = experience_bookings)]
pub struct NewExperienceBooking {
    pub experience_id: i64,
    pub customer_id: String,
    pub date: String,
    pub num_participants: i32,
    pub total_price_cents: i64,
    pub is_paid: i32,
    pub status: String,
    pub special_requests: String,
}

impl NewExperienceBooking {
    /// Builds an insertable row from a domain booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the date or the request list cannot be
    /// serialized.
    pub fn from_domain(booking: &ExperienceBooking) -> Result<Self, PersistenceError> {
        Ok(Self {
            experience_id: booking.experience_id,
            customer_id: booking.customer_id.value().to_string(),
            date: format_date(booking.date)?,
            num_participants: i32::try_from(booking.num_participants)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            total_price_cents: booking.total_price.cents(),
            is_paid: i32::from(booking.is_paid),
            status: booking.status.as_str().to_string(),
            special_requests: serde_json::to_string(&booking.special_requests)?,
        })
    }
}
