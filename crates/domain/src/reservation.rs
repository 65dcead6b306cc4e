// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation records.
//!
//! One record type per reservation kind. Records are created in a non-final
//! status, mutated only through lifecycle operations, and never physically
//! deleted; cancellation is a status transition.

use crate::money::Money;
use crate::status::{CabinBookingStatus, DiningReservationStatus, ExperienceBookingStatus};
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// Opaque customer identifier issued by the external identity provider.
///
/// The reservation core never interprets or owns this value; it is used
/// solely for ownership checks and history filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId {
    value: String,
}

impl CustomerId {
    /// Creates a new `CustomerId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A booking of an exclusively-held cabin over `[check_in, check_out)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinBooking {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the booking has not been persisted yet.
    pub booking_id: Option<i64>,
    /// The booked cabin.
    pub cabin_id: i64,
    /// The owning customer.
    pub customer_id: CustomerId,
    /// Check-in date (inclusive).
    pub check_in: Date,
    /// Check-out date (exclusive).
    pub check_out: Date,
    /// Number of guests.
    pub num_guests: u32,
    /// Nightly total before extras.
    pub base_price: Money,
    /// Sum of policy-eligible extras.
    pub extras_price: Money,
    /// `base_price + extras_price`.
    pub total_price: Money,
    /// Deposit due at booking time; zero when deposits are not required.
    pub deposit_amount: Money,
    /// Whether the full price has been paid.
    pub is_paid: bool,
    /// Whether only the deposit has been paid.
    pub deposit_paid: bool,
    /// Lifecycle status.
    pub status: CabinBookingStatus,
    /// Free-text guest requests.
    pub special_requests: Vec<String>,
}

impl CabinBooking {
    /// Returns the number of nights covered by this booking.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).whole_days()
    }
}

/// A shared-capacity dining reservation for an exact `(date, time)` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningReservation {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the reservation has not been persisted yet.
    pub reservation_id: Option<i64>,
    /// The reserved dining item.
    pub dining_item_id: i64,
    /// The owning customer.
    pub customer_id: CustomerId,
    /// Reservation date.
    pub date: Date,
    /// Reservation time within the serving window.
    pub time: Time,
    /// Party size.
    pub num_guests: u32,
    /// `price_per_person × num_guests`.
    pub total_price: Money,
    /// Whether the reservation has been paid.
    pub is_paid: bool,
    /// Lifecycle status.
    pub status: DiningReservationStatus,
    /// Free-text guest requests.
    pub special_requests: Vec<String>,
}

/// A shared-capacity experience booking scoped to a whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceBooking {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the booking has not been persisted yet.
    pub booking_id: Option<i64>,
    /// The booked experience.
    pub experience_id: i64,
    /// The owning customer.
    pub customer_id: CustomerId,
    /// Session date.
    pub date: Date,
    /// Number of participants.
    pub num_participants: u32,
    /// `price_per_person × num_participants`.
    pub total_price: Money,
    /// Whether the booking has been paid.
    pub is_paid: bool,
    /// Lifecycle status.
    pub status: ExperienceBookingStatus,
    /// Free-text guest requests.
    pub special_requests: Vec<String>,
}
