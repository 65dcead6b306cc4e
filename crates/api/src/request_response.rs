// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.

use crate::error::ApiError;
use lodge_domain::{
    CabinBooking, CancellationDeadlines, CancellationPolicy, CustomerId, DiningReservation,
    ExperienceBooking, ExtrasSelection, Money, RefundEstimate,
};
use serde::{Deserialize, Serialize};
use time::{Date, Time};

/// The three reservable resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationKind {
    /// A cabin booking over a date range.
    Cabin,
    /// A dining reservation for a date/time slot.
    Dining,
    /// An experience booking for a calendar day.
    Experience,
}

impl ReservationKind {
    /// Returns the kind as its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cabin => "cabin",
            Self::Dining => "dining",
            Self::Experience => "experience",
        }
    }
}

impl std::fmt::Display for ReservationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReservationKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cabin" => Ok(Self::Cabin),
            "dining" => Ok(Self::Dining),
            "experience" => Ok(Self::Experience),
            other => Err(ApiError::InvalidInput {
                field: String::from("kind"),
                message: format!("Unknown reservation kind '{other}'"),
            }),
        }
    }
}

/// External payment events applied to a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSignal {
    /// The full amount was received.
    Paid,
    /// The deposit was received (cabin bookings only).
    DepositPaid,
    /// A previously received payment was returned.
    Refunded,
}

/// Request to register a cabin.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCabinRequest {
    /// Display name.
    pub name: String,
    /// Nightly rate before discount.
    pub price_per_night: Money,
    /// Optional flat per-night discount.
    pub discount: Option<Money>,
    /// Maximum number of guests.
    pub max_capacity: u32,
}

/// Request to register a dining item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiningItemRequest {
    /// Display name.
    pub name: String,
    /// Per-person price.
    pub price_per_person: Money,
    /// Smallest bookable party.
    pub min_people: u32,
    /// Seats per date/time slot.
    pub max_people: u32,
    /// First seating time (inclusive).
    pub serving_start: Time,
    /// End of service (exclusive).
    pub serving_end: Time,
}

/// Request to register an experience.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperienceRequest {
    /// Display name.
    pub name: String,
    /// Per-person price.
    pub price_per_person: Money,
    /// Participants per day; `None` means unlimited.
    pub max_participants: Option<u32>,
}

/// Response to a resource creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResourceResponse {
    /// The newly assigned resource ID.
    pub id: i64,
    /// A human-readable confirmation.
    pub message: String,
}

/// Request to book a cabin for a date range.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCabinBookingRequest {
    /// The booking customer.
    pub customer_id: CustomerId,
    /// Arrival date (inclusive).
    pub check_in: Date,
    /// Departure date (exclusive).
    pub check_out: Date,
    /// Party size.
    pub num_guests: u32,
    /// Optional extras priced into the quote.
    #[serde(default)]
    pub extras: ExtrasSelection,
    /// Free-form requests stored with the booking.
    #[serde(default)]
    pub special_requests: Vec<String>,
}

/// Request to reserve dining seats in a date/time slot.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDiningReservationRequest {
    /// The reserving customer.
    pub customer_id: CustomerId,
    /// Reservation date.
    pub date: Date,
    /// Seating time, within the item's serving window.
    pub time: Time,
    /// Party size.
    pub num_guests: u32,
    /// Free-form requests stored with the reservation.
    #[serde(default)]
    pub special_requests: Vec<String>,
}

/// Request to book experience spots for a day.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExperienceBookingRequest {
    /// The booking customer.
    pub customer_id: CustomerId,
    /// Booking date.
    pub date: Date,
    /// Party size.
    pub num_participants: u32,
    /// Free-form requests stored with the booking.
    #[serde(default)]
    pub special_requests: Vec<String>,
}

/// Request to modify a cabin booking. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCabinBookingRequest {
    /// The caller; must own the booking.
    pub customer_id: CustomerId,
    /// New arrival date.
    pub check_in: Option<Date>,
    /// New departure date.
    pub check_out: Option<Date>,
    /// New party size.
    pub num_guests: Option<u32>,
    /// Replacement for the stored special requests.
    pub special_requests: Option<Vec<String>>,
}

/// Request to modify a dining reservation. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDiningReservationRequest {
    /// The caller; must own the reservation.
    pub customer_id: CustomerId,
    /// New reservation date.
    pub date: Option<Date>,
    /// New seating time.
    pub time: Option<Time>,
    /// New party size.
    pub num_guests: Option<u32>,
    /// Replacement for the stored special requests.
    pub special_requests: Option<Vec<String>>,
}

/// Request to modify an experience booking. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExperienceBookingRequest {
    /// The caller; must own the booking.
    pub customer_id: CustomerId,
    /// New booking date.
    pub date: Option<Date>,
    /// New party size.
    pub num_participants: Option<u32>,
    /// Replacement for the stored special requests.
    pub special_requests: Option<Vec<String>>,
}

/// Request to cancel a reservation or preview its refund.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelRequest {
    /// The caller; must own the reservation.
    pub customer_id: CustomerId,
}

/// Request to apply an external payment signal.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentSignalRequest {
    /// Which reservation table the ID refers to.
    pub kind: ReservationKind,
    /// The reservation ID.
    pub reservation_id: i64,
    /// The payment event.
    pub signal: PaymentSignal,
}

/// Response to a payment signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSignalResponse {
    /// Which reservation table the ID refers to.
    pub kind: ReservationKind,
    /// The reservation ID.
    pub reservation_id: i64,
    /// A human-readable description of what the signal changed.
    pub message: String,
}

/// Availability verdict for a cabin date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the range is free.
    pub available: bool,
    /// Booking IDs blocking the range when it is not free.
    pub conflicting: Vec<i64>,
}

/// A blocked date span, half-open `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First blocked day.
    pub start: Date,
    /// First free day after the span.
    pub end: Date,
}

/// Blocked spans for a cabin within a query window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableRangesResponse {
    /// Merged, window-clipped blocked spans in ascending order.
    pub ranges: Vec<DateRange>,
}

/// Remaining capacity in a dining slot or experience day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityResponse {
    /// Seats or spots still free; `None` means unlimited.
    pub remaining: Option<u32>,
}

/// A customer's reservation history across all three kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationHistoryResponse {
    /// Cabin bookings, newest first.
    pub cabin_bookings: Vec<CabinBooking>,
    /// Dining reservations, newest first.
    pub dining_reservations: Vec<DiningReservation>,
    /// Experience bookings, newest first.
    pub experience_bookings: Vec<ExperienceBooking>,
}

/// Response to a cabin booking cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelCabinBookingResponse {
    /// The booking after cancellation.
    pub booking: CabinBooking,
    /// The refund owed under the active policy.
    pub refund: RefundEstimate,
}

/// Response to a dining reservation cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelDiningReservationResponse {
    /// The reservation after cancellation.
    pub reservation: DiningReservation,
    /// The refund owed under the active policy.
    pub refund: RefundEstimate,
}

/// Response to an experience booking cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelExperienceBookingResponse {
    /// The booking after cancellation.
    pub booking: ExperienceBooking,
    /// The refund owed under the active policy.
    pub refund: RefundEstimate,
}

/// The active cancellation policy, described for customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    /// The active policy.
    pub policy: CancellationPolicy,
    /// Fixed human-readable description of the policy's tiers.
    pub description: String,
    /// Concrete deadlines for a supplied check-in date, if one was given.
    pub deadlines: Option<CancellationDeadlines>,
}
