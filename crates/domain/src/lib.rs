// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain layer for the Lodge Reservation System.
//!
//! This crate contains the pure domain logic: monetary arithmetic, resource
//! and reservation types, reservation status machines, pricing derivation,
//! and the cancellation/refund policy engine. It performs no I/O; everything
//! here is deterministic given its inputs.

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

mod error;
mod money;
mod pricing;
mod refund;
mod reservation;
mod resource;
mod settings;
mod status;
mod validation;

pub use error::DomainError;
pub use money::Money;
pub use pricing::{CabinQuote, ExtrasSelection, price_by_headcount, price_cabin_stay};
pub use refund::{
    CancellationDeadlines, RefundEstimate, RefundType, amount_paid, calculate_refund,
    cancellation_deadlines, days_until_check_in, describe_policy,
};
pub use reservation::{CabinBooking, CustomerId, DiningReservation, ExperienceBooking};
pub use resource::{Cabin, DiningItem, Experience};
pub use settings::{CancellationPolicy, FeeSchedule, Settings};
pub use status::{CabinBookingStatus, DiningReservationStatus, ExperienceBookingStatus};
pub use validation::{
    validate_cabin_dates, validate_dining_party_size, validate_experience_party_size,
    validate_serving_time,
};
