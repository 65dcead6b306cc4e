// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::{CabinBookingStatus, DiningReservationStatus, ExperienceBookingStatus};
use time::{Date, Time};

/// Errors that can occur during domain validation and calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Check-out date is not strictly after check-in date.
    InvalidDateRange {
        /// The requested check-in date.
        check_in: Date,
        /// The requested check-out date.
        check_out: Date,
    },
    /// The stay length is outside the configured booking-length bounds.
    InvalidStayLength {
        /// The computed number of nights.
        nights: i64,
        /// The minimum allowed nights.
        min_nights: u32,
        /// The maximum allowed nights.
        max_nights: u32,
    },
    /// Party size is outside the resource's bounds.
    PartySizeOutOfBounds {
        /// The requested party size.
        party_size: u32,
        /// The minimum allowed party size.
        min: u32,
        /// The maximum allowed party size.
        max: u32,
    },
    /// Requested time of day falls outside the resource's serving window.
    OutsideServingWindow {
        /// The requested time.
        requested: Time,
        /// Start of the serving window (inclusive).
        start: Time,
        /// End of the serving window (exclusive).
        end: Time,
    },
    /// The cancellation policy string is not recognized.
    InvalidCancellationPolicy(String),
    /// A cabin booking is not in a cancellable state.
    CabinBookingNotCancellable(CabinBookingStatus),
    /// A dining reservation is not in a cancellable state.
    DiningReservationNotCancellable(DiningReservationStatus),
    /// An experience booking is not in a cancellable state.
    ExperienceBookingNotCancellable(ExperienceBookingStatus),
    /// A status transition is not permitted by the lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },
    /// A status string could not be parsed.
    InvalidStatus(String),
    /// Monetary arithmetic overflowed.
    MoneyOverflow {
        /// Description of the operation that overflowed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateRange {
                check_in,
                check_out,
            } => {
                write!(
                    f,
                    "Check-out date {check_out} must be after check-in date {check_in}"
                )
            }
            Self::InvalidStayLength {
                nights,
                min_nights,
                max_nights,
            } => {
                write!(
                    f,
                    "Stay of {nights} nights is outside the allowed range {min_nights}-{max_nights}"
                )
            }
            Self::PartySizeOutOfBounds {
                party_size,
                min,
                max,
            } => {
                write!(
                    f,
                    "Party size {party_size} is outside the allowed range {min}-{max}"
                )
            }
            Self::OutsideServingWindow {
                requested,
                start,
                end,
            } => {
                write!(
                    f,
                    "Requested time {requested} is outside the serving window {start}-{end}"
                )
            }
            Self::InvalidCancellationPolicy(s) => {
                write!(f, "Unknown cancellation policy: {s}")
            }
            Self::CabinBookingNotCancellable(status) => {
                write!(f, "Cabin booking with status '{status}' cannot be cancelled")
            }
            Self::DiningReservationNotCancellable(status) => {
                write!(
                    f,
                    "Dining reservation with status '{status}' cannot be cancelled"
                )
            }
            Self::ExperienceBookingNotCancellable(status) => {
                write!(
                    f,
                    "Experience booking with status '{status}' cannot be cancelled"
                )
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot transition from status '{from}' to '{to}'")
            }
            Self::InvalidStatus(s) => write!(f, "Unknown reservation status: {s}"),
            Self::MoneyOverflow { operation } => {
                write!(f, "Monetary arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
