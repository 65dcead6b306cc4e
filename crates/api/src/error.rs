// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use lodge_domain::DomainError;
use lodge_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract: each variant corresponds to one outward-facing failure class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided, or a requested operation is not legal
    /// for the reservation's current state.
    InvalidInput {
        /// The field or aspect that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The caller is not the customer who owns the reservation.
    NotOwner {
        /// A human-readable description of the mismatch.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// A human-readable description of what was missing.
        message: String,
    },
    /// The reservation lost a race for a cabin range or a capacity pool.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
        /// Booking IDs holding the contested cabin range, if any.
        conflicting_ids: Vec<i64>,
        /// Seats or spots still available in the contested pool, if the
        /// conflict was a capacity rejection.
        remaining: Option<u32>,
    },
    /// An internal error occurred.
    Internal {
        /// A human-readable description of the error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::NotOwner { message } => write!(f, "Not the owner: {message}"),
            Self::ResourceNotFound { message } => write!(f, "Not found: {message}"),
            Self::Conflict { message, .. } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// Every rule violation the domain can report maps to `InvalidInput`; only
/// monetary overflow is an internal fault.
#[must_use]
pub fn translate_domain_error(err: &DomainError) -> ApiError {
    match err {
        DomainError::InvalidDateRange { .. } => ApiError::InvalidInput {
            field: String::from("check_out"),
            message: err.to_string(),
        },
        DomainError::InvalidStayLength { .. } => ApiError::InvalidInput {
            field: String::from("nights"),
            message: err.to_string(),
        },
        DomainError::PartySizeOutOfBounds { .. } => ApiError::InvalidInput {
            field: String::from("party_size"),
            message: err.to_string(),
        },
        DomainError::OutsideServingWindow { .. } => ApiError::InvalidInput {
            field: String::from("time"),
            message: err.to_string(),
        },
        DomainError::InvalidCancellationPolicy(_) => ApiError::InvalidInput {
            field: String::from("policy"),
            message: err.to_string(),
        },
        DomainError::CabinBookingNotCancellable(_)
        | DomainError::DiningReservationNotCancellable(_)
        | DomainError::ExperienceBookingNotCancellable(_)
        | DomainError::InvalidStatusTransition { .. }
        | DomainError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::MoneyOverflow { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Range and capacity rejections become `Conflict`; missing records become
/// `ResourceNotFound`; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound { message },
        PersistenceError::RangeConflict {
            cabin_id,
            conflicting,
        } => ApiError::Conflict {
            message: format!("Cabin {cabin_id} is already booked for the requested dates"),
            conflicting_ids: conflicting,
            remaining: None,
        },
        PersistenceError::CapacityExceeded {
            resource_id,
            requested,
            remaining,
        } => ApiError::Conflict {
            message: format!(
                "Resource {resource_id} cannot take {requested} more guests ({remaining} remaining)"
            ),
            conflicting_ids: vec![],
            remaining: Some(remaining),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
