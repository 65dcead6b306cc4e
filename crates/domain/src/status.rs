// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation status machines.
//!
//! Each reservation kind carries its own status enumeration. Transitions are
//! checked with `can_transition_to`; cancellation eligibility and occupancy
//! accounting are derived from the current status, never stored separately.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a cabin booking.
///
/// `Unconfirmed → Confirmed → CheckedIn → CheckedOut`, with `Cancelled`
/// reachable from any non-terminal state except `CheckedIn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CabinBookingStatus {
    /// Initial state after creation, before payment confirmation.
    #[default]
    Unconfirmed,
    /// Payment (full or deposit) received.
    Confirmed,
    /// Guest has arrived.
    CheckedIn,
    /// Stay complete. Terminal.
    CheckedOut,
    /// Booking cancelled. Terminal.
    Cancelled,
}

impl CabinBookingStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfirmed => "unconfirmed",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked-in",
            Self::CheckedOut => "checked-out",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Unconfirmed` → `Confirmed`
    /// - `Confirmed` → `CheckedIn`
    /// - `CheckedIn` → `CheckedOut`
    /// - `Unconfirmed`/`Confirmed` → `Cancelled`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unconfirmed, Self::Confirmed)
                | (Self::Confirmed, Self::CheckedIn)
                | (Self::CheckedIn, Self::CheckedOut)
                | (Self::Unconfirmed | Self::Confirmed, Self::Cancelled)
        )
    }

    /// Returns whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// Returns whether a booking in this status may be cancelled.
    ///
    /// Cancellation is disallowed once checked-in.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Unconfirmed | Self::Confirmed)
    }

    /// Returns whether a booking in this status blocks the cabin's dates.
    ///
    /// Only cancelled bookings release their date range.
    #[must_use]
    pub const fn blocks_dates(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Returns whether the whitelisted-field update path is open.
    ///
    /// Modification is allowed only while non-terminal and not checked-in.
    #[must_use]
    pub const fn is_modifiable(&self) -> bool {
        matches!(self, Self::Unconfirmed | Self::Confirmed)
    }
}

impl FromStr for CabinBookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unconfirmed" => Ok(Self::Unconfirmed),
            "confirmed" => Ok(Self::Confirmed),
            "checked-in" => Ok(Self::CheckedIn),
            "checked-out" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for CabinBookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a dining reservation.
///
/// `Pending → Confirmed → Completed`, with `Cancelled` and `NoShow`
/// reachable from non-terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DiningReservationStatus {
    /// Initial state after creation.
    #[default]
    Pending,
    /// Confirmed by payment or staff.
    Confirmed,
    /// Party was served. Terminal.
    Completed,
    /// Reservation cancelled. Terminal.
    Cancelled,
    /// Party did not arrive. Terminal.
    NoShow,
}

impl DiningReservationStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    /// Checks if a transition from this status to another is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled | Self::NoShow)
        )
    }

    /// Returns whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Returns whether a reservation in this status may be cancelled.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns whether this status counts toward slot occupancy.
    ///
    /// Cancelled and no-show parties release their seats.
    #[must_use]
    pub const fn counts_toward_occupancy(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::NoShow)
    }

    /// Returns whether the whitelisted-field update path is open.
    #[must_use]
    pub const fn is_modifiable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl FromStr for DiningReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for DiningReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of an experience booking.
///
/// `Pending → Confirmed → Completed`, with `Cancelled` reachable from
/// non-terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceBookingStatus {
    /// Initial state after creation.
    #[default]
    Pending,
    /// Confirmed by payment or staff.
    Confirmed,
    /// Session delivered. Terminal.
    Completed,
    /// Booking cancelled. Terminal.
    Cancelled,
}

impl ExperienceBookingStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Pending | Self::Confirmed, Self::Cancelled)
        )
    }

    /// Returns whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether a booking in this status may be cancelled.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns whether this status counts toward day occupancy.
    #[must_use]
    pub const fn counts_toward_occupancy(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Returns whether the whitelisted-field update path is open.
    #[must_use]
    pub const fn is_modifiable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl FromStr for ExperienceBookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExperienceBookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
