// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Process-wide configuration snapshot.
//!
//! `Settings` is read once at startup and never mutated by the reservation
//! core. Pricing and the refund engine take it by reference.

use crate::error::DomainError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The active cancellation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CancellationPolicy {
    /// Full refund up to 1 day before check-in.
    Flexible,
    /// Full refund 5+ days out, 50% within 2-5 days, nothing inside 2 days.
    #[default]
    Moderate,
    /// 50% refund 7+ days out, nothing inside 7 days.
    Strict,
}

impl CancellationPolicy {
    /// Converts this policy to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flexible => "flexible",
            Self::Moderate => "moderate",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for CancellationPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flexible" => Ok(Self::Flexible),
            "moderate" => Ok(Self::Moderate),
            "strict" => Ok(Self::Strict),
            _ => Err(DomainError::InvalidCancellationPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for CancellationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-extra fee schedule for cabin stays.
///
/// All fees are expressed in cents. Flat fees (early check-in, late
/// check-out) are charged once per stay regardless of length; breakfast
/// scales by party size and nights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Flat fee for bringing a pet, charged once per stay.
    pub pet_fee: Money,
    /// Flat fee for a parking spot, charged once per stay.
    pub parking_fee: Money,
    /// Flat fee for early check-in.
    pub early_check_in_fee: Money,
    /// Flat fee for late check-out.
    pub late_check_out_fee: Money,
    /// Breakfast fee per person per night.
    pub breakfast_per_person_per_night: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            pet_fee: Money::from_units(25),
            parking_fee: Money::from_units(10),
            early_check_in_fee: Money::from_units(30),
            late_check_out_fee: Money::from_units(30),
            breakfast_per_person_per_night: Money::from_units(15),
        }
    }
}

/// One process-wide configuration snapshot.
///
/// Deserializable from a JSON settings file; `Settings::default()` supplies
/// working values when no file is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Minimum cabin stay length in nights.
    pub min_nights: u32,
    /// Maximum cabin stay length in nights.
    pub max_nights: u32,
    /// Per-extra fee schedule.
    pub fees: FeeSchedule,
    /// Whether pets are allowed at all. When false, the pet fee is never
    /// charged and the extra is ignored.
    pub pets_allowed: bool,
    /// Whether parking is already included in the nightly price. When true,
    /// the parking fee is never charged.
    pub parking_included: bool,
    /// Whether a deposit is required at booking time.
    pub deposit_required: bool,
    /// Deposit percentage of the total price (0-100).
    pub deposit_percentage: u8,
    /// The active cancellation policy.
    pub cancellation_policy: CancellationPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_nights: 1,
            max_nights: 28,
            fees: FeeSchedule::default(),
            pets_allowed: true,
            parking_included: false,
            deposit_required: true,
            deposit_percentage: 30,
            cancellation_policy: CancellationPolicy::Moderate,
        }
    }
}
