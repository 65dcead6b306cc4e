// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pricing derivation.
//!
//! Pure functions deriving nightly and per-person totals, extras, and
//! deposit amounts from a resource and a settings snapshot. Validation runs
//! before any arithmetic so callers can surface field-level errors without
//! touching the store.

use crate::error::DomainError;
use crate::money::Money;
use crate::resource::Cabin;
use crate::settings::Settings;
use serde::{Deserialize, Serialize};

/// Extras a guest may select for a cabin stay.
///
/// Each selection contributes a fee only if it is policy-eligible: the pet
/// fee requires pets to be globally allowed, the parking fee is skipped when
/// parking is already included in the nightly price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtrasSelection {
    /// Guest is bringing a pet.
    pub pet: bool,
    /// Guest wants a parking spot.
    pub parking: bool,
    /// Guest wants early check-in. Flat fee, charged once.
    pub early_check_in: bool,
    /// Guest wants late check-out. Flat fee, charged once.
    pub late_check_out: bool,
    /// Guest wants breakfast. Scales by party size and nights.
    pub breakfast: bool,
}

/// Derived price breakdown for a cabin stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CabinQuote {
    /// `effective nightly price × nights`.
    pub base_price: Money,
    /// Sum of policy-eligible extras.
    pub extras_price: Money,
    /// `base_price + extras_price`.
    pub total_price: Money,
    /// Deposit due at booking; zero when deposits are not required.
    pub deposit_amount: Money,
}

/// Derives the full price breakdown for a cabin stay.
///
/// `effective_price = price − discount`; `base_price = effective_price ×
/// nights`. Flat extras (early check-in, late check-out, pet, parking) are
/// added once regardless of night count; breakfast scales by
/// `num_guests × nights`. `deposit_amount = round(total ×
/// deposit_percentage / 100)` when deposits are required, else zero; the
/// percentage is clamped to 100 so the deposit never exceeds the total.
///
/// # Errors
///
/// Returns an error if `nights` is outside the configured booking-length
/// bounds or `num_guests` exceeds the cabin's capacity.
pub fn price_cabin_stay(
    cabin: &Cabin,
    nights: i64,
    num_guests: u32,
    extras: ExtrasSelection,
    settings: &Settings,
) -> Result<CabinQuote, DomainError> {
    if nights <= 0 || nights < i64::from(settings.min_nights) || nights > i64::from(settings.max_nights)
    {
        return Err(DomainError::InvalidStayLength {
            nights,
            min_nights: settings.min_nights,
            max_nights: settings.max_nights,
        });
    }
    if num_guests == 0 || num_guests > cabin.max_capacity {
        return Err(DomainError::PartySizeOutOfBounds {
            party_size: num_guests,
            min: 1,
            max: cabin.max_capacity,
        });
    }

    // nights is within u32 bounds after the range check above
    let nights_u32: u32 = u32::try_from(nights).map_err(|_| DomainError::InvalidStayLength {
        nights,
        min_nights: settings.min_nights,
        max_nights: settings.max_nights,
    })?;

    let base_price: Money = cabin.effective_price().times(nights_u32);

    let mut extras_price: Money = Money::ZERO;
    if extras.pet && settings.pets_allowed {
        extras_price = extras_price.saturating_add(settings.fees.pet_fee);
    }
    if extras.parking && !settings.parking_included {
        extras_price = extras_price.saturating_add(settings.fees.parking_fee);
    }
    if extras.early_check_in {
        extras_price = extras_price.saturating_add(settings.fees.early_check_in_fee);
    }
    if extras.late_check_out {
        extras_price = extras_price.saturating_add(settings.fees.late_check_out_fee);
    }
    if extras.breakfast {
        let breakfast: Money = settings
            .fees
            .breakfast_per_person_per_night
            .times(num_guests)
            .times(nights_u32);
        extras_price = extras_price.saturating_add(breakfast);
    }

    let total_price: Money = base_price.saturating_add(extras_price);
    let deposit_amount: Money = if settings.deposit_required {
        // A misconfigured percentage must not push the deposit past the total
        total_price.percentage(settings.deposit_percentage.min(100))
    } else {
        Money::ZERO
    };

    Ok(CabinQuote {
        base_price,
        extras_price,
        total_price,
        deposit_amount,
    })
}

/// Derives the total price for a headcount-priced reservation
/// (dining or experience).
///
/// # Errors
///
/// Returns an error if `party_size` is outside `[min, max]`.
pub fn price_by_headcount(
    price_per_person: Money,
    party_size: u32,
    min: u32,
    max: u32,
) -> Result<Money, DomainError> {
    if party_size < min || party_size > max {
        return Err(DomainError::PartySizeOutOfBounds {
            party_size,
            min,
            max,
        });
    }
    Ok(price_per_person.times(party_size))
}
