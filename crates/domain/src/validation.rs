// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Standalone validator functions.
//!
//! Field-level rules live here rather than alongside the storage schema so
//! they can run before any write, independent of the storage layer. All
//! functions are pure and deterministic.

use crate::error::DomainError;
use crate::resource::{DiningItem, Experience};
use time::{Date, Time};

/// Validates a cabin date range.
///
/// # Errors
///
/// Returns an error if `check_out` is not strictly after `check_in`.
pub fn validate_cabin_dates(check_in: Date, check_out: Date) -> Result<(), DomainError> {
    if check_out <= check_in {
        return Err(DomainError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    Ok(())
}

/// Validates a dining party size against the item's bounds.
///
/// # Errors
///
/// Returns an error if the size is outside `[min_people, max_people]`.
pub fn validate_dining_party_size(item: &DiningItem, num_guests: u32) -> Result<(), DomainError> {
    if num_guests < item.min_people || num_guests > item.max_people {
        return Err(DomainError::PartySizeOutOfBounds {
            party_size: num_guests,
            min: item.min_people,
            max: item.max_people,
        });
    }
    Ok(())
}

/// Validates an experience party size.
///
/// The lower bound is always 1; the upper bound is the capacity limit when
/// the experience is bounded (a single party can never exceed the day's
/// total capacity).
///
/// # Errors
///
/// Returns an error if the size is zero or above the capacity bound.
pub fn validate_experience_party_size(
    experience: &Experience,
    num_participants: u32,
) -> Result<(), DomainError> {
    let max: u32 = experience.max_participants.unwrap_or(u32::MAX);
    if num_participants == 0 || num_participants > max {
        return Err(DomainError::PartySizeOutOfBounds {
            party_size: num_participants,
            min: 1,
            max,
        });
    }
    Ok(())
}

/// Validates a requested time against a dining item's serving window.
///
/// The window is half-open: a request at `serving_end` exactly is outside
/// it. This check runs before any capacity work.
///
/// # Errors
///
/// Returns an error if the time falls outside `[serving_start, serving_end)`.
pub fn validate_serving_time(item: &DiningItem, requested: Time) -> Result<(), DomainError> {
    if requested < item.serving_start || requested >= item.serving_end {
        return Err(DomainError::OutsideServingWindow {
            requested,
            start: item.serving_start,
            end: item.serving_end,
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::money::Money;
    use time::macros::{date, time};

    fn make_item() -> DiningItem {
        DiningItem::new(
            String::from("Supper Club"),
            Money::from_units(45),
            2,
            12,
            time!(17:00),
            time!(21:00),
        )
    }

    #[test]
    fn test_cabin_dates_must_be_ordered() {
        assert!(validate_cabin_dates(date!(2026 - 02 - 10), date!(2026 - 02 - 12)).is_ok());
        assert!(validate_cabin_dates(date!(2026 - 02 - 10), date!(2026 - 02 - 10)).is_err());
        assert!(validate_cabin_dates(date!(2026 - 02 - 12), date!(2026 - 02 - 10)).is_err());
    }

    #[test]
    fn test_dining_party_size_bounds() {
        let item: DiningItem = make_item();
        assert!(validate_dining_party_size(&item, 2).is_ok());
        assert!(validate_dining_party_size(&item, 12).is_ok());
        assert!(validate_dining_party_size(&item, 1).is_err());
        assert!(validate_dining_party_size(&item, 13).is_err());
    }

    #[test]
    fn test_serving_window_is_half_open() {
        let item: DiningItem = make_item();
        assert!(validate_serving_time(&item, time!(17:00)).is_ok());
        assert!(validate_serving_time(&item, time!(20:59)).is_ok());
        assert!(validate_serving_time(&item, time!(21:00)).is_err());
        assert!(validate_serving_time(&item, time!(16:30)).is_err());
    }

    #[test]
    fn test_unbounded_experience_accepts_any_positive_party() {
        let experience: Experience =
            Experience::new(String::from("Night Hike"), Money::from_units(30), None);
        assert!(validate_experience_party_size(&experience, 250).is_ok());
        assert!(validate_experience_party_size(&experience, 0).is_err());
    }

    #[test]
    fn test_bounded_experience_rejects_oversized_party() {
        let experience: Experience =
            Experience::new(String::from("Canoe Tour"), Money::from_units(30), Some(8));
        assert!(validate_experience_party_size(&experience, 8).is_ok());
        assert!(validate_experience_party_size(&experience, 9).is_err());
    }
}
