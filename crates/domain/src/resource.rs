// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservable resources.
//!
//! A cabin is exclusively held over a date range; dining items and
//! experiences are shared-capacity resources bounded by a headcount.

use crate::money::Money;
use serde::{Deserialize, Serialize};
use time::Time;

/// An exclusively-held cabin.
///
/// At most one non-cancelled booking may cover any given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabin {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the cabin has not been persisted yet.
    pub cabin_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Nightly price before discount.
    pub price_per_night: Money,
    /// Optional nightly discount, floored at a free night.
    pub discount: Option<Money>,
    /// Maximum number of guests.
    pub max_capacity: u32,
}

impl Cabin {
    /// Creates a new `Cabin` without a persisted ID.
    #[must_use]
    pub const fn new(
        name: String,
        price_per_night: Money,
        discount: Option<Money>,
        max_capacity: u32,
    ) -> Self {
        Self {
            cabin_id: None,
            name,
            price_per_night,
            discount,
            max_capacity,
        }
    }

    /// Creates a `Cabin` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        cabin_id: i64,
        name: String,
        price_per_night: Money,
        discount: Option<Money>,
        max_capacity: u32,
    ) -> Self {
        Self {
            cabin_id: Some(cabin_id),
            name,
            price_per_night,
            discount,
            max_capacity,
        }
    }

    /// Returns the nightly price with the discount applied.
    ///
    /// A discount larger than the price yields a zero effective price,
    /// never a negative one.
    #[must_use]
    pub fn effective_price(&self) -> Money {
        match self.discount {
            Some(discount) => self.price_per_night.saturating_sub_floor_zero(discount),
            None => self.price_per_night,
        }
    }
}

/// A shared-capacity dining slot offering.
///
/// Reservations for the same `(date, time)` slot share `max_people` seats.
/// The serving window `[serving_start, serving_end)` bounds the times a
/// party may book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiningItem {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the item has not been persisted yet.
    pub dining_item_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Price per person.
    pub price_per_person: Money,
    /// Minimum party size.
    pub min_people: u32,
    /// Maximum aggregate headcount per `(date, time)` slot.
    pub max_people: u32,
    /// Start of the serving window (inclusive).
    pub serving_start: Time,
    /// End of the serving window (exclusive).
    pub serving_end: Time,
}

impl DiningItem {
    /// Creates a new `DiningItem` without a persisted ID.
    #[must_use]
    pub const fn new(
        name: String,
        price_per_person: Money,
        min_people: u32,
        max_people: u32,
        serving_start: Time,
        serving_end: Time,
    ) -> Self {
        Self {
            dining_item_id: None,
            name,
            price_per_person,
            min_people,
            max_people,
            serving_start,
            serving_end,
        }
    }

    /// Creates a `DiningItem` with an existing persisted ID.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn with_id(
        dining_item_id: i64,
        name: String,
        price_per_person: Money,
        min_people: u32,
        max_people: u32,
        serving_start: Time,
        serving_end: Time,
    ) -> Self {
        Self {
            dining_item_id: Some(dining_item_id),
            name,
            price_per_person,
            min_people,
            max_people,
            serving_start,
            serving_end,
        }
    }
}

/// A shared-capacity experience session.
///
/// Capacity is scoped to a whole day. `max_participants` of `None` means
/// the experience is unbounded and the ledger never rejects on capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    /// Canonical identifier assigned by the database.
    /// `None` indicates the experience has not been persisted yet.
    pub experience_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Price per participant.
    pub price_per_person: Money,
    /// Optional maximum aggregate participants per day.
    pub max_participants: Option<u32>,
}

impl Experience {
    /// Creates a new `Experience` without a persisted ID.
    #[must_use]
    pub const fn new(
        name: String,
        price_per_person: Money,
        max_participants: Option<u32>,
    ) -> Self {
        Self {
            experience_id: None,
            name,
            price_per_person,
            max_participants,
        }
    }

    /// Creates an `Experience` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        experience_id: i64,
        name: String,
        price_per_person: Money,
        max_participants: Option<u32>,
    ) -> Self {
        Self {
            experience_id: Some(experience_id),
            name,
            price_per_person,
            max_participants,
        }
    }
}
