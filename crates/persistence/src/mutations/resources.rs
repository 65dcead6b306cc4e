// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resource registration writes.

use crate::data_models::{NewCabin, NewDiningItem, NewExperience, format_time};
use crate::diesel_schema::{cabins, dining_items, experiences};
use crate::error::PersistenceError;
use crate::sqlite;
use diesel::prelude::*;
use lodge_domain::{Cabin, DiningItem, Experience};
use tracing::info;

/// Inserts a cabin and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_cabin(conn: &mut SqliteConnection, cabin: &Cabin) -> Result<i64, PersistenceError> {
    let row: NewCabin = NewCabin {
        name: cabin.name.clone(),
        price_per_night_cents: cabin.price_per_night.cents(),
        discount_cents: cabin.discount.map(|d| d.cents()),
        max_capacity: i32::try_from(cabin.max_capacity)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
    };
    diesel::insert_into(cabins::table).values(&row).execute(conn)?;
    let cabin_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(cabin_id, name = %cabin.name, "Created cabin");
    Ok(cabin_id)
}

/// Inserts a dining item and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_dining_item(
    conn: &mut SqliteConnection,
    item: &DiningItem,
) -> Result<i64, PersistenceError> {
    let row: NewDiningItem = NewDiningItem {
        name: item.name.clone(),
        price_per_person_cents: item.price_per_person.cents(),
        min_people: i32::try_from(item.min_people)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
        max_people: i32::try_from(item.max_people)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
        serving_start: format_time(item.serving_start)?,
        serving_end: format_time(item.serving_end)?,
    };
    diesel::insert_into(dining_items::table)
        .values(&row)
        .execute(conn)?;
    let dining_item_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(dining_item_id, name = %item.name, "Created dining item");
    Ok(dining_item_id)
}

/// Inserts an experience and returns its assigned ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_experience(
    conn: &mut SqliteConnection,
    experience: &Experience,
) -> Result<i64, PersistenceError> {
    let max_participants: Option<i32> = match experience.max_participants {
        Some(value) => Some(
            i32::try_from(value)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
        ),
        None => None,
    };
    let row: NewExperience = NewExperience {
        name: experience.name.clone(),
        price_per_person_cents: experience.price_per_person.cents(),
        max_participants,
    };
    diesel::insert_into(experiences::table)
        .values(&row)
        .execute(conn)?;
    let experience_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(experience_id, name = %experience.name, "Created experience");
    Ok(experience_id)
}
