// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lookup queries for reservable resources.

use crate::data_models::{CabinRow, DiningItemRow, ExperienceRow};
use crate::diesel_schema::{cabins, dining_items, experiences};
use crate::error::PersistenceError;
use diesel::prelude::*;
use lodge_domain::{Cabin, DiningItem, Experience};

/// Retrieves a cabin by ID.
///
/// # Errors
///
/// Returns `NotFound` if no cabin with this ID exists.
pub fn get_cabin(conn: &mut SqliteConnection, cabin_id: i64) -> Result<Cabin, PersistenceError> {
    let row: Option<CabinRow> = cabins::table
        .filter(cabins::cabin_id.eq(cabin_id))
        .first(conn)
        .optional()?;
    row.ok_or_else(|| PersistenceError::NotFound(format!("Cabin {cabin_id} not found")))?
        .into_domain()
}

/// Lists all cabins ordered by ID.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_cabins(conn: &mut SqliteConnection) -> Result<Vec<Cabin>, PersistenceError> {
    let rows: Vec<CabinRow> = cabins::table.order(cabins::cabin_id.asc()).load(conn)?;
    rows.into_iter().map(CabinRow::into_domain).collect()
}

/// Retrieves a dining item by ID.
///
/// # Errors
///
/// Returns `NotFound` if no dining item with this ID exists.
pub fn get_dining_item(
    conn: &mut SqliteConnection,
    dining_item_id: i64,
) -> Result<DiningItem, PersistenceError> {
    let row: Option<DiningItemRow> = dining_items::table
        .filter(dining_items::dining_item_id.eq(dining_item_id))
        .first(conn)
        .optional()?;
    row.ok_or_else(|| {
        PersistenceError::NotFound(format!("Dining item {dining_item_id} not found"))
    })?
    .into_domain()
}

/// Lists all dining items ordered by ID.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_dining_items(conn: &mut SqliteConnection) -> Result<Vec<DiningItem>, PersistenceError> {
    let rows: Vec<DiningItemRow> = dining_items::table
        .order(dining_items::dining_item_id.asc())
        .load(conn)?;
    rows.into_iter().map(DiningItemRow::into_domain).collect()
}

/// Retrieves an experience by ID.
///
/// # Errors
///
/// Returns `NotFound` if no experience with this ID exists.
pub fn get_experience(
    conn: &mut SqliteConnection,
    experience_id: i64,
) -> Result<Experience, PersistenceError> {
    let row: Option<ExperienceRow> = experiences::table
        .filter(experiences::experience_id.eq(experience_id))
        .first(conn)
        .optional()?;
    row.ok_or_else(|| {
        PersistenceError::NotFound(format!("Experience {experience_id} not found"))
    })?
    .into_domain()
}

/// Lists all experiences ordered by ID.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_experiences(conn: &mut SqliteConnection) -> Result<Vec<Experience>, PersistenceError> {
    let rows: Vec<ExperienceRow> = experiences::table
        .order(experiences::experience_id.asc())
        .load(conn)?;
    rows.into_iter().map(ExperienceRow::into_domain).collect()
}
