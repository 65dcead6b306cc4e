// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Owner-gated reservation modification tests.

use crate::error::ApiError;
use crate::notify::NoopNotifier;
use crate::request_response::{
    UpdateCabinBookingRequest, UpdateDiningReservationRequest, UpdateExperienceBookingRequest,
};
use crate::tests::{
    add_cabin, add_dining_item, add_experience, cabin_request, dining_request, experience_request,
    test_db,
};
use lodge_domain::{CustomerId, ExtrasSelection, Money, Settings};
use lodge_persistence::Persistence;
use time::macros::{date, time};

fn booked_cabin(db: &mut Persistence) -> (i64, i64) {
    let cabin_id = add_cabin(db);
    let booking = crate::create_cabin_booking(
        db,
        &Settings::default(),
        &NoopNotifier,
        cabin_id,
        cabin_request(
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
            2,
            ExtrasSelection::default(),
        ),
    )
    .unwrap();
    (cabin_id, booking.booking_id.unwrap())
}

fn unchanged_cabin_update(customer: &str) -> UpdateCabinBookingRequest {
    UpdateCabinBookingRequest {
        customer_id: CustomerId::new(customer),
        check_in: None,
        check_out: None,
        num_guests: None,
        special_requests: None,
    }
}

#[test]
fn test_only_the_owner_may_modify() {
    let mut db = test_db();
    let (_, booking_id) = booked_cabin(&mut db);

    let result = crate::update_cabin_booking(
        &mut db,
        &Settings::default(),
        booking_id,
        unchanged_cabin_update("cust-2"),
    );
    match result {
        Err(ApiError::NotOwner { .. }) => {}
        other => panic!("expected NotOwner, got {other:?}"),
    }
}

#[test]
fn test_modification_is_closed_after_check_in() {
    let mut db = test_db();
    let (_, booking_id) = booked_cabin(&mut db);
    crate::confirm_cabin_booking(&mut db, booking_id).unwrap();
    crate::check_in_cabin_booking(&mut db, booking_id).unwrap();

    let result = crate::update_cabin_booking(
        &mut db,
        &Settings::default(),
        booking_id,
        UpdateCabinBookingRequest {
            num_guests: Some(3),
            ..unchanged_cabin_update("cust-1")
        },
    );
    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "status"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_cabin_update_keeps_the_original_quote() {
    let mut db = test_db();
    let (_, booking_id) = booked_cabin(&mut db);

    let updated = crate::update_cabin_booking(
        &mut db,
        &Settings::default(),
        booking_id,
        UpdateCabinBookingRequest {
            num_guests: Some(3),
            special_requests: Some(vec![String::from("extra towels")]),
            ..unchanged_cabin_update("cust-1")
        },
    )
    .unwrap();

    assert_eq!(updated.num_guests, 3);
    assert_eq!(updated.special_requests, vec![String::from("extra towels")]);
    // The quote struck at booking time stands
    assert_eq!(updated.total_price, Money::from_units(480));
}

#[test]
fn test_cabin_reschedule_into_taken_range_is_a_conflict() {
    let mut db = test_db();
    let (cabin_id, booking_id) = booked_cabin(&mut db);
    crate::create_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        cabin_id,
        cabin_request(
            "cust-2",
            date!(2026 - 02 - 20),
            date!(2026 - 02 - 24),
            2,
            ExtrasSelection::default(),
        ),
    )
    .unwrap();

    let result = crate::update_cabin_booking(
        &mut db,
        &Settings::default(),
        booking_id,
        UpdateCabinBookingRequest {
            check_in: Some(date!(2026 - 02 - 19)),
            check_out: Some(date!(2026 - 02 - 22)),
            ..unchanged_cabin_update("cust-1")
        },
    );
    match result {
        Err(ApiError::Conflict { .. }) => {}
        other => panic!("expected Conflict, got {other:?}"),
    }

    // The rolled-back reschedule leaves the original dates
    let stored = crate::get_cabin_booking(&mut db, booking_id).unwrap();
    assert_eq!(stored.check_in, date!(2026 - 02 - 10));
}

#[test]
fn test_dining_update_reprices_the_party() {
    let mut db = test_db();
    let item_id = add_dining_item(&mut db);
    let reservation = crate::create_dining_reservation(
        &mut db,
        &NoopNotifier,
        item_id,
        dining_request("cust-1", date!(2026 - 03 - 01), time!(18:00:00), 2),
    )
    .unwrap();

    let updated = crate::update_dining_reservation(
        &mut db,
        reservation.reservation_id.unwrap(),
        UpdateDiningReservationRequest {
            customer_id: CustomerId::new("cust-1"),
            date: None,
            time: None,
            num_guests: Some(4),
            special_requests: None,
        },
    )
    .unwrap();

    assert_eq!(updated.num_guests, 4);
    assert_eq!(updated.total_price, Money::from_units(180));
}

#[test]
fn test_dining_update_outside_window_is_rejected() {
    let mut db = test_db();
    let item_id = add_dining_item(&mut db);
    let reservation = crate::create_dining_reservation(
        &mut db,
        &NoopNotifier,
        item_id,
        dining_request("cust-1", date!(2026 - 03 - 01), time!(18:00:00), 2),
    )
    .unwrap();

    let result = crate::update_dining_reservation(
        &mut db,
        reservation.reservation_id.unwrap(),
        UpdateDiningReservationRequest {
            customer_id: CustomerId::new("cust-1"),
            date: None,
            time: Some(time!(22:00:00)),
            num_guests: None,
            special_requests: None,
        },
    );
    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "time"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_experience_update_reprices_and_guards_capacity() {
    let mut db = test_db();
    let experience_id = add_experience(&mut db, Some(8));
    crate::create_experience_booking(
        &mut db,
        &NoopNotifier,
        experience_id,
        experience_request("cust-1", date!(2026 - 03 - 05), 5),
    )
    .unwrap();
    let booking = crate::create_experience_booking(
        &mut db,
        &NoopNotifier,
        experience_id,
        experience_request("cust-2", date!(2026 - 03 - 05), 3),
    )
    .unwrap();
    let booking_id = booking.booking_id.unwrap();

    // Growing to 4 would put the day at 9 of 8
    let result = crate::update_experience_booking(
        &mut db,
        booking_id,
        UpdateExperienceBookingRequest {
            customer_id: CustomerId::new("cust-2"),
            date: None,
            num_participants: Some(4),
            special_requests: None,
        },
    );
    match result {
        Err(ApiError::Conflict { remaining, .. }) => assert_eq!(remaining, Some(3)),
        other => panic!("expected Conflict, got {other:?}"),
    }

    // Moving to a fresh day makes room, and the total follows the headcount
    let moved = crate::update_experience_booking(
        &mut db,
        booking_id,
        UpdateExperienceBookingRequest {
            customer_id: CustomerId::new("cust-2"),
            date: Some(date!(2026 - 03 - 06)),
            num_participants: Some(4),
            special_requests: None,
        },
    )
    .unwrap();
    assert_eq!(moved.date, date!(2026 - 03 - 06));
    assert_eq!(moved.total_price, Money::from_units(240));
}
