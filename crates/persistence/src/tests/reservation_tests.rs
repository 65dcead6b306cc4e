// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation round-trip, history, lifecycle, and reschedule tests.

use crate::tests::{
    test_cabin, test_cabin_booking, test_dining_item, test_dining_reservation,
};
use crate::{Persistence, PersistenceError};
use lodge_domain::{CabinBookingStatus, DiningReservationStatus, Money};
use time::macros::{date, time};

#[test]
fn test_cabin_booking_round_trip() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();

    let mut booking =
        test_cabin_booking(cabin_id, "cust-1", date!(2026 - 02 - 10), date!(2026 - 02 - 14));
    booking.special_requests = vec![String::from("late arrival"), String::from("crib")];
    let booking_id = db.reserve_cabin_range(&booking).unwrap();

    let stored = db.get_cabin_booking(booking_id).unwrap();
    assert_eq!(stored.booking_id, Some(booking_id));
    assert_eq!(stored.cabin_id, cabin_id);
    assert_eq!(stored.customer_id.value(), "cust-1");
    assert_eq!(stored.check_in, date!(2026 - 02 - 10));
    assert_eq!(stored.check_out, date!(2026 - 02 - 14));
    assert_eq!(stored.nights(), 4);
    assert_eq!(stored.total_price, Money::from_units(240));
    assert_eq!(stored.status, CabinBookingStatus::Unconfirmed);
    assert_eq!(
        stored.special_requests,
        vec![String::from("late arrival"), String::from("crib")]
    );
}

#[test]
fn test_get_missing_booking_is_not_found() {
    let mut db = Persistence::new_in_memory().unwrap();
    match db.get_cabin_booking(999) {
        Err(PersistenceError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_customer_history_with_status_filter() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();

    let first = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
        ))
        .unwrap();
    let second = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 03 - 10),
            date!(2026 - 03 - 14),
        ))
        .unwrap();
    db.reserve_cabin_range(&test_cabin_booking(
        cabin_id,
        "cust-2",
        date!(2026 - 04 - 10),
        date!(2026 - 04 - 14),
    ))
    .unwrap();

    db.set_cabin_booking_status(first, CabinBookingStatus::Cancelled.as_str())
        .unwrap();

    let all = db.list_cabin_bookings_for_customer("cust-1", None).unwrap();
    assert_eq!(all.len(), 2);
    // Newest first
    assert_eq!(all[0].booking_id, Some(second));

    let cancelled = db
        .list_cabin_bookings_for_customer("cust-1", Some("cancelled"))
        .unwrap();
    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].booking_id, Some(first));
}

#[test]
fn test_status_update_persists() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();
    let booking_id = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
        ))
        .unwrap();

    db.set_cabin_booking_status(booking_id, CabinBookingStatus::Confirmed.as_str())
        .unwrap();
    assert_eq!(
        db.get_cabin_booking(booking_id).unwrap().status,
        CabinBookingStatus::Confirmed
    );

    match db.set_cabin_booking_status(999, "confirmed") {
        Err(PersistenceError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_payment_flags_persist() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();
    let booking_id = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
        ))
        .unwrap();

    db.set_cabin_booking_payment(booking_id, false, true).unwrap();
    let stored = db.get_cabin_booking(booking_id).unwrap();
    assert!(!stored.is_paid);
    assert!(stored.deposit_paid);

    db.set_cabin_booking_payment(booking_id, true, false).unwrap();
    let stored = db.get_cabin_booking(booking_id).unwrap();
    assert!(stored.is_paid);
    assert!(!stored.deposit_paid);
}

#[test]
fn test_reschedule_to_free_range_succeeds() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();
    let booking_id = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
        ))
        .unwrap();

    let mut updated = db.get_cabin_booking(booking_id).unwrap();
    updated.check_in = date!(2026 - 02 - 11);
    updated.check_out = date!(2026 - 02 - 15);
    db.update_cabin_booking(&updated).unwrap();

    let stored = db.get_cabin_booking(booking_id).unwrap();
    assert_eq!(stored.check_in, date!(2026 - 02 - 11));
    assert_eq!(stored.check_out, date!(2026 - 02 - 15));
}

#[test]
fn test_reschedule_overlapping_itself_is_allowed() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();
    let booking_id = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
        ))
        .unwrap();

    // Extending the stay overlaps the booking's own old range; the guard
    // excludes the booking from its own scan.
    let mut updated = db.get_cabin_booking(booking_id).unwrap();
    updated.check_out = date!(2026 - 02 - 16);
    db.update_cabin_booking(&updated).unwrap();
}

#[test]
fn test_conflicting_reschedule_rolls_back() {
    let mut db = Persistence::new_in_memory().unwrap();
    let cabin_id = db.create_cabin(&test_cabin()).unwrap();
    let booking_id = db
        .reserve_cabin_range(&test_cabin_booking(
            cabin_id,
            "cust-1",
            date!(2026 - 02 - 10),
            date!(2026 - 02 - 14),
        ))
        .unwrap();
    db.reserve_cabin_range(&test_cabin_booking(
        cabin_id,
        "cust-2",
        date!(2026 - 02 - 20),
        date!(2026 - 02 - 24),
    ))
    .unwrap();

    let mut updated = db.get_cabin_booking(booking_id).unwrap();
    updated.check_in = date!(2026 - 02 - 19);
    updated.check_out = date!(2026 - 02 - 22);
    match db.update_cabin_booking(&updated) {
        Err(PersistenceError::RangeConflict { .. }) => {}
        other => panic!("expected RangeConflict, got {other:?}"),
    }

    // Original dates survive the rollback
    let stored = db.get_cabin_booking(booking_id).unwrap();
    assert_eq!(stored.check_in, date!(2026 - 02 - 10));
    assert_eq!(stored.check_out, date!(2026 - 02 - 14));
}

#[test]
fn test_dining_party_size_reschedule_rechecks_capacity() {
    let mut db = Persistence::new_in_memory().unwrap();
    let item_id = db.create_dining_item(&test_dining_item()).unwrap();

    let reservation_id = db
        .reserve_dining_seats(
            &test_dining_reservation(item_id, "cust-1", date!(2026 - 03 - 01), time!(18:00:00), 4),
            10,
        )
        .unwrap();
    db.reserve_dining_seats(
        &test_dining_reservation(item_id, "cust-2", date!(2026 - 03 - 01), time!(18:00:00), 5),
        10,
    )
    .unwrap();

    // Growing to 6 would put the slot at 11 of 10
    let mut updated = db.get_dining_reservation(reservation_id).unwrap();
    updated.num_guests = 6;
    match db.update_dining_reservation(&updated, 10) {
        Err(PersistenceError::CapacityExceeded { remaining, .. }) => {
            assert_eq!(remaining, 5);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    assert_eq!(
        db.get_dining_reservation(reservation_id).unwrap().num_guests,
        4
    );

    // Growing to 5 exactly fills the slot
    updated.num_guests = 5;
    updated.total_price = Money::from_units(45).times(5);
    db.update_dining_reservation(&updated, 10).unwrap();
    assert_eq!(
        db.get_dining_reservation(reservation_id).unwrap().num_guests,
        5
    );

    db.set_dining_reservation_status(reservation_id, DiningReservationStatus::Confirmed.as_str())
        .unwrap();
    assert_eq!(
        db.get_dining_reservation(reservation_id).unwrap().status,
        DiningReservationStatus::Confirmed
    );
}
