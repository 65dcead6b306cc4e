// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment signal tests.

use crate::error::ApiError;
use crate::notify::NoopNotifier;
use crate::request_response::{PaymentSignal, PaymentSignalRequest, ReservationKind};
use crate::tests::{
    add_cabin, add_dining_item, add_experience, cabin_request, dining_request, experience_request,
    test_db,
};
use lodge_domain::{
    CabinBookingStatus, DiningReservationStatus, ExperienceBookingStatus, ExtrasSelection, Settings,
};
use lodge_persistence::Persistence;
use time::macros::{date, time};

fn signal(kind: ReservationKind, reservation_id: i64, signal: PaymentSignal) -> PaymentSignalRequest {
    PaymentSignalRequest {
        kind,
        reservation_id,
        signal,
    }
}

fn booked_cabin(db: &mut Persistence) -> i64 {
    let cabin_id = add_cabin(db);
    crate::create_cabin_booking(
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
    .unwrap()
    .booking_id
    .unwrap()
}

#[test]
fn test_full_payment_confirms_an_unconfirmed_cabin() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);

    crate::apply_payment_signal(
        &mut db,
        &signal(ReservationKind::Cabin, booking_id, PaymentSignal::Paid),
    )
    .unwrap();

    let stored = crate::get_cabin_booking(&mut db, booking_id).unwrap();
    assert!(stored.is_paid);
    assert_eq!(stored.status, CabinBookingStatus::Confirmed);
}

#[test]
fn test_deposit_sets_the_flag_and_confirms() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);

    crate::apply_payment_signal(
        &mut db,
        &signal(ReservationKind::Cabin, booking_id, PaymentSignal::DepositPaid),
    )
    .unwrap();

    let stored = crate::get_cabin_booking(&mut db, booking_id).unwrap();
    assert!(!stored.is_paid);
    assert!(stored.deposit_paid);
    assert_eq!(stored.status, CabinBookingStatus::Confirmed);
}

#[test]
fn test_deposit_signal_is_cabin_only() {
    let mut db = test_db();
    let item_id = add_dining_item(&mut db);
    let reservation = crate::create_dining_reservation(
        &mut db,
        &NoopNotifier,
        item_id,
        dining_request("cust-1", date!(2026 - 03 - 01), time!(18:00:00), 2),
    )
    .unwrap();

    let result = crate::apply_payment_signal(
        &mut db,
        &signal(
            ReservationKind::Dining,
            reservation.reservation_id.unwrap(),
            PaymentSignal::DepositPaid,
        ),
    );
    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "signal"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_refund_clears_the_flags_and_keeps_the_status() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    crate::apply_payment_signal(
        &mut db,
        &signal(ReservationKind::Cabin, booking_id, PaymentSignal::Paid),
    )
    .unwrap();

    crate::apply_payment_signal(
        &mut db,
        &signal(ReservationKind::Cabin, booking_id, PaymentSignal::Refunded),
    )
    .unwrap();

    let stored = crate::get_cabin_booking(&mut db, booking_id).unwrap();
    assert!(!stored.is_paid);
    assert!(!stored.deposit_paid);
    assert_eq!(stored.status, CabinBookingStatus::Confirmed);
}

#[test]
fn test_payment_confirms_a_pending_dining_reservation() {
    let mut db = test_db();
    let item_id = add_dining_item(&mut db);
    let reservation = crate::create_dining_reservation(
        &mut db,
        &NoopNotifier,
        item_id,
        dining_request("cust-1", date!(2026 - 03 - 01), time!(18:00:00), 2),
    )
    .unwrap();
    let reservation_id = reservation.reservation_id.unwrap();

    crate::apply_payment_signal(
        &mut db,
        &signal(ReservationKind::Dining, reservation_id, PaymentSignal::Paid),
    )
    .unwrap();

    let stored = crate::get_dining_reservation(&mut db, reservation_id).unwrap();
    assert!(stored.is_paid);
    assert_eq!(stored.status, DiningReservationStatus::Confirmed);
}

#[test]
fn test_payment_confirms_a_pending_experience_booking() {
    let mut db = test_db();
    let experience_id = add_experience(&mut db, Some(8));
    let booking = crate::create_experience_booking(
        &mut db,
        &NoopNotifier,
        experience_id,
        experience_request("cust-1", date!(2026 - 03 - 05), 3),
    )
    .unwrap();
    let booking_id = booking.booking_id.unwrap();

    crate::apply_payment_signal(
        &mut db,
        &signal(
            ReservationKind::Experience,
            booking_id,
            PaymentSignal::Paid,
        ),
    )
    .unwrap();

    let stored = crate::get_experience_booking(&mut db, booking_id).unwrap();
    assert!(stored.is_paid);
    assert_eq!(stored.status, ExperienceBookingStatus::Confirmed);
}

#[test]
fn test_signal_for_missing_reservation_is_not_found() {
    let mut db = test_db();
    let result = crate::apply_payment_signal(
        &mut db,
        &signal(ReservationKind::Cabin, 999, PaymentSignal::Paid),
    );
    match result {
        Err(ApiError::ResourceNotFound { .. }) => {}
        other => panic!("expected ResourceNotFound, got {other:?}"),
    }
}
