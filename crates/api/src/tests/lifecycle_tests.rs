// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status transition, cancellation, and refund tests.

use crate::error::ApiError;
use crate::notify::NoopNotifier;
use crate::request_response::{CancelRequest, PaymentSignal, PaymentSignalRequest, ReservationKind};
use crate::tests::{
    RecordingNotifier, add_cabin, add_dining_item, cabin_request, dining_request, test_db,
};
use lodge_domain::{
    CabinBookingStatus, CancellationPolicy, CustomerId, ExtrasSelection, Money, RefundType,
    Settings,
};
use lodge_persistence::Persistence;
use time::macros::{date, time};

const CHECK_IN: time::Date = date!(2026 - 02 - 10);
const CHECK_OUT: time::Date = date!(2026 - 02 - 14);

fn booked_cabin(db: &mut Persistence) -> i64 {
    let cabin_id = add_cabin(db);
    crate::create_cabin_booking(
        db,
        &Settings::default(),
        &NoopNotifier,
        cabin_id,
        cabin_request("cust-1", CHECK_IN, CHECK_OUT, 2, ExtrasSelection::default()),
    )
    .unwrap()
    .booking_id
    .unwrap()
}

fn pay_in_full(db: &mut Persistence, booking_id: i64) {
    crate::apply_payment_signal(
        db,
        &PaymentSignalRequest {
            kind: ReservationKind::Cabin,
            reservation_id: booking_id,
            signal: PaymentSignal::Paid,
        },
    )
    .unwrap();
}

fn cancel_as(customer: &str) -> CancelRequest {
    CancelRequest {
        customer_id: CustomerId::new(customer),
    }
}

#[test]
fn test_cabin_lifecycle_happy_path() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);

    let confirmed = crate::confirm_cabin_booking(&mut db, booking_id).unwrap();
    assert_eq!(confirmed.status, CabinBookingStatus::Confirmed);
    let checked_in = crate::check_in_cabin_booking(&mut db, booking_id).unwrap();
    assert_eq!(checked_in.status, CabinBookingStatus::CheckedIn);
    let checked_out = crate::check_out_cabin_booking(&mut db, booking_id).unwrap();
    assert_eq!(checked_out.status, CabinBookingStatus::CheckedOut);
}

#[test]
fn test_illegal_transition_is_rejected() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);

    // Check-in straight from unconfirmed skips confirmation
    match crate::check_in_cabin_booking(&mut db, booking_id) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "status"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_cancelling_unpaid_booking_refunds_nothing() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);

    let response = crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 01 - 15),
    )
    .unwrap();

    assert_eq!(response.booking.status, CabinBookingStatus::Cancelled);
    assert_eq!(response.refund.refund_type, RefundType::None);
    assert_eq!(response.refund.refund_amount, Money::ZERO);
    assert_eq!(
        response.refund.reason,
        "No payment has been made for this booking"
    );
}

#[test]
fn test_cancelling_paid_booking_well_ahead_refunds_in_full() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    pay_in_full(&mut db, booking_id);

    // Ten days out under the default moderate policy
    let response = crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 01 - 31),
    )
    .unwrap();

    assert_eq!(response.refund.refund_type, RefundType::Full);
    assert_eq!(response.refund.refund_amount, Money::from_units(480));
    assert_eq!(response.refund.policy, CancellationPolicy::Moderate);
}

#[test]
fn test_late_cancellation_refunds_half() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    pay_in_full(&mut db, booking_id);

    // Three days out falls in the moderate 50% tier
    let response = crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 02 - 07),
    )
    .unwrap();

    assert_eq!(response.refund.refund_type, RefundType::Partial);
    assert_eq!(response.refund.refund_amount, Money::from_units(240));
}

#[test]
fn test_deposit_only_cancellation_refunds_the_deposit() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    crate::apply_payment_signal(
        &mut db,
        &PaymentSignalRequest {
            kind: ReservationKind::Cabin,
            reservation_id: booking_id,
            signal: PaymentSignal::DepositPaid,
        },
    )
    .unwrap();

    let response = crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 01 - 31),
    )
    .unwrap();

    // 30% deposit on $480
    assert_eq!(response.refund.refund_amount, Money::from_units(144));
    assert_eq!(response.refund.refund_type, RefundType::Full);
}

#[test]
fn test_cancellation_is_owner_only() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);

    let result = crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        booking_id,
        &cancel_as("cust-2"),
        date!(2026 - 01 - 31),
    );
    match result {
        Err(ApiError::NotOwner { .. }) => {}
        other => panic!("expected NotOwner, got {other:?}"),
    }
}

#[test]
fn test_cancellation_is_closed_after_check_in() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    crate::confirm_cabin_booking(&mut db, booking_id).unwrap();
    crate::check_in_cabin_booking(&mut db, booking_id).unwrap();

    let result = crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &NoopNotifier,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 02 - 11),
    );
    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "status"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_cancellation_releases_the_range() {
    let mut db = test_db();
    let cabin_id = add_cabin(&mut db);
    let settings = Settings::default();
    let booking = crate::create_cabin_booking(
        &mut db,
        &settings,
        &NoopNotifier,
        cabin_id,
        cabin_request("cust-1", CHECK_IN, CHECK_OUT, 2, ExtrasSelection::default()),
    )
    .unwrap();
    crate::cancel_cabin_booking(
        &mut db,
        &settings,
        &NoopNotifier,
        booking.booking_id.unwrap(),
        &cancel_as("cust-1"),
        date!(2026 - 01 - 31),
    )
    .unwrap();

    let rebooked = crate::create_cabin_booking(
        &mut db,
        &settings,
        &NoopNotifier,
        cabin_id,
        cabin_request("cust-2", CHECK_IN, CHECK_OUT, 2, ExtrasSelection::default()),
    );
    assert!(rebooked.is_ok());
}

#[test]
fn test_cancellation_notifies_the_customer() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    let notifier = RecordingNotifier::default();

    crate::cancel_cabin_booking(
        &mut db,
        &Settings::default(),
        &notifier,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 01 - 31),
    )
    .unwrap();

    let cancelled = notifier.cancelled.lock().unwrap();
    assert_eq!(*cancelled, vec![(ReservationKind::Cabin, booking_id)]);
}

#[test]
fn test_refund_preview_changes_nothing() {
    let mut db = test_db();
    let booking_id = booked_cabin(&mut db);
    pay_in_full(&mut db, booking_id);

    let preview = crate::refund_preview(
        &mut db,
        &Settings::default(),
        ReservationKind::Cabin,
        booking_id,
        &cancel_as("cust-1"),
        date!(2026 - 01 - 31),
    )
    .unwrap();
    assert_eq!(preview.refund_amount, Money::from_units(480));

    // The booking is still alive and holds its range
    let stored = crate::get_cabin_booking(&mut db, booking_id).unwrap();
    assert_eq!(stored.status, CabinBookingStatus::Confirmed);
}

#[test]
fn test_dining_no_show_releases_the_seats() {
    let mut db = test_db();
    let item_id = add_dining_item(&mut db);
    let reservation = crate::create_dining_reservation(
        &mut db,
        &NoopNotifier,
        item_id,
        dining_request("cust-1", date!(2026 - 03 - 01), time!(18:00:00), 10),
    )
    .unwrap();
    let reservation_id = reservation.reservation_id.unwrap();
    crate::confirm_dining_reservation(&mut db, reservation_id).unwrap();
    crate::mark_dining_no_show(&mut db, reservation_id).unwrap();

    // The full slot is bookable again
    let result = crate::create_dining_reservation(
        &mut db,
        &NoopNotifier,
        item_id,
        dining_request("cust-2", date!(2026 - 03 - 01), time!(18:00:00), 10),
    );
    assert!(result.is_ok());
}

#[test]
fn test_policy_response_includes_deadlines() {
    let settings = Settings::default();
    let response = crate::get_policy(&settings, Some(date!(2026 - 03 - 20)));

    assert_eq!(response.policy, CancellationPolicy::Moderate);
    assert_eq!(
        response.description,
        "Full refund 5+ days before check-in, 50% refund 2-5 days before, no refund within 2 days"
    );
    let deadlines = response.deadlines.unwrap();
    assert_eq!(deadlines.full_refund_deadline, Some(date!(2026 - 03 - 15)));
    assert_eq!(deadlines.partial_refund_deadline, Some(date!(2026 - 03 - 18)));

    let bare = crate::get_policy(&settings, None);
    assert!(bare.deadlines.is_none());
}
