// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod initialization_tests;
mod reservation_tests;

use lodge_domain::{
    Cabin, CabinBooking, CabinBookingStatus, CustomerId, DiningItem, DiningReservation,
    DiningReservationStatus, Experience, ExperienceBooking, ExperienceBookingStatus, Money,
};
use time::macros::time;
use time::{Date, Time};

pub fn test_cabin() -> Cabin {
    Cabin::new(String::from("Birch"), Money::from_units(120), None, 4)
}

pub fn test_dining_item() -> DiningItem {
    DiningItem::new(
        String::from("Chef's Table"),
        Money::from_units(45),
        1,
        10,
        time!(17:00:00),
        time!(21:00:00),
    )
}

pub fn test_experience(max_participants: Option<u32>) -> Experience {
    Experience::new(
        String::from("Moose Safari"),
        Money::from_units(60),
        max_participants,
    )
}

pub fn test_cabin_booking(
    cabin_id: i64,
    customer: &str,
    check_in: Date,
    check_out: Date,
) -> CabinBooking {
    CabinBooking {
        booking_id: None,
        cabin_id,
        customer_id: CustomerId::new(customer),
        check_in,
        check_out,
        num_guests: 2,
        base_price: Money::from_units(240),
        extras_price: Money::ZERO,
        total_price: Money::from_units(240),
        deposit_amount: Money::from_units(72),
        is_paid: false,
        deposit_paid: false,
        status: CabinBookingStatus::Unconfirmed,
        special_requests: vec![],
    }
}

pub fn test_dining_reservation(
    dining_item_id: i64,
    customer: &str,
    date: Date,
    time: Time,
    num_guests: u32,
) -> DiningReservation {
    DiningReservation {
        reservation_id: None,
        dining_item_id,
        customer_id: CustomerId::new(customer),
        date,
        time,
        num_guests,
        total_price: Money::from_units(45).times(num_guests),
        is_paid: false,
        status: DiningReservationStatus::Pending,
        special_requests: vec![],
    }
}

pub fn test_experience_booking(
    experience_id: i64,
    customer: &str,
    date: Date,
    num_participants: u32,
) -> ExperienceBooking {
    ExperienceBooking {
        booking_id: None,
        experience_id,
        customer_id: CustomerId::new(customer),
        date,
        num_participants,
        total_price: Money::from_units(60).times(num_participants),
        is_paid: false,
        status: ExperienceBookingStatus::Pending,
        special_requests: vec![],
    }
}
