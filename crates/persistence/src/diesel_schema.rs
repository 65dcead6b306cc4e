// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

diesel::table! {
    cabins (cabin_id) {
        cabin_id -> BigInt,
        name -> Text,
        price_per_night_cents -> BigInt,
        discount_cents -> Nullable<BigInt>,
        max_capacity -> Integer,
    }
}

diesel::table! {
    dining_items (dining_item_id) {
        dining_item_id -> BigInt,
        name -> Text,
        price_per_person_cents -> BigInt,
        min_people -> Integer,
        max_people -> Integer,
        serving_start -> Text,
        serving_end -> Text,
    }
}

diesel::table! {
    experiences (experience_id) {
        experience_id -> BigInt,
        name -> Text,
        price_per_person_cents -> BigInt,
        max_participants -> Nullable<Integer>,
    }
}

diesel::table! {
    cabin_bookings (booking_id) {
        booking_id -> BigInt,
        cabin_id -> BigInt,
        customer_id -> Text,
        check_in -> Text,
        check_out -> Text,
        num_guests -> Integer,
        base_price_cents -> BigInt,
        extras_price_cents -> BigInt,
        total_price_cents -> BigInt,
        deposit_cents -> BigInt,
        is_paid -> Integer,
        deposit_paid -> Integer,
        status -> Text,
        special_requests -> Text,
    }
}

diesel::table! {
    dining_reservations (reservation_id) {
        reservation_id -> BigInt,
        dining_item_id -> BigInt,
        customer_id -> Text,
        date -> Text,
        time -> Text,
        num_guests -> Integer,
        total_price_cents -> BigInt,
        is_paid -> Integer,
        status -> Text,
        special_requests -> Text,
    }
}

diesel::table! {
    experience_bookings (booking_id) {
        booking_id -> BigInt,
        experience_id -> BigInt,
        customer_id -> Text,
        date -> Text,
        num_participants -> Integer,
        total_price_cents -> BigInt,
        is_paid -> Integer,
        status -> Text,
        special_requests -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    cabins,
    dining_items,
    experiences,
    cabin_bookings,
    dining_reservations,
    experience_bookings,
);
