//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Int4,
        /// Unique login name (max 50 characters).
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Train routes. `total_seats` is read under `FOR UPDATE` by the seat
    /// allocator.
    trains (id) {
        id -> Int4,
        train_number -> Varchar,
        source -> Varchar,
        destination -> Varchar,
        total_seats -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Booking ledger. `(train_id, seat_number)` is unique.
    bookings (id) {
        id -> Int4,
        user_id -> Int4,
        train_id -> Int4,
        seat_number -> Int4,
        booked_at -> Timestamptz,
    }
}

diesel::joinable!(bookings -> users (user_id));
diesel::joinable!(bookings -> trains (train_id));

diesel::allow_tables_to_appear_in_same_query!(bookings, trains, users);
