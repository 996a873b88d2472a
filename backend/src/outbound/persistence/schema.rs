//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Donor/requester accounts keyed by username.
    user_accounts (username) {
        username -> Varchar,
        /// Stored verbatim; compared as-is at login.
        password -> Varchar,
        last_donation -> Nullable<Date>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Administrator accounts keyed by username.
    admin_accounts (username) {
        username -> Varchar,
        password -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per blood type. `quantity` is constrained to the `u32` range.
    blood_inventory (blood_type) {
        /// ASCII label such as `AB-`.
        blood_type -> Varchar,
        quantity -> Int8,
    }
}

diesel::table! {
    blood_requests (id) {
        id -> Uuid,
        requester -> Varchar,
        blood_type -> Varchar,
        quantity -> Int8,
        urgency -> Varchar,
        /// Status label; `Donated/Stocked` includes the slash.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    user_accounts,
    admin_accounts,
    blood_inventory,
    blood_requests,
);
