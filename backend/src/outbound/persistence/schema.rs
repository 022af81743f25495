//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts. `email` and `username` are unique; `password_hash` is an
    /// Argon2 PHC string.
    users (id) {
        id -> Uuid,
        full_name -> Varchar,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        /// One of `student`, `technician`, `admin`.
        role -> Varchar,
        department -> Nullable<Text>,
        phone -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seeded complaint categories.
    categories (id) {
        id -> Int4,
        name -> Varchar,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    /// Complaint tickets.
    complaints (id) {
        id -> Uuid,
        /// Submitter; never changes.
        user_id -> Uuid,
        technician_id -> Nullable<Uuid>,
        category_id -> Int4,
        title -> Varchar,
        description -> Text,
        priority -> Varchar,
        location -> Nullable<Varchar>,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail of status changes.
    complaint_history (id) {
        id -> Int8,
        complaint_id -> Uuid,
        changed_by -> Uuid,
        /// Null only on the creation entry.
        old_status -> Nullable<Varchar>,
        new_status -> Varchar,
        comments -> Text,
        changed_at -> Timestamptz,
    }
}

diesel::joinable!(complaints -> categories (category_id));
diesel::joinable!(complaint_history -> complaints (complaint_id));
diesel::joinable!(complaint_history -> users (changed_by));

diesel::allow_tables_to_appear_in_same_query!(categories, complaint_history, complaints, users);
