//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. When a
//! migration changes the schema, regenerate or update this file to match.

diesel::table! {
    /// Farmer accounts. Phones are unique within this table only.
    farmer_accounts (id) {
        id -> Int4,
        username -> Varchar,
        /// Exactly 10 ASCII digits, unique per role.
        phone -> Varchar,
        /// bcrypt hash of the registration password.
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Customer accounts. Independent phone namespace from farmers.
    customer_accounts (id) {
        id -> Int4,
        username -> Varchar,
        phone -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Product listings shown on the market pages.
    listings (id) {
        id -> Int4,
        product_name -> Varchar,
        price -> Float8,
        quantity -> Float8,
        quality -> Varchar,
        description -> Text,
        contact_number -> Varchar,
        /// Public path of the uploaded product image, if one was supplied.
        image_path -> Nullable<Varchar>,
        currency -> Varchar,
        quantity_unit -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uploaded-image prediction records and their diagnosis, once attached.
    predictions (id) {
        id -> Int4,
        image_path -> Varchar,
        description -> Text,
        language -> Varchar,
        /// Structured or free-text diagnosis; null until first analysis.
        diagnosis -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}
