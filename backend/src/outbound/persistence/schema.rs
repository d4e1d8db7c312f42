//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Vocabulary
//! columns (roles, plans, meal types, statuses) are stored as text and
//! constrained by `CHECK` clauses in the migration.

diesel::table! {
    /// Service areas (neighbourhoods) used to group messes.
    areas (id) {
        id -> Uuid,
        name -> Text,
        is_active -> Bool,
    }
}

diesel::table! {
    /// Mess businesses and their public profile.
    messes (id) {
        id -> Uuid,
        name -> Text,
        tagline -> Nullable<Text>,
        speciality -> Nullable<Text>,
        address -> Nullable<Text>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
        contact_number -> Nullable<Text>,
        owner_id -> Nullable<Uuid>,
        area_id -> Nullable<Uuid>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Account profiles; the id matches the identity provider's user id.
    profiles (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        phone -> Nullable<Text>,
        /// Set while the account still uses the password it was issued.
        temp_password -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One role per account.
    user_roles (user_id) {
        user_id -> Uuid,
        role -> Text,
        mess_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    memberships (id) {
        id -> Uuid,
        user_id -> Uuid,
        mess_id -> Uuid,
        plan_type -> Text,
        meals_per_day -> Text,
        start_date -> Date,
        end_date -> Date,
        status -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unique on `(membership_id, date, meal_type)`.
    attendance (id) {
        id -> Uuid,
        membership_id -> Uuid,
        date -> Date,
        meal_type -> Text,
        is_present -> Bool,
        marked_by -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    menu_posts (id) {
        id -> Uuid,
        mess_id -> Uuid,
        meal_type -> Text,
        title -> Text,
        items -> Array<Text>,
        is_veg -> Bool,
        price -> Nullable<Float8>,
        visible_from -> Timestamptz,
        expiry_time -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    polls (id) {
        id -> Uuid,
        mess_id -> Uuid,
        target_meal -> Text,
        title -> Text,
        options -> Array<Text>,
        deadline -> Timestamptz,
        status -> Text,
        winning_option -> Nullable<Int4>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Unique on `(poll_id, user_id)`.
    poll_votes (id) {
        id -> Uuid,
        poll_id -> Uuid,
        user_id -> Uuid,
        option_index -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(messes -> areas (area_id));
diesel::joinable!(menu_posts -> messes (mess_id));
diesel::joinable!(memberships -> messes (mess_id));
diesel::joinable!(attendance -> memberships (membership_id));
diesel::joinable!(poll_votes -> polls (poll_id));

diesel::allow_tables_to_appear_in_same_query!(
    areas,
    attendance,
    memberships,
    menu_posts,
    messes,
    poll_votes,
    polls,
    profiles,
    user_roles,
);
