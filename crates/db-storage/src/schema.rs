// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

diesel::table! {
    use diesel::sql_types::*;

    users (id) {
        id -> Uuid,
        oidc_sub -> Varchar,
        email -> Varchar,
        display_name -> Varchar,
        is_admin -> Bool,
        id_token_exp -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    user_profiles (user_id) {
        user_id -> Uuid,
        avatar_url -> Nullable<Text>,
        bio -> Nullable<Text>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    events (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Text,
        location -> Text,
        starts_at -> Nullable<Timestamptz>,
        ends_at -> Nullable<Timestamptz>,
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        is_archived -> Bool,
        deleted -> Bool,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::sql_types::*;

    event_guests (event_id, user_id) {
        event_id -> Uuid,
        user_id -> Uuid,
        rsvp -> RsvpStatusType,
        display_label -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::sql_types::*;

    event_toggles (event_id, user_id, field) {
        event_id -> Uuid,
        user_id -> Uuid,
        field -> ToggleFieldType,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use crate::sql_types::*;

    reservations (id) {
        id -> Uuid,
        event_id -> Uuid,
        user_id -> Uuid,
        number_of_people -> Int4,
        status -> ReservationStatusType,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(user_profiles -> users (user_id));
diesel::joinable!(events -> users (created_by));
diesel::joinable!(event_guests -> events (event_id));
diesel::joinable!(event_guests -> users (user_id));
diesel::joinable!(event_toggles -> events (event_id));
diesel::joinable!(event_toggles -> users (user_id));
diesel::joinable!(reservations -> events (event_id));
diesel::joinable!(reservations -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_profiles,
    events,
    event_guests,
    event_toggles,
    reservations,
);
