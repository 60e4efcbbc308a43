// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.inject_custom("CREATE TYPE rsvp_status AS ENUM ('yes', 'no', 'maybe', 'pending')");
    migr.inject_custom("CREATE TYPE toggle_field AS ENUM ('likes', 'going', 'interested')");
    migr.inject_custom(
        "CREATE TYPE reservation_status AS ENUM ('pending', 'confirmed', 'rejected', 'canceled')",
    );

    migr.create_table("event_guests", |table| {
        table.add_column("event_id", types::custom("UUID REFERENCES events(id)"));
        table.add_column("user_id", types::custom("UUID REFERENCES users(id)"));
        table.add_column("rsvp", types::custom("rsvp_status NOT NULL DEFAULT 'maybe'"));
        table.add_column("display_label", types::text().nullable(true));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.add_column(
            "updated_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.inject_custom("PRIMARY KEY (event_id, user_id)");
    });

    migr.create_table("event_toggles", |table| {
        table.add_column("event_id", types::custom("UUID REFERENCES events(id)"));
        table.add_column("user_id", types::custom("UUID REFERENCES users(id)"));
        table.add_column("field", types::custom("toggle_field NOT NULL"));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.inject_custom("PRIMARY KEY (event_id, user_id, field)");
    });

    migr.create_table("reservations", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column(
            "event_id",
            types::custom("UUID REFERENCES events(id)").nullable(false),
        );
        table.add_column(
            "user_id",
            types::custom("UUID REFERENCES users(id)").nullable(false),
        );
        table.add_column("number_of_people", types::custom("INT NOT NULL"));
        table.add_column(
            "status",
            types::custom("reservation_status NOT NULL DEFAULT 'pending'"),
        );
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.add_column(
            "updated_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.inject_custom("CHECK (number_of_people > 0)");
    });

    // One active reservation per (event, user); answered or canceled
    // reservations stay in the ledger and do not block a new request.
    migr.inject_custom(
        "CREATE UNIQUE INDEX reservations_active_unique_idx ON reservations (event_id, user_id) \
         WHERE status IN ('pending', 'confirmed')",
    );

    migr.make::<Pg>()
}
