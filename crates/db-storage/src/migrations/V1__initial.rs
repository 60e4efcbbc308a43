// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.inject_custom("CREATE EXTENSION IF NOT EXISTS \"pgcrypto\"");

    migr.create_table("users", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column("oidc_sub", types::varchar(255).unique(true).nullable(false));
        table.add_column("email", types::varchar(255).unique(true).nullable(false));
        table.add_column("display_name", types::varchar(255).nullable(false));
        table.add_column("is_admin", types::boolean().nullable(false).default(false));
        table.add_column("id_token_exp", types::custom("BIGINT").nullable(false));
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
    });

    migr.create_table("user_profiles", |table| {
        table.add_column(
            "user_id",
            types::custom("UUID REFERENCES users(id)").primary(true),
        );
        table.add_column("avatar_url", types::text().nullable(true));
        table.add_column("bio", types::text().nullable(true));
    });

    migr.create_table("events", |table| {
        table.add_column(
            "id",
            types::custom("UUID DEFAULT gen_random_uuid()").primary(true),
        );
        table.add_column("title", types::varchar(255).nullable(false));
        table.add_column("description", types::custom("TEXT NOT NULL DEFAULT ''"));
        table.add_column("location", types::custom("TEXT NOT NULL DEFAULT ''"));
        table.add_column("starts_at", types::custom("TIMESTAMPTZ").nullable(true));
        table.add_column("ends_at", types::custom("TIMESTAMPTZ").nullable(true));
        table.add_column(
            "created_by",
            types::custom("UUID REFERENCES users(id)").nullable(false),
        );
        table.add_column(
            "created_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.add_column(
            "updated_at",
            types::custom("TIMESTAMPTZ NOT NULL DEFAULT now()"),
        );
        table.add_column(
            "is_archived",
            types::boolean().nullable(false).default(false),
        );
        table.add_column("deleted", types::boolean().nullable(false).default(false));
    });

    migr.make::<Pg>()
}
