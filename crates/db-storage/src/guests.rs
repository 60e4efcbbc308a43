// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Guest projection of an event
//!
//! One row per (event, user) pair, enforced by the composite primary key.
//! Every write path goes through [`UpsertEventGuest`] or a full
//! [`EventGuest::replace_all`], never a blind append, which keeps the
//! projection consistent with confirmed reservations.
use crate::events::{Event, EventId};
use crate::schema::{event_guests, users};
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Paginate, Result};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

sql_enum!(
    #[derive(Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    RsvpStatus,
    "rsvp_status",
    RsvpStatusType,
    {
        Yes = b"yes",
        No = b"no",
        Maybe = b"maybe",
        Pending = b"pending",
    }
);

impl Default for RsvpStatus {
    fn default() -> Self {
        Self::Maybe
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(primary_key(event_id, user_id), belongs_to(Event), belongs_to(User))]
pub struct EventGuest {
    pub event_id: EventId,
    pub user_id: UserId,
    pub rsvp: RsvpStatus,
    /// Display label for guests derived from a confirmed reservation,
    /// e.g. `"Alice +2"` for a party of three
    pub display_label: Option<String>,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventGuest {
    #[tracing::instrument(err, skip_all)]
    pub fn get_for_event(conn: &mut DbConnection, event_id: EventId) -> Result<Vec<(EventGuest, User)>> {
        let query = event_guests::table
            .inner_join(users::table.on(event_guests::user_id.eq(users::id)))
            .filter(event_guests::event_id.eq(event_id))
            .order(event_guests::created_at.asc());

        let guests = query.load(conn)?;

        Ok(guests)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_for_event_paginated(
        conn: &mut DbConnection,
        event_id: EventId,
        limit: i64,
        page: i64,
    ) -> Result<(Vec<(EventGuest, User)>, i64)> {
        let query = event_guests::table
            .inner_join(users::table.on(event_guests::user_id.eq(users::id)))
            .filter(event_guests::event_id.eq(event_id))
            .order(event_guests::created_at.asc())
            .then_order_by(event_guests::user_id.asc())
            .paginate_by(limit, page);

        let guests = query.load_and_count(conn)?;

        Ok(guests)
    }

    /// Deletes the guest entry for the given (event, user) pair
    ///
    /// Returns true if an entry was removed. Absence is not an error.
    #[tracing::instrument(err, skip_all)]
    pub fn remove(conn: &mut DbConnection, event_id: EventId, user_id: UserId) -> Result<bool> {
        let lines_changed = diesel::delete(event_guests::table)
            .filter(
                event_guests::event_id
                    .eq(event_id)
                    .and(event_guests::user_id.eq(user_id)),
            )
            .execute(conn)?;

        Ok(lines_changed > 0)
    }

    /// Replaces the complete guest list of an event
    ///
    /// Runs in a transaction so a failed insert never leaves the event with a
    /// half-written roster. Duplicate and self-referential entries must be
    /// rejected by the caller before any write occurs.
    #[tracing::instrument(err, skip_all)]
    pub fn replace_all(
        conn: &mut DbConnection,
        event_id: EventId,
        guests: Vec<UpsertEventGuest>,
    ) -> Result<()> {
        conn.transaction(|conn| {
            diesel::delete(event_guests::table)
                .filter(event_guests::event_id.eq(event_id))
                .execute(conn)?;

            diesel::insert_into(event_guests::table)
                .values(&guests)
                .execute(conn)?;

            Ok(())
        })
    }
}

/// Insert-or-overwrite of a single guest entry
///
/// The conflict target is the composite primary key, which makes this the
/// search-and-replace write the reconciliation policy requires.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_guests)]
pub struct UpsertEventGuest {
    pub event_id: EventId,
    pub user_id: UserId,
    pub rsvp: RsvpStatus,
    pub display_label: Option<String>,
}

impl UpsertEventGuest {
    pub fn new(event_id: EventId, user_id: UserId, rsvp: RsvpStatus) -> Self {
        Self {
            event_id,
            user_id,
            rsvp,
            display_label: None,
        }
    }

    pub fn with_display_label(mut self, display_label: String) -> Self {
        self.display_label = Some(display_label);
        self
    }

    #[tracing::instrument(err, skip_all)]
    pub fn apply(self, conn: &mut DbConnection) -> Result<EventGuest> {
        let query = diesel::insert_into(event_guests::table)
            .values(&self)
            .on_conflict((event_guests::event_id, event_guests::user_id))
            .do_update()
            .set((
                event_guests::rsvp.eq(self.rsvp),
                event_guests::display_label.eq(self.display_label.clone()),
                event_guests::updated_at.eq(diesel::dsl::now),
            ))
            .returning(event_guests::all_columns);

        let guest = query.get_result(conn)?;

        Ok(guest)
    }
}
