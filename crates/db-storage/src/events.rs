// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event database structs and queries
//!
//! Soft-deleted events are treated as nonexistent by every query in this
//! module, so attendance mutations on them surface as `NotFound`.
use crate::schema::events;
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Paginate, Result};
use diesel::prelude::*;
use serde::Serialize;

diesel_newtype! {
    #[derive(Copy)] EventId(uuid::Uuid) => diesel::sql_types::Uuid
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(User, foreign_key = created_by))]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
    #[serde(skip)]
    pub deleted: bool,
}

impl Event {
    /// Returns true if the given user is the creator of this event
    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let query = events::table.filter(events::id.eq(event_id).and(events::deleted.eq(false)));

        let event = query.first(conn)?;

        Ok(event)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_all_paginated(
        conn: &mut DbConnection,
        limit: i64,
        page: i64,
    ) -> Result<(Vec<Event>, i64)> {
        let query = events::table
            .filter(events::deleted.eq(false))
            .order(events::created_at.desc())
            .then_order_by(events::id.desc())
            .paginate_by(limit, page);

        let events_with_total = query.load_and_count(conn)?;

        Ok(events_with_total)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_created_by_paginated(
        conn: &mut DbConnection,
        created_by: UserId,
        limit: i64,
        page: i64,
    ) -> Result<(Vec<Event>, i64)> {
        let query = events::table
            .filter(events::created_by.eq(created_by).and(events::deleted.eq(false)))
            .order(events::created_at.desc())
            .then_order_by(events::id.desc())
            .paginate_by(limit, page);

        let events_with_total = query.load_and_count(conn)?;

        Ok(events_with_total)
    }

    /// Marks the event as deleted without removing the row
    ///
    /// The guest projection, toggle sets and reservations reference the event
    /// and are kept for audit purposes.
    #[tracing::instrument(err, skip_all)]
    pub fn soft_delete_by_id(conn: &mut DbConnection, event_id: EventId) -> Result<()> {
        diesel::update(events::table)
            .filter(events::id.eq(event_id))
            .set(events::deleted.eq(true))
            .execute(conn)?;

        Ok(())
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_by: UserId,
}

impl NewEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Event> {
        let query = self.insert_into(events::table);

        let event = query.get_result(conn)?;

        Ok(event)
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<Option<DateTime<Utc>>>,
    pub ends_at: Option<Option<DateTime<Utc>>>,
    pub is_archived: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl UpdateEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn apply(self, conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let query = diesel::update(events::table)
            .filter(events::id.eq(event_id))
            .set(self)
            .returning(events::all_columns);

        let event = query.get_result(conn)?;

        Ok(event)
    }
}
