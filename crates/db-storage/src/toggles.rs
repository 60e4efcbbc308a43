// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Toggle sets of an event (likes / going / interested)
//!
//! Membership is a row in `event_toggles`; the composite primary key makes a
//! toggle a try-insert/delete pair instead of a racy read-modify-write.
use crate::events::{Event, EventId};
use crate::schema::event_toggles;
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

sql_enum!(
    #[derive(Serialize, Deserialize, PartialEq, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    ToggleField,
    "toggle_field",
    ToggleFieldType,
    {
        Likes = b"likes",
        Going = b"going",
        Interested = b"interested",
    }
);

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(primary_key(event_id, user_id, field), belongs_to(Event), belongs_to(User))]
pub struct EventToggle {
    pub event_id: EventId,
    pub user_id: UserId,
    pub field: ToggleField,
    pub created_at: DateTime<Utc>,
}

impl EventToggle {
    /// Flips membership of the user in the given set
    ///
    /// Returns true when the user is a member after the call. Calling this
    /// twice in succession restores the original state.
    #[tracing::instrument(err, skip_all)]
    pub fn toggle(
        conn: &mut DbConnection,
        event_id: EventId,
        user_id: UserId,
        field: ToggleField,
    ) -> Result<bool> {
        let inserted = NewEventToggle {
            event_id,
            user_id,
            field,
        }
        .try_insert(conn)?;

        if inserted.is_some() {
            return Ok(true);
        }

        Self::delete_by_id(conn, event_id, user_id, field)?;

        Ok(false)
    }

    /// Deletes a toggle entry by its composite id
    ///
    /// Returns true if something was deleted
    #[tracing::instrument(err, skip_all)]
    pub fn delete_by_id(
        conn: &mut DbConnection,
        event_id: EventId,
        user_id: UserId,
        field: ToggleField,
    ) -> Result<bool> {
        let lines_changed = diesel::delete(event_toggles::table)
            .filter(
                event_toggles::event_id
                    .eq(event_id)
                    .and(event_toggles::user_id.eq(user_id))
                    .and(event_toggles::field.eq(field)),
            )
            .execute(conn)?;

        Ok(lines_changed > 0)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn members(
        conn: &mut DbConnection,
        event_id: EventId,
        field: ToggleField,
    ) -> Result<Vec<UserId>> {
        let query = event_toggles::table
            .select(event_toggles::user_id)
            .filter(
                event_toggles::event_id
                    .eq(event_id)
                    .and(event_toggles::field.eq(field)),
            )
            .order(event_toggles::created_at.asc());

        let members = query.load(conn)?;

        Ok(members)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = event_toggles)]
pub struct NewEventToggle {
    pub event_id: EventId,
    pub user_id: UserId,
    pub field: ToggleField,
}

impl NewEventToggle {
    /// Tries to insert the toggle entry into the database
    ///
    /// When yielding a unique key violation, None is returned.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<EventToggle>> {
        let query = self.insert_into(event_toggles::table);

        let result = query.get_result(conn);

        match result {
            Ok(toggle) => Ok(Some(toggle)),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                ..,
            )) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn toggle_field_from_json() {
        let field: ToggleField = serde_json::from_str("\"likes\"").unwrap();
        assert_eq!(field, ToggleField::Likes);

        let field: ToggleField = serde_json::from_str("\"going\"").unwrap();
        assert_eq!(field, ToggleField::Going);

        let field: ToggleField = serde_json::from_str("\"interested\"").unwrap();
        assert_eq!(field, ToggleField::Interested);
    }

    #[test]
    fn unknown_toggle_field_is_rejected() {
        assert!(serde_json::from_str::<ToggleField>("\"bogus\"").is_err());
        assert!(serde_json::from_str::<ToggleField>("\"Likes\"").is_err());
    }
}
