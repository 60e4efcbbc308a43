// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Reservation ledger
//!
//! Party-size bookings with a host approval workflow, independent of the
//! plain rsvp guest entries. At most one active (pending or confirmed)
//! reservation may exist per (event, user) pair; a partial unique index
//! enforces this so the check is not a racy pre-read.
use crate::events::{Event, EventId};
use crate::schema::{events, reservations, users};
use crate::users::{User, UserId};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

diesel_newtype! {
    #[derive(Copy)] ReservationId(uuid::Uuid) => diesel::sql_types::Uuid
}

sql_enum!(
    #[derive(Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "snake_case")]
    ReservationStatus,
    "reservation_status",
    ReservationStatusType,
    {
        Pending = b"pending",
        Confirmed = b"confirmed",
        Rejected = b"rejected",
        Canceled = b"canceled",
    }
);

impl ReservationStatus {
    /// Terminal states absorb, there is no way out of them
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Canceled)
    }

    /// Legality of a state transition
    ///
    /// `pending -> confirmed | rejected`, `pending | confirmed -> canceled`.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Confirmed | Self::Rejected) => true,
            (Self::Pending | Self::Confirmed, Self::Canceled) => true,
            // re-running approval on an updated reservation
            (Self::Confirmed, Self::Pending) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize)]
#[diesel(belongs_to(Event), belongs_to(User))]
pub struct Reservation {
    pub id: ReservationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub number_of_people: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, reservation_id: ReservationId) -> Result<Reservation> {
        let reservation = reservations::table
            .filter(reservations::id.eq(reservation_id))
            .first(conn)?;

        Ok(reservation)
    }

    /// Fetches the reservation together with its (non-deleted) event
    #[tracing::instrument(err, skip_all)]
    pub fn get_with_event(
        conn: &mut DbConnection,
        reservation_id: ReservationId,
    ) -> Result<(Reservation, Event)> {
        let query = reservations::table
            .inner_join(events::table.on(reservations::event_id.eq(events::id)))
            .filter(reservations::id.eq(reservation_id).and(events::deleted.eq(false)));

        let reservation_with_event = query.first(conn)?;

        Ok(reservation_with_event)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_for_event(
        conn: &mut DbConnection,
        event_id: EventId,
    ) -> Result<Vec<(Reservation, User)>> {
        let query = reservations::table
            .inner_join(users::table.on(reservations::user_id.eq(users::id)))
            .filter(reservations::event_id.eq(event_id))
            .order(reservations::created_at.asc());

        let reservations = query.load(conn)?;

        Ok(reservations)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_for_user(
        conn: &mut DbConnection,
        user_id: UserId,
    ) -> Result<Vec<(Reservation, Event)>> {
        let query = reservations::table
            .inner_join(events::table.on(reservations::event_id.eq(events::id)))
            .filter(reservations::user_id.eq(user_id).and(events::deleted.eq(false)))
            .order(reservations::created_at.desc());

        let reservations = query.load(conn)?;

        Ok(reservations)
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservation {
    pub event_id: EventId,
    pub user_id: UserId,
    pub number_of_people: i32,
}

impl NewReservation {
    /// Tries to insert the reservation into the database
    ///
    /// When the partial unique index over active reservations is violated,
    /// None is returned, meaning the user already holds an active reservation
    /// for this event.
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<Option<Reservation>> {
        let query = self.insert_into(reservations::table);

        let result = query.get_result(conn);

        match result {
            Ok(reservation) => Ok(Some(reservation)),
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                ..,
            )) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = reservations)]
pub struct UpdateReservation {
    pub number_of_people: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub updated_at: DateTime<Utc>,
}

impl UpdateReservation {
    #[tracing::instrument(err, skip_all)]
    pub fn apply(
        self,
        conn: &mut DbConnection,
        reservation_id: ReservationId,
    ) -> Result<Reservation> {
        let query = diesel::update(reservations::table)
            .filter(reservations::id.eq(reservation_id))
            .set(self)
            .returning(reservations::all_columns);

        let reservation = query.get_result(conn)?;

        Ok(reservation)
    }
}

/// Guest list label for a confirmed reservation
///
/// A party of one is shown by name only, larger parties get the extra
/// headcount appended, e.g. `"Alice +2"` for three people.
pub fn aggregated_label(display_name: &str, number_of_people: i32) -> String {
    if number_of_people > 1 {
        format!("{} +{}", display_name, number_of_people - 1)
    } else {
        display_name.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aggregated_label_party_of_three() {
        assert_eq!(aggregated_label("Alice", 3), "Alice +2");
    }

    #[test]
    fn aggregated_label_party_of_one() {
        assert_eq!(aggregated_label("Alice", 1), "Alice");
    }

    #[test]
    fn pending_can_be_answered() {
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Rejected));
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Canceled));
    }

    #[test]
    fn confirmed_can_be_canceled_or_reopened() {
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Canceled));
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Pending));
        assert!(!ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Rejected));
    }

    #[test]
    fn terminal_states_absorb() {
        for terminal in [ReservationStatus::Canceled, ReservationStatus::Rejected] {
            assert!(terminal.is_terminal());

            for next in [
                ReservationStatus::Pending,
                ReservationStatus::Confirmed,
                ReservationStatus::Rejected,
                ReservationStatus::Canceled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn pending_is_not_terminal() {
        assert!(!ReservationStatus::Pending.is_terminal());
        assert!(!ReservationStatus::Confirmed.is_terminal());
    }
}
