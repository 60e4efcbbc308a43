// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use serde::Deserialize;
#[cfg(any(test, feature = "client"))]
use serde::Serialize;
pub mod v1;

/// Versioned Notification Task Protocol
#[derive(Deserialize, PartialEq, Debug)]
#[cfg_attr(any(test, feature = "client"), derive(Serialize))]
#[serde(tag = "version")]
pub enum NotifyTask {
    #[serde(rename = "1")]
    V1(v1::Message),
}

#[cfg(feature = "client")]
impl NotifyTask {
    /// Creates a NotifyTask telling the event host about a new reservation request
    pub fn reservation_requested<H, E, U, R>(
        host: H,
        event: E,
        requester: U,
        reservation: R,
    ) -> NotifyTask
    where
        H: Into<v1::User>,
        E: Into<v1::Event>,
        U: Into<v1::User>,
        R: Into<v1::Reservation>,
    {
        Self::V1(v1::Message::ReservationRequested(
            v1::ReservationRequested {
                host: host.into(),
                event: event.into(),
                requester: requester.into(),
                reservation: reservation.into(),
            },
        ))
    }

    /// Creates a NotifyTask telling the event host that a reservation was
    /// changed and needs another approval
    pub fn reservation_updated<H, E, U, R>(
        host: H,
        event: E,
        requester: U,
        reservation: R,
    ) -> NotifyTask
    where
        H: Into<v1::User>,
        E: Into<v1::Event>,
        U: Into<v1::User>,
        R: Into<v1::Reservation>,
    {
        Self::V1(v1::Message::ReservationUpdated(v1::ReservationUpdated {
            host: host.into(),
            event: event.into(),
            requester: requester.into(),
            reservation: reservation.into(),
        }))
    }

    /// Creates a NotifyTask telling the attendee that the host answered their
    /// reservation request
    pub fn reservation_responded<A, E, H, R>(
        attendee: A,
        event: E,
        host: H,
        reservation: R,
    ) -> NotifyTask
    where
        A: Into<v1::User>,
        E: Into<v1::Event>,
        H: Into<v1::User>,
        R: Into<v1::Reservation>,
    {
        Self::V1(v1::Message::ReservationResponded(
            v1::ReservationResponded {
                attendee: attendee.into(),
                event: event.into(),
                host: host.into(),
                reservation: reservation.into(),
            },
        ))
    }

    /// Creates a NotifyTask telling the counterpart that a reservation was canceled
    pub fn reservation_canceled<C, E, U, R>(
        recipient: C,
        event: E,
        canceled_by: U,
        reservation: R,
    ) -> NotifyTask
    where
        C: Into<v1::User>,
        E: Into<v1::Event>,
        U: Into<v1::User>,
        R: Into<v1::Reservation>,
    {
        Self::V1(v1::Message::ReservationCanceled(v1::ReservationCanceled {
            recipient: recipient.into(),
            event: event.into(),
            canceled_by: canceled_by.into(),
            reservation: reservation.into(),
        }))
    }

    /// Creates a NotifyTask telling the event host that someone liked their event
    pub fn event_liked<H, E, U>(host: H, event: E, user: U) -> NotifyTask
    where
        H: Into<v1::User>,
        E: Into<v1::Event>,
        U: Into<v1::User>,
    {
        Self::V1(v1::Message::EventLiked(v1::EventLiked {
            host: host.into(),
            event: event.into(),
            user: user.into(),
        }))
    }

    pub fn as_kind_str(&self) -> &'static str {
        match self {
            NotifyTask::V1(message) => match message {
                v1::Message::ReservationRequested(_) => "reservation_requested",
                v1::Message::ReservationUpdated(_) => "reservation_updated",
                v1::Message::ReservationResponded(_) => "reservation_responded",
                v1::Message::ReservationCanceled(_) => "reservation_canceled",
                v1::Message::EventLiked(_) => "event_liked",
            },
        }
    }
}

#[cfg(feature = "client")]
impl From<db_storage::users::User> for v1::User {
    fn from(val: db_storage::users::User) -> Self {
        Self {
            email: val.email.into(),
            display_name: val.display_name,
        }
    }
}

#[cfg(feature = "client")]
impl From<db_storage::events::Event> for v1::Event {
    fn from(val: db_storage::events::Event) -> Self {
        Self {
            id: val.id.into_inner(),
            title: val.title,
            location: val.location,
            starts_at: val.starts_at,
            ends_at: val.ends_at,
        }
    }
}

#[cfg(feature = "client")]
impl From<db_storage::reservations::Reservation> for v1::Reservation {
    fn from(val: db_storage::reservations::Reservation) -> Self {
        let status = match val.status {
            db_storage::reservations::ReservationStatus::Pending => v1::ReservationStatus::Pending,
            db_storage::reservations::ReservationStatus::Confirmed => {
                v1::ReservationStatus::Confirmed
            }
            db_storage::reservations::ReservationStatus::Rejected => {
                v1::ReservationStatus::Rejected
            }
            db_storage::reservations::ReservationStatus::Canceled => {
                v1::ReservationStatus::Canceled
            }
        };

        Self {
            id: val.id.into_inner(),
            number_of_people: val.number_of_people,
            status,
        }
    }
}
