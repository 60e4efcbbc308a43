// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

mod reservations;

pub use reservations::{
    EventLiked, ReservationCanceled, ReservationRequested, ReservationResponded,
    ReservationUpdated,
};

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct Email(String);

impl Email {
    pub fn new(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Email {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for Email {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct User {
    pub email: Email,
    pub display_name: String,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub starts_at: Option<chrono::DateTime<Utc>>,
    pub ends_at: Option<chrono::DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Rejected,
    Canceled,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct Reservation {
    pub id: Uuid,
    pub number_of_people: i32,
    pub status: ReservationStatus,
}

/// The different kinds of NotifyTasks that are currently supported
#[derive(Deserialize, PartialEq, Debug)]
#[cfg_attr(any(test, feature = "client"), derive(Serialize))]
#[serde(tag = "message", rename_all = "snake_case")]
pub enum Message {
    /// Sent to the event host when a user requests a reservation
    ReservationRequested(ReservationRequested),
    /// Sent to the event host when a reservation was changed by its owner
    ReservationUpdated(ReservationUpdated),
    /// Sent to the attendee when the host answered their reservation request
    ReservationResponded(ReservationResponded),
    /// Sent to the counterpart when a reservation was canceled
    ReservationCanceled(ReservationCanceled),
    /// Sent to the event host when a user likes their event
    EventLiked(EventLiked),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::*;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_format() {
        let task = NotifyTask::V1(Message::ReservationRequested(ReservationRequested {
            host: User {
                email: "bob@example.org".into(),
                display_name: "Bob Host".into(),
            },
            event: Event {
                id: Uuid::from_u128(1),
                title: "Garden Party".into(),
                location: "Backyard".into(),
                starts_at: Some(
                    chrono::DateTime::<FixedOffset>::parse_from_rfc3339(
                        "2021-12-29T15:00:00+02:00",
                    )
                    .unwrap()
                    .into(),
                ),
                ends_at: None,
            },
            requester: User {
                email: "alice@example.org".into(),
                display_name: "Alice".into(),
            },
            reservation: Reservation {
                id: Uuid::from_u128(2),
                number_of_people: 3,
                status: ReservationStatus::Pending,
            },
        }));

        assert_eq!(
            task,
            serde_json::from_value(serde_json::json!({
                "version": "1",
                "message": "reservation_requested",
                "host": {
                    "email": "bob@example.org",
                    "display_name": "Bob Host"
                },
                "event": {
                    "id": Uuid::from_u128(1),
                    "title": "Garden Party",
                    "location": "Backyard",
                    "starts_at": "2021-12-29T15:00:00+02:00",
                    "ends_at": null
                },
                "requester": {
                    "email": "alice@example.org",
                    "display_name": "Alice"
                },
                "reservation": {
                    "id": Uuid::from_u128(2),
                    "number_of_people": 3,
                    "status": "pending"
                }
            }))
            .unwrap()
        );
    }

    #[test]
    fn test_responded_format() {
        let task = NotifyTask::V1(Message::ReservationResponded(ReservationResponded {
            attendee: User {
                email: "alice@example.org".into(),
                display_name: "Alice".into(),
            },
            event: Event {
                id: Uuid::from_u128(1),
                title: "Garden Party".into(),
                location: "Backyard".into(),
                starts_at: None,
                ends_at: None,
            },
            host: User {
                email: "bob@example.org".into(),
                display_name: "Bob Host".into(),
            },
            reservation: Reservation {
                id: Uuid::from_u128(2),
                number_of_people: 1,
                status: ReservationStatus::Confirmed,
            },
        }));

        assert_eq!(
            task,
            serde_json::from_value(serde_json::json!({
                "version": "1",
                "message": "reservation_responded",
                "attendee": {
                    "email": "alice@example.org",
                    "display_name": "Alice"
                },
                "event": {
                    "id": Uuid::from_u128(1),
                    "title": "Garden Party",
                    "location": "Backyard",
                    "starts_at": null,
                    "ends_at": null
                },
                "host": {
                    "email": "bob@example.org",
                    "display_name": "Bob Host"
                },
                "reservation": {
                    "id": Uuid::from_u128(2),
                    "number_of_people": 1,
                    "status": "confirmed"
                }
            }))
            .unwrap()
        );
    }
}
