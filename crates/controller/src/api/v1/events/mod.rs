// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event related API structs and Endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the database crate [`db_storage`] for database operations.
use super::response::error::{ApiError, ValidationErrorEntry};
use super::response::{NoContent, CODE_INVALID_VALUE};
use crate::api::v1::{ApiResponse, PagePaginationQuery};
use actix_web::web::{self, Data, Json, Path, ReqData};
use actix_web::{delete, get, patch, post};
use chrono::{DateTime, Utc};
use database::Db;
use db_storage::events::{Event, EventId, NewEvent, UpdateEvent};
use db_storage::guests::{EventGuest, RsvpStatus, UpsertEventGuest};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod rsvp;
pub mod toggle;

/// An Event
///
/// Contains all event information, accessible to every authenticated user.
#[derive(Debug, Serialize)]
pub struct EventResource {
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
}

impl EventResource {
    pub fn from_db(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            location: event.location,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
            created_by: event.created_by,
            created_at: event.created_at,
            updated_at: event.updated_at,
            is_archived: event.is_archived,
        }
    }
}

/// API request parameters to create a new event
#[derive(Debug, Validate, Deserialize)]
pub struct PostEventsBody {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 4096))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub location: String,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// Rejects time frames which end before they start
fn validate_time_frame(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(), ApiError> {
    if let (Some(starts_at), Some(ends_at)) = (starts_at, ends_at) {
        if ends_at < starts_at {
            return Err(ApiError::unprocessable_entities([
                ValidationErrorEntry::new(
                    "ends_at",
                    CODE_INVALID_VALUE,
                    Some("ends_at must not lie before starts_at"),
                ),
            ]));
        }
    }

    Ok(())
}

/// API Endpoint *POST /events*
///
/// Uses the provided [`PostEventsBody`] to create a new event.
/// Returns the created [`EventResource`].
#[post("/events")]
pub async fn new(
    db: Data<Db>,
    current_user: ReqData<User>,
    body: Json<PostEventsBody>,
) -> Result<Json<EventResource>, ApiError> {
    let current_user = current_user.into_inner();
    let event_parameters = body.into_inner();

    event_parameters.validate()?;
    validate_time_frame(event_parameters.starts_at, event_parameters.ends_at)?;

    let event = crate::block(move || -> database::Result<_> {
        let mut conn = db.get_conn()?;

        let new_event = NewEvent {
            title: event_parameters.title,
            description: event_parameters.description,
            location: event_parameters.location,
            starts_at: event_parameters.starts_at,
            ends_at: event_parameters.ends_at,
            created_by: current_user.id,
        };

        new_event.insert(&mut conn)
    })
    .await??;

    Ok(Json(EventResource::from_db(event)))
}

/// API Endpoint *GET /events*
///
/// Returns a JSON array of all non-deleted events as [`EventResource`]
#[get("/events")]
pub async fn get_all(
    db: Data<Db>,
    pagination: web::Query<PagePaginationQuery>,
) -> Result<ApiResponse<Vec<EventResource>>, ApiError> {
    let PagePaginationQuery { per_page, page } = pagination.into_inner();

    let (events, event_count) = crate::block(move || {
        let mut conn = db.get_conn()?;

        Event::get_all_paginated(&mut conn, per_page, page)
    })
    .await??;

    let events = events
        .into_iter()
        .map(EventResource::from_db)
        .collect::<Vec<EventResource>>();

    Ok(ApiResponse::new(events).with_page_pagination(per_page, page, event_count))
}

/// API Endpoint *GET /events/{event_id}*
///
/// Returns the specified event as [`EventResource`].
#[get("/events/{event_id}")]
pub async fn get(
    db: Data<Db>,
    event_id: Path<EventId>,
) -> Result<Json<EventResource>, ApiError> {
    let event_id = event_id.into_inner();

    let event = crate::block(move || {
        let mut conn = db.get_conn()?;

        Event::get(&mut conn, event_id)
    })
    .await??;

    Ok(Json(EventResource::from_db(event)))
}

/// A single guest entry inside a [`PatchEventsBody`] guest list
#[derive(Debug, Clone, Deserialize)]
pub struct GuestEntry {
    pub user_id: UserId,
    #[serde(default)]
    pub rsvp: RsvpStatus,
}

/// API request parameters to patch an event
#[derive(Debug, Validate, Deserialize)]
pub struct PatchEventsBody {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "super::util::deserialize_some")]
    pub starts_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "super::util::deserialize_some")]
    pub ends_at: Option<Option<DateTime<Utc>>>,
    pub is_archived: Option<bool>,
    /// When set, the complete guest list of the event is replaced
    pub guests: Option<Vec<GuestEntry>>,
}

impl PatchEventsBody {
    fn is_empty(&self) -> bool {
        let PatchEventsBody {
            title,
            description,
            location,
            starts_at,
            ends_at,
            is_archived,
            guests,
        } = self;

        title.is_none()
            && description.is_none()
            && location.is_none()
            && starts_at.is_none()
            && ends_at.is_none()
            && is_archived.is_none()
            && guests.is_none()
    }
}

/// Validates a replacement guest list against an event
///
/// The creator must not appear in their own guest list and no user may be
/// listed twice.
fn validate_guest_list(guests: &[GuestEntry], created_by: UserId) -> Result<(), ApiError> {
    let mut seen = std::collections::HashSet::new();
    let mut entries = Vec::new();

    for guest in guests {
        if guest.user_id == created_by {
            entries.push(ValidationErrorEntry::new(
                "guests",
                CODE_INVALID_VALUE,
                Some("guest_is_creator"),
            ));
            break;
        }
    }

    for guest in guests {
        if !seen.insert(guest.user_id) {
            entries.push(ValidationErrorEntry::new(
                "guests",
                CODE_INVALID_VALUE,
                Some("duplicate_guest"),
            ));
            break;
        }
    }

    if entries.is_empty() {
        Ok(())
    } else {
        Err(ApiError::unprocessable_entities(entries))
    }
}

/// API Endpoint *PATCH /events/{event_id}*
///
/// Uses the provided [`PatchEventsBody`] to modify a specified event. Only the
/// creator of the event or an administrator may modify it.
/// Returns the modified [`EventResource`]
#[patch("/events/{event_id}")]
pub async fn patch(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PatchEventsBody>,
) -> Result<Json<EventResource>, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();
    let modify_event = body.into_inner();

    if modify_event.is_empty() {
        let event = crate::block(move || {
            let mut conn = db.get_conn()?;

            Event::get(&mut conn, event_id)
        })
        .await??;

        return Ok(Json(EventResource::from_db(event)));
    }

    modify_event.validate()?;

    let event = crate::block(move || -> Result<Event, ApiError> {
        let mut conn = db.get_conn()?;

        let event = Event::get(&mut conn, event_id)?;

        if !event.is_created_by(current_user.id) && !current_user.is_admin {
            return Err(ApiError::forbidden()
                .with_message("Only the event creator can modify the event"));
        }

        let starts_at = modify_event.starts_at.unwrap_or(event.starts_at);
        let ends_at = modify_event.ends_at.unwrap_or(event.ends_at);
        validate_time_frame(starts_at, ends_at)?;

        if let Some(guests) = modify_event.guests {
            validate_guest_list(&guests, event.created_by)?;

            let guests = guests
                .into_iter()
                .map(|guest| UpsertEventGuest::new(event_id, guest.user_id, guest.rsvp))
                .collect();

            EventGuest::replace_all(&mut conn, event_id, guests)?;
        }

        let changeset = UpdateEvent {
            title: modify_event.title,
            description: modify_event.description,
            location: modify_event.location,
            starts_at: modify_event.starts_at,
            ends_at: modify_event.ends_at,
            is_archived: modify_event.is_archived,
            updated_at: Utc::now(),
        };

        let event = changeset.apply(&mut conn, event_id)?;

        Ok(event)
    })
    .await??;

    Ok(Json(EventResource::from_db(event)))
}

/// API Endpoint *DELETE /events/{event_id}*
///
/// Marks the event as deleted. Attendance data is kept but the event vanishes
/// from all read paths. Only the creator or an administrator may delete it.
#[delete("/events/{event_id}")]
pub async fn delete(
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<NoContent, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        let event = Event::get(&mut conn, event_id)?;

        if !event.is_created_by(current_user.id) && !current_user.is_admin {
            return Err(ApiError::forbidden()
                .with_message("Only the event creator can delete the event"));
        }

        Event::soft_delete_by_id(&mut conn, event_id)?;

        Ok(())
    })
    .await??;

    Ok(NoContent)
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    fn user(id: u128) -> UserId {
        UserId::from(Uuid::from_u128(id))
    }

    #[test]
    fn guest_list_rejects_creator() {
        let creator = user(1);
        let guests = vec![GuestEntry {
            user_id: creator,
            rsvp: RsvpStatus::Yes,
        }];

        assert!(validate_guest_list(&guests, creator).is_err());
    }

    #[test]
    fn guest_list_rejects_duplicates() {
        let guests = vec![
            GuestEntry {
                user_id: user(2),
                rsvp: RsvpStatus::Yes,
            },
            GuestEntry {
                user_id: user(2),
                rsvp: RsvpStatus::No,
            },
        ];

        assert!(validate_guest_list(&guests, user(1)).is_err());
    }

    #[test]
    fn guest_list_accepts_distinct_guests() {
        let guests = vec![
            GuestEntry {
                user_id: user(2),
                rsvp: RsvpStatus::Yes,
            },
            GuestEntry {
                user_id: user(3),
                rsvp: RsvpStatus::Maybe,
            },
        ];

        assert!(validate_guest_list(&guests, user(1)).is_ok());
    }

    #[test]
    fn time_frame_must_be_ordered() {
        let starts_at = Some(Utc::now());
        let ends_at = starts_at.map(|t| t - chrono::Duration::hours(1));

        assert!(validate_time_frame(starts_at, ends_at).is_err());
        assert!(validate_time_frame(ends_at, starts_at).is_ok());
        assert!(validate_time_frame(starts_at, None).is_ok());
    }
}
