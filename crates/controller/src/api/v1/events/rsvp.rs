// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Rsvp endpoints of an event
//!
//! Guest entries are the attendance projection of an event. Entries created
//! here directly carry no display label; labels are owned by the reservation
//! approval flow.
use crate::api::v1::response::error::{ApiError, ValidationErrorEntry};
use crate::api::v1::response::{NoContent, CODE_INVALID_VALUE};
use crate::api::v1::users::PublicUserProfile;
use crate::api::v1::{ApiResponse, PagePaginationQuery};
use crate::settings::SharedSettingsActix;
use actix_web::web::{self, Data, Json, Path, ReqData};
use actix_web::{delete, get, post};
use chrono::{DateTime, Utc};
use database::Db;
use db_storage::events::{Event, EventId};
use db_storage::guests::{EventGuest, RsvpStatus, UpsertEventGuest};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};

/// A guest entry of an event
#[derive(Debug, Serialize)]
pub struct GuestResource {
    pub user: PublicUserProfile,
    pub rsvp: RsvpStatus,
    /// Display label for the guest list, e.g. `"Alice +2"` for a confirmed
    /// party of three. Falls back to the plain display name.
    pub display_label: String,
    pub updated_at: DateTime<Utc>,
}

impl GuestResource {
    pub fn from_db(settings: &crate::settings::Settings, guest: EventGuest, user: User) -> Self {
        let display_label = guest
            .display_label
            .unwrap_or_else(|| user.display_name.clone());

        Self {
            user: PublicUserProfile::from_db(settings, &user, None),
            rsvp: guest.rsvp,
            display_label,
            updated_at: guest.updated_at,
        }
    }
}

/// The JSON Body expected when making a *POST* request on `/events/{event_id}/rsvp`
#[derive(Debug, Deserialize)]
pub struct PostRsvpBody {
    pub status: RsvpStatus,
}

/// Rejects rsvp answers from the event creator
///
/// The creator never appears in their own guest list, same rule as the
/// guest-list replace on *PATCH /events/{event_id}*.
fn ensure_not_creator(created_by: UserId, user_id: UserId) -> Result<(), ApiError> {
    if created_by == user_id {
        return Err(ApiError::unprocessable_entities([
            ValidationErrorEntry::new("user_id", CODE_INVALID_VALUE, Some("guest_is_creator")),
        ]));
    }

    Ok(())
}

/// API Endpoint *POST /events/{event_id}/rsvp*
///
/// Creates or overwrites the guest entry of the requesting user for the
/// specified event. Answering twice is not an error, the previous answer is
/// replaced. The event creator cannot answer their own event. Returns the
/// updated guest list.
#[post("/events/{event_id}/rsvp")]
pub async fn upsert(
    settings: SharedSettingsActix,
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PostRsvpBody>,
) -> Result<Json<Vec<GuestResource>>, ApiError> {
    let settings = settings.load_full();
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();
    let status = body.into_inner().status;

    let guests = crate::block(move || -> Result<Vec<(EventGuest, User)>, ApiError> {
        let mut conn = db.get_conn()?;

        // surfaces NotFound for deleted events
        let event = Event::get(&mut conn, event_id)?;

        ensure_not_creator(event.created_by, current_user.id)?;

        UpsertEventGuest::new(event_id, current_user.id, status).apply(&mut conn)?;

        let guests = EventGuest::get_for_event(&mut conn, event_id)?;

        Ok(guests)
    })
    .await??;

    let guests = guests
        .into_iter()
        .map(|(guest, user)| GuestResource::from_db(&settings, guest, user))
        .collect::<Vec<GuestResource>>();

    Ok(Json(guests))
}

/// API Endpoint *GET /events/{event_id}/rsvp*
///
/// Returns the guest list of the specified event as a JSON array of
/// [`GuestResource`], in insertion order. Only the event creator or an
/// administrator may read it.
#[get("/events/{event_id}/rsvp")]
pub async fn get_guests(
    settings: SharedSettingsActix,
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    pagination: web::Query<PagePaginationQuery>,
) -> Result<ApiResponse<Vec<GuestResource>>, ApiError> {
    let settings = settings.load_full();
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();
    let PagePaginationQuery { per_page, page } = pagination.into_inner();

    let (guests, guest_count) = crate::block(move || -> Result<_, ApiError> {
        let mut conn = db.get_conn()?;

        let event = Event::get(&mut conn, event_id)?;

        if !event.is_created_by(current_user.id) && !current_user.is_admin {
            return Err(ApiError::forbidden()
                .with_message("Only the event creator can read the guest list"));
        }

        let guests_with_total =
            EventGuest::get_for_event_paginated(&mut conn, event_id, per_page, page)?;

        Ok(guests_with_total)
    })
    .await??;

    let guests = guests
        .into_iter()
        .map(|(guest, user)| GuestResource::from_db(&settings, guest, user))
        .collect::<Vec<GuestResource>>();

    Ok(ApiResponse::new(guests).with_page_pagination(per_page, page, guest_count))
}

/// API Endpoint *DELETE /events/{event_id}/rsvp/{user_id}*
///
/// Lets the event creator remove a guest entry from their event. Removing a
/// nonexistent entry is not an error.
#[delete("/events/{event_id}/rsvp/{user_id}")]
pub async fn delete(
    db: Data<Db>,
    current_user: ReqData<User>,
    path: Path<(EventId, UserId)>,
) -> Result<NoContent, ApiError> {
    let current_user = current_user.into_inner();
    let (event_id, user_id) = path.into_inner();

    crate::block(move || -> Result<(), ApiError> {
        let mut conn = db.get_conn()?;

        let event = Event::get(&mut conn, event_id)?;

        if !event.is_created_by(current_user.id) && !current_user.is_admin {
            return Err(ApiError::forbidden()
                .with_message("Only the event creator can remove guests"));
        }

        EventGuest::remove(&mut conn, event_id, user_id)?;

        Ok(())
    })
    .await??;

    Ok(NoContent)
}

#[cfg(test)]
mod test {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn creator_cannot_answer_own_event() {
        let creator = UserId::from(Uuid::from_u128(1));
        let guest = UserId::from(Uuid::from_u128(2));

        assert!(ensure_not_creator(creator, creator).is_err());
        assert!(ensure_not_creator(creator, guest).is_ok());
    }
}
