// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Toggle endpoints of an event
//!
//! Likes, going and interested are independent sets per event. A toggle flips
//! membership of the requesting user in exactly one of them.
use crate::api::v1::response::ApiError;
use crate::services::NotificationService;
use actix_web::post;
use actix_web::web::{Data, Json, Path, ReqData};
use database::Db;
use db_storage::events::{Event, EventId};
use db_storage::toggles::{EventToggle, ToggleField};
use db_storage::users::User;
use serde::{Deserialize, Serialize};

/// The JSON Body expected when making a *POST* request on `/events/{event_id}/toggle`
#[derive(Debug, Deserialize)]
pub struct PostToggleBody {
    pub field: ToggleField,
}

/// JSON Body of the response coming from the *POST* request on `/events/{event_id}/toggle`
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub field: ToggleField,
    /// Whether the requesting user is a member of the set after the call
    pub active: bool,
}

/// API Endpoint *POST /events/{event_id}/toggle*
///
/// Flips membership of the requesting user in the toggle set named by the
/// body. Toggling twice restores the previous state. The event creator is
/// notified when someone else likes their event.
#[post("/events/{event_id}/toggle")]
pub async fn toggle(
    db: Data<Db>,
    notification_service: Data<NotificationService>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PostToggleBody>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();
    let field = body.into_inner().field;

    let (event, host, user, active) =
        crate::block(move || -> Result<(Event, User, User, bool), ApiError> {
            let mut conn = db.get_conn()?;

            let event = Event::get(&mut conn, event_id)?;
            let host = User::get(&mut conn, event.created_by)?;

            let active = EventToggle::toggle(&mut conn, event_id, current_user.id, field)?;

            Ok((event, host, current_user, active))
        })
        .await??;

    if matches!(field, ToggleField::Likes) && active && !event.is_created_by(user.id) {
        notification_service
            .notify_event_liked(host, event, user)
            .await;
    }

    Ok(Json(ToggleResponse { field, active }))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn toggle_body_rejects_unknown_field() {
        assert!(serde_json::from_str::<PostToggleBody>(r#"{"field":"bogus"}"#).is_err());

        let body: PostToggleBody = serde_json::from_str(r#"{"field":"going"}"#).unwrap();
        assert!(matches!(body.field, ToggleField::Going));
    }
}
