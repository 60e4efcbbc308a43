// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! User related API structs and Endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the database crate [`db_storage`] for database operations.
use super::response::ApiError;
use super::ApiResponse;
use crate::api::v1::events::EventResource;
use crate::api::v1::reservations::ReservationResource;
use crate::settings::{Settings, SharedSettingsActix};
use actix_web::get;
use actix_web::web::{Data, Json, ReqData};
use database::Db;
use db_storage::reservations::Reservation;
use db_storage::users::{User, UserId, UserProfile};
use serde::Serialize;

/// Public user details.
///
/// Contains general "public" information about a user. Is accessible to all other users.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserProfile {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

impl PublicUserProfile {
    pub fn from_db(settings: &Settings, user: &User, avatar_url: Option<&str>) -> Self {
        let avatar_url = avatar_url.map(str::to_string).unwrap_or_else(|| {
            email_to_libravatar_url(&settings.avatar.libravatar_url, &user.email)
        });

        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            avatar_url,
        }
    }
}

pub fn email_to_libravatar_url(libravatar_url: &str, email: &str) -> String {
    format!("{}{:x}", libravatar_url, md5::compute(email))
}

/// Private user profile.
///
/// Similar to [`PublicUserProfile`], but contains additional "private" information about a user.
/// Is only accessible to the user himself.
/// Is used on */users/me* endpoints.
#[derive(Debug, Serialize)]
pub struct PrivateUserProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub is_admin: bool,
}

impl PrivateUserProfile {
    pub fn from_db(settings: &Settings, user: User, profile: UserProfile) -> Self {
        let avatar_url = profile.avatar_url.unwrap_or_else(|| {
            email_to_libravatar_url(&settings.avatar.libravatar_url, &user.email)
        });

        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_url,
            bio: profile.bio,
            is_admin: user.is_admin,
        }
    }
}

/// API Endpoint *GET /users/me*
///
/// Returns the [`PrivateUserProfile`] of the requesting user.
#[get("/users/me")]
pub async fn get_me(
    settings: SharedSettingsActix,
    db: Data<Db>,
    current_user: ReqData<User>,
) -> Result<Json<PrivateUserProfile>, ApiError> {
    let settings = settings.load_full();
    let current_user = current_user.into_inner();

    let (user, profile) = crate::block(move || -> Result<(User, UserProfile), ApiError> {
        let mut conn = db.get_conn()?;

        let profile = UserProfile::get(&mut conn, current_user.id)?;

        Ok((current_user, profile))
    })
    .await??;

    Ok(Json(PrivateUserProfile::from_db(&settings, user, profile)))
}

/// A reservation of the requesting user together with its event
#[derive(Debug, Serialize)]
pub struct UserReservation {
    pub reservation: ReservationResource,
    pub event: EventResource,
}

/// API Endpoint *GET /users/me/reservations*
///
/// Returns all reservations of the requesting user across events, newest
/// first, including terminal ones.
#[get("/users/me/reservations")]
pub async fn get_me_reservations(
    db: Data<Db>,
    current_user: ReqData<User>,
) -> Result<ApiResponse<Vec<UserReservation>>, ApiError> {
    let user_id = current_user.id;

    let reservations = crate::block(move || -> Result<Vec<UserReservation>, ApiError> {
        let mut conn = db.get_conn()?;

        let reservations = Reservation::get_for_user(&mut conn, user_id)?
            .into_iter()
            .map(|(reservation, event)| UserReservation {
                reservation: ReservationResource::from_db(reservation),
                event: EventResource::from_db(event),
            })
            .collect();

        Ok(reservations)
    })
    .await??;

    Ok(ApiResponse::new(reservations))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{DateTime, Utc};
    use db_storage::events::EventId;
    use db_storage::reservations::{ReservationId, ReservationStatus};
    use test_util::*;
    use uuid::Uuid;

    #[test]
    fn user_reservation_wire_shape() {
        let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339("2026-08-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let user_reservation = UserReservation {
            reservation: ReservationResource {
                id: ReservationId::from(Uuid::from_u128(1)),
                event_id: EventId::from(Uuid::from_u128(2)),
                user_id: UserId::from(Uuid::from_u128(3)),
                number_of_people: 3,
                status: ReservationStatus::Confirmed,
                created_at: timestamp,
                updated_at: timestamp,
            },
            event: EventResource {
                id: EventId::from(Uuid::from_u128(2)),
                title: "Garden party".into(),
                description: String::new(),
                location: String::new(),
                starts_at: None,
                ends_at: None,
                created_by: UserId::from(Uuid::from_u128(4)),
                created_at: timestamp,
                updated_at: timestamp,
                is_archived: false,
            },
        };

        assert_eq_json!(
            user_reservation,
            {
                "reservation": {
                    "id": "00000000-0000-0000-0000-000000000001",
                    "event_id": "00000000-0000-0000-0000-000000000002",
                    "user_id": "00000000-0000-0000-0000-000000000003",
                    "number_of_people": 3,
                    "status": "confirmed",
                    "created_at": "2026-08-01T10:00:00Z",
                    "updated_at": "2026-08-01T10:00:00Z"
                },
                "event": {
                    "id": "00000000-0000-0000-0000-000000000002",
                    "title": "Garden party",
                    "description": "",
                    "location": "",
                    "starts_at": null,
                    "ends_at": null,
                    "created_by": "00000000-0000-0000-0000-000000000004",
                    "created_at": "2026-08-01T10:00:00Z",
                    "updated_at": "2026-08-01T10:00:00Z",
                    "is_archived": false
                }
            }
        );
    }
}
