// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Reservation related API structs and Endpoints
//!
//! Reservations are party-size bookings with a host approval workflow. A
//! confirmed reservation is mirrored into the guest list of its event; every
//! transition away from confirmed removes that mirror entry again, in the
//! same database transaction as the status change.
use super::events::rsvp::GuestResource;
use super::response::{ApiError, NoContent};
use super::users::PublicUserProfile;
use super::ApiResponse;
use crate::services::NotificationService;
use crate::settings::SharedSettingsActix;
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, get, patch, post, put};
use chrono::{DateTime, Utc};
use database::Db;
use diesel::Connection;
use db_storage::events::{Event, EventId};
use db_storage::guests::{EventGuest, RsvpStatus, UpsertEventGuest};
use db_storage::reservations::{
    aggregated_label, NewReservation, Reservation, ReservationId, ReservationStatus,
    UpdateReservation,
};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Error code for a second active reservation on the same event
const CODE_ALREADY_RESERVED: &str = "already_reserved";
/// Error code for operations on a reservation in a terminal state
const CODE_RESERVATION_CLOSED: &str = "reservation_closed";

/// A reservation
#[derive(Debug, Serialize)]
pub struct ReservationResource {
    pub id: ReservationId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub number_of_people: i32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReservationResource {
    pub fn from_db(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            event_id: reservation.event_id,
            user_id: reservation.user_id,
            number_of_people: reservation.number_of_people,
            status: reservation.status,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

/// The JSON Body expected when making a *POST* request on `/reservations/{event_id}`
#[derive(Debug, Validate, Deserialize)]
pub struct PostReservationBody {
    #[validate(range(min = 1))]
    pub number_of_people: i32,
}

/// API Endpoint *POST /reservations/{event_id}*
///
/// Creates a pending reservation for the requesting user on the specified
/// event. A user holds at most one active (pending or confirmed) reservation
/// per event; a second request is answered with a conflict. The event host is
/// notified about the new request.
#[post("/reservations/{event_id}")]
pub async fn new(
    db: Data<Db>,
    notification_service: Data<NotificationService>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PostReservationBody>,
) -> Result<Json<ReservationResource>, ApiError> {
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();
    let reservation_parameters = body.into_inner();

    reservation_parameters.validate()?;

    let (reservation, event, host, requester) = crate::block(
        move || -> Result<(Reservation, Event, User, User), ApiError> {
            let mut conn = db.get_conn()?;

            let event = Event::get(&mut conn, event_id)?;

            if event.is_created_by(current_user.id) {
                return Err(ApiError::forbidden()
                    .with_message("The event creator cannot reserve for their own event"));
            }

            let new_reservation = NewReservation {
                event_id,
                user_id: current_user.id,
                number_of_people: reservation_parameters.number_of_people,
            };

            let reservation = match new_reservation.try_insert(&mut conn)? {
                Some(reservation) => reservation,
                None => {
                    return Err(ApiError::conflict()
                        .with_code(CODE_ALREADY_RESERVED)
                        .with_message("An active reservation for this event already exists"));
                }
            };

            let host = User::get(&mut conn, event.created_by)?;

            Ok((reservation, event, host, current_user))
        },
    )
    .await??;

    notification_service
        .notify_reservation_requested(host, event, requester, reservation.clone())
        .await;

    Ok(Json(ReservationResource::from_db(reservation)))
}

/// The JSON Body expected when making a *PATCH* request on `/reservations/{reservation_id}`
#[derive(Debug, Validate, Deserialize)]
pub struct PatchReservationBody {
    #[validate(range(min = 1))]
    pub number_of_people: i32,
}

/// API Endpoint *PATCH /reservations/{reservation_id}*
///
/// Changes the party size of a reservation. Only the reservation owner may do
/// this. Changing a confirmed reservation moves it back to pending and drops
/// its guest entry, the host has to approve the new party size. Terminal
/// reservations cannot be changed.
#[patch("/reservations/{reservation_id}")]
pub async fn patch(
    db: Data<Db>,
    notification_service: Data<NotificationService>,
    current_user: ReqData<User>,
    reservation_id: Path<ReservationId>,
    body: Json<PatchReservationBody>,
) -> Result<Json<ReservationResource>, ApiError> {
    let current_user = current_user.into_inner();
    let reservation_id = reservation_id.into_inner();
    let modify_reservation = body.into_inner();

    modify_reservation.validate()?;

    let (reservation, event, host, requester) = crate::block(
        move || -> Result<(Reservation, Event, User, User), ApiError> {
            let mut conn = db.get_conn()?;

            let (reservation, event) = Reservation::get_with_event(&mut conn, reservation_id)?;

            if reservation.user_id != current_user.id {
                return Err(ApiError::forbidden()
                    .with_message("Only the reservation owner can change the reservation"));
            }

            if reservation.status.is_terminal() {
                return Err(ApiError::conflict()
                    .with_code(CODE_RESERVATION_CLOSED)
                    .with_message("The reservation has reached a terminal state"));
            }

            let reservation = conn.transaction(|conn| -> database::Result<Reservation> {
                // a confirmed reservation goes through approval again
                let status = if reservation.status == ReservationStatus::Confirmed {
                    EventGuest::remove(conn, reservation.event_id, reservation.user_id)?;
                    Some(ReservationStatus::Pending)
                } else {
                    None
                };

                UpdateReservation {
                    number_of_people: Some(modify_reservation.number_of_people),
                    status,
                    updated_at: Utc::now(),
                }
                .apply(conn, reservation_id)
            })?;

            let host = User::get(&mut conn, event.created_by)?;

            Ok((reservation, event, host, current_user))
        },
    )
    .await??;

    notification_service
        .notify_reservation_updated(host, event, requester, reservation.clone())
        .await;

    Ok(Json(ReservationResource::from_db(reservation)))
}

/// The answer of a host to a pending reservation
///
/// Only the two host-answerable target states are accepted, any other status
/// value is rejected during deserialization.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespondStatus {
    Confirmed,
    Rejected,
}

/// The JSON Body expected when making a *PUT* request on `/reservations/{reservation_id}/respond`
#[derive(Debug, Deserialize)]
pub struct PutRespondBody {
    pub status: RespondStatus,
}

/// JSON Body of the response coming from the *PUT* request on `/reservations/{reservation_id}/respond`
#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub reservation: ReservationResource,
    pub guests: Vec<GuestResource>,
}

/// API Endpoint *PUT /reservations/{reservation_id}/respond*
///
/// Lets the event host answer a pending reservation. Confirming writes the
/// guest entry with its aggregated party label in the same transaction as the
/// status change. The attendee is notified about the answer.
/// Returns the updated reservation together with the guest list of the event.
#[put("/reservations/{reservation_id}/respond")]
pub async fn respond(
    settings: SharedSettingsActix,
    db: Data<Db>,
    notification_service: Data<NotificationService>,
    current_user: ReqData<User>,
    reservation_id: Path<ReservationId>,
    body: Json<PutRespondBody>,
) -> Result<Json<RespondResponse>, ApiError> {
    let settings = settings.load_full();
    let current_user = current_user.into_inner();
    let reservation_id = reservation_id.into_inner();
    let status = body.into_inner().status;

    let (reservation, event, host, attendee, guests) = crate::block(
        move || -> Result<(Reservation, Event, User, User, Vec<(EventGuest, User)>), ApiError> {
            let mut conn = db.get_conn()?;

            let (reservation, event) = Reservation::get_with_event(&mut conn, reservation_id)?;

            if !event.is_created_by(current_user.id) && !current_user.is_admin {
                return Err(ApiError::forbidden()
                    .with_message("Only the event creator can respond to reservations"));
            }

            let next_status = match status {
                RespondStatus::Confirmed => ReservationStatus::Confirmed,
                RespondStatus::Rejected => ReservationStatus::Rejected,
            };

            if !reservation.status.can_transition_to(next_status) {
                return Err(ApiError::conflict()
                    .with_code(CODE_RESERVATION_CLOSED)
                    .with_message("The reservation cannot be answered in its current state"));
            }

            let attendee = User::get(&mut conn, reservation.user_id)?;

            let reservation = conn.transaction(|conn| -> database::Result<Reservation> {
                if next_status == ReservationStatus::Confirmed {
                    let label = aggregated_label(
                        &attendee.display_name,
                        reservation.number_of_people,
                    );

                    UpsertEventGuest::new(reservation.event_id, reservation.user_id, RsvpStatus::Yes)
                        .with_display_label(label)
                        .apply(conn)?;
                }

                UpdateReservation {
                    number_of_people: None,
                    status: Some(next_status),
                    updated_at: Utc::now(),
                }
                .apply(conn, reservation_id)
            })?;

            let guests = EventGuest::get_for_event(&mut conn, reservation.event_id)?;

            Ok((reservation, event, current_user, attendee, guests))
        },
    )
    .await??;

    notification_service
        .notify_reservation_responded(attendee, event, host, reservation.clone())
        .await;

    let guests = guests
        .into_iter()
        .map(|(guest, user)| GuestResource::from_db(&settings, guest, user))
        .collect();

    Ok(Json(RespondResponse {
        reservation: ReservationResource::from_db(reservation),
        guests,
    }))
}

/// API Endpoint *DELETE /reservations/{reservation_id}*
///
/// Cancels a reservation. Both the owner and the event host may cancel; the
/// respective counterpart is notified. Canceling a confirmed reservation
/// drops its guest entry in the same transaction. Terminal reservations
/// cannot be canceled again.
#[delete("/reservations/{reservation_id}")]
pub async fn cancel(
    db: Data<Db>,
    notification_service: Data<NotificationService>,
    current_user: ReqData<User>,
    reservation_id: Path<ReservationId>,
) -> Result<NoContent, ApiError> {
    let current_user = current_user.into_inner();
    let reservation_id = reservation_id.into_inner();

    let (reservation, event, recipient, canceled_by) = crate::block(
        move || -> Result<(Reservation, Event, User, User), ApiError> {
            let mut conn = db.get_conn()?;

            let (reservation, event) = Reservation::get_with_event(&mut conn, reservation_id)?;

            let is_owner = reservation.user_id == current_user.id;
            let is_host = event.is_created_by(current_user.id) || current_user.is_admin;

            if !is_owner && !is_host {
                return Err(ApiError::forbidden()
                    .with_message("Only the reservation owner or the event creator can cancel"));
            }

            if !reservation
                .status
                .can_transition_to(ReservationStatus::Canceled)
            {
                return Err(ApiError::conflict()
                    .with_code(CODE_RESERVATION_CLOSED)
                    .with_message("The reservation has reached a terminal state"));
            }

            let reservation = conn.transaction(|conn| -> database::Result<Reservation> {
                if reservation.status == ReservationStatus::Confirmed {
                    EventGuest::remove(conn, reservation.event_id, reservation.user_id)?;
                }

                UpdateReservation {
                    number_of_people: None,
                    status: Some(ReservationStatus::Canceled),
                    updated_at: Utc::now(),
                }
                .apply(conn, reservation_id)
            })?;

            // notify the side that did not cancel
            let recipient = if is_owner {
                User::get(&mut conn, event.created_by)?
            } else {
                User::get(&mut conn, reservation.user_id)?
            };

            Ok((reservation, event, recipient, current_user))
        },
    )
    .await??;

    notification_service
        .notify_reservation_canceled(recipient, event, canceled_by, reservation)
        .await;

    Ok(NoContent)
}

/// A reservation of an event together with its requesting user
#[derive(Debug, Serialize)]
pub struct EventReservation {
    pub reservation: ReservationResource,
    pub user: PublicUserProfile,
}

/// API Endpoint *GET /events/{event_id}/reservations*
///
/// Returns all reservations of the specified event, including terminal ones,
/// oldest first. Only the event creator or an administrator may list them.
#[get("/events/{event_id}/reservations")]
pub async fn get_for_event(
    settings: SharedSettingsActix,
    db: Data<Db>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<ApiResponse<Vec<EventReservation>>, ApiError> {
    let settings = settings.load_full();
    let current_user = current_user.into_inner();
    let event_id = event_id.into_inner();

    let reservations = crate::block(move || -> Result<Vec<(Reservation, User)>, ApiError> {
        let mut conn = db.get_conn()?;

        let event = Event::get(&mut conn, event_id)?;

        if !event.is_created_by(current_user.id) && !current_user.is_admin {
            return Err(ApiError::forbidden()
                .with_message("Only the event creator can list reservations"));
        }

        let reservations = Reservation::get_for_event(&mut conn, event_id)?;

        Ok(reservations)
    })
    .await??;

    let reservations = reservations
        .into_iter()
        .map(|(reservation, user)| EventReservation {
            reservation: ReservationResource::from_db(reservation),
            user: PublicUserProfile::from_db(&settings, &user, None),
        })
        .collect::<Vec<EventReservation>>();

    Ok(ApiResponse::new(reservations))
}
