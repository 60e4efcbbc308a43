// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! REST API v1
//!
//! Current Endpoints. See their respective function:
//! - `/auth/login` ([GET](auth::oidc_provider), [POST](auth::login))
//! - `/events` ([GET](events::get_all), [POST](events::new))
//! - `/events/{event_id}` ([GET](events::get), [PATCH](events::patch), [DELETE](events::delete))
//! - `/events/{event_id}/rsvp` ([GET](events::rsvp::get_guests), [POST](events::rsvp::upsert))
//! - `/events/{event_id}/rsvp/{user_id}` ([DELETE](events::rsvp::delete))
//! - `/events/{event_id}/toggle` ([POST](events::toggle::toggle))
//! - `/events/{event_id}/reservations` ([GET](reservations::get_for_event))
//! - `/reservations/{event_id}` ([POST](reservations::new))
//! - `/reservations/{reservation_id}` ([PATCH](reservations::patch), [DELETE](reservations::cancel))
//! - `/reservations/{reservation_id}/respond` ([PUT](reservations::respond))
//! - `/users/me` ([GET](users::get_me))
//! - `/users/me/reservations` ([GET](users::get_me_reservations))

pub use request::PagePaginationQuery;
pub use response::ApiResponse;

pub mod auth;
pub mod events;
pub mod middleware;
mod request;
pub mod reservations;
pub mod response;
pub mod users;
mod util;
