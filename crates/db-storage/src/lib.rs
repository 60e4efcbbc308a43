// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the database ORM and database migrations for the controller
//!
//! Builds upon gatherly-database

#[macro_use]
mod macros;
mod schema;

pub mod events;
pub mod guests;
pub mod migrations;
pub mod reservations;
pub mod toggles;
pub mod users;

/// SQL type representations used by the custom enum columns in [`schema`]
pub mod sql_types {
    pub use crate::guests::RsvpStatusType;
    pub use crate::reservations::ReservationStatusType;
    pub use crate::toggles::ToggleFieldType;
}
