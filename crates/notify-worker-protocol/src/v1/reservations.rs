// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::{Event, Reservation, User};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ReservationRequested {
    pub host: User,
    pub event: Event,
    pub requester: User,
    pub reservation: Reservation,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ReservationUpdated {
    pub host: User,
    pub event: Event,
    pub requester: User,
    pub reservation: Reservation,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ReservationResponded {
    pub attendee: User,
    pub event: Event,
    pub host: User,
    pub reservation: Reservation,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct ReservationCanceled {
    pub recipient: User,
    pub event: Event,
    pub canceled_by: User,
    pub reservation: Reservation,
}

#[derive(Deserialize, Serialize, PartialEq, Eq, Debug)]
pub struct EventLiked {
    pub host: User,
    pub event: Event,
    pub user: User,
}
