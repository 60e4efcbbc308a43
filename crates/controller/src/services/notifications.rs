// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! NotificationService
//!
//! Used to have a clean interface for the various kinds of notifications
//! that are issued from the Web-API and consumed by the notify worker.
use crate::settings::SharedSettings;
use anyhow::{Context, Result};
use db_storage::events::Event;
use db_storage::reservations::Reservation;
use db_storage::users::User;
use lapin_pool::RabbitMqChannel;
use notify_worker_proto::NotifyTask;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    settings: SharedSettings,
    rabbitmq_channel: Arc<RabbitMqChannel>,
}

impl NotificationService {
    pub fn new(settings: SharedSettings, rabbitmq_channel: Arc<RabbitMqChannel>) -> Self {
        Self {
            settings,
            rabbitmq_channel,
        }
    }

    async fn send_to_rabbitmq(&self, notify_task: NotifyTask) -> Result<()> {
        if let Some(queue_name) = &self.settings.load().rabbit_mq.notify_task_queue {
            self.rabbitmq_channel
                .basic_publish(
                    "",
                    queue_name,
                    Default::default(),
                    &serde_json::to_vec(&notify_task).context("Failed to serialize notify_task")?,
                    Default::default(),
                )
                .await?;
        }

        Ok(())
    }

    /// Publishes the notify task, logging and discarding publish failures
    ///
    /// Notifications are best effort, a broker outage must never fail the
    /// request that triggered the notification.
    async fn send_best_effort(&self, notify_task: NotifyTask) {
        let kind = notify_task.as_kind_str();

        if let Err(e) = self.send_to_rabbitmq(notify_task).await {
            log::error!("Failed to publish {} notification, {:?}", kind, e);
        }
    }

    /// Notifies the event host about a new reservation request
    pub async fn notify_reservation_requested(
        &self,
        host: User,
        event: Event,
        requester: User,
        reservation: Reservation,
    ) {
        self.send_best_effort(NotifyTask::reservation_requested(
            host,
            event,
            requester,
            reservation,
        ))
        .await;
    }

    /// Notifies the event host that a reservation was changed and awaits another approval
    pub async fn notify_reservation_updated(
        &self,
        host: User,
        event: Event,
        requester: User,
        reservation: Reservation,
    ) {
        self.send_best_effort(NotifyTask::reservation_updated(
            host,
            event,
            requester,
            reservation,
        ))
        .await;
    }

    /// Notifies the attendee that the host answered their reservation request
    pub async fn notify_reservation_responded(
        &self,
        attendee: User,
        event: Event,
        host: User,
        reservation: Reservation,
    ) {
        self.send_best_effort(NotifyTask::reservation_responded(
            attendee,
            event,
            host,
            reservation,
        ))
        .await;
    }

    /// Notifies the counterpart of a canceled reservation
    pub async fn notify_reservation_canceled(
        &self,
        recipient: User,
        event: Event,
        canceled_by: User,
        reservation: Reservation,
    ) {
        self.send_best_effort(NotifyTask::reservation_canceled(
            recipient,
            event,
            canceled_by,
            reservation,
        ))
        .await;
    }

    /// Notifies the event host that a user liked their event
    pub async fn notify_event_liked(&self, host: User, event: Event, user: User) {
        self.send_best_effort(NotifyTask::event_liked(host, event, user))
            .await;
    }
}
