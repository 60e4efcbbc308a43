// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use anyhow::Result;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_executor_trait::Tokio as TokioExecutor;
use tokio_reactor_trait::Tokio as TokioReactor;

/// [`lapin::Channel`] wrapper handed out by the pool
pub struct RabbitMqChannel {
    channel: lapin::Channel,
}

impl Deref for RabbitMqChannel {
    type Target = lapin::Channel;

    fn deref(&self) -> &Self::Target {
        &self.channel
    }
}

impl DerefMut for RabbitMqChannel {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.channel
    }
}

/// RabbitMQ connection handle which lazily establishes its connection
///
/// The connection is created on the first channel request and replaced
/// transparently once it is no longer usable, so a broker restart does not
/// require a service restart.
pub struct RabbitMqPool {
    url: String,
    connection: Mutex<Option<lapin::Connection>>,
}

impl RabbitMqPool {
    pub fn from_config(url: &str) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            connection: Mutex::new(None),
        })
    }

    async fn make_connection(&self) -> Result<lapin::Connection> {
        let connection = lapin::Connection::connect(
            &self.url,
            lapin::ConnectionProperties::default()
                .with_executor(TokioExecutor::current())
                .with_reactor(TokioReactor),
        )
        .await?;

        Ok(connection)
    }

    /// Create a rabbitmq channel on the managed connection
    ///
    /// Connects first if there is no usable connection yet.
    pub async fn create_channel(&self) -> Result<RabbitMqChannel> {
        let mut connection = self.connection.lock().await;

        let usable = matches!(
            connection.as_ref().map(lapin::Connection::status),
            Some(status) if status.connected()
        );

        if !usable {
            if connection.is_some() {
                log::warn!("rabbitmq connection no longer usable, reconnecting");
            }

            *connection = Some(self.make_connection().await?);
        }

        // unwrap is fine, the branch above just filled the slot
        let channel = connection.as_ref().unwrap().create_channel().await?;

        Ok(RabbitMqChannel { channel })
    }

    /// Close the managed connection with the given code and message
    pub async fn close(&self, reply_code: u16, reply_message: &str) -> Result<()> {
        let mut connection = self.connection.lock().await;

        if let Some(connection) = connection.take() {
            connection.close(reply_code, reply_message).await?;
        }

        Ok(())
    }
}
