// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::jwt;
use chrono::{DateTime, Utc};
use email_address::EmailAddress;
use serde::Deserialize;

/// Claims provided for a logged-in user
#[derive(Deserialize)]
pub struct UserClaims {
    /// Expires at
    #[serde(with = "time")]
    pub exp: DateTime<Utc>,
    /// Issued at
    #[serde(with = "time")]
    pub iat: DateTime<Utc>,
    /// Issuer (URL to the OIDC Provider)
    pub iss: String,
    /// Subject (User ID)
    pub sub: String,
    /// The users email
    pub email: EmailAddress,
    /// The users firstname
    pub given_name: String,
    /// The users lastname
    pub family_name: String,
    /// The users optional nickname
    pub nickname: Option<String>,
}

impl jwt::VerifyClaims for UserClaims {
    fn exp(&self) -> DateTime<Utc> {
        self.exp
    }
}

mod time {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds: i64 = Deserialize::deserialize(deserializer)?;

        Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
            serde::de::Error::custom(format!(
                "Failed to convert {} seconds to DateTime<Utc>",
                seconds
            ))
        })
    }
}
