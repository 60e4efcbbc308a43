// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Auth related API structs and Endpoints
use super::response::error::AuthenticationError;
use super::response::ApiError;
use crate::oidc::{IdTokenInfo, OidcContext};
use actix_web::web::{Data, Json};
use actix_web::{get, post};
use database::Db;
use db_storage::users::{NewUser, NewUserWithProfile, UpdateUser, User};
use serde::{Deserialize, Serialize};

/// The JSON Body expected when making a *POST* request on `/auth/login`
#[derive(Debug, Deserialize)]
pub struct Login {
    id_token: String,
}

/// JSON Body of the response coming from the *POST* request on `/auth/login/`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Whether the login created a new user account
    new_user: bool,
}

/// API Endpoint *POST /auth/login*
///
/// Verifies the `id_token` inside the provided [`Json<Login>`] body. When the token is valid, a
/// database lookup for the requesting user is issued, if no user is found, a new user will be created.
#[post("/auth/login")]
pub async fn login(
    db: Data<Db>,
    oidc_ctx: Data<OidcContext>,
    body: Json<Login>,
) -> Result<Json<LoginResponse>, ApiError> {
    let id_token = body.into_inner().id_token;

    let info = match oidc_ctx.verify_id_token(&id_token) {
        Ok(info) => info,
        Err(e) => {
            log::warn!("Got invalid ID Token, {}", e);
            return Err(ApiError::unauthorized()
                .with_message(e.to_string())
                .with_www_authenticate(AuthenticationError::InvalidIdToken));
        }
    };

    let new_user = crate::block(move || -> Result<bool, ApiError> {
        let mut conn = db.get_conn()?;

        match User::get_by_oidc_sub(&mut conn, &info.sub)? {
            Some(user) => {
                UpdateUser {
                    email: Some(info.email.to_string()),
                    display_name: Some(display_name_from_token(&info)),
                    id_token_exp: Some(info.expiration.timestamp()),
                }
                .apply(&mut conn, user.id)?;

                Ok(false)
            }
            None => {
                NewUserWithProfile {
                    new_user: NewUser {
                        oidc_sub: info.sub.clone(),
                        email: info.email.to_string(),
                        display_name: display_name_from_token(&info),
                        id_token_exp: info.expiration.timestamp(),
                    },
                    avatar_url: None,
                }
                .insert(&mut conn)?;

                Ok(true)
            }
        }
    })
    .await??;

    Ok(Json(LoginResponse { new_user }))
}

/// Build the initial display name from the token claims
///
/// The nickname claim wins when the provider sets one.
fn display_name_from_token(info: &IdTokenInfo) -> String {
    match &info.nickname {
        Some(nickname) if !nickname.is_empty() => nickname.clone(),
        _ => format!("{} {}", info.firstname, info.lastname),
    }
}

/// Wrapper struct for the oidc provider
#[derive(Debug, Serialize, Eq, PartialEq, Hash)]
pub struct Provider {
    oidc: OidcProvider,
}

/// Represents an OIDC provider
#[derive(Debug, Serialize, Eq, PartialEq, Hash)]
pub struct OidcProvider {
    name: String,
    url: String,
}

/// API Endpoint *GET /auth/login*
///
/// Returns information about the OIDC provider
#[get("/auth/login")]
pub async fn oidc_provider(oidc_ctx: Data<OidcContext>) -> Json<Provider> {
    let provider = OidcProvider {
        name: "default".to_string(),
        url: oidc_ctx.provider_url(),
    };

    Json(Provider { oidc: provider })
}
