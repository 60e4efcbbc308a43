// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the user specific database structs and queries
use crate::schema::{user_profiles, users};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;
use serde::Serialize;

diesel_newtype! {
    #[derive(Copy)] UserId(uuid::Uuid) => diesel::sql_types::Uuid
}

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user column
#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
pub struct User {
    pub id: UserId,
    pub oidc_sub: String,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    #[serde(skip)]
    pub id_token_exp: i64,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        let user = users::table.filter(users::id.eq(user_id)).first(conn)?;

        Ok(user)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_by_oidc_sub(conn: &mut DbConnection, sub: &str) -> Result<Option<User>> {
        let user = users::table
            .filter(users::oidc_sub.eq(sub))
            .first(conn)
            .optional()?;

        Ok(user)
    }
}

/// Profile data which accompanies every user account
///
/// Account and profile are written in the same transaction on first login.
#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = user_profiles, primary_key(user_id), belongs_to(User, foreign_key = user_id))]
pub struct UserProfile {
    pub user_id: UserId,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

impl UserProfile {
    #[tracing::instrument(err, skip_all)]
    pub fn get(conn: &mut DbConnection, user_id: UserId) -> Result<UserProfile> {
        let profile = user_profiles::table
            .filter(user_profiles::user_id.eq(user_id))
            .first(conn)?;

        Ok(profile)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub oidc_sub: String,
    pub email: String,
    pub display_name: String,
    pub id_token_exp: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_profiles)]
pub struct NewUserProfile {
    pub user_id: UserId,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
}

/// A new user account with its initial profile
pub struct NewUserWithProfile {
    pub new_user: NewUser,
    pub avatar_url: Option<String>,
}

impl NewUserWithProfile {
    /// Inserts account and profile as a pair
    ///
    /// Both rows are written inside a single transaction so an account can
    /// never exist without its profile.
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        conn.transaction(|conn| {
            let user: User = self
                .new_user
                .insert_into(users::table)
                .get_result(conn)?;

            NewUserProfile {
                user_id: user.id,
                avatar_url: self.avatar_url,
                bio: None,
            }
            .insert_into(user_profiles::table)
            .execute(conn)?;

            Ok(user)
        })
    }
}

/// Diesel user struct for updates
///
/// Is used in update queries. None fields will be ignored on update queries
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub id_token_exp: Option<i64>,
}

impl UpdateUser {
    #[tracing::instrument(err, skip_all)]
    pub fn apply(self, conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        let query = diesel::update(users::table)
            .filter(users::id.eq(user_id))
            .set(self)
            .returning(users::all_columns);

        let user = query.get_result(conn)?;

        Ok(user)
    }
}
