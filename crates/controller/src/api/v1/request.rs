// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Pagination Query types
use serde::Deserialize;

/// Page-based pagination query
#[derive(Deserialize)]
pub struct PagePaginationQuery {
    #[serde(
        default = "default_pagination_per_page",
        deserialize_with = "deserialize_pagination_per_page"
    )]
    pub per_page: i64,
    #[serde(default = "default_pagination_page")]
    pub page: i64,
}

fn default_pagination_per_page() -> i64 {
    30
}

/// Enforce the per_page setting to be <=100
fn deserialize_pagination_per_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let per_page = i64::deserialize(deserializer)?;
    if (1..=100).contains(&per_page) {
        Ok(per_page)
    } else {
        Err(serde::de::Error::custom("per_page out of range"))
    }
}

fn default_pagination_page() -> i64 {
    1
}
