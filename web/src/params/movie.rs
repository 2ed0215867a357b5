use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::params::review::{DEFAULT_LIMIT, DEFAULT_PAGE};

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    /// Case-insensitive substring match against movie titles.
    pub(crate) search: Option<String>,
    pub(crate) genre: Option<String>,
    pub(crate) page: Option<u64>,
    pub(crate) limit: Option<u64>,
}

impl IndexParams {
    pub(crate) fn page(&self) -> u64 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub(crate) fn limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CreateParams {
    pub(crate) title: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) image_url: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) runtime: Option<i32>,
    pub(crate) tmdb_id: Option<i64>,
}
