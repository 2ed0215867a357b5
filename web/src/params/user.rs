use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct RegisterParams {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

/// Email/password pair presented at login.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}
