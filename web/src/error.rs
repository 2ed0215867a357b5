use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

extern crate log;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
                    }
                    EntityErrorKind::Invalid => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                    }
                    EntityErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT").into_response(),
                    EntityErrorKind::Unauthenticated => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
                    }
                    EntityErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                },
                InternalErrorKind::Config | InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => {
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
                // The classifier is a hard dependency of review mutations;
                // when it misbehaves the client sees a gateway failure, not
                // a silently unclassified review.
                ExternalErrorKind::Classification(_) => {
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
                ExternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::Validation(messages) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "status_code": u16::from(StatusCode::UNPROCESSABLE_ENTITY),
                    "errors": messages,
                })),
            )
                .into_response(),
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain_error(error_kind: DomainErrorKind) -> Error {
        Error(DomainError {
            source: None,
            error_kind,
        })
    }

    #[test]
    fn conflict_maps_to_409() {
        let response = domain_error(DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::Conflict,
        )))
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_422() {
        let response =
            domain_error(DomainErrorKind::Validation(vec!["review_text".to_string()]))
                .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn classifier_failures_map_to_502() {
        let response = domain_error(DomainErrorKind::External(
            ExternalErrorKind::Classification("rating 9 outside 1-5".to_string()),
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = domain_error(DomainErrorKind::Internal(InternalErrorKind::Entity(
            EntityErrorKind::NotFound,
        )))
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
