use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use service::config::ApiVersion;

/// Checks the `x-version` request header against the API versions this build
/// exposes. A missing header is treated as the current default version so
/// plain curl requests keep working.
pub(crate) struct CompareApiVersion(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let requested = match parts.headers.get(ApiVersion::field_name()) {
            Some(value) => value
                .to_str()
                .map_err(|_| invalid_version("<non-ascii>"))?
                .to_string(),
            None => ApiVersion::default_version().to_string(),
        };

        if ApiVersion::versions().contains(&requested.as_str()) {
            Ok(CompareApiVersion(requested))
        } else {
            Err(invalid_version(&requested))
        }
    }
}

fn invalid_version(requested: &str) -> RejectionType {
    (
        StatusCode::BAD_REQUEST,
        format!(
            "Unsupported API version \"{requested}\"; supported versions: {:?}",
            ApiVersion::versions()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_version(version: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/reviews");
        if let Some(version) = version {
            builder = builder.header(ApiVersion::field_name(), version);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_header_falls_back_to_the_default_version() {
        let mut parts = parts_with_version(None);

        let CompareApiVersion(version) =
            CompareApiVersion::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(version, ApiVersion::default_version());
    }

    #[tokio::test]
    async fn unsupported_versions_are_rejected() {
        let mut parts = parts_with_version(Some("99.0.0"));

        let result = CompareApiVersion::from_request_parts(&mut parts, &()).await;

        let (status, _message) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
