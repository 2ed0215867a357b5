//! HTTP client for the sentiment classification service.
//!
//! The classifier owns the review rating entirely: clients never send a star
//! rating, they send text, and this gateway returns the sentiment label, a
//! confidence score and the derived 1-5 rating in a single call.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use entity::sentiment::Sentiment;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;
use std::time::Duration;

/// Result of classifying one piece of review text.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub sentiment: Sentiment,
    /// Model confidence as a percentage, 0.0 to 100.0.
    pub sentiment_score: f64,
    /// Star rating derived by the classifier, 1 to 5.
    pub rating: i16,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    sentiment: String,
    sentiment_score: f64,
    rating: i16,
}

/// Classify review text by calling the classifier's `/predict` endpoint.
///
/// Any failure here (timeout, non-2xx, malformed body, out-of-range values)
/// fails the review mutation that requested it. There is no fallback rating.
pub async fn classify(config: &Config, text: &str) -> Result<Classification, Error> {
    let url = format!("{}/predict", config.sentiment_api_url());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.sentiment_api_timeout_secs))
        .build()?;

    debug!("Requesting classification for {} chars of text", text.len());

    let response = client
        .post(&url)
        .json(&ClassifyRequest { text })
        .send()
        .await
        .map_err(|e| {
            warn!("Failed to reach sentiment classifier: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!("Sentiment classifier returned {}: {}", status, error_text);
        return Err(Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Classification(format!(
                "classifier returned HTTP {status}"
            ))),
        });
    }

    let body: ClassifyResponse = response.json().await.map_err(|e| {
        warn!("Failed to parse classifier response: {:?}", e);
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Classification(
                "invalid response body from classifier".to_string(),
            )),
        }
    })?;

    validate_classification(body)
}

/// Range-check the classifier's answer before it flows into persistence. A
/// misbehaving model must never produce a stored rating outside 1-5 or a
/// score outside 0-100.
fn validate_classification(body: ClassifyResponse) -> Result<Classification, Error> {
    let sentiment = match body.sentiment.as_str() {
        "positive" => Sentiment::Positive,
        "neutral" => Sentiment::Neutral,
        "negative" => Sentiment::Negative,
        other => {
            return Err(classification_error(format!(
                "unknown sentiment label \"{other}\""
            )))
        }
    };

    if !(0.0..=100.0).contains(&body.sentiment_score) || !body.sentiment_score.is_finite() {
        return Err(classification_error(format!(
            "sentiment_score {} outside 0-100",
            body.sentiment_score
        )));
    }

    if !(1..=5).contains(&body.rating) {
        return Err(classification_error(format!(
            "rating {} outside 1-5",
            body.rating
        )));
    }

    Ok(Classification {
        sentiment,
        sentiment_score: body.sentiment_score,
        rating: body.rating,
    })
}

fn classification_error(message: String) -> Error {
    warn!("Rejecting classifier response: {message}");
    Error {
        source: None,
        error_kind: DomainErrorKind::External(ExternalErrorKind::Classification(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use service::config::Config;

    fn config_for(server_url: &str) -> Config {
        Config::default().set_sentiment_api_url(server_url.to_string())
    }

    #[tokio::test]
    async fn classify_returns_a_classification_on_success() {
        let mut server = Server::new_async().await;
        let config = config_for(&server.url());

        let _mock = server
            .mock("POST", "/predict")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "text": "An absolute triumph of a film."
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sentiment": "positive", "sentiment_score": 97.0, "rating": 5}"#)
            .create_async()
            .await;

        let classification = classify(&config, "An absolute triumph of a film.")
            .await
            .expect("classification should succeed");

        assert_eq!(classification.sentiment, Sentiment::Positive);
        assert_eq!(classification.sentiment_score, 97.0);
        assert_eq!(classification.rating, 5);
    }

    #[tokio::test]
    async fn classify_maps_server_errors_to_classification_errors() {
        let mut server = Server::new_async().await;
        let config = config_for(&server.url());

        let _mock = server
            .mock("POST", "/predict")
            .with_status(500)
            .with_body(r#"{"detail": "model not loaded"}"#)
            .create_async()
            .await;

        let err = classify(&config, "Some review text here.")
            .await
            .expect_err("non-2xx should fail");

        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Classification(_)) => {}
            other => panic!("Expected Classification error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn classify_rejects_malformed_bodies() {
        let mut server = Server::new_async().await;
        let config = config_for(&server.url());

        let _mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"label": "positive"}"#)
            .create_async()
            .await;

        let err = classify(&config, "Some review text here.")
            .await
            .expect_err("malformed body should fail");

        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Classification(_)) => {}
            other => panic!("Expected Classification error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn classify_rejects_out_of_range_values() {
        let mut server = Server::new_async().await;
        let config = config_for(&server.url());

        let _mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sentiment": "positive", "sentiment_score": 97.0, "rating": 9}"#)
            .create_async()
            .await;

        let err = classify(&config, "Some review text here.")
            .await
            .expect_err("rating outside 1-5 should fail");

        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Classification(_)) => {}
            other => panic!("Expected Classification error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn classify_rejects_unknown_sentiment_labels() {
        let mut server = Server::new_async().await;
        let config = config_for(&server.url());

        let _mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sentiment": "ecstatic", "sentiment_score": 80.0, "rating": 4}"#)
            .create_async()
            .await;

        let err = classify(&config, "Some review text here.")
            .await
            .expect_err("unknown label should fail");

        match err.error_kind {
            DomainErrorKind::External(ExternalErrorKind::Classification(message)) => {
                assert!(message.contains("ecstatic"));
            }
            other => panic!("Expected Classification error, got: {:?}", other),
        }
    }
}
