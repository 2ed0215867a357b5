pub mod sentiment_api;
