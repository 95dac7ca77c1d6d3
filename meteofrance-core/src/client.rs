use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;

use crate::model::Rain;

pub const DEFAULT_BASE_URL: &str = "https://webservice.meteofrance.com";

/// Descriptions come back in French for `fr`, in English for anything else.
pub const DEFAULT_LANGUAGE: &str = "fr";

#[async_trait]
pub trait RainProvider: Send + Sync + Debug {
    /// Next-hour rain forecast at a GPS point.
    ///
    /// `Ok(None)` means the point is outside rain-radar coverage.
    async fn get_rain(
        &self,
        latitude: f64,
        longitude: f64,
        language: &str,
    ) -> Result<Option<Rain>>;
}

/// Thin HTTP client for the Météo-France REST API.
///
/// It only fetches documents; retries and caching are left to the caller.
#[derive(Debug, Clone)]
pub struct MeteoFranceClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl MeteoFranceClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_rain(
        &self,
        latitude: f64,
        longitude: f64,
        language: &str,
    ) -> Result<Option<Rain>> {
        let url = format!("{}/v3/rain", self.base_url);

        let mut query = vec![
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("lang", language.to_string()),
        ];
        if let Some(token) = &self.token {
            query.push(("token", token.clone()));
        }

        tracing::debug!(latitude, longitude, language, "requesting rain forecast");

        let res = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to send request to Météo-France (rain)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Météo-France rain response body")?;

        // The API answers 400 for points without radar coverage.
        if status == StatusCode::BAD_REQUEST {
            tracing::info!(latitude, longitude, "location is not covered by the rain forecast");
            return Ok(None);
        }

        if !status.is_success() {
            tracing::warn!(%status, "rain request failed");
            return Err(anyhow!(
                "Météo-France rain request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let rain = Rain::from_json(&body).context("Failed to parse Météo-France rain JSON")?;

        Ok(Some(rain))
    }
}

#[async_trait]
impl RainProvider for MeteoFranceClient {
    async fn get_rain(
        &self,
        latitude: f64,
        longitude: f64,
        language: &str,
    ) -> Result<Option<Rain>> {
        self.fetch_rain(latitude, longitude, language).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::rain::tests::rain_json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn get_rain_decodes_forecast() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/rain"))
            .and(query_param("lat", "48.8075"))
            .and(query_param("lon", "2.24028"))
            .and(query_param("lang", "fr"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(rain_json(&[1, 1, 1, 1, 2, 3, 2, 1, 1])),
            )
            .mount(&mock_server)
            .await;

        let client = MeteoFranceClient::with_base_url(mock_server.uri(), None);
        let rain = client
            .get_rain(48.8075, 2.24028, DEFAULT_LANGUAGE)
            .await
            .expect("request should succeed")
            .expect("location is covered");

        assert_eq!(rain.location_name(), "Meudon");
        let next = rain.next_rain_date_locale().unwrap().expect("rain expected");
        assert_eq!(next.timestamp(), 1702569300);
    }

    #[tokio::test]
    async fn get_rain_sends_token_when_configured() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/rain"))
            .and(query_param("token", "SECRET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rain_json(&[1])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            MeteoFranceClient::with_base_url(mock_server.uri(), Some("SECRET".to_string()));
        let rain = client.get_rain(48.8075, 2.24028, "en").await.unwrap();

        assert!(rain.is_some());
    }

    #[tokio::test]
    async fn get_rain_outside_coverage_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/rain"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .mount(&mock_server)
            .await;

        let client = MeteoFranceClient::with_base_url(mock_server.uri(), None);
        let rain = client.get_rain(45.508, -73.58, "fr").await.unwrap();

        assert!(rain.is_none());
    }

    #[tokio::test]
    async fn get_rain_server_error_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/rain"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let client = MeteoFranceClient::with_base_url(mock_server.uri(), None);
        let err = client.get_rain(48.8, 2.2, "fr").await.unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("maintenance"));
    }

    #[tokio::test]
    async fn get_rain_incomplete_document_is_an_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/rain"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"type": "Feature"})),
            )
            .mount(&mock_server)
            .await;

        let client = MeteoFranceClient::with_base_url(mock_server.uri(), None);
        let err = client.get_rain(48.8, 2.2, "fr").await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
        assert!(
            err.chain()
                .any(|cause| cause.to_string().contains("missing field `update_time`"))
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MeteoFranceClient::with_base_url("http://localhost:8080/", None);
        assert_eq!(client.base_url(), "http://localhost:8080");

        let client = MeteoFranceClient::new(None);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
