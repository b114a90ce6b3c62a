use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::cache::Cache;
use crate::core::currency::CurrencyRateProvider;

const RETRIES: usize = 2;
const RETRY_DELAY_MS: u64 = 300;

// ExchangeRateApiProvider implementation for CurrencyRateProvider, backed by
// the exchangerate-api.com v6 pair endpoint
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: Option<String>,
    cache: Arc<Cache<String, f64>>,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, api_key: Option<String>, cache: Arc<Cache<String, f64>>) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            cache,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: String,
    conversion_rate: Option<f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let pair = format!("{from}/{to}");
        if let Some(cached) = self.cache.get(&pair).await {
            return Ok(cached);
        }

        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "Failed to fetch exchange rates: no API key configured (set {})",
                    crate::core::config::API_KEY_ENV
                )
            })?;

        let url = format!("{}/v6/{}/pair/{}/{}", self.base_url, api_key, from, to);
        debug!("Requesting exchange rate for {}", pair);

        let client = reqwest::Client::builder().user_agent("xpt/1.0").build()?;
        let response = with_retry(|| client.get(&url).send(), RETRIES, RETRY_DELAY_MS)
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}", e, pair))?;

        let status = response.status();
        let text = response.text().await?;

        let data: PairResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                bail!("HTTP error: {} for currency pair: {}", status, pair)
            }
            Err(e) => bail!("Failed to parse JSON response for {}: {}", pair, e),
        };
        debug!(response = ?data, "Received exchange rate response");

        if data.result != "success" {
            bail!(
                "Failed to fetch exchange rates for {}: {}",
                pair,
                data.error_type.as_deref().unwrap_or(&data.result)
            );
        }

        let rate = data
            .conversion_rate
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| anyhow!("No valid conversion rate found for currency pair: {}", pair))?;

        self.cache.put(pair, rate).await;
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAIR_PATH: &str = "/v6/test-key/pair/USD/EUR";

    async fn mount(mock_server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(PAIR_PATH))
            .respond_with(template)
            .mount(mock_server)
            .await;
    }

    fn provider(mock_server: &MockServer) -> ExchangeRateApiProvider {
        ExchangeRateApiProvider::new(
            &mock_server.uri(),
            Some("test-key".to_string()),
            Arc::new(Cache::new()),
        )
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_server = MockServer::start().await;
        let mock_response = r#"{
            "result": "success",
            "base_code": "USD",
            "target_code": "EUR",
            "conversion_rate": 0.9213
        }"#;
        mount(
            &mock_server,
            ResponseTemplate::new(200).set_body_string(mock_response),
        )
        .await;

        let rate = provider(&mock_server)
            .get_rate("USD", "EUR")
            .await
            .expect("Failed to get rate");
        assert_eq!(rate, 0.9213);
    }

    #[tokio::test]
    async fn test_rate_is_cached_per_pair() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PAIR_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"result": "success", "conversion_rate": 1.5}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider(&mock_server);
        assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 1.5);
        assert_eq!(provider.get_rate("USD", "EUR").await.unwrap(), 1.5);
    }

    #[tokio::test]
    async fn test_error_status_in_body() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            ResponseTemplate::new(200)
                .set_body_string(r#"{"result": "error", "error-type": "unsupported-code"}"#),
        )
        .await;

        let result = provider(&mock_server).get_rate("USD", "EUR").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Failed to fetch exchange rates for USD/EUR: unsupported-code"
        );
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = MockServer::start().await;
        mount(&mock_server, ResponseTemplate::new(500)).await;

        let result = provider(&mock_server).get_rate("USD", "EUR").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for currency pair: USD/EUR"
        );
    }

    #[tokio::test]
    async fn test_invalid_key_response() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            ResponseTemplate::new(403)
                .set_body_string(r#"{"result": "error", "error-type": "invalid-key"}"#),
        )
        .await;

        let result = provider(&mock_server).get_rate("USD", "EUR").await;
        assert!(result.unwrap_err().to_string().contains("invalid-key"));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            ResponseTemplate::new(200).set_body_string(r#"{"rates": {"EUR": 0.9}}"#),
        )
        .await;

        let result = provider(&mock_server).get_rate("USD", "EUR").await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for USD/EUR")
        );
    }

    #[tokio::test]
    async fn test_missing_or_invalid_rate() {
        let mock_server = MockServer::start().await;
        mount(
            &mock_server,
            ResponseTemplate::new(200)
                .set_body_string(r#"{"result": "success", "conversion_rate": -1.0}"#),
        )
        .await;

        let result = provider(&mock_server).get_rate("USD", "EUR").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No valid conversion rate found for currency pair: USD/EUR"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let mock_server = MockServer::start().await;
        let provider = ExchangeRateApiProvider::new(&mock_server.uri(), None, Arc::new(Cache::new()));

        let result = provider.get_rate("USD", "EUR").await;
        assert!(result.unwrap_err().to_string().contains("no API key"));
    }
}
