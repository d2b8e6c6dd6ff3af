use super::dto::{AliasesResponse, BtcInfoRow, PredictionsResponse};
use crate::config::{InferenceEnvConfig, InferenceTimeouts};
use crate::domain::alias::ModelAlias;
use crate::domain::errors::InferenceError;
use crate::domain::market::{OhlcvBar, OhlcvSeries};
use crate::domain::ports::{AliasListing, InferenceService};
use crate::domain::prediction::PredictionSeries;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::error::Error as _;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const ALIASES_PATH: &str = "aliases";
const BTC_INFO_PATH: &str = "btc-info";
const RELOAD_PATH: &str = "reload";
const PREDICT_PATH: &str = "predict";
const PREDICT_CHAMPION_PATH: &str = "predict-champion";

/// Longest response body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// HTTP client for the inference server.
pub struct HttpInferenceClient {
    client: Client,
    base_url: Url,
    timeouts: InferenceTimeouts,
    default_alias: String,
}

impl HttpInferenceClient {
    pub fn new(config: &InferenceEnvConfig) -> Self {
        // Url::join drops the last path segment unless the base ends with '/'.
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            client: HttpClientFactory::create_client(config.timeouts.connect),
            base_url,
            timeouts: config.timeouts,
            default_alias: config.default_alias.clone(),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, InferenceError> {
        self.base_url
            .join(path)
            .map_err(|e| InferenceError::InvalidUrl {
                endpoint: label(path),
                reason: e.to_string(),
            })
    }

    /// Sends `request` and returns the body of a 2xx response.
    async fn send(
        &self,
        path: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<String, InferenceError> {
        debug!("Calling {} (timeout {:?})", label(path), timeout);

        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(path, timeout, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(path, timeout, e))?;

        if !status.is_success() {
            return Err(InferenceError::Status {
                endpoint: label(path),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<T, InferenceError> {
        let url = self.endpoint(path)?;
        let body = self.send(path, self.client.get(url), timeout).await?;
        parse_body(path, &body)
    }

    fn transport_error(
        &self,
        path: &str,
        timeout: Duration,
        error: reqwest::Error,
    ) -> InferenceError {
        if error.is_timeout() {
            return timeout_error(path, error.is_connect(), timeout, self.timeouts.connect);
        }

        let mut reason = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }

        InferenceError::Transport {
            endpoint: label(path),
            reason,
        }
    }

    async fn fetch_aliases(&self) -> Result<Vec<String>, InferenceError> {
        let response: AliasesResponse = self
            .get_json(ALIASES_PATH, self.timeouts.standard)
            .await?;
        Ok(response.aliases)
    }
}

#[async_trait]
impl InferenceService for HttpInferenceClient {
    async fn list_aliases(&self) -> AliasListing {
        match self.fetch_aliases().await {
            Ok(names) => {
                info!("Fetched {} model aliases", names.len());
                AliasListing {
                    names,
                    warning: None,
                }
            }
            Err(e) => {
                warn!(
                    "Alias listing failed, using default {}: {}",
                    self.default_alias, e
                );
                AliasListing {
                    names: vec![self.default_alias.clone()],
                    warning: Some(format!("Failed to fetch model aliases: {}", e)),
                }
            }
        }
    }

    async fn fetch_ohlcv(&self) -> Result<OhlcvSeries, InferenceError> {
        let rows: Vec<BtcInfoRow> = self
            .get_json(BTC_INFO_PATH, self.timeouts.standard)
            .await?;
        Ok(OhlcvSeries::new(
            rows.into_iter().map(OhlcvBar::from).collect(),
        ))
    }

    async fn reload_model(&self, alias: &ModelAlias) -> Result<(), InferenceError> {
        let url = self.endpoint(RELOAD_PATH)?;
        let request = self.client.post(url).query(&[("alias", alias.wire())]);
        self.send(RELOAD_PATH, request, self.timeouts.standard)
            .await?;
        Ok(())
    }

    async fn predict(&self, alias: &ModelAlias) -> Result<PredictionSeries, InferenceError> {
        let url = self.endpoint(PREDICT_PATH)?;
        let request = self.client.post(url).query(&[("alias", alias.wire())]);
        let body = self
            .send(PREDICT_PATH, request, self.timeouts.standard)
            .await?;
        let response: PredictionsResponse = parse_body(PREDICT_PATH, &body)?;
        Ok(response.into())
    }

    async fn predict_champion(&self) -> Result<PredictionSeries, InferenceError> {
        let response: PredictionsResponse = self
            .get_json(PREDICT_CHAMPION_PATH, self.timeouts.champion)
            .await?;
        Ok(response.into())
    }
}

fn label(path: &str) -> String {
    format!("/{}", path)
}

fn parse_body<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, InferenceError> {
    serde_json::from_str(body).map_err(|e| InferenceError::MalformedPayload {
        endpoint: label(path),
        reason: e.to_string(),
    })
}

/// A timeout while connecting, or one while waiting on the request.
fn timeout_error(
    path: &str,
    during_connect: bool,
    request: Duration,
    connect: Duration,
) -> InferenceError {
    if during_connect {
        InferenceError::ConnectTimeout {
            endpoint: label(path),
            secs: connect.as_secs(),
        }
    } else {
        InferenceError::Timeout {
            endpoint: label(path),
            secs: request.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> InferenceEnvConfig {
        InferenceEnvConfig::from_lookup(|key| {
            (key == "INFERENCE_SERVER_URL").then(|| url.to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let client = HttpInferenceClient::new(&config("http://models.local:8000/api/v1"));
        assert_eq!(
            client.endpoint(PREDICT_CHAMPION_PATH).unwrap().as_str(),
            "http://models.local:8000/api/v1/predict-champion"
        );
    }

    #[test]
    fn test_endpoints_from_root() {
        let client = HttpInferenceClient::new(&config("http://localhost:8000"));
        assert_eq!(
            client.endpoint(BTC_INFO_PATH).unwrap().as_str(),
            "http://localhost:8000/btc-info"
        );
    }

    #[test]
    fn test_parse_body_reports_endpoint() {
        let err = parse_body::<PredictionsResponse>(PREDICT_PATH, "{}").unwrap_err();
        assert_eq!(err.endpoint(), "/predict");
        assert!(matches!(err, InferenceError::MalformedPayload { .. }));
    }

    #[test]
    fn test_connect_timeout_reports_connect_budget() {
        let err = timeout_error(
            BTC_INFO_PATH,
            true,
            Duration::from_secs(120),
            Duration::from_secs(10),
        );
        assert_eq!(
            err,
            InferenceError::ConnectTimeout {
                endpoint: "/btc-info".to_string(),
                secs: 10,
            }
        );

        let err = timeout_error(
            PREDICT_CHAMPION_PATH,
            false,
            Duration::from_secs(300),
            Duration::from_secs(10),
        );
        assert_eq!(err.to_string(), "/predict-champion timed out after 300s");
    }
}
