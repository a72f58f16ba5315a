use crate::auth::{generate_auth_headers, HmacError};
use crate::config::Config;
use crate::endpoints::{
    API_V1_FEEDS, API_V1_REPORTS, API_V1_REPORTS_BULK, API_V1_REPORTS_LATEST, API_V1_REPORTS_PAGE,
};
use crate::feed::{Feed, ID};
use crate::report::Report;

use rand::Rng;
use reqwest::{header::HeaderMap, Client as HttpClient, Response, StatusCode};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur within the REST client.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("HMAC generation failed: {0}")]
    HmacError(#[from] HmacError),

    #[error("invalid response format: {0}")]
    InvalidResponseFormat(#[from] serde_json::Error),

    #[error("API error ({status}): {body}")]
    ApiError { status: StatusCode, body: String },
}

#[derive(Debug, Deserialize)]
struct FeedsResponse {
    feeds: Vec<Feed>,
}

#[derive(Debug, Deserialize)]
pub struct ReportResponse {
    pub report: Report,
}

#[derive(Debug, Deserialize)]
pub struct ReportsResponse {
    pub reports: Vec<Report>,
}

pub struct Client {
    config: Config,
    http: HttpClient,
}

impl Client {
    /// Creates a new `Client` instance using the provided `Config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: Config) -> Result<Self, reqwest::Error> {
        let http = HttpClient::builder()
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .timeout(config.timeout)
            .build()?;

        Ok(Client { config, http })
    }

    /// Returns a list of available feeds.
    ///
    /// Endpoint: /api/v1/feeds
    /// Type: HTTP GET
    pub async fn get_feeds(&self) -> Result<Vec<Feed>, ClientError> {
        let response = self
            .get_with_retry(API_V1_FEEDS, &[])
            .await?
            .json::<FeedsResponse>()
            .await?;

        Ok(response.feeds)
    }

    /// Returns a single report with the latest timestamp.
    ///
    /// Endpoint: /api/v1/reports/latest
    /// Type: HTTP GET
    /// Parameters: feedID
    pub async fn get_latest_report(&self, feed_id: ID) -> Result<ReportResponse, ClientError> {
        let feed_id = feed_id.to_hex_string();

        let response = self
            .get_with_retry(API_V1_REPORTS_LATEST, &[("feedID", &feed_id)])
            .await?
            .json::<ReportResponse>()
            .await?;

        Ok(response)
    }

    /// Returns a single report for the given feed at or after `timestamp`.
    ///
    /// Endpoint: /api/v1/reports
    /// Type: HTTP GET
    /// Parameters: feedID, timestamp
    pub async fn get_report(
        &self,
        feed_id: ID,
        timestamp: u32,
    ) -> Result<ReportResponse, ClientError> {
        let feed_id = feed_id.to_hex_string();
        let timestamp = timestamp.to_string();

        let response = self
            .get_with_retry(
                API_V1_REPORTS,
                &[("feedID", &feed_id), ("timestamp", &timestamp)],
            )
            .await?
            .json::<ReportResponse>()
            .await?;

        Ok(response)
    }

    /// Returns one report per feed, all at or after `timestamp`.
    ///
    /// Endpoint: /api/v1/reports/bulk
    /// Type: HTTP GET
    /// Parameters: feedIDs (comma-separated), timestamp
    pub async fn get_reports_bulk(
        &self,
        feed_ids: &[ID],
        timestamp: u32,
    ) -> Result<ReportsResponse, ClientError> {
        let feed_ids = feed_ids
            .iter()
            .map(ID::to_hex_string)
            .collect::<Vec<_>>()
            .join(",");
        let timestamp = timestamp.to_string();

        let response = self
            .get_with_retry(
                API_V1_REPORTS_BULK,
                &[("feedIDs", &feed_ids), ("timestamp", &timestamp)],
            )
            .await?
            .json::<ReportsResponse>()
            .await?;

        Ok(response)
    }

    /// Returns a page of historical reports for a single feed.
    ///
    /// Endpoint: /api/v1/reports/page
    /// Type: HTTP GET
    /// Parameters: feedID, startTimestamp, limit
    pub async fn get_reports_page(
        &self,
        feed_id: ID,
        start_timestamp: u32,
        limit: u32,
    ) -> Result<ReportsResponse, ClientError> {
        let feed_id = feed_id.to_hex_string();
        let start_timestamp = start_timestamp.to_string();
        let limit = limit.to_string();

        let response = self
            .get_with_retry(
                API_V1_REPORTS_PAGE,
                &[
                    ("feedID", &feed_id),
                    ("startTimestamp", &start_timestamp),
                    ("limit", &limit),
                ],
            )
            .await?
            .json::<ReportsResponse>()
            .await?;

        Ok(response)
    }

    /// Issues a GET request with HMAC auth headers, retrying 5xx/timeout
    /// failures up to `config.retry_attempts` times with exponential
    /// backoff and jitter. 4xx responses are never retried.
    async fn get_with_retry(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, ClientError> {
        let mut attempt = 0;

        loop {
            match self.get_once(path, query).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt >= self.config.retry_attempts || !is_retryable(&err) => {
                    return Err(err)
                }
                Err(_) => {
                    attempt += 1;
                    tokio::time::sleep(backoff_delay(self.config.retry_delay, attempt)).await;
                }
            }
        }
    }

    async fn get_once(&self, path: &str, query: &[(&str, &str)]) -> Result<Response, ClientError> {
        let query_string = if query.is_empty() {
            String::new()
        } else {
            format!("?{}", serde_urlencoded::to_string(query).unwrap_or_default())
        };

        let url = format!("{}{}{}", self.config.rest_url, path, query_string);
        let signed_path = format!("{}{}", path, query_string);

        let timestamp: i64 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_millis()
            .try_into()
            .expect("timestamp overflows i64");

        let headers: HeaderMap = generate_auth_headers(
            "GET",
            &signed_path,
            b"",
            &self.config.api_key,
            &self.config.api_secret,
            timestamp,
        )?;

        let response = self.http.get(url).headers(headers).send().await?;

        if let Some(ref inspect_fn) = self.config.inspect_http_response {
            inspect_fn(&response);
        }

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError { status, body });
        }

        Ok(response)
    }
}

/// Only server errors and timeouts are eligible for retry; 4xx client
/// errors are never retried.
fn is_retryable(err: &ClientError) -> bool {
    match err {
        ClientError::ApiError { status, .. } => status.is_server_error(),
        ClientError::HttpRequestError(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}

fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exp = base.saturating_mul(1 << attempt.min(16));
    let jitter = rand::thread_rng().gen_range(0.5..1.0);
    exp.mul_f64(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_api_error_is_retryable_only_for_5xx() {
        let server_err = ClientError::ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        let client_err = ClientError::ApiError {
            status: StatusCode::BAD_REQUEST,
            body: String::new(),
        };

        assert!(is_retryable(&server_err));
        assert!(!is_retryable(&client_err));
    }

    #[test]
    fn backoff_delay_scales_with_attempt() {
        let base = Duration::from_millis(100);
        let first = backoff_delay(base, 0);
        let third = backoff_delay(base, 3);

        assert!(first <= base);
        assert!(third <= base * 8);
    }
}
