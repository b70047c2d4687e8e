//! Open-Meteo daily forecast client

use std::sync::OnceLock;

use reqwest::{Client, Url};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::state::{DailySeries, FormInputs};

/// Daily aggregates requested from the provider
pub const DAILY_PARAMS: &str = "temperature_2m_max,temperature_2m_min,temperature_2m_mean";

/// Why a fetch failed. The user only ever sees one generic message;
/// the variant is kept for logs and the debug overlay.
#[derive(
    thiserror::Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
pub enum FetchError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("provider rejected request: {0}")]
    Provider(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Coordinates and date range, as raw text from the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForecastQuery {
    pub latitude: String,
    pub longitude: String,
    pub start_date: String,
    pub end_date: String,
}

impl ForecastQuery {
    /// Build from a ready form. Returns `None` while any field is blank.
    pub fn from_form(form: &FormInputs) -> Option<Self> {
        if !form.is_ready() {
            return None;
        }
        Some(Self {
            latitude: form.latitude.trim().to_string(),
            longitude: form.longitude.trim().to_string(),
            start_date: form.start_date.trim().to_string(),
            end_date: form.end_date.trim().to_string(),
        })
    }
}

fn shared_http() -> &'static Client {
    static HTTP: OnceLock<Client> = OnceLock::new();
    HTTP.get_or_init(Client::new)
}

/// Single-request client for the provider's forecast endpoint
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    endpoint: String,
}

impl ForecastClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: shared_http().clone(),
            endpoint: endpoint.into(),
        }
    }

    /// Use a caller-owned HTTP client instead of the process-wide one
    pub fn with_http(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The GET URL for `query`
    pub fn request_url(&self, query: &ForecastQuery) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &self.endpoint,
            [
                ("latitude", query.latitude.as_str()),
                ("longitude", query.longitude.as_str()),
                ("start_date", query.start_date.as_str()),
                ("end_date", query.end_date.as_str()),
                ("daily", DAILY_PARAMS),
                ("timezone", "auto"),
            ],
        )
        .map_err(|e| FetchError::InvalidEndpoint(format!("{}: {e}", self.endpoint)))
    }

    /// One GET, no retry. The body is decoded whatever the HTTP status.
    #[instrument(skip(self), fields(lat = %query.latitude, lon = %query.longitude))]
    pub async fn fetch_daily_series(&self, query: &ForecastQuery) -> Result<DailySeries, FetchError> {
        let url = self.request_url(query)?;
        debug!(url = %url, "Fetching daily series");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        debug!(%status, bytes = body.len(), "Provider responded");

        decode_daily_series(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    daily: Option<RawDaily>,
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    time: Option<Vec<String>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    temperature_2m_mean: Option<Vec<Option<f64>>>,
}

fn require<T>(field: Option<Vec<T>>, name: &str) -> Result<Vec<T>, FetchError> {
    field.ok_or_else(|| FetchError::MalformedResponse(format!("daily.{name} is missing")))
}

/// Decode a provider body into a [`DailySeries`], checking every field is present
/// and every array lines up with `daily.time`.
pub fn decode_daily_series(body: &str) -> Result<DailySeries, FetchError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidJson(e.to_string()))?;

    if response.error {
        let reason = response
            .reason
            .unwrap_or_else(|| "no reason given".to_string());
        return Err(FetchError::Provider(reason));
    }

    let daily = response
        .daily
        .ok_or_else(|| FetchError::MalformedResponse("daily is missing".to_string()))?;

    let series = DailySeries {
        time: require(daily.time, "time")?,
        temperature_2m_max: require(daily.temperature_2m_max, "temperature_2m_max")?,
        temperature_2m_min: require(daily.temperature_2m_min, "temperature_2m_min")?,
        temperature_2m_mean: require(daily.temperature_2m_mean, "temperature_2m_mean")?,
    };

    let days = series.time.len();
    for (name, len) in [
        ("temperature_2m_max", series.temperature_2m_max.len()),
        ("temperature_2m_min", series.temperature_2m_min.len()),
        ("temperature_2m_mean", series.temperature_2m_mean.len()),
    ] {
        if len != days {
            return Err(FetchError::MalformedResponse(format!(
                "daily.{name} has {len} entries, daily.time has {days}"
            )));
        }
    }

    Ok(series)
}
