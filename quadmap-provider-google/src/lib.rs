//! Geocoding provider backed by the Google Geocoding API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use quadmap_core::{
    model::Coordinate,
    ports::{GeocodeError, GeocodePort},
};

/// Public geocoding endpoint.
pub const BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Upper bound for a single geocoding request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const STATUS_OK: &str = "OK";
const STATUS_REQUEST_DENIED: &str = "REQUEST_DENIED";

/// Response from /geocode/json
///
/// Every field is optional so that an unexpected shape degrades into a
/// non-OK status instead of a decode failure.
#[derive(Debug, Default, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Single match inside `GeocodeResponse.results`
#[derive(Debug, Default, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    geometry: Option<Geometry>,
    // formatted_address, place_id, ... exist but we don't need them
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Clone)]
/// Connection settings for [`GoogleGeocoder`].
pub struct GoogleConfig {
    /// API key; `None` or blank disables the provider.
    pub api_key: Option<String>,
    /// Endpoint queried with `address` and `key` parameters.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: BASE_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GoogleConfig {
    /// Default settings with the given API key.
    #[must_use]
    pub fn with_key<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

/// Geocoding implementation for the Google Geocoding API.
pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GoogleGeocoder {
    /// Create a new geocoder bound to the given HTTP client.
    ///
    /// Returns `None` when the config carries no API key or a blank one.
    #[must_use]
    pub fn new(client: Client, config: GoogleConfig) -> Option<Self> {
        let GoogleConfig {
            api_key,
            base_url,
            timeout,
        } = config;
        let api_key = api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?
            .to_owned();
        Some(Self {
            client,
            api_key,
            base_url,
            timeout,
        })
    }
}

#[async_trait]
impl GeocodePort for GoogleGeocoder {
    fn name(&self) -> &str {
        "google"
    }

    async fn geocode(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let req = self
            .client
            .get(&self.base_url)
            .timeout(self.timeout)
            .query(&[("address", query), ("key", self.api_key.as_str())]);

        let resp = fetch_json::<GeocodeResponse>(req).await?;
        interpret(resp)
    }
}

/// Build the geocoding port, or `None` when no API key is configured.
#[must_use]
pub fn geocoder(client: Client, config: GoogleConfig) -> Option<Arc<dyn GeocodePort>> {
    let base_url = config.base_url.clone();
    let geocoder = GoogleGeocoder::new(client, config)?;
    log::info!("Use Google geocoding gateway at {base_url}");
    Some(Arc::new(geocoder))
}

/// Map a decoded provider answer onto a coordinate or a typed failure.
fn interpret(resp: GeocodeResponse) -> Result<Coordinate, GeocodeError> {
    let GeocodeResponse {
        status,
        results,
        error_message,
    } = resp;

    match status.as_str() {
        STATUS_OK => {
            let location = results
                .into_iter()
                .next()
                .and_then(|result| result.geometry)
                .and_then(|geometry| geometry.location);
            match location {
                Some(LatLng { lat, lng }) => Ok(Coordinate::new(lat, lng)),
                // OK without a usable first result is treated like ZERO_RESULTS.
                None => Err(GeocodeError::ProviderStatus {
                    status,
                    message: error_message,
                }),
            }
        }
        STATUS_REQUEST_DENIED => Err(GeocodeError::ProviderDenied {
            message: error_message,
        }),
        _ => Err(GeocodeError::ProviderStatus {
            status,
            message: error_message,
        }),
    }
}

// Small helper to fetch and decode JSON, keeping the body of failed responses.
// The request URL carries the API key, so it is stripped from every error.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, GeocodeError> {
    let resp = req
        .send()
        .await
        .map_err(|err| GeocodeError::from(err.without_url()))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GeocodeError::Http {
            status: status.as_u16(),
            body,
        });
    }

    resp.json()
        .await
        .map_err(|err| GeocodeError::Decode(err.without_url().to_string()))
}
