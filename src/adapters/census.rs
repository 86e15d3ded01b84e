use crate::adapters::http::HttpClient;
use crate::domain::model::Coordinates;
use crate::domain::ports::Geocoder;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;

const SERVICE: &str = "census";
const BENCHMARK: &str = "2020";

/// One-line address lookup against the US Census geocoder.
pub struct CensusGeocoder {
    base_url: String,
    http: HttpClient,
}

impl CensusGeocoder {
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/geocoder/locations/onelineaddress", self.base_url)
    }
}

#[async_trait]
impl Geocoder for CensusGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        let body = self
            .http
            .get_json(
                &self.endpoint(),
                &[
                    ("address", address),
                    ("benchmark", BENCHMARK),
                    ("format", "json"),
                ],
                &HeaderMap::new(),
            )
            .await?;

        let matches = body["result"]["addressMatches"]
            .as_array()
            .ok_or_else(|| ForecastError::malformed(SERVICE, "result.addressMatches missing"))?;

        let first = matches
            .first()
            .ok_or_else(|| ForecastError::AddressNotFound {
                address: address.to_string(),
            })?;

        if let Some(matched) = first["matchedAddress"].as_str() {
            tracing::debug!("📍 '{}' matched '{}'", address, matched);
        }

        serde_json::from_value(first["coordinates"].clone()).map_err(|e| {
            ForecastError::malformed(SERVICE, format!("invalid coordinates: {}", e))
        })
    }
}
