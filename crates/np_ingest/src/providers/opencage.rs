use async_trait::async_trait;
use np_core::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{GeoProvider, PlaceComponents};

const BASE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    components: Components,
}

#[derive(Debug, Default, Deserialize)]
struct Components {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state: Option<String>,
    state_code: Option<String>,
    country: Option<String>,
}

impl From<Components> for PlaceComponents {
    fn from(c: Components) -> Self {
        PlaceComponents {
            city: c.city,
            town: c.town,
            village: c.village,
            county: c.county,
            state: c.state,
            state_code: c.state_code,
            country: c.country,
        }
    }
}

/// Client for the OpenCage reverse-geocoding endpoint.
pub struct OpenCageClient {
    client: Client,
    api_key: String,
}

impl OpenCageClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl GeoProvider for OpenCageClient {
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Vec<PlaceComponents>> {
        let query = format!("{},{}", lat, lon);
        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("q", query.as_str()),
                ("key", self.api_key.as_str()),
                ("no_annotations", "1"),
                ("limit", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Provider(format!(
                "geocoding provider returned {}",
                status
            )));
        }

        let body: GeocodeResponse = response.json().await?;
        debug!(lat, lon, results = body.results.len(), "reverse geocode response");
        Ok(body
            .results
            .into_iter()
            .map(|r| PlaceComponents::from(r.components))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocode_payload_deserializes() {
        let json = r#"{
            "results": [{
                "components": {
                    "city": "Springfield",
                    "county": "Sangamon County",
                    "state": "Illinois",
                    "state_code": "IL",
                    "country": "United States"
                }
            }]
        }"#;
        let body: GeocodeResponse = serde_json::from_str(json).unwrap();
        let place = PlaceComponents::from(body.results.into_iter().next().unwrap().components);
        assert_eq!(place.city.as_deref(), Some("Springfield"));
        assert_eq!(place.state_code.as_deref(), Some("IL"));
        assert!(place.town.is_none());
    }

    #[test]
    fn empty_result_set_deserializes() {
        let body: GeocodeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(body.results.is_empty());
    }
}
