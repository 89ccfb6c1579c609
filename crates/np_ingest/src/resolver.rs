use std::sync::Arc;

use tracing::warn;

use crate::providers::{GeoProvider, PlaceComponents};

/// Turns a coordinate pair into a human-readable place name for the local
/// news query. Prefers an imprecise name over no name: city, then county,
/// then bare state.
pub struct GeoResolver {
    provider: Arc<dyn GeoProvider>,
}

impl GeoResolver {
    pub fn new(provider: Arc<dyn GeoProvider>) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, lat: f64, lon: f64) -> Option<String> {
        let results = match self.provider.reverse_geocode(lat, lon).await {
            Ok(results) => results,
            Err(e) => {
                warn!(lat, lon, error = %e, "reverse geocoding failed");
                return None;
            }
        };
        let components = results.into_iter().next()?;
        place_name(&components)
    }
}

fn place_name(c: &PlaceComponents) -> Option<String> {
    let suffix = non_empty(&c.state_code).or_else(|| non_empty(&c.state));

    let locality = non_empty(&c.city)
        .or_else(|| non_empty(&c.town))
        .or_else(|| non_empty(&c.village));
    if let Some(name) = locality {
        return Some(with_suffix(name, suffix));
    }

    if let Some(county) = non_empty(&c.county) {
        return Some(with_suffix(county, suffix));
    }

    non_empty(&c.state)
}

fn with_suffix(name: String, suffix: Option<String>) -> String {
    match suffix {
        Some(suffix) => format!("{}, {}", name, suffix),
        None => name,
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use np_core::{Error, Result};

    struct FakeGeo {
        results: Result<Vec<PlaceComponents>>,
    }

    #[async_trait]
    impl GeoProvider for FakeGeo {
        async fn reverse_geocode(&self, _lat: f64, _lon: f64) -> Result<Vec<PlaceComponents>> {
            match &self.results {
                Ok(results) => Ok(results.clone()),
                Err(_) => Err(Error::Provider("geocoder down".to_string())),
            }
        }
    }

    async fn resolve_with(components: PlaceComponents) -> Option<String> {
        let resolver = GeoResolver::new(Arc::new(FakeGeo {
            results: Ok(vec![components]),
        }));
        resolver.resolve(39.78, -89.65).await
    }

    #[tokio::test]
    async fn city_with_state_code_wins() {
        let name = resolve_with(PlaceComponents {
            city: Some("Springfield".to_string()),
            county: Some("Sangamon County".to_string()),
            state: Some("Illinois".to_string()),
            state_code: Some("IL".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(name.as_deref(), Some("Springfield, IL"));
    }

    #[tokio::test]
    async fn town_and_village_fill_in_for_city() {
        let name = resolve_with(PlaceComponents {
            village: Some("Elsah".to_string()),
            state_code: Some("IL".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(name.as_deref(), Some("Elsah, IL"));
    }

    #[tokio::test]
    async fn county_is_used_when_no_locality() {
        let name = resolve_with(PlaceComponents {
            county: Some("Sangamon County".to_string()),
            state: Some("Illinois".to_string()),
            state_code: Some("IL".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(name.as_deref(), Some("Sangamon County, IL"));
    }

    #[tokio::test]
    async fn bare_state_is_the_last_resort() {
        let name = resolve_with(PlaceComponents {
            state: Some("Illinois".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(name.as_deref(), Some("Illinois"));
    }

    #[tokio::test]
    async fn no_usable_components_resolves_to_none() {
        let name = resolve_with(PlaceComponents {
            country: Some("United States".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(name, None);
    }

    #[tokio::test]
    async fn empty_results_resolve_to_none() {
        let resolver = GeoResolver::new(Arc::new(FakeGeo { results: Ok(vec![]) }));
        assert_eq!(resolver.resolve(0.0, 0.0).await, None);
    }

    #[tokio::test]
    async fn provider_error_resolves_to_none() {
        let resolver = GeoResolver::new(Arc::new(FakeGeo {
            results: Err(Error::Provider("geocoder down".to_string())),
        }));
        assert_eq!(resolver.resolve(0.0, 0.0).await, None);
    }
}
