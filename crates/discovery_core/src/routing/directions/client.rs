use std::time::Duration;

use reqwest::blocking::Client;

use super::parser::parse_directions_response;
use super::response::DirectionsResponse;
use crate::routing::{RouteProvider, RouteQuery, RouteSummary, RoutingError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Thin HTTP client for a hosted directions service.
///
/// Issues no retries; callers own the retry policy. The request timeout
/// bounds one leg at 5 s, so a driver's pair of legs settles within ~10 s.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl DirectionsClient {
    /// Create a client for the given service root
    /// (e.g. `https://maps.googleapis.com/maps/api/directions`).
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build directions client");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn query_url(&self, query: &RouteQuery) -> String {
        format!(
            "{}/json?origin={},{}&destination={},{}&key={}",
            self.endpoint,
            query.origin.latitude,
            query.origin.longitude,
            query.destination.latitude,
            query.destination.longitude,
            self.api_key,
        )
    }
}

impl RouteProvider for DirectionsClient {
    fn route(&self, query: RouteQuery) -> Result<RouteSummary, RoutingError> {
        // Fail fast on malformed input; no request is issued
        query.origin.validate()?;
        query.destination.validate()?;

        tracing::debug!(
            origin_lat = query.origin.latitude,
            origin_lng = query.origin.longitude,
            destination_lat = query.destination.latitude,
            destination_lng = query.destination.longitude,
            "requesting directions"
        );

        let url = self.query_url(&query);
        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| RoutingError::Unavailable(err.to_string()))?;

        let parsed: DirectionsResponse = response
            .json()
            .map_err(|err| RoutingError::Unavailable(err.to_string()))?;

        parse_directions_response(parsed)
    }
}
